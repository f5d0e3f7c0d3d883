//! Bearer token issuance and verification

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use nover_store::User;
use serde::{Deserialize, Serialize};

use crate::config::{AuthConfig, MAX_TOKEN_TTL_HOURS};
use crate::error::{ServerError, ServerResult};

/// Claims carried by a session token
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    pub user_id: i64,
    pub user_code: String,
    pub email: String,
    pub login_with: String,
    pub iss: String,
    pub iat: i64,
    pub exp: i64,
}

/// HS256 signer/verifier built from an explicit [`AuthConfig`]
pub struct TokenAuthority {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
    issuer: String,
}

impl TokenAuthority {
    /// The lifetime is clamped to `1..=MAX_TOKEN_TTL_HOURS`.
    pub fn new(config: &AuthConfig) -> Self {
        let secret = config.jwt_secret.as_bytes();

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_issuer(&[config.issuer.as_str()]);
        validation.set_required_spec_claims(&["exp", "iss"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            ttl: Duration::hours(config.token_ttl_hours.clamp(1, MAX_TOKEN_TTL_HOURS)),
            issuer: config.issuer.clone(),
        }
    }

    /// Sign a token for a freshly authenticated user
    pub fn issue(&self, user: &User) -> ServerResult<String> {
        let now = Utc::now();
        let claims = Claims {
            user_id: user.user_id,
            user_code: user.user_code.clone(),
            email: user.email.clone(),
            login_with: user.login_with.clone(),
            iss: self.issuer.clone(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };
        self.sign(&claims)
    }

    fn sign(&self, claims: &Claims) -> ServerResult<String> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(|e| ServerError::Internal(format!("token signing failed: {e}")))
    }

    /// Check signature, expiry and issuer
    pub fn verify(&self, token: &str) -> ServerResult<Claims> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!(error = %e, "Rejected bearer token");
                ServerError::Unauthorized("Invalid or expired token".into())
            })
    }
}
