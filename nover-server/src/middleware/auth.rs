use crate::error::{ServerError, ServerResult};
use crate::state::AppState;
use axum::{
    extract::{Request, State},
    http::header::{AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};

/// Verified caller identity, inserted into request extensions
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub user_id: i64,
    pub user_code: String,
    pub email: String,
}

/// Pull the token out of `Authorization: Bearer <token>`.
///
/// An absent header is `Ok(None)`; any other shape is rejected.
pub fn bearer_token(headers: &HeaderMap) -> ServerResult<Option<&str>> {
    let Some(value) = headers.get(AUTHORIZATION) else {
        return Ok(None);
    };
    let value = value
        .to_str()
        .map_err(|_| ServerError::Unauthorized("Malformed Authorization header".into()))?;

    match value.split_once(' ') {
        Some((scheme, token))
            if scheme.eq_ignore_ascii_case("bearer") && !token.trim().is_empty() =>
        {
            Ok(Some(token.trim()))
        }
        _ => Err(ServerError::Unauthorized(
            "Authorization header must be 'Bearer <token>'".into(),
        )),
    }
}

/// Resolve the caller if a token was presented. Used directly by routes
/// where signing in is optional.
pub fn identify(state: &AppState, headers: &HeaderMap) -> ServerResult<Option<AuthUser>> {
    let Some(token) = bearer_token(headers)? else {
        return Ok(None);
    };
    let claims = state.tokens.verify(token)?;
    Ok(Some(AuthUser {
        user_id: claims.user_id,
        user_code: claims.user_code,
        email: claims.email,
    }))
}

/// Middleware for protected routes: rejects anonymous requests
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ServerError> {
    let user = identify(&state, request.headers())?
        .ok_or_else(|| ServerError::Unauthorized("Missing bearer token".into()))?;

    tracing::debug!(user_id = user.user_id, "Authenticated request");
    request.extensions_mut().insert(user);

    Ok(next.run(request).await)
}
