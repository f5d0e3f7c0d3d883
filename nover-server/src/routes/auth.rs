use super::required_text;
use crate::error::{ServerError, ServerResult};
use crate::extract::JsonBody;
use crate::state::AppState;
use axum::{Json, extract::State, http::StatusCode};
use nover_store::{User, accounts};
use serde::{Deserialize, Serialize};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    #[serde(default)]
    pub full_name: String,
    pub pen_name: Option<String>,
    pub phone: Option<String>,
    pub instagram: Option<String>,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
}

/// Passwords are taken verbatim, surrounding whitespace included
fn required_password(value: Option<String>) -> ServerResult<String> {
    value
        .filter(|p| !p.is_empty())
        .ok_or_else(|| ServerError::InputRequired("password is required".into()))
}

/// POST /api/auth/register
pub async fn register(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<RegisterRequest>,
) -> ServerResult<(StatusCode, Json<User>)> {
    let registration = accounts::Registration {
        email: required_text(body.email, "email")?,
        username: required_text(body.username, "username")?,
        password: required_password(body.password)?,
        full_name: body.full_name,
        pen_name: body.pen_name,
        phone: body.phone,
        instagram: body.instagram,
    };

    let user = accounts::register(state.users.as_ref(), registration).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<LoginRequest>,
) -> ServerResult<Json<LoginResponse>> {
    let username = required_text(body.username, "username")?;
    // An empty password is just a wrong one
    let password = body.password.unwrap_or_default();

    let user = accounts::authenticate(state.users.as_ref(), &username, &password).await?;
    let token = state.tokens.issue(&user)?;

    tracing::info!(user_id = user.user_id, "User logged in");
    Ok(Json(LoginResponse { token, user }))
}
