use super::required_text;
use crate::error::{ServerError, ServerResult};
use crate::extract::JsonBody;
use crate::middleware::AuthUser;
use crate::state::AppState;
use axum::{Extension, Json, extract::State};
use nover_store::{AuthorProfile, User, accounts};
use serde::{Deserialize, Serialize};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorRequest {
    pub pen_name: Option<String>,
    pub phone: Option<String>,
    pub instagram: Option<String>,
    pub bank_id: Option<i64>,
    pub account_number: Option<String>,
}

#[derive(Serialize)]
pub struct AuthorRequestResponse {
    pub code: &'static str,
    pub message: &'static str,
    pub user: User,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorStatusResponse {
    pub is_author: bool,
    pub user: User,
}

/// POST /api/v1/user/request-author
pub async fn request_author(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    JsonBody(body): JsonBody<AuthorRequest>,
) -> ServerResult<Json<AuthorRequestResponse>> {
    let profile = AuthorProfile {
        pen_name: required_text(body.pen_name, "penName")?,
        phone: required_text(body.phone, "phone")?,
        instagram: body.instagram,
        bank_id: body
            .bank_id
            .ok_or_else(|| ServerError::InputRequired("bankId is required".into()))?,
        account_number: required_text(body.account_number, "accountNumber")?,
    };

    let user = accounts::upgrade_to_author(
        state.users.as_ref(),
        state.reference.as_ref(),
        caller.user_id,
        profile,
    )
    .await?;

    Ok(Json(AuthorRequestResponse {
        code: "author_request_success",
        message: "Request to become an author was successful",
        user,
    }))
}

/// GET /api/v1/user/author-status
pub async fn author_status(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
) -> ServerResult<Json<AuthorStatusResponse>> {
    let user = state
        .users
        .find_by_id(caller.user_id)
        .await?
        .ok_or_else(|| ServerError::NotFound("User associated with this token not found".into()))?;

    Ok(Json(AuthorStatusResponse {
        is_author: user.is_author(),
        user,
    }))
}
