use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use nover_store::{ContentLock, StoreError, UniqueField, WorkflowViolation};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Missing input: {0}")]
    InputRequired(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid state: {0:?}")]
    InvalidState(WorkflowViolation),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Payment required: {}", .0.as_str())]
    PaymentRequired(ContentLock),

    #[error("Only authors can do this")]
    NotAuthor,

    #[error("Not the owner: {0}")]
    NotOwner(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0:?}")]
    Conflict(UniqueField),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ServerError {
    /// Machine-readable code placed in the error envelope
    pub fn code(&self) -> &'static str {
        match self {
            ServerError::BadRequest(_) => "bad_request",
            ServerError::InputRequired(_) => "input_required",
            ServerError::InvalidInput(_) => "invalid_input",
            ServerError::InvalidState(WorkflowViolation::NoChapters) => "no_chapters",
            ServerError::InvalidState(WorkflowViolation::NotPublished) => "not_published",
            ServerError::Unauthorized(_) => "unauthorized",
            ServerError::InvalidCredentials => "invalid_credentials",
            ServerError::PaymentRequired(lock) => lock.as_str(),
            ServerError::NotAuthor => "not_author",
            ServerError::NotOwner(_) => "not_owner",
            ServerError::NotFound(_) => "not_found",
            ServerError::Conflict(UniqueField::EmailOrUsername) => "email_or_username_taken",
            ServerError::Conflict(UniqueField::PenName) => "pen_name_taken",
            ServerError::Internal(_) => "internal_server",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ServerError::BadRequest(_)
            | ServerError::InputRequired(_)
            | ServerError::InvalidInput(_)
            | ServerError::InvalidState(_) => StatusCode::BAD_REQUEST,
            ServerError::Unauthorized(_) | ServerError::InvalidCredentials => {
                StatusCode::UNAUTHORIZED
            }
            ServerError::PaymentRequired(_) => StatusCode::PAYMENT_REQUIRED,
            ServerError::NotAuthor | ServerError::NotOwner(_) => StatusCode::FORBIDDEN,
            ServerError::NotFound(_) => StatusCode::NOT_FOUND,
            ServerError::Conflict(_) => StatusCode::CONFLICT,
            ServerError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let message = match &self {
            ServerError::BadRequest(msg)
            | ServerError::InputRequired(msg)
            | ServerError::InvalidInput(msg)
            | ServerError::Unauthorized(msg)
            | ServerError::NotFound(msg) => msg.clone(),
            ServerError::InvalidState(WorkflowViolation::NoChapters) => {
                "Cannot publish a book with no chapters".into()
            }
            ServerError::InvalidState(WorkflowViolation::NotPublished) => {
                "Only published books can be changed this way".into()
            }
            ServerError::InvalidCredentials => "Invalid username or password".into(),
            ServerError::PaymentRequired(ContentLock::LoginRequired) => {
                "Log in to read this chapter".into()
            }
            ServerError::PaymentRequired(ContentLock::UnlockRequired) => {
                "Unlock this chapter with coins to read it".into()
            }
            ServerError::NotAuthor => "Only authors can create books".into(),
            ServerError::NotOwner(_) => "You are not the owner of this book".into(),
            ServerError::Conflict(UniqueField::EmailOrUsername) => {
                "Email or username already taken".into()
            }
            ServerError::Conflict(UniqueField::PenName) => "Pen name already taken".into(),
            ServerError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                "Internal server error".into()
            }
        };

        (
            self.status(),
            Json(json!({ "code": self.code(), "message": message })),
        )
            .into_response()
    }
}

impl From<StoreError> for ServerError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(what) => ServerError::NotFound(format!("{what} not found")),
            StoreError::Forbidden(msg) => ServerError::NotOwner(msg),
            StoreError::AlreadyExists(field) => ServerError::Conflict(field),
            StoreError::InvalidState(violation) => ServerError::InvalidState(violation),
            StoreError::Locked(lock) => ServerError::PaymentRequired(lock),
            StoreError::InvalidCredentials => ServerError::InvalidCredentials,
            StoreError::InputRequired(msg) => ServerError::InputRequired(msg),
            StoreError::InvalidInput(msg) => ServerError::InvalidInput(msg),
            other @ (StoreError::Storage(_)
            | StoreError::PasswordHash(_)
            | StoreError::Database(_)) => ServerError::Internal(other.to_string()),
        }
    }
}

pub type ServerResult<T> = Result<T, ServerError>;
