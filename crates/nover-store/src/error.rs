//! Store error types

use thiserror::Error;

pub type StoreResult<T> = Result<T, StoreError>;

/// Unique columns a registration or profile update can collide on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniqueField {
    EmailOrUsername,
    PenName,
}

/// Publication workflow preconditions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowViolation {
    /// Publishing requires at least one chapter
    NoChapters,
    /// Unpublish/complete only apply to a published book
    NotPublished,
}

/// Why paid chapter content was withheld
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentLock {
    LoginRequired,
    UnlockRequired,
}

impl ContentLock {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentLock::LoginRequired => "login_required",
            ContentLock::UnlockRequired => "unlock_required",
        }
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Already taken: {0:?}")]
    AlreadyExists(UniqueField),

    #[error("Invalid state: {0:?}")]
    InvalidState(WorkflowViolation),

    #[error("Content locked: {}", .0.as_str())]
    Locked(ContentLock),

    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Input required: {0}")]
    InputRequired(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Password hash error: {0}")]
    PasswordHash(String),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
}

impl StoreError {
    /// True when the underlying SQLite error is a UNIQUE constraint violation
    pub fn is_unique_violation(&self) -> bool {
        matches!(
            self,
            StoreError::Database(rusqlite::Error::SqliteFailure(e, _))
                if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
        )
    }
}
