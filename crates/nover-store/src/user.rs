//! Users, credentials and the author upgrade

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::Serialize;

use crate::error::StoreResult;

/// Whether a user has completed the author upgrade (`N`/`Y` column)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum AuthorFlag {
    #[default]
    #[serde(rename = "N")]
    No,
    #[serde(rename = "Y")]
    Yes,
}

impl AuthorFlag {
    pub fn as_code(&self) -> &'static str {
        match self {
            AuthorFlag::No => "N",
            AuthorFlag::Yes => "Y",
        }
    }
}

impl ToSql for AuthorFlag {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(self.as_code().into())
    }
}

impl FromSql for AuthorFlag {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value.as_str()? {
            "Y" => Ok(AuthorFlag::Yes),
            "N" => Ok(AuthorFlag::No),
            other => Err(FromSqlError::Other(
                format!("unknown author flag {other:?}").into(),
            )),
        }
    }
}

/// A user profile as exposed to clients. Never carries the password hash.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub user_id: i64,
    pub user_code: String,
    pub email: String,
    pub full_name: String,
    pub username: String,
    pub pen_name: Option<String>,
    pub avatar_url: String,
    pub login_with: String,
    pub is_email_verified: bool,
    pub phone: Option<String>,
    pub instagram: Option<String>,
    pub bank_id: Option<i64>,
    pub account_number: Option<String>,
    pub flg_author: AuthorFlag,
    pub create_datetime: DateTime<Utc>,
    pub update_datetime: Option<DateTime<Utc>>,
}

impl User {
    pub fn is_author(&self) -> bool {
        self.flg_author == AuthorFlag::Yes
    }
}

/// A user together with the stored password hash, used only by login
#[derive(Debug, Clone)]
pub struct Credentials {
    pub user: User,
    pub password_hash: String,
}

/// Public author fields shown next to books and reviews
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorSummary {
    pub user_id: i64,
    pub pen_name: Option<String>,
    pub avatar_url: String,
}

impl From<&User> for AuthorSummary {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.user_id,
            pen_name: user.pen_name.clone(),
            avatar_url: user.avatar_url.clone(),
        }
    }
}

/// Row data for a registration insert
#[derive(Debug, Clone)]
pub struct NewUser {
    pub user_code: String,
    pub email: String,
    pub password_hash: String,
    pub full_name: String,
    pub username: String,
    pub pen_name: Option<String>,
    pub phone: Option<String>,
    pub instagram: Option<String>,
}

/// Fields written when a user becomes an author
#[derive(Debug, Clone)]
pub struct AuthorProfile {
    pub pen_name: String,
    pub phone: String,
    pub instagram: Option<String>,
    pub bank_id: i64,
    pub account_number: String,
}

/// Access to the users table
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a user and return the generated id
    async fn insert_user(&self, user: NewUser) -> StoreResult<i64>;

    async fn find_by_id(&self, user_id: i64) -> StoreResult<Option<User>>;

    async fn find_by_username(&self, username: &str) -> StoreResult<Option<User>>;

    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>>;

    /// Look up a local-login user with the password hash attached
    async fn credentials_for(&self, username: &str) -> StoreResult<Option<Credentials>>;

    /// Check whether a pen name is held by anyone other than `except_user`
    async fn is_pen_name_taken(&self, pen_name: &str, except_user: Option<i64>)
    -> StoreResult<bool>;

    /// Set the author flag and payout fields.
    ///
    /// Returns `StoreError::NotFound` unless exactly one row was updated.
    async fn update_to_author(&self, user_id: i64, profile: &AuthorProfile) -> StoreResult<()>;
}
