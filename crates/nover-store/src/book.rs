//! Books and their lifecycle status

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::Serialize;

use crate::error::{StoreResult, WorkflowViolation};

/// Book lifecycle status, stored as a single-letter code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BookStatus {
    #[serde(rename = "D")]
    Draft,
    #[serde(rename = "P")]
    Published,
    #[serde(rename = "C")]
    Completed,
    #[serde(rename = "H")]
    Hold,
}

impl BookStatus {
    pub fn as_code(&self) -> &'static str {
        match self {
            BookStatus::Draft => "D",
            BookStatus::Published => "P",
            BookStatus::Completed => "C",
            BookStatus::Hold => "H",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "D" => Some(BookStatus::Draft),
            "P" => Some(BookStatus::Published),
            "C" => Some(BookStatus::Completed),
            "H" => Some(BookStatus::Hold),
            _ => None,
        }
    }

    /// Everything except drafts is visible to readers
    pub fn is_public(&self) -> bool {
        *self != BookStatus::Draft
    }
}

impl ToSql for BookStatus {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(self.as_code().into())
    }
}

impl FromSql for BookStatus {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let code = value.as_str()?;
        BookStatus::from_code(code)
            .ok_or_else(|| FromSqlError::Other(format!("unknown book status {code:?}").into()))
    }
}

/// Owner-initiated status changes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Publish,
    Unpublish,
    Complete,
    Hold,
}

impl Transition {
    pub fn as_str(&self) -> &'static str {
        match self {
            Transition::Publish => "publish",
            Transition::Unpublish => "unpublish",
            Transition::Complete => "complete",
            Transition::Hold => "hold",
        }
    }

    pub fn target(&self) -> BookStatus {
        match self {
            Transition::Publish => BookStatus::Published,
            Transition::Unpublish => BookStatus::Draft,
            Transition::Complete => BookStatus::Completed,
            Transition::Hold => BookStatus::Hold,
        }
    }

    /// Whether the guard needs the book's chapter count
    pub fn needs_chapter_count(&self) -> bool {
        matches!(self, Transition::Publish)
    }

    /// Apply the transition guard and return the resulting status.
    ///
    /// Hold is accepted from any status.
    pub fn check(
        &self,
        current: BookStatus,
        chapter_count: i64,
    ) -> Result<BookStatus, WorkflowViolation> {
        match self {
            Transition::Publish if chapter_count == 0 => Err(WorkflowViolation::NoChapters),
            Transition::Unpublish | Transition::Complete if current != BookStatus::Published => {
                Err(WorkflowViolation::NotPublished)
            }
            _ => Ok(self.target()),
        }
    }
}

/// A book row with its derived genre names
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub book_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub cover_image_url: Option<String>,
    pub status: BookStatus,
    pub rating_average: f64,
    pub total_views: i64,
    pub create_datetime: DateTime<Utc>,
    pub update_datetime: Option<DateTime<Utc>>,
    pub genres: Vec<String>,
    pub author_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author_pen_name: Option<String>,
}

/// Fields supplied when creating a book
#[derive(Debug, Clone)]
pub struct NewBook {
    pub title: String,
    pub description: Option<String>,
    pub cover_image_url: Option<String>,
}

/// Minimal projection used by ownership checks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookOwnership {
    pub book_id: i64,
    pub title: String,
    pub status: BookStatus,
    pub author_id: i64,
}

/// Who a listing is for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    /// Readers: drafts hidden
    Public,
    /// The owning author: everything
    Owner,
}

/// Access to books and their author/genre associations
#[async_trait]
pub trait BookStore: Send + Sync {
    /// Insert the book, its author link and its genre links atomically
    async fn create_book(
        &self,
        book: NewBook,
        author_id: i64,
        genre_ids: &[i64],
    ) -> StoreResult<Book>;

    /// Resolve a book and its single owning author
    async fn find_ownership(&self, book_id: i64) -> StoreResult<Option<BookOwnership>>;

    async fn find_detail(&self, book_id: i64) -> StoreResult<Option<Book>>;

    async fn list_by_author(&self, author_id: i64, visibility: Visibility)
    -> StoreResult<Vec<Book>>;

    /// Non-draft books, newest first
    async fn list_published(&self, limit: i64, offset: i64) -> StoreResult<Vec<Book>>;

    async fn count_published(&self) -> StoreResult<i64>;

    /// Returns `StoreError::Storage` unless exactly one row changed
    async fn update_status(&self, book_id: i64, status: BookStatus) -> StoreResult<()>;
}
