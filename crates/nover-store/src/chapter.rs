//! Chapters and reader unlock records

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::Serialize;

use crate::book::Visibility;
use crate::error::StoreResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ChapterStatus {
    #[serde(rename = "D")]
    Draft,
    #[serde(rename = "P")]
    Published,
}

impl ChapterStatus {
    pub fn as_code(&self) -> &'static str {
        match self {
            ChapterStatus::Draft => "D",
            ChapterStatus::Published => "P",
        }
    }
}

impl ToSql for ChapterStatus {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(self.as_code().into())
    }
}

impl FromSql for ChapterStatus {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value.as_str()? {
            "D" => Ok(ChapterStatus::Draft),
            "P" => Ok(ChapterStatus::Published),
            other => Err(FromSqlError::Other(
                format!("unknown chapter status {other:?}").into(),
            )),
        }
    }
}

/// A full chapter including its body
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Chapter {
    pub chapter_id: i64,
    pub book_id: i64,
    pub title: String,
    pub content: Option<String>,
    pub chapter_order: i64,
    pub status: ChapterStatus,
    pub coin_cost: i64,
    pub total_views: i64,
    pub create_datetime: DateTime<Utc>,
    pub update_datetime: Option<DateTime<Utc>>,
}

impl Chapter {
    pub fn is_free(&self) -> bool {
        self.coin_cost == 0
    }
}

/// Chapter listing entry. Bodies are only served through the access gate.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChapterSummary {
    pub chapter_id: i64,
    pub book_id: i64,
    pub title: String,
    pub chapter_order: i64,
    pub status: ChapterStatus,
    pub coin_cost: i64,
    pub total_views: i64,
    pub create_datetime: DateTime<Utc>,
    pub update_datetime: Option<DateTime<Utc>>,
}

/// Fields supplied when adding a chapter; the order is assigned by the store
#[derive(Debug, Clone)]
pub struct NewChapter {
    pub book_id: i64,
    pub title: String,
    pub content: Option<String>,
    pub coin_cost: i64,
}

#[async_trait]
pub trait ChapterStore: Send + Sync {
    /// Insert a chapter at `max(chapter_order) + 1` for its book
    async fn create_chapter(&self, chapter: NewChapter) -> StoreResult<Chapter>;

    async fn count_by_book(&self, book_id: i64) -> StoreResult<i64>;

    async fn list_by_book(
        &self,
        book_id: i64,
        visibility: Visibility,
    ) -> StoreResult<Vec<ChapterSummary>>;

    async fn find_by_id(&self, chapter_id: i64) -> StoreResult<Option<Chapter>>;

    async fn is_unlocked(&self, user_id: i64, chapter_id: i64) -> StoreResult<bool>;

    /// Record that a reader paid for a chapter. Idempotent.
    async fn record_unlock(&self, user_id: i64, chapter_id: i64) -> StoreResult<()>;
}
