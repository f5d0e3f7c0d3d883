//! Static reference lists: genres and payout banks

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::StoreResult;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Genre {
    pub genre_id: i64,
    pub genre_name: String,
    pub genre_tl: String,
    pub remark: Option<String>,
    pub active_datetime: DateTime<Utc>,
    pub non_active_datetime: Option<DateTime<Utc>>,
    pub create_datetime: DateTime<Utc>,
    pub update_datetime: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Bank {
    pub bank_id: i64,
    pub bank_name: String,
    pub bank_code: Option<String>,
}

/// Read access to genres and banks. Both are soft-deactivated via
/// `non_active_datetime` and only active rows are returned.
#[async_trait]
pub trait ReferenceStore: Send + Sync {
    async fn list_active_genres(&self) -> StoreResult<Vec<Genre>>;

    async fn list_active_banks(&self) -> StoreResult<Vec<Bank>>;

    async fn find_active_bank(&self, bank_id: i64) -> StoreResult<Option<Bank>>;
}
