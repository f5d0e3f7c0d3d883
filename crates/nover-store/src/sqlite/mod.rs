//! SQLite persistence backend
//!
//! A single [`SqliteStore`] implements every store trait over one shared
//! connection, so joins across users, books and chapters see the same data.

mod books;
mod chapters;
mod reference;
mod reviews;
mod schema;
mod users;

use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use rusqlite::Connection;

use crate::error::{StoreError, StoreResult};

pub use schema::{SCHEMA_VERSION, check_version, init_schema, seed_reference_data};

/// SQLite-backed store for users, catalog and unlock records
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open or create a database at the given path
    pub fn open(path: &str) -> StoreResult<Self> {
        Self::from_connection(Connection::open(path)?)
    }

    /// Create an in-memory database (for testing)
    pub fn in_memory() -> StoreResult<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> StoreResult<Self> {
        conn.pragma_update(None, "foreign_keys", true)?;
        init_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Insert the default genre and bank lists into empty tables.
    ///
    /// Returns the number of rows inserted.
    pub fn seed_reference_data(&self) -> StoreResult<usize> {
        let conn = self.conn()?;
        seed_reference_data(&conn)
    }

    /// Run a closure against the raw connection (fixtures and maintenance)
    pub fn with_connection<T>(
        &self,
        f: impl FnOnce(&Connection) -> rusqlite::Result<T>,
    ) -> StoreResult<T> {
        let conn = self.conn()?;
        Ok(f(&conn)?)
    }

    fn conn(&self) -> StoreResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| StoreError::Storage("connection mutex poisoned".into()))
    }

    fn now() -> DateTime<Utc> {
        Utc::now()
    }
}

/// Split a `group_concat(.., char(31))` column into sorted names
fn split_names(raw: Option<String>) -> Vec<String> {
    let mut names: Vec<String> = raw
        .map(|s| s.split('\u{1f}').map(str::to_owned).collect())
        .unwrap_or_default();
    names.sort();
    names
}
