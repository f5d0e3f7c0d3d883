//! SQLite genre and bank lookups

use async_trait::async_trait;
use rusqlite::{OptionalExtension, Row};

use super::SqliteStore;
use crate::error::StoreResult;
use crate::reference::{Bank, Genre, ReferenceStore};

fn genre_from_row(row: &Row<'_>) -> rusqlite::Result<Genre> {
    Ok(Genre {
        genre_id: row.get(0)?,
        genre_name: row.get(1)?,
        genre_tl: row.get(2)?,
        remark: row.get(3)?,
        active_datetime: row.get(4)?,
        non_active_datetime: row.get(5)?,
        create_datetime: row.get(6)?,
        update_datetime: row.get(7)?,
    })
}

fn bank_from_row(row: &Row<'_>) -> rusqlite::Result<Bank> {
    Ok(Bank {
        bank_id: row.get(0)?,
        bank_name: row.get(1)?,
        bank_code: row.get(2)?,
    })
}

#[async_trait]
impl ReferenceStore for SqliteStore {
    async fn list_active_genres(&self) -> StoreResult<Vec<Genre>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            r#"SELECT genre_id, genre_name, genre_tl, remark, active_datetime,
                      non_active_datetime, create_datetime, update_datetime
               FROM genres
               WHERE non_active_datetime IS NULL
               ORDER BY genre_name ASC"#,
        )?;
        let genres = stmt
            .query_map([], genre_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(genres)
    }

    async fn list_active_banks(&self) -> StoreResult<Vec<Bank>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            r#"SELECT bank_id, bank_name, bank_code FROM banks
               WHERE non_active_datetime IS NULL
               ORDER BY bank_name ASC"#,
        )?;
        let banks = stmt
            .query_map([], bank_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(banks)
    }

    async fn find_active_bank(&self, bank_id: i64) -> StoreResult<Option<Bank>> {
        let conn = self.conn()?;
        let bank = conn
            .query_row(
                r#"SELECT bank_id, bank_name, bank_code FROM banks
                   WHERE bank_id = ?1 AND non_active_datetime IS NULL"#,
                [bank_id],
                bank_from_row,
            )
            .optional()?;
        Ok(bank)
    }
}
