//! SQLite schema definitions

use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, params};

use crate::error::StoreResult;

pub const SCHEMA_VERSION: u32 = 1;

const DEFAULT_GENRES: &[(&str, &str)] = &[
    ("Comedy", "Komedi"),
    ("Drama", "Drama"),
    ("Fantasy", "Fantasi"),
    ("Horror", "Horor"),
    ("Mystery", "Misteri"),
    ("Romance", "Romansa"),
    ("Science Fiction", "Fiksi Ilmiah"),
];

const DEFAULT_BANKS: &[(&str, &str)] = &[
    ("Bank Central Asia", "014"),
    ("Bank Mandiri", "008"),
    ("Bank Negara Indonesia", "009"),
    ("Bank Rakyat Indonesia", "002"),
    ("CIMB Niaga", "022"),
];

/// Initialize the database schema
pub fn init_schema(conn: &Connection) -> StoreResult<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY
        );

        CREATE TABLE IF NOT EXISTS banks (
            bank_id INTEGER PRIMARY KEY AUTOINCREMENT,
            bank_name TEXT NOT NULL,
            bank_code TEXT,
            remark TEXT,
            active_datetime TEXT NOT NULL,
            non_active_datetime TEXT,              -- NULL = active
            create_datetime TEXT NOT NULL,
            update_datetime TEXT
        );

        CREATE TABLE IF NOT EXISTS users (
            user_id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_code TEXT NOT NULL UNIQUE,
            email TEXT NOT NULL UNIQUE,
            password TEXT NOT NULL,                -- argon2 PHC string
            full_name TEXT NOT NULL DEFAULT '',
            username TEXT NOT NULL UNIQUE,
            pen_name TEXT UNIQUE,
            avatar_url TEXT NOT NULL DEFAULT '',
            login_with TEXT NOT NULL DEFAULT 'local',
            is_email_verified INTEGER NOT NULL DEFAULT 0,
            phone TEXT,
            instagram TEXT,
            bank_id INTEGER REFERENCES banks(bank_id),
            account_number TEXT,
            flg_author TEXT NOT NULL DEFAULT 'N' CHECK (flg_author IN ('N', 'Y')),
            create_datetime TEXT NOT NULL,
            update_datetime TEXT
        );

        CREATE TABLE IF NOT EXISTS genres (
            genre_id INTEGER PRIMARY KEY AUTOINCREMENT,
            genre_name TEXT NOT NULL UNIQUE,
            genre_tl TEXT NOT NULL DEFAULT '',
            remark TEXT,
            active_datetime TEXT NOT NULL,
            non_active_datetime TEXT,              -- NULL = active
            create_datetime TEXT NOT NULL,
            update_datetime TEXT
        );

        CREATE TABLE IF NOT EXISTS books (
            book_id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            description TEXT,
            cover_image_url TEXT,
            status TEXT NOT NULL DEFAULT 'D' CHECK (status IN ('D', 'P', 'C', 'H')),
            rating_average REAL NOT NULL DEFAULT 0,
            total_views INTEGER NOT NULL DEFAULT 0,
            create_datetime TEXT NOT NULL,
            update_datetime TEXT
        );

        CREATE INDEX IF NOT EXISTS idx_books_status
            ON books(status);

        CREATE TABLE IF NOT EXISTS author_books (
            user_id INTEGER NOT NULL REFERENCES users(user_id),
            book_id INTEGER NOT NULL REFERENCES books(book_id),
            PRIMARY KEY (user_id, book_id)
        );

        CREATE INDEX IF NOT EXISTS idx_author_books_book
            ON author_books(book_id);

        CREATE TABLE IF NOT EXISTS book_genres (
            book_id INTEGER NOT NULL REFERENCES books(book_id),
            genre_id INTEGER NOT NULL REFERENCES genres(genre_id),
            PRIMARY KEY (book_id, genre_id)
        );

        CREATE TABLE IF NOT EXISTS chapters (
            chapter_id INTEGER PRIMARY KEY AUTOINCREMENT,
            book_id INTEGER NOT NULL REFERENCES books(book_id),
            title TEXT NOT NULL,
            content TEXT,
            chapter_order INTEGER NOT NULL,
            status TEXT NOT NULL DEFAULT 'P' CHECK (status IN ('D', 'P')),
            coin_cost INTEGER NOT NULL DEFAULT 0 CHECK (coin_cost >= 0),
            total_views INTEGER NOT NULL DEFAULT 0,
            create_datetime TEXT NOT NULL,
            update_datetime TEXT,
            UNIQUE (book_id, chapter_order)
        );

        CREATE TABLE IF NOT EXISTS reviews (
            review_id INTEGER PRIMARY KEY AUTOINCREMENT,
            book_id INTEGER NOT NULL REFERENCES books(book_id),
            user_id INTEGER NOT NULL REFERENCES users(user_id),
            rating INTEGER NOT NULL CHECK (rating BETWEEN 1 AND 5),
            review_text TEXT,
            create_datetime TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_reviews_book
            ON reviews(book_id);

        CREATE TABLE IF NOT EXISTS user_unlocked_chapters (
            user_id INTEGER NOT NULL REFERENCES users(user_id),
            chapter_id INTEGER NOT NULL REFERENCES chapters(chapter_id),
            create_datetime TEXT NOT NULL,
            PRIMARY KEY (user_id, chapter_id)
        );
    "#,
    )?;

    conn.execute(
        "INSERT OR REPLACE INTO schema_version (version) VALUES (?)",
        [SCHEMA_VERSION],
    )?;

    Ok(())
}

/// Check schema version
pub fn check_version(conn: &Connection) -> StoreResult<u32> {
    let version: Option<u32> = conn
        .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
            row.get(0)
        })
        .optional()?;
    Ok(version.unwrap_or(0))
}

/// Insert default genres and banks when their tables are empty
pub fn seed_reference_data(conn: &Connection) -> StoreResult<usize> {
    let now = Utc::now();
    let mut inserted = 0;

    let genres: i64 = conn.query_row("SELECT COUNT(*) FROM genres", [], |row| row.get(0))?;
    if genres == 0 {
        for (name, tl) in DEFAULT_GENRES {
            inserted += conn.execute(
                "INSERT INTO genres (genre_name, genre_tl, active_datetime, create_datetime)
                 VALUES (?1, ?2, ?3, ?3)",
                params![name, tl, now],
            )?;
        }
    }

    let banks: i64 = conn.query_row("SELECT COUNT(*) FROM banks", [], |row| row.get(0))?;
    if banks == 0 {
        for (name, code) in DEFAULT_BANKS {
            inserted += conn.execute(
                "INSERT INTO banks (bank_name, bank_code, active_datetime, create_datetime)
                 VALUES (?1, ?2, ?3, ?3)",
                params![name, code, now],
            )?;
        }
    }

    if inserted > 0 {
        tracing::info!(rows = inserted, "Seeded reference data");
    }

    Ok(inserted)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_schema() {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();

        let version = check_version(&conn).unwrap();
        assert_eq!(version, SCHEMA_VERSION);
    }

    #[test]
    fn test_init_schema_is_repeatable() {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        init_schema(&conn).unwrap();
        assert_eq!(check_version(&conn).unwrap(), SCHEMA_VERSION);
    }

    #[test]
    fn test_seed_only_into_empty_tables() {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();

        let first = seed_reference_data(&conn).unwrap();
        assert_eq!(first, DEFAULT_GENRES.len() + DEFAULT_BANKS.len());

        let second = seed_reference_data(&conn).unwrap();
        assert_eq!(second, 0);
    }
}
