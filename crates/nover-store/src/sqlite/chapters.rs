//! SQLite chapter store

use async_trait::async_trait;
use rusqlite::{OptionalExtension, Row, params};

use super::SqliteStore;
use crate::book::Visibility;
use crate::chapter::{Chapter, ChapterStatus, ChapterStore, ChapterSummary, NewChapter};
use crate::error::{StoreError, StoreResult};

const CHAPTER_COLUMNS: &str = "chapter_id, book_id, title, chapter_order, status, coin_cost, \
     total_views, create_datetime, update_datetime, content";

fn summary_from_row(row: &Row<'_>) -> rusqlite::Result<ChapterSummary> {
    Ok(ChapterSummary {
        chapter_id: row.get(0)?,
        book_id: row.get(1)?,
        title: row.get(2)?,
        chapter_order: row.get(3)?,
        status: row.get(4)?,
        coin_cost: row.get(5)?,
        total_views: row.get(6)?,
        create_datetime: row.get(7)?,
        update_datetime: row.get(8)?,
    })
}

fn chapter_from_row(row: &Row<'_>) -> rusqlite::Result<Chapter> {
    let summary = summary_from_row(row)?;
    Ok(Chapter {
        chapter_id: summary.chapter_id,
        book_id: summary.book_id,
        title: summary.title,
        content: row.get(9)?,
        chapter_order: summary.chapter_order,
        status: summary.status,
        coin_cost: summary.coin_cost,
        total_views: summary.total_views,
        create_datetime: summary.create_datetime,
        update_datetime: summary.update_datetime,
    })
}

fn max_order(conn: &rusqlite::Connection, book_id: i64) -> rusqlite::Result<i64> {
    conn.query_row(
        "SELECT COALESCE(MAX(chapter_order), 0) FROM chapters WHERE book_id = ?1",
        [book_id],
        |row| row.get(0),
    )
}

#[async_trait]
impl ChapterStore for SqliteStore {
    async fn create_chapter(&self, chapter: NewChapter) -> StoreResult<Chapter> {
        if chapter.coin_cost < 0 {
            return Err(StoreError::InvalidInput("Coin cost cannot be negative".into()));
        }

        let mut conn = self.conn()?;
        let tx = conn.transaction()?;

        let order = max_order(&tx, chapter.book_id)? + 1;
        tx.execute(
            r#"INSERT INTO chapters
               (book_id, title, content, chapter_order, status, coin_cost, create_datetime)
               VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)"#,
            params![
                chapter.book_id,
                chapter.title,
                chapter.content,
                order,
                ChapterStatus::Published,
                chapter.coin_cost,
                Self::now(),
            ],
        )?;
        let chapter_id = tx.last_insert_rowid();

        let created = tx.query_row(
            &format!("SELECT {CHAPTER_COLUMNS} FROM chapters WHERE chapter_id = ?1"),
            [chapter_id],
            chapter_from_row,
        )?;
        tx.commit()?;

        Ok(created)
    }

    async fn count_by_book(&self, book_id: i64) -> StoreResult<i64> {
        let conn = self.conn()?;
        let count = conn.query_row(
            "SELECT COUNT(*) FROM chapters WHERE book_id = ?1",
            [book_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    async fn list_by_book(
        &self,
        book_id: i64,
        _visibility: Visibility,
    ) -> StoreResult<Vec<ChapterSummary>> {
        // TODO: confirm with the product owner whether public listings should
        // drop draft chapters; until then both audiences get every chapter.
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {CHAPTER_COLUMNS} FROM chapters WHERE book_id = ?1 ORDER BY chapter_order ASC"
        ))?;
        let chapters = stmt
            .query_map([book_id], summary_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(chapters)
    }

    async fn find_by_id(&self, chapter_id: i64) -> StoreResult<Option<Chapter>> {
        let conn = self.conn()?;
        let chapter = conn
            .query_row(
                &format!("SELECT {CHAPTER_COLUMNS} FROM chapters WHERE chapter_id = ?1"),
                [chapter_id],
                chapter_from_row,
            )
            .optional()?;
        Ok(chapter)
    }

    async fn is_unlocked(&self, user_id: i64, chapter_id: i64) -> StoreResult<bool> {
        let conn = self.conn()?;
        let unlocked = conn.query_row(
            r#"SELECT EXISTS (
                   SELECT 1 FROM user_unlocked_chapters
                   WHERE user_id = ?1 AND chapter_id = ?2
               )"#,
            params![user_id, chapter_id],
            |row| row.get(0),
        )?;
        Ok(unlocked)
    }

    async fn record_unlock(&self, user_id: i64, chapter_id: i64) -> StoreResult<()> {
        let conn = self.conn()?;
        conn.execute(
            r#"INSERT OR IGNORE INTO user_unlocked_chapters (user_id, chapter_id, create_datetime)
               VALUES (?1, ?2, ?3)"#,
            params![user_id, chapter_id, Self::now()],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::book::{BookStore, NewBook};
    use crate::user::{NewUser, UserStore};

    async fn setup() -> (SqliteStore, i64, i64) {
        let store = SqliteStore::in_memory().unwrap();
        store.seed_reference_data().unwrap();
        let author = store
            .insert_user(NewUser {
                user_code: "c1".into(),
                email: "a@example.com".into(),
                password_hash: "hash".into(),
                full_name: "A".into(),
                username: "author".into(),
                pen_name: None,
                phone: None,
                instagram: None,
            })
            .await
            .unwrap();
        let book = store
            .create_book(
                NewBook {
                    title: "Book".into(),
                    description: None,
                    cover_image_url: None,
                },
                author,
                &[1],
            )
            .await
            .unwrap();
        (store, author, book.book_id)
    }

    fn chapter(book_id: i64, title: &str, coin_cost: i64) -> NewChapter {
        NewChapter {
            book_id,
            title: title.into(),
            content: Some(format!("{title} body")),
            coin_cost,
        }
    }

    #[tokio::test]
    async fn test_order_starts_at_one_and_increments() {
        let (store, _, book_id) = setup().await;
        assert_eq!(store.with_connection(|c| max_order(c, book_id)).unwrap(), 0);

        let first = store.create_chapter(chapter(book_id, "One", 0)).await.unwrap();
        let second = store.create_chapter(chapter(book_id, "Two", 5)).await.unwrap();

        assert_eq!(first.chapter_order, 1);
        assert_eq!(second.chapter_order, 2);
        assert_eq!(store.with_connection(|c| max_order(c, book_id)).unwrap(), 2);
        assert_eq!(store.count_by_book(book_id).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_listing_omits_content_and_is_ordered() {
        let (store, _, book_id) = setup().await;
        store.create_chapter(chapter(book_id, "One", 0)).await.unwrap();
        store.create_chapter(chapter(book_id, "Two", 0)).await.unwrap();

        let listed = store.list_by_book(book_id, Visibility::Public).await.unwrap();
        let titles: Vec<_> = listed.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, vec!["One", "Two"]);
    }

    #[tokio::test]
    async fn test_negative_coin_cost_rejected() {
        let (store, _, book_id) = setup().await;
        let err = store
            .create_chapter(chapter(book_id, "Bad", -1))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_unlock_is_idempotent() {
        let (store, author, book_id) = setup().await;
        let paid = store.create_chapter(chapter(book_id, "Paid", 10)).await.unwrap();

        assert!(!store.is_unlocked(author, paid.chapter_id).await.unwrap());
        store.record_unlock(author, paid.chapter_id).await.unwrap();
        store.record_unlock(author, paid.chapter_id).await.unwrap();
        assert!(store.is_unlocked(author, paid.chapter_id).await.unwrap());
    }
}
