//! SQLite book store

use async_trait::async_trait;
use rusqlite::{OptionalExtension, Row, params};

use super::{SqliteStore, split_names};
use crate::book::{Book, BookOwnership, BookStatus, BookStore, NewBook, Visibility};
use crate::error::{StoreError, StoreResult};

/// Book columns with owner, owner pen name and concatenated genre names
const BOOK_SELECT: &str = r#"
    SELECT
        b.book_id, b.title, b.description, b.cover_image_url, b.status,
        b.rating_average, b.total_views, b.create_datetime, b.update_datetime,
        ab.user_id, u.pen_name,
        (SELECT group_concat(g.genre_name, char(31))
           FROM book_genres bg
           JOIN genres g ON g.genre_id = bg.genre_id
          WHERE bg.book_id = b.book_id) AS genres
    FROM books b
    JOIN author_books ab ON ab.book_id = b.book_id
    JOIN users u ON u.user_id = ab.user_id
"#;

fn book_from_row(row: &Row<'_>) -> rusqlite::Result<Book> {
    Ok(Book {
        book_id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        cover_image_url: row.get(3)?,
        status: row.get(4)?,
        rating_average: row.get(5)?,
        total_views: row.get(6)?,
        create_datetime: row.get(7)?,
        update_datetime: row.get(8)?,
        author_id: row.get(9)?,
        author_pen_name: row.get(10)?,
        genres: split_names(row.get(11)?),
    })
}

impl SqliteStore {
    fn select_books(
        &self,
        tail: &str,
        params: impl rusqlite::Params,
    ) -> StoreResult<Vec<Book>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!("{BOOK_SELECT} {tail}"))?;
        let books = stmt
            .query_map(params, book_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(books)
    }
}

#[async_trait]
impl BookStore for SqliteStore {
    async fn create_book(
        &self,
        book: NewBook,
        author_id: i64,
        genre_ids: &[i64],
    ) -> StoreResult<Book> {
        let created = {
            let mut conn = self.conn()?;
            let tx = conn.transaction()?;
            let now = Self::now();

            tx.execute(
                r#"INSERT INTO books (title, description, cover_image_url, status, create_datetime)
                   VALUES (?1, ?2, ?3, ?4, ?5)"#,
                params![
                    book.title,
                    book.description,
                    book.cover_image_url,
                    BookStatus::Draft,
                    now
                ],
            )?;
            let book_id = tx.last_insert_rowid();

            tx.execute(
                "INSERT INTO author_books (user_id, book_id) VALUES (?1, ?2)",
                params![author_id, book_id],
            )?;

            {
                let mut stmt =
                    tx.prepare("INSERT INTO book_genres (book_id, genre_id) VALUES (?1, ?2)")?;
                for genre_id in genre_ids {
                    stmt.execute(params![book_id, genre_id])?;
                }
            }

            // Dropping `tx` without commit rolls everything back on any `?` above
            tx.commit()?;
            book_id
        };

        tracing::debug!(book_id = created, author_id, "Inserted book");

        self.find_detail(created)
            .await?
            .ok_or_else(|| StoreError::Storage(format!("Book {created} vanished after insert")))
    }

    async fn find_ownership(&self, book_id: i64) -> StoreResult<Option<BookOwnership>> {
        let conn = self.conn()?;
        let ownership = conn
            .query_row(
                r#"SELECT b.book_id, b.title, b.status, ab.user_id
                   FROM books b
                   JOIN author_books ab ON ab.book_id = b.book_id
                   WHERE b.book_id = ?1
                   ORDER BY ab.rowid
                   LIMIT 1"#,
                [book_id],
                |row| {
                    Ok(BookOwnership {
                        book_id: row.get(0)?,
                        title: row.get(1)?,
                        status: row.get(2)?,
                        author_id: row.get(3)?,
                    })
                },
            )
            .optional()?;
        Ok(ownership)
    }

    async fn find_detail(&self, book_id: i64) -> StoreResult<Option<Book>> {
        let mut books = self.select_books("WHERE b.book_id = ?1 LIMIT 1", [book_id])?;
        Ok(books.pop())
    }

    async fn list_by_author(
        &self,
        author_id: i64,
        visibility: Visibility,
    ) -> StoreResult<Vec<Book>> {
        let status_filter = match visibility {
            Visibility::Public => "AND b.status <> 'D'",
            Visibility::Owner => "",
        };
        self.select_books(
            &format!(
                "WHERE ab.user_id = ?1 {status_filter} \
                 ORDER BY b.update_datetime DESC NULLS LAST, b.create_datetime DESC, b.book_id DESC"
            ),
            [author_id],
        )
    }

    async fn list_published(&self, limit: i64, offset: i64) -> StoreResult<Vec<Book>> {
        self.select_books(
            "WHERE b.status <> 'D' \
             ORDER BY b.create_datetime DESC, b.book_id DESC \
             LIMIT ?1 OFFSET ?2",
            params![limit, offset],
        )
    }

    async fn count_published(&self) -> StoreResult<i64> {
        let conn = self.conn()?;
        let count = conn.query_row(
            "SELECT COUNT(*) FROM books WHERE status <> 'D'",
            [],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    async fn update_status(&self, book_id: i64, status: BookStatus) -> StoreResult<()> {
        let conn = self.conn()?;
        let updated = conn.execute(
            "UPDATE books SET status = ?1, update_datetime = ?2 WHERE book_id = ?3",
            params![status, Self::now(), book_id],
        )?;

        if updated != 1 {
            return Err(StoreError::Storage(format!(
                "Book {book_id} not found or status unchanged"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::user::{NewUser, UserStore};

    async fn setup() -> (SqliteStore, i64) {
        let store = SqliteStore::in_memory().unwrap();
        store.seed_reference_data().unwrap();
        let author = store
            .insert_user(NewUser {
                user_code: "code-author".into(),
                email: "author@example.com".into(),
                password_hash: "hash".into(),
                full_name: "Author".into(),
                username: "author".into(),
                pen_name: Some("Quill".into()),
                phone: None,
                instagram: None,
            })
            .await
            .unwrap();
        (store, author)
    }

    fn new_book(title: &str) -> NewBook {
        NewBook {
            title: title.into(),
            description: Some("A story".into()),
            cover_image_url: None,
        }
    }

    fn book_count(store: &SqliteStore) -> i64 {
        store
            .with_connection(|c| c.query_row("SELECT COUNT(*) FROM books", [], |r| r.get(0)))
            .unwrap()
    }

    #[tokio::test]
    async fn test_create_book_with_genres() {
        let (store, author) = setup().await;

        let book = store
            .create_book(new_book("First"), author, &[1, 2])
            .await
            .unwrap();

        assert_eq!(book.title, "First");
        assert_eq!(book.status, BookStatus::Draft);
        assert_eq!(book.author_id, author);
        assert_eq!(book.author_pen_name.as_deref(), Some("Quill"));
        assert_eq!(book.genres.len(), 2);

        let ownership = store.find_ownership(book.book_id).await.unwrap().unwrap();
        assert_eq!(ownership.author_id, author);
        assert_eq!(ownership.status, BookStatus::Draft);
    }

    #[tokio::test]
    async fn test_create_book_rolls_back_on_unknown_genre() {
        let (store, author) = setup().await;

        let err = store
            .create_book(new_book("Broken"), author, &[1, 9999])
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Database(_)));
        assert_eq!(book_count(&store), 0);
    }

    #[tokio::test]
    async fn test_published_listing_hides_drafts() {
        let (store, author) = setup().await;

        let draft = store.create_book(new_book("Draft"), author, &[1]).await.unwrap();
        let live = store.create_book(new_book("Live"), author, &[1]).await.unwrap();
        store
            .update_status(live.book_id, BookStatus::Published)
            .await
            .unwrap();

        let listed = store.list_published(10, 0).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].book_id, live.book_id);
        assert_eq!(store.count_published().await.unwrap(), 1);

        let public = store.list_by_author(author, Visibility::Public).await.unwrap();
        assert_eq!(public.len(), 1);

        let own = store.list_by_author(author, Visibility::Owner).await.unwrap();
        assert_eq!(own.len(), 2);
        assert!(own.iter().any(|b| b.book_id == draft.book_id));
    }

    #[tokio::test]
    async fn test_update_status_missing_book() {
        let (store, _) = setup().await;
        let err = store
            .update_status(404, BookStatus::Published)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Storage(_)));
    }

    #[tokio::test]
    async fn test_find_missing_book() {
        let (store, _) = setup().await;
        assert!(store.find_ownership(1).await.unwrap().is_none());
        assert!(store.find_detail(1).await.unwrap().is_none());
    }
}
