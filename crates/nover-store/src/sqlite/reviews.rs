//! SQLite review store

use async_trait::async_trait;
use rusqlite::{Row, params};

use super::SqliteStore;
use crate::error::{StoreError, StoreResult};
use crate::review::{MAX_RATING, MIN_RATING, NewReview, Review, ReviewStore};

const REVIEW_SELECT: &str = r#"
    SELECT r.review_id, r.book_id, r.user_id, u.username, u.pen_name, u.avatar_url,
           r.rating, r.review_text, r.create_datetime
    FROM reviews r
    JOIN users u ON u.user_id = r.user_id
"#;

fn review_from_row(row: &Row<'_>) -> rusqlite::Result<Review> {
    Ok(Review {
        review_id: row.get(0)?,
        book_id: row.get(1)?,
        user_id: row.get(2)?,
        username: row.get(3)?,
        pen_name: row.get(4)?,
        avatar_url: row.get(5)?,
        rating: row.get(6)?,
        review_text: row.get(7)?,
        create_datetime: row.get(8)?,
    })
}

#[async_trait]
impl ReviewStore for SqliteStore {
    async fn add_review(&self, review: NewReview) -> StoreResult<Review> {
        if !(MIN_RATING..=MAX_RATING).contains(&review.rating) {
            return Err(StoreError::InvalidInput(format!(
                "Rating must be between {MIN_RATING} and {MAX_RATING}"
            )));
        }

        let mut conn = self.conn()?;
        let tx = conn.transaction()?;

        tx.execute(
            r#"INSERT INTO reviews (book_id, user_id, rating, review_text, create_datetime)
               VALUES (?1, ?2, ?3, ?4, ?5)"#,
            params![
                review.book_id,
                review.user_id,
                review.rating,
                review.review_text,
                Self::now(),
            ],
        )?;
        let review_id = tx.last_insert_rowid();

        tx.execute(
            r#"UPDATE books
               SET rating_average = (SELECT AVG(rating) FROM reviews WHERE book_id = ?1)
               WHERE book_id = ?1"#,
            [review.book_id],
        )?;

        let created = tx.query_row(
            &format!("{REVIEW_SELECT} WHERE r.review_id = ?1"),
            [review_id],
            review_from_row,
        )?;
        tx.commit()?;

        Ok(created)
    }

    async fn list_by_book(&self, book_id: i64) -> StoreResult<Vec<Review>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "{REVIEW_SELECT} WHERE r.book_id = ?1 ORDER BY r.create_datetime DESC, r.review_id DESC"
        ))?;
        let reviews = stmt
            .query_map([book_id], review_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(reviews)
    }
}
