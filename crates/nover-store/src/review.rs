//! Reader reviews

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::book::BookStore;
use crate::error::{StoreError, StoreResult};

pub const MIN_RATING: i64 = 1;
pub const MAX_RATING: i64 = 5;

/// A review joined with the reviewer's public profile
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub review_id: i64,
    pub book_id: i64,
    pub user_id: i64,
    pub username: String,
    pub pen_name: Option<String>,
    pub avatar_url: String,
    pub rating: i64,
    pub review_text: Option<String>,
    pub create_datetime: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewReview {
    pub book_id: i64,
    pub user_id: i64,
    pub rating: i64,
    pub review_text: Option<String>,
}

#[async_trait]
pub trait ReviewStore: Send + Sync {
    /// Insert a review and refresh the book's average rating in one transaction
    async fn add_review(&self, review: NewReview) -> StoreResult<Review>;

    /// Reviews for a book, newest first
    async fn list_by_book(&self, book_id: i64) -> StoreResult<Vec<Review>>;
}

/// Add a review to a book readers can see. Draft and unknown books are
/// both reported as not found.
pub async fn submit_review(
    books: &dyn BookStore,
    reviews: &dyn ReviewStore,
    review: NewReview,
) -> StoreResult<Review> {
    if !(MIN_RATING..=MAX_RATING).contains(&review.rating) {
        return Err(StoreError::InvalidInput(format!(
            "Rating must be between {MIN_RATING} and {MAX_RATING}"
        )));
    }

    let visible = books
        .find_ownership(review.book_id)
        .await?
        .is_some_and(|book| book.status.is_public());
    if !visible {
        return Err(StoreError::NotFound(format!("book {}", review.book_id)));
    }

    let review = NewReview {
        review_text: crate::accounts::non_empty(review.review_text),
        ..review
    };
    let created = reviews.add_review(review).await?;
    tracing::info!(
        book_id = created.book_id,
        review_id = created.review_id,
        rating = created.rating,
        "Review added"
    );
    Ok(created)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::book::{BookStatus, NewBook};
    use crate::sqlite::SqliteStore;
    use crate::user::{NewUser, UserStore};

    async fn setup() -> (SqliteStore, i64, i64) {
        let store = SqliteStore::in_memory().unwrap();
        let user_id = store
            .insert_user(NewUser {
                user_code: "code".into(),
                email: "u@example.com".into(),
                password_hash: "hash".into(),
                full_name: "U".into(),
                username: "u".into(),
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
                user_id,
                &[],
            )
            .await
            .unwrap();
        (store, user_id, book.book_id)
    }

    fn review(book_id: i64, user_id: i64, rating: i64) -> NewReview {
        NewReview {
            book_id,
            user_id,
            rating,
            review_text: Some(" great ".into()),
        }
    }

    #[tokio::test]
    async fn test_draft_book_cannot_be_reviewed() {
        let (store, user_id, book_id) = setup().await;
        let err = submit_review(&store, &store, review(book_id, user_id, 4))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_review_on_published_book() {
        let (store, user_id, book_id) = setup().await;
        store
            .update_status(book_id, BookStatus::Published)
            .await
            .unwrap();

        let created = submit_review(&store, &store, review(book_id, user_id, 4))
            .await
            .unwrap();
        assert_eq!(created.review_text.as_deref(), Some("great"));

        let err = submit_review(&store, &store, review(book_id, user_id, 9))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::InvalidInput(_)));
    }
}
