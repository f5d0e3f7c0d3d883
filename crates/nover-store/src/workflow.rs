//! Owner-gated publication workflow and chapter authoring

use crate::book::{BookOwnership, BookStatus, BookStore, Transition};
use crate::chapter::{Chapter, ChapterStore, NewChapter};
use crate::error::{StoreError, StoreResult};

/// Resolve a book and confirm the caller owns it
pub async fn require_owner(
    books: &dyn BookStore,
    caller: i64,
    book_id: i64,
) -> StoreResult<BookOwnership> {
    let ownership = books
        .find_ownership(book_id)
        .await?
        .ok_or_else(|| StoreError::NotFound(format!("book {book_id}")))?;

    if ownership.author_id != caller {
        tracing::debug!(book_id, caller, owner = ownership.author_id, "Caller is not the owner");
        return Err(StoreError::Forbidden(format!(
            "book {book_id} belongs to another author"
        )));
    }
    Ok(ownership)
}

/// Apply a status transition on behalf of the book's owner.
///
/// Chapter count and status update are separate statements.
pub async fn transition(
    books: &dyn BookStore,
    chapters: &dyn ChapterStore,
    caller: i64,
    book_id: i64,
    transition: Transition,
) -> StoreResult<BookStatus> {
    let ownership = require_owner(books, caller, book_id).await?;

    let chapter_count = if transition.needs_chapter_count() {
        chapters.count_by_book(book_id).await?
    } else {
        0
    };

    let next = transition
        .check(ownership.status, chapter_count)
        .map_err(StoreError::InvalidState)?;
    books.update_status(book_id, next).await?;

    tracing::info!(
        book_id,
        from = ownership.status.as_code(),
        to = next.as_code(),
        action = transition.as_str(),
        "Book status changed"
    );
    Ok(next)
}

/// Append a chapter to a book the caller owns.
///
/// Ownership is settled before the payload is looked at.
pub async fn add_chapter(
    books: &dyn BookStore,
    chapters: &dyn ChapterStore,
    caller: i64,
    chapter: NewChapter,
) -> StoreResult<Chapter> {
    require_owner(books, caller, chapter.book_id).await?;

    let title = chapter.title.trim();
    if title.is_empty() {
        return Err(StoreError::InputRequired("title is required".into()));
    }
    let chapter = NewChapter {
        title: title.to_owned(),
        ..chapter
    };

    let created = chapters.create_chapter(chapter).await?;
    tracing::info!(
        book_id = created.book_id,
        chapter_id = created.chapter_id,
        order = created.chapter_order,
        "Chapter added"
    );
    Ok(created)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::book::NewBook;
    use crate::error::WorkflowViolation;
    use crate::sqlite::SqliteStore;
    use crate::user::{NewUser, UserStore};

    async fn user(store: &SqliteStore, name: &str) -> i64 {
        store
            .insert_user(NewUser {
                user_code: format!("code-{name}"),
                email: format!("{name}@example.com"),
                password_hash: "hash".into(),
                full_name: name.into(),
                username: name.into(),
                pen_name: None,
                phone: None,
                instagram: None,
            })
            .await
            .unwrap()
    }

    async fn setup() -> (SqliteStore, i64, i64) {
        let store = SqliteStore::in_memory().unwrap();
        store.seed_reference_data().unwrap();
        let owner = user(&store, "owner").await;
        let book = store
            .create_book(
                NewBook {
                    title: "Saga".into(),
                    description: None,
                    cover_image_url: None,
                },
                owner,
                &[1],
            )
            .await
            .unwrap();
        (store, owner, book.book_id)
    }

    fn new_chapter(book_id: i64, title: &str) -> NewChapter {
        NewChapter {
            book_id,
            title: title.into(),
            content: Some("text".into()),
            coin_cost: 0,
        }
    }

    #[tokio::test]
    async fn test_publish_needs_a_chapter() {
        let (store, owner, book_id) = setup().await;

        let err = transition(&store, &store, owner, book_id, Transition::Publish)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::InvalidState(WorkflowViolation::NoChapters)
        ));

        add_chapter(&store, &store, owner, new_chapter(book_id, "One"))
            .await
            .unwrap();
        let status = transition(&store, &store, owner, book_id, Transition::Publish)
            .await
            .unwrap();
        assert_eq!(status, BookStatus::Published);
    }

    #[tokio::test]
    async fn test_full_lifecycle() {
        let (store, owner, book_id) = setup().await;
        add_chapter(&store, &store, owner, new_chapter(book_id, "One"))
            .await
            .unwrap();

        let err = transition(&store, &store, owner, book_id, Transition::Complete)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::InvalidState(WorkflowViolation::NotPublished)
        ));

        for (t, expected) in [
            (Transition::Publish, BookStatus::Published),
            (Transition::Unpublish, BookStatus::Draft),
            (Transition::Hold, BookStatus::Hold),
            (Transition::Publish, BookStatus::Published),
            (Transition::Complete, BookStatus::Completed),
        ] {
            let status = transition(&store, &store, owner, book_id, t).await.unwrap();
            assert_eq!(status, expected);
        }

        let book = store.find_detail(book_id).await.unwrap().unwrap();
        assert_eq!(book.status, BookStatus::Completed);
        assert!(book.update_datetime.is_some());
    }

    #[tokio::test]
    async fn test_non_owner_and_missing_book() {
        let (store, _, book_id) = setup().await;
        let stranger = user(&store, "stranger").await;

        let err = transition(&store, &store, stranger, book_id, Transition::Hold)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Forbidden(_)));

        let err = add_chapter(&store, &store, stranger, new_chapter(book_id, "Mine"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Forbidden(_)));

        let err = transition(&store, &store, stranger, 999, Transition::Hold)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_blank_chapter_title() {
        let (store, owner, book_id) = setup().await;
        let err = add_chapter(&store, &store, owner, new_chapter(book_id, "   "))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::InputRequired(_)));
    }

    #[tokio::test]
    async fn test_ownership_checked_before_title() {
        let (store, _, book_id) = setup().await;
        let stranger = user(&store, "stranger").await;

        let err = add_chapter(&store, &store, stranger, new_chapter(book_id, "  "))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Forbidden(_)));

        let err = add_chapter(&store, &store, stranger, new_chapter(9999, ""))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
        assert_eq!(store.count_by_book(book_id).await.unwrap(), 0);
    }
}
