//! nover-store: Persistence and domain rules for the Nover fiction platform
//!
//! Holds users, the book catalog, chapters, reviews and reader unlock
//! records, plus the rules that sit directly on top of them: registration
//! and login, the owner-gated publication workflow and coin-gated chapter
//! access.
//!
//! ## Example
//!
//! ```rust,ignore
//! use nover_store::{SqliteStore, accounts, workflow, Transition};
//!
//! let store = SqliteStore::open("nover.db")?;
//! store.seed_reference_data()?;
//!
//! let user = accounts::register(&store, registration).await?;
//! let status = workflow::transition(&store, &store, user.user_id, book_id, Transition::Publish).await?;
//! ```

mod book;
mod chapter;
mod error;
mod pagination;
mod reference;
mod review;
mod user;

pub mod access;
pub mod accounts;
pub mod password;
pub mod sqlite;
pub mod workflow;

// Re-exports
pub use book::{Book, BookOwnership, BookStatus, BookStore, NewBook, Transition, Visibility};
pub use chapter::{Chapter, ChapterStatus, ChapterStore, ChapterSummary, NewChapter};
pub use error::{ContentLock, StoreError, StoreResult, UniqueField, WorkflowViolation};
pub use pagination::{DEFAULT_LIMIT, MAX_LIMIT, PageRequest, Pagination};
pub use reference::{Bank, Genre, ReferenceStore};
pub use review::{MAX_RATING, MIN_RATING, NewReview, Review, ReviewStore, submit_review};
pub use sqlite::SqliteStore;
pub use user::{AuthorFlag, AuthorProfile, AuthorSummary, Credentials, NewUser, User, UserStore};
