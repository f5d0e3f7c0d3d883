use super::required_text;
use crate::error::{ServerError, ServerResult};
use crate::extract::{IdPath, JsonBody, QueryParams};
use crate::middleware::AuthUser;
use crate::state::AppState;
use axum::{Extension, Json, extract::State, http::StatusCode};
use nover_store::{
    AuthorSummary, Book, BookStatus, ChapterSummary, NewBook, PageRequest, Pagination, Transition,
    User, Visibility, accounts::non_empty, workflow,
};
use serde::{Deserialize, Serialize};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub cover_image_url: Option<String>,
    #[serde(default)]
    pub genre_ids: Vec<i64>,
}

#[derive(Deserialize)]
pub struct PageQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookListResponse {
    pub book_list: Vec<Book>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PagedBookListResponse {
    pub book_list: Vec<Book>,
    pub pagination: Pagination,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookDetailResponse<A> {
    pub book_info: Book,
    pub chapters: Vec<ChapterSummary>,
    pub author: A,
}

#[derive(Serialize)]
pub struct StatusChangeResponse {
    pub code: String,
    pub message: &'static str,
    pub status: BookStatus,
}

/// POST /api/v1/books/create
pub async fn create_book(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    JsonBody(body): JsonBody<CreateBookRequest>,
) -> ServerResult<(StatusCode, Json<Book>)> {
    let author = state
        .users
        .find_by_id(caller.user_id)
        .await?
        .ok_or_else(|| ServerError::NotFound("User not found".into()))?;
    if !author.is_author() {
        return Err(ServerError::NotAuthor);
    }

    let title = required_text(body.title, "title")?;
    if body.genre_ids.is_empty() {
        return Err(ServerError::InputRequired(
            "at least one genre ID is required".into(),
        ));
    }

    let book = state
        .books
        .create_book(
            NewBook {
                title,
                description: non_empty(body.description),
                cover_image_url: non_empty(body.cover_image_url),
            },
            author.user_id,
            &body.genre_ids,
        )
        .await?;

    tracing::info!(book_id = book.book_id, author_id = author.user_id, "Book created");
    Ok((StatusCode::CREATED, Json(book)))
}

/// GET /api/v1/books/my-books
pub async fn my_books(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
) -> ServerResult<Json<BookListResponse>> {
    let book_list = state
        .books
        .list_by_author(caller.user_id, Visibility::Owner)
        .await?;
    Ok(Json(BookListResponse { book_list }))
}

/// GET /api/v1/authors/{authorId}/books
pub async fn books_by_author(
    State(state): State<AppState>,
    IdPath(author_id): IdPath,
) -> ServerResult<Json<BookListResponse>> {
    let book_list = state
        .books
        .list_by_author(author_id, Visibility::Public)
        .await?;
    Ok(Json(BookListResponse { book_list }))
}

/// GET /api/v1/books?page=&limit=
pub async fn list_published(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<PageQuery>,
) -> ServerResult<Json<PagedBookListResponse>> {
    let page = PageRequest::new(query.page, query.limit);

    let book_list = state
        .books
        .list_published(page.limit, page.offset())
        .await?;
    let total = state.books.count_published().await?;

    Ok(Json(PagedBookListResponse {
        book_list,
        pagination: page.paginate(total),
    }))
}

/// GET /api/v1/books/{bookId}
pub async fn public_detail(
    State(state): State<AppState>,
    IdPath(book_id): IdPath,
) -> ServerResult<Json<BookDetailResponse<AuthorSummary>>> {
    let book = state
        .books
        .find_detail(book_id)
        .await?
        .filter(|book| book.status.is_public())
        .ok_or_else(|| ServerError::NotFound("Book not found".into()))?;

    let chapters = state
        .chapters
        .list_by_book(book_id, Visibility::Public)
        .await?;
    let author = state
        .users
        .find_by_id(book.author_id)
        .await?
        .ok_or_else(|| ServerError::Internal(format!("book {book_id} has no author row")))?;

    Ok(Json(BookDetailResponse {
        book_info: book,
        chapters,
        author: AuthorSummary::from(&author),
    }))
}

/// GET /api/v1/books/{bookId}/detail
pub async fn owner_detail(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    IdPath(book_id): IdPath,
) -> ServerResult<Json<BookDetailResponse<User>>> {
    workflow::require_owner(state.books.as_ref(), caller.user_id, book_id).await?;

    let book = state
        .books
        .find_detail(book_id)
        .await?
        .ok_or_else(|| ServerError::NotFound("Book not found".into()))?;
    let chapters = state
        .chapters
        .list_by_book(book_id, Visibility::Owner)
        .await?;
    let author = state
        .users
        .find_by_id(caller.user_id)
        .await?
        .ok_or_else(|| ServerError::Internal(format!("owner of book {book_id} missing")))?;

    Ok(Json(BookDetailResponse {
        book_info: book,
        chapters,
        author,
    }))
}

async fn change_status(
    state: &AppState,
    caller: &AuthUser,
    book_id: i64,
    transition: Transition,
    message: &'static str,
) -> ServerResult<Json<StatusChangeResponse>> {
    let status = workflow::transition(
        state.books.as_ref(),
        state.chapters.as_ref(),
        caller.user_id,
        book_id,
        transition,
    )
    .await?;

    Ok(Json(StatusChangeResponse {
        code: format!("book.{}.success", transition.as_str()),
        message,
        status,
    }))
}

/// PATCH /api/v1/books/{bookId}/publish
pub async fn publish(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    IdPath(book_id): IdPath,
) -> ServerResult<Json<StatusChangeResponse>> {
    change_status(
        &state,
        &caller,
        book_id,
        Transition::Publish,
        "Book published successfully",
    )
    .await
}

/// PATCH /api/v1/books/{bookId}/unpublish
pub async fn unpublish(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    IdPath(book_id): IdPath,
) -> ServerResult<Json<StatusChangeResponse>> {
    change_status(
        &state,
        &caller,
        book_id,
        Transition::Unpublish,
        "Book unpublished successfully",
    )
    .await
}

/// PATCH /api/v1/books/{bookId}/complete
pub async fn complete(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    IdPath(book_id): IdPath,
) -> ServerResult<Json<StatusChangeResponse>> {
    change_status(
        &state,
        &caller,
        book_id,
        Transition::Complete,
        "Book marked as completed",
    )
    .await
}

/// PATCH /api/v1/books/{bookId}/hold
pub async fn hold(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    IdPath(book_id): IdPath,
) -> ServerResult<Json<StatusChangeResponse>> {
    change_status(
        &state,
        &caller,
        book_id,
        Transition::Hold,
        "Book put on hold successfully",
    )
    .await
}
