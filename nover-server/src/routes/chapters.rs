use crate::error::ServerResult;
use crate::extract::{IdPath, JsonBody};
use crate::middleware::{AuthUser, identify};
use crate::state::AppState;
use axum::{Extension, Json, extract::State, http::HeaderMap, http::StatusCode};
use nover_store::{Chapter, NewChapter, access, workflow};
use serde::Deserialize;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateChapterRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    #[serde(default)]
    pub coin_cost: i64,
}

/// POST /api/v1/books/{bookId}/chapters
pub async fn create_chapter(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    IdPath(book_id): IdPath,
    JsonBody(body): JsonBody<CreateChapterRequest>,
) -> ServerResult<(StatusCode, Json<Chapter>)> {
    let chapter = NewChapter {
        book_id,
        title: body.title.unwrap_or_default(),
        content: body.content,
        coin_cost: body.coin_cost,
    };

    let created = workflow::add_chapter(
        state.books.as_ref(),
        state.chapters.as_ref(),
        caller.user_id,
        chapter,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// GET /api/v1/chapters/{chapterId}
///
/// Signing in is optional here; a presented token must still be valid.
pub async fn get_chapter(
    State(state): State<AppState>,
    headers: HeaderMap,
    IdPath(chapter_id): IdPath,
) -> ServerResult<Json<Chapter>> {
    let caller = identify(&state, &headers)?;

    let chapter = access::chapter_content(
        state.chapters.as_ref(),
        chapter_id,
        caller.map(|user| user.user_id),
    )
    .await?;
    Ok(Json(chapter))
}
