use crate::error::{ServerError, ServerResult};
use crate::extract::{IdPath, JsonBody};
use crate::middleware::AuthUser;
use crate::state::AppState;
use axum::{Extension, Json, extract::State, http::StatusCode};
use nover_store::{NewReview, Review, submit_review};
use serde::{Deserialize, Serialize};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddReviewRequest {
    pub rating: Option<i64>,
    pub review_text: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewListResponse {
    pub review_list: Vec<Review>,
}

/// GET /api/v1/books/{bookId}/reviews
pub async fn list_reviews(
    State(state): State<AppState>,
    IdPath(book_id): IdPath,
) -> ServerResult<Json<ReviewListResponse>> {
    let review_list = state.reviews.list_by_book(book_id).await?;
    Ok(Json(ReviewListResponse { review_list }))
}

/// POST /api/v1/books/{bookId}/reviews
pub async fn add_review(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    IdPath(book_id): IdPath,
    JsonBody(body): JsonBody<AddReviewRequest>,
) -> ServerResult<(StatusCode, Json<Review>)> {
    let rating = body
        .rating
        .ok_or_else(|| ServerError::InputRequired("rating is required".into()))?;

    let review = submit_review(
        state.books.as_ref(),
        state.reviews.as_ref(),
        NewReview {
            book_id,
            user_id: caller.user_id,
            rating,
            review_text: body.review_text,
        },
    )
    .await?;
    Ok((StatusCode::CREATED, Json(review)))
}
