use crate::error::{ServerError, ServerResult};
use crate::middleware::require_auth;
use crate::state::AppState;
use axum::{
    Router, middleware as axum_middleware,
    routing::{get, patch, post},
};
use tower_http::trace::TraceLayer;

mod auth;
mod books;
mod chapters;
mod health;
mod reference;
mod reviews;
mod users;

pub fn router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/api/v1/user/request-author", post(users::request_author))
        .route("/api/v1/user/author-status", get(users::author_status))
        .route("/api/v1/books/create", post(books::create_book))
        .route("/api/v1/books/my-books", get(books::my_books))
        .route("/api/v1/books/{bookId}/detail", get(books::owner_detail))
        .route("/api/v1/books/{bookId}/publish", patch(books::publish))
        .route("/api/v1/books/{bookId}/unpublish", patch(books::unpublish))
        .route("/api/v1/books/{bookId}/complete", patch(books::complete))
        .route("/api/v1/books/{bookId}/hold", patch(books::hold))
        .route(
            "/api/v1/books/{bookId}/chapters",
            post(chapters::create_chapter),
        )
        .route("/api/v1/books/{bookId}/reviews", post(reviews::add_review))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            require_auth,
        ));

    let public = Router::new()
        .route("/health", get(health::health_check))
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/v1/genres", get(reference::list_genres))
        .route("/api/v1/bank/get", get(reference::list_banks))
        .route("/api/v1/books", get(books::list_published))
        .route("/api/v1/books/{bookId}", get(books::public_detail))
        .route("/api/v1/books/{bookId}/reviews", get(reviews::list_reviews))
        .route(
            "/api/v1/authors/{authorId}/books",
            get(books::books_by_author),
        )
        .route("/api/v1/chapters/{chapterId}", get(chapters::get_chapter));

    Router::new()
        .merge(protected)
        .merge(public)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Trimmed text field that must be present and non-blank
fn required_text(value: Option<String>, field: &str) -> ServerResult<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ServerError::InputRequired(format!("{field} is required")))
}
