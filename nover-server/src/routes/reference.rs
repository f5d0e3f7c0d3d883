use crate::error::ServerResult;
use crate::state::AppState;
use axum::{Json, extract::State};
use nover_store::{Bank, Genre};
use serde::Serialize;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenreListResponse {
    pub genre_list: Vec<Genre>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BankListResponse {
    pub bank_list: Vec<Bank>,
}

/// GET /api/v1/genres
pub async fn list_genres(State(state): State<AppState>) -> ServerResult<Json<GenreListResponse>> {
    let genre_list = state.reference.list_active_genres().await?;
    Ok(Json(GenreListResponse { genre_list }))
}

/// GET /api/v1/bank/get
pub async fn list_banks(State(state): State<AppState>) -> ServerResult<Json<BankListResponse>> {
    let bank_list = state.reference.list_active_banks().await?;
    Ok(Json(BankListResponse { bank_list }))
}
