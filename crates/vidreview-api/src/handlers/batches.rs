//! Batch index endpoints, built from a storage listing on every call.

use crate::error::{ErrorResponse, HttpAppError};
use crate::services::video_index::load_index;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;
use vidreview_core::{AppError, BatchIndex, WordEntry};

#[derive(Debug, Serialize, ToSchema)]
pub struct WordResponse {
    pub word: String,
    pub batch: String,
    #[schema(value_type = Object)]
    pub entry: WordEntry,
}

#[utoipa::path(
    get,
    path = "/api/batches",
    tag = "batches",
    responses(
        (status = 200, description = "batch -> sign -> { reference, reviews }", body = Object),
        (status = 500, description = "Failed to load video data", body = ErrorResponse)
    )
)]
pub async fn list_batches(
    State(state): State<Arc<AppState>>,
) -> Result<Json<BatchIndex>, HttpAppError> {
    let index = load_index(
        state.storage.as_ref(),
        &state.layout,
        state.config.review_batches(),
    )
    .await?;
    Ok(Json(index))
}

#[utoipa::path(
    get,
    path = "/api/words/{word}",
    tag = "batches",
    params(
        ("word" = String, Path, description = "Sign to look up")
    ),
    responses(
        (status = 200, description = "First batch containing the sign", body = WordResponse),
        (status = 404, description = "No data for the sign", body = ErrorResponse),
        (status = 500, description = "Failed to load video data", body = ErrorResponse)
    )
)]
pub async fn get_word(
    State(state): State<Arc<AppState>>,
    Path(word): Path<String>,
) -> Result<Json<WordResponse>, HttpAppError> {
    let index = load_index(
        state.storage.as_ref(),
        &state.layout,
        state.config.review_batches(),
    )
    .await?;

    let (batch, entry) = index
        .find_word(&word)
        .ok_or_else(|| AppError::NotFound(format!("No data available for word: {}", word)))?;

    Ok(Json(WordResponse {
        batch: batch.to_string(),
        entry: entry.clone(),
        word,
    }))
}
