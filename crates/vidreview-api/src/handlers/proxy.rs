//! Pass-through routes to the annotation backend.

use crate::constants::VIDEO_CONTENT_TYPE;
use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::services::backend::{with_batch_list, WordVideo};
use crate::state::AppState;
use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use futures::TryStreamExt;
use serde_json::Value;
use std::sync::Arc;
use vidreview_core::AppError;

#[utoipa::path(
    post,
    path = "/api/add_annot",
    tag = "backend",
    request_body = Object,
    responses(
        (status = 200, description = "Backend response, relayed with its status", body = Object),
        (status = 400, description = "Invalid request body", body = ErrorResponse),
        (status = 500, description = "Failed to add annotation", body = ErrorResponse)
    )
)]
pub async fn add_annotation(
    State(state): State<Arc<AppState>>,
    ValidatedJson(body): ValidatedJson<Value>,
) -> Result<(StatusCode, Json<Value>), HttpAppError> {
    let (status, data) = state.backend.add_annotation(&body).await?;
    Ok((status, Json(data)))
}

#[utoipa::path(
    post,
    path = "/api/check_user",
    tag = "backend",
    request_body = Object,
    responses(
        (status = 200, description = "Backend response", body = Object),
        (status = 400, description = "Invalid request body", body = ErrorResponse),
        (status = 500, description = "Failed to reach backend", body = ErrorResponse)
    )
)]
pub async fn check_user(
    State(state): State<Arc<AppState>>,
    ValidatedJson(body): ValidatedJson<Value>,
) -> Result<Json<Value>, HttpAppError> {
    Ok(Json(state.backend.check_user(&body).await?))
}

#[utoipa::path(
    get,
    path = "/api/batches/{username}",
    tag = "backend",
    params(
        ("username" = String, Path, description = "Reviewer name")
    ),
    responses(
        (status = 200, description = "{ batches, batchList }", body = Object),
        (status = 400, description = "Username required", body = ErrorResponse),
        (status = 500, description = "Failed to fetch from backend", body = ErrorResponse)
    )
)]
pub async fn user_batches(
    State(state): State<Arc<AppState>>,
    Path(username): Path<String>,
) -> Result<Json<Value>, HttpAppError> {
    if username.trim().is_empty() {
        return Err(AppError::BadRequest("Username required".to_string()).into());
    }
    let batches = state.backend.user_batches(&username).await?;
    Ok(Json(with_batch_list(batches)?))
}

#[utoipa::path(
    post,
    path = "/api/batches/word/videos",
    tag = "backend",
    request_body = Object,
    responses(
        (status = 200, description = "Backend response", body = Object),
        (status = 400, description = "Invalid request body", body = ErrorResponse),
        (status = 500, description = "Failed to fetch from backend", body = ErrorResponse)
    )
)]
pub async fn word_videos(
    State(state): State<Arc<AppState>>,
    ValidatedJson(body): ValidatedJson<Value>,
) -> Result<Json<Value>, HttpAppError> {
    Ok(Json(state.backend.word_videos(&body).await?))
}

#[utoipa::path(
    post,
    path = "/api/batches/word/video",
    tag = "backend",
    request_body = Object,
    responses(
        (status = 200, description = "Clip bytes from the backend", content_type = "video/mp4"),
        (status = 400, description = "Invalid request body", body = ErrorResponse),
        (status = 500, description = "Failed to fetch video from backend", body = ErrorResponse)
    )
)]
pub async fn word_video(
    State(state): State<Arc<AppState>>,
    ValidatedJson(body): ValidatedJson<Value>,
) -> Result<Response, HttpAppError> {
    match state.backend.word_video(&body).await? {
        WordVideo::Video(upstream) => {
            let content_length = upstream.content_length();
            let body_stream = upstream
                .bytes_stream()
                .map_err(|e| std::io::Error::other(format!("Backend stream error: {}", e)));

            let mut response = Response::new(Body::from_stream(body_stream));
            let headers = response.headers_mut();
            headers.insert(
                header::CONTENT_TYPE,
                HeaderValue::from_static(VIDEO_CONTENT_TYPE),
            );
            if let Some(len) = content_length {
                headers.insert(header::CONTENT_LENGTH, HeaderValue::from(len));
            }
            Ok(response)
        }
        WordVideo::Rejected { status, body } => Ok((status, Json(body)).into_response()),
    }
}
