//! Range-aware clip endpoints.

use crate::error::{ErrorResponse, HttpAppError};
use crate::services::streaming::{self, VideoStream};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::{header, HeaderMap},
};
use std::sync::Arc;
use vidreview_core::VideoLocator;

/// A `Range` header that is not valid UTF-8 is treated as absent.
fn range_header(headers: &HeaderMap) -> Option<&str> {
    headers.get(header::RANGE).and_then(|v| v.to_str().ok())
}

#[utoipa::path(
    get,
    path = "/api/video/review/{batch}/{sign}/{filename}",
    tag = "videos",
    params(
        ("batch" = String, Path, description = "Review batch"),
        ("sign" = String, Path, description = "Sign (gloss) the clip was recorded for"),
        ("filename" = String, Path, description = "Clip file name"),
        ("Range" = Option<String>, Header, description = "Single byte range, e.g. bytes=0-1023")
    ),
    responses(
        (status = 200, description = "Whole clip", content_type = "video/mp4"),
        (status = 206, description = "Requested byte range", content_type = "video/mp4"),
        (status = 400, description = "Invalid path segment", body = ErrorResponse),
        (status = 404, description = "Review file not found", body = ErrorResponse),
        (status = 416, description = "Range not satisfiable", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn stream_review(
    State(state): State<Arc<AppState>>,
    Path((batch, sign, filename)): Path<(String, String, String)>,
    headers: HeaderMap,
) -> Result<VideoStream, HttpAppError> {
    let locator = VideoLocator::review(&batch, &sign, &filename)?;
    let stream = streaming::serve(
        state.storage.as_ref(),
        &state.layout,
        &locator,
        range_header(&headers),
    )
    .await?;
    Ok(stream)
}

#[utoipa::path(
    get,
    path = "/api/video/reference/{filename}",
    tag = "videos",
    params(
        ("filename" = String, Path, description = "Reference clip file name"),
        ("Range" = Option<String>, Header, description = "Single byte range, e.g. bytes=0-1023")
    ),
    responses(
        (status = 200, description = "Whole clip", content_type = "video/mp4"),
        (status = 206, description = "Requested byte range", content_type = "video/mp4"),
        (status = 400, description = "Invalid path segment", body = ErrorResponse),
        (status = 404, description = "Reference file not found", body = ErrorResponse),
        (status = 416, description = "Range not satisfiable", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn stream_reference(
    State(state): State<Arc<AppState>>,
    Path(filename): Path<String>,
    headers: HeaderMap,
) -> Result<VideoStream, HttpAppError> {
    let locator = VideoLocator::reference(&filename)?;
    let stream = streaming::serve(
        state.storage.as_ref(),
        &state.layout,
        &locator,
        range_header(&headers),
    )
    .await?;
    Ok(stream)
}
