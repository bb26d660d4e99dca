//! Range-aware video streaming.
//!
//! Every request does `exists`, then `metadata`, then opens a fresh stream.
//! Nothing is cached between requests, and nothing here logs a failure it
//! returns: `HttpAppError` does that at the boundary.

use crate::constants::VIDEO_CONTENT_TYPE;
use crate::error::storage_error;
use axum::{
    body::Body,
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use futures::StreamExt;
use vidreview_core::{parse_range_header, AppError, VideoLayout, VideoLocator};
use vidreview_storage::{ByteStream, Storage};

/// A ready-to-send clip response: status, lengths, and a one-shot body.
pub struct VideoStream {
    status: StatusCode,
    content_length: u64,
    content_range: Option<String>,
    body: ByteStream,
}

impl VideoStream {
    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn content_length(&self) -> u64 {
        self.content_length
    }

    pub fn content_range(&self) -> Option<&str> {
        self.content_range.as_deref()
    }
}

impl IntoResponse for VideoStream {
    fn into_response(self) -> Response {
        let VideoStream {
            status,
            content_length,
            content_range,
            body,
        } = self;

        let body = body.map(|chunk| {
            chunk.map_err(|e| {
                // Headers are already sent; the connection is cut short.
                tracing::warn!(error = %e, "Video stream aborted mid-body");
                std::io::Error::other(e.to_string())
            })
        });

        let mut response = Response::new(Body::from_stream(body));
        *response.status_mut() = status;

        let headers = response.headers_mut();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static(VIDEO_CONTENT_TYPE),
        );
        headers.insert(header::CONTENT_LENGTH, HeaderValue::from(content_length));

        if let Some(range) = content_range.and_then(|r| HeaderValue::from_str(&r).ok()) {
            headers.insert(header::CONTENT_RANGE, range);
            headers.insert(header::ACCEPT_RANGES, HeaderValue::from_static("bytes"));
        }

        response
    }
}

/// Resolve `locator` to a full (200) or partial (206) stream.
///
/// `range_header` is the raw `Range` header value, if the client sent one.
pub async fn serve(
    storage: &dyn Storage,
    layout: &VideoLayout,
    locator: &VideoLocator,
    range_header: Option<&str>,
) -> Result<VideoStream, AppError> {
    let key = layout.storage_key(locator);
    let not_found = || locator.not_found_message();

    let exists = storage
        .exists(&key)
        .await
        .map_err(|e| storage_error(e, not_found))?;
    if !exists {
        return Err(AppError::NotFound(locator.not_found_message()));
    }

    let size = storage
        .metadata(&key)
        .await
        .map_err(|e| storage_error(e, not_found))?
        .size;

    let spec = match range_header {
        Some(value) => parse_range_header(value)
            .map_err(|e| AppError::range_not_satisfiable(size, e))?,
        None => None,
    };

    let Some(spec) = spec else {
        let body = storage
            .open_stream(&key, None)
            .await
            .map_err(|e| storage_error(e, not_found))?;

        tracing::debug!(key = %key, size, "Serving full video");
        return Ok(VideoStream {
            status: StatusCode::OK,
            content_length: size,
            content_range: None,
            body,
        });
    };

    let range = spec
        .resolve(size)
        .map_err(|e| AppError::range_not_satisfiable(size, e))?;

    let body = storage
        .open_stream(&key, Some(range))
        .await
        .map_err(|e| storage_error(e, not_found))?;

    tracing::debug!(
        key = %key,
        start = range.start,
        end = range.end,
        size,
        "Serving partial video"
    );

    Ok(VideoStream {
        status: StatusCode::PARTIAL_CONTENT,
        content_length: range.len(),
        content_range: Some(range.content_range(size)),
        body,
    })
}
