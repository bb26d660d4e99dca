//! HTTP error response conversion
//!
//! Handlers return `Result<impl IntoResponse, HttpAppError>`. Every error is
//! logged here, once, at the level its `ErrorMetadata` asks for; nothing below
//! the HTTP boundary logs a failure it also returns.

use std::sync::OnceLock;

use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{de::DeserializeOwned, Serialize};
use utoipa::ToSchema;
use vidreview_core::{AppError, ErrorMetadata, LogLevel};
use vidreview_storage::StorageError;

static EXPOSE_DETAILS: OnceLock<bool> = OnceLock::new();

/// Allow `details` in error bodies for non-sensitive errors. Set once at startup.
pub fn configure_error_details(expose: bool) {
    let _ = EXPOSE_DETAILS.set(expose);
}

fn expose_details() -> bool {
    EXPOSE_DETAILS.get().copied().unwrap_or(false)
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Wrapper type for AppError to implement IntoResponse
/// This is necessary because of Rust's orphan rules - we can't implement
/// IntoResponse (external trait) for AppError (external type from vidreview-core)
#[derive(Debug)]
pub struct HttpAppError(pub AppError);

impl From<AppError> for HttpAppError {
    fn from(err: AppError) -> Self {
        HttpAppError(err)
    }
}

impl From<anyhow::Error> for HttpAppError {
    fn from(err: anyhow::Error) -> Self {
        HttpAppError(AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        })
    }
}

fn invalid_body(reason: impl std::fmt::Display) -> HttpAppError {
    HttpAppError(AppError::InvalidInput(format!("Invalid request body: {}", reason)))
}

/// JSON body extractor that answers malformed bodies with our ErrorResponse
/// format (400 + JSON).
///
/// The body is parsed as JSON whatever `Content-Type` the client sent.
#[derive(Debug, Clone, Copy)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = HttpAppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let body = Bytes::from_request(req, state)
            .await
            .map_err(|rejection| invalid_body(rejection.body_text()))?;
        let inner = serde_json::from_slice(&body).map_err(invalid_body)?;
        Ok(ValidatedJson(inner))
    }
}

/// Map a storage failure onto the error taxonomy.
///
/// `not_found` supplies the client message when the object is missing.
pub fn storage_error(err: StorageError, not_found: impl FnOnce() -> String) -> AppError {
    match err {
        StorageError::NotFound(_) => AppError::NotFound(not_found()),
        StorageError::InvalidKey(key) => AppError::InvalidInput(format!("Invalid key: {}", key)),
        StorageError::DownloadFailed(msg)
        | StorageError::BackendError(msg)
        | StorageError::ConfigError(msg) => AppError::Storage(msg),
        StorageError::IoError(err) => AppError::Storage(format!("IO error: {}", err)),
    }
}

fn log_error(error: &AppError) {
    let error_type = error.error_type();
    let error_code = error.error_code();
    let details = error.detailed_message();
    match error.log_level() {
        LogLevel::Debug => {
            tracing::debug!(
                error = %details,
                error_type,
                error_code,
                "Error occurred"
            );
        }
        LogLevel::Warn => {
            tracing::warn!(
                error = %details,
                error_type,
                error_code,
                "Error occurred"
            );
        }
        LogLevel::Error => {
            tracing::error!(
                error = %details,
                error_type,
                error_code,
                "Error occurred"
            );
        }
    }
}

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        let app_error = &self.0;

        let status = StatusCode::from_u16(app_error.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        log_error(app_error);

        let details = (expose_details() && !app_error.is_sensitive())
            .then(|| app_error.detailed_message());

        let body = Json(ErrorResponse {
            error: app_error.client_message(),
            details,
        });

        let mut response = (status, body).into_response();

        if let Some(size) = app_error.unsatisfiable_size() {
            if let Ok(value) = HeaderValue::from_str(&format!("bytes */{}", size)) {
                response.headers_mut().insert(header::CONTENT_RANGE, value);
            }
        }

        response
    }
}
