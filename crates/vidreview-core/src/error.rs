//! Error types module
//!
//! Every failure that can reach an HTTP client is an `AppError`. Each variant
//! describes its own response through `ErrorMetadata`, so the HTTP layer maps
//! errors without knowing where they came from.

use crate::models::RangeError;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Expected client mistakes (bad locator, missing file)
    Debug,
    /// Upstream trouble that is not ours to fix
    Warn,
    /// Unexpected failures
    Error,
}

/// Metadata for error responses - defines how an error should be presented
pub trait ErrorMetadata {
    /// HTTP status code to return
    fn http_status_code(&self) -> u16;

    /// Machine-readable error code (e.g., "STORAGE_ERROR"), recorded on the error log line
    fn error_code(&self) -> &'static str;

    /// Client-facing message (may differ from internal error message)
    fn client_message(&self) -> String;

    /// Whether details should be hidden from clients
    fn is_sensitive(&self) -> bool;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Range not satisfiable for object of {size} bytes")]
    RangeNotSatisfiable {
        size: u64,
        #[source]
        source: RangeError,
    },

    #[error("Storage error: {0}")]
    Storage(String),

    /// Listing the video folders for the batch index failed.
    #[error("Video index error: {0}")]
    VideoIndex(String),

    /// The annotation backend could not be reached at all.
    #[error("{message}: {reason}")]
    BackendUnreachable { message: String, reason: String },

    /// The annotation backend answered with a non-success status.
    #[error("Backend failed with {status}")]
    BackendStatus { status: u16 },

    #[error("Internal error with source")]
    InternalWithSource {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        }
    }
}

/// Static metadata for each variant: (http_status, error_code, sensitive, log_level).
fn app_error_static_metadata(err: &AppError) -> (u16, &'static str, bool, LogLevel) {
    match err {
        AppError::InvalidInput(_) => (400, "INVALID_INPUT", false, LogLevel::Debug),
        AppError::BadRequest(_) => (400, "BAD_REQUEST", false, LogLevel::Debug),
        AppError::NotFound(_) => (404, "NOT_FOUND", false, LogLevel::Debug),
        AppError::RangeNotSatisfiable { .. } => {
            (416, "RANGE_NOT_SATISFIABLE", false, LogLevel::Debug)
        }
        AppError::Storage(_) => (500, "STORAGE_ERROR", true, LogLevel::Error),
        AppError::VideoIndex(_) => (500, "VIDEO_INDEX_ERROR", true, LogLevel::Error),
        AppError::BackendUnreachable { .. } => {
            (500, "BACKEND_UNREACHABLE", true, LogLevel::Error)
        }
        AppError::BackendStatus { .. } => (502, "BACKEND_STATUS", false, LogLevel::Warn),
        AppError::InternalWithSource { .. } => (500, "INTERNAL_ERROR", true, LogLevel::Error),
    }
}

impl AppError {
    pub fn range_not_satisfiable(size: u64, source: RangeError) -> Self {
        AppError::RangeNotSatisfiable { size, source }
    }

    /// Get the error type name for detailed error responses
    pub fn error_type(&self) -> &str {
        match self {
            AppError::InvalidInput(_) => "InvalidInput",
            AppError::BadRequest(_) => "BadRequest",
            AppError::NotFound(_) => "NotFound",
            AppError::RangeNotSatisfiable { .. } => "RangeNotSatisfiable",
            AppError::Storage(_) => "Storage",
            AppError::VideoIndex(_) => "VideoIndex",
            AppError::BackendUnreachable { .. } => "BackendUnreachable",
            AppError::BackendStatus { .. } => "BackendStatus",
            AppError::InternalWithSource { .. } => "Internal",
        }
    }

    /// Object size to advertise in `Content-Range: bytes */size`, for 416 responses.
    pub fn unsatisfiable_size(&self) -> Option<u64> {
        match self {
            AppError::RangeNotSatisfiable { size, .. } => Some(*size),
            _ => None,
        }
    }

    /// Get detailed error information including error chain
    pub fn detailed_message(&self) -> String {
        use std::error::Error;

        let mut details = self.to_string();

        let mut source = self.source();
        let mut depth = 0;
        while let Some(err) = source {
            depth += 1;
            if depth > 5 {
                details.push_str("\n  ... (truncated)");
                break;
            }
            details.push_str(&format!("\n  Caused by: {}", err));
            source = err.source();
        }

        details
    }
}

impl ErrorMetadata for AppError {
    fn http_status_code(&self) -> u16 {
        match self {
            // Upstream status is forwarded as-is.
            AppError::BackendStatus { status } => *status,
            _ => app_error_static_metadata(self).0,
        }
    }

    fn error_code(&self) -> &'static str {
        app_error_static_metadata(self).1
    }

    fn is_sensitive(&self) -> bool {
        app_error_static_metadata(self).2
    }

    fn log_level(&self) -> LogLevel {
        app_error_static_metadata(self).3
    }

    fn client_message(&self) -> String {
        match self {
            AppError::InvalidInput(ref msg)
            | AppError::BadRequest(ref msg)
            | AppError::NotFound(ref msg) => msg.clone(),
            AppError::RangeNotSatisfiable { .. } => "Range Not Satisfiable".to_string(),
            AppError::VideoIndex(_) => "Failed to load video data".to_string(),
            AppError::BackendUnreachable { message, .. } => message.clone(),
            AppError::BackendStatus { status } => format!("Backend failed with {}", status),
            AppError::Storage(_) | AppError::InternalWithSource { .. } => {
                "Internal Server Error".to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_metadata_not_found() {
        let err = AppError::NotFound("Review file not found".to_string());
        assert_eq!(err.http_status_code(), 404);
        assert_eq!(err.error_code(), "NOT_FOUND");
        assert_eq!(err.client_message(), "Review file not found");
        assert!(!err.is_sensitive());
        assert_eq!(err.log_level(), LogLevel::Debug);
    }

    #[test]
    fn test_error_metadata_storage_hides_cause() {
        let err = AppError::Storage("connection reset by peer".to_string());
        assert_eq!(err.http_status_code(), 500);
        assert_eq!(err.client_message(), "Internal Server Error");
        assert!(err.is_sensitive());
        assert_eq!(err.log_level(), LogLevel::Error);
        assert!(err.to_string().contains("connection reset"));
    }

    #[test]
    fn test_error_metadata_range_not_satisfiable() {
        let err = AppError::range_not_satisfiable(
            1000,
            RangeError::StartOutOfBounds {
                start: 2000,
                size: 1000,
            },
        );
        assert_eq!(err.http_status_code(), 416);
        assert_eq!(err.client_message(), "Range Not Satisfiable");
        assert_eq!(err.unsatisfiable_size(), Some(1000));
        assert!(err.detailed_message().contains("Caused by: range start 2000"));
    }

    #[test]
    fn test_error_metadata_backend_status_forwards_code() {
        let err = AppError::BackendStatus { status: 503 };
        assert_eq!(err.http_status_code(), 503);
        assert_eq!(err.client_message(), "Backend failed with 503");
        assert_eq!(err.log_level(), LogLevel::Warn);
    }

    #[test]
    fn test_error_metadata_backend_unreachable() {
        let err = AppError::BackendUnreachable {
            message: "Failed to reach backend".to_string(),
            reason: "connection refused".to_string(),
        };
        assert_eq!(err.http_status_code(), 500);
        assert_eq!(err.client_message(), "Failed to reach backend");
        assert!(err.to_string().contains("connection refused"));
    }

    #[test]
    fn test_error_metadata_video_index() {
        let err = AppError::VideoIndex("listing timed out".to_string());
        assert_eq!(err.http_status_code(), 500);
        assert_eq!(err.client_message(), "Failed to load video data");
    }

    #[test]
    fn test_anyhow_becomes_internal() {
        let err: AppError = anyhow::anyhow!("boom").into();
        assert_eq!(err.error_type(), "Internal");
        assert_eq!(err.client_message(), "Internal Server Error");
        assert_eq!(err.error_code(), "INTERNAL_ERROR");
    }

    #[test]
    fn test_error_codes_are_distinct_per_kind() {
        let codes = [
            AppError::InvalidInput(String::new()).error_code(),
            AppError::BadRequest(String::new()).error_code(),
            AppError::NotFound(String::new()).error_code(),
            AppError::Storage(String::new()).error_code(),
            AppError::VideoIndex(String::new()).error_code(),
            AppError::BackendStatus { status: 503 }.error_code(),
            AppError::BackendUnreachable {
                message: String::new(),
                reason: String::new(),
            }
            .error_code(),
        ];
        assert_eq!(
            codes,
            [
                "INVALID_INPUT",
                "BAD_REQUEST",
                "NOT_FOUND",
                "STORAGE_ERROR",
                "VIDEO_INDEX_ERROR",
                "BACKEND_STATUS",
                "BACKEND_UNREACHABLE",
            ]
        );
    }
}
