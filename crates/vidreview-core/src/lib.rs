//! vidreview core library
//!
//! Configuration, error types, and the domain models shared by the storage
//! adapters and the HTTP API: video locators, byte ranges, and the batch index.

pub mod config;
pub mod error;
pub mod models;
pub mod storage_types;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use models::{
    parse_range_header, BatchIndex, ByteRange, RangeError, RangeSpec, VideoKind, VideoLayout,
    VideoLocator, WordEntry,
};
pub use storage_types::StorageBackend;
