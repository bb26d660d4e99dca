//! Storage abstraction trait
//!
//! This module defines the read-side contract every video storage backend
//! implements.

use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;
use std::pin::Pin;
use thiserror::Error;
use vidreview_core::ByteRange;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Download failed: {0}")]
    DownloadFailed(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// A lazily produced, finite sequence of byte chunks. Consumed at most once;
/// dropping it releases the underlying file handle or HTTP body.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, StorageError>> + Send>>;

/// Object metadata needed to answer a range request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObjectInfo {
    /// Total size in bytes
    pub size: u64,
}

/// Storage abstraction trait
///
/// Keys are `/`-separated relative paths, e.g. `ReviewVideos/batch1/HELLO/clip.mp4`.
/// All backends use the same key layout so that switching backend is a
/// configuration change only.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Check if an object exists
    async fn exists(&self, storage_key: &str) -> StorageResult<bool>;

    /// Fetch object metadata. Called fresh on every request; never cached.
    async fn metadata(&self, storage_key: &str) -> StorageResult<ObjectInfo>;

    /// Open a byte stream over the object, or over the inclusive `range` of it.
    ///
    /// The caller has already validated `range` against [`metadata`](Self::metadata).
    async fn open_stream(
        &self,
        storage_key: &str,
        range: Option<ByteRange>,
    ) -> StorageResult<ByteStream>;

    /// List every object key below `prefix` (recursively).
    async fn list(&self, prefix: &str) -> StorageResult<Vec<String>>;

    /// Cheap reachability check for health checks
    async fn health_check(&self) -> StorageResult<()>;

    /// Get the storage backend type
    fn backend_type(&self) -> StorageBackend;
}
