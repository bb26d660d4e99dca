//! vidreview Storage Library
//!
//! This crate provides the storage abstraction and its implementations for
//! the review server: the local filesystem and cloud object stores.
//!
//! # Storage key format
//!
//! All backends use the same key layout:
//!
//! - **Review clips**: `{review_prefix}/{batch}/{sign}/{filename}`
//! - **Reference clips**: `{reference_prefix}/{filename}`
//!
//! Keys are built by `vidreview_core::VideoLayout`; backends only resolve them.

pub mod factory;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-object")]
pub mod object;
pub mod traits;

// Re-export commonly used types
pub use factory::create_storage;
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
#[cfg(feature = "storage-object")]
pub use object::ObjectStorage;
pub use traits::{ByteStream, ObjectInfo, Storage, StorageError, StorageResult};
pub use vidreview_core::StorageBackend;
