#[cfg(feature = "storage-local")]
use crate::LocalStorage;
#[cfg(feature = "storage-object")]
use crate::ObjectStorage;
use crate::{Storage, StorageBackend, StorageError, StorageResult};
use std::sync::Arc;
use vidreview_core::Config;

/// Create a storage backend based on configuration
pub async fn create_storage(config: &Config) -> StorageResult<Arc<dyn Storage>> {
    match config.storage_backend() {
        #[cfg(feature = "storage-object")]
        StorageBackend::S3 => {
            let bucket = config
                .s3_bucket()
                .map(String::from)
                .ok_or_else(|| StorageError::ConfigError("S3_BUCKET not configured".to_string()))?;
            let region = config.s3_region().map(String::from);
            let endpoint = config.s3_endpoint().map(String::from);

            let storage = ObjectStorage::s3(bucket, region, endpoint)?;
            Ok(Arc::new(storage))
        }

        #[cfg(feature = "storage-object")]
        StorageBackend::Gcs => {
            let bucket = config
                .gcs_bucket()
                .map(String::from)
                .ok_or_else(|| StorageError::ConfigError("GCS_BUCKET not configured".to_string()))?;

            let storage = ObjectStorage::gcs(bucket)?;
            Ok(Arc::new(storage))
        }

        #[cfg(feature = "storage-object")]
        StorageBackend::Memory => Ok(Arc::new(ObjectStorage::in_memory())),

        #[cfg(not(feature = "storage-object"))]
        backend @ (StorageBackend::S3 | StorageBackend::Gcs | StorageBackend::Memory) => {
            Err(StorageError::ConfigError(format!(
                "{} storage backend not available (storage-object feature not enabled)",
                backend
            )))
        }

        #[cfg(feature = "storage-local")]
        StorageBackend::Local => {
            let storage = LocalStorage::new(config.local_storage_path()).await?;
            Ok(Arc::new(storage))
        }

        #[cfg(not(feature = "storage-local"))]
        StorageBackend::Local => Err(StorageError::ConfigError(
            "Local storage backend not available (storage-local feature not enabled)".to_string(),
        )),
    }
}
