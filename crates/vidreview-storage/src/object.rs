use crate::traits::{ByteStream, ObjectInfo, Storage, StorageError, StorageResult};
use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use futures::{StreamExt, TryStreamExt};
use object_store::aws::AmazonS3Builder;
use object_store::gcp::GoogleCloudStorageBuilder;
use object_store::memory::InMemory;
use object_store::path::Path;
use object_store::Error as ObjectStoreError;
use object_store::{GetOptions, GetRange, ObjectStore, ObjectStoreExt, PutPayload};
use std::sync::Arc;
use vidreview_core::ByteRange;

/// Cloud object storage (S3, S3-compatible, GCS) behind the `object_store` crate.
#[derive(Clone)]
pub struct ObjectStorage {
    store: Arc<dyn ObjectStore>,
    bucket: String,
    backend: StorageBackend,
}

impl ObjectStorage {
    /// Create an S3 backed store
    ///
    /// # Arguments
    /// * `bucket` - S3 bucket name
    /// * `region` - AWS region (or region identifier for S3-compatible providers)
    /// * `endpoint_url` - Optional custom endpoint for S3-compatible providers
    ///   (e.g., "http://localhost:9000" for MinIO)
    pub fn s3(
        bucket: String,
        region: Option<String>,
        endpoint_url: Option<String>,
    ) -> StorageResult<Self> {
        let mut builder = AmazonS3Builder::from_env().with_bucket_name(bucket.clone());

        if let Some(region) = region {
            builder = builder.with_region(region);
        }

        if let Some(ref endpoint) = endpoint_url {
            let allow_http = endpoint.starts_with("http://");
            builder = builder
                .with_endpoint(endpoint.clone())
                .with_allow_http(allow_http);
        }

        let store = builder
            .build()
            .map_err(|e| StorageError::ConfigError(e.to_string()))?;

        Ok(Self {
            store: Arc::new(store),
            bucket,
            backend: StorageBackend::S3,
        })
    }

    /// Create a Google Cloud Storage backed store. Credentials come from the
    /// usual `GOOGLE_*` environment variables.
    pub fn gcs(bucket: String) -> StorageResult<Self> {
        let store = GoogleCloudStorageBuilder::from_env()
            .with_bucket_name(bucket.clone())
            .build()
            .map_err(|e| StorageError::ConfigError(e.to_string()))?;

        Ok(Self {
            store: Arc::new(store),
            bucket,
            backend: StorageBackend::Gcs,
        })
    }

    /// In-process store, for tests and local experiments.
    pub fn in_memory() -> Self {
        Self {
            store: Arc::new(InMemory::new()),
            bucket: "memory".to_string(),
            backend: StorageBackend::Memory,
        }
    }

    /// Write an object. Only used to seed in-memory stores.
    pub async fn put(&self, storage_key: &str, data: impl Into<Bytes>) -> StorageResult<()> {
        self.store
            .put(&location(storage_key)?, PutPayload::from(data.into()))
            .await
            .map_err(|e| StorageError::BackendError(e.to_string()))?;
        Ok(())
    }

    fn map_error(&self, storage_key: &str, err: ObjectStoreError) -> StorageError {
        match err {
            ObjectStoreError::NotFound { .. } => StorageError::NotFound(storage_key.to_string()),
            other => StorageError::BackendError(format!(
                "{} ({}): {}",
                self.bucket, self.backend, other
            )),
        }
    }
}

/// Keys map verbatim onto object paths, so a listed key addresses the same
/// object when it is looked up again.
fn location(storage_key: &str) -> StorageResult<Path> {
    Path::parse(storage_key).map_err(|_| StorageError::InvalidKey(storage_key.to_string()))
}

#[async_trait]
impl Storage for ObjectStorage {
    async fn exists(&self, storage_key: &str) -> StorageResult<bool> {
        let location = location(storage_key)?;
        match self.store.head(&location).await {
            Ok(_) => Ok(true),
            Err(ObjectStoreError::NotFound { .. }) => Ok(false),
            Err(e) => Err(self.map_error(storage_key, e)),
        }
    }

    async fn metadata(&self, storage_key: &str) -> StorageResult<ObjectInfo> {
        let location = location(storage_key)?;
        let meta = self
            .store
            .head(&location)
            .await
            .map_err(|e| self.map_error(storage_key, e))?;
        Ok(ObjectInfo { size: meta.size })
    }

    async fn open_stream(
        &self,
        storage_key: &str,
        range: Option<ByteRange>,
    ) -> StorageResult<ByteStream> {
        let start = std::time::Instant::now();
        let location = location(storage_key)?;

        let options = GetOptions {
            range: range.map(|r| GetRange::Bounded(r.as_exclusive())),
            ..Default::default()
        };

        let result = self
            .store
            .get_opts(&location, options)
            .await
            .map_err(|e| self.map_error(storage_key, e))?;

        tracing::debug!(
            bucket = %self.bucket,
            key = %storage_key,
            range = ?range,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Object store stream opened"
        );

        let stream = result
            .into_stream()
            .map(|res| res.map_err(|e| StorageError::DownloadFailed(e.to_string())));

        Ok(Box::pin(stream))
    }

    async fn list(&self, prefix: &str) -> StorageResult<Vec<String>> {
        let prefix = prefix.trim_matches('/');
        let prefix_path = if prefix.is_empty() {
            None
        } else {
            Some(location(prefix)?)
        };

        let objects: Vec<_> = self
            .store
            .list(prefix_path.as_ref())
            .try_collect()
            .await
            .map_err(|e| self.map_error(prefix, e))?;

        let mut keys: Vec<String> = objects
            .iter()
            .map(|meta| meta.location.as_ref().to_string())
            .collect();
        keys.sort();

        tracing::debug!(
            bucket = %self.bucket,
            prefix = %prefix,
            count = keys.len(),
            "Object store listing"
        );
        Ok(keys)
    }

    async fn health_check(&self) -> StorageResult<()> {
        self.store
            .list_with_delimiter(None)
            .await
            .map(|_| ())
            .map_err(|e| self.map_error("", e))
    }

    fn backend_type(&self) -> StorageBackend {
        self.backend
    }
}
