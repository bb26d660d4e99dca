//! Storage doubles and log capture for failure-path tests.

use async_trait::async_trait;
use axum::body::Bytes;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer};
use vidreview_core::{ByteRange, StorageBackend};
use vidreview_storage::{ByteStream, ObjectInfo, Storage, StorageError, StorageResult};

/// Where the failure is injected.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FailAt {
    Exists,
    Metadata,
    OpenStream,
    List,
}

/// Storage where every object exists with `size` bytes, failing at `fail_at`.
pub struct FailingStorage {
    pub fail_at: FailAt,
    pub size: u64,
}

impl FailingStorage {
    pub fn new(fail_at: FailAt) -> Self {
        Self { fail_at, size: 1000 }
    }

    fn check(&self, step: FailAt) -> StorageResult<()> {
        if self.fail_at == step {
            Err(StorageError::BackendError(format!(
                "injected failure at {:?}: connection reset",
                step
            )))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl Storage for FailingStorage {
    async fn exists(&self, _storage_key: &str) -> StorageResult<bool> {
        self.check(FailAt::Exists)?;
        Ok(true)
    }

    async fn metadata(&self, _storage_key: &str) -> StorageResult<ObjectInfo> {
        self.check(FailAt::Metadata)?;
        Ok(ObjectInfo { size: self.size })
    }

    async fn open_stream(
        &self,
        _storage_key: &str,
        _range: Option<ByteRange>,
    ) -> StorageResult<ByteStream> {
        self.check(FailAt::OpenStream)?;
        Ok(Box::pin(futures::stream::empty()))
    }

    async fn list(&self, _prefix: &str) -> StorageResult<Vec<String>> {
        self.check(FailAt::List)?;
        Ok(Vec::new())
    }

    async fn health_check(&self) -> StorageResult<()> {
        Err(StorageError::BackendError("unreachable".to_string()))
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Memory
    }
}

/// Counts ERROR events emitted by the HTTP error boundary.
#[derive(Clone, Default)]
pub struct ErrorCounter(Arc<AtomicUsize>);

impl ErrorCounter {
    pub fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

impl<S: Subscriber> Layer<S> for ErrorCounter {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let meta = event.metadata();
        if *meta.level() == Level::ERROR && meta.target() == "vidreview_api::error" {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }
}

/// Sets its flag when dropped, to observe when a body stream is released.
pub struct DropFlag(pub Arc<AtomicBool>);

impl Drop for DropFlag {
    fn drop(&mut self) {
        self.0.store(true, Ordering::SeqCst);
    }
}

/// What the body stream of [`ScriptedStorage`] does.
#[derive(Clone)]
pub enum Script {
    /// Yields `chunk`-sized blocks forever; the flag is set once the stream is dropped.
    Endless { chunk: usize, released: Arc<AtomicBool> },
    /// Yields one `chunk`-sized block, then a read error.
    FailAfterFirst { chunk: usize },
}

/// Storage where every object exists with `size` bytes and the body follows `script`.
pub struct ScriptedStorage {
    pub size: u64,
    pub script: Script,
}

#[async_trait]
impl Storage for ScriptedStorage {
    async fn exists(&self, _storage_key: &str) -> StorageResult<bool> {
        Ok(true)
    }

    async fn metadata(&self, _storage_key: &str) -> StorageResult<ObjectInfo> {
        Ok(ObjectInfo { size: self.size })
    }

    async fn open_stream(
        &self,
        _storage_key: &str,
        _range: Option<ByteRange>,
    ) -> StorageResult<ByteStream> {
        match self.script.clone() {
            Script::Endless { chunk, released } => {
                let guard = DropFlag(released);
                let stream = futures::stream::unfold(guard, move |guard| async move {
                    Some((Ok::<_, StorageError>(Bytes::from(vec![0u8; chunk])), guard))
                });
                Ok(Box::pin(stream))
            }
            Script::FailAfterFirst { chunk } => {
                let items = vec![
                    Ok(Bytes::from(vec![0u8; chunk])),
                    Err(StorageError::DownloadFailed("connection reset".to_string())),
                ];
                Ok(Box::pin(futures::stream::iter(items)))
            }
        }
    }

    async fn list(&self, _prefix: &str) -> StorageResult<Vec<String>> {
        Ok(Vec::new())
    }

    async fn health_check(&self) -> StorageResult<()> {
        Ok(())
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Memory
    }
}
