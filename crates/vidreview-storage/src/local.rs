use crate::traits::{ByteStream, ObjectInfo, Storage, StorageError, StorageResult};
use crate::StorageBackend;
use async_trait::async_trait;
use futures::StreamExt;
use std::io::{ErrorKind, SeekFrom};
use std::path::{Component, Path, PathBuf};
use tokio::fs;
use tokio::io::{AsyncReadExt, AsyncSeekExt};
use tokio_util::io::ReaderStream;
use vidreview_core::ByteRange;

/// Read buffer size for streamed responses
const STREAM_CHUNK_SIZE: usize = 64 * 1024;

/// Local filesystem storage implementation
#[derive(Clone, Debug)]
pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    /// Create a new LocalStorage rooted at `base_path` (e.g. "/srv/videos").
    ///
    /// The directory must already exist; a mistyped path fails at startup
    /// instead of serving an empty tree.
    pub async fn new(base_path: impl Into<PathBuf>) -> StorageResult<Self> {
        let base_path = base_path.into();

        let metadata = fs::metadata(&base_path).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Storage directory {} is not accessible: {}",
                base_path.display(),
                e
            ))
        })?;
        if !metadata.is_dir() {
            return Err(StorageError::ConfigError(format!(
                "Storage path {} is not a directory",
                base_path.display()
            )));
        }

        Ok(LocalStorage { base_path })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Convert storage key to filesystem path.
    ///
    /// Only plain relative components are accepted, so a key can never
    /// address anything outside `base_path`.
    fn key_to_path(&self, storage_key: &str) -> StorageResult<PathBuf> {
        if storage_key.is_empty() || storage_key.contains('\\') {
            return Err(StorageError::InvalidKey(storage_key.to_string()));
        }

        let relative = Path::new(storage_key);
        let all_normal = relative
            .components()
            .all(|component| matches!(component, Component::Normal(_)));
        if !all_normal {
            return Err(StorageError::InvalidKey(storage_key.to_string()));
        }

        Ok(self.base_path.join(relative))
    }

    fn path_to_key(&self, path: &Path) -> Option<String> {
        let relative = path.strip_prefix(&self.base_path).ok()?;
        let parts: Option<Vec<&str>> = relative
            .components()
            .map(|component| match component {
                Component::Normal(part) => part.to_str(),
                _ => None,
            })
            .collect();
        parts.map(|parts| parts.join("/"))
    }
}

fn map_io_error(storage_key: &str, err: std::io::Error) -> StorageError {
    if err.kind() == ErrorKind::NotFound {
        StorageError::NotFound(storage_key.to_string())
    } else {
        StorageError::IoError(err)
    }
}

#[async_trait]
impl Storage for LocalStorage {
    async fn exists(&self, storage_key: &str) -> StorageResult<bool> {
        let path = self.key_to_path(storage_key)?;
        match fs::metadata(&path).await {
            Ok(meta) => Ok(meta.is_file()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(StorageError::IoError(e)),
        }
    }

    async fn metadata(&self, storage_key: &str) -> StorageResult<ObjectInfo> {
        let path = self.key_to_path(storage_key)?;
        let meta = fs::metadata(&path)
            .await
            .map_err(|e| map_io_error(storage_key, e))?;
        if !meta.is_file() {
            return Err(StorageError::NotFound(storage_key.to_string()));
        }
        Ok(ObjectInfo { size: meta.len() })
    }

    async fn open_stream(
        &self,
        storage_key: &str,
        range: Option<ByteRange>,
    ) -> StorageResult<ByteStream> {
        let path = self.key_to_path(storage_key)?;

        let mut file = fs::File::open(&path).await.map_err(|e| match e.kind() {
            ErrorKind::NotFound => StorageError::NotFound(storage_key.to_string()),
            _ => StorageError::DownloadFailed(format!(
                "Failed to open file {}: {}",
                path.display(),
                e
            )),
        })?;

        let stream = match range {
            Some(range) => {
                file.seek(SeekFrom::Start(range.start)).await.map_err(|e| {
                    StorageError::DownloadFailed(format!(
                        "Failed to seek {} to {}: {}",
                        path.display(),
                        range.start,
                        e
                    ))
                })?;
                ReaderStream::with_capacity(file.take(range.len()), STREAM_CHUNK_SIZE).boxed()
            }
            None => ReaderStream::with_capacity(file, STREAM_CHUNK_SIZE).boxed(),
        };

        tracing::debug!(
            path = %path.display(),
            key = %storage_key,
            range = ?range,
            "Local storage stream opened"
        );

        Ok(Box::pin(stream.map(|result| {
            result.map_err(|e| StorageError::DownloadFailed(format!("Failed to read chunk: {}", e)))
        })))
    }

    async fn list(&self, prefix: &str) -> StorageResult<Vec<String>> {
        let root = if prefix.trim_matches('/').is_empty() {
            self.base_path.clone()
        } else {
            self.key_to_path(prefix.trim_matches('/'))?
        };

        let mut keys = Vec::new();
        let mut pending = vec![root];

        while let Some(dir) = pending.pop() {
            let mut entries = match fs::read_dir(&dir).await {
                Ok(entries) => entries,
                Err(e) if e.kind() == ErrorKind::NotFound => continue,
                Err(e) => return Err(StorageError::IoError(e)),
            };

            while let Some(entry) = entries.next_entry().await? {
                let file_type = entry.file_type().await?;
                let path = entry.path();
                if file_type.is_dir() {
                    pending.push(path);
                } else if file_type.is_file() {
                    if let Some(key) = self.path_to_key(&path) {
                        keys.push(key);
                    }
                }
            }
        }

        keys.sort();
        tracing::debug!(prefix = %prefix, count = keys.len(), "Local storage listing");
        Ok(keys)
    }

    async fn health_check(&self) -> StorageResult<()> {
        let meta = fs::metadata(&self.base_path).await?;
        if !meta.is_dir() {
            return Err(StorageError::ConfigError(format!(
                "{} is not a directory",
                self.base_path.display()
            )));
        }
        Ok(())
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}

#[cfg(all(test, feature = "storage-local"))]
mod tests {
    use super::*;
    use tempfile::tempdir;

    async fn collect(stream: ByteStream) -> Vec<u8> {
        let chunks: Vec<_> = stream.collect().await;
        chunks
            .into_iter()
            .flat_map(|chunk| chunk.unwrap().to_vec())
            .collect()
    }

    async fn storage_with_file(key: &str, data: &[u8]) -> (tempfile::TempDir, LocalStorage) {
        let dir = tempdir().unwrap();
        let path = dir.path().join(key);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, data).unwrap();
        let storage = LocalStorage::new(dir.path()).await.unwrap();
        (dir, storage)
    }

    #[tokio::test]
    async fn test_exists_and_metadata() {
        let (_dir, storage) = storage_with_file("ReviewVideos/b/s/a.mp4", b"0123456789").await;

        assert!(storage.exists("ReviewVideos/b/s/a.mp4").await.unwrap());
        assert!(!storage.exists("ReviewVideos/b/s/missing.mp4").await.unwrap());
        // Directories are not objects.
        assert!(!storage.exists("ReviewVideos/b").await.unwrap());

        let info = storage.metadata("ReviewVideos/b/s/a.mp4").await.unwrap();
        assert_eq!(info.size, 10);

        assert!(matches!(
            storage.metadata("nope.mp4").await,
            Err(StorageError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_full_and_bounded_streams() {
        let data: Vec<u8> = (0..=255u8).cycle().take(200_000).collect();
        let (_dir, storage) = storage_with_file("v.mp4", &data).await;

        let full = collect(storage.open_stream("v.mp4", None).await.unwrap()).await;
        assert_eq!(full, data);

        let range = ByteRange::new(100, 150_099).unwrap();
        let part = collect(storage.open_stream("v.mp4", Some(range)).await.unwrap()).await;
        assert_eq!(part.len() as u64, range.len());
        assert_eq!(part.as_slice(), &data[100..=150_099]);
    }

    #[tokio::test]
    async fn test_rejects_escaping_keys() {
        let (_dir, storage) = storage_with_file("a.mp4", b"x").await;
        for key in ["../a.mp4", "/etc/passwd", "a/../../b", "", "a\\b"] {
            assert!(
                matches!(storage.exists(key).await, Err(StorageError::InvalidKey(_))),
                "key {:?} should be rejected",
                key
            );
        }
    }

    #[tokio::test]
    async fn test_list_is_recursive_and_relative() {
        let dir = tempdir().unwrap();
        for key in [
            "ReviewVideos/b1/A/1.mp4",
            "ReviewVideos/b2/B/2.mp4",
            "ReferenceVideos/A.mp4",
        ] {
            let path = dir.path().join(key);
            std::fs::create_dir_all(path.parent().unwrap()).unwrap();
            std::fs::write(path, b"x").unwrap();
        }
        let storage = LocalStorage::new(dir.path()).await.unwrap();

        let keys = storage.list("ReviewVideos").await.unwrap();
        assert_eq!(
            keys,
            vec![
                "ReviewVideos/b1/A/1.mp4".to_string(),
                "ReviewVideos/b2/B/2.mp4".to_string()
            ]
        );
        assert!(storage.list("Missing").await.unwrap().is_empty());
        assert_eq!(storage.list("").await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_health_check() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(dir.path()).await.unwrap();
        storage.health_check().await.unwrap();
        assert_eq!(storage.backend_type(), StorageBackend::Local);
    }

    #[tokio::test]
    async fn test_missing_root_is_rejected() {
        let dir = tempdir().unwrap();
        let err = LocalStorage::new(dir.path().join("absent")).await.unwrap_err();
        assert!(matches!(err, StorageError::ConfigError(ref msg) if msg.contains("absent")));
        assert!(!dir.path().join("absent").exists());
    }

    #[tokio::test]
    async fn test_file_root_is_rejected() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("videos.txt");
        std::fs::write(&file, b"x").unwrap();
        let err = LocalStorage::new(&file).await.unwrap_err();
        assert!(matches!(
            err,
            StorageError::ConfigError(ref msg) if msg.contains("not a directory")
        ));
    }
}
