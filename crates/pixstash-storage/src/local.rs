use crate::keys::validate_key;
use crate::staging::{write_exclusive, PublishError, STAGING_PREFIX};
use crate::traits::{ByteStream, ObjectMeta, Storage, StorageError, StorageResult};
use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use futures::StreamExt;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::oneshot;

/// Local filesystem storage implementation
#[derive(Clone, Debug)]
pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    /// Create a new LocalStorage instance
    ///
    /// # Arguments
    /// * `base_path` - Flat directory holding every object (e.g., "./uploads")
    pub async fn new(base_path: impl Into<PathBuf>) -> StorageResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create storage directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        Ok(LocalStorage { base_path })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Convert storage key to filesystem path with security validation
    fn key_to_path(&self, storage_key: &str) -> StorageResult<PathBuf> {
        validate_key(storage_key)?;
        Ok(self.base_path.join(storage_key))
    }

    async fn meta_for(&self, key: &str, path: &Path) -> StorageResult<ObjectMeta> {
        let meta = match fs::metadata(path).await {
            Ok(meta) => meta,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StorageError::NotFound(key.to_string()))
            }
            Err(e) => return Err(StorageError::IoError(e)),
        };

        if !meta.is_file() {
            return Err(StorageError::NotFound(key.to_string()));
        }

        Ok(ObjectMeta {
            key: key.to_string(),
            size: meta.len(),
            modified: DateTime::<Utc>::from(meta.modified()?),
        })
    }
}

#[async_trait]
impl Storage for LocalStorage {
    fn object_path(&self, key: &str) -> StorageResult<PathBuf> {
        self.key_to_path(key)
    }

    async fn write_verbatim(&self, key: &str, data: Bytes) -> StorageResult<u64> {
        let path = self.key_to_path(key)?;
        let start = std::time::Instant::now();
        let size = data.len() as u64;

        // The blocking write sees the sender close once this future is dropped
        let (caller_gone, caller) = oneshot::channel::<()>();
        let target = path.clone();
        let result = tokio::task::spawn_blocking(move || {
            write_exclusive(&target, &data, || caller_gone.is_closed())
        })
        .await;
        drop(caller);

        match result {
            Ok(Ok(())) => {}
            Ok(Err(PublishError::AlreadyExists)) => {
                return Err(StorageError::AlreadyExists(key.to_string()))
            }
            Ok(Err(e)) => {
                return Err(StorageError::WriteFailed(format!(
                    "Failed to write file {}: {}",
                    path.display(),
                    e
                )))
            }
            Err(e) => {
                return Err(StorageError::WriteFailed(format!(
                    "Write task for {} failed: {}",
                    path.display(),
                    e
                )))
            }
        }

        tracing::info!(
            path = %path.display(),
            key = %key,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage write successful"
        );

        Ok(size)
    }

    async fn list(&self) -> StorageResult<Vec<ObjectMeta>> {
        let mut entries = fs::read_dir(&self.base_path).await.map_err(|e| {
            StorageError::BackendError(format!(
                "Failed to read storage directory {}: {}",
                self.base_path.display(),
                e
            ))
        })?;

        let mut objects = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let file_type = entry.file_type().await?;
            if !file_type.is_file() {
                continue;
            }
            let Some(name) = entry.file_name().to_str().map(String::from) else {
                continue;
            };
            if name.starts_with(STAGING_PREFIX) {
                continue;
            }
            let meta = entry.metadata().await?;
            objects.push(ObjectMeta {
                key: name,
                size: meta.len(),
                modified: DateTime::<Utc>::from(meta.modified()?),
            });
        }

        objects.sort_by(|a, b| a.key.cmp(&b.key));
        Ok(objects)
    }

    async fn download_stream(&self, key: &str) -> StorageResult<(ObjectMeta, ByteStream)> {
        let path = self.key_to_path(key)?;
        let start = std::time::Instant::now();

        let file = match fs::File::open(&path).await {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StorageError::NotFound(key.to_string()))
            }
            Err(e) => {
                return Err(StorageError::DownloadFailed(format!(
                    "Failed to open file {}: {}",
                    path.display(),
                    e
                )))
            }
        };
        let meta = self.meta_for(key, &path).await?;

        let reader = tokio_util::io::ReaderStream::new(file);

        let key_owned = key.to_string();
        let path_display = path.display().to_string();
        let stream = reader.map(move |result| {
            result.map_err(|e| {
                tracing::error!(
                    path = %path_display,
                    key = %key_owned,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    error = %e,
                    "Local storage stream download error"
                );
                StorageError::DownloadFailed(format!("Failed to read chunk: {}", e))
            })
        });

        Ok((meta, Box::pin(stream)))
    }

    async fn delete(&self, key: &str) -> StorageResult<u64> {
        let path = self.key_to_path(key)?;
        let start = std::time::Instant::now();

        let meta = self.meta_for(key, &path).await?;

        fs::remove_file(&path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                StorageError::NotFound(key.to_string())
            } else {
                StorageError::DeleteFailed(format!(
                    "Failed to delete file {}: {}",
                    path.display(),
                    e
                ))
            }
        })?;

        tracing::info!(
            path = %path.display(),
            key = %key,
            size_bytes = meta.size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage delete successful"
        );

        Ok(meta.size)
    }

    async fn check_health(&self) -> StorageResult<()> {
        let meta = fs::metadata(&self.base_path).await.map_err(|e| {
            StorageError::BackendError(format!(
                "Storage directory {} not accessible: {}",
                self.base_path.display(),
                e
            ))
        })?;
        if !meta.is_dir() {
            return Err(StorageError::BackendError(format!(
                "Storage path {} is not a directory",
                self.base_path.display()
            )));
        }
        Ok(())
    }
}

#[cfg(all(test, feature = "storage-local"))]
mod tests {
    use super::*;
    use futures::StreamExt;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_write_verbatim_and_stream_back() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(dir.path()).await.unwrap();

        let data = Bytes::from_static(b"test data");
        let written = storage
            .write_verbatim("object.bin", data.clone())
            .await
            .unwrap();
        assert_eq!(written, data.len() as u64);

        let (meta, mut stream) = storage.download_stream("object.bin").await.unwrap();
        assert_eq!(meta.size, data.len() as u64);

        let mut downloaded = Vec::new();
        while let Some(chunk) = stream.next().await {
            downloaded.extend_from_slice(&chunk.unwrap());
        }
        assert_eq!(&downloaded[..], &data[..]);
    }

    #[tokio::test]
    async fn test_write_verbatim_never_overwrites() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(dir.path()).await.unwrap();

        storage
            .write_verbatim("same.bin", Bytes::from_static(b"first"))
            .await
            .unwrap();
        let result = storage
            .write_verbatim("same.bin", Bytes::from_static(b"second"))
            .await;
        assert!(matches!(result, Err(StorageError::AlreadyExists(_))));

        let on_disk = std::fs::read(dir.path().join("same.bin")).unwrap();
        assert_eq!(on_disk, b"first");
    }

    #[tokio::test]
    async fn test_write_verbatim_empty_payload() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(dir.path()).await.unwrap();

        let written = storage.write_verbatim("empty.png", Bytes::new()).await.unwrap();
        assert_eq!(written, 0);
        assert_eq!(std::fs::metadata(dir.path().join("empty.png")).unwrap().len(), 0);
    }

    #[tokio::test]
    async fn test_write_into_missing_directory_fails_without_residue() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(dir.path().join("gone")).await.unwrap();
        std::fs::remove_dir(dir.path().join("gone")).unwrap();

        let result = storage
            .write_verbatim("a.bin", Bytes::from_static(b"abc"))
            .await;
        assert!(matches!(result, Err(StorageError::WriteFailed(_))));
        assert!(!dir.path().join("gone").join("a.bin").exists());
    }

    #[tokio::test]
    async fn test_path_traversal_rejected() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(dir.path()).await.unwrap();

        let result = storage.download_stream("../../../etc/passwd").await;
        assert!(matches!(result, Err(StorageError::InvalidKey(_))));

        let result = storage.delete("../etc/passwd").await;
        assert!(matches!(result, Err(StorageError::InvalidKey(_))));

        let result = storage.download_stream("/etc/passwd").await;
        assert!(matches!(result, Err(StorageError::InvalidKey(_))));

        let result = storage
            .write_verbatim("nested/file.bin", Bytes::from_static(b"x"))
            .await;
        assert!(matches!(result, Err(StorageError::InvalidKey(_))));
    }

    #[tokio::test]
    async fn test_delete_returns_size_and_missing_is_not_found() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(dir.path()).await.unwrap();

        storage
            .write_verbatim("gone.txt", Bytes::from_static(b"12345"))
            .await
            .unwrap();
        assert_eq!(storage.delete("gone.txt").await.unwrap(), 5);
        assert!(!dir.path().join("gone.txt").exists());

        let result = storage.delete("gone.txt").await;
        assert!(matches!(result, Err(StorageError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_list_skips_directories_and_staging_files() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(dir.path()).await.unwrap();

        storage
            .write_verbatim("b.txt", Bytes::from_static(b"bb"))
            .await
            .unwrap();
        storage
            .write_verbatim("a.txt", Bytes::from_static(b"a"))
            .await
            .unwrap();
        std::fs::create_dir(dir.path().join("subdir")).unwrap();
        std::fs::write(dir.path().join(".c.txt.part"), b"half").unwrap();

        let objects = storage.list().await.unwrap();
        let names: Vec<_> = objects.iter().map(|o| o.key.as_str()).collect();
        assert_eq!(names, vec!["a.txt", "b.txt"]);
        assert_eq!(objects[1].size, 2);
    }

    #[tokio::test]
    async fn test_download_missing_is_not_found() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(dir.path()).await.unwrap();

        let result = storage.download_stream("nope.webp").await;
        assert!(matches!(result, Err(StorageError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_staging_names_are_not_addressable() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(dir.path()).await.unwrap();
        std::fs::write(dir.path().join(".a.bin.part"), b"half").unwrap();

        let result = storage.download_stream(".a.bin.part").await;
        assert!(matches!(result, Err(StorageError::InvalidKey(_))));
        let result = storage.delete(".a.bin.part").await;
        assert!(matches!(result, Err(StorageError::InvalidKey(_))));
    }

    #[test]
    fn test_dropped_write_leaves_no_object() {
        let dir = tempdir().unwrap();
        let data = Bytes::from(vec![7u8; 32 * 1024 * 1024]);

        let runtime = tokio::runtime::Runtime::new().unwrap();
        runtime.block_on(async {
            let storage = LocalStorage::new(dir.path()).await.unwrap();
            let mut write = storage.write_verbatim("big.bin", data);
            // One poll hands the bytes to the blocking pool, then the caller goes away
            assert!(futures::poll!(write.as_mut()).is_pending());
        });
        // Shutting down waits for the blocking write that is already running
        drop(runtime);

        assert!(!dir.path().join("big.bin").exists());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_check_health() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(dir.path().join("data")).await.unwrap();
        assert!(storage.check_health().await.is_ok());

        std::fs::remove_dir(dir.path().join("data")).unwrap();
        assert!(storage.check_health().await.is_err());
    }
}
