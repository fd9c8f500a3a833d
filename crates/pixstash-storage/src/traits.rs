//! Storage abstraction trait
//!
//! This module defines the Storage trait that storage backends implement.

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use futures::Stream;
use std::path::PathBuf;
use std::pin::Pin;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Write failed: {0}")]
    WriteFailed(String),

    #[error("Download failed: {0}")]
    DownloadFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Object already exists: {0}")]
    AlreadyExists(String),

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

/// Chunked object body
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, StorageError>> + Send>>;

/// Metadata of a stored object, read from the filesystem
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectMeta {
    pub key: String,
    pub size: u64,
    pub modified: DateTime<Utc>,
}

/// Storage abstraction trait
///
/// **Key format:** keys are bare filenames in a flat namespace. See the crate
/// root documentation.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Resolve a key to the filesystem path it is stored at.
    ///
    /// Used by writers that produce the object themselves (the transcoder).
    fn object_path(&self, key: &str) -> StorageResult<PathBuf>;

    /// Write `data` verbatim to a fresh object at `key` and return the number
    /// of bytes written.
    ///
    /// The destination is created exclusively; an existing object is never
    /// overwritten. The object only becomes visible once every byte is on disk,
    /// so a failed or dropped write leaves nothing under `key`.
    async fn write_verbatim(&self, key: &str, data: Bytes) -> StorageResult<u64>;

    /// List every stored object
    async fn list(&self) -> StorageResult<Vec<ObjectMeta>>;

    /// Download an object as a stream of chunks
    async fn download_stream(&self, key: &str) -> StorageResult<(ObjectMeta, ByteStream)>;

    /// Delete an object and return the size it had
    ///
    /// Returns `NotFound` when nothing is stored at `key`.
    async fn delete(&self, key: &str) -> StorageResult<u64>;

    /// Check that the storage location is reachable
    async fn check_health(&self) -> StorageResult<()>;
}
