//! Storage abstraction trait
//!
//! This module defines the Storage trait that all blob store backends must implement.

use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Object already exists: {0}")]
    AlreadyExists(String),

    #[error("Download failed: {0}")]
    DownloadFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

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

/// Per-upload options
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadOptions {
    /// `Cache-Control` max-age in seconds, e.g. `"3600"`
    pub cache_control: Option<String>,
    /// MIME type recorded with the object, where the backend supports it
    pub content_type: Option<String>,
    /// Replace an existing object at the same path. When false the upload fails
    /// with [`StorageError::AlreadyExists`].
    pub upsert: bool,
}

impl UploadOptions {
    /// Create-only upload with the given cache control.
    pub fn create_only(cache_control: impl Into<String>) -> Self {
        Self {
            cache_control: Some(cache_control.into()),
            ..Self::default()
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// `Cache-Control` header value, `max-age=<n>` for a bare number.
    pub fn cache_control_header(&self) -> Option<String> {
        self.cache_control.as_ref().map(|value| {
            if value.chars().all(|c| c.is_ascii_digit()) {
                format!("max-age={}", value)
            } else {
                value.clone()
            }
        })
    }
}

/// Blob store abstraction
///
/// All backends (S3, local filesystem) implement this trait so the upload flow
/// can run against any of them. Paths are caller-chosen; see the crate root
/// documentation for the accepted format.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Upload bytes to `path` and return the storage key that was written.
    async fn upload(&self, path: &str, data: Bytes, options: &UploadOptions)
        -> StorageResult<String>;

    /// Download an object by its storage key
    async fn download(&self, storage_key: &str) -> StorageResult<Vec<u8>>;

    /// Delete an object by its storage key. Deleting a missing object succeeds.
    async fn delete(&self, storage_key: &str) -> StorageResult<()>;

    /// Check if an object exists
    async fn exists(&self, storage_key: &str) -> StorageResult<bool>;

    /// Publicly reachable URL for a storage key
    fn public_url(&self, storage_key: &str) -> String;

    /// Get the storage backend type
    fn backend_type(&self) -> StorageBackend;
}
