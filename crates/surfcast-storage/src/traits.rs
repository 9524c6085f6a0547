//! Storage abstraction trait
//!
//! This module defines the Storage trait that all storage backends must implement.

use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("List failed: {0}")]
    ListFailed(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl StorageError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StorageError::NotFound(_))
    }
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Storage abstraction trait
///
/// The upload orchestrator talks to object storage only through this trait,
/// so it works with any backend (and with in-memory fakes in tests).
#[async_trait]
pub trait Storage: Send + Sync {
    /// List the entry names directly below `prefix`.
    ///
    /// Returns `StorageError::NotFound` when the backend knows the prefix does
    /// not exist. Backends without real directories return an empty list instead.
    async fn list_prefix(&self, prefix: &str) -> StorageResult<Vec<String>>;

    /// Write `data` to `storage_key`, replacing any existing object.
    async fn put_object(
        &self,
        storage_key: &str,
        data: Bytes,
        content_type: &str,
    ) -> StorageResult<()>;

    /// Publicly retrievable URL for `storage_key`. Stable for the object's lifetime.
    fn public_url(&self, storage_key: &str) -> String;

    /// Get the storage backend type
    fn backend_type(&self) -> StorageBackend;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_not_found_counts_as_missing_prefix() {
        assert!(StorageError::NotFound("user-1".to_string()).is_not_found());
        assert!(!StorageError::ListFailed("permission denied".to_string()).is_not_found());
        assert!(!StorageError::InvalidKey("../etc".to_string()).is_not_found());
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        assert!(!StorageError::from(io).is_not_found());
    }
}
