use crate::traits::{Storage, StorageError, StorageResult};
use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Local filesystem storage implementation
///
/// Prefixes map to directories below `base_path`, so listing a prefix that was
/// never written reports `NotFound`.
#[derive(Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
    base_url: String,
}

impl LocalStorage {
    /// Create a new LocalStorage instance
    ///
    /// # Arguments
    /// * `base_path` - Root directory for the bucket (e.g., "/var/lib/surfcast/videos")
    /// * `base_url` - Base URL the directory is served from (e.g., "http://localhost:8080/videos")
    pub async fn new(base_path: impl Into<PathBuf>, base_url: String) -> StorageResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create storage directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        Ok(LocalStorage {
            base_path,
            base_url,
        })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Convert storage key to filesystem path with security validation
    ///
    /// Rejects keys that could escape the base storage directory.
    fn key_to_path(&self, storage_key: &str) -> StorageResult<PathBuf> {
        if storage_key.is_empty() || storage_key.contains("..") || storage_key.starts_with('/') {
            return Err(StorageError::InvalidKey(
                "Storage key contains invalid characters".to_string(),
            ));
        }

        let path = self.base_path.join(storage_key.trim_end_matches('/'));

        let base_canonical = self.base_path.canonicalize().map_err(|e| {
            StorageError::ConfigError(format!("Failed to canonicalize base path: {}", e))
        })?;

        if let Ok(canonical) = path.canonicalize() {
            if canonical.strip_prefix(&base_canonical).is_err() {
                return Err(StorageError::InvalidKey(
                    "Storage key resolves outside storage directory".to_string(),
                ));
            }
        }

        Ok(path)
    }

    async fn ensure_parent_dir(&self, path: &Path) -> StorageResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl Storage for LocalStorage {
    async fn list_prefix(&self, prefix: &str) -> StorageResult<Vec<String>> {
        let path = self.key_to_path(prefix)?;

        let mut dir = match fs::read_dir(&path).await {
            Ok(dir) => dir,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StorageError::NotFound(prefix.to_string()));
            }
            Err(e) => {
                return Err(StorageError::ListFailed(format!(
                    "Failed to read directory {}: {}",
                    path.display(),
                    e
                )));
            }
        };

        let mut entries = Vec::new();
        while let Some(entry) = dir.next_entry().await? {
            if let Some(name) = entry.file_name().to_str() {
                entries.push(name.to_string());
            }
        }
        entries.sort();

        tracing::debug!(prefix = %prefix, entries = entries.len(), "Listed local prefix");

        Ok(entries)
    }

    async fn put_object(
        &self,
        storage_key: &str,
        data: Bytes,
        content_type: &str,
    ) -> StorageResult<()> {
        let path = self.key_to_path(storage_key)?;
        let size = data.len();

        self.ensure_parent_dir(&path).await?;

        let start = std::time::Instant::now();

        let mut file = fs::File::create(&path).await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to create file {}: {}", path.display(), e))
        })?;

        file.write_all(&data).await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to write file {}: {}", path.display(), e))
        })?;

        file.sync_all().await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to sync file {}: {}", path.display(), e))
        })?;

        tracing::info!(
            key = %storage_key,
            content_type = %content_type,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage write successful"
        );

        Ok(())
    }

    fn public_url(&self, storage_key: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), storage_key)
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys;
    use tempfile::tempdir;

    #[tokio::test]
    async fn put_then_list() {
        let temp_dir = tempdir().unwrap();
        let storage = LocalStorage::new(temp_dir.path(), "http://localhost:8080/videos".to_string())
            .await
            .unwrap();

        let key = keys::media_key("beach-1", "user-1", "abc", "mp4").unwrap();
        storage
            .put_object(&key, Bytes::from_static(b"video"), "video/mp4")
            .await
            .unwrap();

        let listed = storage.list_prefix("beach-1/user-1").await.unwrap();
        assert_eq!(listed, vec!["abc.mp4".to_string()]);

        let on_disk = std::fs::read(temp_dir.path().join("beach-1/user-1/abc.mp4")).unwrap();
        assert_eq!(on_disk, b"video");
    }

    #[tokio::test]
    async fn missing_prefix_is_not_found() {
        let temp_dir = tempdir().unwrap();
        let storage = LocalStorage::new(temp_dir.path(), "http://localhost".to_string())
            .await
            .unwrap();

        let err = storage.list_prefix("beach-9").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn rejects_traversal_keys() {
        let temp_dir = tempdir().unwrap();
        let storage = LocalStorage::new(temp_dir.path(), "http://localhost".to_string())
            .await
            .unwrap();

        let result = storage
            .put_object("../outside.mp4", Bytes::new(), "video/mp4")
            .await;
        assert!(matches!(result, Err(StorageError::InvalidKey(_))));

        let result = storage.list_prefix("/etc").await;
        assert!(matches!(result, Err(StorageError::InvalidKey(_))));
    }

    #[tokio::test]
    async fn public_url_joins_base_url() {
        let temp_dir = tempdir().unwrap();
        let storage = LocalStorage::new(temp_dir.path(), "http://localhost:8080/videos/".to_string())
            .await
            .unwrap();

        assert_eq!(
            storage.public_url("beach-1/user-1/abc.mp4"),
            "http://localhost:8080/videos/beach-1/user-1/abc.mp4"
        );
        assert_eq!(storage.backend_type(), StorageBackend::Local);
    }
}
