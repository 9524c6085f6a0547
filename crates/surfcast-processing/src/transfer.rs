//! Encoding and transfer to object storage

use bytes::Bytes;
use surfcast_core::models::MediaAsset;
use surfcast_storage::keys;
use surfcast_storage::{Storage, StorageResult};

pub const MARKER_CONTENT_TYPE: &str = "text/plain";
pub const THUMBNAIL_CONTENT_TYPE: &str = "image/jpeg";

/// An object ready to hand to the storage client
#[derive(Debug, Clone)]
pub struct EncodedObject {
    pub storage_path: String,
    pub data: Bytes,
    pub content_type: &'static str,
}

impl EncodedObject {
    pub fn new(storage_path: String, raw: Vec<u8>, content_type: &'static str) -> Self {
        Self {
            storage_path,
            data: Bytes::from(raw),
            content_type,
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Make `prefix` visible in storage.
///
/// A missing prefix is fine. When the listing comes back empty a zero-byte
/// marker is written. Returns whether a marker was written.
pub async fn ensure_prefix(storage: &dyn Storage, prefix: &str) -> StorageResult<bool> {
    let entries = match storage.list_prefix(prefix).await {
        Ok(entries) => entries,
        Err(e) if e.is_not_found() => Vec::new(),
        Err(e) => return Err(e),
    };

    if !entries.is_empty() {
        return Ok(false);
    }

    let marker = keys::marker_key(prefix);
    storage
        .put_object(&marker, Bytes::new(), MARKER_CONTENT_TYPE)
        .await?;

    tracing::debug!(prefix = %prefix, marker = %marker, "Created prefix marker");

    Ok(true)
}

/// Write one object and resolve its public URL.
pub async fn put_asset(storage: &dyn Storage, object: EncodedObject) -> StorageResult<MediaAsset> {
    let size = object.len();
    storage
        .put_object(&object.storage_path, object.data, object.content_type)
        .await?;

    let public_url = storage.public_url(&object.storage_path);

    tracing::debug!(
        key = %object.storage_path,
        size_bytes = size,
        url = %public_url,
        "Asset stored"
    );

    Ok(MediaAsset {
        storage_path: object.storage_path,
        public_url,
    })
}
