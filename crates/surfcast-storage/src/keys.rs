//! Shared key generation for storage backends.
//!
//! Key format: `{collection_id}/{uploader_id}/{file_id}.{ext}` for media and
//! `{collection_id}/{uploader_id}/{file_id}_thumb.jpg` for its thumbnail.

use crate::{StorageError, StorageResult};

/// Name of the placeholder object that makes an empty prefix visible.
pub const PREFIX_MARKER: &str = ".keep";

/// Extension used for generated thumbnails.
pub const THUMBNAIL_EXTENSION: &str = "jpg";

/// Reject key segments that would change the shape of the key.
pub fn validate_segment(segment: &str) -> StorageResult<()> {
    if segment.trim().is_empty() {
        return Err(StorageError::InvalidKey("empty key segment".to_string()));
    }
    if segment.contains('/') || segment.contains("..") || segment.contains('\\') {
        return Err(StorageError::InvalidKey(format!(
            "key segment contains invalid characters: {}",
            segment
        )));
    }
    Ok(())
}

/// `{collection_id}/{uploader_id}`: the folder holding one uploader's files for a collection.
pub fn uploader_prefix(collection_id: &str, uploader_id: &str) -> StorageResult<String> {
    validate_segment(collection_id)?;
    validate_segment(uploader_id)?;
    Ok(format!("{}/{}", collection_id, uploader_id))
}

/// Key of the media object.
pub fn media_key(
    collection_id: &str,
    uploader_id: &str,
    file_id: &str,
    extension: &str,
) -> StorageResult<String> {
    validate_segment(file_id)?;
    validate_segment(extension)?;
    Ok(format!(
        "{}/{}.{}",
        uploader_prefix(collection_id, uploader_id)?,
        file_id,
        extension
    ))
}

/// Key of the thumbnail: same base name as the media with a `_thumb` suffix.
pub fn thumbnail_key(collection_id: &str, uploader_id: &str, file_id: &str) -> StorageResult<String> {
    validate_segment(file_id)?;
    Ok(format!(
        "{}/{}_thumb.{}",
        uploader_prefix(collection_id, uploader_id)?,
        file_id,
        THUMBNAIL_EXTENSION
    ))
}

/// Key of the placeholder marker inside `prefix`.
pub fn marker_key(prefix: &str) -> String {
    format!("{}/{}", prefix.trim_end_matches('/'), PREFIX_MARKER)
}
