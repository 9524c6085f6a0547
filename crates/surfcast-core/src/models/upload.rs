use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An object written to remote storage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaAsset {
    pub storage_path: String,
    pub public_url: String,
}

/// The video and its optional thumbnail after a successful transfer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedAssets {
    pub media: MediaAsset,
    pub thumbnail: Option<MediaAsset>,
}

impl UploadedAssets {
    /// Every storage path written for this upload, media first.
    pub fn storage_paths(&self) -> Vec<&str> {
        let mut paths = vec![self.media.storage_path.as_str()];
        if let Some(thumb) = &self.thumbnail {
            paths.push(thumb.storage_path.as_str());
        }
        paths
    }
}

/// Fields inserted by the record commit step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewUploadRecord {
    pub id: Uuid,
    pub beach_id: String,
    pub user_id: String,
    pub video_url: String,
    pub thumbnail_url: Option<String>,
    pub caption: Option<String>,
    pub duration_seconds: Option<i32>,
    pub size_mb: Decimal,
    pub mime_type: String,
    pub approved: bool,
}

/// Row in the `videos` table; its existence makes an upload visible
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct UploadRecord {
    pub id: Uuid,
    pub beach_id: String,
    pub user_id: String,
    pub video_url: String,
    pub thumbnail_url: Option<String>,
    pub caption: Option<String>,
    pub duration_seconds: Option<i32>,
    pub size_mb: Decimal,
    pub mime_type: String,
    pub approved: bool,
    pub created_at: DateTime<Utc>,
}

impl UploadRecord {
    pub fn from_new(new: NewUploadRecord, created_at: DateTime<Utc>) -> Self {
        Self {
            id: new.id,
            beach_id: new.beach_id,
            user_id: new.user_id,
            video_url: new.video_url,
            thumbnail_url: new.thumbnail_url,
            caption: new.caption,
            duration_seconds: new.duration_seconds,
            size_mb: new.size_mb,
            mime_type: new.mime_type,
            approved: new.approved,
            created_at,
        }
    }
}
