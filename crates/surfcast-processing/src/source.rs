//! Source acquisition
//!
//! Library picks and camera recordings converge on one `PickedMedia`: the
//! video handle plus an optional thumbnail sampled from it.

use async_trait::async_trait;
use std::path::{Path, PathBuf};

use crate::thumbnail::ThumbnailGenerator;

#[derive(Debug, Clone, thiserror::Error)]
pub enum AcquireError {
    #[error("Selection cancelled")]
    UserCancelled,

    #[error("Camera permission denied")]
    PermissionDenied,

    #[error("Media source unavailable: {0}")]
    Unavailable(String),
}

/// A local video file chosen or recorded by the user
#[derive(Debug, Clone, PartialEq)]
pub struct MediaHandle {
    pub path: PathBuf,
    /// Reported by the capture device when known
    pub duration_seconds: Option<i32>,
}

impl MediaHandle {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            duration_seconds: None,
        }
    }

    pub fn with_duration(mut self, seconds: i32) -> Self {
        self.duration_seconds = Some(seconds);
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PickedMedia {
    pub video: MediaHandle,
    pub thumbnail: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Library,
    Camera,
}

/// Device media capabilities: gallery picker, camera and its permission
#[async_trait]
pub trait MediaSource: Send + Sync {
    async fn pick_from_library(&self) -> Result<MediaHandle, AcquireError>;

    /// Ask for camera access. `false` means the user refused.
    async fn request_camera_permission(&self) -> bool;

    async fn record(&self) -> Result<MediaHandle, AcquireError>;
}

/// Obtain a video from `source` and derive its thumbnail.
///
/// Thumbnail failures are logged and the video is returned without one.
pub async fn acquire(
    source: &dyn MediaSource,
    thumbnails: &dyn ThumbnailGenerator,
    kind: SourceKind,
    thumbnail_offset_ms: u64,
) -> Result<PickedMedia, AcquireError> {
    let video = match kind {
        SourceKind::Library => source.pick_from_library().await?,
        SourceKind::Camera => {
            if !source.request_camera_permission().await {
                tracing::info!("Camera permission refused");
                return Err(AcquireError::PermissionDenied);
            }
            source.record().await?
        }
    };

    let thumbnail = match thumbnails.generate(&video.path, thumbnail_offset_ms).await {
        Ok(path) => Some(path),
        Err(e) => {
            tracing::warn!(
                error = %e,
                video = %video.path.display(),
                "Thumbnail generation failed, continuing without thumbnail"
            );
            None
        }
    };

    Ok(PickedMedia { video, thumbnail })
}

/// A media source backed by one file on disk
///
/// Picking returns the file; recording is never permitted.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
    duration_seconds: Option<i32>,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>, duration_seconds: Option<i32>) -> Self {
        Self {
            path: path.into(),
            duration_seconds,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl MediaSource for FileSource {
    async fn pick_from_library(&self) -> Result<MediaHandle, AcquireError> {
        match tokio::fs::metadata(&self.path).await {
            Ok(meta) if meta.is_file() => Ok(MediaHandle {
                path: self.path.clone(),
                duration_seconds: self.duration_seconds,
            }),
            Ok(_) => Err(AcquireError::Unavailable(format!(
                "{} is not a file",
                self.path.display()
            ))),
            Err(e) => Err(AcquireError::Unavailable(format!(
                "{}: {}",
                self.path.display(),
                e
            ))),
        }
    }

    async fn request_camera_permission(&self) -> bool {
        false
    }

    async fn record(&self) -> Result<MediaHandle, AcquireError> {
        Err(AcquireError::PermissionDenied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use std::sync::atomic::{AtomicBool, Ordering};

    struct StubThumbnails {
        fail: bool,
    }

    #[async_trait]
    impl ThumbnailGenerator for StubThumbnails {
        async fn generate(&self, video: &Path, _timestamp_ms: u64) -> anyhow::Result<PathBuf> {
            if self.fail {
                return Err(anyhow!("no frame"));
            }
            Ok(video.with_extension("jpg"))
        }
    }

    struct StubCamera {
        allow: bool,
        recorded: AtomicBool,
    }

    #[async_trait]
    impl MediaSource for StubCamera {
        async fn pick_from_library(&self) -> Result<MediaHandle, AcquireError> {
            Err(AcquireError::UserCancelled)
        }

        async fn request_camera_permission(&self) -> bool {
            self.allow
        }

        async fn record(&self) -> Result<MediaHandle, AcquireError> {
            self.recorded.store(true, Ordering::SeqCst);
            Ok(MediaHandle::new("/camera/rec.mp4").with_duration(12))
        }
    }

    #[tokio::test]
    async fn refused_permission_never_records() {
        let camera = StubCamera {
            allow: false,
            recorded: AtomicBool::new(false),
        };
        let result = acquire(&camera, &StubThumbnails { fail: false }, SourceKind::Camera, 1000).await;
        assert!(matches!(result, Err(AcquireError::PermissionDenied)));
        assert!(!camera.recorded.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn recording_carries_thumbnail_and_duration() {
        let camera = StubCamera {
            allow: true,
            recorded: AtomicBool::new(false),
        };
        let picked = acquire(&camera, &StubThumbnails { fail: false }, SourceKind::Camera, 1000)
            .await
            .unwrap();
        assert_eq!(picked.video.duration_seconds, Some(12));
        assert_eq!(picked.thumbnail, Some(PathBuf::from("/camera/rec.jpg")));
    }

    #[tokio::test]
    async fn thumbnail_failure_is_not_fatal() {
        let camera = StubCamera {
            allow: true,
            recorded: AtomicBool::new(false),
        };
        let picked = acquire(&camera, &StubThumbnails { fail: true }, SourceKind::Camera, 1000)
            .await
            .unwrap();
        assert!(picked.thumbnail.is_none());
    }

    #[tokio::test]
    async fn cancelled_pick_propagates() {
        let camera = StubCamera {
            allow: true,
            recorded: AtomicBool::new(false),
        };
        let result = acquire(&camera, &StubThumbnails { fail: false }, SourceKind::Library, 1000).await;
        assert!(matches!(result, Err(AcquireError::UserCancelled)));
    }

    #[tokio::test]
    async fn file_source_picks_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clip.mp4");
        tokio::fs::write(&path, b"data").await.unwrap();

        let source = FileSource::new(&path, Some(20));
        let handle = source.pick_from_library().await.unwrap();
        assert_eq!(handle.path, path);
        assert_eq!(handle.duration_seconds, Some(20));

        let missing = FileSource::new(dir.path().join("gone.mp4"), None);
        assert!(matches!(
            missing.pick_from_library().await,
            Err(AcquireError::Unavailable(_))
        ));
        assert!(!missing.request_camera_permission().await);
    }
}
