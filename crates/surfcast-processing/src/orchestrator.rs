//! Media upload orchestration
//!
//! `upload_media` runs one attempt end to end: session check, size
//! validation, prefix markers, read and encode, transfer, record commit. Each
//! step awaits the previous one and every suspension point observes the
//! cancellation token.
//!
//! `UploadSession` wraps it in the pick / preview / upload state machine that a
//! screen drives.

use std::fmt;
use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;

use surfcast_core::models::{NewUploadRecord, UploadRecord, UploadedAssets};
use surfcast_core::{ErrorMetadata, LogLevel, SessionContext};
use surfcast_db::RecordStore;
use surfcast_storage::{keys, Storage, StorageResult};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::error::{FailureKind, UploadError};
use crate::files::MediaFiles;
use crate::notify::{Notification, Notifier};
use crate::progress::{ProgressReporter, UploadStage};
use crate::source::{acquire, MediaSource, PickedMedia, SourceKind};
use crate::thumbnail::ThumbnailGenerator;
use crate::transfer::{ensure_prefix, put_asset, EncodedObject, THUMBNAIL_CONTENT_TYPE};
use crate::validator::{size_mb_decimal, video_format, UploadPolicy};

/// Collaborators of the upload orchestrator
#[derive(Clone)]
pub struct UploadDeps {
    pub storage: Arc<dyn Storage>,
    pub records: Arc<dyn RecordStore>,
    pub files: Arc<dyn MediaFiles>,
    pub source: Arc<dyn MediaSource>,
    pub thumbnails: Arc<dyn ThumbnailGenerator>,
    pub notifier: Arc<dyn Notifier>,
    pub progress: Arc<dyn ProgressReporter>,
}

/// Input of one upload attempt. Never persisted.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub source_file_path: PathBuf,
    pub thumbnail_path: Option<PathBuf>,
    pub target_collection_id: String,
    pub caption: Option<String>,
    pub duration_seconds: Option<i32>,
}

impl UploadRequest {
    pub fn from_picked(picked: &PickedMedia, collection_id: &str, caption: &str) -> Self {
        Self {
            source_file_path: picked.video.path.clone(),
            thumbnail_path: picked.thumbnail.clone(),
            target_collection_id: collection_id.to_string(),
            caption: Some(caption.to_string()),
            duration_seconds: picked.video.duration_seconds,
        }
    }
}

async fn until_cancelled<F>(cancel: &CancellationToken, fut: F) -> Result<F::Output, UploadError>
where
    F: Future,
{
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(UploadError::Cancelled),
        output = fut => Ok(output),
    }
}

fn normalize_caption(caption: Option<&str>) -> Option<String> {
    caption
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(String::from)
}

async fn transfer_assets(
    storage: &dyn Storage,
    video: EncodedObject,
    thumbnail: Option<EncodedObject>,
    parallel: bool,
) -> StorageResult<UploadedAssets> {
    let (media, thumbnail) = match thumbnail {
        Some(thumb) if parallel => {
            let (media, thumb) =
                tokio::try_join!(put_asset(storage, video), put_asset(storage, thumb))?;
            (media, Some(thumb))
        }
        Some(thumb) => {
            let media = put_asset(storage, video).await?;
            let thumb = put_asset(storage, thumb).await?;
            (media, Some(thumb))
        }
        None => (put_asset(storage, video).await?, None),
    };

    Ok(UploadedAssets { media, thumbnail })
}

/// Run one upload attempt.
///
/// The record is inserted only after storage acknowledged every object, so a
/// committed record never points at a missing asset.
pub async fn upload_media(
    deps: &UploadDeps,
    policy: &UploadPolicy,
    session: &SessionContext,
    request: &UploadRequest,
    cancel: &CancellationToken,
) -> Result<UploadRecord, UploadError> {
    let user = session
        .require_user()
        .map_err(|_| UploadError::NotAuthenticated)?;

    let start = std::time::Instant::now();
    let collection_id = request.target_collection_id.as_str();
    let id = Uuid::now_v7();
    let file_id = id.simple().to_string();
    let (extension, mime_type) = video_format(&request.source_file_path);

    let user_prefix =
        keys::uploader_prefix(collection_id, &user.id).map_err(UploadError::transfer)?;
    let media_path = keys::media_key(collection_id, &user.id, &file_id, &extension)
        .map_err(UploadError::transfer)?;
    let thumbnail_path =
        keys::thumbnail_key(collection_id, &user.id, &file_id).map_err(UploadError::transfer)?;

    // Validation
    let size_bytes = until_cancelled(cancel, deps.files.size(&request.source_file_path))
        .await?
        .map_err(|e| {
            UploadError::transfer(format!(
                "cannot read size of {}: {}",
                request.source_file_path.display(),
                e
            ))
        })?;
    policy.validate_size(size_bytes)?;
    deps.progress.report(UploadStage::Validated);

    tracing::info!(
        upload_id = %id,
        beach_id = %collection_id,
        user_id = %user.id,
        size_bytes,
        "Starting upload"
    );

    // Destination prefixes
    let storage = deps.storage.as_ref();
    for prefix in [collection_id, user_prefix.as_str()] {
        until_cancelled(cancel, ensure_prefix(storage, prefix))
            .await?
            .map_err(UploadError::transfer)?;
    }
    deps.progress.report(UploadStage::PrefixesReady);

    // Read and encode
    let raw = until_cancelled(cancel, deps.files.read(&request.source_file_path))
        .await?
        .map_err(UploadError::transfer)?;
    let video = EncodedObject::new(media_path, raw, mime_type);

    let thumbnail = match &request.thumbnail_path {
        Some(path) => match until_cancelled(cancel, deps.files.read(path)).await? {
            Ok(raw) => Some(EncodedObject::new(
                thumbnail_path,
                raw,
                THUMBNAIL_CONTENT_TYPE,
            )),
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    path = %path.display(),
                    "Thumbnail unreadable, uploading without it"
                );
                None
            }
        },
        None => None,
    };
    deps.progress.report(UploadStage::Encoded);

    // Transfer
    let assets = until_cancelled(
        cancel,
        transfer_assets(storage, video, thumbnail, policy.parallel_transfer),
    )
    .await?
    .map_err(UploadError::transfer)?;
    deps.progress.report(UploadStage::Transferred);

    if cancel.is_cancelled() {
        tracing::warn!(
            upload_id = %id,
            paths = ?assets.storage_paths(),
            "Upload cancelled after transfer, assets left without a record"
        );
        return Err(UploadError::Cancelled);
    }

    // Commit
    let record = NewUploadRecord {
        id,
        beach_id: collection_id.to_string(),
        user_id: user.id.clone(),
        video_url: assets.media.public_url.clone(),
        thumbnail_url: assets.thumbnail.as_ref().map(|t| t.public_url.clone()),
        caption: normalize_caption(request.caption.as_deref()),
        duration_seconds: request.duration_seconds,
        size_mb: size_mb_decimal(size_bytes),
        mime_type: mime_type.to_string(),
        approved: policy.auto_approve,
    };

    let committed = deps.records.insert_upload(record).await.map_err(|e| {
        tracing::error!(
            error = %e,
            upload_id = %id,
            orphaned = ?assets.storage_paths(),
            "Record commit failed, uploaded assets are orphaned"
        );
        UploadError::CommitFailed {
            cause: e.to_string(),
            orphaned: Box::new(assets.clone()),
        }
    })?;
    deps.progress.report(UploadStage::Committed);

    tracing::info!(
        upload_id = %committed.id,
        beach_id = %committed.beach_id,
        size_mb = %committed.size_mb,
        has_thumbnail = committed.thumbnail_url.is_some(),
        duration_ms = start.elapsed().as_secs_f64() * 1000.0,
        "Upload completed"
    );

    Ok(committed)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadState {
    Idle,
    Picking,
    Previewing,
    Uploading,
    Done,
    Failed(FailureKind),
}

impl fmt::Display for UploadState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UploadState::Idle => write!(f, "idle"),
            UploadState::Picking => write!(f, "picking"),
            UploadState::Previewing => write!(f, "previewing"),
            UploadState::Uploading => write!(f, "uploading"),
            UploadState::Done => write!(f, "done"),
            UploadState::Failed(kind) => write!(f, "failed ({})", kind),
        }
    }
}

/// One upload screen's worth of state
pub struct UploadSession {
    deps: UploadDeps,
    policy: UploadPolicy,
    state: UploadState,
    picked: Option<PickedMedia>,
    caption: String,
}

impl UploadSession {
    pub fn new(deps: UploadDeps, policy: UploadPolicy) -> Self {
        Self {
            deps,
            policy,
            state: UploadState::Idle,
            picked: None,
            caption: String::new(),
        }
    }

    pub fn state(&self) -> UploadState {
        self.state
    }

    pub fn picked(&self) -> Option<&PickedMedia> {
        self.picked.as_ref()
    }

    pub fn caption(&self) -> &str {
        &self.caption
    }

    pub fn set_caption(&mut self, caption: impl Into<String>) {
        self.caption = caption.into();
    }

    fn invalid(&self, action: &'static str) -> UploadError {
        UploadError::InvalidState {
            action,
            state: self.state.to_string(),
        }
    }

    fn report_failure(&self, err: &UploadError) {
        match err.log_level() {
            LogLevel::Error => tracing::error!(error = %err, code = err.error_code(), "Upload failed"),
            LogLevel::Warn => tracing::warn!(error = %err, code = err.error_code(), "Upload failed"),
            LogLevel::Debug => tracing::debug!(error = %err, code = err.error_code(), "Upload failed"),
        }
        if let Some(notification) = Notification::for_error(err) {
            self.deps.notifier.notify(&notification);
        }
    }

    /// Choose a video from the library or record one.
    ///
    /// A cancelled pick returns to `Idle` without a notification.
    pub async fn pick(&mut self, kind: SourceKind) -> Result<(), UploadError> {
        if matches!(self.state, UploadState::Picking | UploadState::Uploading) {
            return Err(self.invalid("pick"));
        }

        self.state = UploadState::Picking;
        let result = acquire(
            self.deps.source.as_ref(),
            self.deps.thumbnails.as_ref(),
            kind,
            self.policy.thumbnail_offset_ms,
        )
        .await;

        match result {
            Ok(picked) => {
                self.picked = Some(picked);
                self.state = UploadState::Previewing;
                Ok(())
            }
            Err(e) => {
                let err = UploadError::from(e);
                self.picked = None;
                self.state = UploadState::Idle;
                self.report_failure(&err);
                Err(err)
            }
        }
    }

    /// Upload the previewed video to `collection_id`.
    pub async fn confirm(
        &mut self,
        session: &SessionContext,
        collection_id: &str,
        cancel: &CancellationToken,
    ) -> Result<UploadRecord, UploadError> {
        let picked = match (&self.state, &self.picked) {
            (UploadState::Previewing, Some(picked)) => picked,
            _ => return Err(self.invalid("confirm")),
        };

        let request = UploadRequest::from_picked(picked, collection_id, &self.caption);
        self.state = UploadState::Uploading;

        match upload_media(&self.deps, &self.policy, session, &request, cancel).await {
            Ok(record) => {
                self.state = UploadState::Done;
                self.picked = None;
                self.caption.clear();
                self.deps.notifier.notify(&Notification::uploaded());
                Ok(record)
            }
            Err(err) => {
                self.state = UploadState::Failed(err.kind());
                self.report_failure(&err);
                Err(err)
            }
        }
    }

    /// Go back to the preview of the same video after a failure.
    pub fn retry(&mut self) -> Result<(), UploadError> {
        match (&self.state, &self.picked) {
            (UploadState::Failed(_), Some(_)) => {
                self.state = UploadState::Previewing;
                Ok(())
            }
            _ => Err(self.invalid("retry")),
        }
    }

    pub fn reset(&mut self) {
        self.state = UploadState::Idle;
        self.picked = None;
        self.caption.clear();
    }
}
