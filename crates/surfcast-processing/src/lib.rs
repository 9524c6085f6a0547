//! Surfcast media processing
//!
//! The upload orchestrator and its collaborators: source acquisition and
//! thumbnails, size validation, transfer to object storage and the record
//! commit that makes an upload visible.

pub mod error;
pub mod files;
pub mod notify;
pub mod orchestrator;
pub mod progress;
pub mod source;
pub mod thumbnail;
pub mod transfer;
pub mod validator;

pub use error::{FailureKind, UploadError};
pub use files::{LocalFiles, MediaFiles};
pub use notify::{Notification, NotificationLevel, Notifier, TracingNotifier};
pub use orchestrator::{upload_media, UploadDeps, UploadRequest, UploadSession, UploadState};
pub use progress::{NoOpProgress, ProgressReporter, UploadStage};
pub use source::{acquire, AcquireError, FileSource, MediaHandle, MediaSource, PickedMedia, SourceKind};
pub use thumbnail::{FfmpegThumbnailer, ThumbnailGenerator};
pub use validator::{UploadPolicy, ValidationError};
