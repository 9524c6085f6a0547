//! Upload failure taxonomy
//!
//! Every failure of one upload attempt is reported as a single `UploadError`.
//! `FailureKind` is the payload of the orchestrator's `Failed` state.

use std::fmt;

use surfcast_core::models::UploadedAssets;
use surfcast_core::{ErrorMetadata, LogLevel};

use crate::source::AcquireError;
use crate::validator::ValidationError;

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("Selection cancelled")]
    UserCancelled,

    #[error("Camera permission denied")]
    PermissionDenied,

    #[error("File too large: {size_mb:.2} MB (max: {limit_mb} MB)")]
    FileTooLarge { size_mb: f64, limit_mb: u64 },

    #[error("Transfer failed: {cause}")]
    TransferFailed { cause: String },

    #[error("Commit failed: {cause}")]
    CommitFailed {
        cause: String,
        orphaned: Box<UploadedAssets>,
    },

    #[error("You must be logged in to upload.")]
    NotAuthenticated,

    #[error("Upload cancelled")]
    Cancelled,

    #[error("Cannot {action} while {state}")]
    InvalidState { action: &'static str, state: String },
}

/// Which step of an upload attempt failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    UserCancelled,
    PermissionDenied,
    FileTooLarge,
    TransferFailed,
    CommitFailed,
    NotAuthenticated,
    Cancelled,
    InvalidState,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FailureKind::UserCancelled => "user_cancelled",
            FailureKind::PermissionDenied => "permission_denied",
            FailureKind::FileTooLarge => "file_too_large",
            FailureKind::TransferFailed => "transfer_failed",
            FailureKind::CommitFailed => "commit_failed",
            FailureKind::NotAuthenticated => "not_authenticated",
            FailureKind::Cancelled => "cancelled",
            FailureKind::InvalidState => "invalid_state",
        };
        write!(f, "{}", s)
    }
}

impl UploadError {
    pub fn transfer(cause: impl fmt::Display) -> Self {
        UploadError::TransferFailed {
            cause: cause.to_string(),
        }
    }

    pub fn kind(&self) -> FailureKind {
        match self {
            UploadError::UserCancelled => FailureKind::UserCancelled,
            UploadError::PermissionDenied => FailureKind::PermissionDenied,
            UploadError::FileTooLarge { .. } => FailureKind::FileTooLarge,
            UploadError::TransferFailed { .. } => FailureKind::TransferFailed,
            UploadError::CommitFailed { .. } => FailureKind::CommitFailed,
            UploadError::NotAuthenticated => FailureKind::NotAuthenticated,
            UploadError::Cancelled => FailureKind::Cancelled,
            UploadError::InvalidState { .. } => FailureKind::InvalidState,
        }
    }

    /// Silent failures end the attempt without telling the user anything.
    pub fn is_silent(&self) -> bool {
        matches!(self, UploadError::UserCancelled)
    }
}

impl From<ValidationError> for UploadError {
    fn from(err: ValidationError) -> Self {
        match err {
            ValidationError::FileTooLarge { size_mb, limit_mb } => {
                UploadError::FileTooLarge { size_mb, limit_mb }
            }
        }
    }
}

impl From<AcquireError> for UploadError {
    fn from(err: AcquireError) -> Self {
        match err {
            AcquireError::UserCancelled => UploadError::UserCancelled,
            AcquireError::PermissionDenied => UploadError::PermissionDenied,
            AcquireError::Unavailable(cause) => UploadError::TransferFailed { cause },
        }
    }
}

impl ErrorMetadata for UploadError {
    fn error_code(&self) -> &'static str {
        match self {
            UploadError::UserCancelled => "USER_CANCELLED",
            UploadError::PermissionDenied => "PERMISSION_DENIED",
            UploadError::FileTooLarge { .. } => "FILE_TOO_LARGE",
            UploadError::TransferFailed { .. } => "TRANSFER_FAILED",
            UploadError::CommitFailed { .. } => "COMMIT_FAILED",
            UploadError::NotAuthenticated => "NOT_AUTHENTICATED",
            UploadError::Cancelled => "CANCELLED",
            UploadError::InvalidState { .. } => "INVALID_STATE",
        }
    }

    fn is_recoverable(&self) -> bool {
        !matches!(self, UploadError::InvalidState { .. })
    }

    fn suggested_action(&self) -> Option<&'static str> {
        match self {
            UploadError::PermissionDenied => Some("Allow camera access in system settings"),
            UploadError::FileTooLarge { .. } => Some("Trim the video or pick a shorter one"),
            UploadError::TransferFailed { .. } | UploadError::CommitFailed { .. } => {
                Some("Check your connection and retry")
            }
            UploadError::NotAuthenticated => Some("Sign in and try again"),
            _ => None,
        }
    }

    fn client_message(&self) -> String {
        match self {
            UploadError::FileTooLarge { limit_mb, .. } => {
                format!("Please choose a video smaller than {}MB.", limit_mb)
            }
            UploadError::PermissionDenied => {
                "Camera permission is required to record a video.".to_string()
            }
            UploadError::TransferFailed { .. } => "Something went wrong".to_string(),
            UploadError::CommitFailed { .. } => {
                "Your video was uploaded but could not be saved. Please try again.".to_string()
            }
            other => other.to_string(),
        }
    }

    fn is_sensitive(&self) -> bool {
        matches!(
            self,
            UploadError::TransferFailed { .. } | UploadError::CommitFailed { .. }
        )
    }

    fn log_level(&self) -> LogLevel {
        match self {
            UploadError::CommitFailed { .. } => LogLevel::Error,
            UploadError::TransferFailed { .. } | UploadError::PermissionDenied => LogLevel::Warn,
            _ => LogLevel::Debug,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn too_large_message_names_the_limit() {
        let err = UploadError::FileTooLarge {
            size_mb: 61.2,
            limit_mb: 50,
        };
        assert_eq!(err.kind(), FailureKind::FileTooLarge);
        assert_eq!(
            err.client_message(),
            "Please choose a video smaller than 50MB."
        );
        assert_eq!(err.to_string(), "File too large: 61.20 MB (max: 50 MB)");
    }

    #[test]
    fn transfer_details_stay_internal() {
        let err = UploadError::transfer("connection reset by peer");
        assert!(err.is_sensitive());
        assert!(!err.client_message().contains("connection reset"));
        assert_eq!(err.log_level(), LogLevel::Warn);
    }

    #[test]
    fn only_user_cancel_is_silent() {
        assert!(UploadError::UserCancelled.is_silent());
        assert!(!UploadError::Cancelled.is_silent());
        assert!(!UploadError::NotAuthenticated.is_silent());
    }
}
