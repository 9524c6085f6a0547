//! User-visible notifications
//!
//! The orchestrator turns every outcome into at most one notification.

use surfcast_core::{ErrorMetadata, LogLevel};

use crate::error::UploadError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub message: String,
    pub level: NotificationLevel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Success,
    Warning,
    Error,
}

impl Notification {
    pub fn uploaded() -> Self {
        Self {
            title: "Success".to_string(),
            message: "Your video has been uploaded!".to_string(),
            level: NotificationLevel::Success,
        }
    }

    /// Notification for a failed attempt; `None` for silent failures.
    pub fn for_error(err: &UploadError) -> Option<Self> {
        if err.is_silent() {
            return None;
        }

        let title = match err {
            UploadError::FileTooLarge { .. } => "Too Large",
            UploadError::PermissionDenied => "Permission needed",
            UploadError::NotAuthenticated => "Not signed in",
            UploadError::Cancelled => "Upload cancelled",
            _ => "Upload failed",
        };
        let level = match err.log_level() {
            LogLevel::Error => NotificationLevel::Error,
            _ => NotificationLevel::Warning,
        };

        Some(Self {
            title: title.to_string(),
            message: err.client_message(),
            level,
        })
    }
}

pub trait Notifier: Send + Sync {
    fn notify(&self, notification: &Notification);
}

/// Writes notifications to the log
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notification: &Notification) {
        match notification.level {
            NotificationLevel::Success => tracing::info!(
                title = %notification.title,
                message = %notification.message,
                "Notification"
            ),
            NotificationLevel::Warning => tracing::warn!(
                title = %notification.title,
                message = %notification.message,
                "Notification"
            ),
            NotificationLevel::Error => tracing::error!(
                title = %notification.title,
                message = %notification.message,
                "Notification"
            ),
        }
    }
}
