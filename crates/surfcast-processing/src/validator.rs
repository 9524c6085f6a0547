use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use std::path::Path;
use surfcast_core::Config;

const BYTES_PER_MB: u64 = 1024 * 1024;

/// Upload validation errors
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("File too large: {size_mb:.2} MB (max: {limit_mb} MB)")]
    FileTooLarge { size_mb: f64, limit_mb: u64 },
}

/// Knobs that shape one upload attempt
#[derive(Debug, Clone)]
pub struct UploadPolicy {
    pub max_size_mb: u64,
    /// Approval flag written into every committed record
    pub auto_approve: bool,
    pub thumbnail_offset_ms: u64,
    /// Upload media and thumbnail concurrently
    pub parallel_transfer: bool,
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self {
            max_size_mb: 50,
            auto_approve: true,
            thumbnail_offset_ms: 1000,
            parallel_transfer: true,
        }
    }
}

impl UploadPolicy {
    pub fn from_config(config: &Config) -> Self {
        Self {
            max_size_mb: config.max_upload_size_mb(),
            auto_approve: config.auto_approve(),
            thumbnail_offset_ms: config.thumbnail_offset_ms(),
            parallel_transfer: config.parallel_transfer(),
        }
    }

    /// Reject files over the ceiling. Returns the size in megabytes.
    pub fn validate_size(&self, size_bytes: u64) -> Result<f64, ValidationError> {
        let size_mb = megabytes(size_bytes);
        if size_mb > self.max_size_mb as f64 {
            return Err(ValidationError::FileTooLarge {
                size_mb,
                limit_mb: self.max_size_mb,
            });
        }
        Ok(size_mb)
    }
}

pub fn megabytes(size_bytes: u64) -> f64 {
    size_bytes as f64 / BYTES_PER_MB as f64
}

/// Size in megabytes rounded to two places, as stored on the record.
pub fn size_mb_decimal(size_bytes: u64) -> Decimal {
    Decimal::from_u64(size_bytes)
        .map(|bytes| {
            (bytes / Decimal::from(BYTES_PER_MB))
                .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
        })
        .unwrap_or_default()
}

/// File extension and content type for a video, defaulting to MP4.
pub fn video_format(path: &Path) -> (String, &'static str) {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase());

    match extension.as_deref() {
        Some("mov") => ("mov".to_string(), "video/quicktime"),
        Some("webm") => ("webm".to_string(), "video/webm"),
        Some("m4v") => ("m4v".to_string(), "video/x-m4v"),
        Some("mkv") => ("mkv".to_string(), "video/x-matroska"),
        Some("avi") => ("avi".to_string(), "video/x-msvideo"),
        Some("3gp") => ("3gp".to_string(), "video/3gpp"),
        _ => ("mp4".to_string(), "video/mp4"),
    }
}
