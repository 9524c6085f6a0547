use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tempfile::TempDir;
use tokio::process::Command;
use uuid::Uuid;

/// Produces a still image from a video
#[async_trait]
pub trait ThumbnailGenerator: Send + Sync {
    /// Write a JPEG frame taken `timestamp_ms` into `video` and return its path.
    async fn generate(&self, video: &Path, timestamp_ms: u64) -> Result<PathBuf>;
}

/// Thumbnail generator backed by the `ffmpeg` binary
///
/// Frames are written into a private temporary directory that lives as long
/// as the generator.
pub struct FfmpegThumbnailer {
    ffmpeg_path: String,
    output_dir: TempDir,
}

impl FfmpegThumbnailer {
    pub fn new(ffmpeg_path: String) -> Result<Self> {
        let dangerous_chars = [';', '|', '&', '$', '`', '(', ')', '<', '>', '\n', '\r'];
        if ffmpeg_path.chars().any(|c| dangerous_chars.contains(&c)) {
            return Err(anyhow!("Invalid ffmpeg_path: contains dangerous characters"));
        }

        let output_dir = tempfile::tempdir().context("Failed to create thumbnail directory")?;

        Ok(Self {
            ffmpeg_path,
            output_dir,
        })
    }

    fn output_path(&self, video: &Path) -> PathBuf {
        let stem = video
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("video");
        self.output_dir
            .path()
            .join(format!("{}_{}_thumb.jpg", stem, Uuid::new_v4().simple()))
    }
}

#[async_trait]
impl ThumbnailGenerator for FfmpegThumbnailer {
    async fn generate(&self, video: &Path, timestamp_ms: u64) -> Result<PathBuf> {
        let output_path = self.output_path(video);
        let timestamp = timestamp_ms as f64 / 1000.0;

        let args = vec![
            "-ss".to_string(),
            timestamp.to_string(),
            "-i".to_string(),
            video.to_string_lossy().to_string(),
            "-vframes".to_string(),
            "1".to_string(),
            "-q:v".to_string(),
            "2".to_string(),
            "-y".to_string(),
            output_path.to_string_lossy().to_string(),
        ];

        let start = std::time::Instant::now();

        let output = Command::new(&self.ffmpeg_path)
            .args(&args)
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .await
            .context("Failed to execute ffmpeg")?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(anyhow!("FFmpeg thumbnail extraction failed: {}", stderr));
        }

        tracing::debug!(
            video = %video.display(),
            timestamp_ms,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Thumbnail extracted"
        );

        Ok(output_path)
    }
}
