//! Configuration module
//!
//! Runtime configuration for the upload orchestrator, the storage backends and
//! the database layer. Values come from the process environment (and a `.env`
//! file when present); every optional setting has a documented default.

use std::env;

use crate::storage_types::StorageBackend;

// Common constants
const MAX_CONNECTIONS: u32 = 10;
const CONNECTION_TIMEOUT_SECS: u64 = 30;
const MEDIA_BUCKET: &str = "videos";
const MAX_UPLOAD_SIZE_MB: u64 = 50;
const THUMBNAIL_OFFSET_MS: u64 = 1000;
const BEACH_PAGE_SIZE: u32 = 10;

/// Settings shared by every binary
#[derive(Clone, Debug)]
pub struct BaseConfig {
    pub environment: String,
    pub db_max_connections: u32,
    pub db_timeout_seconds: u64,
}

/// Full Surfcast configuration
#[derive(Clone, Debug)]
pub struct SurfcastConfig {
    pub base: BaseConfig,
    pub database_url: String,
    // Storage configuration
    pub storage_backend: Option<StorageBackend>,
    pub media_bucket: String,
    pub s3_region: Option<String>,
    pub s3_endpoint: Option<String>, // Custom endpoint for S3-compatible providers (MinIO, Supabase, etc.)
    pub aws_region: Option<String>,
    pub local_storage_path: Option<String>,
    pub local_storage_base_url: Option<String>,
    // Upload policy
    pub max_upload_size_mb: u64,
    pub auto_approve: bool,
    pub thumbnail_offset_ms: u64,
    pub ffmpeg_path: String,
    pub parallel_transfer: bool,
    // Catalog
    pub beach_page_size: u32,
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config(pub Box<SurfcastConfig>);

fn parse_bool(key: &str, value: Option<String>, default: bool) -> Result<bool, anyhow::Error> {
    let Some(value) = value else {
        return Ok(default);
    };
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(anyhow::anyhow!("{} must be true or false", key)),
    }
}

impl SurfcastConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = lookup("ENVIRONMENT")
            .or_else(|| lookup("APP_ENV"))
            .unwrap_or_else(|| "development".to_string());

        let base = BaseConfig {
            environment,
            db_max_connections: lookup("DB_MAX_CONNECTIONS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(MAX_CONNECTIONS),
            db_timeout_seconds: lookup("DB_TIMEOUT_SECONDS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(CONNECTION_TIMEOUT_SECS),
        };

        let storage_backend = match lookup("STORAGE_BACKEND") {
            Some(s) => Some(s.parse::<StorageBackend>()?),
            None => None,
        };

        let auto_approve = parse_bool("UPLOAD_AUTO_APPROVE", lookup("UPLOAD_AUTO_APPROVE"), true)?;
        let parallel_transfer = parse_bool(
            "UPLOAD_PARALLEL_TRANSFER",
            lookup("UPLOAD_PARALLEL_TRANSFER"),
            true,
        )?;

        let max_upload_size_mb = match lookup("MAX_UPLOAD_SIZE_MB") {
            Some(s) => s
                .trim()
                .parse()
                .map_err(|_| anyhow::anyhow!("MAX_UPLOAD_SIZE_MB must be a whole number"))?,
            None => MAX_UPLOAD_SIZE_MB,
        };

        Ok(SurfcastConfig {
            base,
            database_url: lookup("DATABASE_URL")
                .ok_or_else(|| anyhow::anyhow!("DATABASE_URL must be set"))?,
            storage_backend,
            media_bucket: lookup("MEDIA_BUCKET").unwrap_or_else(|| MEDIA_BUCKET.to_string()),
            s3_region: lookup("S3_REGION"),
            s3_endpoint: lookup("S3_ENDPOINT"),
            aws_region: lookup("AWS_REGION"),
            local_storage_path: lookup("LOCAL_STORAGE_PATH"),
            local_storage_base_url: lookup("LOCAL_STORAGE_BASE_URL"),
            max_upload_size_mb,
            auto_approve,
            thumbnail_offset_ms: lookup("THUMBNAIL_OFFSET_MS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(THUMBNAIL_OFFSET_MS),
            ffmpeg_path: lookup("FFMPEG_PATH").unwrap_or_else(|| "ffmpeg".to_string()),
            parallel_transfer,
            beach_page_size: lookup("BEACH_PAGE_SIZE")
                .and_then(|s| s.parse().ok())
                .unwrap_or(BEACH_PAGE_SIZE),
        })
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.max_upload_size_mb == 0 {
            return Err(anyhow::anyhow!("MAX_UPLOAD_SIZE_MB must be greater than zero"));
        }
        if self.beach_page_size == 0 {
            return Err(anyhow::anyhow!("BEACH_PAGE_SIZE must be greater than zero"));
        }
        if self.media_bucket.trim().is_empty() || self.media_bucket.contains('/') {
            return Err(anyhow::anyhow!(
                "MEDIA_BUCKET must be a non-empty name without '/'"
            ));
        }

        match self.storage_backend.unwrap_or(StorageBackend::S3) {
            StorageBackend::S3 => {
                if self.s3_region.is_none() && self.aws_region.is_none() {
                    return Err(anyhow::anyhow!(
                        "S3_REGION or AWS_REGION must be set for the s3 storage backend"
                    ));
                }
            }
            StorageBackend::Local => {
                if self.local_storage_path.is_none() || self.local_storage_base_url.is_none() {
                    return Err(anyhow::anyhow!(
                        "LOCAL_STORAGE_PATH and LOCAL_STORAGE_BASE_URL must be set for the local storage backend"
                    ));
                }
            }
        }

        Ok(())
    }
}

impl Config {
    fn inner(&self) -> &SurfcastConfig {
        &self.0
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        let config = SurfcastConfig::from_env()?;
        Ok(Config(Box::new(config)))
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        self.inner().validate()
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.inner().base.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    pub fn database_url(&self) -> &str {
        &self.inner().database_url
    }

    pub fn db_max_connections(&self) -> u32 {
        self.inner().base.db_max_connections
    }

    pub fn db_timeout_seconds(&self) -> u64 {
        self.inner().base.db_timeout_seconds
    }

    pub fn storage_backend(&self) -> Option<StorageBackend> {
        self.inner().storage_backend
    }

    pub fn media_bucket(&self) -> &str {
        &self.inner().media_bucket
    }

    pub fn s3_region(&self) -> Option<&str> {
        self.inner().s3_region.as_deref()
    }

    pub fn s3_endpoint(&self) -> Option<&str> {
        self.inner().s3_endpoint.as_deref()
    }

    pub fn aws_region(&self) -> Option<&str> {
        self.inner().aws_region.as_deref()
    }

    pub fn local_storage_path(&self) -> Option<&str> {
        self.inner().local_storage_path.as_deref()
    }

    pub fn local_storage_base_url(&self) -> Option<&str> {
        self.inner().local_storage_base_url.as_deref()
    }

    pub fn max_upload_size_mb(&self) -> u64 {
        self.inner().max_upload_size_mb
    }

    pub fn auto_approve(&self) -> bool {
        self.inner().auto_approve
    }

    pub fn thumbnail_offset_ms(&self) -> u64 {
        self.inner().thumbnail_offset_ms
    }

    pub fn ffmpeg_path(&self) -> &str {
        &self.inner().ffmpeg_path
    }

    pub fn parallel_transfer(&self) -> bool {
        self.inner().parallel_transfer
    }

    pub fn beach_page_size(&self) -> u32 {
        self.inner().beach_page_size
    }
}
