use async_trait::async_trait;
use serde::Serialize;
use sqlx::PgPool;
use surfcast_core::models::{NewUploadRecord, UploadRecord};
use surfcast_core::AppError;
use uuid::Uuid;

/// Durable store for upload records.
///
/// A record's existence is what makes an upload visible to other users.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Insert exactly one record and return it as stored.
    async fn insert_upload(&self, record: NewUploadRecord) -> Result<UploadRecord, AppError>;

    async fn find_upload(&self, id: Uuid) -> Result<Option<UploadRecord>, AppError>;
}

/// Approved video joined with its uploader's profile
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct FeedVideo {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub video: UploadRecord,
    pub uploader_full_name: Option<String>,
    pub uploader_email: Option<String>,
}

impl FeedVideo {
    pub fn uploader_name(&self) -> &str {
        self.uploader_full_name
            .as_deref()
            .or(self.uploader_email.as_deref())
            .unwrap_or("Unknown user")
    }
}

const VIDEO_COLUMNS: &str = "v.id, v.beach_id, v.user_id, v.video_url, v.thumbnail_url, v.caption, \
     v.duration_seconds, v.size_mb, v.mime_type, v.approved, v.created_at";

/// Repository for the `videos` table
#[derive(Clone)]
pub struct VideoRepository {
    pool: PgPool,
}

impl VideoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Approved videos for a beach, newest first.
    pub async fn list_approved_for_beach(
        &self,
        beach_id: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<FeedVideo>, AppError> {
        let query = format!(
            r#"
            SELECT {VIDEO_COLUMNS},
                   u.full_name AS uploader_full_name,
                   u.email AS uploader_email
            FROM videos v
            LEFT JOIN users u ON u.id = v.user_id
            WHERE v.beach_id = $1 AND v.approved = TRUE
            ORDER BY v.created_at DESC
            LIMIT $2 OFFSET $3
            "#
        );

        let rows = sqlx::query_as::<_, FeedVideo>(&query)
            .bind(beach_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }
}

#[async_trait]
impl RecordStore for VideoRepository {
    async fn insert_upload(&self, record: NewUploadRecord) -> Result<UploadRecord, AppError> {
        let row = sqlx::query_as::<_, UploadRecord>(
            r#"
            INSERT INTO videos (
                id, beach_id, user_id, video_url, thumbnail_url, caption,
                duration_seconds, size_mb, mime_type, approved
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING id, beach_id, user_id, video_url, thumbnail_url, caption,
                      duration_seconds, size_mb, mime_type, approved, created_at
            "#,
        )
        .bind(record.id)
        .bind(&record.beach_id)
        .bind(&record.user_id)
        .bind(&record.video_url)
        .bind(&record.thumbnail_url)
        .bind(&record.caption)
        .bind(record.duration_seconds)
        .bind(record.size_mb)
        .bind(&record.mime_type)
        .bind(record.approved)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!(
            video_id = %row.id,
            beach_id = %row.beach_id,
            approved = row.approved,
            "Upload record committed"
        );

        Ok(row)
    }

    async fn find_upload(&self, id: Uuid) -> Result<Option<UploadRecord>, AppError> {
        let query = format!("SELECT {VIDEO_COLUMNS} FROM videos v WHERE v.id = $1");
        let row = sqlx::query_as::<_, UploadRecord>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row)
    }
}
