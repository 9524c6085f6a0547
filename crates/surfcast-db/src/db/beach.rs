use async_trait::async_trait;
use sqlx::PgPool;
use surfcast_core::models::Beach;
use surfcast_core::AppError;

/// Paged read access to the beach catalog
#[async_trait]
pub trait BeachStore: Send + Sync {
    /// Up to `limit` active beaches starting at `offset`, in a stable order.
    async fn list_page(&self, offset: i64, limit: i64) -> Result<Vec<Beach>, AppError>;

    async fn find_by_id(&self, id: &str) -> Result<Option<Beach>, AppError>;
}

/// Repository for the `beaches` table
#[derive(Clone)]
pub struct BeachRepository {
    pool: PgPool,
}

impl BeachRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BeachStore for BeachRepository {
    async fn list_page(&self, offset: i64, limit: i64) -> Result<Vec<Beach>, AppError> {
        let rows = sqlx::query_as::<_, Beach>(
            r#"
            SELECT id, formal_name, local_name, address, latitude, longitude
            FROM beaches
            WHERE is_deleted = FALSE
            ORDER BY created_at, id
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Beach>, AppError> {
        let row = sqlx::query_as::<_, Beach>(
            r#"
            SELECT id, formal_name, local_name, address, latitude, longitude
            FROM beaches
            WHERE id = $1 AND is_deleted = FALSE
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }
}
