use sqlx::PgPool;
use surfcast_core::models::UserProfile;
use surfcast_core::{AppError, SessionUser};

/// Repository for the public `users` profile table
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<UserProfile>, AppError> {
        let row = sqlx::query_as::<_, UserProfile>(
            r#"
            SELECT id, email, full_name, phone, avatar_url, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    /// Make sure the signed-in user has a profile row.
    ///
    /// Existing rows are returned untouched; a missing row is created from the
    /// auth provider's metadata.
    pub async fn ensure_profile(&self, user: &SessionUser) -> Result<UserProfile, AppError> {
        if let Some(existing) = self.find_by_id(&user.id).await? {
            return Ok(existing);
        }

        let row = sqlx::query_as::<_, UserProfile>(
            r#"
            INSERT INTO users (id, full_name, phone, email, avatar_url)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (id) DO UPDATE SET id = EXCLUDED.id
            RETURNING id, email, full_name, phone, avatar_url, created_at
            "#,
        )
        .bind(&user.id)
        .bind(&user.metadata.full_name)
        .bind(&user.metadata.phone)
        .bind(&user.email)
        .bind(&user.metadata.avatar_url)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!(user_id = %row.id, "Created user profile");

        Ok(row)
    }
}
