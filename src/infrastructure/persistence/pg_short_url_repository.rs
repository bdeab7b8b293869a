//! PostgreSQL implementation of the short URL repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{NewShortUrl, ShortUrl, ShortUrlPatch};
use crate::domain::repositories::ShortUrlRepository;
use crate::error::AppError;

const COLUMNS: &str = "id, code, original_url, expires_at, api_key_id, created_at, updated_at";

#[derive(sqlx::FromRow)]
struct ShortUrlRow {
    id: i64,
    code: String,
    original_url: String,
    expires_at: Option<DateTime<Utc>>,
    api_key_id: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ShortUrlRow> for ShortUrl {
    fn from(r: ShortUrlRow) -> Self {
        ShortUrl {
            id: r.id,
            code: r.code,
            original_url: r.original_url,
            expires_at: r.expires_at,
            api_key_id: r.api_key_id,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

/// PostgreSQL repository for short URLs.
///
/// Code uniqueness rests on the `short_urls_code_key` constraint; a violation
/// surfaces as [`AppError::Conflict`].
pub struct PgShortUrlRepository {
    pool: Arc<PgPool>,
}

impl PgShortUrlRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ShortUrlRepository for PgShortUrlRepository {
    async fn insert(&self, new_url: NewShortUrl) -> Result<ShortUrl, AppError> {
        let row = sqlx::query_as::<_, ShortUrlRow>(&format!(
            r#"
            INSERT INTO short_urls (code, original_url, expires_at, api_key_id)
            VALUES ($1, $2, $3, $4)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(&new_url.code)
        .bind(&new_url.original_url)
        .bind(new_url.expires_at)
        .bind(new_url.api_key_id)
        .fetch_one(self.pool.as_ref())
        .await
        .map_err(|e| {
            if e
                .as_database_error()
                .is_some_and(|db| db.is_unique_violation())
            {
                AppError::conflict(
                    "Short code already exists",
                    json!({ "code": new_url.code }),
                )
            } else {
                AppError::from(e)
            }
        })?;

        Ok(row.into())
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<ShortUrl>, AppError> {
        let row = sqlx::query_as::<_, ShortUrlRow>(&format!(
            "SELECT {COLUMNS} FROM short_urls WHERE code = $1"
        ))
        .bind(code)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Into::into))
    }

    async fn find_owned_by_id(
        &self,
        id: i64,
        api_key_id: i64,
    ) -> Result<Option<ShortUrl>, AppError> {
        let row = sqlx::query_as::<_, ShortUrlRow>(&format!(
            "SELECT {COLUMNS} FROM short_urls WHERE id = $1 AND api_key_id = $2"
        ))
        .bind(id)
        .bind(api_key_id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Into::into))
    }

    async fn find_owned_by_code(
        &self,
        code: &str,
        api_key_id: i64,
    ) -> Result<Option<ShortUrl>, AppError> {
        let row = sqlx::query_as::<_, ShortUrlRow>(&format!(
            "SELECT {COLUMNS} FROM short_urls WHERE code = $1 AND api_key_id = $2"
        ))
        .bind(code)
        .bind(api_key_id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Into::into))
    }

    async fn list_by_owner(
        &self,
        api_key_id: i64,
        page: i64,
        page_size: i64,
    ) -> Result<Vec<ShortUrl>, AppError> {
        let offset = (page - 1) * page_size;

        let rows = sqlx::query_as::<_, ShortUrlRow>(&format!(
            r#"
            SELECT {COLUMNS}
            FROM short_urls
            WHERE api_key_id = $1
            ORDER BY created_at DESC, id DESC
            LIMIT $2 OFFSET $3
            "#
        ))
        .bind(api_key_id)
        .bind(page_size)
        .bind(offset)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn count_by_owner(&self, api_key_id: i64) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM short_urls WHERE api_key_id = $1")
            .bind(api_key_id)
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(count)
    }

    async fn update_owned(
        &self,
        id: i64,
        api_key_id: i64,
        patch: ShortUrlPatch,
    ) -> Result<Option<ShortUrl>, AppError> {
        // $3 toggles whether expires_at is touched at all, so NULL in $4 can clear it.
        let row = sqlx::query_as::<_, ShortUrlRow>(&format!(
            r#"
            UPDATE short_urls
            SET original_url = COALESCE($5, original_url),
                expires_at   = CASE WHEN $3 THEN $4 ELSE expires_at END,
                updated_at   = NOW()
            WHERE id = $1 AND api_key_id = $2
            RETURNING {COLUMNS}
            "#
        ))
        .bind(id)
        .bind(api_key_id)
        .bind(patch.expires_at.is_some())
        .bind(patch.expires_at.flatten())
        .bind(patch.original_url)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Into::into))
    }

    async fn delete_owned(&self, id: i64, api_key_id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM short_urls WHERE id = $1 AND api_key_id = $2")
            .bind(id)
            .bind(api_key_id)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(self.pool.as_ref())
            .await?;
        Ok(())
    }
}
