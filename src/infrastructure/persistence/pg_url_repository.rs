//! PostgreSQL implementation of the URL repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{NewUrl, Url};
use crate::domain::repositories::UrlRepository;
use crate::error::AppError;

struct UrlRow {
    id: i64,
    original_url: String,
    short_code: String,
    title: String,
    click_count: i64,
    created_at: DateTime<Utc>,
}

impl From<UrlRow> for Url {
    fn from(r: UrlRow) -> Self {
        Url::new(
            r.id,
            r.original_url,
            r.short_code,
            r.title,
            r.click_count,
            r.created_at,
        )
    }
}

/// PostgreSQL repository for canonical URLs.
///
/// Uniqueness of `original_url` and `short_code` is left to the table
/// constraints; inserts that race surface as [`AppError::Conflict`].
pub struct PgUrlRepository {
    pool: Arc<PgPool>,
}

impl PgUrlRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UrlRepository for PgUrlRepository {
    async fn find_by_original_url(&self, original_url: &str) -> Result<Option<Url>, AppError> {
        let row = sqlx::query_as!(
            UrlRow,
            r#"
            SELECT id, original_url, short_code, title, click_count, created_at
            FROM urls
            WHERE original_url = $1
            "#,
            original_url
        )
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Url::from))
    }

    async fn find_by_short_code(&self, short_code: &str) -> Result<Option<Url>, AppError> {
        let row = sqlx::query_as!(
            UrlRow,
            r#"
            SELECT id, original_url, short_code, title, click_count, created_at
            FROM urls
            WHERE short_code = $1
            "#,
            short_code
        )
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Url::from))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Url>, AppError> {
        let row = sqlx::query_as!(
            UrlRow,
            r#"
            SELECT id, original_url, short_code, title, click_count, created_at
            FROM urls
            WHERE id = $1
            "#,
            id
        )
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Url::from))
    }

    async fn create(&self, new_url: NewUrl) -> Result<Url, AppError> {
        let row = sqlx::query_as!(
            UrlRow,
            r#"
            INSERT INTO urls (original_url, short_code, title)
            VALUES ($1, $2, $3)
            RETURNING id, original_url, short_code, title, click_count, created_at
            "#,
            new_url.original_url,
            new_url.short_code,
            new_url.title
        )
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(row.into())
    }

    async fn increment_click(&self, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query!("UPDATE urls SET click_count = click_count + 1 WHERE id = $1", id)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query!("DELETE FROM urls WHERE id = $1", id)
            .execute(self.pool.as_ref())
            .await
            .map_err(|e| match AppError::from(e) {
                AppError::StaleReference { constraint, .. } => AppError::Conflict {
                    constraint,
                    message: "URL is still referenced by an alias".to_string(),
                },
                other => other,
            })?;

        Ok(result.rows_affected() > 0)
    }
}
