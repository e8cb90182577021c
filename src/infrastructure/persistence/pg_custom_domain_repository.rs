//! PostgreSQL implementation of the custom domain repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;

use super::orphan_cleanup::delete_orphaned_urls;
use crate::domain::entities::{CustomDomain, NewCustomDomain};
use crate::domain::repositories::CustomDomainRepository;
use crate::error::AppError;

struct CustomDomainRow {
    id: i64,
    prefix: String,
    user_id: i64,
    created_at: DateTime<Utc>,
}

impl From<CustomDomainRow> for CustomDomain {
    fn from(r: CustomDomainRow) -> Self {
        CustomDomain::new(r.id, r.prefix, r.user_id, r.created_at)
    }
}

/// PostgreSQL repository for custom domain prefixes.
pub struct PgCustomDomainRepository {
    pool: Arc<PgPool>,
}

impl PgCustomDomainRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CustomDomainRepository for PgCustomDomainRepository {
    async fn list_for_user(&self, user_id: i64) -> Result<Vec<CustomDomain>, AppError> {
        let rows = sqlx::query_as!(
            CustomDomainRow,
            r#"
            SELECT id, prefix, user_id, created_at
            FROM custom_domains
            WHERE user_id = $1
            ORDER BY created_at DESC, id DESC
            "#,
            user_id
        )
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(CustomDomain::from).collect())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<CustomDomain>, AppError> {
        let row = sqlx::query_as!(
            CustomDomainRow,
            "SELECT id, prefix, user_id, created_at FROM custom_domains WHERE id = $1",
            id
        )
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(CustomDomain::from))
    }

    async fn find_by_prefix(&self, prefix: &str) -> Result<Option<CustomDomain>, AppError> {
        let folded = prefix.to_ascii_lowercase();

        let row = sqlx::query_as!(
            CustomDomainRow,
            "SELECT id, prefix, user_id, created_at FROM custom_domains WHERE prefix = $1",
            folded
        )
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(CustomDomain::from))
    }

    async fn count_for_user(&self, user_id: i64) -> Result<i64, AppError> {
        let count = sqlx::query_scalar!(
            r#"SELECT COUNT(*) AS "count!" FROM custom_domains WHERE user_id = $1"#,
            user_id
        )
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(count)
    }

    async fn create_within_limit(
        &self,
        new_domain: NewCustomDomain,
        limit: i64,
    ) -> Result<Option<CustomDomain>, AppError> {
        let mut tx = self.pool.begin().await?;

        // Serializes concurrent creations for the same owner.
        sqlx::query!(
            "SELECT id FROM users WHERE id = $1 FOR UPDATE",
            new_domain.user_id
        )
        .fetch_optional(&mut *tx)
        .await?;

        let count = sqlx::query_scalar!(
            r#"SELECT COUNT(*) AS "count!" FROM custom_domains WHERE user_id = $1"#,
            new_domain.user_id
        )
        .fetch_one(&mut *tx)
        .await?;

        if count >= limit {
            tx.rollback().await?;
            return Ok(None);
        }

        let row = sqlx::query_as!(
            CustomDomainRow,
            r#"
            INSERT INTO custom_domains (prefix, user_id)
            VALUES ($1, $2)
            RETURNING id, prefix, user_id, created_at
            "#,
            new_domain.prefix,
            new_domain.user_id
        )
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(Some(row.into()))
    }

    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        let mut tx = self.pool.begin().await?;

        let url_ids = sqlx::query_scalar!(
            "DELETE FROM user_urls WHERE custom_domain_id = $1 RETURNING url_id",
            id
        )
        .fetch_all(&mut *tx)
        .await?;

        let result = sqlx::query!("DELETE FROM custom_domains WHERE id = $1", id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(false);
        }

        delete_orphaned_urls(&mut tx, &url_ids).await?;

        tx.commit().await?;

        Ok(true)
    }
}
