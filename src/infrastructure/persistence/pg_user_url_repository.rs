//! PostgreSQL implementation of the alias repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;

use super::orphan_cleanup::delete_orphaned_urls;
use crate::domain::entities::{AliasView, NewCustomAlias, UserUrl};
use crate::domain::repositories::{AliasQuery, UserUrlRepository};
use crate::error::AppError;

struct UserUrlRow {
    id: i64,
    user_id: i64,
    url_id: i64,
    custom_domain_id: Option<i64>,
    custom_path: Option<String>,
    custom_title: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<UserUrlRow> for UserUrl {
    fn from(r: UserUrlRow) -> Self {
        UserUrl {
            id: r.id,
            user_id: r.user_id,
            url_id: r.url_id,
            custom_domain_id: r.custom_domain_id,
            custom_path: r.custom_path,
            custom_title: r.custom_title,
            created_at: r.created_at,
        }
    }
}

struct AliasViewRow {
    id: i64,
    user_id: i64,
    url_id: i64,
    original_url: String,
    short_code: String,
    url_title: String,
    click_count: i64,
    custom_domain_id: Option<i64>,
    custom_prefix: Option<String>,
    custom_path: Option<String>,
    custom_title: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<AliasViewRow> for AliasView {
    fn from(r: AliasViewRow) -> Self {
        AliasView {
            id: r.id,
            user_id: r.user_id,
            url_id: r.url_id,
            original_url: r.original_url,
            short_code: r.short_code,
            url_title: r.url_title,
            click_count: r.click_count,
            custom_domain_id: r.custom_domain_id,
            custom_prefix: r.custom_prefix,
            custom_path: r.custom_path,
            custom_title: r.custom_title,
            created_at: r.created_at,
        }
    }
}

/// Insert attempts for a plain alias whose conflicting row disappears before it can be read.
const BASIC_LINK_ATTEMPTS: usize = 3;

/// PostgreSQL repository for user aliases.
pub struct PgUserUrlRepository {
    pool: Arc<PgPool>,
}

impl PgUserUrlRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserUrlRepository for PgUserUrlRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<UserUrl>, AppError> {
        let row = sqlx::query_as!(
            UserUrlRow,
            r#"
            SELECT id, user_id, url_id, custom_domain_id, custom_path, custom_title, created_at
            FROM user_urls
            WHERE id = $1
            "#,
            id
        )
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(UserUrl::from))
    }

    async fn find_by_custom_path(
        &self,
        custom_domain_id: i64,
        custom_path: &str,
    ) -> Result<Option<UserUrl>, AppError> {
        let folded = custom_path.to_ascii_lowercase();

        let row = sqlx::query_as!(
            UserUrlRow,
            r#"
            SELECT id, user_id, url_id, custom_domain_id, custom_path, custom_title, created_at
            FROM user_urls
            WHERE custom_domain_id = $1 AND custom_path = $2
            "#,
            custom_domain_id,
            folded
        )
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(UserUrl::from))
    }

    async fn create_basic(&self, user_id: i64, url_id: i64) -> Result<UserUrl, AppError> {
        for attempt in 1..=BASIC_LINK_ATTEMPTS {
            let inserted = sqlx::query_as!(
                UserUrlRow,
                r#"
                INSERT INTO user_urls (user_id, url_id)
                VALUES ($1, $2)
                ON CONFLICT (user_id, url_id) WHERE custom_domain_id IS NULL DO NOTHING
                RETURNING id, user_id, url_id, custom_domain_id, custom_path, custom_title, created_at
                "#,
                user_id,
                url_id
            )
            .fetch_optional(self.pool.as_ref())
            .await?;

            if let Some(row) = inserted {
                return Ok(row.into());
            }

            let existing = sqlx::query_as!(
                UserUrlRow,
                r#"
                SELECT id, user_id, url_id, custom_domain_id, custom_path, custom_title, created_at
                FROM user_urls
                WHERE user_id = $1 AND url_id = $2 AND custom_domain_id IS NULL
                "#,
                user_id,
                url_id
            )
            .fetch_optional(self.pool.as_ref())
            .await?;

            if let Some(row) = existing {
                return Ok(row.into());
            }

            // The conflicting alias was deleted between the two statements.
            tracing::debug!(attempt, user_id, url_id, "Plain alias vanished after conflict");
        }

        tracing::error!(user_id, url_id, "Could not settle plain alias");
        Err(AppError::internal("Server error, please retry later", json!({})))
    }

    async fn create_custom(&self, alias: NewCustomAlias) -> Result<UserUrl, AppError> {
        let row = sqlx::query_as!(
            UserUrlRow,
            r#"
            INSERT INTO user_urls (user_id, url_id, custom_domain_id, custom_path, custom_title)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, user_id, url_id, custom_domain_id, custom_path, custom_title, created_at
            "#,
            alias.user_id,
            alias.url_id,
            alias.custom_domain_id,
            alias.custom_path,
            alias.custom_title
        )
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(row.into())
    }

    async fn list_for_user(
        &self,
        user_id: i64,
        query: AliasQuery,
    ) -> Result<(Vec<AliasView>, i64), AppError> {
        let search = query.search.as_deref().filter(|s| !s.is_empty());

        // $1 user, $2 search, $3 from, $4 to
        let rows = sqlx::query_as!(
            AliasViewRow,
            r#"
            SELECT uu.id AS "id!", uu.user_id AS "user_id!", uu.url_id AS "url_id!",
                   u.original_url AS "original_url!", u.short_code AS "short_code!",
                   u.title AS "url_title!", u.click_count AS "click_count!",
                   uu.custom_domain_id AS "custom_domain_id?", cd.prefix AS "custom_prefix?",
                   uu.custom_path AS "custom_path?", uu.custom_title AS "custom_title?",
                   uu.created_at AS "created_at!"
            FROM user_urls uu
            JOIN urls u ON u.id = uu.url_id
            LEFT JOIN custom_domains cd ON cd.id = uu.custom_domain_id
            WHERE uu.user_id = $1
              AND ($2::text IS NULL
                   OR strpos(lower(u.title), lower($2)) > 0
                   OR strpos(lower(coalesce(uu.custom_title, '')), lower($2)) > 0
                   OR strpos(lower(u.original_url), lower($2)) > 0)
              AND ($3::timestamptz IS NULL OR uu.created_at >= $3)
              AND ($4::timestamptz IS NULL OR uu.created_at <= $4)
            ORDER BY
                CASE WHEN $5::text = 'clicks' THEN u.click_count END DESC NULLS LAST,
                CASE WHEN $5::text = 'oldest' THEN uu.created_at END ASC,
                CASE WHEN $5::text = 'oldest' THEN uu.id END ASC,
                uu.created_at DESC,
                uu.id DESC
            LIMIT $6 OFFSET $7
            "#,
            user_id,
            search,
            query.created_from,
            query.created_to,
            query.sort.as_str(),
            query.limit,
            query.offset
        )
        .fetch_all(self.pool.as_ref())
        .await?;

        let total = sqlx::query_scalar!(
            r#"
            SELECT COUNT(*) AS "count!"
            FROM user_urls uu
            JOIN urls u ON u.id = uu.url_id
            WHERE uu.user_id = $1
              AND ($2::text IS NULL
                   OR strpos(lower(u.title), lower($2)) > 0
                   OR strpos(lower(coalesce(uu.custom_title, '')), lower($2)) > 0
                   OR strpos(lower(u.original_url), lower($2)) > 0)
              AND ($3::timestamptz IS NULL OR uu.created_at >= $3)
              AND ($4::timestamptz IS NULL OR uu.created_at <= $4)
            "#,
            user_id,
            search,
            query.created_from,
            query.created_to
        )
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok((rows.into_iter().map(AliasView::from).collect(), total))
    }

    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        let mut tx = self.pool.begin().await?;

        let url_id = sqlx::query_scalar!("DELETE FROM user_urls WHERE id = $1 RETURNING url_id", id)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(url_id) = url_id else {
            tx.rollback().await?;
            return Ok(false);
        };

        delete_orphaned_urls(&mut tx, &[url_id]).await?;

        tx.commit().await?;

        Ok(true)
    }
}
