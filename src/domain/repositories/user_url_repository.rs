//! Repository trait for user aliases.

use crate::domain::entities::{AliasView, NewCustomAlias, UserUrl};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Constraint guarding `(custom_domain_id, custom_path)` uniqueness.
pub const CUSTOM_PATH_CONSTRAINT: &str = "user_urls_domain_path_key";
/// Foreign key from an alias to its URL; violated when the URL was cleaned up concurrently.
pub const ALIAS_URL_FKEY: &str = "user_urls_url_id_fkey";
/// Foreign key from an alias to its custom domain; violated when the domain was deleted concurrently.
pub const ALIAS_DOMAIN_FKEY: &str = "user_urls_custom_domain_id_fkey";

/// Ordering for alias listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AliasSort {
    #[default]
    Newest,
    Oldest,
    /// By the URL's click count, highest first.
    Clicks,
}

impl AliasSort {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Newest => "newest",
            Self::Oldest => "oldest",
            Self::Clicks => "clicks",
        }
    }
}

/// Filter and page selection for [`UserUrlRepository::list_for_user`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasQuery {
    /// Case-insensitive substring matched against URL title, custom title, and original URL.
    pub search: Option<String>,
    pub sort: AliasSort,
    /// Inclusive lower bound on alias creation time.
    pub created_from: Option<DateTime<Utc>>,
    /// Inclusive upper bound on alias creation time.
    pub created_to: Option<DateTime<Utc>>,
    pub offset: i64,
    pub limit: i64,
}

/// Repository interface for the ownership/alias layer.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgUserUrlRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserUrlRepository: Send + Sync {
    /// Finds an alias by id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_by_id(&self, id: i64) -> Result<Option<UserUrl>, AppError>;

    /// Finds the alias occupying `path` under a custom domain.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_by_custom_path(
        &self,
        custom_domain_id: i64,
        custom_path: &str,
    ) -> Result<Option<UserUrl>, AppError>;

    /// Ensures a plain alias exists for `(user_id, url_id)`; a no-op if it already does.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::StaleReference`] naming [`ALIAS_URL_FKEY`] if the URL was removed.
    /// Returns [`AppError::Internal`] on database errors.
    async fn create_basic(&self, user_id: i64, url_id: i64) -> Result<UserUrl, AppError>;

    /// Inserts a custom-domain alias.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] naming [`CUSTOM_PATH_CONSTRAINT`] if the path is taken.
    /// Returns [`AppError::StaleReference`] naming [`ALIAS_URL_FKEY`] if the URL was removed,
    /// or [`ALIAS_DOMAIN_FKEY`] if the custom domain was.
    /// Returns [`AppError::Internal`] on database errors.
    async fn create_custom(&self, alias: NewCustomAlias) -> Result<UserUrl, AppError>;

    /// Returns one page of a user's aliases and the total number matching the filter.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn list_for_user(
        &self,
        user_id: i64,
        query: AliasQuery,
    ) -> Result<(Vec<AliasView>, i64), AppError>;

    /// Deletes an alias and, in the same transaction, its URL if no other alias references it.
    ///
    /// Returns `Ok(false)` if the alias does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn delete(&self, id: i64) -> Result<bool, AppError>;
}
