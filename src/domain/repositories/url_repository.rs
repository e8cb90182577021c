//! Repository trait for canonical URL records.

use crate::domain::entities::{NewUrl, Url};
use crate::error::AppError;
use async_trait::async_trait;

/// Constraint guarding one row per normalized original URL.
pub const ORIGINAL_URL_CONSTRAINT: &str = "urls_original_url_key";
/// Constraint guarding short code uniqueness.
pub const SHORT_CODE_CONSTRAINT: &str = "urls_short_code_key";

/// Repository interface for the URL registry.
///
/// Uniqueness of `original_url` and `short_code` is enforced by the storage
/// layer; callers must not rely on a prior lookup to keep inserts safe.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgUrlRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UrlRepository: Send + Sync {
    /// Finds a URL by its normalized original URL.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_by_original_url(&self, original_url: &str) -> Result<Option<Url>, AppError>;

    /// Finds a URL by its short code.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_by_short_code(&self, short_code: &str) -> Result<Option<Url>, AppError>;

    /// Finds a URL by id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_by_id(&self, id: i64) -> Result<Option<Url>, AppError>;

    /// Inserts a new URL.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] naming [`ORIGINAL_URL_CONSTRAINT`] or
    /// [`SHORT_CODE_CONSTRAINT`] when the insert races an existing row.
    /// Returns [`AppError::Internal`] on database errors.
    async fn create(&self, new_url: NewUrl) -> Result<Url, AppError>;

    /// Atomically adds one to the click counter.
    ///
    /// Returns `Ok(false)` if no row has this id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn increment_click(&self, id: i64) -> Result<bool, AppError>;

    /// Deletes a URL that no alias references.
    ///
    /// Returns `Ok(false)` if the row does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if any alias still references the URL.
    /// Returns [`AppError::Internal`] on database errors.
    async fn delete(&self, id: i64) -> Result<bool, AppError>;
}
