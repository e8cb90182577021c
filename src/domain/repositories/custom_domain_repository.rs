//! Repository trait for custom domain prefixes.

use crate::domain::entities::{CustomDomain, NewCustomDomain};
use crate::error::AppError;
use async_trait::async_trait;

/// Constraint guarding global prefix uniqueness.
pub const PREFIX_CONSTRAINT: &str = "custom_domains_prefix_key";

/// Repository interface for the custom domain registry.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgCustomDomainRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CustomDomainRepository: Send + Sync {
    /// Lists a user's domains, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn list_for_user(&self, user_id: i64) -> Result<Vec<CustomDomain>, AppError>;

    /// Finds a domain by id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_by_id(&self, id: i64) -> Result<Option<CustomDomain>, AppError>;

    /// Finds a domain by its (case-folded) prefix.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_by_prefix(&self, prefix: &str) -> Result<Option<CustomDomain>, AppError>;

    /// Counts the domains owned by a user.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn count_for_user(&self, user_id: i64) -> Result<i64, AppError>;

    /// Inserts a domain unless the owner already has `limit` domains.
    ///
    /// The count and the insert run in one transaction holding a lock on the
    /// owner, so concurrent requests cannot exceed the limit.
    ///
    /// Returns `Ok(None)` when the limit is reached.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] naming [`PREFIX_CONSTRAINT`] if the prefix is taken.
    /// Returns [`AppError::Internal`] on database errors.
    async fn create_within_limit(
        &self,
        new_domain: NewCustomDomain,
        limit: i64,
    ) -> Result<Option<CustomDomain>, AppError>;

    /// Deletes a domain, its aliases, and any URL left without aliases.
    ///
    /// Returns `Ok(false)` if the domain does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn delete(&self, id: i64) -> Result<bool, AppError>;
}
