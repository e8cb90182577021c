//! Custom domain (vanity prefix) management.

use crate::domain::entities::{CustomDomain, NewCustomDomain};
use crate::domain::repositories::CustomDomainRepository;
use crate::domain::repositories::custom_domain_repository::PREFIX_CONSTRAINT;
use crate::error::{AppError, ErrorCode};
use crate::utils::code_generator::validate_prefix;
use serde_json::json;
use std::sync::Arc;

/// Maximum number of custom domains a single user may own.
pub const MAX_DOMAINS_PER_USER: i64 = 2;

/// Service for reserving, listing, and releasing custom domain prefixes.
pub struct CustomDomainService<R: CustomDomainRepository> {
    repository: Arc<R>,
    extra_reserved: Vec<String>,
}

impl<R: CustomDomainRepository> CustomDomainService<R> {
    /// Creates a new custom domain service.
    ///
    /// `extra_reserved` extends the built-in reserved prefix list.
    pub fn new(repository: Arc<R>, extra_reserved: Vec<String>) -> Self {
        Self {
            repository,
            extra_reserved,
        }
    }

    /// Lists a user's domains, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn list_for_user(&self, user_id: i64) -> Result<Vec<CustomDomain>, AppError> {
        self.repository.list_for_user(user_id).await
    }

    /// Reserves a prefix for a user.
    ///
    /// # Validation
    ///
    /// - Length 3-10, letters, digits, `-`, `_`; stored lowercase
    /// - Not a reserved prefix
    /// - Not already taken (checked, then enforced by the unique constraint)
    /// - The user owns fewer than [`MAX_DOMAINS_PER_USER`] domains (enforced in one transaction)
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] with `prefix_invalid`, `prefix_reserved`,
    /// `prefix_taken`, or `domain_limit_exceeded`.
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn create(&self, user_id: i64, prefix: &str) -> Result<CustomDomain, AppError> {
        let prefix = validate_prefix(prefix, &self.extra_reserved)?;

        if self.repository.count_for_user(user_id).await? >= MAX_DOMAINS_PER_USER {
            return Err(limit_exceeded());
        }

        if self.repository.find_by_prefix(&prefix).await?.is_some() {
            return Err(prefix_taken(&prefix));
        }

        let new_domain = NewCustomDomain {
            prefix: prefix.clone(),
            user_id,
        };

        match self
            .repository
            .create_within_limit(new_domain, MAX_DOMAINS_PER_USER)
            .await
        {
            Ok(Some(domain)) => {
                tracing::info!(user_id, prefix = %domain.prefix, "Custom domain created");
                Ok(domain)
            }
            Ok(None) => Err(limit_exceeded()),
            Err(e) if e.is_conflict_on(PREFIX_CONSTRAINT) => Err(prefix_taken(&prefix)),
            Err(e) => Err(e),
        }
    }

    /// Loads a domain and checks that `user_id` owns it.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the domain does not exist.
    /// Returns [`AppError::Forbidden`] if another user owns it.
    pub async fn get_owned(&self, id: i64, user_id: i64) -> Result<CustomDomain, AppError> {
        let domain = self.repository.find_by_id(id).await?.ok_or_else(|| {
            AppError::not_found("Custom domain not found", json!({ "custom_domain_id": id }))
        })?;

        if !domain.is_owned_by(user_id) {
            return Err(AppError::forbidden(
                "You do not own this custom domain",
                json!({ "custom_domain_id": id }),
            ));
        }

        Ok(domain)
    }

    /// Deletes a domain together with its aliases and any URLs left unreferenced.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] or [`AppError::Forbidden`] per [`Self::get_owned`].
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn delete(&self, id: i64, user_id: i64) -> Result<(), AppError> {
        self.get_owned(id, user_id).await?;

        if !self.repository.delete(id).await? {
            return Err(AppError::not_found(
                "Custom domain not found",
                json!({ "custom_domain_id": id }),
            ));
        }

        tracing::info!(user_id, custom_domain_id = id, "Custom domain deleted");
        Ok(())
    }
}

fn limit_exceeded() -> AppError {
    AppError::validation(
        ErrorCode::DomainLimitExceeded,
        "You can own at most 2 custom domains",
        json!({ "limit": MAX_DOMAINS_PER_USER }),
    )
}

fn prefix_taken(prefix: &str) -> AppError {
    AppError::validation(
        ErrorCode::PrefixTaken,
        "This prefix is already in use",
        json!({ "prefix": prefix }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::MockCustomDomainRepository;
    use chrono::Utc;

    fn domain(id: i64, prefix: &str, user_id: i64) -> CustomDomain {
        CustomDomain::new(id, prefix.to_string(), user_id, Utc::now())
    }

    fn service(mock: MockCustomDomainRepository) -> CustomDomainService<MockCustomDomainRepository> {
        CustomDomainService::new(Arc::new(mock), vec!["blog".to_string()])
    }

    #[tokio::test]
    async fn test_create_success_folds_case() {
        let mut mock = MockCustomDomainRepository::new();

        mock.expect_count_for_user().returning(|_| Ok(0));
        mock.expect_find_by_prefix()
            .withf(|p| p == "abc")
            .returning(|_| Ok(None));
        mock.expect_create_within_limit()
            .withf(|d, limit| d.prefix == "abc" && d.user_id == 1 && *limit == 2)
            .times(1)
            .returning(|d, _| Ok(Some(domain(5, &d.prefix, d.user_id))));

        let created = service(mock).create(1, "ABC").await.unwrap();

        assert_eq!(created.id, 5);
        assert_eq!(created.prefix, "abc");
    }

    #[tokio::test]
    async fn test_create_reserved_prefix() {
        let mock = MockCustomDomainRepository::new();
        let svc = service(mock);

        let err = svc.create(1, "WWW").await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::PrefixReserved);

        let err = svc.create(1, "blog").await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::PrefixReserved);
    }

    #[tokio::test]
    async fn test_create_invalid_prefix() {
        let err = service(MockCustomDomainRepository::new())
            .create(1, "a.b")
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::PrefixInvalid);
    }

    #[tokio::test]
    async fn test_third_domain_is_rejected() {
        let mut mock = MockCustomDomainRepository::new();
        mock.expect_count_for_user().returning(|_| Ok(2));
        mock.expect_create_within_limit().never();

        let err = service(mock).create(1, "third").await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::DomainLimitExceeded);
    }

    #[tokio::test]
    async fn test_limit_race_is_reported() {
        let mut mock = MockCustomDomainRepository::new();
        mock.expect_count_for_user().returning(|_| Ok(1));
        mock.expect_find_by_prefix().returning(|_| Ok(None));
        mock.expect_create_within_limit().returning(|_, _| Ok(None));

        let err = service(mock).create(1, "late").await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::DomainLimitExceeded);
    }

    #[tokio::test]
    async fn test_prefix_taken_precheck() {
        let mut mock = MockCustomDomainRepository::new();
        mock.expect_count_for_user().returning(|_| Ok(0));
        mock.expect_find_by_prefix()
            .returning(|p| Ok(Some(domain(9, p, 2))));

        let err = service(mock).create(1, "abc").await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::PrefixTaken);
    }

    #[tokio::test]
    async fn test_prefix_taken_race() {
        let mut mock = MockCustomDomainRepository::new();
        mock.expect_count_for_user().returning(|_| Ok(0));
        mock.expect_find_by_prefix().returning(|_| Ok(None));
        mock.expect_create_within_limit()
            .returning(|_, _| Err(AppError::conflict(Some(PREFIX_CONSTRAINT), "dup")));

        let err = service(mock).create(1, "abc").await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::PrefixTaken);
    }

    #[tokio::test]
    async fn test_delete_not_owner() {
        let mut mock = MockCustomDomainRepository::new();
        mock.expect_find_by_id().returning(|id| Ok(Some(domain(id, "abc", 2))));
        mock.expect_delete().never();

        let err = service(mock).delete(3, 1).await.unwrap_err();
        assert!(matches!(err, AppError::Forbidden { .. }));
    }

    #[tokio::test]
    async fn test_delete_missing() {
        let mut mock = MockCustomDomainRepository::new();
        mock.expect_find_by_id().returning(|_| Ok(None));

        let err = service(mock).delete(3, 1).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_delete_success() {
        let mut mock = MockCustomDomainRepository::new();
        mock.expect_find_by_id().returning(|id| Ok(Some(domain(id, "abc", 1))));
        mock.expect_delete().withf(|id| *id == 3).times(1).returning(|_| Ok(true));

        assert!(service(mock).delete(3, 1).await.is_ok());
    }
}
