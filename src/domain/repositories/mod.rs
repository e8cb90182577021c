//! Repository trait definitions for the domain layer.
//!
//! Traits define the contract for data operations; implementations live in
//! `crate::infrastructure::persistence` and mocks are generated via `mockall`
//! for service tests.
//!
//! # Available Repositories
//!
//! - [`UrlRepository`] - Canonical URL registry
//! - [`UserUrlRepository`] - User aliases and listings
//! - [`CustomDomainRepository`] - Vanity prefixes
//! - [`TokenRepository`] - Users and API token authentication
//!
//! # Testing
//!
//! See integration tests in `tests/repository_*.rs` for usage examples.

pub mod custom_domain_repository;
pub mod token_repository;
pub mod url_repository;
pub mod user_url_repository;

pub use custom_domain_repository::CustomDomainRepository;
pub use token_repository::{ApiToken, TokenRepository, User};
pub use url_repository::UrlRepository;
pub use user_url_repository::{AliasQuery, AliasSort, UserUrlRepository};

#[cfg(test)]
pub use custom_domain_repository::MockCustomDomainRepository;
#[cfg(test)]
pub use token_repository::MockTokenRepository;
#[cfg(test)]
pub use url_repository::MockUrlRepository;
#[cfg(test)]
pub use user_url_repository::MockUserUrlRepository;
