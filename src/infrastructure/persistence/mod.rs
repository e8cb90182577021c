//! PostgreSQL repository implementations.
//!
//! Concrete implementations of domain repository traits using SQLx. Unique and
//! foreign key violations are reported with their constraint names (see
//! [`crate::error::AppError`]) so services can translate them.
//!
//! # Repositories
//!
//! - [`PgUrlRepository`] - Canonical URL storage and click counting
//! - [`PgUserUrlRepository`] - Aliases, listings, and orphan cleanup
//! - [`PgCustomDomainRepository`] - Vanity prefixes with a per-user cap
//! - [`PgTokenRepository`] - Users and API token storage

mod orphan_cleanup;
pub mod pg_custom_domain_repository;
pub mod pg_token_repository;
pub mod pg_url_repository;
pub mod pg_user_url_repository;

pub use pg_custom_domain_repository::PgCustomDomainRepository;
pub use pg_token_repository::PgTokenRepository;
pub use pg_url_repository::PgUrlRepository;
pub use pg_user_url_repository::PgUserUrlRepository;
