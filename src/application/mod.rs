//! Application layer services implementing business logic.
//!
//! Services consume repository traits, apply validation and business rules,
//! and translate storage-level failures into domain errors before they reach
//! HTTP handlers.
//!
//! # Available Services
//!
//! - [`services::shorten_service::ShortenService`] - URL allocation and alias creation
//! - [`services::resolver_service::ResolverService`] - Redirect resolution and click counting
//! - [`services::alias_service::AliasService`] - Alias listing and deletion
//! - [`services::custom_domain_service::CustomDomainService`] - Vanity prefix management
//! - [`services::auth_service::AuthService`] - API token authentication

pub mod services;
