//! Business logic services for the application layer.

pub mod alias_service;
pub mod auth_service;
pub mod custom_domain_service;
pub mod resolver_service;
pub mod shorten_service;

pub use alias_service::AliasService;
pub use auth_service::AuthService;
pub use custom_domain_service::CustomDomainService;
pub use resolver_service::{Resolution, ResolverService};
pub use shorten_service::{ShortenOutcome, ShortenService};
