//! Data Transfer Objects for API requests and responses.
//!
//! All DTOs use Serde with camelCase field names; request bodies are checked
//! with `validator` before reaching the services.

pub mod custom_shorten;
pub mod domain;
pub mod health;
pub mod logs;
pub mod shorten;
pub mod title;
pub mod user_urls;
