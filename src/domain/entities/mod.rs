//! Core domain entities.
//!
//! # Entity Types
//!
//! - [`Url`] - A canonical, deduplicated destination with its short code and click counter
//! - [`CustomDomain`] - A user-owned vanity prefix
//! - [`UserUrl`] - An alias binding a user to a [`Url`], optionally under a custom domain
//! - [`AliasView`] - Read model joining an alias with its URL and domain prefix
//!
//! Creation inputs live in separate structs (`NewUrl`, `NewCustomDomain`,
//! `NewCustomAlias`) so the database owns ids and timestamps.

pub mod custom_domain;
pub mod url;
pub mod user_url;

pub use custom_domain::{CustomDomain, NewCustomDomain};
pub use url::{NewUrl, Url};
pub use user_url::{AliasView, NewCustomAlias, UserUrl};
