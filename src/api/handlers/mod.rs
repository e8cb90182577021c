//! HTTP request handlers for API endpoints.
//!
//! Each handler module corresponds to a logical grouping of endpoints.

pub mod custom_shorten;
pub mod domains;
pub mod health;
pub mod logs;
pub mod redirect;
pub mod shorten;
pub mod title;
pub mod user_urls;

pub use custom_shorten::custom_shorten_handler;
pub use domains::{create_domain_handler, delete_domain_handler, domain_list_handler};
pub use health::health_handler;
pub use logs::{append_log_handler, clear_logs_handler, logs_handler};
pub use redirect::redirect_handler;
pub use shorten::shorten_handler;
pub use title::title_handler;
pub use user_urls::{delete_user_url_handler, user_urls_handler};
