//! Best-effort page title lookup for newly shortened URLs.
//!
//! Provides a [`PageTitleFetcher`] trait with one production implementation,
//! [`HttpTitleFetcher`]. Failures never propagate: callers always receive a
//! title, falling back to [`UNTITLED`].

mod http_fetcher;
mod service;

pub use http_fetcher::{HttpTitleFetcher, extract_title};
pub use service::{PageTitleFetcher, UNTITLED};

#[cfg(test)]
pub use service::MockPageTitleFetcher;
