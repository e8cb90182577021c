//! Page title fetcher trait.

use async_trait::async_trait;

/// Placeholder title used when no title could be fetched.
pub const UNTITLED: &str = "Untitled";

/// Trait for looking up the `<title>` of a remote page.
///
/// Implementations must be bounded in time and must not fail: timeouts,
/// network errors, non-success statuses, and pages without a title all yield
/// [`UNTITLED`].
///
/// # Implementations
///
/// - [`crate::infrastructure::title::HttpTitleFetcher`] - `reqwest`-backed fetcher
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PageTitleFetcher: Send + Sync {
    /// Returns the page title for `url`, or [`UNTITLED`].
    async fn fetch_title(&self, url: &str) -> String;
}
