//! HTTP implementation of [`PageTitleFetcher`].

use super::service::{PageTitleFetcher, UNTITLED};
use async_trait::async_trait;
use regex::Regex;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use std::sync::LazyLock;
use std::time::Duration;

/// Upper bound on bytes read from a response body.
const MAX_BODY_BYTES: usize = 64 * 1024;
const MAX_TITLE_CHARS: usize = 200;

static TITLE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)<title[^>]*>([^<]+)</title>").expect("title pattern is valid")
});

/// Extracts and cleans the first `<title>` element of an HTML fragment.
///
/// Whitespace runs collapse to a single space and the result is truncated to
/// 200 characters. Returns `None` if there is no non-empty title.
pub fn extract_title(html: &str) -> Option<String> {
    let raw = TITLE_PATTERN.captures(html)?.get(1)?.as_str();

    let cleaned: String = raw
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .chars()
        .take(MAX_TITLE_CHARS)
        .collect();

    (!cleaned.is_empty()).then_some(cleaned)
}

/// `reqwest`-backed title fetcher with a hard time budget.
#[derive(Clone)]
pub struct HttpTitleFetcher {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpTitleFetcher {
    /// Builds a fetcher whose requests never exceed `timeout`.
    ///
    /// # Errors
    ///
    /// Returns an error if the TLS backend cannot be initialized.
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("text/html,application/xhtml+xml;q=0.9,*/*;q=0.8"),
        );

        let client = reqwest::Client::builder()
            .user_agent(concat!("s8l/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()?;

        Ok(Self { client, timeout })
    }

    async fn read_title(&self, url: &str) -> Result<Option<String>, reqwest::Error> {
        let mut response = self.client.get(url).send().await?.error_for_status()?;

        let mut body: Vec<u8> = Vec::new();
        while let Some(chunk) = response.chunk().await? {
            let room = MAX_BODY_BYTES.saturating_sub(body.len());
            body.extend_from_slice(&chunk[..chunk.len().min(room)]);

            if body.len() >= MAX_BODY_BYTES || contains_title_end(&body) {
                break;
            }
        }

        Ok(extract_title(&String::from_utf8_lossy(&body)))
    }
}

fn contains_title_end(body: &[u8]) -> bool {
    body.windows(8)
        .any(|w| w.eq_ignore_ascii_case(b"</title>"))
}

#[async_trait]
impl PageTitleFetcher for HttpTitleFetcher {
    async fn fetch_title(&self, url: &str) -> String {
        match tokio::time::timeout(self.timeout, self.read_title(url)).await {
            Ok(Ok(Some(title))) => title,
            Ok(Ok(None)) => {
                tracing::debug!(url = %url, "Page has no title");
                UNTITLED.to_string()
            }
            Ok(Err(e)) => {
                tracing::warn!(url = %url, error = %e, "Failed to fetch page title");
                UNTITLED.to_string()
            }
            Err(_) => {
                tracing::warn!(url = %url, timeout_ms = self.timeout.as_millis() as u64, "Page title fetch timed out");
                UNTITLED.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_title_simple() {
        let html = "<html><head><title>Example Domain</title></head></html>";
        assert_eq!(extract_title(html).as_deref(), Some("Example Domain"));
    }

    #[test]
    fn test_extract_title_case_and_attributes() {
        let html = r#"<TITLE lang="en">  Hello
            World  </TITLE>"#;
        assert_eq!(extract_title(html).as_deref(), Some("Hello World"));
    }

    #[test]
    fn test_extract_title_truncates() {
        let html = format!("<title>{}</title>", "x".repeat(500));
        assert_eq!(extract_title(&html).unwrap().chars().count(), 200);
    }

    #[test]
    fn test_extract_title_missing() {
        assert_eq!(extract_title("<html><body>no title</body></html>"), None);
        assert_eq!(extract_title("<title>   </title>"), None);
    }

    #[test]
    fn test_contains_title_end() {
        assert!(contains_title_end(b"<title>a</TITLE>"));
        assert!(!contains_title_end(b"<title>a"));
    }

    #[tokio::test]
    async fn test_unreachable_host_yields_placeholder() {
        let fetcher = HttpTitleFetcher::new(Duration::from_millis(200)).unwrap();
        let title = fetcher.fetch_title("http://127.0.0.1:1/").await;
        assert_eq!(title, UNTITLED);
    }
}
