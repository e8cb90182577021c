//! Canonical URL entity shared by every alias that points at the same destination.

use chrono::{DateTime, Utc};

/// A deduplicated destination record.
///
/// Exactly one row exists per normalized `original_url`. The `short_code` is
/// used for plain (non-custom) redirects and is unique across all rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Url {
    pub id: i64,
    pub original_url: String,
    pub short_code: String,
    pub title: String,
    pub click_count: i64,
    pub created_at: DateTime<Utc>,
}

impl Url {
    /// Creates a new Url instance.
    pub fn new(
        id: i64,
        original_url: String,
        short_code: String,
        title: String,
        click_count: i64,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            original_url,
            short_code,
            title,
            click_count,
            created_at,
        }
    }
}

/// Input data for creating a new canonical URL.
///
/// `click_count` always starts at zero and `created_at` is set by the database.
#[derive(Debug, Clone)]
pub struct NewUrl {
    pub original_url: String,
    pub short_code: String,
    pub title: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_creation() {
        let now = Utc::now();
        let url = Url::new(
            1,
            "https://example.com/a".to_string(),
            "aB3_-z".to_string(),
            "Example".to_string(),
            0,
            now,
        );

        assert_eq!(url.id, 1);
        assert_eq!(url.original_url, "https://example.com/a");
        assert_eq!(url.short_code, "aB3_-z");
        assert_eq!(url.click_count, 0);
        assert_eq!(url.created_at, now);
    }
}
