//! Alias entity binding a user to a canonical URL.

use chrono::{DateTime, Utc};

/// One user's binding to a [`super::Url`], optionally under a custom domain.
///
/// `custom_domain_id` and `custom_path` are either both set or both unset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserUrl {
    pub id: i64,
    pub user_id: i64,
    pub url_id: i64,
    pub custom_domain_id: Option<i64>,
    pub custom_path: Option<String>,
    pub custom_title: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl UserUrl {
    /// Returns true if the alias is served under a custom domain.
    pub fn is_custom(&self) -> bool {
        self.custom_domain_id.is_some()
    }
}

/// Input data for a custom-domain alias.
///
/// `custom_path` must already be validated and case-folded.
#[derive(Debug, Clone)]
pub struct NewCustomAlias {
    pub user_id: i64,
    pub url_id: i64,
    pub custom_domain_id: i64,
    pub custom_path: String,
    pub custom_title: Option<String>,
}

/// An alias joined with its URL and, for custom aliases, the domain prefix.
///
/// Read model used for listings and API responses.
#[derive(Debug, Clone)]
pub struct AliasView {
    pub id: i64,
    pub user_id: i64,
    pub url_id: i64,
    pub original_url: String,
    pub short_code: String,
    pub url_title: String,
    pub click_count: i64,
    pub custom_domain_id: Option<i64>,
    pub custom_prefix: Option<String>,
    pub custom_path: Option<String>,
    pub custom_title: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl AliasView {
    /// The display title: the alias override when present, otherwise the URL title.
    pub fn display_title(&self) -> &str {
        self.custom_title.as_deref().unwrap_or(&self.url_title)
    }

    /// Prefix and path when the alias is served under a custom domain.
    pub fn custom_route(&self) -> Option<(&str, &str)> {
        match (&self.custom_prefix, &self.custom_path) {
            (Some(prefix), Some(path)) => Some((prefix, path)),
            _ => None,
        }
    }
}
