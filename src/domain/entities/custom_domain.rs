//! Custom domain entity: a vanity prefix reserved by one user.

use chrono::{DateTime, Utc};

/// A user-owned prefix served as `<prefix>.<service domain>/<path>`.
///
/// Prefixes are stored case-folded and are globally unique.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomDomain {
    pub id: i64,
    pub prefix: String,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
}

impl CustomDomain {
    /// Creates a new CustomDomain instance.
    pub fn new(id: i64, prefix: String, user_id: i64, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            prefix,
            user_id,
            created_at,
        }
    }

    /// Returns true if `user_id` owns this domain.
    pub fn is_owned_by(&self, user_id: i64) -> bool {
        self.user_id == user_id
    }
}

/// Input data for reserving a new prefix.
#[derive(Debug, Clone)]
pub struct NewCustomDomain {
    pub prefix: String,
    pub user_id: i64,
}
