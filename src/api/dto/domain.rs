//! DTOs for custom domain management.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::entities::CustomDomain;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateDomainRequest {
    #[validate(length(max = 64))]
    pub prefix: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainItem {
    pub id: i64,
    pub prefix: String,
    /// Full vanity host, e.g. `abc.s8l.xyz`.
    pub domain: String,
    pub created_at: DateTime<Utc>,
}

impl DomainItem {
    pub fn new(domain: CustomDomain, service_domain_marker: &str) -> Self {
        Self {
            id: domain.id,
            domain: format!("{}{}", domain.prefix, service_domain_marker),
            prefix: domain.prefix,
            created_at: domain.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DomainListResponse {
    pub items: Vec<DomainItem>,
}
