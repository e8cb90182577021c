//! DTOs for shortening under a custom domain.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::entities::AliasView;
use crate::domain::route::RouteCodec;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CustomShortenRequest {
    #[validate(length(min = 1, max = 2048, message = "URL must be 1-2048 characters"))]
    pub url: String,

    #[validate(length(max = 200, message = "Title must be at most 200 characters"))]
    pub custom_title: Option<String>,

    pub custom_domain_id: i64,

    /// Checked by the service so that bad paths report `path_invalid`.
    pub custom_path: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomShortenResponse {
    pub id: i64,
    pub original_url: String,
    pub title: String,
    pub short_url: String,
    pub custom_path: Option<String>,
    pub custom_domain: Option<String>,
    pub click_count: i64,
    pub created_at: DateTime<Utc>,
}

impl CustomShortenResponse {
    pub fn from_view(view: AliasView, codec: &RouteCodec) -> Self {
        let short_url = match view.custom_route() {
            Some((prefix, path)) => codec.custom_url(prefix, path),
            None => codec.short_url(&view.short_code),
        };

        Self {
            id: view.id,
            title: view.display_title().to_string(),
            short_url,
            original_url: view.original_url,
            custom_path: view.custom_path,
            custom_domain: view.custom_prefix,
            click_count: view.click_count,
            created_at: view.created_at,
        }
    }
}
