//! DTOs for the basic shortening endpoint.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::entities::Url;
use crate::domain::route::RouteCodec;

/// Request to shorten one URL.
///
/// The scheme may be omitted; `https://` is assumed.
#[derive(Debug, Deserialize, Validate)]
pub struct ShortenRequest {
    #[validate(length(min = 1, max = 2048, message = "URL must be 1-2048 characters"))]
    pub url: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortenResponse {
    pub short_code: String,
    pub original_url: String,
    pub title: String,
    pub short_url: String,
}

impl ShortenResponse {
    pub fn from_url(url: Url, codec: &RouteCodec) -> Self {
        Self {
            short_url: codec.short_url(&url.short_code),
            short_code: url.short_code,
            original_url: url.original_url,
            title: url.title,
        }
    }
}
