//! DTOs for the page title preview.

use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct TitleQuery {
    pub url: String,
}

#[derive(Debug, Serialize)]
pub struct TitleResponse {
    pub title: String,
}
