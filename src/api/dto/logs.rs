//! DTOs for the recent-log endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Serialize)]
pub struct LogsResponse {
    pub logs: Vec<String>,
    pub timestamp: DateTime<Utc>,
}

/// Operator note appended to the buffer.
#[derive(Debug, Deserialize, Validate)]
pub struct LogMessageRequest {
    #[validate(length(min = 1, max = 1000))]
    pub message: String,
}
