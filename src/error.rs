//! Application error type and its HTTP mapping.
//!
//! Every layer returns [`AppError`]. Repositories surface storage failures
//! (unique violations become [`AppError::Conflict`] carrying the constraint
//! name), services translate them into specific domain errors, and the
//! [`IntoResponse`] impl turns them into a JSON body of the form
//! `{"error": {"code", "message", "details"}}`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};

/// Stable, machine-readable error codes returned to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    InvalidUrl,
    SelfReferential,
    AllocationExhausted,
    ConstraintViolation,
    PathTaken,
    PathInvalid,
    PrefixTaken,
    PrefixReserved,
    PrefixInvalid,
    DomainLimitExceeded,
    ValidationError,
    Unauthorized,
    Forbidden,
    NotFound,
    InternalError,
}

impl ErrorCode {
    /// Returns the snake_case representation used in response bodies.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidUrl => "invalid_url",
            Self::SelfReferential => "self_referential",
            Self::AllocationExhausted => "allocation_exhausted",
            Self::ConstraintViolation => "constraint_violation",
            Self::PathTaken => "path_taken",
            Self::PathInvalid => "path_invalid",
            Self::PrefixTaken => "prefix_taken",
            Self::PrefixReserved => "prefix_reserved",
            Self::PrefixInvalid => "prefix_invalid",
            Self::DomainLimitExceeded => "domain_limit_exceeded",
            Self::ValidationError => "validation_error",
            Self::Unauthorized => "unauthorized",
            Self::Forbidden => "forbidden",
            Self::NotFound => "not_found",
            Self::InternalError => "internal_error",
        }
    }
}

/// Serialized error payload.
#[derive(Debug, Serialize)]
pub struct ErrorInfo {
    pub code: ErrorCode,
    pub message: String,
    pub details: Value,
}

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorInfo,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// User-correctable input or uniqueness failure (400).
    #[error("{message}")]
    Validation {
        code: ErrorCode,
        message: String,
        details: Value,
    },

    #[error("{message}")]
    Unauthorized { message: String, details: Value },

    /// Authenticated, but not the owner of the resource (403).
    #[error("{message}")]
    Forbidden { message: String, details: Value },

    #[error("{message}")]
    NotFound { message: String, details: Value },

    /// Raw storage-level unique violation. Services translate these into
    /// specific validation errors; any that escape map to 400
    /// `constraint_violation` without exposing the constraint name.
    #[error("{message}")]
    Conflict {
        constraint: Option<String>,
        message: String,
    },

    /// Storage-level foreign key violation (the referenced row vanished).
    #[error("{message}")]
    StaleReference {
        constraint: Option<String>,
        message: String,
    },

    #[error("{message}")]
    Internal {
        code: ErrorCode,
        message: String,
        details: Value,
    },
}

impl AppError {
    pub fn validation(code: ErrorCode, message: impl Into<String>, details: Value) -> Self {
        Self::Validation {
            code,
            message: message.into(),
            details,
        }
    }

    pub fn bad_request(message: impl Into<String>, details: Value) -> Self {
        Self::validation(ErrorCode::ValidationError, message, details)
    }

    pub fn unauthorized(message: impl Into<String>, details: Value) -> Self {
        Self::Unauthorized {
            message: message.into(),
            details,
        }
    }

    pub fn forbidden(message: impl Into<String>, details: Value) -> Self {
        Self::Forbidden {
            message: message.into(),
            details,
        }
    }

    pub fn not_found(message: impl Into<String>, details: Value) -> Self {
        Self::NotFound {
            message: message.into(),
            details,
        }
    }

    pub fn conflict(constraint: Option<&str>, message: impl Into<String>) -> Self {
        Self::Conflict {
            constraint: constraint.map(str::to_string),
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>, details: Value) -> Self {
        Self::Internal {
            code: ErrorCode::InternalError,
            message: message.into(),
            details,
        }
    }

    /// Short-code allocation gave up after its bounded retries.
    pub fn allocation_exhausted() -> Self {
        Self::Internal {
            code: ErrorCode::AllocationExhausted,
            message: "Failed to generate a short code, please retry".to_string(),
            details: json!({}),
        }
    }

    /// Returns the client-facing error code.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Validation { code, .. } | Self::Internal { code, .. } => *code,
            Self::Unauthorized { .. } => ErrorCode::Unauthorized,
            Self::Forbidden { .. } => ErrorCode::Forbidden,
            Self::NotFound { .. } => ErrorCode::NotFound,
            Self::Conflict { .. } => ErrorCode::ConstraintViolation,
            Self::StaleReference { .. } => ErrorCode::InternalError,
        }
    }

    /// True if this is a unique violation on the named constraint.
    pub fn is_conflict_on(&self, name: &str) -> bool {
        matches!(self, Self::Conflict { constraint: Some(c), .. } if c == name)
    }

    /// True if this is a foreign key violation on the named constraint.
    pub fn is_stale_reference_on(&self, name: &str) -> bool {
        matches!(self, Self::StaleReference { constraint: Some(c), .. } if c == name)
    }

    fn status(&self) -> StatusCode {
        match self {
            Self::Validation { .. } | Self::Conflict { .. } => StatusCode::BAD_REQUEST,
            Self::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            Self::Forbidden { .. } => StatusCode::FORBIDDEN,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::StaleReference { .. } | Self::Internal { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Converts the error into its serializable payload.
    pub fn to_error_info(&self) -> ErrorInfo {
        let (message, details) = match self {
            Self::Validation {
                message, details, ..
            }
            | Self::Unauthorized { message, details }
            | Self::Forbidden { message, details }
            | Self::NotFound { message, details }
            | Self::Internal {
                message, details, ..
            } => (message.clone(), details.clone()),
            Self::Conflict { .. } => ("Value already in use".to_string(), json!({})),
            Self::StaleReference { .. } => (
                "Server error, please retry later".to_string(),
                json!({}),
            ),
        };

        ErrorInfo {
            code: self.code(),
            message,
            details,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            tracing::warn!(code = self.code().as_str(), error = %self, "Request failed");
        }

        let mut response = (
            status,
            Json(ErrorBody {
                error: self.to_error_info(),
            }),
        )
            .into_response();

        if status == StatusCode::UNAUTHORIZED {
            response.headers_mut().insert(
                axum::http::header::WWW_AUTHENTICATE,
                axum::http::HeaderValue::from_static("Bearer"),
            );
        }

        response
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        if let Some(db) = e.as_database_error() {
            if db.is_unique_violation() {
                return Self::conflict(db.constraint(), "Unique constraint violation");
            }
            if db.is_foreign_key_violation() {
                return Self::StaleReference {
                    constraint: db.constraint().map(str::to_string),
                    message: "Foreign key violation".to_string(),
                };
            }
        }

        tracing::error!(error = %e, "Database error");
        Self::internal("Server error, please retry later", json!({}))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let details = serde_json::to_value(errors.field_errors()).unwrap_or_else(|_| json!({}));
        Self::bad_request("Request validation failed", details)
    }
}
