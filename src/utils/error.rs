//! Error handling module
//!
//! Defines the closed set of request errors, their wire codes and HTTP statuses

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::iso_timestamp;

/// Application error types
///
/// Every failure on the request path ends up as exactly one of these.
#[derive(Error, Debug)]
pub enum AppError {
    /// Missing, malformed or mismatched app token
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Request body failed validation; carries every violation
    #[error("Request validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),

    /// HTTP method other than POST/OPTIONS
    #[error("Method {0} not allowed")]
    MethodNotAllowed(String),

    /// Upstream provider answered with an error or unusable payload
    #[error("{0}")]
    ProviderUpstream(String),

    /// Upstream provider did not answer within the configured timeout
    #[error("Request timeout: AI provider did not respond within {0} seconds")]
    ProviderTimeout(u64),

    /// Upstream answered but produced no caption text
    #[error("No caption generated by AI provider")]
    NoCaption,

    /// Anything not classified above
    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// Stable error codes exposed to clients
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    #[serde(rename = "AUTH_001")]
    Auth001,
    #[serde(rename = "VAL_001")]
    Val001,
    #[serde(rename = "AI_001")]
    Ai001,
    #[serde(rename = "METHOD_001")]
    Method001,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::Auth001 => "AUTH_001",
            ErrorCode::Val001 => "VAL_001",
            ErrorCode::Ai001 => "AI_001",
            ErrorCode::Method001 => "METHOD_001",
        }
    }
}

/// Error envelope returned to clients
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Always false
    pub success: bool,
    pub error: ErrorBody,
}

/// Error payload
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Stable error code
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// ISO-8601 timestamp
    pub timestamp: String,
    /// Details (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl AppError {
    /// Get HTTP status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Authentication(_) => StatusCode::UNAUTHORIZED,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            AppError::ProviderUpstream(_)
            | AppError::ProviderTimeout(_)
            | AppError::NoCaption
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the wire error code
    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::Authentication(_) => ErrorCode::Auth001,
            AppError::Validation(_) => ErrorCode::Val001,
            AppError::MethodNotAllowed(_) => ErrorCode::Method001,
            AppError::ProviderUpstream(_)
            | AppError::ProviderTimeout(_)
            | AppError::NoCaption
            | AppError::Internal(_) => ErrorCode::Ai001,
        }
    }

    /// Message shown to the client
    ///
    /// Authentication reasons and internal failures stay server-side.
    pub fn client_message(&self) -> String {
        match self {
            AppError::Authentication(_) => "Invalid or missing authentication token".to_string(),
            AppError::Validation(_) => "Request validation failed".to_string(),
            AppError::Internal(_) => "AI provider error".to_string(),
            other => other.to_string(),
        }
    }

    /// Structured details for the client, if any
    pub fn details(&self) -> Option<serde_json::Value> {
        match self {
            AppError::Validation(errors) => Some(serde_json::json!(errors)),
            _ => None,
        }
    }

    /// Convert to the client error envelope
    pub fn to_error_response(&self) -> ErrorResponse {
        ErrorResponse {
            success: false,
            error: ErrorBody {
                code: self.code(),
                message: self.client_message(),
                timestamp: iso_timestamp(),
                details: self.details(),
            },
        }
    }
}

/// Implement IntoResponse trait to allow errors to be returned directly as HTTP responses
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.code().as_str();
        let details = self.details();

        if status.is_server_error() {
            tracing::error!(
                code,
                status = status.as_u16(),
                details = ?details,
                error = ?self,
                "Request failed: {}",
                self
            );
        } else {
            tracing::warn!(
                code,
                status = status.as_u16(),
                details = ?details,
                "Request rejected: {}",
                self
            );
        }

        (status, Json(self.to_error_response())).into_response()
    }
}

/// Result type alias
pub type AppResult<T> = Result<T, AppError>;

/// Error context extension trait
pub trait ErrorContext<T> {
    /// Classify as an unexpected internal failure
    fn internal_context(self, message: &str) -> AppResult<T>;
}

impl<T, E> ErrorContext<T> for Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn internal_context(self, message: &str) -> AppResult<T> {
        self.map_err(|e| AppError::Internal(anyhow::Error::new(e).context(message.to_string())))
    }
}
