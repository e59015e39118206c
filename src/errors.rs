//! Centralized error handling.
//!
//! Provides a unified error type for every operation in the crate,
//! with automatic HTTP response conversion for axum hosts.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Error taxonomy shared by all auth-kit operations.
///
/// Every failure is returned to the caller as one of these kinds; the
/// crate never logs-and-suppresses and never retries on its own.
#[derive(Error, Debug)]
pub enum AuthError {
    // Authentication & Authorization
    #[error("Authentication required")]
    Unauthorized,

    #[error("Access denied")]
    Forbidden,

    #[error("Invalid or expired token")]
    InvalidToken,

    // Resource errors
    #[error("Resource not found")]
    NotFound,

    #[error("{0}")]
    Conflict(String),

    // Business rules & validation
    #[error("{0}")]
    BusinessRule(String),

    #[error("{0}")]
    Validation(String),

    // External collaborators
    #[error("Service unavailable")]
    Unavailable(String),

    // Internal
    #[error("Internal server error")]
    Internal(String),
}

/// Error response body
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    code: String,
    message: String,
}

impl AuthError {
    /// Get error code for client
    fn code(&self) -> &'static str {
        match self {
            AuthError::Unauthorized => "UNAUTHORIZED",
            AuthError::Forbidden => "FORBIDDEN",
            AuthError::InvalidToken => "INVALID_TOKEN",
            AuthError::NotFound => "NOT_FOUND",
            AuthError::Conflict(_) => "CONFLICT",
            AuthError::BusinessRule(_) => "BUSINESS_RULE",
            AuthError::Validation(_) => "VALIDATION_ERROR",
            AuthError::Unavailable(_) => "UNAVAILABLE",
            AuthError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Get HTTP status code
    fn status(&self) -> StatusCode {
        match self {
            AuthError::Unauthorized | AuthError::InvalidToken => StatusCode::UNAUTHORIZED,
            AuthError::Forbidden => StatusCode::FORBIDDEN,
            AuthError::NotFound => StatusCode::NOT_FOUND,
            AuthError::Conflict(_) => StatusCode::CONFLICT,
            AuthError::BusinessRule(_) | AuthError::Validation(_) => StatusCode::BAD_REQUEST,
            AuthError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get user-facing message (hides internal details)
    fn user_message(&self) -> String {
        match self {
            // Show full message for client errors
            AuthError::BusinessRule(msg) => msg.clone(),
            AuthError::Validation(msg) => msg.clone(),
            AuthError::Conflict(msg) => msg.clone(),

            // Hide details for internal/security errors
            AuthError::Unavailable(detail) => {
                tracing::error!("Downstream store failure: {}", detail);
                "The service is temporarily unavailable".to_string()
            }
            AuthError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                "An internal error occurred".to_string()
            }

            // Use default message for others
            _ => self.to_string(),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.code().to_string(),
                message: self.user_message(),
            },
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias
pub type AuthResult<T> = Result<T, AuthError>;

/// Extension trait for Option -> AuthError conversion
pub trait OptionExt<T> {
    fn ok_or_not_found(self) -> AuthResult<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_not_found(self) -> AuthResult<T> {
        self.ok_or(AuthError::NotFound)
    }
}

/// Convenience constructors
impl AuthError {
    pub fn conflict(msg: impl Into<String>) -> Self {
        AuthError::Conflict(msg.into())
    }

    pub fn business_rule(msg: impl Into<String>) -> Self {
        AuthError::BusinessRule(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        AuthError::Validation(msg.into())
    }

    pub fn unavailable(detail: impl Into<String>) -> Self {
        AuthError::Unavailable(detail.into())
    }

    pub fn internal(detail: impl Into<String>) -> Self {
        AuthError::Internal(detail.into())
    }
}
