//! Relay Error Types
//!
//! This module provides relay-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// Relay-specific result type alias
pub type RelayResult<T> = Result<T, RelayError>;

/// Relay-specific error variants
///
/// The `Display` text is for logs. Clients only ever see
/// [`RelayError::public_message`].
#[derive(Debug, Error)]
pub enum RelayError {
    /// `Authorization` header absent or not `Bearer <token>`
    #[error("Missing bearer token")]
    MissingBearerToken,

    /// Provider rejected the token, returned no user, or was unreachable
    #[error("Invalid token: {reason}")]
    InvalidToken { reason: String },

    /// Anything else; detail is logged, never serialized
    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl RelayError {
    pub fn invalid_token(reason: impl Into<String>) -> Self {
        RelayError::InvalidToken {
            reason: reason.into(),
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            RelayError::MissingBearerToken | RelayError::InvalidToken { .. } => {
                StatusCode::UNAUTHORIZED
            }
            RelayError::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            RelayError::MissingBearerToken | RelayError::InvalidToken { .. } => {
                ErrorKind::Unauthorized
            }
            RelayError::Unexpected(_) => ErrorKind::InternalServerError,
        }
    }

    /// Message returned in the `{ "error": ... }` body
    pub fn public_message(&self) -> &'static str {
        match self {
            RelayError::MissingBearerToken => "Missing bearer token",
            RelayError::InvalidToken { .. } => "Invalid token",
            RelayError::Unexpected(_) => "Unexpected error",
        }
    }

    /// Convert to AppError
    pub fn to_app_error(&self) -> AppError {
        AppError::new(self.kind(), self.public_message())
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            RelayError::Unexpected(detail) => {
                tracing::error!(detail = %detail, "Relay unexpected error");
            }
            RelayError::InvalidToken { reason } => {
                tracing::info!(reason = %reason, "Token verification failed");
            }
            RelayError::MissingBearerToken => {
                tracing::debug!("Request without bearer token");
            }
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

impl From<RelayError> for AppError {
    fn from(err: RelayError) -> Self {
        err.to_app_error()
    }
}
