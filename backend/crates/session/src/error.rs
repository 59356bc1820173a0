//! Session Error Types
//!
//! Client-side errors. Provider messages are kept verbatim because the
//! controller surfaces them to the user.

use kernel::error::{app_error::AppError, kind::ErrorKind};
use platform::provider::ProviderError;
use thiserror::Error;

/// Session-specific result type alias
pub type SessionResult<T> = Result<T, SessionError>;

#[derive(Debug, Error)]
pub enum SessionError {
    /// The provider refused the request or could not be reached
    #[error("{message}")]
    Provider {
        status: Option<u16>,
        message: String,
    },

    /// Local persistence failed (I/O or corrupt data)
    #[error("Session storage failed: {0}")]
    Storage(String),

    /// The relay could not be reached
    #[error("Relay request failed: {0}")]
    Relay(String),

    /// The relay base URL cannot be used
    #[error("Invalid relay URL: {0}")]
    InvalidRelayUrl(String),
}

impl SessionError {
    pub fn provider(status: Option<u16>, message: impl Into<String>) -> Self {
        SessionError::Provider {
            status,
            message: message.into(),
        }
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            SessionError::Provider {
                status: Some(status),
                ..
            } if (400..500).contains(status) => ErrorKind::Unauthorized,
            SessionError::Provider { .. } | SessionError::Relay(_) => ErrorKind::BadGateway,
            SessionError::Storage(_) | SessionError::InvalidRelayUrl(_) => {
                ErrorKind::InternalServerError
            }
        }
    }

    /// Log the error with appropriate level
    pub fn log(&self) {
        match self.kind() {
            ErrorKind::Unauthorized => tracing::info!(error = %self, "Provider rejected request"),
            kind if kind.is_server_error() => tracing::error!(error = %self, "Session error"),
            _ => tracing::warn!(error = %self, "Session error"),
        }
    }
}

impl From<ProviderError> for SessionError {
    fn from(err: ProviderError) -> Self {
        let status = err.status();
        match err {
            ProviderError::Rejected { message, .. } => SessionError::provider(status, message),
            other => SessionError::provider(status, other.to_string()),
        }
    }
}

impl From<std::io::Error> for SessionError {
    fn from(err: std::io::Error) -> Self {
        SessionError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for SessionError {
    fn from(err: serde_json::Error) -> Self {
        SessionError::Storage(err.to_string())
    }
}

impl From<reqwest::Error> for SessionError {
    fn from(err: reqwest::Error) -> Self {
        SessionError::Relay(err.to_string())
    }
}

impl From<SessionError> for AppError {
    fn from(err: SessionError) -> Self {
        AppError::new(err.kind(), err.to_string()).with_source(err)
    }
}
