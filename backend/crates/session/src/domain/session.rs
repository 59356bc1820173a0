//! Session Entity
//!
//! Client-held session issued by the hosted provider. The server never sees
//! this struct; it only receives the access token as a bearer credential.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity attached to a session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// Signed-in session
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user: SessionUser,
    /// Opaque provider access token
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Session expiration (Unix timestamp ms)
    pub expires_at_ms: i64,
}

impl Session {
    pub fn new(
        user: SessionUser,
        access_token: impl Into<String>,
        refresh_token: Option<String>,
        expires_at_ms: i64,
    ) -> Self {
        Self {
            user,
            access_token: access_token.into(),
            refresh_token,
            expires_at_ms,
        }
    }

    pub fn email(&self) -> Option<&str> {
        self.user.email.as_deref()
    }

    /// Check if session has expired
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now().timestamp_millis())
    }

    pub fn is_expired_at(&self, now_ms: i64) -> bool {
        now_ms >= self.expires_at_ms
    }

    /// Get remaining time until expiration
    pub fn remaining_ms(&self) -> i64 {
        (self.expires_at_ms - Utc::now().timestamp_millis()).max(0)
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("user", &self.user)
            .field("access_token", &"[REDACTED]")
            .field(
                "refresh_token",
                &self.refresh_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("expires_at_ms", &self.expires_at_ms)
            .finish()
    }
}
