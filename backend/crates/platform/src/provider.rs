//! Hosted Auth Provider Client
//!
//! Thin wrapper over the provider's GoTrue-compatible REST API. The
//! provider owns password checking, token issuance and session storage;
//! this client only relays credentials and tokens to it.
//!
//! ## Endpoints
//! - `POST auth/v1/token?grant_type=password` - credential exchange
//! - `GET  auth/v1/user` - resolve the user behind an access token
//! - `POST auth/v1/logout` - revoke the session behind an access token

use reqwest::StatusCode;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use crate::config::ProviderConfig;

const USER_PATH: &str = "auth/v1/user";
const TOKEN_PATH: &str = "auth/v1/token";
const LOGOUT_PATH: &str = "auth/v1/logout";

/// Provider error
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// Network failure or unreadable response
    #[error("Auth provider request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The provider answered with a non-success status
    #[error("{message}")]
    Rejected { status: u16, message: String },

    /// The provider accepted the token but returned no user
    #[error("Auth provider returned no user")]
    MissingUser,

    /// The request could not be built (bad base URL, unusable header value)
    #[error("Auth provider client misconfigured: {0}")]
    InvalidConfiguration(String),
}

impl ProviderError {
    /// HTTP status reported by the provider, if it answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            ProviderError::Rejected { status, .. } => Some(*status),
            ProviderError::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// The part of the provider's user object this workspace reads
///
/// Every other claim in the provider response is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderUser {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// Result of a successful credential exchange
#[derive(Clone, Deserialize)]
pub struct TokenGrant {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    /// Lifetime in seconds
    pub expires_in: i64,
    /// Absolute expiry (unix seconds), when the provider sends it
    #[serde(default)]
    pub expires_at: Option<i64>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    pub user: ProviderUser,
}

impl fmt::Debug for TokenGrant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenGrant")
            .field("access_token", &"[REDACTED]")
            .field("expires_in", &self.expires_in)
            .field("expires_at", &self.expires_at)
            .field("user", &self.user)
            .finish()
    }
}

/// Error payloads differ between provider versions; take whichever field is set.
#[derive(Debug, Default, Deserialize)]
struct ProviderErrorBody {
    msg: Option<String>,
    message: Option<String>,
    error_description: Option<String>,
    error: Option<String>,
}

impl ProviderErrorBody {
    fn into_message(self) -> Option<String> {
        self.msg
            .or(self.message)
            .or(self.error_description)
            .or(self.error)
            .filter(|m| !m.trim().is_empty())
    }
}

#[derive(Serialize)]
struct PasswordGrantRequest<'a> {
    email: &'a str,
    password: &'a str,
}

/// Handle to the hosted auth provider
///
/// Cheap to clone; the underlying `reqwest::Client` pools connections.
#[derive(Clone)]
pub struct AuthProviderClient {
    http: reqwest::Client,
    config: Arc<ProviderConfig>,
}

impl fmt::Debug for AuthProviderClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthProviderClient")
            .field("config", &self.config)
            .finish()
    }
}

impl AuthProviderClient {
    /// Build a client that sends `apikey` on every request
    pub fn new(config: ProviderConfig) -> Result<Self, ProviderError> {
        let mut default_headers = HeaderMap::new();
        let key = HeaderValue::from_str(&config.public_key)
            .map_err(|e| ProviderError::InvalidConfiguration(format!("public key: {e}")))?;
        default_headers.insert("apikey", key);

        let http = reqwest::Client::builder()
            .default_headers(default_headers)
            .build()?;

        Ok(Self {
            http,
            config: Arc::new(config),
        })
    }

    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    fn endpoint(&self, path: &str) -> Result<url::Url, ProviderError> {
        self.config
            .endpoint(path)
            .map_err(|e| ProviderError::InvalidConfiguration(format!("{path}: {e}")))
    }

    fn bearer(token: &str) -> Result<HeaderValue, ProviderError> {
        let mut value = HeaderValue::from_str(&format!("Bearer {token}")).map_err(|_| {
            ProviderError::InvalidConfiguration("token is not a valid header value".to_string())
        })?;
        value.set_sensitive(true);
        Ok(value)
    }

    /// Resolve the user behind an access token
    ///
    /// Called on every relay request; nothing is cached.
    pub async fn get_user(&self, access_token: &str) -> Result<ProviderUser, ProviderError> {
        let url = self.endpoint(USER_PATH)?;

        let response = self
            .http
            .get(url)
            .header(AUTHORIZATION, Self::bearer(access_token)?)
            .send()
            .await?;

        let response = ensure_success(response).await?;
        let user: Option<ProviderUser> = response.json().await?;

        user.filter(|u| !u.id.is_empty())
            .ok_or(ProviderError::MissingUser)
    }

    /// Exchange email + password for a session
    pub async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<TokenGrant, ProviderError> {
        let mut url = self.endpoint(TOKEN_PATH)?;
        url.query_pairs_mut().append_pair("grant_type", "password");

        let response = self
            .http
            .post(url)
            .json(&PasswordGrantRequest { email, password })
            .send()
            .await?;

        let response = ensure_success(response).await?;
        Ok(response.json().await?)
    }

    /// Revoke the session behind an access token
    ///
    /// A token the provider no longer knows (401/403/404) counts as already
    /// signed out.
    pub async fn sign_out(&self, access_token: &str) -> Result<(), ProviderError> {
        let url = self.endpoint(LOGOUT_PATH)?;

        let response = self
            .http
            .post(url)
            .header(AUTHORIZATION, Self::bearer(access_token)?)
            .send()
            .await?;

        match response.status() {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN | StatusCode::NOT_FOUND => {
                tracing::debug!(status = %response.status(), "Session already gone at provider");
                Ok(())
            }
            _ => ensure_success(response).await.map(|_| ()),
        }
    }
}

async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, ProviderError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body: ProviderErrorBody = response.json().await.unwrap_or_default();
    let message = body
        .into_message()
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("Request failed").to_string());

    Err(ProviderError::Rejected {
        status: status.as_u16(),
        message,
    })
}
