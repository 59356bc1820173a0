//! Hosted Provider Gateway
//!
//! [`AuthGateway`] over the platform provider client.

use chrono::Utc;
use platform::provider::{AuthProviderClient, TokenGrant};

use crate::domain::gateway::AuthGateway;
use crate::domain::session::{Session, SessionUser};
use crate::error::SessionResult;

/// Build a session from a token grant
///
/// The absolute `expires_at` wins when present; otherwise `expires_in` is
/// counted from `now_ms`.
pub fn session_from_grant(grant: TokenGrant, now_ms: i64) -> Session {
    let expires_at_ms = grant
        .expires_at
        .map(|secs| secs.saturating_mul(1000))
        .unwrap_or_else(|| now_ms.saturating_add(grant.expires_in.saturating_mul(1000)));

    Session::new(
        SessionUser {
            id: grant.user.id,
            email: grant.user.email,
        },
        grant.access_token,
        grant.refresh_token,
        expires_at_ms,
    )
}

impl AuthGateway for AuthProviderClient {
    async fn sign_in_with_password(&self, email: &str, password: &str) -> SessionResult<Session> {
        let grant = AuthProviderClient::sign_in_with_password(self, email, password).await?;
        Ok(session_from_grant(grant, Utc::now().timestamp_millis()))
    }

    async fn sign_out(&self, access_token: &str) -> SessionResult<()> {
        AuthProviderClient::sign_out(self, access_token).await?;
        Ok(())
    }
}
