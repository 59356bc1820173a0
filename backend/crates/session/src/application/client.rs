//! Auth Client
//!
//! Client-side wrapper around the provider: performs the credential calls,
//! persists the resulting session and publishes auth-state events.

use std::sync::Arc;
use tokio::sync::watch;

use crate::application::store::{AuthState, AuthStateEvent, SessionStore};
use crate::domain::gateway::AuthGateway;
use crate::domain::session::Session;
use crate::domain::storage::SessionStorage;
use crate::error::SessionResult;

pub struct AuthClient<G>
where
    G: AuthGateway,
{
    gateway: G,
    storage: Arc<dyn SessionStorage>,
    store: SessionStore,
}

impl<G> AuthClient<G>
where
    G: AuthGateway,
{
    pub fn new(gateway: G, storage: Arc<dyn SessionStorage>) -> Self {
        Self {
            gateway,
            storage,
            store: SessionStore::default(),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.store.subscribe()
    }

    /// Load the persisted session at start-up
    ///
    /// Expired or unreadable sessions are discarded and removed from
    /// storage. Publishes `InitialSession` either way.
    pub fn restore(&self) -> Option<Session> {
        let restored = match self.storage.load() {
            Ok(Some(session)) if session.is_expired() => {
                tracing::info!("Discarding expired persisted session");
                self.clear_storage();
                None
            }
            Ok(session) => session,
            Err(e) => {
                tracing::warn!(error = %e, "Discarding unreadable persisted session");
                self.clear_storage();
                None
            }
        };

        self.store
            .publish(AuthStateEvent::InitialSession, restored.clone());
        restored
    }

    /// Current session, dropping it if it has expired
    pub fn get_session(&self) -> Option<Session> {
        let session = self.store.current()?;
        if session.is_expired() {
            tracing::info!(user_id = %session.user.id, "Session expired");
            self.clear_storage();
            self.store.publish(AuthStateEvent::SignedOut, None);
            return None;
        }
        Some(session)
    }

    pub async fn sign_in_with_password(&self, email: &str, password: &str) -> SessionResult<Session> {
        let session = match self.gateway.sign_in_with_password(email, password).await {
            Ok(session) => session,
            Err(e) => {
                e.log();
                return Err(e);
            }
        };

        if let Err(e) = self.storage.save(&session) {
            tracing::warn!(error = %e, "Failed to persist session");
        }

        tracing::info!(user_id = %session.user.id, "User signed in");
        self.store
            .publish(AuthStateEvent::SignedIn, Some(session.clone()));
        Ok(session)
    }

    /// Revoke the session at the provider and clear it locally
    ///
    /// The local session is cleared even when the provider call fails; the
    /// provider error is still returned.
    pub async fn sign_out(&self) -> SessionResult<()> {
        let result = match self.store.current() {
            Some(session) => self.gateway.sign_out(&session.access_token).await,
            None => Ok(()),
        };

        if let Err(e) = &result {
            e.log();
        }

        self.clear_storage();
        self.store.publish(AuthStateEvent::SignedOut, None);
        tracing::info!("User signed out");
        result
    }

    fn clear_storage(&self) {
        if let Err(e) = self.storage.clear() {
            tracing::warn!(error = %e, "Failed to clear persisted session");
        }
    }
}
