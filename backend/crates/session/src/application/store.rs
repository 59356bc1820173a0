//! Session Store
//!
//! Single source of truth for the current session. Observers hold a
//! `watch::Receiver` and see the latest [`AuthState`]; intermediate states
//! may be coalesced.

use tokio::sync::watch;

use crate::domain::session::Session;

/// Auth-state change notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthStateEvent {
    /// Start-up state, possibly restored from storage
    InitialSession,
    SignedIn,
    SignedOut,
}

/// Latest event together with the session it left behind
#[derive(Debug, Clone)]
pub struct AuthState {
    pub event: AuthStateEvent,
    pub session: Option<Session>,
}

impl AuthState {
    pub fn email(&self) -> Option<&str> {
        self.session.as_ref().and_then(Session::email)
    }
}

#[derive(Debug)]
pub struct SessionStore {
    tx: watch::Sender<AuthState>,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(None)
    }
}

impl SessionStore {
    pub fn new(initial: Option<Session>) -> Self {
        let (tx, _rx) = watch::channel(AuthState {
            event: AuthStateEvent::InitialSession,
            session: initial,
        });
        Self { tx }
    }

    pub fn current(&self) -> Option<Session> {
        self.tx.borrow().session.clone()
    }

    /// Replace the state and wake every observer
    pub fn publish(&self, event: AuthStateEvent, session: Option<Session>) {
        tracing::debug!(event = ?event, signed_in = session.is_some(), "Auth state changed");
        self.tx.send_replace(AuthState { event, session });
    }

    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.tx.subscribe()
    }
}
