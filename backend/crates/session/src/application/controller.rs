//! Session Controller
//!
//! View state for the front end: who is signed in and the last relay
//! result. The signed-in user is only ever taken from auth-state events,
//! never from a sign-in return value.

use parking_lot::Mutex;
use std::sync::Arc;
use tokio::task::JoinHandle;

use crate::application::client::AuthClient;
use crate::domain::gateway::AuthGateway;
use crate::domain::notifier::Notifier;
use crate::infra::relay::RelayClient;

/// What the front end renders
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ControllerView {
    pub user_email: Option<String>,
    /// Raw text of the last relay response (or the transport error)
    pub api_result: String,
}

/// Live auth-state listener; dropping it unsubscribes
#[must_use = "dropping the subscription stops auth-state updates"]
#[derive(Debug)]
pub struct Subscription {
    handle: JoinHandle<()>,
}

impl Subscription {
    pub fn unsubscribe(self) {
        drop(self);
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.handle.abort();
        tracing::debug!("Auth-state subscription closed");
    }
}

pub struct SessionController<G>
where
    G: AuthGateway,
{
    client: Arc<AuthClient<G>>,
    relay: RelayClient,
    notifier: Arc<dyn Notifier>,
    view: Arc<Mutex<ControllerView>>,
}

impl<G> SessionController<G>
where
    G: AuthGateway + Send + Sync + 'static,
{
    pub fn new(client: Arc<AuthClient<G>>, relay: RelayClient, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            client,
            relay,
            notifier,
            view: Arc::new(Mutex::new(ControllerView::default())),
        }
    }

    pub fn view(&self) -> ControllerView {
        self.view.lock().clone()
    }

    /// Start following auth-state changes
    ///
    /// `on_change` runs once for the current state and again after every
    /// change, until the returned [`Subscription`] is dropped.
    pub fn activate<F>(&self, on_change: F) -> Subscription
    where
        F: Fn(&ControllerView) + Send + Sync + 'static,
    {
        let mut rx = self.client.subscribe();
        let view = Arc::clone(&self.view);

        let handle = tokio::spawn(async move {
            loop {
                let email = rx.borrow_and_update().email().map(str::to_owned);
                let snapshot = {
                    let mut view = view.lock();
                    view.user_email = email;
                    view.clone()
                };
                on_change(&snapshot);

                if rx.changed().await.is_err() {
                    break;
                }
            }
        });

        Subscription { handle }
    }

    /// Sign in; failures are shown through the notifier
    pub async fn sign_in(&self, email: &str, password: &str) {
        if let Err(e) = self.client.sign_in_with_password(email, password).await {
            self.notifier.alert(&e.to_string());
        }
    }

    pub async fn sign_out(&self) {
        if let Err(e) = self.client.sign_out().await {
            self.notifier.alert(&e.to_string());
        }
    }

    /// Call the relay with the current token and keep the raw result
    pub async fn call_profile(&self) -> String {
        let token = self.client.get_session().map(|s| s.access_token);

        let text = match self.relay.profile(token.as_deref()).await {
            Ok(text) => text,
            Err(e) => {
                e.log();
                e.to_string()
            }
        };

        self.view.lock().api_result = text.clone();
        text
    }
}
