//! Session (client-side) Module
//!
//! Clean Architecture structure:
//! - `domain/` - Session entity, gateway, storage and notifier traits
//! - `application/` - Auth client, session store, controller
//! - `infra/` - Provider gateway, session storage, relay client
//!
//! ## Flow
//! - Sign-in and sign-out go straight to the hosted provider
//! - Every auth-state change is published through a `watch` channel; the
//!   controller updates its view only from those events
//! - Profile calls go to the relay with the current access token
//!
//! ## Security Model
//! - Tokens are redacted from `Debug` output and never logged
//! - Expired sessions are dropped on restore and on read

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;

// Re-exports for convenience
pub use application::client::AuthClient;
pub use application::controller::{ControllerView, SessionController, Subscription};
pub use application::store::{AuthState, AuthStateEvent, SessionStore};
pub use domain::gateway::AuthGateway;
pub use domain::notifier::Notifier;
pub use domain::session::{Session, SessionUser};
pub use domain::storage::SessionStorage;
pub use error::{SessionError, SessionResult};
pub use infra::relay::RelayClient;
pub use infra::storage::{JsonFileStorage, MemoryStorage};
