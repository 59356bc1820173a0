//! Relay (API server) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Bearer token, user projection, verifier trait
//! - `application/` - Profile use case and server configuration
//! - `infra/` - Hosted auth provider implementation of the verifier
//! - `presentation/` - HTTP handlers, DTOs, edge middleware, router
//!
//! ## Routes
//! - `GET /api/health` - liveness probe, no provider dependency
//! - `GET /api/profile` - verifies the bearer token with the provider and
//!   returns `{ user: { id, email } }`
//!
//! ## Security Model
//! - Tokens are never stored, cached or logged; every request is verified
//!   by the provider
//! - Every verification failure collapses into one generic 401
//! - Internal failures answer a generic 500 and are logged server-side only

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::config::{HealthRateLimit, RelayConfig};
pub use error::{RelayError, RelayResult};
pub use infra::provider::ProviderTokenVerifier;
pub use presentation::router::relay_router;

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult, ErrorBody},
    kind::ErrorKind,
};

pub mod models {
    pub use crate::domain::bearer_token::BearerToken;
    pub use crate::domain::user_projection::UserProjection;
    pub use crate::presentation::dto::*;
}

pub mod middleware {
    pub use crate::presentation::middleware::*;
}
