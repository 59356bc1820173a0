//! Infrastructure Layer
//!
//! External service implementations.

pub mod provider;

pub use provider::ProviderTokenVerifier;
