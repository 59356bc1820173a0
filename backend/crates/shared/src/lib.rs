//! Shared Kernel - Domain-crossing minimal core
//!
//! This crate contains the "smallest core" of vocabulary shared by the
//! server, the relay and the session client:
//! - Error classification ([`error::kind::ErrorKind`])
//! - The unified error type and result alias ([`error::app_error::AppError`])
//! - The `{ "error": string }` wire shape used by every failure response
//!
//! **Design Principle**: Only include things that are "hard to change"
//! and have consistent meaning across all crates.

pub mod error {
    pub mod app_error;
    pub mod conversions;
    pub mod kind;
}
