//! Application Layer
//!
//! Use cases and application configuration.

pub mod config;
pub mod get_profile;

// Re-exports
pub use config::RelayConfig;
pub use get_profile::GetProfileUseCase;
