//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Hosted auth provider client (credential exchange, sign-out, token verification)
//! - Environment-driven configuration helpers
//! - Client identification from request headers
//! - Rate limiting infrastructure (store trait + in-memory fixed window)

pub mod client;
pub mod config;
pub mod provider;
pub mod rate_limit;
