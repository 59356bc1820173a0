//! Presentation Layer
//!
//! HTTP handlers, DTOs, edge middleware and router.

pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod router;

pub use handlers::RelayAppState;
pub use router::relay_router;
