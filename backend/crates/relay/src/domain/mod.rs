//! Domain Layer
//!
//! This layer contains:
//! - Value objects (BearerToken, UserProjection)
//! - The verifier trait the provider integration implements

pub mod bearer_token;
pub mod user_projection;
pub mod verifier;
