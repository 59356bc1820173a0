//! User Projection
//!
//! The only view of a provider user this server ever exposes.

use serde::Serialize;

/// `{ id, email }` - built per request, never persisted
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserProjection {
    pub id: String,
    /// Serialized as `null` when the provider user has no email
    pub email: Option<String>,
}

impl UserProjection {
    pub fn new(id: impl Into<String>, email: Option<String>) -> Self {
        Self {
            id: id.into(),
            email,
        }
    }
}
