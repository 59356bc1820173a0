//! API DTOs (Data Transfer Objects)

use serde::Serialize;

use crate::domain::user_projection::UserProjection;

/// GET /api/health response
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub ok: bool,
    pub service: String,
    pub env: String,
}

/// GET /api/profile response
#[derive(Debug, Clone, Serialize)]
pub struct ProfileResponse {
    pub user: UserProjection,
}
