//! HTTP Handlers

use axum::Json;
use axum::extract::State;
use axum::http::{HeaderMap, header};
use kernel::error::app_error::AppError;
use platform::rate_limit::RateLimitStore;
use std::sync::Arc;

use crate::application::GetProfileUseCase;
use crate::application::config::RelayConfig;
use crate::domain::verifier::TokenVerifier;
use crate::error::RelayResult;
use crate::presentation::dto::{HealthResponse, ProfileResponse};

/// Shared state for relay handlers and middleware
pub struct RelayAppState<V, S>
where
    V: TokenVerifier + Send + Sync + 'static,
    S: RateLimitStore + Send + Sync + 'static,
{
    pub verifier: Arc<V>,
    pub limiter: Arc<S>,
    pub config: Arc<RelayConfig>,
}

impl<V, S> Clone for RelayAppState<V, S>
where
    V: TokenVerifier + Send + Sync + 'static,
    S: RateLimitStore + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            verifier: self.verifier.clone(),
            limiter: self.limiter.clone(),
            config: self.config.clone(),
        }
    }
}

/// GET /api/health
pub async fn health<V, S>(State(state): State<RelayAppState<V, S>>) -> Json<HealthResponse>
where
    V: TokenVerifier + Send + Sync + 'static,
    S: RateLimitStore + Send + Sync + 'static,
{
    Json(HealthResponse {
        ok: true,
        service: state.config.service_name.clone(),
        env: state.config.environment.clone(),
    })
}

/// GET /api/profile
pub async fn profile<V, S>(
    State(state): State<RelayAppState<V, S>>,
    headers: HeaderMap,
) -> RelayResult<Json<ProfileResponse>>
where
    V: TokenVerifier + Send + Sync + 'static,
    S: RateLimitStore + Send + Sync + 'static,
{
    // A header that is not visible ASCII cannot carry a bearer token
    let authorization = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    let use_case = GetProfileUseCase::new(state.verifier.clone());
    let user = use_case.execute(authorization).await?;

    tracing::debug!(user_id = %user.id, "Profile resolved");

    Ok(Json(ProfileResponse { user }))
}

/// Fallback for unmatched routes
pub async fn not_found() -> AppError {
    AppError::not_found("Not Found")
}
