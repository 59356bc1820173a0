//! Relay Router
//!
//! Routes plus the edge middleware stack. Layers are listed innermost
//! first; the resulting request order is:
//! trace -> security headers -> panic guard -> origin guard ->
//! preflight status -> CORS -> body limit -> rate limit -> handler.

use axum::http::{HeaderValue, Method, header};
use axum::middleware::{from_fn, from_fn_with_state};
use axum::response::{IntoResponse, Response};
use axum::{Router, routing::get};
use kernel::error::app_error::AppError;
use platform::rate_limit::{InMemoryRateLimitStore, RateLimitStore};
use std::any::Any;
use std::sync::Arc;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::application::config::RelayConfig;
use crate::domain::verifier::TokenVerifier;
use crate::infra::provider::ProviderTokenVerifier;
use crate::presentation::handlers::{self, RelayAppState};
use crate::presentation::middleware::{
    HEALTH_PATH, limit_body, origin_guard, preflight_no_content, rate_limit, security_headers,
};

pub const PROFILE_PATH: &str = "/api/profile";

/// Create the relay router backed by the hosted provider and in-memory counters
pub fn relay_router(
    verifier: ProviderTokenVerifier,
    limiter: Arc<InMemoryRateLimitStore>,
    config: RelayConfig,
) -> Router {
    relay_router_generic(Arc::new(verifier), limiter, config)
}

/// Create a relay router for any verifier and counter store
pub fn relay_router_generic<V, S>(verifier: Arc<V>, limiter: Arc<S>, config: RelayConfig) -> Router
where
    V: TokenVerifier + Send + Sync + 'static,
    S: RateLimitStore + Send + Sync + 'static,
{
    let cors = cors_layer(&config);

    let state = RelayAppState {
        verifier,
        limiter,
        config: Arc::new(config),
    };

    Router::new()
        .route(HEALTH_PATH, get(handlers::health::<V, S>))
        .route(
            PROFILE_PATH,
            get(handlers::profile::<V, S>).layer(CatchPanicLayer::custom(unexpected_panic)),
        )
        .fallback(handlers::not_found)
        .layer(from_fn_with_state(state.clone(), rate_limit::<V, S>))
        .layer(from_fn_with_state(state.clone(), limit_body::<V, S>))
        .layer(cors)
        .layer(from_fn(preflight_no_content))
        .layer(from_fn_with_state(state.clone(), origin_guard::<V, S>))
        .layer(CatchPanicLayer::custom(internal_panic))
        .layer(from_fn(security_headers))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// CORS headers for allowed origins; credentials are never allowed
pub fn cors_layer(config: &RelayConfig) -> CorsLayer {
    let allowed_origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed_origins))
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
        ]))
        .allow_credentials(false)
}

fn panic_detail(err: &(dyn Any + Send)) -> &str {
    if let Some(s) = err.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        *s
    } else {
        "non-string panic payload"
    }
}

/// Panic inside the profile handler
fn unexpected_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    tracing::error!(detail = %panic_detail(err.as_ref()), "Profile handler panicked");
    AppError::internal("Unexpected error").into_response()
}

/// Panic anywhere else in the stack
fn internal_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    tracing::error!(detail = %panic_detail(err.as_ref()), "Unhandled panic");
    AppError::internal("Internal Server Error").into_response()
}
