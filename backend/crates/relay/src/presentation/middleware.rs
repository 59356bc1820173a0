//! Edge Middleware
//!
//! Cross-cutting request processing applied before routing, outermost first:
//! 1. [`security_headers`] - hardening headers on every response
//! 2. [`origin_guard`] - exact-match browser origin allow-list, then
//!    [`preflight_no_content`] around the CORS layer
//! 3. [`limit_body`] - body size cap and JSON well-formedness
//! 4. [`rate_limit`] - fixed-window limiter on the `/api` prefix
//!
//! Rejections from 2 and 3 happen before 4, so they are never counted.

use axum::body::Body;
use axum::extract::{ConnectInfo, State};
use axum::http::{HeaderMap, HeaderName, HeaderValue, Method, Request, StatusCode, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use kernel::error::app_error::AppError;
use platform::client::client_key;
use platform::rate_limit::{RateLimitConfig, RateLimitResult, RateLimitStore, now_ms};
use std::net::SocketAddr;

use crate::application::config::HealthRateLimit;
use crate::domain::verifier::TokenVerifier;
use crate::presentation::handlers::RelayAppState;

/// Prefix guarded by the rate limiter
pub const API_PREFIX: &str = "/api";
/// Liveness probe path
pub const HEALTH_PATH: &str = "/api/health";

pub const RATE_LIMIT_MESSAGE: &str = "Too many requests, please try again later.";

// ============================================================================
// Security headers
// ============================================================================

/// Hardening headers set on every response
///
/// `Cross-Origin-Resource-Policy` is not set; responses are read cross-origin.
pub const SECURITY_HEADERS: &[(&str, &str)] = &[
    (
        "content-security-policy",
        "default-src 'self';base-uri 'self';font-src 'self' https: data:;\
         form-action 'self';frame-ancestors 'self';img-src 'self' data:;\
         object-src 'none';script-src 'self';script-src-attr 'none';\
         style-src 'self' https: 'unsafe-inline';upgrade-insecure-requests",
    ),
    ("cross-origin-opener-policy", "same-origin"),
    ("origin-agent-cluster", "?1"),
    ("referrer-policy", "no-referrer"),
    (
        "strict-transport-security",
        "max-age=31536000; includeSubDomains",
    ),
    ("x-content-type-options", "nosniff"),
    ("x-dns-prefetch-control", "off"),
    ("x-download-options", "noopen"),
    ("x-frame-options", "SAMEORIGIN"),
    ("x-permitted-cross-domain-policies", "none"),
    ("x-xss-protection", "0"),
];

pub async fn security_headers(req: Request<Body>, next: Next) -> Response {
    let mut response = next.run(req).await;
    let headers = response.headers_mut();

    for &(name, value) in SECURITY_HEADERS {
        headers.insert(
            HeaderName::from_static(name),
            HeaderValue::from_static(value),
        );
    }
    headers.remove("x-powered-by");

    response
}

// ============================================================================
// Origin allow-list
// ============================================================================

/// Reject browser requests from origins outside the allow-list
///
/// Requests without an `Origin` header (curl, server-to-server) pass.
pub async fn origin_guard<V, S>(
    State(state): State<RelayAppState<V, S>>,
    req: Request<Body>,
    next: Next,
) -> Response
where
    V: TokenVerifier + Send + Sync + 'static,
    S: RateLimitStore + Send + Sync + 'static,
{
    if let Some(origin) = req.headers().get(header::ORIGIN) {
        let allowed = origin
            .to_str()
            .map(|o| state.config.is_origin_allowed(o))
            .unwrap_or(false);

        if !allowed {
            tracing::warn!(origin = ?origin, path = %req.uri().path(), "Origin not allowed");
            return AppError::forbidden("Origin not allowed").into_response();
        }
    }

    next.run(req).await
}

/// Answer successful CORS preflights with 204 No Content
///
/// Wraps the CORS layer, which answers preflights itself with 200.
pub async fn preflight_no_content(req: Request<Body>, next: Next) -> Response {
    let is_preflight = req.method() == Method::OPTIONS
        && req
            .headers()
            .contains_key(header::ACCESS_CONTROL_REQUEST_METHOD);

    let response = next.run(req).await;
    if !is_preflight || response.status() != StatusCode::OK {
        return response;
    }

    let (mut parts, _body) = response.into_parts();
    parts.status = StatusCode::NO_CONTENT;
    parts.headers.remove(header::CONTENT_LENGTH);
    Response::from_parts(parts, Body::empty())
}

// ============================================================================
// Body limit
// ============================================================================

/// Buffer the request body up to the configured cap
///
/// Oversized bodies get 413, malformed JSON bodies get 400; neither reaches
/// the limiter or a handler.
pub async fn limit_body<V, S>(
    State(state): State<RelayAppState<V, S>>,
    req: Request<Body>,
    next: Next,
) -> Response
where
    V: TokenVerifier + Send + Sync + 'static,
    S: RateLimitStore + Send + Sync + 'static,
{
    let limit = state.config.body_limit_bytes;

    let declared_len = req
        .headers()
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok());

    if declared_len.is_some_and(|len| len > limit as u64) {
        tracing::warn!(declared_len = ?declared_len, limit = limit, "Request body too large");
        return AppError::payload_too_large("Payload too large").into_response();
    }

    let (parts, body) = req.into_parts();

    let bytes = match axum::body::to_bytes(body, limit).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!(error = %e, limit = limit, "Request body rejected while buffering");
            return AppError::payload_too_large("Payload too large").into_response();
        }
    };

    if !bytes.is_empty() && is_json(&parts.headers) {
        if let Err(e) = serde_json::from_slice::<serde::de::IgnoredAny>(&bytes) {
            return AppError::from(e).into_response();
        }
    }

    next.run(Request::from_parts(parts, Body::from(bytes))).await
}

fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(|mime| {
            let mime = mime.trim().to_ascii_lowercase();
            mime == "application/json" || mime.ends_with("+json")
        })
        .unwrap_or(false)
}

// ============================================================================
// Rate limit
// ============================================================================

fn is_rate_limited_path(path: &str, health: HealthRateLimit) -> bool {
    let under_api = path == API_PREFIX || path.starts_with("/api/");
    if !under_api {
        return false;
    }
    !(health == HealthRateLimit::Exempt && path == HEALTH_PATH)
}

/// Fixed-window limiter keyed by client IP, restricted to `/api`
pub async fn rate_limit<V, S>(
    State(state): State<RelayAppState<V, S>>,
    req: Request<Body>,
    next: Next,
) -> Response
where
    V: TokenVerifier + Send + Sync + 'static,
    S: RateLimitStore + Send + Sync + 'static,
{
    if !is_rate_limited_path(req.uri().path(), state.config.health_rate_limit) {
        return next.run(req).await;
    }

    let direct_ip = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|info| info.0.ip());
    let key = client_key(req.headers(), direct_ip, state.config.trust_proxy);

    let config = &state.config.rate_limit;
    let result = match state.limiter.check_and_increment(&key, config).await {
        Ok(result) => result,
        Err(e) => {
            tracing::error!(error = %e, "Rate limit store failed");
            return AppError::internal("Internal Server Error").into_response();
        }
    };

    let now = now_ms();

    if !result.allowed {
        tracing::warn!(client = %key, limit = result.limit, "Rate limit exceeded");
        let mut response = AppError::too_many_requests(RATE_LIMIT_MESSAGE).into_response();
        apply_rate_limit_headers(response.headers_mut(), config, &result, now);
        response.headers_mut().insert(
            header::RETRY_AFTER,
            HeaderValue::from(result.reset_after_secs(now)),
        );
        return response;
    }

    let mut response = next.run(req).await;
    apply_rate_limit_headers(response.headers_mut(), config, &result, now);
    response
}

/// `RateLimit-*` headers; the legacy `X-RateLimit-*` family is never sent
pub fn apply_rate_limit_headers(
    headers: &mut HeaderMap,
    config: &RateLimitConfig,
    result: &RateLimitResult,
    now_ms: i64,
) {
    if let Ok(policy) = HeaderValue::from_str(&config.policy()) {
        headers.insert(HeaderName::from_static("ratelimit-policy"), policy);
    }
    headers.insert(
        HeaderName::from_static("ratelimit-limit"),
        HeaderValue::from(result.limit),
    );
    headers.insert(
        HeaderName::from_static("ratelimit-remaining"),
        HeaderValue::from(result.remaining),
    );
    headers.insert(
        HeaderName::from_static("ratelimit-reset"),
        HeaderValue::from(result.reset_after_secs(now_ms)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limited_paths() {
        assert!(is_rate_limited_path("/api", HealthRateLimit::Include));
        assert!(is_rate_limited_path("/api/profile", HealthRateLimit::Include));
        assert!(is_rate_limited_path("/api/unknown", HealthRateLimit::Exempt));
        assert!(is_rate_limited_path("/api/health", HealthRateLimit::Include));
        assert!(!is_rate_limited_path("/api/health", HealthRateLimit::Exempt));
        assert!(!is_rate_limited_path("/apix", HealthRateLimit::Include));
        assert!(!is_rate_limited_path("/", HealthRateLimit::Include));
    }

    #[test]
    fn test_is_json() {
        let mut headers = HeaderMap::new();
        assert!(!is_json(&headers));

        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json; charset=utf-8"),
        );
        assert!(is_json(&headers));

        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/merge-patch+json"),
        );
        assert!(is_json(&headers));

        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("text/plain"));
        assert!(!is_json(&headers));
    }

    #[test]
    fn test_rate_limit_headers() {
        let config = RateLimitConfig::default();
        let result = RateLimitResult {
            allowed: true,
            limit: 100,
            remaining: 42,
            reset_at_ms: 90_000,
        };
        let mut headers = HeaderMap::new();
        apply_rate_limit_headers(&mut headers, &config, &result, 0);

        assert_eq!(headers["ratelimit-policy"], "100;w=900");
        assert_eq!(headers["ratelimit-limit"], "100");
        assert_eq!(headers["ratelimit-remaining"], "42");
        assert_eq!(headers["ratelimit-reset"], "90");
        assert!(headers.get("x-ratelimit-limit").is_none());
    }
}
