//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors, but application-level
//! errors should use `kernel::error::AppError`.

mod config;

use anyhow::Context;
use platform::config::env_lookup;
use platform::provider::AuthProviderClient;
use platform::rate_limit::InMemoryRateLimitStore;
use relay::{ProviderTokenVerifier, relay_router};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::ServerConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "api=info,relay=info,platform=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Fail fast on missing provider settings
    let config = ServerConfig::from_lookup(env_lookup).context("Invalid server configuration")?;

    tracing::info!(
        env = %config.relay.environment,
        origins = ?config.relay.allowed_origins,
        health_rate_limit = ?config.relay.health_rate_limit,
        trust_proxy = config.relay.trust_proxy,
        "Configuration loaded"
    );

    let provider = AuthProviderClient::new(config.provider.clone())
        .context("Failed to build auth provider client")?;
    let verifier = ProviderTokenVerifier::new(provider);

    // Rate limit counters live in process memory; expired windows are purged
    let limiter = Arc::new(InMemoryRateLimitStore::new());
    let _purge = Arc::clone(&limiter).spawn_purge_task(config.relay.rate_limit.clone());

    // Build router
    let app = relay_router(verifier, limiter, config.relay);

    // Start server
    tracing::info!("Listening on {}", config.addr);

    let listener = TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.addr))?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
