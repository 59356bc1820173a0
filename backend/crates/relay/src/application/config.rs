//! Application Configuration
//!
//! Configuration for the relay server and its edge middleware.

use platform::config::{ConfigError, flag, optional, split_list};
use platform::rate_limit::RateLimitConfig;

/// Origin allowed when `CORS_ORIGIN` is unset or empty
pub const DEFAULT_ALLOWED_ORIGIN: &str = "http://localhost:5173";

/// 100 KiB
pub const DEFAULT_BODY_LIMIT_BYTES: usize = 100 * 1024;

/// Whether `/api/health` is counted by the `/api` rate limiter
///
/// The limiter is mounted on the whole `/api` prefix, which includes the
/// health probe. Exempting it is an explicit deployment choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HealthRateLimit {
    #[default]
    Include,
    Exempt,
}

impl HealthRateLimit {
    fn parse(raw: &str) -> Result<Self, ConfigError> {
        match raw.to_ascii_lowercase().as_str() {
            "include" => Ok(HealthRateLimit::Include),
            "exempt" => Ok(HealthRateLimit::Exempt),
            other => Err(ConfigError::Invalid {
                name: "RATE_LIMIT_HEALTH",
                reason: format!("expected \"include\" or \"exempt\", got {other:?}"),
            }),
        }
    }
}

/// Relay application configuration
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// Reported as `service` by the health probe
    pub service_name: String,
    /// Reported as `env` by the health probe
    pub environment: String,
    /// Exact-match browser origins
    pub allowed_origins: Vec<String>,
    /// Request body cap
    pub body_limit_bytes: usize,
    /// Fixed-window limits for the `/api` prefix
    pub rate_limit: RateLimitConfig,
    pub health_rate_limit: HealthRateLimit,
    /// Take the client IP from the proxy-appended `X-Forwarded-For` entry
    pub trust_proxy: bool,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            service_name: "server".to_string(),
            environment: "development".to_string(),
            allowed_origins: vec![DEFAULT_ALLOWED_ORIGIN.to_string()],
            body_limit_bytes: DEFAULT_BODY_LIMIT_BYTES,
            rate_limit: RateLimitConfig::default(),
            health_rate_limit: HealthRateLimit::Include,
            trust_proxy: true,
        }
    }
}

impl RelayConfig {
    /// Load from `NODE_ENV`, `CORS_ORIGIN`, `TRUST_PROXY`, `RATE_LIMIT_HEALTH`
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let environment = optional(&lookup, "NODE_ENV").unwrap_or(defaults.environment);

        let allowed_origins = optional(&lookup, "CORS_ORIGIN")
            .map(|raw| split_list(&raw))
            .filter(|list| !list.is_empty())
            .unwrap_or(defaults.allowed_origins);

        let health_rate_limit = match optional(&lookup, "RATE_LIMIT_HEALTH") {
            Some(raw) => HealthRateLimit::parse(&raw)?,
            None => defaults.health_rate_limit,
        };

        Ok(Self {
            environment,
            allowed_origins,
            health_rate_limit,
            trust_proxy: flag(&lookup, "TRUST_PROXY", defaults.trust_proxy)?,
            ..defaults
        })
    }

    pub fn is_origin_allowed(&self, origin: &str) -> bool {
        self.allowed_origins.iter().any(|allowed| allowed == origin)
    }
}
