//! Configuration Infrastructure
//!
//! Typed configuration loaded from environment variables. Every loader takes
//! a lookup function so tests can supply values without touching the process
//! environment.

use url::Url;

/// Environment variable holding the provider base URL
pub const PROVIDER_URL_VAR: &str = "SUPABASE_URL";
/// Environment variable holding the provider public (anon) key
pub const PROVIDER_KEY_VAR: &str = "SUPABASE_ANON_KEY";

/// Configuration error
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Read a variable from the process environment
pub fn env_lookup(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

/// Look up a required, non-blank variable
pub fn required<F>(lookup: &F, name: &'static str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(name)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or(ConfigError::Missing(name))
}

/// Look up an optional variable, treating blank values as absent
pub fn optional<F>(lookup: &F, name: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(name)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Parse a boolean flag (`1/0`, `true/false`, `yes/no`, `on/off`)
pub fn flag<F>(lookup: &F, name: &'static str, default: bool) -> Result<bool, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match optional(lookup, name) {
        None => Ok(default),
        Some(v) => match v.to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            other => Err(ConfigError::Invalid {
                name,
                reason: format!("expected a boolean, got {other:?}"),
            }),
        },
    }
}

/// Split a comma-separated list, trimming entries and dropping empty ones
pub fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Hosted auth provider configuration
#[derive(Clone)]
pub struct ProviderConfig {
    /// Base URL of the provider project, always ending in `/`
    pub base_url: Url,
    /// Public (anon) key sent as `apikey` on every call
    pub public_key: String,
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("base_url", &self.base_url.as_str())
            .field("public_key", &"[REDACTED]")
            .finish()
    }
}

impl ProviderConfig {
    pub fn new(base_url: &str, public_key: impl Into<String>) -> Result<Self, ConfigError> {
        let mut base_url = Url::parse(base_url).map_err(|e| ConfigError::Invalid {
            name: PROVIDER_URL_VAR,
            reason: e.to_string(),
        })?;

        if base_url.cannot_be_a_base() {
            return Err(ConfigError::Invalid {
                name: PROVIDER_URL_VAR,
                reason: "URL cannot be used as a base".to_string(),
            });
        }

        // Url::join drops the last path segment unless the path ends in '/'
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Self {
            base_url,
            public_key: public_key.into(),
        })
    }

    /// Load from `SUPABASE_URL` / `SUPABASE_ANON_KEY`; both are required
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let url = required(&lookup, PROVIDER_URL_VAR)?;
        let key = required(&lookup, PROVIDER_KEY_VAR)?;
        Self::new(&url, key)
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(env_lookup)
    }

    /// Resolve a provider endpoint relative to the base URL
    pub fn endpoint(&self, path: &str) -> Result<Url, url::ParseError> {
        self.base_url.join(path.trim_start_matches('/'))
    }
}
