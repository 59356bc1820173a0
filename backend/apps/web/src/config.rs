//! Console Configuration

use platform::config::{ConfigError, ProviderConfig, optional};
use std::path::PathBuf;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:5174";

#[derive(Debug, Clone)]
pub struct ConsoleConfig {
    /// Relay base URL
    pub api_base_url: String,
    /// Where the session is persisted; in-memory only when unset
    pub session_file: Option<PathBuf>,
    pub provider: ProviderConfig,
}

impl ConsoleConfig {
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            api_base_url: optional(&lookup, "API_BASE_URL")
                .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string()),
            session_file: optional(&lookup, "SESSION_FILE").map(PathBuf::from),
            provider: ProviderConfig::from_lookup(&lookup)?,
        })
    }
}
