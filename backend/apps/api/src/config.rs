//! Server Configuration
//!
//! Everything the relay binary reads from the environment at start-up.

use platform::config::{ConfigError, ProviderConfig, optional};
use relay::RelayConfig;
use std::net::{IpAddr, SocketAddr};

pub const DEFAULT_PORT: u16 = 5174;
pub const DEFAULT_HOST: IpAddr = IpAddr::V4(std::net::Ipv4Addr::UNSPECIFIED);

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub addr: SocketAddr,
    pub relay: RelayConfig,
    pub provider: ProviderConfig,
}

impl ServerConfig {
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = match optional(&lookup, "PORT") {
            Some(raw) => raw.parse::<u16>().map_err(|e| ConfigError::Invalid {
                name: "PORT",
                reason: e.to_string(),
            })?,
            None => DEFAULT_PORT,
        };

        let host = match optional(&lookup, "HOST") {
            Some(raw) => raw.parse::<IpAddr>().map_err(|e| ConfigError::Invalid {
                name: "HOST",
                reason: e.to_string(),
            })?,
            None => DEFAULT_HOST,
        };

        Ok(Self {
            addr: SocketAddr::new(host, port),
            relay: RelayConfig::from_lookup(&lookup)?,
            provider: ProviderConfig::from_lookup(&lookup)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<ServerConfig, ConfigError> {
        let map: HashMap<&str, &str> = pairs.iter().copied().collect();
        ServerConfig::from_lookup(|key| map.get(key).map(|v| v.to_string()))
    }

    const PROVIDER: &[(&str, &str)] = &[
        ("SUPABASE_URL", "https://project.supabase.co"),
        ("SUPABASE_ANON_KEY", "anon"),
    ];

    #[test]
    fn test_defaults() {
        let config = config_from(PROVIDER).unwrap();
        assert_eq!(config.addr, "0.0.0.0:5174".parse().unwrap());
        assert_eq!(config.relay.environment, "development");
    }

    #[test]
    fn test_overrides() {
        let mut pairs = PROVIDER.to_vec();
        pairs.extend([("PORT", "8080"), ("HOST", "127.0.0.1"), ("NODE_ENV", "production")]);
        let config = config_from(&pairs).unwrap();
        assert_eq!(config.addr, "127.0.0.1:8080".parse().unwrap());
        assert_eq!(config.relay.environment, "production");
    }

    #[test]
    fn test_provider_is_required() {
        assert_eq!(
            config_from(&[]).unwrap_err(),
            ConfigError::Missing("SUPABASE_URL")
        );
        assert_eq!(
            config_from(&[("SUPABASE_URL", "https://project.supabase.co")]).unwrap_err(),
            ConfigError::Missing("SUPABASE_ANON_KEY")
        );
    }

    #[test]
    fn test_invalid_port() {
        let mut pairs = PROVIDER.to_vec();
        pairs.push(("PORT", "seventy"));
        assert!(matches!(
            config_from(&pairs),
            Err(ConfigError::Invalid { name: "PORT", .. })
        ));
    }
}
