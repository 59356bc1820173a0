//! Client identification utilities
//!
//! Common functions for identifying clients via HTTP headers.

use axum::http::HeaderMap;
use std::net::IpAddr;

/// Key used when neither the proxy header nor the socket address is known
pub const UNKNOWN_CLIENT: &str = "unknown";

/// Whether a direct peer may be a reverse proxy in front of this server
///
/// Loopback, private (RFC 1918), unique-local and link-local addresses only.
/// An unknown peer (no socket address available) is treated as a proxy.
pub fn is_proxy_peer(peer: Option<IpAddr>) -> bool {
    let Some(peer) = peer else {
        return true;
    };

    match peer.to_canonical() {
        IpAddr::V4(v4) => v4.is_loopback() || v4.is_private() || v4.is_link_local(),
        IpAddr::V6(v6) => v6.is_loopback() || v6.is_unique_local() || v6.is_unicast_link_local(),
    }
}

/// Extract client IP address from headers
///
/// When `trust_proxy` is set and the direct peer looks like a proxy, the
/// last entry of `X-Forwarded-For` wins: that is the address the proxy
/// itself appended (one trusted hop). Entries further left are supplied by
/// the client and never used. Otherwise, and when the header is absent or
/// unparsable, the direct connection IP is used.
///
/// ## Arguments
/// * `headers` - HTTP request headers
/// * `direct_ip` - Direct connection IP address
/// * `trust_proxy` - Whether `X-Forwarded-For` may be trusted
pub fn extract_client_ip(
    headers: &HeaderMap,
    direct_ip: Option<IpAddr>,
    trust_proxy: bool,
) -> Option<IpAddr> {
    if trust_proxy && is_proxy_peer(direct_ip) {
        let forwarded = headers
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .and_then(|xff| xff.rsplit(',').map(str::trim).find(|entry| !entry.is_empty()))
            .and_then(|last| last.parse::<IpAddr>().ok());

        if let Some(ip) = forwarded {
            return Some(ip);
        }
    }
    direct_ip
}

/// Rate-limit key for a client
pub fn client_key(headers: &HeaderMap, direct_ip: Option<IpAddr>, trust_proxy: bool) -> String {
    extract_client_ip(headers, direct_ip, trust_proxy)
        .map(|ip| ip.to_string())
        .unwrap_or_else(|| UNKNOWN_CLIENT.to_string())
}
