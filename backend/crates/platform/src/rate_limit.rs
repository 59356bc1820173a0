//! Rate Limiting Infrastructure
//!
//! Common rate limiting abstractions and the in-memory fixed-window store.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Rate limit configuration
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Maximum requests allowed in the window
    pub max_requests: u32,
    /// Time window duration
    pub window: Duration,
}

impl Default for RateLimitConfig {
    /// 100 requests per client every 15 minutes
    fn default() -> Self {
        Self {
            max_requests: 100,
            window: Duration::from_secs(15 * 60),
        }
    }
}

impl RateLimitConfig {
    pub fn new(max_requests: u32, window_secs: u64) -> Self {
        Self {
            max_requests,
            window: Duration::from_secs(window_secs),
        }
    }

    pub fn window_ms(&self) -> i64 {
        self.window.as_millis() as i64
    }

    /// `RateLimit-Policy` header value, e.g. `100;w=900`
    pub fn policy(&self) -> String {
        format!("{};w={}", self.max_requests, self.window.as_secs())
    }
}

/// Rate limit check result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitResult {
    pub allowed: bool,
    pub limit: u32,
    pub remaining: u32,
    pub reset_at_ms: i64,
}

impl RateLimitResult {
    /// Whole seconds until the window resets, rounded up
    pub fn reset_after_secs(&self, now_ms: i64) -> u64 {
        let remaining_ms = (self.reset_at_ms - now_ms).max(0) as u64;
        remaining_ms.div_ceil(1000)
    }
}

/// Trait for rate limit storage backends
#[trait_variant::make(RateLimitStore: Send)]
pub trait LocalRateLimitStore {
    /// Check and increment rate limit counter
    async fn check_and_increment(
        &self,
        key: &str,
        config: &RateLimitConfig,
    ) -> Result<RateLimitResult, Box<dyn std::error::Error + Send + Sync>>;
}

#[derive(Debug, Clone, Copy)]
struct Window {
    started_at_ms: i64,
    count: u32,
}

/// Process-local fixed-window counters keyed by client
///
/// A window opens on a client's first hit and lasts `config.window`; the
/// counter keeps increasing past the limit so that a client hammering the
/// server stays rejected until the window closes.
#[derive(Debug, Default)]
pub struct InMemoryRateLimitStore {
    windows: Mutex<HashMap<String, Window>>,
}

impl InMemoryRateLimitStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Increment-and-check at an explicit instant (unix ms)
    pub fn hit_at(&self, key: &str, config: &RateLimitConfig, now_ms: i64) -> RateLimitResult {
        let window_ms = config.window_ms();
        let mut windows = self.windows.lock();

        let window = windows.entry(key.to_string()).or_insert(Window {
            started_at_ms: now_ms,
            count: 0,
        });

        if now_ms >= window.started_at_ms + window_ms {
            window.started_at_ms = now_ms;
            window.count = 0;
        }

        window.count = window.count.saturating_add(1);

        RateLimitResult {
            allowed: window.count <= config.max_requests,
            limit: config.max_requests,
            remaining: config.max_requests.saturating_sub(window.count),
            reset_at_ms: window.started_at_ms + window_ms,
        }
    }

    /// Drop windows that closed before `now_ms`; returns how many were removed
    pub fn purge_expired(&self, window: Duration, now_ms: i64) -> usize {
        let window_ms = window.as_millis() as i64;
        let mut windows = self.windows.lock();
        let before = windows.len();
        windows.retain(|_, w| now_ms < w.started_at_ms + window_ms);
        before - windows.len()
    }

    /// Number of clients currently tracked
    pub fn tracked_clients(&self) -> usize {
        self.windows.lock().len()
    }

    /// Periodically purge closed windows so idle clients do not accumulate
    pub fn spawn_purge_task(self: Arc<Self>, config: RateLimitConfig) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(config.window);
            interval.tick().await;
            loop {
                interval.tick().await;
                let removed = self.purge_expired(config.window, now_ms());
                if removed > 0 {
                    tracing::debug!(removed = removed, "Purged expired rate limit windows");
                }
            }
        })
    }
}

impl RateLimitStore for InMemoryRateLimitStore {
    async fn check_and_increment(
        &self,
        key: &str,
        config: &RateLimitConfig,
    ) -> Result<RateLimitResult, Box<dyn std::error::Error + Send + Sync>> {
        Ok(self.hit_at(key, config, now_ms()))
    }
}

/// Current wall-clock time in unix milliseconds
pub fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
