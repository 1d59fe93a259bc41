//! Per-host request throttling.
//!
//! Book downloads issue hundreds to thousands of strictly sequential verse
//! requests. [`RateLimiter`] enforces a minimum gap between consecutive
//! requests to the same host so the verse service is not hammered.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use versebook_core::acquisition::RateLimiter;
//!
//! # async fn example() {
//! let limiter = RateLimiter::new(Duration::from_millis(50));
//!
//! // First request proceeds immediately
//! limiter.acquire("bolls.life").await;
//!
//! // Second request to the same host waits for the gap
//! limiter.acquire("bolls.life").await;
//! # }
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use dashmap::DashMap;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, instrument, trace, warn};

use crate::constants::CUMULATIVE_DELAY_WARNING_THRESHOLD;

/// Per-host rate limiter for verse requests.
///
/// Designed to be wrapped in `Arc` and shared. `DashMap` holds per-host state;
/// the per-host `tokio::sync::Mutex` makes read-then-update of the last
/// request time atomic.
#[derive(Debug)]
pub struct RateLimiter {
    /// Minimum delay between requests to the same host.
    delay: Duration,

    /// Whether throttling is disabled (`--request-delay 0`).
    disabled: bool,

    /// Per-host state. Values are `Arc` so the map shard lock is released
    /// before awaiting on the inner mutex.
    hosts: DashMap<String, Arc<HostState>>,
}

#[derive(Debug)]
struct HostState {
    /// `None` until the first request to this host.
    last_request: Mutex<Option<Instant>>,

    /// Total delay applied to this host, in milliseconds.
    cumulative_delay_ms: AtomicU64,
}

impl HostState {
    fn new() -> Self {
        Self {
            last_request: Mutex::new(None),
            cumulative_delay_ms: AtomicU64::new(0),
        }
    }

    #[allow(clippy::cast_possible_truncation)]
    fn add_cumulative_delay(&self, delay: Duration) -> Duration {
        let delay_ms = delay.as_millis() as u64;
        let new_total = self
            .cumulative_delay_ms
            .fetch_add(delay_ms, Ordering::SeqCst)
            + delay_ms;
        Duration::from_millis(new_total)
    }
}

impl RateLimiter {
    /// Creates a rate limiter that spaces requests to one host by `delay`.
    #[must_use]
    #[instrument(skip_all, fields(delay_ms = delay.as_millis()))]
    pub fn new(delay: Duration) -> Self {
        debug!("creating rate limiter");
        Self {
            delay,
            disabled: delay.is_zero(),
            hosts: DashMap::new(),
        }
    }

    /// Creates a rate limiter that never waits.
    #[must_use]
    pub fn disabled() -> Self {
        debug!("creating disabled rate limiter");
        Self {
            delay: Duration::ZERO,
            disabled: true,
            hosts: DashMap::new(),
        }
    }

    #[must_use]
    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    #[must_use]
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Total delay applied so far to `host`.
    #[must_use]
    pub fn cumulative_delay(&self, host: &str) -> Duration {
        self.hosts
            .get(host)
            .map(|state| Duration::from_millis(state.cumulative_delay_ms.load(Ordering::SeqCst)))
            .unwrap_or_default()
    }

    /// Waits until a request to `host` is allowed, then records it.
    ///
    /// The first request to any host proceeds immediately.
    #[instrument(skip(self), level = "trace")]
    pub async fn acquire(&self, host: &str) {
        if self.disabled {
            return;
        }

        let state = self
            .hosts
            .entry(host.to_string())
            .or_insert_with(|| Arc::new(HostState::new()))
            .clone();

        let mut last_request_guard = state.last_request.lock().await;

        if let Some(last_request) = *last_request_guard {
            let elapsed = last_request.elapsed();
            if elapsed < self.delay {
                let delay = self.delay.saturating_sub(elapsed);
                let cumulative = state.add_cumulative_delay(delay);

                trace!(
                    host,
                    delay_ms = delay.as_millis(),
                    cumulative_ms = cumulative.as_millis(),
                    "applying request delay"
                );

                // Warn once, on the request that crosses the threshold.
                if cumulative >= CUMULATIVE_DELAY_WARNING_THRESHOLD
                    && cumulative.saturating_sub(delay) < CUMULATIVE_DELAY_WARNING_THRESHOLD
                {
                    warn!(
                        host,
                        cumulative_delay_secs = cumulative.as_secs(),
                        "long-running throttled download"
                    );
                }

                tokio::time::sleep(delay).await;
            }
        } else {
            debug!(host, "first request to host - no delay");
        }

        *last_request_guard = Some(Instant::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limiter_new_creates_with_delay() {
        let limiter = RateLimiter::new(Duration::from_millis(50));
        assert_eq!(limiter.delay(), Duration::from_millis(50));
        assert!(!limiter.is_disabled());
    }

    #[test]
    fn test_rate_limiter_zero_delay_is_disabled() {
        assert!(RateLimiter::new(Duration::ZERO).is_disabled());
        assert!(RateLimiter::disabled().is_disabled());
    }

    #[tokio::test(start_paused = true)]
    async fn test_rate_limiter_disabled_no_delay() {
        let limiter = RateLimiter::disabled();
        let start = Instant::now();

        for _ in 0..3 {
            limiter.acquire("bolls.life").await;
        }

        assert!(start.elapsed() < Duration::from_millis(10));
    }

    #[tokio::test(start_paused = true)]
    async fn test_rate_limiter_first_request_no_delay() {
        let limiter = RateLimiter::new(Duration::from_secs(1));
        let start = Instant::now();

        limiter.acquire("bolls.life").await;

        assert!(start.elapsed() < Duration::from_millis(10));
    }

    #[tokio::test(start_paused = true)]
    async fn test_rate_limiter_spaces_same_host() {
        let limiter = RateLimiter::new(Duration::from_millis(50));
        let start = Instant::now();

        limiter.acquire("bolls.life").await;
        limiter.acquire("bolls.life").await;
        limiter.acquire("bolls.life").await;

        assert!(start.elapsed() >= Duration::from_millis(100));
        assert!(start.elapsed() < Duration::from_millis(150));
        assert_eq!(
            limiter.cumulative_delay("bolls.life"),
            Duration::from_millis(100)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_rate_limiter_no_delay_when_gap_already_elapsed() {
        let limiter = RateLimiter::new(Duration::from_millis(50));
        limiter.acquire("bolls.life").await;
        tokio::time::sleep(Duration::from_millis(80)).await;

        let start = Instant::now();
        limiter.acquire("bolls.life").await;
        assert!(start.elapsed() < Duration::from_millis(10));
    }

    #[tokio::test(start_paused = true)]
    async fn test_rate_limiter_hosts_independent() {
        let limiter = RateLimiter::new(Duration::from_secs(1));
        limiter.acquire("a.example").await;

        let start = Instant::now();
        limiter.acquire("b.example").await;
        assert!(start.elapsed() < Duration::from_millis(10));
        assert_eq!(limiter.cumulative_delay("b.example"), Duration::ZERO);
    }
}
