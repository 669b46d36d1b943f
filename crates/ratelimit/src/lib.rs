//! Rate Limiter (C1): per-host delay, bounded concurrency, adaptive backoff.

use dashmap::DashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{Mutex, OwnedSemaphorePermit, Semaphore};

#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    pub base_delay: Duration,
    pub max_concurrent: usize,
    pub max_delay: Duration,
    pub backoff_multiplier: f64,
    pub recovery_factor: f64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            base_delay: Duration::from_millis(500),
            max_concurrent: 2,
            max_delay: Duration::from_secs(30),
            backoff_multiplier: 2.0,
            recovery_factor: 0.9,
        }
    }
}

struct HostState {
    semaphore: Arc<Semaphore>,
    // Guards (current delay, timestamp of the last request) together so a
    // concurrent acquire can't read a delay that doesn't match `last`.
    timing: Mutex<(Duration, Option<Instant>)>,
}

/// Per-host delay + bounded concurrency + adaptive backoff (§4.1).
///
/// State for unseen hosts is created on first acquire under the DashMap's
/// own sharded locking, a double-checked creation with no separate global
/// mutex.
pub struct RateLimiter {
    config: RateLimitConfig,
    hosts: DashMap<String, Arc<HostState>>,
}

/// A scoped lease on a host's concurrency slot. Dropping it releases the
/// slot; it carries no other behavior, the delay bookkeeping happens at
/// acquire time.
pub struct Lease {
    _permit: OwnedSemaphorePermit,
}

impl RateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            config,
            hosts: DashMap::new(),
        }
    }

    /// Extract a lowercase host from a bare host or a full URL.
    pub fn host_key(url_or_host: &str) -> String {
        if let Ok(parsed) = url::Url::parse(url_or_host) {
            if let Some(host) = parsed.host_str() {
                return host.to_lowercase();
            }
        }
        url_or_host.to_lowercase()
    }

    fn state_for(&self, host: &str) -> Arc<HostState> {
        self.hosts
            .entry(host.to_string())
            .or_insert_with(|| {
                Arc::new(HostState {
                    semaphore: Arc::new(Semaphore::new(self.config.max_concurrent)),
                    timing: Mutex::new((self.config.base_delay, None)),
                })
            })
            .clone()
    }

    /// Take a concurrency slot, then sleep out any remaining per-host delay.
    pub async fn acquire(&self, url_or_host: &str) -> Lease {
        let host = Self::host_key(url_or_host);
        let state = self.state_for(&host);

        let permit = state
            .semaphore
            .clone()
            .acquire_owned()
            .await
            .expect("semaphore is never closed");

        let mut timing = state.timing.lock().await;
        let (delay, last) = *timing;
        let now = Instant::now();
        if let Some(last) = last {
            let elapsed = now.duration_since(last);
            if elapsed < delay {
                tokio::time::sleep(delay - elapsed).await;
            }
        }
        timing.1 = Some(Instant::now());
        drop(timing);

        Lease { _permit: permit }
    }

    /// Feed an HTTP status (and optional `Retry-After`, pre-parsed to
    /// seconds) back into the limiter (§4.1 Feedback).
    pub async fn on_response(&self, url_or_host: &str, status: u16, retry_after_secs: Option<u64>) {
        let host = Self::host_key(url_or_host);
        let state = self.state_for(&host);
        let mut timing = state.timing.lock().await;

        if status == 429 || status == 503 {
            let new_delay = if let Some(secs) = retry_after_secs {
                Duration::from_secs(secs).min(self.config.max_delay)
            } else {
                let scaled = timing.0.mul_f64(self.config.backoff_multiplier);
                scaled.min(self.config.max_delay)
            };
            tracing::info!(host = %host, delay_ms = new_delay.as_millis(), "rate limited, widening delay");
            timing.0 = new_delay;
        } else if (200..400).contains(&status) {
            let recovered = timing.0.mul_f64(self.config.recovery_factor);
            if recovered <= self.config.base_delay.mul_f64(1.1) {
                timing.0 = self.config.base_delay;
            } else {
                timing.0 = recovered;
            }
        }
    }

    /// Parse a `Retry-After` header value: integer seconds, or an RFC 1123
    /// HTTP date (converted to a relative, non-negative second count).
    pub fn parse_retry_after(value: &str) -> Option<u64> {
        if let Ok(secs) = value.trim().parse::<u64>() {
            return Some(secs);
        }
        httpdate::parse_http_date(value.trim())
            .ok()
            .map(|when| {
                when.duration_since(std::time::SystemTime::now())
                    .unwrap_or_default()
                    .as_secs()
            })
    }

    pub fn current_delay_ms_for_test(&self, url_or_host: &str) -> Option<u64> {
        let host = Self::host_key(url_or_host);
        self.hosts
            .get(&host)
            .map(|s| s.timing.try_lock().map(|t| t.0.as_millis() as u64).unwrap_or(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn backoff_widens_on_rate_limit_and_recovers_on_success() {
        let limiter = RateLimiter::new(RateLimitConfig {
            base_delay: Duration::from_millis(10),
            ..RateLimitConfig::default()
        });
        {
            let _lease = limiter.acquire("example.com").await;
        }
        limiter.on_response("example.com", 429, None).await;
        let widened = limiter.current_delay_ms_for_test("example.com").unwrap();
        assert!(widened > 10);

        for _ in 0..50 {
            limiter.on_response("example.com", 200, None).await;
        }
        let recovered = limiter.current_delay_ms_for_test("example.com").unwrap();
        assert_eq!(recovered, 10);
    }

    #[tokio::test]
    async fn retry_after_overrides_backoff() {
        let limiter = RateLimiter::new(RateLimitConfig::default());
        limiter.on_response("example.com", 429, Some(5)).await;
        assert_eq!(
            limiter.current_delay_ms_for_test("example.com"),
            Some(5_000)
        );
    }

    #[tokio::test]
    async fn at_most_max_concurrent_leases_outstanding() {
        let limiter = Arc::new(RateLimiter::new(RateLimitConfig {
            max_concurrent: 2,
            base_delay: Duration::from_millis(0),
            ..RateLimitConfig::default()
        }));
        let _a = limiter.acquire("h").await;
        let _b = limiter.acquire("h").await;
        let limiter2 = limiter.clone();
        let third = tokio::spawn(async move {
            tokio::time::timeout(Duration::from_millis(50), limiter2.acquire("h")).await
        });
        assert!(third.await.unwrap().is_err(), "third acquire should block while 2 are held");
    }
}
