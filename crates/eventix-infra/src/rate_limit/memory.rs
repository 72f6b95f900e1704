//! In-memory fixed window rate limiter.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::Mutex;

use eventix_core::ports::{RateLimitError, RateLimitResult, RateLimiter};
use eventix_core::rate_limit::RateLimitPolicy;

#[derive(Debug, Clone, Copy)]
struct Window {
    count: u32,
    started: Instant,
}

impl Window {
    fn elapsed(&self, now: Instant, length: Duration) -> bool {
        now.saturating_duration_since(self.started) >= length
    }
}

/// Counts requests per key in fixed windows that open on the key's first request.
///
/// Limits are per-process; use the Redis limiter for multi-instance deployments.
pub struct FixedWindowRateLimiter {
    policy: RateLimitPolicy,
    windows: Mutex<HashMap<String, Window>>,
}

impl FixedWindowRateLimiter {
    pub fn new(policy: RateLimitPolicy) -> Self {
        Self {
            policy,
            windows: Mutex::new(HashMap::new()),
        }
    }

    async fn check_at(&self, key: &str, now: Instant) -> RateLimitResult {
        let mut windows = self.windows.lock().await;

        let window = windows
            .entry(key.to_string())
            .and_modify(|w| {
                if w.elapsed(now, self.policy.window) {
                    *w = Window {
                        count: 0,
                        started: now,
                    };
                }
            })
            .or_insert(Window {
                count: 0,
                started: now,
            });

        let limit = self.policy.max_requests;
        let allowed = window.count < limit;
        if allowed {
            window.count += 1;
        }

        RateLimitResult {
            allowed,
            limit,
            remaining: limit - window.count.min(limit),
            reset_after: self
                .policy
                .window
                .saturating_sub(now.saturating_duration_since(window.started)),
        }
    }

    async fn purge_at(&self, now: Instant) -> usize {
        let mut windows = self.windows.lock().await;
        let before = windows.len();
        windows.retain(|_, w| !w.elapsed(now, self.policy.window));
        before - windows.len()
    }
}

#[async_trait]
impl RateLimiter for FixedWindowRateLimiter {
    async fn check(&self, key: &str) -> Result<RateLimitResult, RateLimitError> {
        Ok(self.check_at(key, Instant::now()).await)
    }

    async fn purge_expired(&self) -> usize {
        self.purge_at(Instant::now()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const POLICY: RateLimitPolicy = RateLimitPolicy::new("test", 3, 60);

    #[tokio::test]
    async fn test_rejects_request_over_ceiling() {
        let limiter = FixedWindowRateLimiter::new(POLICY);
        let now = Instant::now();

        for expected_remaining in [2, 1, 0] {
            let res = limiter.check_at("10.0.0.1", now).await;
            assert!(res.allowed);
            assert_eq!(res.remaining, expected_remaining);
        }

        let res = limiter.check_at("10.0.0.1", now).await;
        assert!(!res.allowed);
        assert_eq!(res.remaining, 0);
        assert_eq!(res.limit, 3);
    }

    #[tokio::test]
    async fn test_new_window_after_elapse() {
        let limiter = FixedWindowRateLimiter::new(POLICY);
        let start = Instant::now();

        for _ in 0..4 {
            limiter.check_at("k", start).await;
        }
        assert!(!limiter.check_at("k", start + Duration::from_secs(59)).await.allowed);

        let res = limiter.check_at("k", start + Duration::from_secs(60)).await;
        assert!(res.allowed);
        assert_eq!(res.remaining, 2);
    }

    #[tokio::test]
    async fn test_keys_are_independent() {
        let limiter = FixedWindowRateLimiter::new(POLICY);
        let now = Instant::now();

        for _ in 0..3 {
            limiter.check_at("a", now).await;
        }

        assert!(!limiter.check_at("a", now).await.allowed);
        assert!(limiter.check_at("b", now).await.allowed);
    }

    #[tokio::test]
    async fn test_reset_after_counts_down() {
        let limiter = FixedWindowRateLimiter::new(POLICY);
        let start = Instant::now();

        limiter.check_at("k", start).await;
        let res = limiter.check_at("k", start + Duration::from_secs(20)).await;

        assert_eq!(res.reset_after, Duration::from_secs(40));
    }

    #[tokio::test]
    async fn test_purge_drops_only_elapsed_windows() {
        let limiter = FixedWindowRateLimiter::new(POLICY);
        let start = Instant::now();

        limiter.check_at("old", start).await;
        limiter.check_at("fresh", start + Duration::from_secs(30)).await;

        assert_eq!(limiter.purge_at(start + Duration::from_secs(61)).await, 1);
        assert_eq!(limiter.windows.lock().await.len(), 1);
    }
}
