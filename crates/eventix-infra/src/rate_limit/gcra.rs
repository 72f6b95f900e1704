//! In-memory keyed rate limiter using the governor crate (GCRA).
//!
//! Smoother than the fixed window: a full burst of `max_requests` is
//! available up front and capacity then trickles back at
//! `window / max_requests` per request instead of resetting all at once.

use std::num::NonZeroU32;

use async_trait::async_trait;
use governor::clock::{Clock, DefaultClock};
use governor::{DefaultKeyedRateLimiter, Quota, RateLimiter as GovernorRateLimiter};

use eventix_core::ports::{RateLimitError, RateLimitResult, RateLimiter};
use eventix_core::rate_limit::RateLimitPolicy;

pub struct GcraRateLimiter {
    limiter: DefaultKeyedRateLimiter<String>,
    policy: RateLimitPolicy,
    clock: DefaultClock,
}

impl GcraRateLimiter {
    pub fn new(policy: RateLimitPolicy) -> Result<Self, RateLimitError> {
        let burst = NonZeroU32::new(policy.max_requests)
            .ok_or_else(|| RateLimitError::Backend("max_requests must be non-zero".to_string()))?;
        let quota = Quota::with_period(policy.window / policy.max_requests)
            .ok_or_else(|| RateLimitError::Backend("window too short for quota".to_string()))?
            .allow_burst(burst);

        Ok(Self {
            limiter: GovernorRateLimiter::keyed(quota),
            policy,
            clock: DefaultClock::default(),
        })
    }
}

#[async_trait]
impl RateLimiter for GcraRateLimiter {
    async fn check(&self, key: &str) -> Result<RateLimitResult, RateLimitError> {
        match self.limiter.check_key(&key.to_string()) {
            Ok(_) => Ok(RateLimitResult {
                allowed: true,
                limit: self.policy.max_requests,
                // governor does not expose remaining capacity per key
                remaining: self.policy.max_requests.saturating_sub(1),
                reset_after: self.policy.window,
            }),
            Err(not_until) => Ok(RateLimitResult {
                allowed: false,
                limit: self.policy.max_requests,
                remaining: 0,
                reset_after: not_until.wait_time_from(self.clock.now()),
            }),
        }
    }

    async fn purge_expired(&self) -> usize {
        let before = self.limiter.len();
        self.limiter.retain_recent();
        self.limiter.shrink_to_fit();
        before.saturating_sub(self.limiter.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_burst_then_reject() {
        let limiter = GcraRateLimiter::new(RateLimitPolicy::new("test", 2, 60)).unwrap();

        assert!(limiter.check("ip").await.unwrap().allowed);
        assert!(limiter.check("ip").await.unwrap().allowed);

        let denied = limiter.check("ip").await.unwrap();
        assert!(!denied.allowed);
        assert!(denied.reset_after.as_secs() <= 30);

        assert!(limiter.check("other-ip").await.unwrap().allowed);
    }

    #[test]
    fn test_zero_ceiling_is_rejected() {
        assert!(GcraRateLimiter::new(RateLimitPolicy::new("test", 0, 60)).is_err());
    }
}
