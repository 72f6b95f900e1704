//! Background work: periodic maintenance jobs.

#[cfg(feature = "scheduler")]
mod scheduler;

#[cfg(feature = "scheduler")]
pub use scheduler::Scheduler;

use crate::state::RateLimiters;

/// Scheduler configuration.
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// Enable scheduler.
    pub enabled: bool,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// Drop elapsed rate-limit windows from every group.
pub async fn purge_rate_limits(limiters: &RateLimiters) -> usize {
    let mut purged = 0;
    for limiter in limiters.all() {
        purged += limiter.purge_expired().await;
    }
    if purged > 0 {
        tracing::debug!(purged, "Purged expired rate limit windows");
    }
    purged
}

#[cfg(test)]
mod tests {
    use super::*;
    use eventix_core::ports::RateLimiter;

    #[tokio::test]
    async fn test_purge_keeps_live_windows() {
        let limiters = RateLimiters::fixed_window();
        limiters.auth.check("10.0.0.1").await.unwrap();
        limiters.like.check("10.0.0.2").await.unwrap();

        assert_eq!(purge_rate_limits(&limiters).await, 0);
    }
}
