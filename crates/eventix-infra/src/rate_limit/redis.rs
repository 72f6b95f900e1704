//! Redis rate limiter: a fixed window counter shared by every instance.

use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{Client, Script};

use eventix_core::ports::{RateLimitError, RateLimitResult, RateLimiter};
use eventix_core::rate_limit::RateLimitPolicy;

/// Redis connection configuration.
#[derive(Debug, Clone)]
pub struct RedisConfig {
    /// Redis URL (e.g., redis://localhost:6379)
    pub url: String,
    pub connect_timeout: Duration,
    /// Key prefix for rate limit keys
    pub key_prefix: String,
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            url: "redis://localhost:6379".to_string(),
            connect_timeout: Duration::from_secs(5),
            key_prefix: "ratelimit".to_string(),
        }
    }
}

/// Redis-backed rate limiter for one route group.
pub struct RedisRateLimiter {
    conn: ConnectionManager,
    config: RedisConfig,
    policy: RateLimitPolicy,
    /// Lua script for atomic increment with expiry
    script: Script,
}

impl RedisRateLimiter {
    pub async fn connect(config: &RedisConfig) -> Result<ConnectionManager, RateLimitError> {
        let client = Client::open(config.url.as_str())
            .map_err(|e| RateLimitError::Backend(e.to_string()))?;

        // Use timeout to prevent hanging if Redis is unreachable
        let conn = tokio::time::timeout(config.connect_timeout, ConnectionManager::new(client))
            .await
            .map_err(|_| RateLimitError::Backend("Connection timed out".to_string()))?
            .map_err(|e| RateLimitError::Backend(e.to_string()))?;

        tracing::info!(url = %config.url, "Connected to Redis rate limiter");
        Ok(conn)
    }

    /// Build a limiter over an existing connection; groups share one connection.
    pub fn new(conn: ConnectionManager, config: RedisConfig, policy: RateLimitPolicy) -> Self {
        // Returns: [current_count, ttl_remaining]
        let script = Script::new(
            r#"
            local key = KEYS[1]
            local window_secs = tonumber(ARGV[1])

            local current = redis.call('INCR', key)
            if current == 1 then
                redis.call('EXPIRE', key, window_secs)
            end

            local ttl = redis.call('TTL', key)
            return {current, ttl}
            "#,
        );

        Self {
            conn,
            config,
            policy,
            script,
        }
    }

    fn make_key(&self, key: &str) -> String {
        format!("{}:{}:{}", self.config.key_prefix, self.policy.group, key)
    }
}

#[async_trait]
impl RateLimiter for RedisRateLimiter {
    async fn check(&self, key: &str) -> Result<RateLimitResult, RateLimitError> {
        let redis_key = self.make_key(key);
        let mut conn = self.conn.clone();

        let result: Vec<i64> = self
            .script
            .key(&redis_key)
            .arg(self.policy.window.as_secs())
            .invoke_async(&mut conn)
            .await
            .map_err(|e| RateLimitError::Backend(e.to_string()))?;

        let current_count = result.first().copied().unwrap_or(1).max(0) as u32;
        let ttl_secs = result
            .get(1)
            .copied()
            .unwrap_or(self.policy.window.as_secs() as i64)
            .max(1) as u64;

        let limit = self.policy.max_requests;
        let allowed = current_count <= limit;

        Ok(RateLimitResult {
            allowed,
            limit,
            remaining: limit.saturating_sub(current_count),
            reset_after: Duration::from_secs(ttl_secs),
        })
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    async fn get_test_ratelimiter(policy: RateLimitPolicy) -> Option<RedisRateLimiter> {
        let config = RedisConfig {
            url: std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6389".to_string()),
            connect_timeout: Duration::from_secs(1),
            key_prefix: format!("test_ratelimit_{}", uuid::Uuid::new_v4()),
        };

        let conn = RedisRateLimiter::connect(&config).await.ok()?;
        Some(RedisRateLimiter::new(conn, config, policy))
    }

    #[tokio::test]
    async fn test_redis_ratelimiter() {
        let limiter = match get_test_ratelimiter(RateLimitPolicy::new("test", 2, 1)).await {
            Some(l) => l,
            None => return,
        };

        let key = "test_user_1";

        let res = limiter.check(key).await.unwrap();
        assert!(res.allowed);
        assert_eq!(res.remaining, 1);

        let res = limiter.check(key).await.unwrap();
        assert!(res.allowed);
        assert_eq!(res.remaining, 0);

        let res = limiter.check(key).await.unwrap();
        assert!(!res.allowed);

        // Wait for the window to expire
        tokio::time::sleep(Duration::from_millis(1500)).await;

        let res = limiter.check(key).await.unwrap();
        assert!(res.allowed);
    }
}
