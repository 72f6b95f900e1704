//! Rate limiting implementations.

mod memory;

pub use memory::FixedWindowRateLimiter;

#[cfg(feature = "rate-limit")]
mod gcra;
#[cfg(feature = "rate-limit")]
pub use gcra::GcraRateLimiter;

#[cfg(feature = "redis")]
mod redis;
#[cfg(feature = "redis")]
pub use self::redis::{RedisConfig, RedisRateLimiter};
