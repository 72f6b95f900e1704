//! # Eventix Infrastructure
//!
//! Concrete implementations of the ports defined in `eventix-core`:
//! stores, session tokens, password hashing, rate limiters and blob storage.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - In-memory stores and the fixed window limiter only
//! - `postgres` - PostgreSQL repositories via SeaORM
//! - `auth` - JWT + Argon2 authentication
//! - `rate-limit` - GCRA rate limiting via governor
//! - `redis` - Redis-backed fixed window rate limiting

pub mod database;
pub mod rate_limit;
pub mod storage;

#[cfg(feature = "auth")]
pub mod auth;

// Re-exports - In-Memory
pub use database::{
    DatabaseConfig, DatabaseConnections, InMemoryEventRepository, InMemoryTicketRepository,
    InMemoryUserRepository,
};
pub use rate_limit::FixedWindowRateLimiter;
pub use storage::LocalBlobStore;

#[cfg(feature = "postgres")]
pub use database::{PostgresEventRepository, PostgresTicketRepository, PostgresUserRepository};

#[cfg(feature = "auth")]
pub use auth::{Argon2PasswordService, JwtConfig, JwtTokenService};

#[cfg(feature = "rate-limit")]
pub use rate_limit::GcraRateLimiter;

// Re-exports - Redis
#[cfg(feature = "redis")]
pub use rate_limit::{RedisConfig, RedisRateLimiter};
