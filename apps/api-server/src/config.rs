//! Application configuration loaded from environment variables.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use eventix_infra::auth::{DEFAULT_JWT_SECRET, JwtConfig};
use eventix_infra::database::DatabaseConfig;

use crate::background::SchedulerConfig;
use crate::middleware::cors::CorsConfig;
use crate::middleware::session::SessionCookieConfig;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("JWT_SECRET must be set when RUST_ENV=production")]
    MissingSecret,

    #[error("Invalid value for {var}: {value:?}")]
    Invalid { var: &'static str, value: String },
}

/// Which rate limiter backs the route groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitStrategy {
    Fixed,
    Gcra,
    Redis,
}

impl FromStr for RateLimitStrategy {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fixed" => Ok(Self::Fixed),
            "gcra" => Ok(Self::Gcra),
            "redis" => Ok(Self::Redis),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RateLimitSettings {
    pub strategy: RateLimitStrategy,
    pub redis_url: String,
    pub redis_connect_timeout: Duration,
    /// Cron expression for the purge of expired windows.
    pub purge_cron: String,
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub production: bool,
    pub database: Option<DatabaseConfig>,
    pub jwt: JwtConfig,
    pub cookie: SessionCookieConfig,
    pub cors: CorsConfig,
    /// Key rate limits on the hop the nearest proxy appended to `X-Forwarded-For`.
    pub trust_proxy: bool,
    pub upload_dir: PathBuf,
    pub rate_limit: RateLimitSettings,
    pub scheduler: SchedulerConfig,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let production = var("RUST_ENV").is_some_and(|v| v.eq_ignore_ascii_case("production"));

        let secret = match var("JWT_SECRET") {
            Some(secret) => secret,
            None if production => return Err(ConfigError::MissingSecret),
            None => {
                tracing::warn!("JWT_SECRET not set; using the development secret");
                DEFAULT_JWT_SECRET.to_string()
            }
        };
        let ttl_seconds: i64 = parse(&var, "SESSION_TTL_SECS", 3600)?;

        let database = var("DATABASE_URL")
            .map(|url| -> Result<DatabaseConfig, ConfigError> {
                Ok(DatabaseConfig {
                    url,
                    max_connections: parse(&var, "DB_MAX_CONNECTIONS", 100)?,
                    min_connections: parse(&var, "DB_MIN_CONNECTIONS", 10)?,
                    connect_timeout: Duration::from_secs(parse(&var, "DB_CONNECT_TIMEOUT_SECS", 10)?),
                })
            })
            .transpose()?;

        let strategy = match var("RATE_LIMIT_STRATEGY") {
            Some(value) => value.parse().map_err(|()| ConfigError::Invalid {
                var: "RATE_LIMIT_STRATEGY",
                value,
            })?,
            None => RateLimitStrategy::Fixed,
        };

        Ok(Self {
            host: var("HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port: parse(&var, "PORT", 4000)?,
            production,
            database,
            jwt: JwtConfig {
                secret,
                ttl_seconds,
                issuer: var("JWT_ISSUER").unwrap_or_else(|| "eventix-api".to_string()),
            },
            cookie: SessionCookieConfig {
                name: "token".to_string(),
                secure: production,
                ttl_seconds,
            },
            cors: CorsConfig {
                allowed_origins: var("CORS_ORIGINS")
                    .unwrap_or_else(|| "http://localhost:5173".to_string())
                    .split(',')
                    .map(|o| o.trim().trim_end_matches('/').to_string())
                    .filter(|o| !o.is_empty())
                    .collect(),
                allow_localhost: parse_flag(&var, "CORS_ALLOW_LOCALHOST", true),
            },
            trust_proxy: parse_flag(&var, "TRUST_PROXY", false),
            upload_dir: var("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("uploads")),
            rate_limit: RateLimitSettings {
                strategy,
                redis_url: var("REDIS_URL").unwrap_or_else(|| "redis://localhost:6379".to_string()),
                redis_connect_timeout: Duration::from_secs(parse(
                    &var,
                    "REDIS_CONNECT_TIMEOUT_SECS",
                    5,
                )?),
                purge_cron: var("RATE_LIMIT_PURGE_CRON")
                    .unwrap_or_else(|| "0 * * * * *".to_string()),
            },
            scheduler: SchedulerConfig {
                enabled: parse_flag(&var, "SCHEDULER_ENABLED", true),
            },
        })
    }
}

fn parse<T: FromStr>(
    var: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match var(key) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { var: key, value }),
        None => Ok(default),
    }
}

fn parse_flag(var: &impl Fn(&str) -> Option<String>, key: &str, default: bool) -> bool {
    var(key)
        .map(|v| v != "false" && v != "0")
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(pairs: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();

        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 4000);
        assert!(!config.production);
        assert!(config.database.is_none());
        assert_eq!(config.jwt.secret, DEFAULT_JWT_SECRET);
        assert_eq!(config.jwt.ttl_seconds, 3600);
        assert_eq!(config.cookie.name, "token");
        assert!(!config.cookie.secure);
        assert_eq!(config.cors.allowed_origins, vec!["http://localhost:5173"]);
        assert!(!config.trust_proxy);
        assert_eq!(config.rate_limit.strategy, RateLimitStrategy::Fixed);
        assert_eq!(config.upload_dir, PathBuf::from("uploads"));
    }

    #[test]
    fn test_production_requires_secret() {
        assert!(matches!(
            load(&[("RUST_ENV", "production")]),
            Err(ConfigError::MissingSecret)
        ));

        let config = load(&[("RUST_ENV", "production"), ("JWT_SECRET", "s3cret")]).unwrap();
        assert!(config.production);
        assert!(config.cookie.secure);
    }

    #[test]
    fn test_database_and_cors_overrides() {
        let config = load(&[
            ("DATABASE_URL", "postgres://localhost/eventix"),
            ("DB_MAX_CONNECTIONS", "5"),
            ("CORS_ORIGINS", "https://a.example, https://b.example/"),
            ("CORS_ALLOW_LOCALHOST", "false"),
            ("TRUST_PROXY", "true"),
        ])
        .unwrap();

        assert!(config.trust_proxy);

        let db = config.database.unwrap();
        assert_eq!(db.max_connections, 5);
        assert_eq!(db.min_connections, 10);
        assert_eq!(
            config.cors.allowed_origins,
            vec!["https://a.example", "https://b.example"]
        );
        assert!(!config.cors.allow_localhost);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(matches!(
            load(&[("PORT", "eighty")]),
            Err(ConfigError::Invalid { var: "PORT", .. })
        ));
        assert!(matches!(
            load(&[("RATE_LIMIT_STRATEGY", "sliding")]),
            Err(ConfigError::Invalid {
                var: "RATE_LIMIT_STRATEGY",
                ..
            })
        ));
        assert_eq!(
            load(&[("RATE_LIMIT_STRATEGY", "GCRA")]).unwrap().rate_limit.strategy,
            RateLimitStrategy::Gcra
        );
    }
}
