use std::time::Duration;

use anyhow::Context;
use serde::Deserialize;

/// Minimum HS512 key length in bytes.
pub const MIN_JWT_SECRET_BYTES: usize = 64;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub access_ttl_minutes: i64,
}

impl JwtConfig {
    pub fn access_ttl(&self) -> Duration {
        Duration::from_secs((self.access_ttl_minutes.max(0) as u64) * 60)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DbConfig {
    pub url: String,
    pub max_connections: u32,
    pub max_idle_secs: u64,
    pub query_timeout_secs: u64,
}

impl DbConfig {
    pub fn query_timeout(&self) -> Duration {
        Duration::from_secs(self.query_timeout_secs)
    }
}

/// Argon2 work factor.
#[derive(Debug, Clone, Deserialize)]
pub struct HashConfig {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for HashConfig {
    fn default() -> Self {
        Self {
            memory_kib: argon2::Params::DEFAULT_M_COST,
            iterations: argon2::Params::DEFAULT_T_COST,
            parallelism: argon2::Params::DEFAULT_P_COST,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    pub host: String,
    pub port: u16,
    pub request_timeout_secs: u64,
    /// Honour `X-Real-IP` / `X-Forwarded-For` when resolving the client address.
    pub trust_proxy_headers: bool,
    pub cookie_secure: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub db: DbConfig,
    pub jwt: JwtConfig,
    pub hash: HashConfig,
    pub http: HttpConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let secret = std::env::var("JWT_SECRET").context("JWT_SECRET must be set")?;
        anyhow::ensure!(
            secret.len() >= MIN_JWT_SECRET_BYTES,
            "JWT_SECRET must be at least {MIN_JWT_SECRET_BYTES} bytes"
        );

        let defaults = HashConfig::default();
        Ok(Self {
            db: DbConfig {
                url: std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
                max_connections: env_or("DB_MAX_CONNECTIONS", 10),
                max_idle_secs: env_or("DB_MAX_IDLE_SECS", 15 * 60),
                query_timeout_secs: env_or("DB_QUERY_TIMEOUT_SECS", 5),
            },
            jwt: JwtConfig {
                secret,
                access_ttl_minutes: env_or("ACCESS_TOKEN_TTL_MINUTES", 15),
            },
            hash: HashConfig {
                memory_kib: env_or("HASH_MEMORY_KIB", defaults.memory_kib),
                iterations: env_or("HASH_ITERATIONS", defaults.iterations),
                parallelism: env_or("HASH_PARALLELISM", defaults.parallelism),
            },
            http: HttpConfig {
                host: std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
                port: env_or("APP_PORT", 8080),
                request_timeout_secs: env_or("REQUEST_TIMEOUT_SECS", 60),
                trust_proxy_headers: env_or("TRUST_PROXY_HEADERS", false),
                cookie_secure: env_or("COOKIE_SECURE", false),
            },
        })
    }
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "0123456789abcdef0123456789abcdef0123456789abcdef0123456789abcdef";

    #[test]
    fn from_env_applies_defaults() {
        temp_env::with_vars(
            [
                ("DATABASE_URL", Some("postgres://localhost/tokensmith")),
                ("JWT_SECRET", Some(SECRET)),
                ("ACCESS_TOKEN_TTL_MINUTES", None),
                ("APP_PORT", None),
                ("DB_QUERY_TIMEOUT_SECS", None),
                ("TRUST_PROXY_HEADERS", None),
            ],
            || {
                let cfg = AppConfig::from_env().expect("config loads");
                assert_eq!(cfg.db.url, "postgres://localhost/tokensmith");
                assert_eq!(cfg.jwt.access_ttl(), Duration::from_secs(15 * 60));
                assert_eq!(cfg.db.query_timeout(), Duration::from_secs(5));
                assert_eq!(cfg.http.port, 8080);
                assert!(!cfg.http.trust_proxy_headers);
            },
        );
    }

    #[test]
    fn from_env_reads_overrides() {
        temp_env::with_vars(
            [
                ("DATABASE_URL", Some("postgres://db/app")),
                ("JWT_SECRET", Some(SECRET)),
                ("ACCESS_TOKEN_TTL_MINUTES", Some("30")),
                ("APP_PORT", Some("9090")),
                ("TRUST_PROXY_HEADERS", Some("true")),
                ("HASH_ITERATIONS", Some("3")),
            ],
            || {
                let cfg = AppConfig::from_env().expect("config loads");
                assert_eq!(cfg.jwt.access_ttl_minutes, 30);
                assert_eq!(cfg.http.port, 9090);
                assert!(cfg.http.trust_proxy_headers);
                assert_eq!(cfg.hash.iterations, 3);
            },
        );
    }

    #[test]
    fn from_env_rejects_short_secret() {
        temp_env::with_vars(
            [
                ("DATABASE_URL", Some("postgres://db/app")),
                ("JWT_SECRET", Some("access_secret")),
            ],
            || {
                let err = AppConfig::from_env().unwrap_err();
                assert!(err.to_string().contains("JWT_SECRET"));
            },
        );
    }

    #[test]
    fn from_env_requires_database_url() {
        temp_env::with_vars(
            [("DATABASE_URL", None), ("JWT_SECRET", Some(SECRET))],
            || {
                assert!(AppConfig::from_env().is_err());
            },
        );
    }
}
