use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{name} must be a valid {expected}, got '{value}'")]
    Invalid {
        name: &'static str,
        value: String,
        expected: &'static str,
    },
}

/// Which key-value backend holds the orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    Redis,
    /// Process-local and lost on restart.
    Memory,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub store: StoreKind,
    pub redis_url: String,
    pub redis_pool_size: u32,
    pub redis_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the configuration from `lookup`, which returns the value of a
    /// variable if it is set.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = match lookup("PORT").or_else(|| lookup("SERVER_PORT")) {
            Some(v) => parse("PORT", v, "port number")?,
            None => 3000,
        };
        let store = match lookup("ORDER_STORE").as_deref() {
            None | Some("redis") => StoreKind::Redis,
            Some("memory") => StoreKind::Memory,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    name: "ORDER_STORE",
                    value: other.to_string(),
                    expected: "store kind (redis or memory)",
                })
            }
        };
        let redis_url = lookup("REDIS_URL")
            .or_else(|| lookup("REDIS_ADDR").map(|addr| format!("redis://{addr}")))
            .unwrap_or_else(|| "redis://127.0.0.1:6379".to_string());
        let redis_pool_size = match lookup("REDIS_POOL_SIZE") {
            Some(v) => parse("REDIS_POOL_SIZE", v, "positive integer")?,
            None => 10,
        };
        if redis_pool_size == 0 {
            return Err(ConfigError::Invalid {
                name: "REDIS_POOL_SIZE",
                value: "0".to_string(),
                expected: "positive integer",
            });
        }
        let redis_timeout = match lookup("REDIS_TIMEOUT_SECS") {
            Some(v) => Duration::from_secs(parse("REDIS_TIMEOUT_SECS", v, "number of seconds")?),
            None => Duration::from_secs(5),
        };
        if redis_timeout.is_zero() {
            return Err(ConfigError::Invalid {
                name: "REDIS_TIMEOUT_SECS",
                value: "0".to_string(),
                expected: "positive number of seconds",
            });
        }

        Ok(Self {
            host,
            port,
            store,
            redis_url,
            redis_pool_size,
            redis_timeout,
        })
    }
}

fn parse<T: FromStr>(
    name: &'static str,
    value: String,
    expected: &'static str,
) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::Invalid {
            name,
            value,
            expected,
        })
}
