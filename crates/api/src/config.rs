//! Service configuration loaded from environment variables.

use std::time::Duration;

use thiserror::Error;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_USER_SERVICE_URL: &str = "http://localhost:8081";
const DEFAULT_RPC_TIMEOUT_MS: u64 = 5000;

/// Configuration problems detected at startup.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    #[error("invalid value for {name}: {value:?}")]
    Invalid { name: &'static str, value: String },
}

/// Configuration shared by both service binaries.
///
/// Reads from environment variables:
/// - `HOST`: bind address (default: `"0.0.0.0"`)
/// - `PORT`: listen port (default: `8080`)
/// - `RUST_LOG`: tracing filter directive (default: `"info"`)
/// - `STORE_URL`: Postgres connection string; the in-memory store is used when unset
/// - `USER_TABLE`: name of the user item table (required)
/// - `ORDER_TABLE`: name of the order item table (required)
/// - `USER_SERVICE_URL`: base URL of the user service (default: `"http://localhost:8081"`)
/// - `RPC_TIMEOUT_MS`: per-call deadline for user lookups (default: `5000`)
///
/// Empty values count as unset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub log_level: String,
    pub store_url: Option<String>,
    pub user_table: String,
    pub order_table: String,
    pub user_service_url: String,
    pub rpc_timeout: Duration,
}

impl Config {
    /// Loads configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Loads configuration through `lookup`, which returns the raw value of a variable.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |name: &str| lookup(name).filter(|value| !value.is_empty());
        let required = |name: &'static str| get(name).ok_or(ConfigError::Missing(name));

        let port = match get("PORT") {
            Some(raw) => raw.parse().map_err(|_| ConfigError::Invalid {
                name: "PORT",
                value: raw,
            })?,
            None => DEFAULT_PORT,
        };

        let rpc_timeout_ms = match get("RPC_TIMEOUT_MS") {
            Some(raw) => match raw.parse::<u64>() {
                Ok(ms) if ms > 0 => ms,
                _ => {
                    return Err(ConfigError::Invalid {
                        name: "RPC_TIMEOUT_MS",
                        value: raw,
                    });
                }
            },
            None => DEFAULT_RPC_TIMEOUT_MS,
        };

        Ok(Self {
            host: get("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            log_level: get("RUST_LOG").unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
            store_url: get("STORE_URL"),
            user_table: required("USER_TABLE")?,
            order_table: required("ORDER_TABLE")?,
            user_service_url: get("USER_SERVICE_URL")
                .unwrap_or_else(|| DEFAULT_USER_SERVICE_URL.to_string()),
            rpc_timeout: Duration::from_millis(rpc_timeout_ms),
        })
    }

    /// Returns the `"host:port"` bind address string.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
