//! Application configuration loaded from environment variables.
//!
//! Every value is read once at startup and never changes afterwards. The
//! defaults reproduce the classic setup: 5 requests per 10 second window,
//! served on port 8080.
//!
//! - `HOST`: Bind address (default: `0.0.0.0`)
//! - `PORT`: Bind port (default: 8080)
//! - `RATE_LIMIT_MAX_REQUESTS`: Requests admitted per window (default: 5)
//! - `RATE_LIMIT_WINDOW_SECS`: Window length in seconds (default: 10)
//! - `METRICS_PORT`: Prometheus exporter port (default: 0 = disabled)
//!
//! Logging is controlled separately through `RUST_LOG` (default: `info`).

use std::env;
use std::net::SocketAddr;
use std::time::Duration;

use crate::error::{AppError, AppResult};

/// Requests admitted per window unless overridden.
pub const DEFAULT_MAX_REQUESTS: u32 = 5;

/// Window length unless overridden.
pub const DEFAULT_WINDOW: Duration = Duration::from_secs(10);

pub const DEFAULT_PORT: u16 = 8080;

/// Application configuration loaded from environment variables.
///
/// # Example
///
/// ```rust,ignore
/// let config = Config::from_env()?;
/// println!("Server will listen on {}", config.server_addr());
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    // =========================================================================
    // Server Configuration
    // =========================================================================
    /// Server host address (default: "0.0.0.0")
    pub host: String,

    /// Server port (default: 8080)
    pub port: u16,

    // =========================================================================
    // Rate Limiting Configuration
    // =========================================================================
    /// Maximum requests admitted per window, across all callers (default: 5)
    pub max_requests: u32,

    /// Length of one window; the counter is cleared at the end of each (default: 10s)
    pub window: Duration,

    // =========================================================================
    // Observability Configuration
    // =========================================================================
    /// Port for Prometheus metrics endpoint (default: 0 = disabled)
    pub metrics_port: u16,
}

impl Config {
    /// Load configuration from environment variables with defaults.
    ///
    /// # Errors
    ///
    /// Returns `AppError::ConfigError` if a variable cannot be parsed. Range
    /// checks on the limit and window happen when the counter is built.
    pub fn from_env() -> AppResult<Self> {
        // Load an .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Ok(Self {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: Self::parse_env("PORT", DEFAULT_PORT)?,
            max_requests: Self::parse_env("RATE_LIMIT_MAX_REQUESTS", DEFAULT_MAX_REQUESTS)?,
            window: Duration::from_secs(Self::parse_env(
                "RATE_LIMIT_WINDOW_SECS",
                DEFAULT_WINDOW.as_secs(),
            )?),
            metrics_port: Self::parse_env("METRICS_PORT", 0)?,
        })
    }

    /// Get the full server address for binding.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Check if Prometheus metrics export is enabled.
    pub fn metrics_enabled(&self) -> bool {
        self.metrics_port > 0
    }

    /// Get the metrics endpoint address.
    ///
    /// Returns `None` if metrics are disabled (port = 0).
    pub fn metrics_addr(&self) -> Option<SocketAddr> {
        self.metrics_enabled()
            .then(|| SocketAddr::from(([0, 0, 0, 0], self.metrics_port)))
    }

    /// Parse an environment variable into the specified type with a default value.
    fn parse_env<T>(name: &str, default: T) -> AppResult<T>
    where
        T: std::str::FromStr,
        T::Err: std::fmt::Display,
    {
        match env::var(name) {
            Ok(val) => Self::parse_value(name, &val),
            Err(_) => Ok(default),
        }
    }

    fn parse_value<T>(name: &str, raw: &str) -> AppResult<T>
    where
        T: std::str::FromStr,
        T::Err: std::fmt::Display,
    {
        raw.trim()
            .parse()
            .map_err(|e| AppError::ConfigError(format!("Invalid {name}: {e}")))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            max_requests: DEFAULT_MAX_REQUESTS,
            window: DEFAULT_WINDOW,
            metrics_port: 0,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_values() {
        let config = Config::default();

        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8080);
        assert_eq!(config.max_requests, 5);
        assert_eq!(config.window, Duration::from_secs(10));
        assert!(!config.metrics_enabled());
        assert!(config.metrics_addr().is_none());
    }

    #[test]
    fn test_server_addr_format() {
        let config = Config {
            host: "127.0.0.1".to_string(),
            port: 9000,
            ..Config::default()
        };

        assert_eq!(config.server_addr(), "127.0.0.1:9000");
    }

    #[test]
    fn test_metrics_addr_when_enabled() {
        let config = Config {
            metrics_port: 9090,
            ..Config::default()
        };

        assert_eq!(
            config.metrics_addr(),
            Some(SocketAddr::from(([0, 0, 0, 0], 9090)))
        );
    }

    #[test]
    fn test_parse_env_missing_uses_default() {
        let value: u32 = Config::parse_env("WINDOW_GATE_TEST_UNSET_VARIABLE", 42).unwrap();
        assert_eq!(value, 42);
    }

    #[test]
    fn test_parse_value_trims_whitespace() {
        let value: u32 = Config::parse_value("RATE_LIMIT_MAX_REQUESTS", " 12 ").unwrap();
        assert_eq!(value, 12);
    }

    #[test]
    fn test_parse_value_non_numeric_is_config_error() {
        let result: AppResult<u32> = Config::parse_value("RATE_LIMIT_MAX_REQUESTS", "five");

        let err = result.unwrap_err();
        assert!(matches!(err, AppError::ConfigError(_)));
        assert!(err.to_string().contains("Invalid RATE_LIMIT_MAX_REQUESTS"));
    }

    #[test]
    fn test_parse_value_out_of_range_port_is_config_error() {
        let result: AppResult<u16> = Config::parse_value("PORT", "70000");
        assert!(matches!(result, Err(AppError::ConfigError(_))));
    }
}
