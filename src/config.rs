//! Gateway configuration loaded from environment variables.
//!
//! Follows 12-factor style: all settings come from environment variables
//! (or a `.env` file via `dotenvy`).

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Context;

/// Output format of the tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable multi-field lines.
    Pretty,
    /// One JSON object per event.
    Json,
}

/// Top-level gateway configuration.
///
/// Loaded once at startup via [`GatewayConfig::from_env`].
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Socket address to bind the HTTP server to (e.g. `0.0.0.0:8082`).
    pub listen_addr: SocketAddr,

    /// Deadline for each outbound WebSocket write.
    pub ws_write_timeout: Duration,

    /// Deadline for REST request handling.
    pub request_timeout: Duration,

    /// Default `tracing` filter when `RUST_LOG` is unset.
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([0, 0, 0, 0], 8082)),
            ws_write_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
        }
    }
}

impl GatewayConfig {
    /// Loads configuration from environment variables.
    ///
    /// Falls back to sensible defaults when a variable is not set.
    /// Calls `dotenvy::dotenv().ok()` to optionally load a `.env` file.
    ///
    /// # Errors
    ///
    /// Returns an error if `LISTEN_ADDR` is set but cannot be parsed as
    /// a [`SocketAddr`].
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let defaults = Self::default();

        let listen_addr = match std::env::var("LISTEN_ADDR") {
            Ok(raw) => raw
                .parse()
                .with_context(|| format!("invalid LISTEN_ADDR {raw:?}"))?,
            Err(_) => defaults.listen_addr,
        };

        let ws_write_timeout = Duration::from_secs(parse_env(
            "WS_WRITE_TIMEOUT_SECS",
            defaults.ws_write_timeout.as_secs(),
        ));
        let request_timeout = Duration::from_secs(parse_env(
            "REQUEST_TIMEOUT_SECS",
            defaults.request_timeout.as_secs(),
        ));

        let log_level = std::env::var("LOG_LEVEL").unwrap_or(defaults.log_level);
        let log_format = match std::env::var("LOG_FORMAT").ok().as_deref() {
            Some("json") | Some("JSON") => LogFormat::Json,
            _ => defaults.log_format,
        };

        Ok(Self {
            listen_addr,
            ws_write_timeout,
            request_timeout,
            log_level,
            log_format,
        })
    }
}

/// Parses an environment variable as `T`, returning `default` on missing
/// or invalid values.
fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_behavior() {
        let config = GatewayConfig::default();
        assert_eq!(config.listen_addr.port(), 8082);
        assert_eq!(config.ws_write_timeout, Duration::from_secs(10));
        assert_eq!(config.log_format, LogFormat::Pretty);
    }

    #[test]
    fn parse_env_falls_back_on_missing_key() {
        let value: u64 = parse_env("TASKHUB_GATEWAY_TEST_UNSET_KEY", 42);
        assert_eq!(value, 42);
    }
}
