//! Server configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All optional:
//! - `BV_HOST` - Bind address (default: 127.0.0.1)
//! - `BV_PORT` - Listen port (falls back to `PORT`, default: 3000)
//! - `BV_TOKEN_TTL_SECS` - Bearer token lifetime in seconds (default: 86400)
//! - `BV_CATALOG_PATH` - JSON catalog replacing the built-in listings
//! - `BV_STATIC_DIR` - Directory of the single-page app bundle
//! - `BV_CORS_ORIGINS` - Comma-separated allowed origins (default: any)
//! - `BV_AUTH_RATE_LIMIT` - `on`/`off` rate limiting of login and register (default: on)
//! - `BV_LOG_JSON` - Emit JSON logs when set to a truthy value
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error sample rate, 0.0 to 1.0 (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Transaction sample rate, 0.0 to 1.0 (default: 0.0)

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_TOKEN_TTL_SECS: u64 = 86_400;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// How long an issued bearer token stays valid
    pub token_ttl: Duration,
    /// Catalog file replacing the built-in listings
    pub catalog_path: Option<PathBuf>,
    /// Single-page app bundle served for non-API paths
    pub static_dir: Option<PathBuf>,
    /// Allowed CORS origins; empty allows any origin
    pub cors_origins: Vec<String>,
    /// Rate limit the login and register endpoints
    pub auth_rate_limit: bool,
    /// Structured JSON log output
    pub log_json: bool,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate
    pub sentry_sample_rate: f32,
    /// Sentry transaction sample rate
    pub sentry_traces_sample_rate: f32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: DEFAULT_PORT,
            token_ttl: Duration::from_secs(DEFAULT_TOKEN_TTL_SECS),
            catalog_path: None,
            static_dir: None,
            cors_origins: Vec::new(),
            auth_rate_limit: true,
            log_json: false,
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.0,
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but cannot be parsed.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let host = parse_or(get("BV_HOST"), "BV_HOST", defaults.host)?;
        let port = match get("BV_PORT") {
            Some(value) => parse_value(&value, "BV_PORT")?,
            None => parse_or(get("PORT"), "PORT", defaults.port)?,
        };
        let token_ttl_secs: u64 = parse_or(
            get("BV_TOKEN_TTL_SECS"),
            "BV_TOKEN_TTL_SECS",
            DEFAULT_TOKEN_TTL_SECS,
        )?;
        if token_ttl_secs == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "BV_TOKEN_TTL_SECS".to_string(),
                "must be greater than zero".to_string(),
            ));
        }

        let auth_rate_limit = match get("BV_AUTH_RATE_LIMIT") {
            Some(value) => parse_switch(&value, "BV_AUTH_RATE_LIMIT")?,
            None => defaults.auth_rate_limit,
        };
        let log_json = match get("BV_LOG_JSON") {
            Some(value) => parse_switch(&value, "BV_LOG_JSON")?,
            None => defaults.log_json,
        };

        let sentry_sample_rate = parse_rate(get("SENTRY_SAMPLE_RATE"), "SENTRY_SAMPLE_RATE", 1.0)?;
        let sentry_traces_sample_rate = parse_rate(
            get("SENTRY_TRACES_SAMPLE_RATE"),
            "SENTRY_TRACES_SAMPLE_RATE",
            0.0,
        )?;

        Ok(Self {
            host,
            port,
            token_ttl: Duration::from_secs(token_ttl_secs),
            catalog_path: get("BV_CATALOG_PATH").map(PathBuf::from),
            static_dir: get("BV_STATIC_DIR").map(PathBuf::from),
            cors_origins: backlink_vista_core::catalog::split_list(
                get("BV_CORS_ORIGINS").as_deref(),
            ),
            auth_rate_limit,
            log_json,
            sentry_dsn: get("SENTRY_DSN"),
            sentry_environment: get("SENTRY_ENVIRONMENT"),
            sentry_sample_rate,
            sentry_traces_sample_rate,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

fn parse_value<T>(value: &str, key: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

fn parse_or<T>(value: Option<String>, key: &str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value.map_or(Ok(default), |v| parse_value(&v, key))
}

/// Parse an on/off style switch.
fn parse_switch(value: &str, key: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Ok(true),
        "0" | "false" | "off" | "no" => Ok(false),
        other => Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("expected on or off, got '{other}'"),
        )),
    }
}

/// Parse a sample rate in `[0.0, 1.0]`.
fn parse_rate(value: Option<String>, key: &str, default: f32) -> Result<f32, ConfigError> {
    let rate: f32 = parse_or(value, key, default)?;
    if (0.0..=1.0).contains(&rate) {
        Ok(rate)
    } else {
        Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("must be between 0.0 and 1.0 (got {rate})"),
        ))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(pairs: &[(&str, &str)]) -> Result<ServerConfig, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        ServerConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:3000");
        assert_eq!(config.token_ttl, Duration::from_secs(86_400));
        assert!(config.auth_rate_limit);
        assert!(config.cors_origins.is_empty());
        assert!(config.catalog_path.is_none());
    }

    #[test]
    fn test_port_falls_back_to_generic_port() {
        let config = config_from(&[("PORT", "8080")]).unwrap();
        assert_eq!(config.port, 8080);

        let config = config_from(&[("PORT", "8080"), ("BV_PORT", "9000")]).unwrap();
        assert_eq!(config.port, 9000);
    }

    #[test]
    fn test_invalid_port() {
        let err = config_from(&[("BV_PORT", "not-a-port")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(key, _) if key == "BV_PORT"));
    }

    #[test]
    fn test_zero_token_ttl_rejected() {
        assert!(config_from(&[("BV_TOKEN_TTL_SECS", "0")]).is_err());
    }

    #[test]
    fn test_switches() {
        let config = config_from(&[("BV_AUTH_RATE_LIMIT", "off"), ("BV_LOG_JSON", "1")]).unwrap();
        assert!(!config.auth_rate_limit);
        assert!(config.log_json);

        assert!(config_from(&[("BV_AUTH_RATE_LIMIT", "maybe")]).is_err());
    }

    #[test]
    fn test_cors_origins_split() {
        let config = config_from(&[(
            "BV_CORS_ORIGINS",
            "http://localhost:5173, https://app.example.com",
        )])
        .unwrap();
        assert_eq!(
            config.cors_origins,
            vec!["http://localhost:5173", "https://app.example.com"]
        );
    }

    #[test]
    fn test_sample_rate_bounds() {
        assert!(config_from(&[("SENTRY_SAMPLE_RATE", "1.5")]).is_err());
        let config = config_from(&[("SENTRY_TRACES_SAMPLE_RATE", "0.25")]).unwrap();
        assert!((config.sentry_traces_sample_rate - 0.25).abs() < f32::EPSILON);
    }
}
