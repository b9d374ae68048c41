//! Application configuration loaded from environment variables.
//!
//! All configuration is loaded once at startup from environment variables
//! (or a `.env` file) with development defaults. The API key secret is read
//! here and handed to the gate, so no request ever touches the process
//! environment.
//!
//! # Security Configuration
//!
//! - `X_API_KEY`: Secret every request under `/api` must present in the
//!   `X-API-Key` header. When unset or empty, the gate rejects every request.
//! - `CORS_ALLOWED_ORIGINS`: Comma-separated list of allowed origins (default: `*` for dev)
//!
//! # Observability
//!
//! - `RUST_LOG`: tracing filter (default: `info`)
//! - `LOG_FORMAT`: `pretty` or `json` (default: `pretty`)
//! - `METRICS_PORT`: Prometheus listener port (default: 0 = disabled)

use std::env;
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;
use std::sync::Arc;

use subtle::ConstantTimeEq;

use crate::error::{AppError, AppResult};

/// Environment variable holding the API key secret.
pub const API_KEY_ENV: &str = "X_API_KEY";

/// The secret the API key gate accepts.
///
/// An empty value is treated exactly like an unset one: the gate has nothing
/// to match against and rejects every request. `Debug` never prints the value.
#[derive(Clone, Default)]
pub struct ApiKeySecret(Option<Arc<str>>);

impl ApiKeySecret {
    /// Wrap a configured secret. Empty strings become "not configured".
    pub fn new(secret: impl Into<String>) -> Self {
        let secret = secret.into();
        if secret.is_empty() {
            Self(None)
        } else {
            Self(Some(Arc::from(secret)))
        }
    }

    /// A secret that matches nothing.
    pub fn unset() -> Self {
        Self(None)
    }

    /// Whether a non-empty secret is configured.
    pub fn is_configured(&self) -> bool {
        self.0.is_some()
    }

    /// Byte-for-byte comparison of `presented` against the secret.
    ///
    /// Runs in constant time for inputs of equal length. Always `false`
    /// when no secret is configured.
    pub fn matches(&self, presented: &[u8]) -> bool {
        match &self.0 {
            Some(secret) => secret.as_bytes().ct_eq(presented).into(),
            None => false,
        }
    }
}

impl fmt::Debug for ApiKeySecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let shown = if self.is_configured() {
            "<redacted>"
        } else {
            "<unset>"
        };
        f.debug_tuple("ApiKeySecret").field(&shown).finish()
    }
}

/// Output format of the tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human readable, for local development
    #[default]
    Pretty,
    /// One JSON object per line, for log shippers
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown log format '{other}' (expected pretty or json)")),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pretty => f.write_str("pretty"),
            Self::Json => f.write_str("json"),
        }
    }
}

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

    /// Server port (default: 3000)
    pub port: u16,

    /// Maximum request body size in bytes (default: 1MB)
    pub max_request_body_size: usize,

    // =========================================================================
    // Security Configuration
    // =========================================================================
    /// Secret for the API key gate, from `X_API_KEY`
    pub api_key: ApiKeySecret,

    /// Allowed CORS origins for the web frontend
    /// Use "*" to allow all origins (not recommended for production)
    pub cors_allowed_origins: Vec<String>,

    // =========================================================================
    // Observability Configuration
    // =========================================================================
    /// Log level filter (e.g., "info", "debug", "retail_api_gate=trace")
    pub log_level: String,

    /// Log output format
    pub log_format: LogFormat,

    /// Port for Prometheus metrics endpoint (default: 0 = disabled)
    pub metrics_port: u16,
}

impl Config {
    /// Load configuration from environment variables with sensible defaults.
    ///
    /// # Errors
    ///
    /// Returns `AppError::ConfigError` if a value cannot be parsed
    /// (e.g., non-numeric PORT, unknown LOG_FORMAT).
    pub fn from_env() -> AppResult<Self> {
        // Load an .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let config = Self {
            // Server
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: Self::parse_env("PORT", 3000)?,
            max_request_body_size: Self::parse_env("MAX_REQUEST_BODY_SIZE", 1024 * 1024)?,

            // Security
            api_key: ApiKeySecret::new(env::var(API_KEY_ENV).unwrap_or_default()),
            cors_allowed_origins: Self::parse_list(
                &env::var("CORS_ALLOWED_ORIGINS").unwrap_or_else(|_| "*".to_string()),
            ),

            // Observability
            log_level: env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            log_format: Self::parse_env("LOG_FORMAT", LogFormat::Pretty)?,
            metrics_port: Self::parse_env("METRICS_PORT", 0)?,
        };

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values for consistency and correctness.
    ///
    /// An unconfigured API key is not an error: the gate fails closed.
    fn validate(&self) -> AppResult<()> {
        if self.max_request_body_size == 0 {
            return Err(AppError::ConfigError(
                "MAX_REQUEST_BODY_SIZE must be greater than 0".to_string(),
            ));
        }

        if self.cors_allowed_origins.is_empty() {
            return Err(AppError::ConfigError(
                "CORS_ALLOWED_ORIGINS must name at least one origin or '*'".to_string(),
            ));
        }

        Ok(())
    }

    /// Get the full server address for binding.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Check if Prometheus metrics export is enabled.
    pub fn metrics_enabled(&self) -> bool {
        self.metrics_port > 0
    }

    /// Get the metrics endpoint address, or `None` when disabled.
    pub fn metrics_addr(&self) -> Option<SocketAddr> {
        self.metrics_enabled()
            .then(|| SocketAddr::from(([0, 0, 0, 0], self.metrics_port)))
    }

    /// Parse an environment variable into the specified type with a default value.
    fn parse_env<T>(name: &str, default: T) -> AppResult<T>
    where
        T: FromStr,
        T::Err: fmt::Display,
    {
        match env::var(name) {
            Ok(val) => Self::parse_value(name, &val),
            Err(_) => Ok(default),
        }
    }

    fn parse_value<T>(name: &str, val: &str) -> AppResult<T>
    where
        T: FromStr,
        T::Err: fmt::Display,
    {
        val.trim()
            .parse()
            .map_err(|e| AppError::ConfigError(format!("Invalid {name}: {e}")))
    }

    /// Split a comma-separated list, dropping blanks.
    fn parse_list(raw: &str) -> Vec<String> {
        raw.split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }
}

/// Default configuration for testing and development.
///
/// Production deployments should use `Config::from_env()` instead.
impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            max_request_body_size: 1024 * 1024,
            api_key: ApiKeySecret::unset(),
            cors_allowed_origins: vec!["*".to_string()],
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
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
        assert_eq!(config.port, 3000);
        assert_eq!(config.max_request_body_size, 1024 * 1024);
        assert!(!config.api_key.is_configured());
        assert!(!config.metrics_enabled());
        assert!(config.metrics_addr().is_none());
    }

    #[test]
    fn test_server_addr_format() {
        let config = Config {
            host: "127.0.0.1".to_string(),
            port: 8080,
            ..Config::default()
        };

        assert_eq!(config.server_addr(), "127.0.0.1:8080");
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
    fn test_empty_secret_is_unset() {
        let secret = ApiKeySecret::new("");
        assert!(!secret.is_configured());
        assert!(!secret.matches(b""));
        assert!(!secret.matches(b"anything"));
    }

    #[test]
    fn test_secret_matches_exact_bytes_only() {
        let secret = ApiKeySecret::new("abc123");

        assert!(secret.matches(b"abc123"));
        assert!(!secret.matches(b"ABC123"));
        assert!(!secret.matches(b"abc123 "));
        assert!(!secret.matches(b" abc123"));
        assert!(!secret.matches(b"abc12"));
        assert!(!secret.matches(b"abc1234"));
        assert!(!secret.matches(b""));
    }

    #[test]
    fn test_secret_debug_is_redacted() {
        let secret = ApiKeySecret::new("super-secret-value");
        let rendered = format!("{secret:?}");
        assert!(!rendered.contains("super-secret-value"));
        assert!(rendered.contains("redacted"));

        let config = Config {
            api_key: secret,
            ..Config::default()
        };
        assert!(!format!("{config:?}").contains("super-secret-value"));
    }

    #[test]
    fn test_log_format_parsing() {
        assert_eq!("json".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!(" JSON ".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!("pretty".parse::<LogFormat>().unwrap(), LogFormat::Pretty);
        assert!("xml".parse::<LogFormat>().is_err());
    }

    #[test]
    fn test_parse_value_reports_variable_name() {
        let result: AppResult<u16> = Config::parse_value("PORT", "not-a-port");
        let err = result.unwrap_err().to_string();
        assert!(err.contains("PORT"));
    }

    #[test]
    fn test_parse_list_drops_blanks() {
        assert_eq!(
            Config::parse_list("https://a.example, ,https://b.example,"),
            vec!["https://a.example", "https://b.example"]
        );
    }

    #[test]
    fn test_validate_body_size_zero() {
        let config = Config {
            max_request_body_size: 0,
            ..Config::default()
        };

        let result = config.validate();
        assert!(result.unwrap_err().to_string().contains("MAX_REQUEST_BODY_SIZE"));
    }

    #[test]
    fn test_validate_empty_cors() {
        let config = Config {
            cors_allowed_origins: vec![],
            ..Config::default()
        };

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_valid_config() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }
}
