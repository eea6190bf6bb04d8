//! Server configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `BAKELEDGER_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//!
//! ## Optional
//! - `BAKELEDGER_HOST` - Bind address (default: 127.0.0.1)
//! - `BAKELEDGER_PORT` - Listen port (default: 3000)
//! - `BAKELEDGER_BASE_URL` - Public URL (default: `http://localhost:3000`); an
//!   `https` URL marks the session cookie `Secure`
//! - `BAKELEDGER_STATIC_DIR` - Directory served for non-API paths (default: public)
//! - `BAKELEDGER_CURRENCY` - ISO 4217 code used in printed reports (default: BRL)
//! - `BAKELEDGER_RECIPE_CACHE_CAPACITY` - Max cached recipe costings (default: 500)
//! - `BAKELEDGER_RECIPE_CACHE_TTL_SECS` - Recipe costing TTL in seconds (default: 600)
//! - `LOG_FORMAT` - `json` for JSON log lines, anything else for text
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error sample rate, 0.0 to 1.0 (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Transaction sample rate, 0.0 to 1.0 (default: 0.0)

use std::fmt::Display;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use bakeledger_core::CurrencyCode;
use secrecy::SecretString;
use thiserror::Error;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl LogFormat {
    fn from_value(value: Option<&str>) -> Self {
        match value {
            Some(v) if v.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Text,
        }
    }
}

/// Bounds for the recipe costing cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecipeCacheConfig {
    /// Maximum number of cached recipes.
    pub capacity: u64,
    /// How long a cached costing stays valid.
    pub ttl: Duration,
}

impl Default for RecipeCacheConfig {
    fn default() -> Self {
        Self {
            capacity: 500,
            ttl: Duration::from_secs(600),
        }
    }
}

/// Server application configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL
    pub base_url: String,
    /// Directory of static assets served as the fallback route
    pub static_dir: PathBuf,
    /// Currency used when printing amounts
    pub currency: CurrencyCode,
    /// Recipe costing cache bounds
    pub recipe_cache: RecipeCacheConfig,
    /// Log line format
    pub log_format: LogFormat,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate
    pub sentry_sample_rate: f32,
    /// Sentry transaction sample rate
    pub sentry_traces_sample_rate: f32,
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the database URL is missing or a variable
    /// cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let database_url = get_database_url("BAKELEDGER_DATABASE_URL")?;
        let host = parse_env("BAKELEDGER_HOST", "127.0.0.1")?;
        let port = parse_env("BAKELEDGER_PORT", "3000")?;
        let base_url = get_env_or_default("BAKELEDGER_BASE_URL", "http://localhost:3000");
        let static_dir = PathBuf::from(get_env_or_default("BAKELEDGER_STATIC_DIR", "public"));
        let currency = parse_env("BAKELEDGER_CURRENCY", "BRL")?;

        let recipe_cache = RecipeCacheConfig {
            capacity: parse_env("BAKELEDGER_RECIPE_CACHE_CAPACITY", "500")?,
            ttl: Duration::from_secs(parse_env("BAKELEDGER_RECIPE_CACHE_TTL_SECS", "600")?),
        };

        let log_format = LogFormat::from_value(get_optional_env("LOG_FORMAT").as_deref());

        let sentry_dsn = get_optional_env("SENTRY_DSN");
        let sentry_environment = get_optional_env("SENTRY_ENVIRONMENT");
        let sentry_sample_rate = parse_sample_rate("SENTRY_SAMPLE_RATE", "1.0")?;
        let sentry_traces_sample_rate = parse_sample_rate("SENTRY_TRACES_SAMPLE_RATE", "0.0")?;

        Ok(Self {
            database_url,
            host,
            port,
            base_url,
            static_dir,
            currency,
            recipe_cache,
            log_format,
            sentry_dsn,
            sentry_environment,
            sentry_sample_rate,
            sentry_traces_sample_rate,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether the session cookie must only be sent over HTTPS.
    #[must_use]
    pub fn secure_cookies(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get database URL with fallback to generic `DATABASE_URL`.
fn get_database_url(primary_key: &str) -> Result<SecretString, ConfigError> {
    if let Ok(value) = std::env::var(primary_key) {
        return Ok(SecretString::from(value));
    }
    if let Ok(value) = std::env::var("DATABASE_URL") {
        return Ok(SecretString::from(value));
    }
    Err(ConfigError::MissingEnvVar(primary_key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse an environment variable, falling back to `default` when unset.
fn parse_env<T>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    parse_value(key, &get_env_or_default(key, default))
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    raw.trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

fn parse_sample_rate(key: &str, default: &str) -> Result<f32, ConfigError> {
    let rate: f32 = parse_env(key, default)?;
    check_sample_rate(key, rate)
}

fn check_sample_rate(key: &str, rate: f32) -> Result<f32, ConfigError> {
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
    use super::*;

    fn config(base_url: &str) -> ServerConfig {
        ServerConfig {
            database_url: SecretString::from("postgres://localhost/test"),
            host: "127.0.0.1".parse().unwrap(),
            port: 3000,
            base_url: base_url.to_string(),
            static_dir: PathBuf::from("public"),
            currency: CurrencyCode::BRL,
            recipe_cache: RecipeCacheConfig::default(),
            log_format: LogFormat::Text,
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.0,
        }
    }

    #[test]
    fn test_socket_addr() {
        let addr = config("http://localhost:3000").socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 3000);
    }

    #[test]
    fn test_secure_cookies_follow_scheme() {
        assert!(!config("http://localhost:3000").secure_cookies());
        assert!(config("https://ledger.example.com").secure_cookies());
    }

    #[test]
    fn test_parse_value() {
        let port: u16 = parse_value("PORT", " 8080 ").unwrap();
        assert_eq!(port, 8080);

        let currency: CurrencyCode = parse_value("CURRENCY", "usd").unwrap();
        assert_eq!(currency, CurrencyCode::USD);

        let err = parse_value::<u16>("PORT", "eighty").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref key, _) if key == "PORT"));
    }

    #[test]
    fn test_sample_rate_bounds() {
        assert!(check_sample_rate("RATE", 0.0).is_ok());
        assert!(check_sample_rate("RATE", 1.0).is_ok());
        assert!(check_sample_rate("RATE", 1.5).is_err());
        assert!(check_sample_rate("RATE", -0.1).is_err());
    }

    #[test]
    fn test_log_format() {
        assert_eq!(LogFormat::from_value(Some("JSON")), LogFormat::Json);
        assert_eq!(LogFormat::from_value(Some("pretty")), LogFormat::Text);
        assert_eq!(LogFormat::from_value(None), LogFormat::Text);
    }

    #[test]
    fn test_database_url_debug_is_redacted() {
        let debug_output = format!("{:?}", config("http://localhost:3000"));
        assert!(!debug_output.contains("postgres://localhost/test"));
    }
}
