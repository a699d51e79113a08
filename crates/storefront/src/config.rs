//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `VENDORA_API_BASE_URL` - Base URL of the backend REST API (including
//!   any path prefix, e.g. `https://api.vendora.dev/api/v1`)
//!
//! ## Optional
//! - `VENDORA_HOST` - Bind address (default: 127.0.0.1)
//! - `VENDORA_PORT` - Listen port (default: 3000)
//! - `VENDORA_BASE_URL` - Public URL for the storefront (default: derived from host/port)
//! - `VENDORA_DATA_DIR` - Directory for persisted state snapshots (default: ./data)
//! - `VENDORA_CONTENT_DIR` - Directory holding markdown pages and blog posts (default: ./content)
//! - `VENDORA_PAYMENT_PUBLISHABLE_KEY` - Publishable key for the hosted payment element
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment tag (default: development)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Sentry tracing sample rate (default: 0.1)

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use thiserror::Error;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Base URL of the backend REST API
    pub api_base_url: String,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the storefront
    pub base_url: String,
    /// Directory for persisted state snapshots
    pub data_dir: PathBuf,
    /// Directory holding markdown pages and blog posts
    pub content_dir: PathBuf,
    /// Publishable key for the hosted payment element (safe to expose)
    pub payment_publishable_key: Option<String>,
    /// Sentry configuration
    pub sentry: SentryConfig,
}

/// Sentry error tracking configuration.
#[derive(Debug, Clone, Default)]
pub struct SentryConfig {
    /// Sentry DSN; tracking is disabled when absent
    pub dsn: Option<String>,
    /// Environment tag (development, staging, production)
    pub environment: String,
    /// Tracing sample rate (0.0 - 1.0)
    pub traces_sample_rate: f32,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let api_base_url = get_api_base_url("VENDORA_API_BASE_URL")?;
        let host = get_env_or_default("VENDORA_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("VENDORA_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("VENDORA_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("VENDORA_PORT".to_string(), e.to_string()))?;
        let base_url = get_optional_env("VENDORA_BASE_URL")
            .unwrap_or_else(|| format!("http://{host}:{port}"));
        let data_dir = PathBuf::from(get_env_or_default("VENDORA_DATA_DIR", "./data"));
        let content_dir = PathBuf::from(get_env_or_default("VENDORA_CONTENT_DIR", "./content"));
        let payment_publishable_key = get_optional_env("VENDORA_PAYMENT_PUBLISHABLE_KEY");
        let sentry = SentryConfig::from_env()?;

        Ok(Self {
            api_base_url,
            host,
            port,
            base_url,
            data_dir,
            content_dir,
            payment_publishable_key,
            sentry,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl SentryConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let traces_sample_rate = get_env_or_default("SENTRY_TRACES_SAMPLE_RATE", "0.1")
            .parse::<f32>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("SENTRY_TRACES_SAMPLE_RATE".to_string(), e.to_string())
            })?;

        Ok(Self {
            dsn: get_optional_env("SENTRY_DSN"),
            environment: get_env_or_default("SENTRY_ENVIRONMENT", "development"),
            traces_sample_rate,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Load and validate the backend API base URL.
///
/// The URL must parse and use http or https; a trailing slash is stripped so
/// path joining stays uniform downstream.
fn get_api_base_url(key: &str) -> Result<String, ConfigError> {
    let raw = get_required_env(key)?;
    let parsed = url::Url::parse(&raw)
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("unsupported scheme '{}'", parsed.scheme()),
        ));
    }

    Ok(raw.trim_end_matches('/').to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_socket_addr() {
        let config = StorefrontConfig {
            api_base_url: "https://api.example.com/api/v1".to_string(),
            host: "127.0.0.1".parse().unwrap(),
            port: 3000,
            base_url: "http://localhost:3000".to_string(),
            data_dir: PathBuf::from("./data"),
            content_dir: PathBuf::from("./content"),
            payment_publishable_key: None,
            sentry: SentryConfig::default(),
        };

        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 3000);
    }

    #[test]
    fn test_api_base_url_trailing_slash_stripped() {
        // Env-var helpers are global; validate the parsing logic directly.
        let parsed = url::Url::parse("https://api.example.com/api/v1/").unwrap();
        assert_eq!(parsed.scheme(), "https");
        assert_eq!(
            "https://api.example.com/api/v1/".trim_end_matches('/'),
            "https://api.example.com/api/v1"
        );
    }

    #[test]
    fn test_api_base_url_rejects_non_http_scheme() {
        let parsed = url::Url::parse("ftp://api.example.com").unwrap();
        assert!(!matches!(parsed.scheme(), "http" | "https"));
    }
}
