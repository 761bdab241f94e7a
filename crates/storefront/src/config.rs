//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `STAYHUB_API_BASE_URL` - Base URL of the marketplace data API
//!
//! ## Optional
//! - `STAYHUB_API_KEY` - Bearer token sent with every API request
//! - `STAYHUB_REQUEST_TIMEOUT_SECS` - Deadline for each API call (default: 10)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

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
    /// Marketplace data API configuration
    pub api: ApiConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., production, staging)
    pub sentry_environment: Option<String>,
}

/// Marketplace data API configuration.
///
/// Implements `Debug` manually to redact the API key.
#[derive(Clone)]
pub struct ApiConfig {
    /// Base URL, always ending in `/` so relative joins keep the path prefix
    pub base_url: Url,
    /// Optional bearer token
    pub api_key: Option<SecretString>,
    /// Deadline applied to every remote call
    pub request_timeout: Duration,
}

impl std::fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiConfig")
            .field("base_url", &self.base_url.as_str())
            .field(
                "api_key",
                &self.api_key.as_ref().map(|_| "[REDACTED]"),
            )
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
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

        Ok(Self {
            api: ApiConfig::from_env()?,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
        })
    }
}

impl ApiConfig {
    /// Build an API configuration from explicit values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` if the base URL cannot be parsed
    /// or cannot serve as a base (e.g. `mailto:`).
    pub fn new(base_url: &str, request_timeout: Duration) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: parse_base_url(base_url)?,
            api_key: None,
            request_timeout,
        })
    }

    fn from_env() -> Result<Self, ConfigError> {
        let base_url = parse_base_url(&get_required_env("STAYHUB_API_BASE_URL")?)?;
        let api_key = get_optional_env("STAYHUB_API_KEY").map(SecretString::from);
        let timeout_secs = get_env_or_default(
            "STAYHUB_REQUEST_TIMEOUT_SECS",
            &DEFAULT_REQUEST_TIMEOUT_SECS.to_string(),
        );
        let request_timeout = parse_timeout(&timeout_secs, "STAYHUB_REQUEST_TIMEOUT_SECS")?;

        Ok(Self {
            base_url,
            api_key,
            request_timeout,
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

/// Get an optional environment variable, treating empty values as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse the API base URL, normalizing it to end with a slash.
fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let mut normalized = raw.trim().to_string();
    if !normalized.ends_with('/') {
        normalized.push('/');
    }

    let url = Url::parse(&normalized).map_err(|e| {
        ConfigError::InvalidEnvVar("STAYHUB_API_BASE_URL".to_string(), e.to_string())
    })?;

    if url.cannot_be_a_base() {
        return Err(ConfigError::InvalidEnvVar(
            "STAYHUB_API_BASE_URL".to_string(),
            "must be an http(s) URL".to_string(),
        ));
    }

    Ok(url)
}

/// Parse a positive number of seconds.
fn parse_timeout(raw: &str, var_name: &str) -> Result<Duration, ConfigError> {
    let secs = raw
        .trim()
        .parse::<u64>()
        .map_err(|e| ConfigError::InvalidEnvVar(var_name.to_string(), e.to_string()))?;

    if secs == 0 {
        return Err(ConfigError::InvalidEnvVar(
            var_name.to_string(),
            "must be greater than zero".to_string(),
        ));
    }

    Ok(Duration::from_secs(secs))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_base_url_appends_slash() {
        let url = parse_base_url("https://api.stayhub.test/v1").unwrap();
        assert_eq!(url.as_str(), "https://api.stayhub.test/v1/");
        assert_eq!(
            url.join("comparisons").unwrap().as_str(),
            "https://api.stayhub.test/v1/comparisons"
        );
    }

    #[test]
    fn test_parse_base_url_keeps_existing_slash() {
        let url = parse_base_url("http://localhost:8080/").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/");
    }

    #[test]
    fn test_parse_base_url_invalid() {
        let err = parse_base_url("not a url").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(_, _)));
    }

    #[test]
    fn test_parse_base_url_rejects_non_base() {
        assert!(parse_base_url("mailto:someone@example.com").is_err());
    }

    #[test]
    fn test_parse_timeout() {
        assert_eq!(
            parse_timeout("15", "TEST_VAR").unwrap(),
            Duration::from_secs(15)
        );
        assert!(parse_timeout("0", "TEST_VAR").is_err());
        assert!(parse_timeout("soon", "TEST_VAR").is_err());
    }

    #[test]
    fn test_api_config_debug_redacts_key() {
        let mut config = ApiConfig::new("https://api.stayhub.test", Duration::from_secs(5)).unwrap();
        config.api_key = Some(SecretString::from("super_secret_api_key"));

        let debug_output = format!("{config:?}");

        assert!(debug_output.contains("https://api.stayhub.test/"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("super_secret_api_key"));
    }
}
