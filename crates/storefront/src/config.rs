//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `STORE_API_URL` - Base URL of the store's REST API
//!   (e.g., `http://localhost:8000/api`)
//! - `STRIPE_PUBLISHABLE_KEY` - Payment processor publishable key
//!   (safe to expose client-side)
//!
//! ## Optional
//! - `STORE_TOKEN_FILE` - Path for persisted auth tokens
//!   (default: `$HOME/.copperleaf/tokens.json`)
//! - `SENTRY_DSN` - Sentry error tracking DSN

use std::path::PathBuf;

use thiserror::Error;
use url::Url;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront client configuration.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Base URL of the store's REST API.
    pub api_base_url: Url,
    /// Payment processor publishable key (safe to expose client-side).
    pub payment_publishable_key: String,
    /// Where the auth token pair is persisted between runs.
    pub token_file: PathBuf,
    /// Sentry DSN for error tracking.
    pub sentry_dsn: Option<String>,
}

impl StoreConfig {
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

        let api_base_url = get_required_env("STORE_API_URL")?
            .parse::<Url>()
            .map_err(|e| ConfigError::InvalidEnvVar("STORE_API_URL".to_string(), e.to_string()))?;
        if api_base_url.host_str().is_none() {
            return Err(ConfigError::InvalidEnvVar(
                "STORE_API_URL".to_string(),
                "URL must have a host".to_string(),
            ));
        }

        let payment_publishable_key = get_required_env("STRIPE_PUBLISHABLE_KEY")?;
        let token_file = get_optional_env("STORE_TOKEN_FILE")
            .map_or_else(default_token_file, PathBuf::from);
        let sentry_dsn = get_optional_env("SENTRY_DSN");

        Ok(Self {
            api_base_url,
            payment_publishable_key,
            token_file,
            sentry_dsn,
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

/// Default token path: `$HOME/.copperleaf/tokens.json`, falling back to the
/// working directory when `HOME` is unset.
fn default_token_file() -> PathBuf {
    std::env::var_os("HOME").map_or_else(
        || PathBuf::from(".copperleaf-tokens.json"),
        |home| PathBuf::from(home).join(".copperleaf").join("tokens.json"),
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_token_file_is_under_home_when_set() {
        // HOME is set in the test environment on unix
        if std::env::var_os("HOME").is_some() {
            let path = default_token_file();
            assert!(path.ends_with(".copperleaf/tokens.json"));
        }
    }

    #[test]
    fn test_api_url_requires_host() {
        let url = "data:text/plain,hello".parse::<Url>().unwrap();
        assert!(url.host_str().is_none());
    }
}
