//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `TEXPRESS_API_URL` - Base URL of the T-Express API (e.g. `https://api.t-express.sn/api`)
//!
//! ## Optional
//! - `TEXPRESS_STORAGE_URL` - Public storage base URL (default: API URL without its `/api` suffix)
//! - `TEXPRESS_DEFAULT_IMAGE` - Image shown for products without pictures (default: `/images/produit-defaut.png`)
//! - `TEXPRESS_CURRENCY` - Display currency (default: XOF)
//! - `TEXPRESS_HTTP_TIMEOUT_SECS` - Request timeout in seconds (default: 30)
//! - `TEXPRESS_CATEGORIES_TTL_SECS` - Category list cache lifetime (default: 300)
//! - `TEXPRESS_SESSION_FILE` - File used to persist the session (default: `.texpress-session.json`)
//! - `SENTRY_DSN` - Sentry error tracking DSN

use std::path::PathBuf;
use std::time::Duration;

use texpress_core::CurrencyCode;
use thiserror::Error;
use url::Url;

/// Default image path used when a product has no pictures.
pub const DEFAULT_PRODUCT_IMAGE: &str = "/images/produit-defaut.png";

/// Path suffix stripped from the API URL to obtain the storage base URL.
const API_PATH_SUFFIX: &str = "/api";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Top-level client configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP gateway configuration
    pub api: ApiConfig,
    /// Image/storage configuration used by the view adapters
    pub storage: StorageConfig,
    /// Currency used when building display prices
    pub currency: CurrencyCode,
    /// Lifetime of the cached category list
    pub categories_ttl: Duration,
    /// Where the CLI persists `auth_token` and `user_data`
    pub session_file: PathBuf,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
}

/// T-Express API gateway configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base API URL, always without a trailing slash
    pub base_url: String,
    /// Per-request timeout
    pub timeout: Duration,
}

/// Storage configuration for resolving image references.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Public base URL of the backend storage, without a trailing slash
    pub base_url: String,
    /// Canonical fallback image path
    pub default_image: String,
}

impl Config {
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

        let api_url = get_required_env("TEXPRESS_API_URL")?;
        let timeout = parse_env_or_default("TEXPRESS_HTTP_TIMEOUT_SECS", 30)?;
        let api = ApiConfig::new(&api_url, Duration::from_secs(timeout))?;

        let storage = StorageConfig {
            base_url: match get_optional_env("TEXPRESS_STORAGE_URL") {
                Some(url) => normalize_url("TEXPRESS_STORAGE_URL", &url)?,
                None => derive_storage_url(&api.base_url),
            },
            default_image: get_env_or_default("TEXPRESS_DEFAULT_IMAGE", DEFAULT_PRODUCT_IMAGE),
        };

        let currency = get_env_or_default("TEXPRESS_CURRENCY", "XOF")
            .parse::<CurrencyCode>()
            .map_err(|e| ConfigError::InvalidEnvVar("TEXPRESS_CURRENCY".to_string(), e))?;
        let categories_ttl = parse_env_or_default("TEXPRESS_CATEGORIES_TTL_SECS", 300)?;

        Ok(Self {
            api,
            storage,
            currency,
            categories_ttl: Duration::from_secs(categories_ttl),
            session_file: PathBuf::from(get_env_or_default(
                "TEXPRESS_SESSION_FILE",
                ".texpress-session.json",
            )),
            sentry_dsn: get_optional_env("SENTRY_DSN"),
        })
    }

    /// Build a configuration for the given API URL with every optional
    /// setting at its default.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` if the URL cannot be parsed.
    pub fn for_api_url(api_url: &str) -> Result<Self, ConfigError> {
        let api = ApiConfig::new(api_url, Duration::from_secs(30))?;
        let storage = StorageConfig {
            base_url: derive_storage_url(&api.base_url),
            default_image: DEFAULT_PRODUCT_IMAGE.to_string(),
        };

        Ok(Self {
            api,
            storage,
            currency: CurrencyCode::default(),
            categories_ttl: Duration::from_secs(300),
            session_file: PathBuf::from(".texpress-session.json"),
            sentry_dsn: None,
        })
    }
}

impl ApiConfig {
    /// Validate and normalise an API base URL.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` if the URL cannot be parsed or is
    /// not HTTP(S).
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: normalize_url("TEXPRESS_API_URL", base_url)?,
            timeout,
        })
    }

    /// Join an endpoint path onto the base URL.
    #[must_use]
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Derive the storage base URL by stripping the API path suffix.
fn derive_storage_url(api_url: &str) -> String {
    api_url
        .strip_suffix(API_PATH_SUFFIX)
        .unwrap_or(api_url)
        .to_string()
}

/// Parse a URL and return it without a trailing slash.
fn normalize_url(var_name: &str, value: &str) -> Result<String, ConfigError> {
    let url = Url::parse(value.trim())
        .map_err(|e| ConfigError::InvalidEnvVar(var_name.to_string(), e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            var_name.to_string(),
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }
    Ok(url.as_str().trim_end_matches('/').to_string())
}

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse a numeric environment variable, falling back to a default.
fn parse_env_or_default(key: &str, default: u64) -> Result<u64, ConfigError> {
    get_optional_env(key).map_or(Ok(default), |value| {
        value
            .trim()
            .parse::<u64>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_storage_url_strips_api_suffix() {
        assert_eq!(
            derive_storage_url("https://api.t-express.sn/api"),
            "https://api.t-express.sn"
        );
        assert_eq!(
            derive_storage_url("http://localhost:8000"),
            "http://localhost:8000"
        );
    }

    #[test]
    fn test_normalize_url_trims_trailing_slash() {
        assert_eq!(
            normalize_url("X", "http://localhost:8000/api/").unwrap(),
            "http://localhost:8000/api"
        );
    }

    #[test]
    fn test_normalize_url_rejects_garbage_and_other_schemes() {
        assert!(matches!(
            normalize_url("X", "not a url"),
            Err(ConfigError::InvalidEnvVar(_, _))
        ));
        assert!(matches!(
            normalize_url("X", "ftp://files.t-express.sn"),
            Err(ConfigError::InvalidEnvVar(_, _))
        ));
    }

    #[test]
    fn test_for_api_url_defaults() {
        let config = Config::for_api_url("http://127.0.0.1:8000/api/").unwrap();
        assert_eq!(config.api.base_url, "http://127.0.0.1:8000/api");
        assert_eq!(config.storage.base_url, "http://127.0.0.1:8000");
        assert_eq!(config.storage.default_image, DEFAULT_PRODUCT_IMAGE);
        assert_eq!(config.currency, CurrencyCode::XOF);
    }

    #[test]
    fn test_endpoint_join() {
        let api = ApiConfig::new("http://localhost/api", Duration::from_secs(1)).unwrap();
        assert_eq!(api.endpoint("/panier/contenu"), "http://localhost/api/panier/contenu");
        assert_eq!(api.endpoint("panier/contenu"), "http://localhost/api/panier/contenu");
    }
}
