//! Platform configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional. With none set, the platform runs in demo mode:
//! sample products, demo accounts, state under `./.plugon`.
//!
//! - `PLUGON_API_BASE_URL` - PlugOn API root (e.g., `https://api.plugon.co.kr`).
//!   Unset means demo mode.
//! - `PLUGON_CATALOG` - `auto`, `remote` or `static` (default: `auto`)
//! - `PLUGON_STORAGE_DIR` - Directory for persisted state (default: `.plugon`)
//! - `PLUGON_SESSION_KEY` - Storage key for the session (default: `plugon-demo-user`)
//! - `PLUGON_CART_KEY` - Storage key for the cart (default: `plugon-cart`)
//! - `PLUGON_COOKIE_KEY` - Storage key for API session cookies
//!   (default: `plugon-api-cookies`)
//! - `PLUGON_CATALOG_CACHE_TTL_SECS` - Remote product cache TTL (default: 300)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

use crate::models::keys;

const DEFAULT_STORAGE_DIR: &str = ".plugon";
const DEFAULT_CATALOG_CACHE_TTL_SECS: &str = "300";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Which product catalog backing to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CatalogSource {
    /// Remote when an API base URL is configured, static otherwise.
    #[default]
    Auto,
    /// Always the remote API.
    Remote,
    /// Always the built-in sample table.
    Static,
}

impl std::str::FromStr for CatalogSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "remote" => Ok(Self::Remote),
            "static" => Ok(Self::Static),
            _ => Err(format!("expected auto, remote or static, got {s}")),
        }
    }
}

/// PlugOn platform configuration.
#[derive(Debug, Clone)]
pub struct PlugonConfig {
    /// PlugOn API root; `None` runs in demo mode
    pub api_base_url: Option<Url>,
    /// Product catalog backing
    pub catalog_source: CatalogSource,
    /// Directory holding persisted session and cart documents
    pub storage_dir: PathBuf,
    /// Storage key for the session identity
    pub session_key: String,
    /// Storage key for the cart lines
    pub cart_key: String,
    /// Storage key for the API session cookies
    pub cookie_key: String,
    /// How long remote product lookups stay cached
    pub catalog_cache_ttl: Duration,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "production", "staging")
    pub sentry_environment: Option<String>,
}

impl Default for PlugonConfig {
    fn default() -> Self {
        Self {
            api_base_url: None,
            catalog_source: CatalogSource::Auto,
            storage_dir: PathBuf::from(DEFAULT_STORAGE_DIR),
            session_key: keys::SESSION.to_string(),
            cart_key: keys::CART.to_string(),
            cookie_key: keys::COOKIES.to_string(),
            catalog_cache_ttl: Duration::from_secs(300),
            sentry_dsn: None,
            sentry_environment: None,
        }
    }
}

impl PlugonConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api_base_url = get_optional(&lookup, "PLUGON_API_BASE_URL")
            .map(|raw| {
                Url::parse(&raw).map_err(|e| {
                    ConfigError::InvalidEnvVar("PLUGON_API_BASE_URL".to_string(), e.to_string())
                })
            })
            .transpose()?;

        let catalog_source = get_or_default(&lookup, "PLUGON_CATALOG", "auto")
            .parse::<CatalogSource>()
            .map_err(|e| ConfigError::InvalidEnvVar("PLUGON_CATALOG".to_string(), e))?;

        if catalog_source == CatalogSource::Remote && api_base_url.is_none() {
            return Err(ConfigError::MissingEnvVar("PLUGON_API_BASE_URL".to_string()));
        }

        let catalog_cache_ttl = get_or_default(
            &lookup,
            "PLUGON_CATALOG_CACHE_TTL_SECS",
            DEFAULT_CATALOG_CACHE_TTL_SECS,
        )
        .parse::<u64>()
        .map(Duration::from_secs)
        .map_err(|e| {
            ConfigError::InvalidEnvVar("PLUGON_CATALOG_CACHE_TTL_SECS".to_string(), e.to_string())
        })?;

        Ok(Self {
            api_base_url,
            catalog_source,
            storage_dir: PathBuf::from(get_or_default(
                &lookup,
                "PLUGON_STORAGE_DIR",
                DEFAULT_STORAGE_DIR,
            )),
            session_key: get_or_default(&lookup, "PLUGON_SESSION_KEY", keys::SESSION),
            cart_key: get_or_default(&lookup, "PLUGON_CART_KEY", keys::CART),
            cookie_key: get_or_default(&lookup, "PLUGON_COOKIE_KEY", keys::COOKIES),
            catalog_cache_ttl,
            sentry_dsn: get_optional(&lookup, "SENTRY_DSN"),
            sentry_environment: get_optional(&lookup, "SENTRY_ENVIRONMENT"),
        })
    }

    /// Demo mode: no API configured, so accounts and products are local.
    #[must_use]
    pub const fn is_demo_mode(&self) -> bool {
        self.api_base_url.is_none()
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional variable, treating empty values as unset.
fn get_optional(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<String> {
    lookup(key).filter(|value| !value.trim().is_empty())
}

/// Get a variable with a default value.
fn get_or_default(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: &str) -> String {
    get_optional(lookup, key).unwrap_or_else(|| default.to_string())
}
