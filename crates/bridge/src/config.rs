//! Bridge configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Shops (all optional - an unset shop is skipped by the selector)
//! - `SHOP_PRIMARY_DOMAIN` - Primary shop domain (e.g., shop-b.myshopify.com)
//! - `SHOP_PRIMARY_STOREFRONT_TOKEN` - Primary shop Storefront API access token
//! - `SHOP_SECONDARY_DOMAIN` - Secondary shop domain
//! - `SHOP_SECONDARY_STOREFRONT_TOKEN` - Secondary shop Storefront API access token
//!
//! ## Optional
//! - `BRIDGE_HOST` - Bind address (default: 127.0.0.1)
//! - `BRIDGE_PORT` - Listen port (default: 8080)
//! - `SHOPIFY_API_VERSION` - Storefront API version (default: 2024-10)
//! - `MAPPING_PATH` - Path to the SKU mapping file (default: mapping.json)
//! - `MAPPING_JSON` - Inline JSON mapping blob; takes precedence over the file
//! - `SENTRY_DSN` - Sentry error tracking DSN

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Bridge application configuration.
#[derive(Debug, Clone)]
pub struct BridgeConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Shopify Storefront API version used for all outbound calls
    pub api_version: String,
    /// Candidate backend shops, in selection priority order
    pub shops: ShopsConfig,
    /// Where the SKU mapping is read from
    pub mapping: MappingSource,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
}

/// The fixed set of candidate shops.
#[derive(Debug, Clone)]
pub struct ShopsConfig {
    pub primary: ShopConfig,
    pub secondary: ShopConfig,
}

/// One backend shop: domain + Storefront API access token.
///
/// Implements `Debug` manually to redact the token.
#[derive(Clone)]
pub struct ShopConfig {
    /// Shop domain (e.g., shop-b.myshopify.com)
    pub domain: String,
    /// Storefront API access token
    pub access_token: SecretString,
}

impl ShopConfig {
    /// Whether this shop has both a domain and a token.
    ///
    /// An unconfigured shop is classified unhealthy without any network call.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        !self.domain.is_empty() && !self.access_token.expose_secret().is_empty()
    }
}

impl std::fmt::Debug for ShopConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShopConfig")
            .field("domain", &self.domain)
            .field("access_token", &"[REDACTED]")
            .finish()
    }
}

/// Source of the SKU→variant mapping.
#[derive(Debug, Clone)]
pub enum MappingSource {
    /// Read and parse a JSON file on disk.
    File(PathBuf),
    /// Parse a JSON blob embedded in the environment.
    Inline(String),
}

impl BridgeConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if host or port are present but unparseable.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("BRIDGE_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("BRIDGE_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("BRIDGE_PORT", "8080")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("BRIDGE_PORT".to_string(), e.to_string()))?;
        let api_version = get_env_or_default("SHOPIFY_API_VERSION", "2024-10");

        let shops = ShopsConfig {
            primary: shop_from_env("SHOP_PRIMARY_DOMAIN", "SHOP_PRIMARY_STOREFRONT_TOKEN"),
            secondary: shop_from_env("SHOP_SECONDARY_DOMAIN", "SHOP_SECONDARY_STOREFRONT_TOKEN"),
        };

        // The inline blob wins over the file so that file-less deployments can
        // embed the mapping directly in the environment.
        let mapping = match get_optional_env("MAPPING_JSON") {
            Some(blob) => MappingSource::Inline(blob),
            None => MappingSource::File(PathBuf::from(get_env_or_default(
                "MAPPING_PATH",
                "mapping.json",
            ))),
        };

        let sentry_dsn = get_optional_env("SENTRY_DSN");

        Ok(Self {
            host,
            port,
            api_version,
            shops,
            mapping,
            sentry_dsn,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

/// Read one shop's config; missing variables yield empty fields, which the
/// selector treats as "not configured" rather than an error.
fn shop_from_env(domain_key: &str, token_key: &str) -> ShopConfig {
    ShopConfig {
        domain: get_env_or_default(domain_key, ""),
        access_token: SecretString::from(get_env_or_default(token_key, "")),
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
