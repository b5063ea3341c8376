//! # Client Configuration
//!
//! Settings for the catalog API and the local cart store.
//! Values come from environment variables (a `.env` file is honoured).

use cart_core::{CartError, DEFAULT_CART_KEY};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_API_URL: &str = "http://localhost:3333";
const DEFAULT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_STORE_DIR: &str = ".cart";

/// Adapter configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Catalog API base URL, without trailing slash
    pub api_base_url: String,

    /// Per-request timeout for catalog calls
    pub timeout: Duration,

    /// Directory the file store writes into
    pub store_dir: PathBuf,

    /// Key the cart blob is stored under
    pub storage_key: String,
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// All variables are optional:
    /// - `CATALOG_API_URL` (default `http://localhost:3333`)
    /// - `CATALOG_TIMEOUT_SECS` (default 10)
    /// - `CART_STORE_DIR` (default `.cart`)
    /// - `CART_STORAGE_KEY` (default `@RocketShoes:cart`)
    pub fn from_env() -> Result<Self, CartError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let mut config = Self::default();

        if let Ok(url) = env::var("CATALOG_API_URL") {
            config = config.with_api_base_url(url);
        }

        if let Ok(secs) = env::var("CATALOG_TIMEOUT_SECS") {
            let secs: u64 = secs.parse().map_err(|_| {
                CartError::Configuration(format!(
                    "CATALOG_TIMEOUT_SECS must be a whole number of seconds, got {secs:?}"
                ))
            })?;
            if secs == 0 {
                return Err(CartError::Configuration(
                    "CATALOG_TIMEOUT_SECS must be greater than zero".to_string(),
                ));
            }
            config.timeout = Duration::from_secs(secs);
        }

        if let Ok(dir) = env::var("CART_STORE_DIR") {
            config.store_dir = PathBuf::from(dir);
        }

        if let Ok(key) = env::var("CART_STORAGE_KEY") {
            if key.trim().is_empty() {
                return Err(CartError::Configuration(
                    "CART_STORAGE_KEY must not be empty".to_string(),
                ));
            }
            config.storage_key = key;
        }

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), CartError> {
        if !self.api_base_url.starts_with("http://") && !self.api_base_url.starts_with("https://")
        {
            return Err(CartError::Configuration(format!(
                "CATALOG_API_URL must start with http:// or https://, got {}",
                self.api_base_url
            )));
        }
        Ok(())
    }

    /// Builder: set the catalog base URL
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Builder: set the store directory
    pub fn with_store_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.store_dir = dir.into();
        self
    }

    /// URL of a product record
    pub fn product_url(&self, product_id: u64) -> String {
        format!("{}/products/{}", self.api_base_url, product_id)
    }

    /// URL of a stock record
    pub fn stock_url(&self, product_id: u64) -> String {
        format!("{}/stock/{}", self.api_base_url, product_id)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            store_dir: PathBuf::from(DEFAULT_STORE_DIR),
            storage_key: DEFAULT_CART_KEY.to_string(),
        }
    }
}
