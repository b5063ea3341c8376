//! # Application State
//!
//! Shared state for the catalog fixture server: configuration and the
//! product/stock table loaded from `config/catalog.toml`.

use cart_core::{Product, ProductId, StockEntry};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

/// Errors raised while bringing the server up
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Failed to read {path}: {source}")]
    CatalogRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    CatalogParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Duplicate product id {0} in catalog")]
    DuplicateProduct(ProductId),
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Explicit catalog file (otherwise the default locations are searched)
    pub catalog_file: Option<PathBuf>,
}

impl ServerConfig {
    /// Load from environment variables (`HOST`, `PORT`, `CATALOG_FILE`)
    pub fn from_env() -> Result<Self, ServerError> {
        dotenvy::dotenv().ok();

        let port = match std::env::var("PORT") {
            Ok(p) => p.parse().map_err(|_| {
                ServerError::Configuration(format!("PORT is not a port number: {p:?}"))
            })?,
            Err(_) => 3333,
        };

        Ok(Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port,
            catalog_file: std::env::var("CATALOG_FILE").ok().map(PathBuf::from),
        })
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> Result<SocketAddr, ServerError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|_| {
                ServerError::Configuration(format!(
                    "Invalid socket address {}:{}",
                    self.host, self.port
                ))
            })
    }
}

/// A catalog row: the product plus its stock level
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: ProductId,
    pub name: String,
    pub price: f64,
    pub image_url: String,
    #[serde(default)]
    pub stock: i64,
}

impl CatalogEntry {
    pub fn product(&self) -> Product {
        Product::new(self.id, self.name.clone(), self.price, self.image_url.clone())
    }

    pub fn stock_entry(&self) -> StockEntry {
        StockEntry::new(self.id, self.stock)
    }
}

/// Product and stock table served by the fixture server
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FixtureCatalog {
    #[serde(default)]
    pub products: Vec<CatalogEntry>,
}

impl FixtureCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: add a row
    pub fn with_entry(mut self, entry: CatalogEntry) -> Self {
        self.products.push(entry);
        self
    }

    pub fn get(&self, id: ProductId) -> Option<&CatalogEntry> {
        self.products.iter().find(|p| p.id == id)
    }

    /// Parse a TOML catalog, rejecting duplicate ids
    pub fn from_toml(path: &Path, toml_str: &str) -> Result<Self, ServerError> {
        let catalog: Self = toml::from_str(toml_str).map_err(|source| ServerError::CatalogParse {
            path: path.to_path_buf(),
            source,
        })?;

        let mut seen = std::collections::HashSet::new();
        for entry in &catalog.products {
            if !seen.insert(entry.id) {
                return Err(ServerError::DuplicateProduct(entry.id));
            }
        }
        Ok(catalog)
    }

    /// Load a catalog file
    pub fn load(path: &Path) -> Result<Self, ServerError> {
        let content = std::fs::read_to_string(path).map_err(|source| ServerError::CatalogRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(path, &content)
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<FixtureCatalog>,
    pub config: ServerConfig,
}

impl AppState {
    /// Create state from the environment, loading the catalog file
    pub fn new() -> Result<Self, ServerError> {
        let config = ServerConfig::from_env()?;
        let catalog = load_fixture_catalog(config.catalog_file.as_deref())?;
        Ok(Self::with_catalog(config, catalog))
    }

    pub fn with_catalog(config: ServerConfig, catalog: FixtureCatalog) -> Self {
        Self {
            catalog: Arc::new(catalog),
            config,
        }
    }
}

/// Load the catalog from an explicit path, or search the default locations
fn load_fixture_catalog(explicit: Option<&Path>) -> Result<FixtureCatalog, ServerError> {
    if let Some(path) = explicit {
        let catalog = FixtureCatalog::load(path)?;
        tracing::info!("Loaded {} products from {}", catalog.products.len(), path.display());
        return Ok(catalog);
    }

    let config_paths = [
        "config/catalog.toml",
        "../config/catalog.toml",
        "../../config/catalog.toml",
    ];

    for path in config_paths {
        let path = Path::new(path);
        if path.exists() {
            let catalog = FixtureCatalog::load(path)?;
            tracing::info!("Loaded {} products from {}", catalog.products.len(), path.display());
            return Ok(catalog);
        }
    }

    tracing::warn!("No catalog file found, serving an empty catalog");
    Ok(FixtureCatalog::new())
}
