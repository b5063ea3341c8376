//! # HTTP Catalog
//!
//! [`CatalogService`] over the storefront catalog API:
//! `GET /products/{id}` and `GET /stock/{id}`.

use crate::config::ClientConfig;
use async_trait::async_trait;
use cart_core::{
    CartError, CartResult, CatalogResource, CatalogService, Product, ProductId, StockEntry,
};
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::{debug, error, instrument};

/// Catalog client backed by reqwest
pub struct HttpCatalog {
    config: ClientConfig,
    client: Client,
}

impl HttpCatalog {
    /// Create a catalog client
    pub fn new(config: ClientConfig) -> CartResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| CartError::Configuration(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self { config, client })
    }

    /// Create from environment variables
    pub fn from_env() -> CartResult<Self> {
        let config = ClientConfig::from_env()?;
        Self::new(config)
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        resource: CatalogResource,
        product_id: ProductId,
        url: &str,
    ) -> CartResult<T> {
        debug!("GET {}", url);

        let unavailable = |message: String| CartError::catalog(resource, product_id, message);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| unavailable(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| unavailable(e.to_string()))?;

        if !status.is_success() {
            error!("Catalog API error: status={}, body={}", status, body);
            return Err(unavailable(format!("HTTP {status}")));
        }

        serde_json::from_str(&body)
            .map_err(|e| unavailable(format!("Failed to parse {resource} response: {e}")))
    }
}

#[async_trait]
impl CatalogService for HttpCatalog {
    #[instrument(skip(self))]
    async fn product(&self, product_id: ProductId) -> CartResult<Product> {
        let url = self.config.product_url(product_id);
        let product: Product = self
            .fetch(CatalogResource::Product, product_id, &url)
            .await?;

        if product.id != product_id {
            return Err(CartError::catalog(
                CatalogResource::Product,
                product_id,
                format!("catalog answered with product {}", product.id),
            ));
        }

        // Catalog records never carry a cart quantity
        Ok(product.with_amount(0))
    }

    #[instrument(skip(self))]
    async fn stock(&self, product_id: ProductId) -> CartResult<StockEntry> {
        let url = self.config.stock_url(product_id);
        self.fetch(CatalogResource::Stock, product_id, &url).await
    }
}
