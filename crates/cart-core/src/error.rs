//! # Cart Error Types
//!
//! Typed errors for cart operations and the collaborators behind them.
//! The controller never hands these to callers as `Err`; they travel inside
//! [`CartOutcome::Rejected`](crate::CartOutcome) and into the logs.

use crate::product::ProductId;
use thiserror::Error;

/// Which catalog endpoint a lookup went to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogResource {
    Product,
    Stock,
}

impl CatalogResource {
    pub fn as_str(&self) -> &'static str {
        match self {
            CatalogResource::Product => "product",
            CatalogResource::Stock => "stock",
        }
    }
}

impl std::fmt::Display for CatalogResource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Core error type for cart operations
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CartError {
    /// Product is not a line item of the cart
    #[error("Product {product_id} is not in the cart")]
    NotInCart { product_id: ProductId },

    /// Product or stock lookup failed (transport, status or decoding)
    #[error("Catalog unavailable for {resource} {product_id}: {message}")]
    CatalogUnavailable {
        resource: CatalogResource,
        product_id: ProductId,
        message: String,
    },

    /// Requested quantity exceeds what the catalog has in stock
    #[error("Out of stock: product {product_id} requested {requested}, available {available}")]
    OutOfStock {
        product_id: ProductId,
        requested: i64,
        available: i64,
    },

    /// Persistent store read/write failure
    #[error("Store error: {0}")]
    Store(String),

    /// Blob encode/decode error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Decoded blob breaks the cart invariants
    #[error("Invalid cart: {0}")]
    InvalidCart(String),

    /// Missing or malformed configuration
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl CartError {
    /// Shorthand for a catalog failure
    pub fn catalog(
        resource: CatalogResource,
        product_id: ProductId,
        message: impl Into<String>,
    ) -> Self {
        CartError::CatalogUnavailable {
            resource,
            product_id,
            message: message.into(),
        }
    }

    /// Returns true if the failure is environmental and may succeed later
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            CartError::CatalogUnavailable { .. } | CartError::Store(_)
        )
    }
}

impl From<serde_json::Error> for CartError {
    fn from(err: serde_json::Error) -> Self {
        CartError::Serialization(err.to_string())
    }
}

/// Result type alias for cart operations
pub type CartResult<T> = Result<T, CartError>;
