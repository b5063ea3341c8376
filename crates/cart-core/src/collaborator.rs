//! # Collaborator Traits
//!
//! The controller talks to the outside world through three seams:
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────┐
//! │                       CartController                          │
//! └───────┬───────────────────────┬───────────────────────┬───────┘
//!         │                       │                       │
//!  ┌──────┴────────┐      ┌───────┴───────┐       ┌───────┴───────┐
//!  │CatalogService │      │   CartStore   │       │   Notifier    │
//!  │ product/stock │      │ get/set blob  │       │ user notices  │
//!  └───────────────┘      └───────────────┘       └───────────────┘
//!    HttpCatalog            FileStore               TracingNotifier
//!    MemoryCatalog          MemoryStore             RecordingNotifier
//! ```

use crate::error::CartResult;
use crate::notice::Notice;
use crate::product::{Product, ProductId, StockEntry};
use async_trait::async_trait;
use std::sync::Arc;

/// Product and stock lookups.
///
/// Implementations report every failure (transport, status, decoding) as
/// [`CartError::CatalogUnavailable`](crate::CartError::CatalogUnavailable).
#[async_trait]
pub trait CatalogService: Send + Sync {
    /// Fetch the catalog record for a product. The returned record has no
    /// cart amount.
    async fn product(&self, product_id: ProductId) -> CartResult<Product>;

    /// Fetch the current stock level for a product.
    async fn stock(&self, product_id: ProductId) -> CartResult<StockEntry>;
}

/// Key-value storage that survives a reload.
pub trait CartStore: Send + Sync {
    /// Read the blob stored under `key`, if any.
    fn get(&self, key: &str) -> CartResult<Option<String>>;

    /// Replace the blob stored under `key`.
    fn set(&self, key: &str, blob: &str) -> CartResult<()>;
}

/// Sink for user-facing notices (toasts, status lines, logs).
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: &Notice);
}

pub type BoxedCatalog = Arc<dyn CatalogService>;
pub type BoxedStore = Arc<dyn CartStore>;
pub type BoxedNotifier = Arc<dyn Notifier>;
