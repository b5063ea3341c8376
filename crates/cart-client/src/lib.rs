//! # cart-client
//!
//! I/O adapters that plug a [`CartController`] into the real world:
//!
//! 1. **HttpCatalog** - reqwest client for `/products/{id}` and `/stock/{id}`
//! 2. **FileStore** - one JSON file per key, survives restarts
//! 3. **TracingNotifier** - notices go to the log
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use cart_client::{ClientConfig, open_controller};
//!
//! let config = ClientConfig::from_env()?;
//! let controller = open_controller(&config, Arc::new(TracingNotifier))?;
//!
//! controller.add_product(1).await;
//! ```

pub mod catalog;
pub mod config;
pub mod notify;
pub mod store;

use cart_core::{BoxedNotifier, CartController, CartResult};
use std::sync::Arc;

// Re-exports
pub use catalog::HttpCatalog;
pub use config::ClientConfig;
pub use notify::TracingNotifier;
pub use store::FileStore;

/// Build a controller over the HTTP catalog and the file store described
/// by `config`, restoring any cart saved under its key.
pub fn open_controller(
    config: &ClientConfig,
    notifier: BoxedNotifier,
) -> CartResult<CartController> {
    let catalog = HttpCatalog::new(config.clone())?;
    let store = FileStore::new(config.store_dir.clone());

    Ok(CartController::builder(Arc::new(catalog), Arc::new(store), notifier)
        .with_key(config.storage_key.clone())
        .build())
}
