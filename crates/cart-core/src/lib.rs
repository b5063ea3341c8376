//! # cart-core
//!
//! Shopping-cart state for the storefront.
//!
//! This crate provides:
//! - `CartController` - add/remove/update with stock checks and persistence
//! - `Cart` and `Product` value types
//! - `CatalogService`, `CartStore` and `Notifier` collaborator traits
//! - `CartError` for typed error handling
//! - In-memory collaborators for tests and embedding
//!
//! ## Example
//!
//! ```rust,ignore
//! use cart_core::{CartController, UpdateProductAmount};
//!
//! let controller = CartController::initialize(catalog, store, notifier);
//!
//! controller.add_product(1).await;
//! controller.update_product_amount(UpdateProductAmount::new(1, 3)).await;
//! controller.remove_product(1);
//!
//! for item in &controller.cart() {
//!     println!("{} x{}", item.name, item.amount);
//! }
//! ```

pub mod cart;
pub mod collaborator;
pub mod controller;
pub mod error;
pub mod memory;
pub mod notice;
pub mod product;

// Re-exports for convenience
pub use cart::Cart;
pub use collaborator::{
    BoxedCatalog, BoxedNotifier, BoxedStore, CartStore, CatalogService, Notifier,
};
pub use controller::{CartController, CartControllerBuilder, CartOutcome, DEFAULT_CART_KEY};
pub use error::{CartError, CartResult, CatalogResource};
pub use memory::{MemoryCatalog, MemoryStore, RecordingNotifier};
pub use notice::{Notice, NoticeKind};
pub use product::{Product, ProductId, StockEntry, UpdateProductAmount};
