//! # cart-api
//!
//! Catalog fixture server and command-line cart for shoe-cart-rs.
//!
//! The server stands in for the storefront catalog API the cart talks to.
//!
//! ## Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/health` | Health check |
//! | GET | `/products` | List products |
//! | GET | `/products/{id}` | Get product |
//! | GET | `/stock` | List stock levels |
//! | GET | `/stock/{id}` | Get stock for a product |

pub mod handlers;
pub mod routes;
pub mod state;

pub use routes::create_router;
pub use state::{AppState, FixtureCatalog, ServerConfig, ServerError};
