//! # Routes
//!
//! Axum router for the catalog fixture server.

use crate::handlers;
use crate::state::AppState;
use axum::{routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Create the catalog router
///
/// Routes:
///   - GET /health
///   - GET /products
///   - GET /products/{product_id}
///   - GET /stock
///   - GET /stock/{product_id}
pub fn create_router(state: AppState) -> Router {
    // Storefronts are served from other origins
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handlers::health))
        .route("/", get(handlers::health))
        .route("/products", get(handlers::list_products))
        .route("/products/{product_id}", get(handlers::get_product))
        .route("/stock", get(handlers::list_stock))
        .route("/stock/{product_id}", get(handlers::get_stock))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
