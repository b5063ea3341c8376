//! # Request Handlers
//!
//! Axum handlers for the catalog fixture server. Response bodies use the
//! same shapes the cart client decodes: `Product` without an amount and
//! `StockEntry`.

use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use cart_core::{Product, ProductId, StockEntry};
use serde::Serialize;
use tracing::{debug, instrument};

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, code: u16) -> Self {
        Self {
            error: error.into(),
            code,
        }
    }
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn not_found(what: &str, id: ProductId) -> ApiError {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse::new(format!("{what} not found: {id}"), 404)),
    )
}

/// Health check endpoint
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "catalog-server",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// List all products
pub async fn list_products(State(state): State<AppState>) -> Json<Vec<Product>> {
    Json(state.catalog.products.iter().map(|e| e.product()).collect())
}

/// Get a product by id
#[instrument(skip(state))]
pub async fn get_product(
    State(state): State<AppState>,
    Path(product_id): Path<ProductId>,
) -> Result<Json<Product>, ApiError> {
    let entry = state
        .catalog
        .get(product_id)
        .ok_or_else(|| not_found("Product", product_id))?;

    debug!("Serving product {}", entry.name);
    Ok(Json(entry.product()))
}

/// List stock for all products
pub async fn list_stock(State(state): State<AppState>) -> Json<Vec<StockEntry>> {
    Json(state.catalog.products.iter().map(|e| e.stock_entry()).collect())
}

/// Get stock for a product
#[instrument(skip(state))]
pub async fn get_stock(
    State(state): State<AppState>,
    Path(product_id): Path<ProductId>,
) -> Result<Json<StockEntry>, ApiError> {
    state
        .catalog
        .get(product_id)
        .map(|entry| Json(entry.stock_entry()))
        .ok_or_else(|| not_found("Stock", product_id))
}
