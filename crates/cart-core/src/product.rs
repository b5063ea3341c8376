//! # Product Types
//!
//! Catalog records as the cart sees them.
//! A catalog response carries no `amount`; the cart stamps one on when the
//! product becomes a line item.

use serde::{Deserialize, Serialize};

/// Catalog identifier of a product
pub type ProductId = u64;

/// A product, optionally carrying its quantity in the cart
///
/// Products are values: changing the quantity builds a new record
/// with [`Product::with_amount`] instead of editing a shared one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Catalog id
    pub id: ProductId,

    /// Display name
    pub name: String,

    /// Unit price as published by the catalog
    pub price: f64,

    /// Product image
    pub image_url: String,

    /// Quantity in the cart (0 for a bare catalog record)
    #[serde(default, skip_serializing_if = "is_zero")]
    pub amount: u32,
}

fn is_zero(amount: &u32) -> bool {
    *amount == 0
}

impl Product {
    /// Create a catalog record with no cart quantity
    pub fn new(
        id: ProductId,
        name: impl Into<String>,
        price: f64,
        image_url: impl Into<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            price,
            image_url: image_url.into(),
            amount: 0,
        }
    }

    /// Copy of this record with a different cart quantity
    pub fn with_amount(&self, amount: u32) -> Self {
        Self {
            amount,
            ..self.clone()
        }
    }
}

/// Stock level reported by the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockEntry {
    pub id: ProductId,
    /// Units available. Signed because an oversold product reports
    /// a negative level.
    pub amount: i64,
}

impl StockEntry {
    pub fn new(id: ProductId, amount: i64) -> Self {
        Self { id, amount }
    }

    /// Whether `requested` units can be taken from this stock
    pub fn covers(&self, requested: i64) -> bool {
        self.amount >= requested
    }
}

/// Request to set the quantity of a line item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductAmount {
    pub product_id: ProductId,
    /// Signed so the UI can pass through a decrement below one
    pub amount: i64,
}

impl UpdateProductAmount {
    pub fn new(product_id: ProductId, amount: i64) -> Self {
        Self { product_id, amount }
    }
}
