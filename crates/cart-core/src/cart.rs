//! # Cart
//!
//! Ordered line items, unique by product id.
//!
//! Every transition returns a new `Cart`; nothing here mutates a snapshot
//! that may already have been handed to a subscriber.

use crate::error::{CartError, CartResult};
use crate::product::{Product, ProductId};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Snapshot of the cart
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<Product>,
}

impl Cart {
    /// Create an empty cart
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Build a cart from line items, checking the invariants
    pub fn from_items(items: Vec<Product>) -> CartResult<Self> {
        let cart = Self { items };
        cart.validate()?;
        Ok(cart)
    }

    /// Decode a stored blob
    pub fn from_blob(blob: &str) -> CartResult<Self> {
        let items: Vec<Product> = serde_json::from_str(blob)?;
        Self::from_items(items)
    }

    /// Encode for the persistent store
    pub fn to_blob(&self) -> CartResult<String> {
        Ok(serde_json::to_string(&self.items)?)
    }

    fn validate(&self) -> CartResult<()> {
        let mut seen = HashSet::with_capacity(self.items.len());
        for item in &self.items {
            if item.amount == 0 {
                return Err(CartError::InvalidCart(format!(
                    "product {} has amount 0",
                    item.id
                )));
            }
            if !seen.insert(item.id) {
                return Err(CartError::InvalidCart(format!(
                    "product {} appears more than once",
                    item.id
                )));
            }
        }
        Ok(())
    }

    /// Line item for a product
    pub fn get(&self, product_id: ProductId) -> Option<&Product> {
        self.items.iter().find(|p| p.id == product_id)
    }

    pub fn contains(&self, product_id: ProductId) -> bool {
        self.get(product_id).is_some()
    }

    pub fn items(&self) -> &[Product] {
        &self.items
    }

    pub fn iter(&self) -> impl Iterator<Item = &Product> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total units across all line items
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|p| u64::from(p.amount)).sum()
    }

    /// `(id, amount)` per line item, in cart order
    pub fn amounts(&self) -> Vec<(ProductId, u32)> {
        self.items.iter().map(|p| (p.id, p.amount)).collect()
    }

    /// Cart with `product` appended as a new line item of one unit
    pub fn with_added(&self, product: &Product) -> CartResult<Self> {
        if self.contains(product.id) {
            return Err(CartError::InvalidCart(format!(
                "product {} is already in the cart",
                product.id
            )));
        }
        let mut items = self.items.clone();
        items.push(product.with_amount(1));
        Ok(Self { items })
    }

    /// Cart without the line item for `product_id`
    pub fn without(&self, product_id: ProductId) -> CartResult<Self> {
        if !self.contains(product_id) {
            return Err(CartError::NotInCart { product_id });
        }
        let items = self
            .items
            .iter()
            .filter(|p| p.id != product_id)
            .cloned()
            .collect();
        Ok(Self { items })
    }

    /// Cart with the quantity of `product_id` replaced.
    ///
    /// The changed line item moves to the end of the cart.
    pub fn with_amount(&self, product_id: ProductId, amount: u32) -> CartResult<Self> {
        if amount == 0 {
            return Err(CartError::InvalidCart(format!(
                "product {product_id} cannot have amount 0"
            )));
        }
        let updated = self
            .get(product_id)
            .map(|p| p.with_amount(amount))
            .ok_or(CartError::NotInCart { product_id })?;

        let mut items: Vec<Product> = self
            .items
            .iter()
            .filter(|p| p.id != product_id)
            .cloned()
            .collect();
        items.push(updated);
        Ok(Self { items })
    }
}

impl<'a> IntoIterator for &'a Cart {
    type Item = &'a Product;
    type IntoIter = std::slice::Iter<'a, Product>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
