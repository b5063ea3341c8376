//! # Notices
//!
//! One user-facing message per kind of failed operation.

use crate::product::ProductId;
use serde::{Deserialize, Serialize};

/// Distinguishable notice conditions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeKind {
    /// Adding a new product failed
    AddFailed,
    /// Removing a product failed
    RemoveFailed,
    /// Changing a quantity failed
    UpdateFailed,
    /// Requested quantity exceeds stock
    OutOfStock,
}

impl NoticeKind {
    /// Message shown to the shopper
    pub fn message(&self) -> &'static str {
        match self {
            NoticeKind::AddFailed => "Could not add the product to the cart",
            NoticeKind::RemoveFailed => "Could not remove the product from the cart",
            NoticeKind::UpdateFailed => "Could not change the product quantity",
            NoticeKind::OutOfStock => "Requested quantity is out of stock",
        }
    }
}

impl std::fmt::Display for NoticeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

/// A notice emitted by the controller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub kind: NoticeKind,
    /// Product the failed operation targeted
    pub product_id: ProductId,
}

impl Notice {
    pub fn new(kind: NoticeKind, product_id: ProductId) -> Self {
        Self { kind, product_id }
    }

    pub fn message(&self) -> &'static str {
        self.kind.message()
    }
}
