//! # In-Memory Collaborators
//!
//! Catalog, store and notifier implementations that keep everything in
//! process. Used by tests and by embedders that wire their own I/O.

use crate::collaborator::{CartStore, CatalogService, Notifier};
use crate::error::{CartError, CartResult, CatalogResource};
use crate::notice::{Notice, NoticeKind};
use crate::product::{Product, ProductId, StockEntry};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError, RwLock};

/// Catalog backed by hash maps
#[derive(Debug, Default)]
pub struct MemoryCatalog {
    products: RwLock<HashMap<ProductId, Product>>,
    stock: RwLock<HashMap<ProductId, i64>>,
    offline: RwLock<bool>,
    yielding: bool,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: add a product with its stock level
    pub fn with_product(self, product: Product, stock: i64) -> Self {
        self.insert(product, stock);
        self
    }

    /// Builder: yield to the scheduler before answering, so overlapping
    /// operations interleave the way they would against a real network
    pub fn yielding(mut self) -> Self {
        self.yielding = true;
        self
    }

    pub fn insert(&self, product: Product, stock: i64) {
        let id = product.id;
        write(&self.products).insert(id, product);
        write(&self.stock).insert(id, stock);
    }

    pub fn set_stock(&self, product_id: ProductId, amount: i64) {
        write(&self.stock).insert(product_id, amount);
    }

    /// Make every lookup fail until switched back
    pub fn set_offline(&self, offline: bool) {
        *write(&self.offline) = offline;
    }

    async fn pause(&self) {
        if self.yielding {
            tokio::task::yield_now().await;
        }
    }

    fn check_online(&self, resource: CatalogResource, product_id: ProductId) -> CartResult<()> {
        if *read(&self.offline) {
            return Err(CartError::catalog(resource, product_id, "catalog offline"));
        }
        Ok(())
    }
}

#[async_trait]
impl CatalogService for MemoryCatalog {
    async fn product(&self, product_id: ProductId) -> CartResult<Product> {
        self.pause().await;
        self.check_online(CatalogResource::Product, product_id)?;
        read(&self.products)
            .get(&product_id)
            .cloned()
            .ok_or_else(|| CartError::catalog(CatalogResource::Product, product_id, "not found"))
    }

    async fn stock(&self, product_id: ProductId) -> CartResult<StockEntry> {
        self.pause().await;
        self.check_online(CatalogResource::Stock, product_id)?;
        read(&self.stock)
            .get(&product_id)
            .map(|&amount| StockEntry::new(product_id, amount))
            .ok_or_else(|| CartError::catalog(CatalogResource::Stock, product_id, "not found"))
    }
}

/// Store backed by a hash map
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
    read_only: Mutex<bool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: seed a blob
    pub fn with_blob(self, key: impl Into<String>, blob: impl Into<String>) -> Self {
        lock(&self.entries).insert(key.into(), blob.into());
        self
    }

    /// Make every write fail until switched back
    pub fn set_read_only(&self, read_only: bool) {
        *lock(&self.read_only) = read_only;
    }

    /// Raw blob under `key`
    pub fn blob(&self, key: &str) -> Option<String> {
        lock(&self.entries).get(key).cloned()
    }
}

impl CartStore for MemoryStore {
    fn get(&self, key: &str) -> CartResult<Option<String>> {
        Ok(lock(&self.entries).get(key).cloned())
    }

    fn set(&self, key: &str, blob: &str) -> CartResult<()> {
        if *lock(&self.read_only) {
            return Err(CartError::Store(format!("store is read-only, cannot write {key}")));
        }
        lock(&self.entries).insert(key.to_string(), blob.to_string());
        Ok(())
    }
}

/// Notifier that keeps every notice it receives
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notices(&self) -> Vec<Notice> {
        lock(&self.notices).clone()
    }

    pub fn kinds(&self) -> Vec<NoticeKind> {
        lock(&self.notices).iter().map(|n| n.kind).collect()
    }

    pub fn is_empty(&self) -> bool {
        lock(&self.notices).is_empty()
    }

    pub fn clear(&self) {
        lock(&self.notices).clear();
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: &Notice) {
        lock(&self.notices).push(notice.clone());
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn read<T>(lock: &RwLock<T>) -> std::sync::RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write<T>(lock: &RwLock<T>) -> std::sync::RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_catalog_lookups() {
        let catalog = MemoryCatalog::new().with_product(Product::new(1, "Shoe", 100.0, "x"), 5);

        assert_eq!(catalog.product(1).await.unwrap().name, "Shoe");
        assert_eq!(catalog.stock(1).await.unwrap(), StockEntry::new(1, 5));
        assert!(matches!(
            catalog.product(2).await,
            Err(CartError::CatalogUnavailable { .. })
        ));

        catalog.set_offline(true);
        assert!(catalog.stock(1).await.is_err());
    }

    #[test]
    fn test_memory_store_read_only() {
        let store = MemoryStore::new().with_blob("k", "[]");
        assert_eq!(store.get("k").unwrap().as_deref(), Some("[]"));

        store.set_read_only(true);
        assert!(matches!(store.set("k", "x"), Err(CartError::Store(_))));
        assert_eq!(store.blob("k").as_deref(), Some("[]"));
    }
}
