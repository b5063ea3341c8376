//! # Cart Controller
//!
//! Owns the cart snapshot, applies the add/remove/update rules and mirrors
//! every committed snapshot into the persistent store.
//!
//! ## Operation Flow
//!
//! ```text
//! add_product(id) ──── in cart? ──yes──► update_product_amount(id, amount + 1)
//!        │                                        │
//!        no                                amount <= 0 ──► Ignored
//!        │                                        │
//!  catalog.product(id)                     catalog.stock(id)
//!        │                                        │
//!  append with amount 1                    stock < amount ──► OutOfStock
//!        │                                        │
//!        └──────────────► commit ◄────── move entry to end
//!                           │
//!                 store.set(key, blob) + publish snapshot
//! ```
//!
//! ## Overlapping operations
//!
//! Each operation reads the snapshot current when it starts and commits a
//! cart derived from it after its catalog call. Two operations that overlap
//! on that await both start from the same snapshot, and the later commit
//! replaces the earlier one (last write wins).

use crate::cart::Cart;
use crate::collaborator::{BoxedCatalog, BoxedNotifier, BoxedStore, CartStore};
use crate::error::{CartError, CartResult};
use crate::notice::{Notice, NoticeKind};
use crate::product::{ProductId, UpdateProductAmount};
use tokio::sync::watch;
use tracing::{debug, info, instrument, warn};

/// Store key the cart blob lives under unless configured otherwise
pub const DEFAULT_CART_KEY: &str = "@RocketShoes:cart";

/// What an operation did
#[derive(Debug, Clone, PartialEq)]
pub enum CartOutcome {
    /// A new snapshot was committed
    Updated,
    /// Request was a no-op (non-positive amount)
    Ignored,
    /// Request failed; a notice was emitted and the cart is unchanged
    Rejected(CartError),
}

impl CartOutcome {
    pub fn is_updated(&self) -> bool {
        matches!(self, CartOutcome::Updated)
    }

    /// Underlying cause of a rejection
    pub fn error(&self) -> Option<&CartError> {
        match self {
            CartOutcome::Rejected(err) => Some(err),
            _ => None,
        }
    }
}

/// Builder for [`CartController`]
pub struct CartControllerBuilder {
    catalog: BoxedCatalog,
    store: BoxedStore,
    notifier: BoxedNotifier,
    key: String,
}

impl CartControllerBuilder {
    /// Builder: store the cart under a different key
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    /// Load the stored cart and build the controller
    pub fn build(self) -> CartController {
        let cart = load_cart(self.store.as_ref(), &self.key);
        let (state, _) = watch::channel(cart);

        CartController {
            catalog: self.catalog,
            store: self.store,
            notifier: self.notifier,
            key: self.key,
            state,
        }
    }
}

/// Shopping cart state controller.
///
/// Construct once per session and share it (e.g. behind an `Arc`) with
/// everything that reads or changes the cart.
pub struct CartController {
    catalog: BoxedCatalog,
    store: BoxedStore,
    notifier: BoxedNotifier,
    key: String,
    state: watch::Sender<Cart>,
}

impl CartController {
    /// Create a controller using [`DEFAULT_CART_KEY`], restoring any cart
    /// already in the store. Makes no catalog calls.
    pub fn initialize(catalog: BoxedCatalog, store: BoxedStore, notifier: BoxedNotifier) -> Self {
        Self::builder(catalog, store, notifier).build()
    }

    pub fn builder(
        catalog: BoxedCatalog,
        store: BoxedStore,
        notifier: BoxedNotifier,
    ) -> CartControllerBuilder {
        CartControllerBuilder {
            catalog,
            store,
            notifier,
            key: DEFAULT_CART_KEY.to_string(),
        }
    }

    /// Store key of the cart blob
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Current cart snapshot
    pub fn cart(&self) -> Cart {
        self.state.borrow().clone()
    }

    /// Receiver that observes every committed snapshot
    pub fn subscribe(&self) -> watch::Receiver<Cart> {
        self.state.subscribe()
    }

    /// Add one unit of a product.
    ///
    /// A product already in the cart goes through
    /// [`update_product_amount`](Self::update_product_amount) and its stock
    /// check. A new product is fetched and appended without a stock check.
    #[instrument(skip(self))]
    pub async fn add_product(&self, product_id: ProductId) -> CartOutcome {
        let snapshot = self.cart();

        if let Some(existing) = snapshot.get(product_id) {
            let amount = i64::from(existing.amount) + 1;
            debug!(amount, "product already in cart, incrementing");
            return self
                .update_product_amount(UpdateProductAmount::new(product_id, amount))
                .await;
        }

        let result = self.append(&snapshot, product_id).await;
        self.settle(NoticeKind::AddFailed, product_id, result)
    }

    /// Remove a product's line item
    #[instrument(skip(self))]
    pub fn remove_product(&self, product_id: ProductId) -> CartOutcome {
        let result = self.cart().without(product_id);
        self.settle(NoticeKind::RemoveFailed, product_id, result)
    }

    /// Set the quantity of a line item, bounded by the catalog stock.
    ///
    /// Non-positive amounts are ignored without a notice.
    #[instrument(
        skip(self, request),
        fields(product_id = request.product_id, amount = request.amount)
    )]
    pub async fn update_product_amount(&self, request: UpdateProductAmount) -> CartOutcome {
        if request.amount <= 0 {
            debug!("ignoring non-positive amount");
            return CartOutcome::Ignored;
        }

        let snapshot = self.cart();
        let result = self.change_amount(&snapshot, request).await;
        self.settle(NoticeKind::UpdateFailed, request.product_id, result)
    }

    async fn append(&self, snapshot: &Cart, product_id: ProductId) -> CartResult<Cart> {
        let product = self.catalog.product(product_id).await?;
        snapshot.with_added(&product)
    }

    async fn change_amount(
        &self,
        snapshot: &Cart,
        request: UpdateProductAmount,
    ) -> CartResult<Cart> {
        let stock = self.catalog.stock(request.product_id).await?;

        let out_of_stock = || CartError::OutOfStock {
            product_id: request.product_id,
            requested: request.amount,
            available: stock.amount,
        };
        if !stock.covers(request.amount) {
            return Err(out_of_stock());
        }
        let amount = u32::try_from(request.amount).map_err(|_| out_of_stock())?;

        snapshot.with_amount(request.product_id, amount)
    }

    /// Commit a successful result, or report a failed one
    fn settle(
        &self,
        failure: NoticeKind,
        product_id: ProductId,
        result: CartResult<Cart>,
    ) -> CartOutcome {
        match result.and_then(|next| self.commit(next)) {
            Ok(()) => CartOutcome::Updated,
            Err(err) => {
                let kind = match err {
                    CartError::OutOfStock { .. } => NoticeKind::OutOfStock,
                    _ => failure,
                };
                warn!(product_id, error = %err, notice = ?kind, "cart operation rejected");
                self.notifier.notify(&Notice::new(kind, product_id));
                CartOutcome::Rejected(err)
            }
        }
    }

    fn commit(&self, next: Cart) -> CartResult<()> {
        let blob = next.to_blob()?;

        // Persistence is best-effort; the in-memory snapshot still advances.
        if let Err(err) = self.store.set(&self.key, &blob) {
            warn!(key = %self.key, error = %err, "failed to persist cart");
        }

        info!(items = next.len(), units = next.item_count(), "cart updated");
        self.state.send_replace(next);
        Ok(())
    }
}

fn load_cart(store: &dyn CartStore, key: &str) -> Cart {
    match store.get(key) {
        Ok(Some(blob)) => match Cart::from_blob(&blob) {
            Ok(cart) => {
                debug!(key, items = cart.len(), "restored cart");
                cart
            }
            Err(err) => {
                warn!(key, error = %err, "stored cart is malformed, starting empty");
                Cart::new()
            }
        },
        Ok(None) => Cart::new(),
        Err(err) => {
            warn!(key, error = %err, "could not read stored cart, starting empty");
            Cart::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{MemoryCatalog, MemoryStore, RecordingNotifier};
    use crate::product::Product;
    use std::sync::Arc;

    struct Harness {
        controller: CartController,
        catalog: Arc<MemoryCatalog>,
        store: Arc<MemoryStore>,
        notifier: Arc<RecordingNotifier>,
    }

    impl Harness {
        fn new(catalog: MemoryCatalog, store: MemoryStore) -> Self {
            let catalog = Arc::new(catalog);
            let store = Arc::new(store);
            let notifier = Arc::new(RecordingNotifier::new());
            let controller =
                CartController::initialize(catalog.clone(), store.clone(), notifier.clone());
            Self {
                controller,
                catalog,
                store,
                notifier,
            }
        }

        /// Fresh controller over the same store, as after a reload
        fn reload(&self) -> CartController {
            CartController::initialize(
                self.catalog.clone(),
                self.store.clone(),
                Arc::new(RecordingNotifier::new()),
            )
        }

        fn blob(&self) -> Option<String> {
            self.store.blob(DEFAULT_CART_KEY)
        }
    }

    fn shoe() -> Product {
        Product::new(1, "Shoe", 100.0, "https://img/shoe.png")
    }

    fn boot() -> Product {
        Product::new(2, "Boot", 150.0, "https://img/boot.png")
    }

    fn catalog(shoe_stock: i64, boot_stock: i64) -> MemoryCatalog {
        MemoryCatalog::new()
            .with_product(shoe(), shoe_stock)
            .with_product(boot(), boot_stock)
    }

    fn stored(items: Vec<Product>) -> MemoryStore {
        let blob = Cart::from_items(items).unwrap().to_blob().unwrap();
        MemoryStore::new().with_blob(DEFAULT_CART_KEY, blob)
    }

    #[tokio::test]
    async fn test_first_add_appends_without_stock_check() {
        // Stock is zero, yet the first unit goes in.
        let h = Harness::new(catalog(0, 0), MemoryStore::new());

        let outcome = h.controller.add_product(1).await;

        assert_eq!(outcome, CartOutcome::Updated);
        let cart = h.controller.cart();
        assert_eq!(cart.amounts(), vec![(1, 1)]);
        assert_eq!(cart.get(1).unwrap().name, "Shoe");
        assert_eq!(cart.get(1).unwrap().price, 100.0);
        assert!(h.notifier.is_empty());
        assert_eq!(h.blob(), Some(cart.to_blob().unwrap()));
    }

    #[tokio::test]
    async fn test_repeat_add_beyond_stock_is_rejected() {
        let h = Harness::new(catalog(1, 0), stored(vec![shoe().with_amount(1)]));
        let before = h.blob();

        let outcome = h.controller.add_product(1).await;

        assert!(matches!(
            outcome,
            CartOutcome::Rejected(CartError::OutOfStock {
                product_id: 1,
                requested: 2,
                available: 1
            })
        ));
        assert_eq!(h.controller.cart().amounts(), vec![(1, 1)]);
        assert_eq!(h.notifier.kinds(), vec![NoticeKind::OutOfStock]);
        assert_eq!(h.blob(), before);
    }

    #[tokio::test]
    async fn test_remove_keeps_remaining_order() {
        let h = Harness::new(
            catalog(5, 5),
            stored(vec![shoe().with_amount(2), boot().with_amount(1)]),
        );

        let outcome = h.controller.remove_product(1);

        assert_eq!(outcome, CartOutcome::Updated);
        assert_eq!(h.controller.cart().amounts(), vec![(2, 1)]);
        assert_eq!(h.blob(), Some(h.controller.cart().to_blob().unwrap()));
    }

    #[tokio::test]
    async fn test_remove_missing_product_notifies() {
        let h = Harness::new(catalog(5, 5), MemoryStore::new());

        let outcome = h.controller.remove_product(99);

        assert_eq!(
            outcome,
            CartOutcome::Rejected(CartError::NotInCart { product_id: 99 })
        );
        assert!(h.controller.cart().is_empty());
        assert_eq!(h.notifier.notices(), vec![Notice::new(NoticeKind::RemoveFailed, 99)]);
        assert_eq!(h.blob(), None);
    }

    #[tokio::test]
    async fn test_update_within_stock() {
        let h = Harness::new(catalog(5, 5), stored(vec![shoe().with_amount(1)]));

        let outcome = h
            .controller
            .update_product_amount(UpdateProductAmount::new(1, 3))
            .await;

        assert_eq!(outcome, CartOutcome::Updated);
        assert_eq!(h.controller.cart().amounts(), vec![(1, 3)]);
        let persisted = Cart::from_blob(&h.blob().unwrap()).unwrap();
        assert_eq!(persisted, h.controller.cart());
    }

    #[tokio::test]
    async fn test_update_above_stock_is_not_clamped() {
        let h = Harness::new(catalog(4, 5), stored(vec![shoe().with_amount(2)]));

        let outcome = h
            .controller
            .update_product_amount(UpdateProductAmount::new(1, 5))
            .await;

        assert!(matches!(
            outcome.error(),
            Some(CartError::OutOfStock { .. })
        ));
        assert_eq!(h.controller.cart().amounts(), vec![(1, 2)]);
        assert_eq!(h.notifier.kinds(), vec![NoticeKind::OutOfStock]);
    }

    #[tokio::test]
    async fn test_oversold_stock_reports_out_of_stock() {
        let h = Harness::new(catalog(-1, 5), stored(vec![shoe().with_amount(1)]));

        let outcome = h.controller.add_product(1).await;

        assert_eq!(
            outcome,
            CartOutcome::Rejected(CartError::OutOfStock {
                product_id: 1,
                requested: 2,
                available: -1
            })
        );
        assert_eq!(h.notifier.kinds(), vec![NoticeKind::OutOfStock]);
        assert_eq!(h.controller.cart().amounts(), vec![(1, 1)]);
    }

    #[tokio::test]
    async fn test_update_moves_entry_to_end() {
        let h = Harness::new(
            catalog(10, 10),
            stored(vec![shoe().with_amount(1), boot().with_amount(1)]),
        );

        h.controller.add_product(1).await;
        assert_eq!(h.controller.cart().amounts(), vec![(2, 1), (1, 2)]);

        h.controller
            .update_product_amount(UpdateProductAmount::new(2, 3))
            .await;
        assert_eq!(h.controller.cart().amounts(), vec![(1, 2), (2, 3)]);
        assert_eq!(h.reload().cart(), h.controller.cart());
    }

    #[tokio::test]
    async fn test_non_positive_amounts_are_ignored() {
        let h = Harness::new(catalog(5, 5), stored(vec![shoe().with_amount(2)]));
        // No catalog call happens for these, so an outage must not matter.
        h.catalog.set_offline(true);

        for amount in [0, -1, -10] {
            let outcome = h
                .controller
                .update_product_amount(UpdateProductAmount::new(1, amount))
                .await;
            assert_eq!(outcome, CartOutcome::Ignored);
        }

        assert_eq!(h.controller.cart().amounts(), vec![(1, 2)]);
        assert!(h.notifier.is_empty());
    }

    #[tokio::test]
    async fn test_repeated_adds_merge_into_one_entry() {
        let h = Harness::new(catalog(10, 10), MemoryStore::new());

        for _ in 0..3 {
            assert!(h.controller.add_product(1).await.is_updated());
        }
        assert!(h.controller.add_product(2).await.is_updated());
        assert!(h.controller.add_product(1).await.is_updated());

        assert_eq!(h.controller.cart().amounts(), vec![(2, 1), (1, 4)]);
    }

    #[tokio::test]
    async fn test_reload_reproduces_cart() {
        let h = Harness::new(catalog(10, 10), MemoryStore::new());

        h.controller.add_product(2).await;
        h.controller.add_product(1).await;
        h.controller
            .update_product_amount(UpdateProductAmount::new(2, 4))
            .await;
        h.controller.add_product(1).await;

        let reloaded = h.reload();
        assert_eq!(reloaded.cart(), h.controller.cart());
        assert_eq!(reloaded.cart().amounts(), vec![(2, 4), (1, 2)]);

        h.controller.remove_product(2);
        assert_eq!(h.reload().cart().amounts(), vec![(1, 2)]);
    }

    #[tokio::test]
    async fn test_remove_then_readd_starts_at_one() {
        let h = Harness::new(catalog(10, 10), MemoryStore::new());

        h.controller.add_product(1).await;
        h.controller.add_product(1).await;
        h.controller.add_product(1).await;
        assert_eq!(h.controller.cart().amounts(), vec![(1, 3)]);

        h.controller.remove_product(1);
        h.controller.add_product(1).await;

        assert_eq!(h.controller.cart().amounts(), vec![(1, 1)]);
    }

    #[tokio::test]
    async fn test_add_with_catalog_down_notifies() {
        let h = Harness::new(catalog(5, 5), MemoryStore::new());
        h.catalog.set_offline(true);

        let outcome = h.controller.add_product(1).await;

        assert!(matches!(
            outcome.error(),
            Some(CartError::CatalogUnavailable { .. })
        ));
        assert!(h.controller.cart().is_empty());
        assert_eq!(h.notifier.kinds(), vec![NoticeKind::AddFailed]);
        assert_eq!(h.blob(), None);
    }

    #[tokio::test]
    async fn test_add_unknown_product_notifies() {
        let h = Harness::new(catalog(5, 5), MemoryStore::new());

        let outcome = h.controller.add_product(42).await;

        assert!(!outcome.is_updated());
        assert_eq!(h.notifier.kinds(), vec![NoticeKind::AddFailed]);
    }

    #[tokio::test]
    async fn test_increment_with_catalog_down_reports_update_failure() {
        let h = Harness::new(catalog(5, 5), stored(vec![shoe().with_amount(1)]));
        h.catalog.set_offline(true);

        h.controller.add_product(1).await;

        assert_eq!(h.notifier.kinds(), vec![NoticeKind::UpdateFailed]);
        assert_eq!(h.controller.cart().amounts(), vec![(1, 1)]);
    }

    #[tokio::test]
    async fn test_update_for_product_not_in_cart() {
        let h = Harness::new(catalog(5, 5), MemoryStore::new());

        let outcome = h
            .controller
            .update_product_amount(UpdateProductAmount::new(1, 2))
            .await;

        assert_eq!(
            outcome,
            CartOutcome::Rejected(CartError::NotInCart { product_id: 1 })
        );
        assert_eq!(h.notifier.kinds(), vec![NoticeKind::UpdateFailed]);
        assert!(h.controller.cart().is_empty());
    }

    #[tokio::test]
    async fn test_initialize_from_missing_or_malformed_blob() {
        let h = Harness::new(catalog(5, 5), MemoryStore::new());
        assert!(h.controller.cart().is_empty());

        let h = Harness::new(
            catalog(5, 5),
            MemoryStore::new().with_blob(DEFAULT_CART_KEY, "{not json"),
        );
        assert!(h.controller.cart().is_empty());

        let h = Harness::new(
            catalog(5, 5),
            MemoryStore::new().with_blob(
                DEFAULT_CART_KEY,
                r#"[{"id":1,"name":"Shoe","price":1.0,"imageUrl":"x","amount":0}]"#,
            ),
        );
        assert!(h.controller.cart().is_empty());
    }

    #[tokio::test]
    async fn test_store_failure_is_best_effort() {
        let h = Harness::new(catalog(5, 5), MemoryStore::new());
        h.store.set_read_only(true);

        let outcome = h.controller.add_product(1).await;

        assert_eq!(outcome, CartOutcome::Updated);
        assert_eq!(h.controller.cart().amounts(), vec![(1, 1)]);
        assert!(h.notifier.is_empty());
        assert_eq!(h.blob(), None);
    }

    #[tokio::test]
    async fn test_subscribers_see_committed_snapshots() {
        let h = Harness::new(catalog(5, 5), MemoryStore::new());
        let mut rx = h.controller.subscribe();

        h.controller.add_product(1).await;
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().amounts(), vec![(1, 1)]);

        // Rejections publish nothing
        h.controller.remove_product(99);
        assert!(!rx.has_changed().unwrap());
    }

    #[tokio::test]
    async fn test_custom_key() {
        let catalog = Arc::new(catalog(5, 5));
        let store = Arc::new(MemoryStore::new());
        let controller = CartController::builder(
            catalog,
            store.clone(),
            Arc::new(RecordingNotifier::new()),
        )
        .with_key("tenant-a:cart")
        .build();

        controller.add_product(2).await;

        assert_eq!(controller.key(), "tenant-a:cart");
        assert!(store.blob("tenant-a:cart").is_some());
        assert!(store.blob(DEFAULT_CART_KEY).is_none());
    }

    // Known limitation: overlapping operations start from the same
    // snapshot, so one increment is lost.
    #[tokio::test]
    async fn test_overlapping_adds_last_write_wins() {
        let h = Harness::new(
            catalog(10, 10).yielding(),
            stored(vec![shoe().with_amount(1)]),
        );

        let (a, b) = tokio::join!(h.controller.add_product(1), h.controller.add_product(1));

        assert!(a.is_updated() && b.is_updated());
        assert_eq!(h.controller.cart().amounts(), vec![(1, 2)]);
        assert_eq!(h.reload().cart().amounts(), vec![(1, 2)]);
    }
}
