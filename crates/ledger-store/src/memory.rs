use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use common::ProductId;
use domain::{
    MovementError, MovementProcessor, MovementRecord, MovementRequest, MovementType, NewProduct,
    Product, ProductAccount, ProductPatch,
};
use futures_util::stream;
use tokio::sync::{Mutex, RwLock};
use tokio::time::Instant;

use crate::clock::{Clock, SystemClock};
use crate::page::{Page, ProductQuery};
use crate::store::{LedgerStore, MovementStream, ProductSnapshot};
use crate::{LedgerError, Result};

/// State guarded by a product's critical section: the catalog entry, the
/// derived account, and the append-only movement history move together.
#[derive(Debug)]
struct ProductState {
    product: Product,
    account: ProductAccount,
    movements: Vec<MovementRecord>,
}

impl ProductState {
    fn snapshot(&self) -> ProductSnapshot {
        ProductSnapshot {
            product: self.product.clone(),
            account: self.account,
        }
    }
}

#[derive(Debug, Default)]
struct Inner {
    /// One shard per product; the shard mutex is the per-product critical
    /// section.
    products: HashMap<ProductId, Arc<Mutex<ProductState>>>,

    /// SKU uniqueness index.
    sku_index: HashMap<String, ProductId>,
}

/// In-memory ledger store implementation.
///
/// Movement applications on the same product are serialized by a per-product
/// mutex; movements on different products proceed concurrently. The outer map
/// lock is held only long enough to resolve a shard, never across a shard's
/// critical section, and no critical section spans external I/O.
#[derive(Clone)]
pub struct InMemoryLedgerStore {
    inner: Arc<RwLock<Inner>>,
    clock: Arc<dyn Clock>,
}

impl Default for InMemoryLedgerStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryLedgerStore {
    /// Creates an empty store using the system clock.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Creates an empty store with a caller-supplied clock.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Inner::default())),
            clock,
        }
    }

    /// Returns the number of products in the store.
    pub async fn product_count(&self) -> usize {
        self.inner.read().await.products.len()
    }

    /// Returns the total number of movement records across all products.
    pub async fn movement_count(&self) -> usize {
        let shards = self.shards().await;
        let mut count = 0;
        for (_, shard) in shards {
            count += shard.lock().await.movements.len();
        }
        count
    }

    async fn shards(&self) -> Vec<(ProductId, Arc<Mutex<ProductState>>)> {
        let inner = self.inner.read().await;
        let mut shards: Vec<_> = inner
            .products
            .iter()
            .map(|(id, shard)| (*id, Arc::clone(shard)))
            .collect();
        shards.sort_by_key(|(id, _)| *id);
        shards
    }

    async fn shard(&self, id: ProductId) -> Option<Arc<Mutex<ProductState>>> {
        self.inner.read().await.products.get(&id).cloned()
    }

    /// Runs the validate-and-apply sequence inside the product's critical
    /// section. `deadline` bounds only the acquisition of the section; once
    /// entered, the update runs to completion.
    async fn apply_locked(
        &self,
        request: MovementRequest,
        deadline: Option<Instant>,
    ) -> Result<MovementRecord> {
        let product_id = request.product_id;
        let shard = self
            .shard(product_id)
            .await
            .ok_or(MovementError::UnknownProduct(product_id))?;

        let mut state = match deadline {
            None => shard.lock().await,
            Some(deadline) => {
                let now = Instant::now();
                if deadline <= now {
                    return Err(LedgerError::DeadlineExceeded(product_id));
                }
                tokio::time::timeout_at(deadline, shard.lock())
                    .await
                    .map_err(|_| LedgerError::DeadlineExceeded(product_id))?
            }
        };

        let request = request.with_sale_price_default(state.product.sale_price());
        let timestamp = self.clock.now();

        match MovementProcessor::apply(&state.product, &state.account, &request, timestamp) {
            Ok((record, account)) => {
                state.account = account;
                state.movements.push(record.clone());
                metrics::counter!("ledger_movements_applied").increment(1);

                let minimum = account.minimum_quantity() as u64;
                if record.movement_type == MovementType::Outbound
                    && minimum > 0
                    && account.current_quantity() <= minimum
                {
                    tracing::warn!(
                        product = %state.product.name(),
                        quantity = account.current_quantity(),
                        minimum,
                        "stock at or below minimum threshold"
                    );
                }

                Ok(record)
            }
            Err(err) => {
                metrics::counter!("ledger_movements_rejected").increment(1);
                Err(err.into())
            }
        }
    }
}

#[async_trait]
impl LedgerStore for InMemoryLedgerStore {
    #[tracing::instrument(skip(self, spec), fields(sku = %spec.sku))]
    async fn create_product(&self, spec: NewProduct) -> Result<Product> {
        let mut inner = self.inner.write().await;

        if inner.sku_index.contains_key(&spec.sku) {
            return Err(LedgerError::DuplicateSku(spec.sku));
        }

        let id = ProductId::new();
        let account = ProductAccount::opening(spec.minimum_quantity);
        let product = Product::new(id, spec, self.clock.now());

        inner.sku_index.insert(product.sku().to_string(), id);
        inner.products.insert(
            id,
            Arc::new(Mutex::new(ProductState {
                product: product.clone(),
                account,
                movements: Vec::new(),
            })),
        );

        Ok(product)
    }

    #[tracing::instrument(skip(self, patch))]
    async fn update_product(&self, id: ProductId, patch: ProductPatch) -> Result<Product> {
        // The write lock on the outer map also covers the SKU index, so a
        // rename and its uniqueness check are atomic.
        let mut inner = self.inner.write().await;

        let shard = inner
            .products
            .get(&id)
            .cloned()
            .ok_or(LedgerError::NotFound(id))?;
        let mut state = shard.lock().await;

        if let Some(new_sku) = &patch.sku {
            if new_sku.as_str() != state.product.sku() {
                if inner.sku_index.contains_key(new_sku) {
                    return Err(LedgerError::DuplicateSku(new_sku.clone()));
                }
                inner.sku_index.remove(state.product.sku());
                inner.sku_index.insert(new_sku.clone(), id);
            }
        }

        if let Some(minimum) = patch.minimum_quantity {
            state.account = state.account.with_minimum_quantity(minimum);
        }

        state.product.apply_patch(patch, self.clock.now());
        Ok(state.product.clone())
    }

    #[tracing::instrument(skip(self))]
    async fn deactivate_product(&self, id: ProductId) -> Result<Product> {
        let shard = self.shard(id).await.ok_or(LedgerError::NotFound(id))?;
        let mut state = shard.lock().await;
        state.product.deactivate(self.clock.now());
        Ok(state.product.clone())
    }

    async fn get_product(&self, id: ProductId) -> Result<Option<ProductSnapshot>> {
        match self.shard(id).await {
            Some(shard) => Ok(Some(shard.lock().await.snapshot())),
            None => Ok(None),
        }
    }

    #[tracing::instrument(skip(self, request), fields(product_id = %request.product_id, movement_type = %request.movement_type))]
    async fn apply_movement(&self, request: MovementRequest) -> Result<MovementRecord> {
        self.apply_locked(request, None).await
    }

    #[tracing::instrument(skip(self, request, deadline), fields(product_id = %request.product_id))]
    async fn apply_movement_before(
        &self,
        request: MovementRequest,
        deadline: Instant,
    ) -> Result<MovementRecord> {
        self.apply_locked(request, Some(deadline)).await
    }

    async fn movements_for_product(&self, id: ProductId) -> Result<Vec<MovementRecord>> {
        let shard = self.shard(id).await.ok_or(LedgerError::NotFound(id))?;
        let state = shard.lock().await;
        Ok(state.movements.clone())
    }

    async fn stream_movements(&self) -> Result<MovementStream> {
        let shards = self.shards().await;
        let mut records = Vec::new();
        for (_, shard) in shards {
            records.extend(shard.lock().await.movements.iter().cloned());
        }
        records.sort_by_key(|r| (r.timestamp, r.id.as_uuid()));

        let stream = stream::iter(records.into_iter().map(Ok));
        Ok(Box::pin(stream))
    }

    async fn list_products(&self, query: ProductQuery) -> Result<Page<ProductSnapshot>> {
        let shards = self.shards().await;

        // Shards are already id-ordered; each snapshot is taken under its
        // product's critical section, so record append and account update are
        // never observed apart.
        let mut snapshots = Vec::with_capacity(shards.len());
        for (_, shard) in shards {
            let snapshot = shard.lock().await.snapshot();
            if let Some(category) = query.category {
                if snapshot.product.category_id() != category {
                    continue;
                }
            }
            snapshots.push(snapshot);
        }

        let total_elements = snapshots.len();
        let items: Vec<_> = snapshots
            .into_iter()
            .skip(query.page.offset())
            .take(query.page.size)
            .collect();

        Ok(Page::new(items, query.page, total_elements))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::page::PageRequest;
    use crate::store::LedgerStoreExt;
    use common::CategoryId;
    use domain::{Money, MovementReason};
    use futures_util::StreamExt;

    fn widget_spec(sku: &str) -> NewProduct {
        NewProduct::new(
            "Widget",
            sku,
            Money::from_cents(1000),
            Money::from_cents(1500),
            CategoryId::new(),
        )
    }

    #[tokio::test]
    async fn create_and_get_product() {
        let store = InMemoryLedgerStore::new();
        let product = store.create_product(widget_spec("SKU-001")).await.unwrap();

        let snapshot = store.get_product(product.id()).await.unwrap().unwrap();
        assert_eq!(snapshot.product.sku(), "SKU-001");
        assert_eq!(snapshot.account.current_quantity(), 0);
        assert!(store.product_exists(product.id()).await.unwrap());
    }

    #[tokio::test]
    async fn duplicate_sku_is_rejected() {
        let store = InMemoryLedgerStore::new();
        store.create_product(widget_spec("SKU-001")).await.unwrap();

        let err = store.create_product(widget_spec("SKU-001")).await.unwrap_err();
        assert!(matches!(err, LedgerError::DuplicateSku(sku) if sku == "SKU-001"));
        assert_eq!(store.product_count().await, 1);
    }

    #[tokio::test]
    async fn update_product_bumps_updated_at_only() {
        let clock = FixedClock::new(chrono::Utc::now());
        let store = InMemoryLedgerStore::with_clock(Arc::new(clock.clone()));
        let product = store.create_product(widget_spec("SKU-001")).await.unwrap();
        let created_at = product.created_at();

        clock.advance(chrono::Duration::seconds(42));
        let updated = store
            .update_product(
                product.id(),
                ProductPatch {
                    name: Some("Gadget".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.name(), "Gadget");
        assert_eq!(updated.created_at(), created_at);
        assert_eq!(
            updated.updated_at(),
            created_at + chrono::Duration::seconds(42)
        );
    }

    #[tokio::test]
    async fn update_unknown_product_is_not_found() {
        let store = InMemoryLedgerStore::new();
        let err = store
            .update_product(ProductId::new(), ProductPatch::default())
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::NotFound(_)));
    }

    #[tokio::test]
    async fn update_can_rename_sku_but_not_onto_existing_one() {
        let store = InMemoryLedgerStore::new();
        let first = store.create_product(widget_spec("SKU-001")).await.unwrap();
        store.create_product(widget_spec("SKU-002")).await.unwrap();

        let err = store
            .update_product(
                first.id(),
                ProductPatch {
                    sku: Some("SKU-002".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::DuplicateSku(_)));

        // Renaming onto a free SKU works, and frees the old one.
        store
            .update_product(
                first.id(),
                ProductPatch {
                    sku: Some("SKU-003".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        store.create_product(widget_spec("SKU-001")).await.unwrap();
    }

    #[tokio::test]
    async fn update_never_touches_the_account_aggregates() {
        let store = InMemoryLedgerStore::new();
        let product = store.create_product(widget_spec("SKU-001")).await.unwrap();
        store
            .apply_movement(MovementRequest::inbound(
                product.id(),
                50,
                "alice",
                MovementReason::Restock,
            ))
            .await
            .unwrap();

        store
            .update_product(
                product.id(),
                ProductPatch {
                    sale_price: Some(Money::from_cents(9999)),
                    minimum_quantity: Some(20),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let snapshot = store.get_product(product.id()).await.unwrap().unwrap();
        assert_eq!(snapshot.account.current_quantity(), 50);
        assert_eq!(snapshot.account.minimum_quantity(), 20);
        assert_eq!(snapshot.account.total_units_sold(), 0);
    }

    #[tokio::test]
    async fn deactivate_keeps_product_queryable() {
        let store = InMemoryLedgerStore::new();
        let product = store.create_product(widget_spec("SKU-001")).await.unwrap();

        let deactivated = store.deactivate_product(product.id()).await.unwrap();
        assert!(!deactivated.is_active());

        let snapshot = store.get_product(product.id()).await.unwrap().unwrap();
        assert!(!snapshot.product.is_active());
    }

    #[tokio::test]
    async fn apply_movement_updates_account_and_appends_record() {
        let store = InMemoryLedgerStore::new();
        let product = store.create_product(widget_spec("SKU-001")).await.unwrap();

        let record = store
            .apply_movement(MovementRequest::inbound(
                product.id(),
                100,
                "alice",
                MovementReason::Purchase,
            ))
            .await
            .unwrap();

        assert_eq!(record.quantity, 100);
        let snapshot = store.get_product(product.id()).await.unwrap().unwrap();
        assert_eq!(snapshot.account.current_quantity(), 100);
        assert_eq!(store.movement_count().await, 1);
    }

    #[tokio::test]
    async fn movement_on_unknown_product_is_rejected() {
        let store = InMemoryLedgerStore::new();
        let err = store
            .apply_movement(MovementRequest::inbound(
                ProductId::new(),
                1,
                "alice",
                MovementReason::Purchase,
            ))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            LedgerError::Movement(MovementError::UnknownProduct(_))
        ));
    }

    #[tokio::test]
    async fn rejected_movement_leaves_no_trace() {
        let store = InMemoryLedgerStore::new();
        let product = store.create_product(widget_spec("SKU-001")).await.unwrap();
        store
            .apply_movement(MovementRequest::inbound(
                product.id(),
                10,
                "alice",
                MovementReason::Restock,
            ))
            .await
            .unwrap();

        let err = store
            .apply_movement(MovementRequest::outbound(
                product.id(),
                80,
                "bob",
                MovementReason::Sale,
                Some(Money::from_cents(1500)),
            ))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            LedgerError::Movement(MovementError::InsufficientStock { available: 10, requested: 80 })
        ));

        let snapshot = store.get_product(product.id()).await.unwrap().unwrap();
        assert_eq!(snapshot.account.current_quantity(), 10);
        assert_eq!(snapshot.account.total_units_sold(), 0);
        assert_eq!(snapshot.account.total_profit(), Money::zero());
        assert_eq!(
            store.movements_for_product(product.id()).await.unwrap().len(),
            1
        );
    }

    #[tokio::test]
    async fn outbound_without_price_uses_catalog_sale_price() {
        let store = InMemoryLedgerStore::new();
        let product = store.create_product(widget_spec("SKU-001")).await.unwrap();
        store
            .apply_movement(MovementRequest::inbound(
                product.id(),
                10,
                "alice",
                MovementReason::Restock,
            ))
            .await
            .unwrap();

        let record = store
            .apply_movement(MovementRequest::outbound(
                product.id(),
                4,
                "bob",
                MovementReason::Sale,
                None,
            ))
            .await
            .unwrap();

        assert_eq!(record.sale_price, Some(Money::from_cents(1500)));
        let snapshot = store.get_product(product.id()).await.unwrap().unwrap();
        // (15.00 - 10.00) * 4
        assert_eq!(snapshot.account.total_profit(), Money::from_cents(2000));
    }

    #[tokio::test]
    async fn movements_for_product_is_chronological() {
        let clock = FixedClock::new(chrono::Utc::now());
        let store = InMemoryLedgerStore::with_clock(Arc::new(clock.clone()));
        let product = store.create_product(widget_spec("SKU-001")).await.unwrap();

        for quantity in [5u32, 7, 9] {
            store
                .apply_movement(MovementRequest::inbound(
                    product.id(),
                    quantity,
                    "alice",
                    MovementReason::Restock,
                ))
                .await
                .unwrap();
            clock.advance(chrono::Duration::seconds(1));
        }

        let movements = store.movements_for_product(product.id()).await.unwrap();
        let quantities: Vec<u32> = movements.iter().map(|m| m.quantity).collect();
        assert_eq!(quantities, vec![5, 7, 9]);
        assert!(movements.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
    }

    #[tokio::test]
    async fn stream_movements_covers_all_products_in_time_order() {
        let clock = FixedClock::new(chrono::Utc::now());
        let store = InMemoryLedgerStore::with_clock(Arc::new(clock.clone()));
        let a = store.create_product(widget_spec("SKU-001")).await.unwrap();
        let b = store.create_product(widget_spec("SKU-002")).await.unwrap();

        for product in [&a, &b, &a] {
            store
                .apply_movement(MovementRequest::inbound(
                    product.id(),
                    1,
                    "alice",
                    MovementReason::Purchase,
                ))
                .await
                .unwrap();
            clock.advance(chrono::Duration::seconds(1));
        }

        let stream = store.stream_movements().await.unwrap();
        let records: Vec<_> = stream.map(|r| r.unwrap()).collect().await;
        assert_eq!(records.len(), 3);
        assert!(records.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
    }

    #[tokio::test]
    async fn list_products_paginates_in_id_order() {
        let store = InMemoryLedgerStore::new();
        for i in 0..25 {
            store
                .create_product(widget_spec(&format!("SKU-{i:03}")))
                .await
                .unwrap();
        }

        let first = store
            .list_products(ProductQuery::new(PageRequest::new(0, 10)))
            .await
            .unwrap();
        assert_eq!(first.len(), 10);
        assert_eq!(first.total_elements, 25);
        assert_eq!(first.total_pages, 3);
        assert!(first.first);
        assert!(!first.last);

        // Repeated queries at fixed state return the same ordering.
        let again = store
            .list_products(ProductQuery::new(PageRequest::new(0, 10)))
            .await
            .unwrap();
        let ids: Vec<_> = first.items.iter().map(|s| s.product.id()).collect();
        let ids_again: Vec<_> = again.items.iter().map(|s| s.product.id()).collect();
        assert_eq!(ids, ids_again);

        let last = store
            .list_products(ProductQuery::new(PageRequest::new(2, 10)))
            .await
            .unwrap();
        assert_eq!(last.len(), 5);
        assert!(last.last);
    }

    #[tokio::test]
    async fn list_products_filters_by_category() {
        let store = InMemoryLedgerStore::new();
        let category = CategoryId::new();

        let mut spec = widget_spec("SKU-C");
        spec.category_id = category;
        store.create_product(spec).await.unwrap();
        store.create_product(widget_spec("SKU-X")).await.unwrap();

        let page = store
            .list_products(ProductQuery::new(PageRequest::default()).category(category))
            .await
            .unwrap();
        assert_eq!(page.total_elements, 1);
        assert_eq!(page.items[0].product.sku(), "SKU-C");
    }

    #[tokio::test]
    async fn elapsed_deadline_aborts_before_applying() {
        let store = InMemoryLedgerStore::new();
        let product = store.create_product(widget_spec("SKU-001")).await.unwrap();

        // Captured before the call, so it has always elapsed by the time the
        // store checks it.
        let past = Instant::now();
        let err = store
            .apply_movement_before(
                MovementRequest::inbound(product.id(), 1, "alice", MovementReason::Purchase),
                past,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::DeadlineExceeded(_)));

        let snapshot = store.get_product(product.id()).await.unwrap().unwrap();
        assert_eq!(snapshot.account.current_quantity(), 0);
        assert!(store.movements_for_product(product.id()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn future_deadline_applies_normally() {
        let store = InMemoryLedgerStore::new();
        let product = store.create_product(widget_spec("SKU-001")).await.unwrap();

        let deadline = Instant::now() + std::time::Duration::from_secs(5);
        store
            .apply_movement_before(
                MovementRequest::inbound(product.id(), 3, "alice", MovementReason::Purchase),
                deadline,
            )
            .await
            .unwrap();

        let snapshot = store.get_product(product.id()).await.unwrap().unwrap();
        assert_eq!(snapshot.account.current_quantity(), 3);
    }

    #[tokio::test]
    async fn rebuild_account_agrees_with_cached_aggregate() {
        let store = InMemoryLedgerStore::new();
        let product = store.create_product(widget_spec("SKU-001")).await.unwrap();

        store
            .apply_movement(MovementRequest::inbound(
                product.id(),
                100,
                "alice",
                MovementReason::Restock,
            ))
            .await
            .unwrap();
        store
            .apply_movement(MovementRequest::outbound(
                product.id(),
                30,
                "bob",
                MovementReason::Sale,
                Some(Money::from_cents(1500)),
            ))
            .await
            .unwrap();

        let cached = store.get_product(product.id()).await.unwrap().unwrap().account;
        let rebuilt = store.rebuild_account(product.id()).await.unwrap().unwrap();
        assert_eq!(cached, rebuilt);
    }
}
