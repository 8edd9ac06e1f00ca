use std::pin::Pin;

use async_trait::async_trait;
use common::ProductId;
use domain::{
    MovementRecord, MovementRequest, NewProduct, Product, ProductAccount, ProductPatch,
};
use futures_core::Stream;
use serde::{Deserialize, Serialize};
use tokio::time::Instant;

use crate::page::{Page, ProductQuery};
use crate::Result;

/// A consistent point-in-time view of one product and its account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductSnapshot {
    /// Catalog attributes.
    pub product: Product,

    /// The derived aggregate at the same instant.
    pub account: ProductAccount,
}

/// A stream of movement records.
pub type MovementStream = Pin<Box<dyn Stream<Item = Result<MovementRecord>> + Send>>;

/// Core trait for ledger store implementations.
///
/// A ledger store owns all product and account state plus the append-only
/// movement history, keyed by product id. Implementations must be thread-safe
/// (Send + Sync) and must serialize movement applications per product: the
/// record append and the account update form one atomic unit, and no reader
/// observes one without the other.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Creates a product, assigning its id and timestamps and initializing
    /// its account at quantity zero.
    ///
    /// Fails with `DuplicateSku` when a product with the same SKU exists.
    async fn create_product(&self, spec: NewProduct) -> Result<Product>;

    /// Updates a product's catalog attributes (never its quantity or
    /// financial aggregates) and bumps `updated_at`.
    ///
    /// Fails with `NotFound` when the id is unknown, and with `DuplicateSku`
    /// when the patch renames the SKU onto one that is already taken.
    async fn update_product(&self, id: ProductId, patch: ProductPatch) -> Result<Product>;

    /// Soft-disables a product. Its history and listings remain available.
    async fn deactivate_product(&self, id: ProductId) -> Result<Product>;

    /// Returns a consistent (product, account) snapshot, or None when the id
    /// is unknown.
    async fn get_product(&self, id: ProductId) -> Result<Option<ProductSnapshot>>;

    /// Validates and applies a movement under the product's exclusive
    /// critical section, returning the accepted record.
    ///
    /// A rejected movement leaves the product's state untouched.
    async fn apply_movement(&self, request: MovementRequest) -> Result<MovementRecord>;

    /// Same as [`apply_movement`], but gives up with `DeadlineExceeded` if
    /// the critical section cannot be entered before `deadline`. Once the
    /// section is entered the update runs to completion.
    ///
    /// [`apply_movement`]: LedgerStore::apply_movement
    async fn apply_movement_before(
        &self,
        request: MovementRequest,
        deadline: Instant,
    ) -> Result<MovementRecord>;

    /// Returns the product's movement history in chronological order.
    async fn movements_for_product(&self, id: ProductId) -> Result<Vec<MovementRecord>>;

    /// Streams every movement record across all products, ordered by
    /// timestamp.
    async fn stream_movements(&self) -> Result<MovementStream>;

    /// Returns one page of product snapshots ordered by product id ascending,
    /// optionally filtered by category.
    ///
    /// The ordering is deterministic so repeated queries at fixed state are
    /// reproducible.
    async fn list_products(&self, query: ProductQuery) -> Result<Page<ProductSnapshot>>;
}

/// Extension trait providing convenience methods for ledger stores.
#[async_trait]
pub trait LedgerStoreExt: LedgerStore {
    /// Checks whether a product exists.
    async fn product_exists(&self, id: ProductId) -> Result<bool> {
        Ok(self.get_product(id).await?.is_some())
    }

    /// Rebuilds a product's account from its movement history.
    ///
    /// The ledger is the source of truth; the result must agree with the
    /// cached account whenever writes are quiesced. Useful for consistency
    /// audits and tests.
    async fn rebuild_account(&self, id: ProductId) -> Result<Option<ProductAccount>> {
        let Some(snapshot) = self.get_product(id).await? else {
            return Ok(None);
        };
        let movements = self.movements_for_product(id).await?;
        Ok(Some(ProductAccount::replay(
            movements.iter(),
            snapshot.product.cost_price(),
            snapshot.account.minimum_quantity(),
        )))
    }
}

// Blanket implementation for all LedgerStore implementations
impl<T: LedgerStore + ?Sized> LedgerStoreExt for T {}
