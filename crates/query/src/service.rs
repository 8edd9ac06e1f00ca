//! Query service: thin read composition over the ledger store.

use std::sync::Arc;

use common::{CategoryId, ProductId};
use domain::MovementRecord;
use ledger_store::{LedgerStore, Page, PageRequest, ProductQuery, ProductSnapshot};

use crate::config::QueryConfig;
use crate::directory::{CategoryDirectory, SupplierDirectory};
use crate::view::{ProductProfitView, ProductStockView, ProductView};
use crate::Result;

/// Read-side service joining ledger snapshots with directory lookups.
///
/// Stateless apart from its collaborators: every call reads fresh snapshots
/// from the store, so listings always reflect the authoritative aggregates.
pub struct QueryService<S: LedgerStore> {
    store: S,
    categories: Arc<dyn CategoryDirectory>,
    suppliers: Arc<dyn SupplierDirectory>,
    config: QueryConfig,
}

impl<S: LedgerStore> QueryService<S> {
    /// Creates a service with default configuration.
    pub fn new(
        store: S,
        categories: Arc<dyn CategoryDirectory>,
        suppliers: Arc<dyn SupplierDirectory>,
    ) -> Self {
        Self {
            store,
            categories,
            suppliers,
            config: QueryConfig::default(),
        }
    }

    /// Replaces the pagination configuration.
    pub fn with_config(mut self, config: QueryConfig) -> Self {
        self.config = config;
        self
    }

    /// Returns a reference to the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Lists one page of products with derived fields and resolved names,
    /// ordered by product id ascending, optionally filtered by category.
    #[tracing::instrument(skip(self))]
    pub async fn list_products(
        &self,
        page: usize,
        size: usize,
        category: Option<CategoryId>,
    ) -> Result<Page<ProductView>> {
        let request = PageRequest::new(page, self.config.clamp_size(size));
        let mut query = ProductQuery::new(request);
        if let Some(category) = category {
            query = query.category(category);
        }

        let snapshots = self.store.list_products(query).await?;
        self.resolve_page(snapshots).await
    }

    /// Returns a single product view, or None when the id is unknown.
    #[tracing::instrument(skip(self))]
    pub async fn product(&self, id: ProductId) -> Result<Option<ProductView>> {
        match self.store.get_product(id).await? {
            Some(snapshot) => Ok(Some(self.resolve_view(snapshot).await)),
            None => Ok(None),
        }
    }

    /// Returns a product's movement history in chronological order.
    #[tracing::instrument(skip(self))]
    pub async fn movements_for_product(&self, id: ProductId) -> Result<Vec<MovementRecord>> {
        Ok(self.store.movements_for_product(id).await?)
    }

    /// Per-product stock summary for every product in a category.
    #[tracing::instrument(skip(self))]
    pub async fn stock_by_category(&self, category: CategoryId) -> Result<Vec<ProductStockView>> {
        let category_name = self.categories.category_name(category).await;
        let snapshots = self.snapshots_in_category(category).await?;
        Ok(snapshots
            .iter()
            .map(|s| ProductStockView::from_snapshot(s, category_name.clone()))
            .collect())
    }

    /// Per-product profitability summary for every product in a category.
    #[tracing::instrument(skip(self))]
    pub async fn profit_by_category(
        &self,
        category: CategoryId,
    ) -> Result<Vec<ProductProfitView>> {
        let snapshots = self.snapshots_in_category(category).await?;
        Ok(snapshots.iter().map(ProductProfitView::from_snapshot).collect())
    }

    /// Sweeps all pages of a category. Reports are unbounded listings, so the
    /// sweep pages through the store at the configured cap.
    async fn snapshots_in_category(&self, category: CategoryId) -> Result<Vec<ProductSnapshot>> {
        let mut snapshots = Vec::new();
        let mut page = 0;
        loop {
            let request = PageRequest::new(page, self.config.max_page_size);
            let result = self
                .store
                .list_products(ProductQuery::new(request).category(category))
                .await?;
            let last = result.last;
            snapshots.extend(result.items);
            if last {
                break;
            }
            page += 1;
        }
        Ok(snapshots)
    }

    async fn resolve_view(&self, snapshot: ProductSnapshot) -> ProductView {
        let category_name = self
            .categories
            .category_name(snapshot.product.category_id())
            .await;
        let supplier_name = match snapshot.product.supplier_id() {
            Some(id) => self.suppliers.supplier_name(id).await,
            None => None,
        };
        ProductView::from_snapshot(snapshot, category_name, supplier_name)
    }

    async fn resolve_page(&self, page: Page<ProductSnapshot>) -> Result<Page<ProductView>> {
        let mut items = Vec::with_capacity(page.items.len());
        for snapshot in page.items {
            items.push(self.resolve_view(snapshot).await);
        }
        Ok(Page {
            items,
            page: page.page,
            size: page.size,
            total_elements: page.total_elements,
            total_pages: page.total_pages,
            first: page.first,
            last: page.last,
        })
    }
}
