//! Read-side view types.

use chrono::{DateTime, Utc};
use common::{CategoryId, ProductId, SupplierId};
use domain::Money;
use ledger_store::ProductSnapshot;
use serde::{Deserialize, Serialize};

use crate::status::StockStatus;

/// A product as presented to listing clients: catalog attributes joined with
/// the account-derived fields and resolved directory names.
///
/// Everything here is a projection of ledger-store state; the view never
/// computes quantities or profit on its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductView {
    pub id: ProductId,
    pub name: String,
    pub description: Option<String>,
    pub sku: String,
    pub unit_of_measure: String,
    pub cost_price: Money,
    pub sale_price: Money,
    pub category_id: CategoryId,
    pub category_name: Option<String>,
    pub supplier_id: Option<SupplierId>,
    pub supplier_name: Option<String>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    // Account-derived fields
    pub current_quantity: u64,
    pub minimum_quantity: u32,
    pub total_units_sold: u64,
    pub total_profit: Money,
    pub stock_status: StockStatus,
}

impl ProductView {
    /// Builds a view from a store snapshot plus resolved directory names.
    pub fn from_snapshot(
        snapshot: ProductSnapshot,
        category_name: Option<String>,
        supplier_name: Option<String>,
    ) -> Self {
        let ProductSnapshot { product, account } = snapshot;
        Self {
            id: product.id(),
            name: product.name().to_string(),
            description: product.description().map(str::to_string),
            sku: product.sku().to_string(),
            unit_of_measure: product.unit_of_measure().to_string(),
            cost_price: product.cost_price(),
            sale_price: product.sale_price(),
            category_id: product.category_id(),
            category_name,
            supplier_id: product.supplier_id(),
            supplier_name,
            active: product.is_active(),
            created_at: product.created_at(),
            updated_at: product.updated_at(),
            current_quantity: account.current_quantity(),
            minimum_quantity: account.minimum_quantity(),
            total_units_sold: account.total_units_sold(),
            total_profit: account.total_profit(),
            stock_status: StockStatus::classify(
                account.current_quantity(),
                account.minimum_quantity(),
            ),
        }
    }
}

/// Per-product stock summary for the category stock report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductStockView {
    pub product_id: ProductId,
    pub name: String,
    pub sku: String,
    pub current_quantity: u64,
    pub total_units_sold: u64,
    pub category_name: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl ProductStockView {
    /// Builds a stock summary from a store snapshot.
    pub fn from_snapshot(snapshot: &ProductSnapshot, category_name: Option<String>) -> Self {
        Self {
            product_id: snapshot.product.id(),
            name: snapshot.product.name().to_string(),
            sku: snapshot.product.sku().to_string(),
            current_quantity: snapshot.account.current_quantity(),
            total_units_sold: snapshot.account.total_units_sold(),
            category_name,
            updated_at: snapshot.product.updated_at(),
        }
    }
}

/// Per-product profitability summary for the category profit report.
///
/// `total_profit` is the ledger-derived cumulative figure (priced at each
/// movement's sale price), not a recomputation from the current catalog
/// prices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductProfitView {
    pub product_id: ProductId,
    pub name: String,
    pub sku: String,
    pub units_sold: u64,
    pub cost_price: Money,
    pub sale_price: Money,
    pub total_profit: Money,
}

impl ProductProfitView {
    /// Builds a profit summary from a store snapshot.
    pub fn from_snapshot(snapshot: &ProductSnapshot) -> Self {
        Self {
            product_id: snapshot.product.id(),
            name: snapshot.product.name().to_string(),
            sku: snapshot.product.sku().to_string(),
            units_sold: snapshot.account.total_units_sold(),
            cost_price: snapshot.product.cost_price(),
            sale_price: snapshot.product.sale_price(),
            total_profit: snapshot.account.total_profit(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::{NewProduct, Product, ProductAccount};

    fn snapshot() -> ProductSnapshot {
        let spec = NewProduct::new(
            "Widget",
            "SKU-001",
            Money::from_cents(1000),
            Money::from_cents(1500),
            CategoryId::new(),
        )
        .with_minimum_quantity(10);
        let minimum = spec.minimum_quantity;

        ProductSnapshot {
            product: Product::new(ProductId::new(), spec, Utc::now()),
            account: ProductAccount::opening(minimum).record_inbound(5),
        }
    }

    #[test]
    fn view_carries_account_fields_and_status() {
        let view = ProductView::from_snapshot(snapshot(), Some("Tools".to_string()), None);

        assert_eq!(view.current_quantity, 5);
        assert_eq!(view.minimum_quantity, 10);
        assert_eq!(view.stock_status, StockStatus::LowStock);
        assert_eq!(view.category_name.as_deref(), Some("Tools"));
        assert!(view.supplier_name.is_none());
    }

    #[test]
    fn stock_view_reports_quantity_and_sales() {
        let snapshot = snapshot();
        let stock = ProductStockView::from_snapshot(&snapshot, None);

        assert_eq!(stock.current_quantity, 5);
        assert_eq!(stock.total_units_sold, 0);
        assert_eq!(stock.sku, "SKU-001");
    }

    #[test]
    fn profit_view_uses_ledger_totals() {
        let mut snapshot = snapshot();
        snapshot.account = snapshot
            .account
            .record_outbound(2, Money::from_cents(1500), Money::from_cents(1000))
            .unwrap();

        let profit = ProductProfitView::from_snapshot(&snapshot);
        assert_eq!(profit.units_sold, 2);
        assert_eq!(profit.total_profit, Money::from_cents(1000));
    }

    #[test]
    fn view_serialization_roundtrip() {
        let view = ProductView::from_snapshot(snapshot(), None, None);
        let json = serde_json::to_string(&view).unwrap();
        let deserialized: ProductView = serde_json::from_str(&json).unwrap();
        assert_eq!(view, deserialized);
    }
}
