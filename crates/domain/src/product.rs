//! Product catalog entity and its creation/update inputs.

use chrono::{DateTime, Utc};
use common::{CategoryId, ProductId, SupplierId};
use serde::{Deserialize, Serialize};

use crate::money::Money;

/// A product in the catalog.
///
/// Carries identity and catalog attributes only; on-hand quantity and the
/// financial running totals live in the per-product account and are mutated
/// exclusively through movement application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    id: ProductId,
    name: String,
    description: Option<String>,
    sku: String,
    unit_of_measure: String,
    cost_price: Money,
    sale_price: Money,
    category_id: CategoryId,
    supplier_id: Option<SupplierId>,
    active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Product {
    /// Creates a product from a creation spec, stamping both timestamps with
    /// `now`.
    pub fn new(id: ProductId, spec: NewProduct, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: spec.name,
            description: spec.description,
            sku: spec.sku,
            unit_of_measure: spec.unit_of_measure,
            cost_price: spec.cost_price,
            sale_price: spec.sale_price,
            category_id: spec.category_id,
            supplier_id: spec.supplier_id,
            active: true,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn id(&self) -> ProductId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn sku(&self) -> &str {
        &self.sku
    }

    pub fn unit_of_measure(&self) -> &str {
        &self.unit_of_measure
    }

    pub fn cost_price(&self) -> Money {
        self.cost_price
    }

    pub fn sale_price(&self) -> Money {
        self.sale_price
    }

    pub fn category_id(&self) -> CategoryId {
        self.category_id
    }

    pub fn supplier_id(&self) -> Option<SupplierId> {
        self.supplier_id
    }

    /// Returns false once the product has been deactivated.
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Applies a catalog patch, bumping `updated_at`.
    ///
    /// Only the fields present in the patch change. Quantity and financial
    /// aggregates are not reachable from here; the minimum-quantity threshold
    /// is part of the account and handled by the store.
    pub fn apply_patch(&mut self, patch: ProductPatch, now: DateTime<Utc>) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(description) = patch.description {
            self.description = Some(description);
        }
        if let Some(sku) = patch.sku {
            self.sku = sku;
        }
        if let Some(unit) = patch.unit_of_measure {
            self.unit_of_measure = unit;
        }
        if let Some(cost_price) = patch.cost_price {
            self.cost_price = cost_price;
        }
        if let Some(sale_price) = patch.sale_price {
            self.sale_price = sale_price;
        }
        if let Some(category_id) = patch.category_id {
            self.category_id = category_id;
        }
        if let Some(supplier_id) = patch.supplier_id {
            self.supplier_id = Some(supplier_id);
        }
        self.updated_at = now;
    }

    /// Soft-disables the product. History and queries keep working; the flag
    /// is informational for the read side.
    pub fn deactivate(&mut self, now: DateTime<Utc>) {
        self.active = false;
        self.updated_at = now;
    }
}

/// Specification for creating a product.
///
/// The account always opens at quantity zero; initial stock enters through an
/// inbound movement so the ledger stays the source of truth.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub description: Option<String>,
    pub sku: String,
    pub unit_of_measure: String,
    pub cost_price: Money,
    pub sale_price: Money,
    pub category_id: CategoryId,
    pub supplier_id: Option<SupplierId>,
    /// Low-stock threshold for the product's account.
    pub minimum_quantity: u32,
}

impl NewProduct {
    /// Creates a spec with the required fields; optional attributes default to
    /// empty and can be set with the `with_` builders.
    pub fn new(
        name: impl Into<String>,
        sku: impl Into<String>,
        cost_price: Money,
        sale_price: Money,
        category_id: CategoryId,
    ) -> Self {
        Self {
            name: name.into(),
            description: None,
            sku: sku.into(),
            unit_of_measure: "unit".to_string(),
            cost_price,
            sale_price,
            category_id,
            supplier_id: None,
            minimum_quantity: 0,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_unit_of_measure(mut self, unit: impl Into<String>) -> Self {
        self.unit_of_measure = unit.into();
        self
    }

    pub fn with_supplier(mut self, supplier_id: SupplierId) -> Self {
        self.supplier_id = Some(supplier_id);
        self
    }

    pub fn with_minimum_quantity(mut self, minimum_quantity: u32) -> Self {
        self.minimum_quantity = minimum_quantity;
        self
    }
}

/// Partial update of a product's catalog attributes.
///
/// `None` fields are left untouched. The minimum-quantity threshold rides
/// along here because the original update surface treats it as a catalog
/// attribute, even though it is stored on the account.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub sku: Option<String>,
    pub unit_of_measure: Option<String>,
    pub cost_price: Option<Money>,
    pub sale_price: Option<Money>,
    pub category_id: Option<CategoryId>,
    pub supplier_id: Option<SupplierId>,
    pub minimum_quantity: Option<u32>,
}
