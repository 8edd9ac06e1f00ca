//! Category and supplier directory collaborators.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use common::{CategoryId, SupplierId};

/// Id-to-name lookup for product categories.
///
/// Owned by an external system; the read side only consumes it. Unknown ids
/// resolve to `None` rather than failing a whole listing.
#[async_trait]
pub trait CategoryDirectory: Send + Sync {
    /// Resolves a category id to its display name.
    async fn category_name(&self, id: CategoryId) -> Option<String>;
}

/// Id-to-name lookup for suppliers.
#[async_trait]
pub trait SupplierDirectory: Send + Sync {
    /// Resolves a supplier id to its display name.
    async fn supplier_name(&self, id: SupplierId) -> Option<String>;
}

/// In-memory category directory for composition and tests.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCategoryDirectory {
    names: Arc<RwLock<HashMap<CategoryId, String>>>,
}

impl InMemoryCategoryDirectory {
    /// Creates an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a category and returns its id.
    pub fn add(&self, name: impl Into<String>) -> CategoryId {
        let id = CategoryId::new();
        self.names.write().unwrap().insert(id, name.into());
        id
    }

    /// Registers a category under a fixed id.
    pub fn insert(&self, id: CategoryId, name: impl Into<String>) {
        self.names.write().unwrap().insert(id, name.into());
    }
}

#[async_trait]
impl CategoryDirectory for InMemoryCategoryDirectory {
    async fn category_name(&self, id: CategoryId) -> Option<String> {
        self.names.read().unwrap().get(&id).cloned()
    }
}

/// In-memory supplier directory for composition and tests.
#[derive(Debug, Clone, Default)]
pub struct InMemorySupplierDirectory {
    names: Arc<RwLock<HashMap<SupplierId, String>>>,
}

impl InMemorySupplierDirectory {
    /// Creates an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a supplier and returns its id.
    pub fn add(&self, name: impl Into<String>) -> SupplierId {
        let id = SupplierId::new();
        self.names.write().unwrap().insert(id, name.into());
        id
    }

    /// Registers a supplier under a fixed id.
    pub fn insert(&self, id: SupplierId, name: impl Into<String>) {
        self.names.write().unwrap().insert(id, name.into());
    }
}

#[async_trait]
impl SupplierDirectory for InMemorySupplierDirectory {
    async fn supplier_name(&self, id: SupplierId) -> Option<String> {
        self.names.read().unwrap().get(&id).cloned()
    }
}
