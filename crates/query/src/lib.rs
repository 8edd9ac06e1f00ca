//! Read-side composition over the ledger store.
//!
//! This crate provides the query side of the system:
//! - [`QueryService`]: paginated product listings with derived fields,
//!   category/supplier name joins, and per-category stock/profit reports
//! - [`StockStatus`]: pure classification of (quantity, minimum threshold)
//! - [`CategoryDirectory`] / [`SupplierDirectory`]: collaborator traits for
//!   id-to-name lookups, with in-memory implementations
//!
//! The read side never computes stock quantities itself; it only projects
//! what the ledger store returns.

pub mod config;
pub mod directory;
pub mod error;
pub mod service;
pub mod status;
pub mod view;

pub use config::QueryConfig;
pub use directory::{
    CategoryDirectory, InMemoryCategoryDirectory, InMemorySupplierDirectory, SupplierDirectory,
};
pub use error::{QueryError, Result};
pub use service::QueryService;
pub use status::StockStatus;
pub use view::{ProductProfitView, ProductStockView, ProductView};
