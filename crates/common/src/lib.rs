//! Shared identifier types used across the inventory ledger crates.

mod types;

pub use types::{CategoryId, MovementId, ProductId, SupplierId};
