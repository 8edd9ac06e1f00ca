use common::ProductId;
use domain::MovementError;
use thiserror::Error;

/// Errors that can occur when interacting with the ledger store.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// The targeted product does not exist.
    #[error("product not found: {0}")]
    NotFound(ProductId),

    /// A product with the same SKU already exists.
    #[error("SKU already registered: {0}")]
    DuplicateSku(String),

    /// The caller-supplied deadline elapsed before the per-product critical
    /// section could be entered. The movement was not applied.
    #[error("deadline exceeded before movement on product {0} could be applied")]
    DeadlineExceeded(ProductId),

    /// The movement was rejected by validation.
    #[error("movement rejected: {0}")]
    Movement(#[from] MovementError),
}

/// Result type for ledger store operations.
pub type Result<T> = std::result::Result<T, LedgerError>;
