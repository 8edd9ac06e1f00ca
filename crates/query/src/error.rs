//! Query-side error types.

use ledger_store::LedgerError;
use thiserror::Error;

/// Errors that can occur while serving queries.
#[derive(Debug, Error)]
pub enum QueryError {
    /// An error surfaced from the ledger store.
    #[error("ledger store error: {0}")]
    Ledger(#[from] LedgerError),
}

/// Result type for query operations.
pub type Result<T> = std::result::Result<T, QueryError>;
