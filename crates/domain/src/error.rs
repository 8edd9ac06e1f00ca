//! Movement validation errors.

use common::ProductId;
use thiserror::Error;

use crate::movement::{MovementReason, MovementType};

/// Errors produced when validating or applying a movement.
///
/// All variants are detected before any state is mutated; a rejected movement
/// leaves the product's account and history untouched.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MovementError {
    /// The movement referenced a product that does not exist.
    #[error("unknown product: {0}")]
    UnknownProduct(ProductId),

    /// Movement quantity must be a positive integer.
    #[error("movement quantity must be greater than zero")]
    InvalidQuantity,

    /// The responsible user must be a non-empty string.
    #[error("a responsible user is required")]
    MissingResponsible,

    /// The reason does not belong to the movement type.
    #[error("reason '{reason}' is not valid for {movement_type} movements")]
    InvalidReason {
        movement_type: MovementType,
        reason: MovementReason,
    },

    /// Outbound movements require a non-negative sale price.
    #[error("outbound movements require a non-negative sale price")]
    MissingSalePrice,

    /// The outbound quantity exceeds the current stock.
    #[error("insufficient stock: available {available}, requested {requested}")]
    InsufficientStock { available: u64, requested: u32 },
}
