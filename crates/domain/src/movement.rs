//! Movement vocabulary and the immutable movement record.

use chrono::{DateTime, Utc};
use common::{MovementId, ProductId};
use serde::{Deserialize, Serialize};

use crate::error::MovementError;
use crate::money::Money;

/// Direction of a stock movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MovementType {
    /// Stock enters the warehouse.
    Inbound,
    /// Stock leaves the warehouse.
    Outbound,
}

impl std::fmt::Display for MovementType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MovementType::Inbound => write!(f, "inbound"),
            MovementType::Outbound => write!(f, "outbound"),
        }
    }
}

/// Reason attached to a movement. Each reason belongs to exactly one
/// [`MovementType`]; the pairing is validated centrally by the processor
/// rather than at call sites.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MovementReason {
    // Inbound
    Purchase,
    Restock,
    Return,
    // Outbound
    Sale,
    Loss,
    Damage,
}

impl MovementReason {
    /// Returns the movement type this reason belongs to.
    pub fn movement_type(&self) -> MovementType {
        match self {
            MovementReason::Purchase | MovementReason::Restock | MovementReason::Return => {
                MovementType::Inbound
            }
            MovementReason::Sale | MovementReason::Loss | MovementReason::Damage => {
                MovementType::Outbound
            }
        }
    }

    /// Returns true if this reason is valid for the given movement type.
    pub fn valid_for(&self, movement_type: MovementType) -> bool {
        self.movement_type() == movement_type
    }

    /// Returns all reasons valid for the given movement type.
    pub fn all_for(movement_type: MovementType) -> &'static [MovementReason] {
        match movement_type {
            MovementType::Inbound => &[
                MovementReason::Purchase,
                MovementReason::Restock,
                MovementReason::Return,
            ],
            MovementType::Outbound => &[
                MovementReason::Sale,
                MovementReason::Loss,
                MovementReason::Damage,
            ],
        }
    }
}

impl std::fmt::Display for MovementReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            MovementReason::Purchase => "purchase",
            MovementReason::Restock => "restock",
            MovementReason::Return => "return",
            MovementReason::Sale => "sale",
            MovementReason::Loss => "loss",
            MovementReason::Damage => "damage",
        };
        write!(f, "{name}")
    }
}

/// A request to apply a movement against a product.
///
/// The sale price is optional on outbound requests: when absent, the store
/// fills in the product's catalog sale price before validation. It is ignored
/// on inbound requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovementRequest {
    /// The product the movement targets.
    pub product_id: ProductId,

    /// Direction of the movement.
    pub movement_type: MovementType,

    /// Number of units moved.
    pub quantity: u32,

    /// Who recorded the movement.
    pub responsible_user: String,

    /// Why the movement happened.
    pub reason: MovementReason,

    /// Sale price per unit for outbound movements.
    pub sale_price: Option<Money>,
}

impl MovementRequest {
    /// Creates an inbound movement request.
    pub fn inbound(
        product_id: ProductId,
        quantity: u32,
        responsible_user: impl Into<String>,
        reason: MovementReason,
    ) -> Self {
        Self {
            product_id,
            movement_type: MovementType::Inbound,
            quantity,
            responsible_user: responsible_user.into(),
            reason,
            sale_price: None,
        }
    }

    /// Creates an outbound movement request.
    pub fn outbound(
        product_id: ProductId,
        quantity: u32,
        responsible_user: impl Into<String>,
        reason: MovementReason,
        sale_price: Option<Money>,
    ) -> Self {
        Self {
            product_id,
            movement_type: MovementType::Outbound,
            quantity,
            responsible_user: responsible_user.into(),
            reason,
            sale_price,
        }
    }

    /// Returns a copy with the sale price filled in from `default` when the
    /// request is outbound and no price was supplied.
    pub fn with_sale_price_default(mut self, default: Money) -> Self {
        if self.movement_type == MovementType::Outbound && self.sale_price.is_none() {
            self.sale_price = Some(default);
        }
        self
    }
}

/// An immutable record of one stock-affecting event.
///
/// Records are only ever created by the movement processor on acceptance and
/// form the append-only ledger that is the source of truth for stock
/// quantities. They are never updated or deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovementRecord {
    /// Unique identifier of this record.
    pub id: MovementId,

    /// The product this movement applies to.
    pub product_id: ProductId,

    /// Direction of the movement.
    pub movement_type: MovementType,

    /// Number of units moved (always positive).
    pub quantity: u32,

    /// When the movement was recorded.
    pub timestamp: DateTime<Utc>,

    /// Who recorded the movement.
    pub responsible_user: String,

    /// Why the movement happened.
    pub reason: MovementReason,

    /// Sale price per unit. Present exactly when the movement is outbound.
    pub sale_price: Option<Money>,
}

impl MovementRecord {
    /// Validates and constructs a record from an accepted request.
    ///
    /// Checks, in order: quantity is positive, the responsible user is
    /// non-blank, the reason belongs to the movement type, and outbound
    /// movements carry a non-negative sale price. A sale price supplied on an
    /// inbound request is normalized away.
    pub fn new(
        id: MovementId,
        request: &MovementRequest,
        timestamp: DateTime<Utc>,
    ) -> Result<Self, MovementError> {
        if request.quantity == 0 {
            return Err(MovementError::InvalidQuantity);
        }

        if request.responsible_user.trim().is_empty() {
            return Err(MovementError::MissingResponsible);
        }

        if !request.reason.valid_for(request.movement_type) {
            return Err(MovementError::InvalidReason {
                movement_type: request.movement_type,
                reason: request.reason,
            });
        }

        let sale_price = match request.movement_type {
            MovementType::Outbound => match request.sale_price {
                Some(price) if !price.is_negative() => Some(price),
                _ => return Err(MovementError::MissingSalePrice),
            },
            MovementType::Inbound => None,
        };

        Ok(Self {
            id,
            product_id: request.product_id,
            movement_type: request.movement_type,
            quantity: request.quantity,
            timestamp,
            responsible_user: request.responsible_user.trim().to_string(),
            reason: request.reason,
            sale_price,
        })
    }
}
