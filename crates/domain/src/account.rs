//! Per-product aggregate: current quantity and running totals.

use serde::{Deserialize, Serialize};

use crate::error::MovementError;
use crate::money::Money;
use crate::movement::{MovementRecord, MovementType};

/// The per-product aggregate maintained alongside the movement ledger.
///
/// The ledger is the source of truth; this aggregate is a cache kept
/// consistent with it. [`ProductAccount::replay`] rebuilds the aggregate from
/// a movement history and must agree with the incrementally maintained value
/// after any accepted sequence.
///
/// Transition methods are pure: they return the updated account and leave
/// `self` untouched, so a rejected movement never leaves a half-applied
/// aggregate behind.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProductAccount {
    current_quantity: u64,
    minimum_quantity: u32,
    total_units_sold: u64,
    total_profit: Money,
}

impl ProductAccount {
    /// Creates an account at quantity zero with the given low-stock threshold.
    pub fn opening(minimum_quantity: u32) -> Self {
        Self {
            current_quantity: 0,
            minimum_quantity,
            total_units_sold: 0,
            total_profit: Money::zero(),
        }
    }

    /// Units currently on hand. Never negative by construction.
    pub fn current_quantity(&self) -> u64 {
        self.current_quantity
    }

    /// Low-stock threshold.
    pub fn minimum_quantity(&self) -> u32 {
        self.minimum_quantity
    }

    /// Cumulative outbound units. Monotonically non-decreasing.
    pub fn total_units_sold(&self) -> u64 {
        self.total_units_sold
    }

    /// Cumulative profit over outbound movements:
    /// Σ (sale price − cost price) × quantity.
    pub fn total_profit(&self) -> Money {
        self.total_profit
    }

    /// Returns a copy with a new low-stock threshold.
    pub fn with_minimum_quantity(mut self, minimum_quantity: u32) -> Self {
        self.minimum_quantity = minimum_quantity;
        self
    }

    /// Returns the account after an inbound movement of `quantity` units.
    pub fn record_inbound(&self, quantity: u32) -> Self {
        Self {
            current_quantity: self.current_quantity + quantity as u64,
            ..*self
        }
    }

    /// Returns the account after an outbound movement, or
    /// [`MovementError::InsufficientStock`] when the requested quantity
    /// exceeds the units on hand.
    pub fn record_outbound(
        &self,
        quantity: u32,
        sale_price: Money,
        cost_price: Money,
    ) -> Result<Self, MovementError> {
        if (quantity as u64) > self.current_quantity {
            return Err(MovementError::InsufficientStock {
                available: self.current_quantity,
                requested: quantity,
            });
        }

        Ok(Self {
            current_quantity: self.current_quantity - quantity as u64,
            minimum_quantity: self.minimum_quantity,
            total_units_sold: self.total_units_sold + quantity as u64,
            total_profit: self.total_profit + (sale_price - cost_price).multiply(quantity),
        })
    }

    /// Rebuilds the aggregate from a movement history.
    ///
    /// `cost_price` is the product's cost price used for profit attribution.
    /// An accepted history never drives the quantity negative; outbound
    /// records missing a sale price contribute no profit.
    pub fn replay<'a>(
        movements: impl IntoIterator<Item = &'a MovementRecord>,
        cost_price: Money,
        minimum_quantity: u32,
    ) -> Self {
        let mut account = Self::opening(minimum_quantity);
        for record in movements {
            match record.movement_type {
                MovementType::Inbound => {
                    account.current_quantity += record.quantity as u64;
                }
                MovementType::Outbound => {
                    account.current_quantity =
                        account.current_quantity.saturating_sub(record.quantity as u64);
                    account.total_units_sold += record.quantity as u64;
                    if let Some(sale_price) = record.sale_price {
                        account.total_profit += (sale_price - cost_price).multiply(record.quantity);
                    }
                }
            }
        }
        account
    }
}
