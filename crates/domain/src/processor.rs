//! Movement validation and application pipeline.

use chrono::{DateTime, Utc};
use common::MovementId;

use crate::account::ProductAccount;
use crate::error::MovementError;
use crate::movement::{MovementRecord, MovementRequest, MovementType};
use crate::product::Product;

/// Validates a movement request against a product account snapshot and, on
/// acceptance, produces the record together with the updated account.
///
/// The processor is pure: it never mutates its inputs, so the store can apply
/// the returned (record, account) pair atomically or discard both on
/// rejection. Validation order, first failure wins: positive quantity,
/// non-blank responsible user, reason/type agreement, outbound sale price
/// present and non-negative, sufficient stock. Product resolution happens in
/// the store before the processor runs.
pub struct MovementProcessor;

impl MovementProcessor {
    /// Applies `request` to the product's account snapshot.
    pub fn apply(
        product: &Product,
        account: &ProductAccount,
        request: &MovementRequest,
        timestamp: DateTime<Utc>,
    ) -> Result<(MovementRecord, ProductAccount), MovementError> {
        let record = MovementRecord::new(MovementId::new(), request, timestamp)?;

        let updated = match record.movement_type {
            MovementType::Inbound => account.record_inbound(record.quantity),
            MovementType::Outbound => {
                // Present by construction on outbound records.
                let sale_price = record.sale_price.ok_or(MovementError::MissingSalePrice)?;
                account.record_outbound(record.quantity, sale_price, product.cost_price())?
            }
        };

        Ok((record, updated))
    }
}
