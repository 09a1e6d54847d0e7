//! Audit record emitted once per completed settlement.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{Address, AssetHandle, OffsetId};

/// Record of one successful settlement.
///
/// Outcomes form an append-only audit trail: they are written only after
/// every step of a settlement succeeded and are never updated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OffsetOutcome {
    pub id: OffsetId,
    /// Account that called the settlement.
    pub initiator: Address,
    /// Asset the caller paid with.
    pub input_asset: AssetHandle,
    /// Pooled asset that was redeemed.
    pub pool_asset: AssetHandle,
    /// Input asset actually consumed (ceiling minus refund).
    pub amount_spent: Decimal,
    /// Quantity of credits retired.
    pub amount_offset: Decimal,
    pub recorded_at: DateTime<Utc>,
}

impl OffsetOutcome {
    #[must_use]
    pub fn new(
        initiator: Address,
        input_asset: AssetHandle,
        pool_asset: AssetHandle,
        amount_spent: Decimal,
        amount_offset: Decimal,
    ) -> Self {
        Self {
            id: OffsetId::new(),
            initiator,
            input_asset,
            pool_asset,
            amount_spent,
            amount_offset,
            recorded_at: Utc::now(),
        }
    }
}
