//! Retirement batch: the serialized credit units redeemed out of a pool.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{AssetHandle, OffsetError, Result};

/// Parallel sequences of serialized credit units and their quantities.
///
/// Position `i` of `units` pairs with position `i` of `amounts`. The
/// fields are public so a batch returned by an external pool can be
/// carried as-is; [`RetirementBatch::validate`] checks the shape before
/// anything is retired.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetirementBatch {
    /// Serialized credit unit handles, in redemption order.
    pub units: Vec<AssetHandle>,
    /// Quantity of each unit.
    pub amounts: Vec<Decimal>,
}

impl RetirementBatch {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a batch from (unit, amount) pairs.
    #[must_use]
    pub fn from_pairs(pairs: impl IntoIterator<Item = (AssetHandle, Decimal)>) -> Self {
        let (units, amounts) = pairs.into_iter().unzip();
        Self { units, amounts }
    }

    /// Append one unit.
    pub fn push(&mut self, unit: AssetHandle, amount: Decimal) {
        self.units.push(unit);
        self.amounts.push(amount);
    }

    /// Check the batch is non-empty and both sequences line up.
    ///
    /// # Errors
    /// - `EmptyBatch` if there are no units
    /// - `BatchLengthMismatch` if the sequences differ in length
    pub fn validate(&self) -> Result<()> {
        if self.units.len() != self.amounts.len() {
            return Err(OffsetError::BatchLengthMismatch {
                units: self.units.len(),
                amounts: self.amounts.len(),
            });
        }
        if self.units.is_empty() {
            return Err(OffsetError::EmptyBatch);
        }
        Ok(())
    }

    /// Iterate the positional (unit, amount) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&AssetHandle, &Decimal)> {
        self.units.iter().zip(self.amounts.iter())
    }

    /// Sum of all quantities.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.amounts.iter().copied().sum()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.units.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}
