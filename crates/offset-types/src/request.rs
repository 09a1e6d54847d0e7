//! Settlement request: everything the caller supplies for one offset.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{AssetHandle, CertificateData, OffsetError, Result, SwapInstruction};

/// Parameters of one settlement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OffsetRequest {
    /// Pooled asset to redeem and retire.
    pub pool_asset: AssetHandle,
    /// Asset the caller pays with.
    pub input_asset: AssetHandle,
    /// Exact quantity of credits to retire.
    pub target_offset: Decimal,
    /// Ceiling on input asset spent; pulled up front, unused part refunded.
    pub max_input: Decimal,
    /// Forwarded unchanged to the exchange when a swap is needed.
    pub swap_instruction: SwapInstruction,
    pub certificate: CertificateData,
}

impl OffsetRequest {
    #[must_use]
    pub fn new(
        pool_asset: AssetHandle,
        input_asset: AssetHandle,
        target_offset: Decimal,
        max_input: Decimal,
        swap_instruction: SwapInstruction,
        certificate: CertificateData,
    ) -> Self {
        Self {
            pool_asset,
            input_asset,
            target_offset,
            max_input,
            swap_instruction,
            certificate,
        }
    }

    /// Request paying directly with pool tokens: no swap, ceiling equals target.
    #[must_use]
    pub fn from_pool(
        pool_asset: AssetHandle,
        amount: Decimal,
        certificate: CertificateData,
    ) -> Self {
        Self::new(
            pool_asset,
            pool_asset,
            amount,
            amount,
            SwapInstruction::empty(),
            certificate,
        )
    }

    /// Amount checks that need no state.
    ///
    /// # Errors
    /// - `NegativeAmount` if either amount is negative
    /// - `ZeroOffsetAmount` if the target is zero
    pub fn validate(&self) -> Result<()> {
        for amount in [self.target_offset, self.max_input] {
            if amount.is_sign_negative() && !amount.is_zero() {
                return Err(OffsetError::NegativeAmount(amount));
            }
        }
        if self.target_offset.is_zero() {
            return Err(OffsetError::ZeroOffsetAmount);
        }
        Ok(())
    }
}
