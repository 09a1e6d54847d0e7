//! Allowance manager.
//!
//! Before a counterpart pulls from custody, its authorization must cover
//! the amount. When it doesn't, the authorization is raised straight to
//! the representable maximum so later settlements for the same pair need
//! no further change. Existing authorizations are never lowered.

use offset_host::AssetLedger;
use offset_types::{Address, AssetHandle, Result, constants::MAX_AMOUNT};
use rust_decimal::Decimal;

/// Make sure `spender` may move at least `required` of `holder`'s `asset`.
///
/// Returns `true` if the authorization was raised, `false` if it already
/// sufficed.
pub fn ensure_authorized(
    ledger: &mut AssetLedger,
    holder: Address,
    asset: AssetHandle,
    spender: Address,
    required: Decimal,
) -> Result<bool> {
    let current = ledger.allowance(holder, spender, asset);
    if current >= required {
        return Ok(false);
    }
    ledger.increase_allowance(holder, spender, asset, MAX_AMOUNT - current)?;
    tracing::debug!(
        asset = %asset,
        spender = %spender,
        previous = %current,
        "Authorization raised to maximum"
    );
    Ok(true)
}
