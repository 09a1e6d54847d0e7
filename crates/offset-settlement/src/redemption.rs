//! Redemption adapter: pooled asset in, serialized credit units out.
//!
//! Which units come back is decided entirely by the pool's redemption
//! authority. The adapter only checks the pool is registered and hands the
//! returned batch through untouched.

use offset_host::Host;
use offset_types::{Address, AssetHandle, OffsetError, Result, RetirementBatch};
use rust_decimal::Decimal;

use crate::registry::EligibilityRegistry;

/// Redeem `amount` of `pool` held by `holder`.
///
/// # Errors
/// - `NonRedeemable` if `pool` is not eligible; no collaborator is called
/// - the pool authority's failure, forwarded
pub fn redeem(
    host: &mut Host,
    registry: &EligibilityRegistry,
    holder: Address,
    pool: AssetHandle,
    amount: Decimal,
) -> Result<RetirementBatch> {
    if !registry.is_eligible(pool) {
        return Err(OffsetError::NonRedeemable(pool));
    }
    let authority = host.pool(pool)?;
    let batch = authority
        .redeem_auto(host, holder, amount)
        .map_err(|failure| failure.into_error(pool.address()))?;
    tracing::debug!(
        pool = %pool,
        amount = %amount,
        units = batch.len(),
        "Pool redeemed"
    );
    Ok(batch)
}
