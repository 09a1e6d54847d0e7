//! Retirement adapter: permanently retires every unit of a batch.
//!
//! The batch shape is checked before anything else happens, and every
//! unit's certifier is resolved before the first retirement, so a
//! malformed batch or an unknown unit costs zero external calls. A
//! failure on any unit stops the loop; the enclosing transaction undoes
//! the units already retired.

use offset_host::Host;
use offset_types::{Address, CertificateData, Result, RetirementBatch};

/// Retire each (unit, amount) pair of `batch` held by `holder`, in order.
///
/// # Errors
/// - `EmptyBatch` / `BatchLengthMismatch` for a malformed batch
/// - `UnknownCollaborator` if a unit has no certifier
/// - the first certifier failure, forwarded
pub fn retire_batch(
    host: &mut Host,
    holder: Address,
    batch: &RetirementBatch,
    certificate: &CertificateData,
) -> Result<()> {
    batch.validate()?;
    let certifiers = batch
        .units
        .iter()
        .map(|unit| host.certifier(*unit))
        .collect::<Result<Vec<_>>>()?;

    for ((unit, amount), certifier) in batch.iter().zip(certifiers) {
        certifier
            .retire_and_mint_certificate(host, holder, *unit, certificate, *amount)
            .map_err(|failure| failure.into_error(unit.address()))?;
        tracing::debug!(
            unit = %unit,
            amount = %amount,
            beneficiary = %certificate.beneficiary,
            "Unit retired"
        );
    }
    Ok(())
}
