//! Interfaces of the external systems a settlement calls into.
//!
//! Collaborators are untrusted. Each call receives the host mutably, so a
//! collaborator can move assets, call other collaborators, or even call
//! back into the helper. Whatever it does is undone if the enclosing
//! transaction fails.

use offset_types::{
    Address, AssetHandle, CertificateData, OffsetError, RetirementBatch, SwapInstruction,
};
use rust_decimal::Decimal;

use crate::host::Host;

/// How a collaborator call failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallFailure {
    /// The callee rejected the call with its own diagnostic bytes.
    /// Empty bytes mean the callee gave no reason.
    Revert(Vec<u8>),
    /// A call the callee itself made failed; the error is bubbled up as-is.
    Nested(OffsetError),
}

impl CallFailure {
    /// Revert with a UTF-8 reason string.
    #[must_use]
    pub fn reason(reason: &str) -> Self {
        Self::Revert(reason.as_bytes().to_vec())
    }

    /// Convert into the error the helper surfaces to its caller.
    ///
    /// Payload bytes and nested errors pass through unmodified; only an
    /// empty revert collapses into the generic `CallFailed`.
    #[must_use]
    pub fn into_error(self, callee: Address) -> OffsetError {
        match self {
            Self::Revert(payload) if payload.is_empty() => OffsetError::CallFailed { callee },
            Self::Revert(payload) => OffsetError::ExternalRevert { callee, payload },
            Self::Nested(err) => err,
        }
    }
}

impl From<OffsetError> for CallFailure {
    fn from(err: OffsetError) -> Self {
        Self::Nested(err)
    }
}

/// Result of a collaborator call.
pub type CallResult<T> = std::result::Result<T, CallFailure>;

/// External exchange that fills opaque swap instructions.
pub trait Exchange: Send + Sync {
    /// Execute `instruction` on behalf of `caller`.
    fn fill(
        &self,
        host: &mut Host,
        caller: Address,
        instruction: &SwapInstruction,
    ) -> CallResult<()>;
}

/// Pool that converts pooled tokens into serialized credit units.
pub trait RedemptionAuthority: Send + Sync {
    /// Burn `amount` of the pool held by `caller` and hand back units
    /// totalling `amount`. Selection of units is the pool's business.
    fn redeem_auto(
        &self,
        host: &mut Host,
        caller: Address,
        amount: Decimal,
    ) -> CallResult<RetirementBatch>;
}

/// Registry that permanently retires serialized credit units.
pub trait CertificationAuthority: Send + Sync {
    /// Retire `amount` of `unit` held by `caller` under `certificate`.
    fn retire_and_mint_certificate(
        &self,
        host: &mut Host,
        caller: Address,
        unit: AssetHandle,
        certificate: &CertificateData,
        amount: Decimal,
    ) -> CallResult<()>;
}
