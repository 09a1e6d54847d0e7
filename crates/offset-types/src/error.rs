//! Error types for the offset helper.
//!
//! All errors use the `OS_ERR_` prefix convention for easy grepping in logs.
//! Error codes are grouped by category:
//! - 1xx: Validation errors (caller-fixable)
//! - 2xx: Authorization and balance errors
//! - 3xx: Collaborator failures (exchange, pool, certifier)
//! - 4xx: Reentrancy
//! - 9xx: General / internal errors

use rust_decimal::Decimal;
use thiserror::Error;

use crate::{Address, AssetHandle};

/// Central error enum for all offset helper operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OffsetError {
    // =================================================================
    // Validation Errors (1xx)
    // =================================================================
    /// The requested offset amount must be strictly positive.
    #[error("OS_ERR_100: Offset amount must be greater than zero")]
    ZeroOffsetAmount,

    /// More input asset was spent than the caller's ceiling allows.
    #[error("OS_ERR_101: Overspend: spent {spent}, ceiling {max}")]
    Overspend { spent: Decimal, max: Decimal },

    /// The exchange delivered less pooled asset than required.
    #[error("OS_ERR_102: Undershoot: received {received}, required {required}")]
    Undershoot { received: Decimal, required: Decimal },

    /// The asset is not registered as a redeemable pool.
    #[error("OS_ERR_103: Asset is not redeemable: {0}")]
    NonRedeemable(AssetHandle),

    /// A retirement batch carried no units.
    #[error("OS_ERR_104: Retirement batch is empty")]
    EmptyBatch,

    /// The unit and amount sequences of a batch differ in length.
    #[error("OS_ERR_105: Retirement batch length mismatch: {units} units, {amounts} amounts")]
    BatchLengthMismatch { units: usize, amounts: usize },

    /// An administrative operation received an empty list.
    #[error("OS_ERR_106: Empty input: {what}")]
    EmptyInput { what: &'static str },

    /// The zero address was supplied where a real account is required.
    #[error("OS_ERR_107: Zero address not allowed for {what}")]
    ZeroAddress { what: &'static str },

    /// Quantities are never negative.
    #[error("OS_ERR_108: Negative amount: {0}")]
    NegativeAmount(Decimal),

    // =================================================================
    // Authorization / Balance Errors (2xx)
    // =================================================================
    /// Caller is not the helper's owner.
    #[error("OS_ERR_200: Caller {caller} is not the owner")]
    NotOwner { caller: Address },

    /// Holder does not have enough of the asset.
    #[error("OS_ERR_201: Insufficient balance of {asset}: need {needed}, have {available}")]
    InsufficientBalance {
        asset: AssetHandle,
        needed: Decimal,
        available: Decimal,
    },

    /// Spender's standing authorization is too small.
    #[error("OS_ERR_202: Insufficient allowance on {asset}: need {needed}, have {allowed}")]
    InsufficientAllowance {
        asset: AssetHandle,
        needed: Decimal,
        allowed: Decimal,
    },

    // =================================================================
    // Collaborator Failures (3xx)
    // =================================================================
    /// A collaborator rejected the call with its own diagnostic payload.
    /// The payload is the callee's bytes, unmodified.
    #[error("OS_ERR_300: External call to {callee} reverted ({} byte payload)", .payload.len())]
    ExternalRevert { callee: Address, payload: Vec<u8> },

    /// A collaborator failed without any diagnostic payload.
    #[error("OS_ERR_301: External call to {callee} failed")]
    CallFailed { callee: Address },

    /// No collaborator is registered at the addressed location.
    #[error("OS_ERR_302: No collaborator registered at {0}")]
    UnknownCollaborator(Address),

    // =================================================================
    // Reentrancy (4xx)
    // =================================================================
    /// A settlement was entered while another is still in flight.
    #[error("OS_ERR_400: Reentrant call rejected")]
    ReentrantCall,

    // =================================================================
    // General / Internal (9xx)
    // =================================================================
    /// A checked arithmetic operation overflowed.
    #[error("OS_ERR_900: Arithmetic overflow: {0}")]
    Overflow(&'static str),

    /// Configuration error (invalid config file, missing fields, etc.).
    #[error("OS_ERR_901: Configuration error: {0}")]
    Configuration(String),

    /// Serialization / deserialization error.
    #[error("OS_ERR_902: Serialization error: {0}")]
    Serialization(String),

    /// Unrecoverable internal error.
    #[error("OS_ERR_903: Internal error: {0}")]
    Internal(String),
}

impl OffsetError {
    /// The forwarded collaborator payload, if this error carries one.
    #[must_use]
    pub fn revert_payload(&self) -> Option<&[u8]> {
        match self {
            Self::ExternalRevert { payload, .. } => Some(payload),
            _ => None,
        }
    }

    /// Whether the caller can fix this by resubmitting a corrected request.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::ZeroOffsetAmount
                | Self::Overspend { .. }
                | Self::Undershoot { .. }
                | Self::NonRedeemable(_)
                | Self::EmptyBatch
                | Self::BatchLengthMismatch { .. }
                | Self::EmptyInput { .. }
                | Self::ZeroAddress { .. }
                | Self::NegativeAmount(_)
        )
    }
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, OffsetError>;

impl From<serde_json::Error> for OffsetError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
