//! # offset-host
//!
//! The execution host an offset helper runs inside.
//!
//! - [`AssetLedger`]: fungible balances, allowances, mint/burn
//! - [`Host`]: ledger + registered collaborators + outcome log, with
//!   [`Host::transact`] as the all-or-nothing boundary
//! - [`Exchange`], [`RedemptionAuthority`], [`CertificationAuthority`]:
//!   the external systems a settlement calls into
//! - [`CallFailure`]: how those systems report failure
//!
//! With the `test-helpers` feature, [`mock`] provides scripted
//! collaborators for exercising settlements end to end.

pub mod collaborator;
pub mod host;
pub mod ledger;
#[cfg(any(test, feature = "test-helpers"))]
pub mod mock;

pub use collaborator::{
    CallFailure, CallResult, CertificationAuthority, Exchange, RedemptionAuthority,
};
pub use host::{Checkpoint, Host};
pub use ledger::AssetLedger;
