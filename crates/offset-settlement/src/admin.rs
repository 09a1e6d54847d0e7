//! Administration: owner capability and balance recovery.
//!
//! Every administrative entry point calls [`Ownership::require_owner`]
//! first. There is exactly one owner; only the owner can hand the role on.

use offset_host::Host;
use offset_types::{Address, AssetHandle, OffsetError, Result};
use rust_decimal::Decimal;

/// Single-owner capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ownership {
    owner: Address,
}

impl Ownership {
    #[must_use]
    pub fn new(owner: Address) -> Self {
        Self { owner }
    }

    #[must_use]
    pub fn owner(&self) -> Address {
        self.owner
    }

    /// # Errors
    /// Returns `NotOwner` unless `caller` is the owner.
    pub fn require_owner(&self, caller: Address) -> Result<()> {
        if caller != self.owner {
            return Err(OffsetError::NotOwner { caller });
        }
        Ok(())
    }

    /// Hand ownership to `new_owner`. Only the current owner may do this.
    pub fn transfer(&mut self, caller: Address, new_owner: Address) -> Result<()> {
        self.require_owner(caller)?;
        if new_owner.is_zero() {
            return Err(OffsetError::ZeroAddress { what: "new owner" });
        }
        self.owner = new_owner;
        Ok(())
    }
}

/// Move the whole `custody` balance of each asset to `destination`.
///
/// Assets with nothing held are skipped; an asset listed twice is swept
/// once. Returns what was moved, in list order. The caller is expected to
/// have checked ownership and to run this inside a transaction.
pub fn sweep(
    host: &mut Host,
    custody: Address,
    assets: &[AssetHandle],
    destination: Address,
) -> Result<Vec<(AssetHandle, Decimal)>> {
    if assets.is_empty() {
        return Err(OffsetError::EmptyInput { what: "sweep assets" });
    }
    if destination.is_zero() {
        return Err(OffsetError::ZeroAddress {
            what: "sweep destination",
        });
    }
    let mut swept = Vec::with_capacity(assets.len());
    for asset in assets {
        let held = host.ledger().balance_of(custody, *asset);
        if held.is_zero() {
            continue;
        }
        host.ledger_mut().transfer(*asset, custody, destination, held)?;
        swept.push((*asset, held));
    }
    Ok(swept)
}
