//! Fungible asset ledger.
//!
//! Tracks per-(holder, asset) balances and per-(holder, spender, asset)
//! allowances. Every mutation is checked before it is applied: either the
//! full operation succeeds or the ledger is unchanged.

use std::collections::HashMap;

use offset_types::{Address, AssetHandle, OffsetError, Result, constants::MAX_AMOUNT};
use rust_decimal::Decimal;

/// Balance and allowance state for every asset on the host.
///
/// The native asset is addressed by [`AssetHandle::NATIVE`] and behaves
/// like any other asset here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetLedger {
    /// Per-(holder, asset) balances.
    balances: HashMap<(Address, AssetHandle), Decimal>,
    /// Per-(holder, spender, asset) standing authorizations.
    allowances: HashMap<(Address, Address, AssetHandle), Decimal>,
    /// Circulating supply per asset.
    supply: HashMap<AssetHandle, Decimal>,
}

fn non_negative(amount: Decimal) -> Result<()> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(OffsetError::NegativeAmount(amount));
    }
    Ok(())
}

impl AssetLedger {
    /// Create a new empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Balance of `holder` in `asset`. Unknown pairs are zero.
    #[must_use]
    pub fn balance_of(&self, holder: Address, asset: AssetHandle) -> Decimal {
        self.balances
            .get(&(holder, asset))
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    /// Authorization `spender` holds over `holder`'s `asset`.
    #[must_use]
    pub fn allowance(&self, holder: Address, spender: Address, asset: AssetHandle) -> Decimal {
        self.allowances
            .get(&(holder, spender, asset))
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    /// Circulating supply of an asset.
    #[must_use]
    pub fn total_supply(&self, asset: AssetHandle) -> Decimal {
        self.supply.get(&asset).copied().unwrap_or(Decimal::ZERO)
    }

    /// Create new units of `asset` in `to`'s balance.
    ///
    /// # Errors
    /// `NegativeAmount` or `Overflow`.
    pub fn mint(&mut self, asset: AssetHandle, to: Address, amount: Decimal) -> Result<()> {
        non_negative(amount)?;
        let supply = self
            .total_supply(asset)
            .checked_add(amount)
            .ok_or(OffsetError::Overflow("supply"))?;
        let balance = self
            .balance_of(to, asset)
            .checked_add(amount)
            .ok_or(OffsetError::Overflow("balance"))?;
        self.supply.insert(asset, supply);
        self.balances.insert((to, asset), balance);
        Ok(())
    }

    /// Destroy units of `asset` held by `from`.
    ///
    /// # Errors
    /// `InsufficientBalance` if `from` holds less than `amount`.
    pub fn burn(&mut self, asset: AssetHandle, from: Address, amount: Decimal) -> Result<()> {
        non_negative(amount)?;
        let balance = self.debit_checked(asset, from, amount)?;
        self.balances.insert((from, asset), balance);
        let supply = self.total_supply(asset) - amount;
        self.supply.insert(asset, supply);
        Ok(())
    }

    /// Move `amount` of `asset` from `from` to `to`.
    ///
    /// Zero-amount transfers succeed without touching state.
    ///
    /// # Errors
    /// `InsufficientBalance` if `from` holds less than `amount`.
    pub fn transfer(
        &mut self,
        asset: AssetHandle,
        from: Address,
        to: Address,
        amount: Decimal,
    ) -> Result<()> {
        non_negative(amount)?;
        if amount.is_zero() || from == to {
            // Self-transfers still require the balance to exist.
            if self.balance_of(from, asset) < amount {
                return Err(OffsetError::InsufficientBalance {
                    asset,
                    needed: amount,
                    available: self.balance_of(from, asset),
                });
            }
            return Ok(());
        }
        let debited = self.debit_checked(asset, from, amount)?;
        let credited = self
            .balance_of(to, asset)
            .checked_add(amount)
            .ok_or(OffsetError::Overflow("balance"))?;
        self.balances.insert((from, asset), debited);
        self.balances.insert((to, asset), credited);
        Ok(())
    }

    /// Move `amount` of `holder`'s `asset` to `to`, spending `spender`'s
    /// authorization. An authorization of [`MAX_AMOUNT`] is unlimited and
    /// is not decremented.
    ///
    /// # Errors
    /// - `InsufficientAllowance` if the authorization is below `amount`
    /// - `InsufficientBalance` if `holder` holds less than `amount`
    pub fn transfer_from(
        &mut self,
        asset: AssetHandle,
        spender: Address,
        holder: Address,
        to: Address,
        amount: Decimal,
    ) -> Result<()> {
        non_negative(amount)?;
        let allowed = self.allowance(holder, spender, asset);
        if allowed < amount {
            return Err(OffsetError::InsufficientAllowance {
                asset,
                needed: amount,
                allowed,
            });
        }
        self.transfer(asset, holder, to, amount)?;
        if allowed != MAX_AMOUNT {
            self.allowances
                .insert((holder, spender, asset), allowed - amount);
        }
        Ok(())
    }

    /// Set `spender`'s authorization over `holder`'s `asset` to exactly `amount`.
    pub fn approve(
        &mut self,
        holder: Address,
        spender: Address,
        asset: AssetHandle,
        amount: Decimal,
    ) -> Result<()> {
        non_negative(amount)?;
        self.allowances.insert((holder, spender, asset), amount);
        Ok(())
    }

    /// Raise `spender`'s authorization by `added`; returns the new value.
    ///
    /// # Errors
    /// `Overflow` if the result exceeds the representable maximum.
    pub fn increase_allowance(
        &mut self,
        holder: Address,
        spender: Address,
        asset: AssetHandle,
        added: Decimal,
    ) -> Result<Decimal> {
        non_negative(added)?;
        let raised = self
            .allowance(holder, spender, asset)
            .checked_add(added)
            .ok_or(OffsetError::Overflow("allowance"))?;
        self.allowances.insert((holder, spender, asset), raised);
        Ok(raised)
    }

    /// Every asset `holder` has a non-zero balance in, sorted.
    #[must_use]
    pub fn holdings(&self, holder: Address) -> Vec<AssetHandle> {
        let mut assets: Vec<AssetHandle> = self
            .balances
            .iter()
            .filter(|((h, _), amount)| *h == holder && !amount.is_zero())
            .map(|((_, asset), _)| *asset)
            .collect();
        assets.sort();
        assets
    }

    fn debit_checked(&self, asset: AssetHandle, from: Address, amount: Decimal) -> Result<Decimal> {
        let available = self.balance_of(from, asset);
        if available < amount {
            return Err(OffsetError::InsufficientBalance {
                asset,
                needed: amount,
                available,
            });
        }
        Ok(available - amount)
    }
}
