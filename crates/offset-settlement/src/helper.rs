//! The settlement orchestrator.
//!
//! [`OffsetHelper::settle_offset`] turns a capped amount of any input
//! asset into retired credits in one all-or-nothing unit:
//!
//! 1. Pull `max_input` of the input asset from the caller into custody
//! 2. Make sure the exchange may pull the input asset from custody
//! 3. Acquire `target_offset` of the pool asset (swap, or nothing to do
//!    when the input asset is itself an eligible pool)
//! 4. Reject if more input was spent than `max_input`
//! 5. Redeem the pool asset into serialized credit units
//! 6. Refund the unspent input to the caller
//! 7. Retire every redeemed unit under the caller's certificate
//! 8. Record an [`OffsetOutcome`]
//!
//! Steps run inside [`Host::transact`], and the whole call holds the
//! helper's [`ReentrancyGuard`]: a collaborator calling back in gets
//! `ReentrantCall`, which fails and unwinds the outer settlement too.

use std::sync::{PoisonError, RwLock};

use offset_host::Host;
use offset_types::{
    Address, AssetHandle, CertificateData, HelperConfig, OffsetError, OffsetOutcome,
    OffsetRequest, Result, RetirementBatch, constants::{COMPONENT_NAME, MAX_AMOUNT, VERSION},
};
use rust_decimal::Decimal;

use crate::admin::{self, Ownership};
use crate::allowance::ensure_authorized;
use crate::exchange::ExchangeAdapter;
use crate::guard::ReentrancyGuard;
use crate::redemption;
use crate::registry::EligibilityRegistry;
use crate::retirement;

/// Swap-redeem-retire orchestrator bound to one custody address.
#[derive(Debug)]
pub struct OffsetHelper {
    /// Custody account the helper holds balances under.
    address: Address,
    exchange: ExchangeAdapter,
    ownership: RwLock<Ownership>,
    registry: RwLock<EligibilityRegistry>,
    guard: ReentrancyGuard,
}

impl OffsetHelper {
    /// Build a helper from validated configuration.
    pub fn new(config: &HelperConfig) -> Result<Self> {
        config.validate()?;
        tracing::info!(
            component = COMPONENT_NAME,
            version = VERSION,
            helper = %config.helper,
            owner = %config.owner,
            exchange = %config.exchange,
            pools = config.eligible_pools.len(),
            "Offset helper configured"
        );
        Ok(Self {
            address: config.helper,
            exchange: ExchangeAdapter::new(config.exchange),
            ownership: RwLock::new(Ownership::new(config.owner)),
            registry: RwLock::new(EligibilityRegistry::with_pools(
                config.eligible_pools.iter().copied(),
            )),
            guard: ReentrancyGuard::new(),
        })
    }

    /// Custody address.
    #[must_use]
    pub fn address(&self) -> Address {
        self.address
    }

    /// The fixed exchange address.
    #[must_use]
    pub fn exchange(&self) -> Address {
        self.exchange.address()
    }

    #[must_use]
    pub fn owner(&self) -> Address {
        self.ownership
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .owner()
    }

    #[must_use]
    pub fn is_eligible(&self, asset: AssetHandle) -> bool {
        self.registry
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_eligible(asset)
    }

    #[must_use]
    pub fn eligible_assets(&self) -> Vec<AssetHandle> {
        self.registry
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .eligible_assets()
    }

    /// Whether a guarded call is in flight.
    #[must_use]
    pub fn is_settling(&self) -> bool {
        self.guard.is_entered()
    }

    // =================================================================
    // Settlement
    // =================================================================

    /// Settle one offset for `caller`. Returns the retired batch.
    ///
    /// # Errors
    /// Any failure at any step; the host is left exactly as it was.
    pub fn settle_offset(
        &self,
        host: &mut Host,
        caller: Address,
        request: &OffsetRequest,
    ) -> Result<RetirementBatch> {
        let _entered = self.enter()?;
        request.validate()?;
        // Eligibility is read once; collaborators never see a lock held.
        let registry = self.registry_snapshot();
        host.transact(|host| self.settle_within(host, &registry, caller, request))
    }

    fn settle_within(
        &self,
        host: &mut Host,
        registry: &EligibilityRegistry,
        caller: Address,
        request: &OffsetRequest,
    ) -> Result<RetirementBatch> {
        let custody = self.address;
        let input = request.input_asset;
        let pool = request.pool_asset;
        let target = request.target_offset;
        let max_input = request.max_input;

        // 1. Pull the full ceiling into custody.
        host.ledger_mut()
            .transfer_from(input, custody, caller, custody, max_input)?;
        tracing::debug!(
            caller = %caller,
            asset = %input,
            amount = %max_input,
            "Input pulled into custody"
        );

        // 2. Exchange authorization over custody.
        ensure_authorized(host.ledger_mut(), custody, input, self.exchange.address(), max_input)?;

        // 3. Acquire the pool asset.
        let spent = if registry.is_eligible(input) {
            // Input already is a pool token: spent is defined as the target,
            // not measured.
            target
        } else {
            self.swap_for_pool(host, request)?
        };

        // 4. Price ceiling.
        if spent > max_input {
            return Err(OffsetError::Overspend {
                spent,
                max: max_input,
            });
        }

        // 5. Redeem.
        let batch = redemption::redeem(host, registry, custody, pool, target)?;

        // 6. Refund.
        let refund = max_input - spent;
        if refund > Decimal::ZERO {
            host.ledger_mut().transfer(input, custody, caller, refund)?;
            tracing::debug!(
                caller = %caller,
                asset = %input,
                amount = %refund,
                "Unused input refunded"
            );
        }

        // 7. Retire.
        retirement::retire_batch(host, custody, &batch, &request.certificate)?;

        // 8. Record.
        let outcome = OffsetOutcome::new(caller, input, pool, spent, target);
        tracing::info!(
            offset = %outcome.id,
            initiator = %caller,
            input = %input,
            pool = %pool,
            spent = %spent,
            offset_amount = %target,
            units = batch.len(),
            "Offset settled"
        );
        host.emit(outcome);
        Ok(batch)
    }

    /// Run the swap and measure custody balance deltas around it.
    ///
    /// Returns the input asset spent. The pool asset received must cover
    /// the target; any surplus stays in custody.
    fn swap_for_pool(&self, host: &mut Host, request: &OffsetRequest) -> Result<Decimal> {
        let custody = self.address;
        let input = request.input_asset;
        let pool = request.pool_asset;

        let pool_before = host.ledger().balance_of(custody, pool);
        let input_before = host.ledger().balance_of(custody, input);

        self.exchange
            .fill_instruction(host, custody, &request.swap_instruction)?;

        let pool_after = host.ledger().balance_of(custody, pool);
        let input_after = host.ledger().balance_of(custody, input);

        let received = pool_after - pool_before;
        if received < request.target_offset {
            return Err(OffsetError::Undershoot {
                received,
                required: request.target_offset,
            });
        }
        if input_after > input_before {
            return Err(OffsetError::Internal(format!(
                "custody {input} balance grew during swap: {input_before} -> {input_after}"
            )));
        }
        let spent = input_before - input_after;
        tracing::debug!(
            exchange = %self.exchange.address(),
            received = %received,
            spent = %spent,
            "Swap filled"
        );
        Ok(spent)
    }

    // =================================================================
    // Standalone operations
    // =================================================================

    /// Redeem `amount` of the caller's `pool` tokens and hand the units
    /// back to the caller.
    ///
    /// The caller must have authorized the helper to pull `amount`.
    ///
    /// # Errors
    /// `ZeroOffsetAmount` for a zero amount and `NonRedeemable` for an
    /// unregistered pool, both before anything moves.
    pub fn redeem(
        &self,
        host: &mut Host,
        caller: Address,
        pool: AssetHandle,
        amount: Decimal,
    ) -> Result<RetirementBatch> {
        let _entered = self.enter()?;
        if amount.is_zero() {
            return Err(OffsetError::ZeroOffsetAmount);
        }
        let registry = self.registry_snapshot();
        if !registry.is_eligible(pool) {
            return Err(OffsetError::NonRedeemable(pool));
        }
        let custody = self.address;
        host.transact(|host| {
            host.ledger_mut()
                .transfer_from(pool, custody, caller, custody, amount)?;
            let batch = redemption::redeem(host, &registry, custody, pool, amount)?;
            for (unit, quantity) in batch.iter() {
                host.ledger_mut().transfer(*unit, custody, caller, *quantity)?;
            }
            Ok(batch)
        })
    }

    /// Retire units the caller holds.
    ///
    /// The caller must have authorized the helper to pull every unit.
    pub fn retire_batch(
        &self,
        host: &mut Host,
        caller: Address,
        batch: &RetirementBatch,
        certificate: &CertificateData,
    ) -> Result<()> {
        let _entered = self.enter()?;
        batch.validate()?;
        let custody = self.address;
        host.transact(|host| {
            for (unit, quantity) in batch.iter() {
                host.ledger_mut()
                    .transfer_from(*unit, custody, caller, custody, *quantity)?;
            }
            retirement::retire_batch(host, custody, batch, certificate)
        })
    }

    /// Give `spender` unlimited authorization over custody-held `asset`.
    ///
    /// Returns `true` if the authorization changed.
    pub fn authorize_spender(
        &self,
        host: &mut Host,
        asset: AssetHandle,
        spender: Address,
    ) -> Result<bool> {
        ensure_authorized(host.ledger_mut(), self.address, asset, spender, MAX_AMOUNT)
    }

    /// Deposit surface for the native asset. Accepts and does nothing else;
    /// recover with [`OffsetHelper::sweep`].
    pub fn receive_native(&self, host: &mut Host, from: Address, amount: Decimal) -> Result<()> {
        host.ledger_mut()
            .transfer(AssetHandle::NATIVE, from, self.address, amount)?;
        tracing::debug!(from = %from, amount = %amount, "Native deposit received");
        Ok(())
    }

    // =================================================================
    // Administration
    // =================================================================

    /// Register `asset` as a redeemable pool. Owner only.
    pub fn set_eligible(&self, caller: Address, asset: AssetHandle) -> Result<()> {
        self.require_owner(caller)?;
        self.registry
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .set_eligible(asset);
        tracing::info!(asset = %asset, "Pool marked eligible");
        Ok(())
    }

    /// Deregister `asset`. Owner only.
    pub fn clear_eligible(&self, caller: Address, asset: AssetHandle) -> Result<()> {
        self.require_owner(caller)?;
        self.registry
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear_eligible(asset);
        tracing::info!(asset = %asset, "Pool eligibility cleared");
        Ok(())
    }

    /// Move every custody balance of `assets` to `destination`. Owner only.
    pub fn sweep(
        &self,
        host: &mut Host,
        caller: Address,
        assets: &[AssetHandle],
        destination: Address,
    ) -> Result<Vec<(AssetHandle, Decimal)>> {
        self.require_owner(caller)?;
        let custody = self.address;
        let swept = host.transact(|host| admin::sweep(host, custody, assets, destination))?;
        tracing::info!(
            destination = %destination,
            assets = swept.len(),
            "Custody swept"
        );
        Ok(swept)
    }

    /// Hand the owner role to `new_owner`. Owner only.
    pub fn transfer_ownership(&self, caller: Address, new_owner: Address) -> Result<()> {
        self.ownership
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .transfer(caller, new_owner)?;
        tracing::info!(previous = %caller, owner = %new_owner, "Ownership transferred");
        Ok(())
    }

    fn require_owner(&self, caller: Address) -> Result<()> {
        self.ownership
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .require_owner(caller)
    }

    fn registry_snapshot(&self) -> EligibilityRegistry {
        self.registry
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn enter(&self) -> Result<crate::guard::Entered<'_>> {
        self.guard.enter().inspect_err(|_| {
            tracing::warn!(helper = %self.address.short(), "Reentrant call rejected");
        })
    }
}
