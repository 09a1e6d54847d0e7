//! Scripted collaborators for tests. **Never use in production.**

use std::sync::{
    Mutex,
    atomic::{AtomicUsize, Ordering},
};

use offset_types::{Address, AssetHandle, CertificateData, RetirementBatch, SwapInstruction};
use rust_decimal::Decimal;

use crate::collaborator::{
    CallFailure, CallResult, CertificationAuthority, Exchange, RedemptionAuthority,
};
use crate::host::Host;

// ---------------------------------------------------------------------------
// ScriptedExchange
// ---------------------------------------------------------------------------

/// Exchange with a fixed quote: pulls `sell_amount` of `sell` from the
/// caller through its allowance and pays `buy_amount` of `buy` out of its
/// own reserves.
#[derive(Debug)]
pub struct ScriptedExchange {
    address: Address,
    sell: AssetHandle,
    sell_amount: Decimal,
    buy: AssetHandle,
    buy_amount: Decimal,
    revert_with: Option<Vec<u8>>,
    calls: AtomicUsize,
    instructions: Mutex<Vec<SwapInstruction>>,
}

impl ScriptedExchange {
    #[must_use]
    pub fn new(
        address: Address,
        sell: AssetHandle,
        sell_amount: Decimal,
        buy: AssetHandle,
        buy_amount: Decimal,
    ) -> Self {
        Self {
            address,
            sell,
            sell_amount,
            buy,
            buy_amount,
            revert_with: None,
            calls: AtomicUsize::new(0),
            instructions: Mutex::new(Vec::new()),
        }
    }

    /// Reject every fill with `payload` (empty means no reason given).
    #[must_use]
    pub fn reverting(mut self, payload: Vec<u8>) -> Self {
        self.revert_with = Some(payload);
        self
    }

    #[must_use]
    pub fn address(&self) -> Address {
        self.address
    }

    /// Number of fills attempted.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Instructions received, in call order.
    #[must_use]
    pub fn instructions(&self) -> Vec<SwapInstruction> {
        self.instructions
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }
}

impl Exchange for ScriptedExchange {
    fn fill(
        &self,
        host: &mut Host,
        caller: Address,
        instruction: &SwapInstruction,
    ) -> CallResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut seen) = self.instructions.lock() {
            seen.push(instruction.clone());
        }
        if let Some(payload) = &self.revert_with {
            return Err(CallFailure::Revert(payload.clone()));
        }
        let ledger = host.ledger_mut();
        ledger.transfer_from(self.sell, self.address, caller, self.address, self.sell_amount)?;
        ledger.transfer(self.buy, self.address, caller, self.buy_amount)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// InventoryPool
// ---------------------------------------------------------------------------

/// Pool that burns the caller's pool tokens and pays out units from its
/// reserve in inventory order, draining each unit before the next.
///
/// The reserve is held at the pool asset's own address.
#[derive(Debug)]
pub struct InventoryPool {
    pool: AssetHandle,
    inventory: Vec<AssetHandle>,
    calls: AtomicUsize,
}

impl InventoryPool {
    #[must_use]
    pub fn new(pool: AssetHandle, inventory: Vec<AssetHandle>) -> Self {
        Self {
            pool,
            inventory,
            calls: AtomicUsize::new(0),
        }
    }

    /// Account holding the pool's unit reserve.
    #[must_use]
    pub fn reserve(&self) -> Address {
        self.pool.address()
    }

    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl RedemptionAuthority for InventoryPool {
    fn redeem_auto(
        &self,
        host: &mut Host,
        caller: Address,
        amount: Decimal,
    ) -> CallResult<RetirementBatch> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let reserve = self.reserve();
        let ledger = host.ledger_mut();
        ledger.burn(self.pool, caller, amount)?;

        let mut batch = RetirementBatch::new();
        let mut remaining = amount;
        for unit in &self.inventory {
            if remaining.is_zero() {
                break;
            }
            let take = ledger.balance_of(reserve, *unit).min(remaining);
            if take.is_zero() {
                continue;
            }
            ledger.transfer(*unit, reserve, caller, take)?;
            batch.push(*unit, take);
            remaining -= take;
        }
        if !remaining.is_zero() {
            return Err(CallFailure::reason("pool: insufficient unit inventory"));
        }
        Ok(batch)
    }
}

// ---------------------------------------------------------------------------
// CertifierProbe
// ---------------------------------------------------------------------------

/// One retirement as seen by [`CertifierProbe`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetirementCall {
    pub caller: Address,
    pub unit: AssetHandle,
    pub certificate: CertificateData,
    pub amount: Decimal,
}

/// Certifier that burns the retired units and records every call.
///
/// Register one probe for many units to count calls across a batch.
#[derive(Debug, Default)]
pub struct CertifierProbe {
    fail_on: Option<(AssetHandle, Vec<u8>)>,
    calls: AtomicUsize,
    retired: Mutex<Vec<RetirementCall>>,
}

impl CertifierProbe {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Revert with `payload` whenever `unit` is retired.
    #[must_use]
    pub fn failing_on(mut self, unit: AssetHandle, payload: Vec<u8>) -> Self {
        self.fail_on = Some((unit, payload));
        self
    }

    /// Number of calls received, successful or not.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Successful retirements, in call order.
    #[must_use]
    pub fn retired(&self) -> Vec<RetirementCall> {
        self.retired
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }
}

impl CertificationAuthority for CertifierProbe {
    fn retire_and_mint_certificate(
        &self,
        host: &mut Host,
        caller: Address,
        unit: AssetHandle,
        certificate: &CertificateData,
        amount: Decimal,
    ) -> CallResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some((failing, payload)) = &self.fail_on {
            if *failing == unit {
                return Err(CallFailure::Revert(payload.clone()));
            }
        }
        host.ledger_mut().burn(unit, caller, amount)?;
        if let Ok(mut retired) = self.retired.lock() {
            retired.push(RetirementCall {
                caller,
                unit,
                certificate: certificate.clone(),
                amount,
            });
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Closure-backed collaborators
// ---------------------------------------------------------------------------

/// Exchange whose fill runs an arbitrary closure, e.g. a re-entrant call.
pub struct FnExchange<F>(pub F);

impl<F> Exchange for FnExchange<F>
where
    F: Fn(&mut Host, Address, &SwapInstruction) -> CallResult<()> + Send + Sync,
{
    fn fill(
        &self,
        host: &mut Host,
        caller: Address,
        instruction: &SwapInstruction,
    ) -> CallResult<()> {
        (self.0)(host, caller, instruction)
    }
}

/// Certifier whose retirement runs an arbitrary closure.
pub struct FnCertifier<F>(pub F);

impl<F> CertificationAuthority for FnCertifier<F>
where
    F: Fn(&mut Host, Address, AssetHandle, &CertificateData, Decimal) -> CallResult<()>
        + Send
        + Sync,
{
    fn retire_and_mint_certificate(
        &self,
        host: &mut Host,
        caller: Address,
        unit: AssetHandle,
        certificate: &CertificateData,
        amount: Decimal,
    ) -> CallResult<()> {
        (self.0)(host, caller, unit, certificate, amount)
    }
}
