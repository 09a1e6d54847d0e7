//! The execution host a helper runs inside.
//!
//! The host owns the asset ledger, the registered collaborators, and the
//! append-only outcome log. [`Host::transact`] is the atomicity boundary:
//! a failed transaction leaves no trace on the ledger or the log.

use std::{collections::HashMap, fmt, sync::Arc};

use offset_types::{Address, AssetHandle, OffsetError, OffsetOutcome, Result};

use crate::collaborator::{CertificationAuthority, Exchange, RedemptionAuthority};
use crate::ledger::AssetLedger;

/// Restorable snapshot of the host's transactional state.
#[derive(Debug, Clone)]
pub struct Checkpoint {
    ledger: AssetLedger,
    outcomes_len: usize,
}

/// Ledger, collaborators and outcome log.
#[derive(Default)]
pub struct Host {
    ledger: AssetLedger,
    /// Exchanges keyed by their address.
    exchanges: HashMap<Address, Arc<dyn Exchange>>,
    /// Redemption authority of each pool asset.
    pools: HashMap<AssetHandle, Arc<dyn RedemptionAuthority>>,
    /// Certification authority of each serialized credit unit.
    certifiers: HashMap<AssetHandle, Arc<dyn CertificationAuthority>>,
    /// Completed settlements, oldest first.
    outcomes: Vec<OffsetOutcome>,
}

impl Host {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn ledger(&self) -> &AssetLedger {
        &self.ledger
    }

    pub fn ledger_mut(&mut self) -> &mut AssetLedger {
        &mut self.ledger
    }

    pub fn register_exchange(&mut self, address: Address, exchange: Arc<dyn Exchange>) {
        self.exchanges.insert(address, exchange);
    }

    pub fn register_pool(&mut self, pool: AssetHandle, authority: Arc<dyn RedemptionAuthority>) {
        self.pools.insert(pool, authority);
    }

    pub fn register_certifier(
        &mut self,
        unit: AssetHandle,
        authority: Arc<dyn CertificationAuthority>,
    ) {
        self.certifiers.insert(unit, authority);
    }

    /// Exchange registered at `address`.
    ///
    /// # Errors
    /// `UnknownCollaborator` if nothing is registered there.
    pub fn exchange(&self, address: Address) -> Result<Arc<dyn Exchange>> {
        self.exchanges
            .get(&address)
            .cloned()
            .ok_or(OffsetError::UnknownCollaborator(address))
    }

    /// Redemption authority of `pool`.
    pub fn pool(&self, pool: AssetHandle) -> Result<Arc<dyn RedemptionAuthority>> {
        self.pools
            .get(&pool)
            .cloned()
            .ok_or(OffsetError::UnknownCollaborator(pool.address()))
    }

    /// Certification authority of `unit`.
    pub fn certifier(&self, unit: AssetHandle) -> Result<Arc<dyn CertificationAuthority>> {
        self.certifiers
            .get(&unit)
            .cloned()
            .ok_or(OffsetError::UnknownCollaborator(unit.address()))
    }

    /// Append a settlement record to the log.
    pub fn emit(&mut self, outcome: OffsetOutcome) {
        self.outcomes.push(outcome);
    }

    /// All recorded settlements, oldest first.
    #[must_use]
    pub fn outcomes(&self) -> &[OffsetOutcome] {
        &self.outcomes
    }

    #[must_use]
    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            ledger: self.ledger.clone(),
            outcomes_len: self.outcomes.len(),
        }
    }

    /// Roll the ledger and outcome log back to `checkpoint`.
    pub fn restore(&mut self, checkpoint: Checkpoint) {
        self.ledger = checkpoint.ledger;
        self.outcomes.truncate(checkpoint.outcomes_len);
    }

    /// Run `f` as one all-or-nothing unit.
    ///
    /// On `Err` every ledger mutation and outcome recorded inside `f` is
    /// undone and the error is returned unchanged. Transactions nest.
    pub fn transact<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        let checkpoint = self.checkpoint();
        match f(self) {
            Ok(value) => Ok(value),
            Err(err) => {
                tracing::warn!(error = %err, "Transaction reverted");
                self.restore(checkpoint);
                Err(err)
            }
        }
    }
}

impl fmt::Debug for Host {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Host")
            .field("ledger", &self.ledger)
            .field("exchanges", &self.exchanges.len())
            .field("pools", &self.pools.len())
            .field("certifiers", &self.certifiers.len())
            .field("outcomes", &self.outcomes.len())
            .finish()
    }
}
