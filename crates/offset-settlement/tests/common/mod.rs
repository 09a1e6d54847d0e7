//! Shared world for the settlement integration tests.
//!
//! One helper, one pool (`BCT`) backed by two credit units, one recording
//! certifier for both units, and a caller funded with `USDC` who has
//! authorized the helper over everything they hold.

#![allow(dead_code)]

use std::sync::Arc;

use offset_host::Host;
use offset_host::mock::{CertifierProbe, InventoryPool, ScriptedExchange};
use offset_settlement::OffsetHelper;
use offset_types::{
    Address, AssetHandle, CertificateData, HelperConfig, OffsetRequest, Result, RetirementBatch,
    SwapInstruction, constants::MAX_AMOUNT,
};
use rust_decimal::Decimal;

/// Units held by the pool reserve for the first credit unit. Anything
/// beyond this is drawn from the second unit.
pub const UNIT_A_INVENTORY: i64 = 60;
pub const CALLER_USDC: i64 = 1_000;

pub fn d(n: i64) -> Decimal {
    Decimal::new(n, 0)
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter("debug")
        .try_init();
}

pub struct World {
    pub host: Host,
    pub helper: Arc<OffsetHelper>,
    pub owner: Address,
    pub caller: Address,
    pub exchange: Address,
    pub usdc: AssetHandle,
    pub bct: AssetHandle,
    pub unit_a: AssetHandle,
    pub unit_b: AssetHandle,
    pub pool: Arc<InventoryPool>,
    pub certifier: Arc<CertifierProbe>,
}

impl World {
    pub fn new() -> Self {
        init_tracing();
        let owner = Address::derive("owner");
        let caller = Address::derive("alice");
        let exchange = Address::derive("exchange");
        let usdc = AssetHandle::derive("USDC");
        let bct = AssetHandle::derive("BCT");
        let unit_a = AssetHandle::derive("TCO2-VCS-191-2008");
        let unit_b = AssetHandle::derive("TCO2-VCS-1052-2012");

        let config = HelperConfig::new(owner, exchange).with_eligible_pool(bct);
        let helper = Arc::new(OffsetHelper::new(&config).expect("valid config"));
        let pool = Arc::new(InventoryPool::new(bct, vec![unit_a, unit_b]));
        let certifier = Arc::new(CertifierProbe::new());

        let mut host = Host::new();
        host.register_pool(bct, pool.clone());
        host.register_certifier(unit_a, certifier.clone());
        host.register_certifier(unit_b, certifier.clone());

        let ledger = host.ledger_mut();
        ledger.mint(unit_a, pool.reserve(), d(UNIT_A_INVENTORY)).unwrap();
        ledger.mint(unit_b, pool.reserve(), d(10_000)).unwrap();
        ledger.mint(usdc, caller, d(CALLER_USDC)).unwrap();
        for asset in [usdc, bct, unit_a, unit_b] {
            ledger
                .approve(caller, helper.address(), asset, MAX_AMOUNT)
                .unwrap();
        }

        Self {
            host,
            helper,
            owner,
            caller,
            exchange,
            usdc,
            bct,
            unit_a,
            unit_b,
            pool,
            certifier,
        }
    }

    /// Install a fixed-quote exchange selling `BCT` for `USDC`.
    pub fn with_dex(&mut self, takes_usdc: i64, gives_bct: i64) -> Arc<ScriptedExchange> {
        self.install_dex(ScriptedExchange::new(
            self.exchange,
            self.usdc,
            d(takes_usdc),
            self.bct,
            d(gives_bct),
        ))
    }

    pub fn install_dex(&mut self, dex: ScriptedExchange) -> Arc<ScriptedExchange> {
        let dex = Arc::new(dex);
        self.host
            .ledger_mut()
            .mint(self.bct, self.exchange, d(10_000))
            .unwrap();
        self.host.register_exchange(self.exchange, dex.clone());
        dex
    }

    /// Replace the certifier for both units.
    pub fn with_certifier(&mut self, probe: CertifierProbe) -> Arc<CertifierProbe> {
        let probe = Arc::new(probe);
        self.host.register_certifier(self.unit_a, probe.clone());
        self.host.register_certifier(self.unit_b, probe.clone());
        self.certifier = probe.clone();
        probe
    }

    pub fn swap_request(&self, target: i64, max_input: i64) -> OffsetRequest {
        OffsetRequest::new(
            self.bct,
            self.usdc,
            d(target),
            d(max_input),
            SwapInstruction::new(b"swapExactOut(USDC,BCT)".to_vec()),
            self.certificate(),
        )
    }

    /// Settle a `USDC -> BCT` swap request for the caller.
    pub fn settle(&mut self, target: i64, max_input: i64) -> Result<RetirementBatch> {
        let request = self.swap_request(target, max_input);
        self.helper.settle_offset(&mut self.host, self.caller, &request)
    }

    pub fn certificate(&self) -> CertificateData {
        CertificateData::new(
            "Acme Logistics",
            Address::derive("acme-treasury"),
            "Acme Logistics Ltd",
            "Q3 fleet emissions",
        )
    }

    pub fn balance(&self, holder: Address, asset: AssetHandle) -> Decimal {
        self.host.ledger().balance_of(holder, asset)
    }

    pub fn custody(&self, asset: AssetHandle) -> Decimal {
        self.balance(self.helper.address(), asset)
    }
}
