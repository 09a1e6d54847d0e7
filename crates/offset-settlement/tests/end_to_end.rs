//! End-to-end settlement tests.
//!
//! These drive `settle_offset` through the full pipeline:
//! custody pull -> exchange authorization -> swap -> redeem -> refund -> retire
//!
//! and check the accounting on every path: self-pool, swap with refund,
//! undershoot and overspend, plus the standalone and admin entry points.

mod common;

use common::{CALLER_USDC, UNIT_A_INVENTORY, World, d};
use offset_types::{
    AssetHandle, OffsetError, OffsetOutcome, OffsetRequest, RetirementBatch, SwapInstruction,
    constants::MAX_AMOUNT,
};
use rand::{Rng, SeedableRng, rngs::StdRng};
use rust_decimal::Decimal;

// ═══════════════════════════════════════════════════════════════════
// Settlement paths
// ═══════════════════════════════════════════════════════════════════

#[test]
fn self_pool_settlement_skips_exchange() {
    let mut w = World::new();
    let dex = w.with_dex(1, 1);
    w.host.ledger_mut().mint(w.bct, w.caller, d(100)).unwrap();

    let request = OffsetRequest::from_pool(w.bct, d(100), w.certificate());
    let batch = w.helper.settle_offset(&mut w.host, w.caller, &request).unwrap();

    assert_eq!(dex.calls(), 0, "self-pool must not touch the exchange");
    assert_eq!(batch.total(), d(100));
    assert_eq!(w.balance(w.caller, w.bct), Decimal::ZERO, "nothing refunded");

    let outcome = &w.host.outcomes()[0];
    assert_eq!(outcome.amount_spent, d(100));
    assert_eq!(outcome.amount_offset, d(100));
    assert_eq!(outcome.input_asset, w.bct);
    assert_eq!(outcome.pool_asset, w.bct);
}

#[test]
fn self_pool_refunds_ceiling_above_target() {
    let mut w = World::new();
    w.host.ledger_mut().mint(w.bct, w.caller, d(150)).unwrap();

    let request = OffsetRequest::new(
        w.bct,
        w.bct,
        d(100),
        d(150),
        SwapInstruction::empty(),
        w.certificate(),
    );
    let batch = w.helper.settle_offset(&mut w.host, w.caller, &request).unwrap();

    assert_eq!(batch.total(), d(100));
    assert_eq!(w.balance(w.caller, w.bct), d(50));
    assert_eq!(w.custody(w.bct), Decimal::ZERO);
    assert_eq!(w.host.outcomes()[0].amount_spent, d(100));
}

#[test]
fn self_pool_target_above_ceiling_overspends() {
    let mut w = World::new();
    w.host.ledger_mut().mint(w.bct, w.caller, d(50)).unwrap();
    let before = w.host.ledger().clone();

    let request = OffsetRequest::new(
        w.bct,
        w.bct,
        d(100),
        d(50),
        SwapInstruction::empty(),
        w.certificate(),
    );
    let err = w
        .helper
        .settle_offset(&mut w.host, w.caller, &request)
        .unwrap_err();

    assert_eq!(
        err,
        OffsetError::Overspend {
            spent: d(100),
            max: d(50),
        }
    );
    assert_eq!(w.host.ledger(), &before);
    assert_eq!(w.pool.calls(), 0);
    assert!(w.host.outcomes().is_empty());
}

/// An eligible input that is not the requested pool skips the exchange;
/// the pool asset is redeemed from whatever custody already holds.
fn foreign_pool_world() -> (World, AssetHandle, OffsetRequest) {
    let mut w = World::new();
    let nct = AssetHandle::derive("NCT");
    w.helper.set_eligible(w.owner, nct).unwrap();
    let custody = w.helper.address();
    let ledger = w.host.ledger_mut();
    ledger.mint(nct, w.caller, d(150)).unwrap();
    ledger.approve(w.caller, custody, nct, MAX_AMOUNT).unwrap();

    let request = OffsetRequest::new(
        w.bct,
        nct,
        d(100),
        d(150),
        SwapInstruction::empty(),
        w.certificate(),
    );
    (w, nct, request)
}

#[test]
fn eligible_foreign_input_redeems_from_custody() {
    let (mut w, nct, request) = foreign_pool_world();
    let dex = w.with_dex(1, 1);
    let custody = w.helper.address();
    w.host.ledger_mut().mint(w.bct, custody, d(100)).unwrap();

    let batch = w.helper.settle_offset(&mut w.host, w.caller, &request).unwrap();

    assert_eq!(dex.calls(), 0);
    assert_eq!(batch.total(), d(100));
    assert_eq!(w.balance(w.caller, nct), d(50));
    assert_eq!(w.custody(nct), d(100));
    assert_eq!(w.custody(w.bct), Decimal::ZERO);

    let outcome = &w.host.outcomes()[0];
    assert_eq!(outcome.input_asset, nct);
    assert_eq!(outcome.pool_asset, w.bct);
    assert_eq!(outcome.amount_spent, d(100));
}

#[test]
fn eligible_foreign_input_without_custody_rolls_back() {
    let (mut w, nct, request) = foreign_pool_world();
    let before = w.host.ledger().clone();

    let err = w
        .helper
        .settle_offset(&mut w.host, w.caller, &request)
        .unwrap_err();

    assert!(
        matches!(err, OffsetError::InsufficientBalance { asset, .. } if asset == w.bct),
        "unexpected error: {err:?}"
    );
    assert_eq!(w.host.ledger(), &before);
    assert_eq!(w.balance(w.caller, nct), d(150));
    assert_eq!(w.certifier.calls(), 0);
    assert!(w.host.outcomes().is_empty());
}

#[test]
fn swap_settlement_refunds_difference() {
    let mut w = World::new();
    let dex = w.with_dex(80, 150);

    let request = w.swap_request(100, 200);
    let batch = w.helper.settle_offset(&mut w.host, w.caller, &request).unwrap();

    assert_eq!(dex.calls(), 1);
    assert_eq!(dex.instructions(), vec![request.swap_instruction.clone()]);
    assert_eq!(batch.total(), d(100));
    assert_eq!(w.balance(w.caller, w.usdc), d(CALLER_USDC - 80));
    assert_eq!(w.custody(w.usdc), Decimal::ZERO);
    // Surplus from the swap stays in custody until swept.
    assert_eq!(w.custody(w.bct), d(50));

    let outcome = &w.host.outcomes()[0];
    assert_eq!(outcome.initiator, w.caller);
    assert_eq!(outcome.amount_spent, d(80));
    assert_eq!(outcome.amount_offset, d(100));
}

#[test]
fn undershoot_rolls_back_everything() {
    let mut w = World::new();
    w.with_dex(80, 90);
    let before = w.host.ledger().clone();

    let err = w.settle(100, 200).unwrap_err();

    assert_eq!(
        err,
        OffsetError::Undershoot {
            received: d(90),
            required: d(100),
        }
    );
    assert_eq!(w.host.ledger(), &before);
    assert!(w.host.outcomes().is_empty());
    assert_eq!(w.pool.calls(), 0);
    assert_eq!(w.certifier.calls(), 0);
}

#[test]
fn overspend_rolls_back_without_refund() {
    let mut w = World::new();
    // Stranded input already in custody lets the exchange take more than
    // the caller's ceiling.
    let custody = w.helper.address();
    w.host.ledger_mut().mint(w.usdc, custody, d(100)).unwrap();
    w.with_dex(250, 150);
    let before = w.host.ledger().clone();

    let err = w.settle(100, 200).unwrap_err();

    assert_eq!(
        err,
        OffsetError::Overspend {
            spent: d(250),
            max: d(200),
        }
    );
    assert_eq!(w.host.ledger(), &before);
    assert_eq!(w.balance(w.caller, w.usdc), d(CALLER_USDC));
    assert_eq!(w.custody(w.usdc), d(100));
    assert!(w.host.outcomes().is_empty());
}

#[test]
fn caller_without_funds_changes_nothing() {
    let mut w = World::new();
    w.with_dex(80, 150);
    let before = w.host.ledger().clone();

    let err = w.settle(100, CALLER_USDC + 1).unwrap_err();

    assert!(matches!(err, OffsetError::InsufficientBalance { .. }));
    assert_eq!(w.host.ledger(), &before);
}

#[test]
fn batch_spans_units_and_sums_to_target() {
    let mut w = World::new();
    w.with_dex(80, 150);

    let batch = w.settle(100, 200).unwrap();

    assert_eq!(
        batch,
        RetirementBatch::from_pairs([
            (w.unit_a, d(UNIT_A_INVENTORY)),
            (w.unit_b, d(100 - UNIT_A_INVENTORY)),
        ])
    );
    let retired = w.certifier.retired();
    assert_eq!(retired.len(), 2);
    assert_eq!(retired[0].unit, w.unit_a);
    assert_eq!(retired[1].unit, w.unit_b);
    assert!(retired.iter().all(|call| call.certificate == w.certificate()));
    assert!(retired.iter().all(|call| call.caller == w.helper.address()));
    assert_eq!(w.host.ledger().total_supply(w.unit_a), Decimal::ZERO);
}

#[test]
fn refund_reconciles_exactly() {
    let mut rng = StdRng::seed_from_u64(0x0ff5e7);
    for _ in 0..64 {
        let target: i64 = rng.gen_range(1..=500);
        let max_input: i64 = rng.gen_range(1..=CALLER_USDC);
        let spent: i64 = rng.gen_range(1..=max_input);
        let received: i64 = rng.gen_range(target..=target * 2);

        let mut w = World::new();
        w.with_dex(spent, received);
        let request = w.swap_request(target, max_input);
        let batch = w.helper.settle_offset(&mut w.host, w.caller, &request).unwrap();

        let outcome = w.host.outcomes().last().unwrap();
        assert!(outcome.amount_spent <= d(max_input));
        assert_eq!(batch.total(), d(target));
        // balance_after - (balance_before - max) == max - spent
        let after = w.balance(w.caller, w.usdc);
        assert_eq!(after - d(CALLER_USDC - max_input), d(max_input) - outcome.amount_spent);
        assert_eq!(w.custody(w.usdc), Decimal::ZERO);
    }
}

#[test]
fn fractional_amounts_refund_without_rounding() {
    let mut w = World::new();
    let dex = offset_host::mock::ScriptedExchange::new(
        w.exchange,
        w.usdc,
        Decimal::new(8_012_345, 5),
        w.bct,
        Decimal::new(10_075, 2),
    );
    w.install_dex(dex);

    let request = OffsetRequest::new(
        w.bct,
        w.usdc,
        Decimal::new(1_005, 1),
        Decimal::new(2_000_001, 4),
        w.swap_request(1, 1).swap_instruction,
        w.certificate(),
    );
    w.helper.settle_offset(&mut w.host, w.caller, &request).unwrap();

    let spent = Decimal::new(8_012_345, 5);
    assert_eq!(w.balance(w.caller, w.usdc), d(CALLER_USDC) - spent);
    assert_eq!(w.host.outcomes()[0].amount_spent, spent);
}

#[test]
fn outcomes_accumulate_only_on_success() {
    let mut w = World::new();
    w.with_dex(80, 150);

    w.settle(100, 200).unwrap();
    let _ = w.settle(0, 200).unwrap_err();
    let _ = w.settle(200, 200).unwrap_err();
    w.settle(50, 100).unwrap();

    let outcomes = w.host.outcomes();
    assert_eq!(outcomes.len(), 2);
    assert_eq!(outcomes[0].amount_offset, d(100));
    assert_eq!(outcomes[1].amount_offset, d(50));
    assert_ne!(outcomes[0].id, outcomes[1].id);
}

#[test]
fn settlement_records_survive_serialization() {
    let mut w = World::new();
    w.with_dex(80, 150);
    let batch = w.settle(100, 200).unwrap();
    let outcome = w.host.outcomes()[0].clone();

    let json = serde_json::to_string(&batch).unwrap();
    let decoded: RetirementBatch = serde_json::from_str(&json).unwrap();
    assert_eq!(decoded, batch);

    let json = serde_json::to_string(&outcome).unwrap();
    let decoded: OffsetOutcome = serde_json::from_str(&json).unwrap();
    assert_eq!(decoded, outcome);
    assert_eq!(decoded.amount_spent, d(80));
}

#[test]
fn exchange_authorization_persists_across_settlements() {
    let mut w = World::new();
    w.with_dex(80, 150);
    let custody = w.helper.address();

    w.settle(100, 200).unwrap();
    assert_eq!(w.host.ledger().allowance(custody, w.exchange, w.usdc), MAX_AMOUNT);

    w.settle(100, 200).unwrap();
    assert_eq!(w.host.ledger().allowance(custody, w.exchange, w.usdc), MAX_AMOUNT);
}

// ═══════════════════════════════════════════════════════════════════
// Standalone operations
// ═══════════════════════════════════════════════════════════════════

#[test]
fn standalone_redeem_delivers_units_to_caller() {
    let mut w = World::new();
    w.host.ledger_mut().mint(w.bct, w.caller, d(75)).unwrap();

    let batch = w.helper.redeem(&mut w.host, w.caller, w.bct, d(75)).unwrap();

    assert_eq!(batch.total(), d(75));
    assert_eq!(w.balance(w.caller, w.bct), Decimal::ZERO);
    assert_eq!(w.balance(w.caller, w.unit_a), d(UNIT_A_INVENTORY));
    assert_eq!(w.balance(w.caller, w.unit_b), d(75 - UNIT_A_INVENTORY));
    assert_eq!(w.custody(w.unit_a), Decimal::ZERO);
    assert!(w.host.outcomes().is_empty());
}

#[test]
fn standalone_redeem_rejects_zero_amount() {
    let mut w = World::new();
    w.host.ledger_mut().mint(w.bct, w.caller, d(75)).unwrap();
    let before = w.host.ledger().clone();

    let err = w
        .helper
        .redeem(&mut w.host, w.caller, w.bct, Decimal::ZERO)
        .unwrap_err();

    assert_eq!(err, OffsetError::ZeroOffsetAmount);
    assert_eq!(w.pool.calls(), 0);
    assert_eq!(w.host.ledger(), &before);
}

#[test]
fn standalone_retire_consumes_caller_units() {
    let mut w = World::new();
    w.host.ledger_mut().mint(w.unit_a, w.caller, d(10)).unwrap();
    w.host.ledger_mut().mint(w.unit_b, w.caller, d(5)).unwrap();

    let batch = RetirementBatch::from_pairs([(w.unit_a, d(10)), (w.unit_b, d(5))]);
    let certificate = w.certificate();
    w.helper
        .retire_batch(&mut w.host, w.caller, &batch, &certificate)
        .unwrap();

    assert_eq!(w.certifier.calls(), 2);
    assert_eq!(w.balance(w.caller, w.unit_a), Decimal::ZERO);
    assert_eq!(w.host.ledger().total_supply(w.unit_b), d(10_000));
}

// ═══════════════════════════════════════════════════════════════════
// Administration
// ═══════════════════════════════════════════════════════════════════

#[test]
fn owner_recovers_surplus_and_native_deposits() {
    let mut w = World::new();
    w.with_dex(80, 150);
    w.settle(100, 200).unwrap();

    let donor = w.caller;
    w.host
        .ledger_mut()
        .mint(AssetHandle::NATIVE, donor, d(3))
        .unwrap();
    w.helper.receive_native(&mut w.host, donor, d(3)).unwrap();

    let treasury = offset_types::Address::derive("treasury");
    let intruder = offset_types::Address::derive("intruder");
    let assets = [w.bct, AssetHandle::NATIVE, w.usdc];

    let err = w
        .helper
        .sweep(&mut w.host, intruder, &assets, intruder)
        .unwrap_err();
    assert_eq!(err, OffsetError::NotOwner { caller: intruder });
    assert_eq!(w.custody(w.bct), d(50));

    let swept = w.helper.sweep(&mut w.host, w.owner, &assets, treasury).unwrap();
    assert_eq!(swept, vec![(w.bct, d(50)), (AssetHandle::NATIVE, d(3))]);
    assert_eq!(w.balance(treasury, w.bct), d(50));
    assert_eq!(w.balance(treasury, AssetHandle::NATIVE), d(3));
    assert!(w.host.ledger().holdings(w.helper.address()).is_empty());
}

#[test]
fn empty_sweep_is_rejected() {
    let mut w = World::new();
    let err = w.helper.sweep(&mut w.host, w.owner, &[], w.owner).unwrap_err();
    assert_eq!(err, OffsetError::EmptyInput { what: "sweep assets" });
}

#[test]
fn cleared_pool_is_no_longer_redeemable() {
    let mut w = World::new();
    w.with_dex(80, 150);
    w.helper.clear_eligible(w.owner, w.bct).unwrap();
    w.helper.clear_eligible(w.owner, w.bct).unwrap();
    let before = w.host.ledger().clone();

    let err = w.settle(100, 200).unwrap_err();
    assert_eq!(err, OffsetError::NonRedeemable(w.bct));
    assert_eq!(w.pool.calls(), 0);
    assert_eq!(w.host.ledger(), &before);

    w.helper.set_eligible(w.owner, w.bct).unwrap();
    assert_eq!(w.helper.eligible_assets(), vec![w.bct]);
    w.settle(100, 200).unwrap();
}
