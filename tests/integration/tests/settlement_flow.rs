//! Integration test: payments, fee configuration, and introspection across
//! scratch-core and scratch-settlement.

use scratch_core::{BasisPoints, ChainId, ModuleError, ModuleEvent, ETHER};
use scratch_integration_tests::{account, Fixture};
use scratch_settlement::Ledger;

// =========================================================================
// Fee split
// =========================================================================

#[test]
fn test_five_percent_fee_on_one_ether() {
    let fx = Fixture::deploy(500);
    let alice_before = fx.ledger.balance_of(&account("alice"));

    let receipt = fx
        .module
        .send_payment(account("alice"), account("carol"), "great stream", ETHER)
        .expect("payment should settle");

    assert_eq!(fx.ledger.balance_of(&account("carol")), 95 * ETHER / 100);
    assert_eq!(fx.ledger.balance_of(&fx.admin), 5 * ETHER / 100);
    assert_eq!(fx.ledger.balance_of(&account("alice")), alice_before - ETHER);
    assert_eq!(fx.module.contract_balance(), 0);

    // Event carries the gross amount.
    let event = &receipt.event;
    assert_eq!(event.sender, account("alice"));
    assert_eq!(event.recipient, account("carol"));
    assert_eq!(event.amount, ETHER);
    assert_eq!(event.message, "great stream");
    assert_eq!(event.timestamp, fx.ledger.timestamp());
}

#[test]
fn test_zero_fee_forwards_everything() {
    let fx = Fixture::deploy(0);
    let amount = ETHER / 100;

    let receipt = fx
        .module
        .send_payment(account("alice"), account("carol"), "", amount)
        .unwrap();

    assert_eq!(receipt.fee, 0);
    assert_eq!(receipt.net_amount, amount);
    assert_eq!(fx.ledger.balance_of(&account("carol")), amount);
    assert_eq!(fx.ledger.balance_of(&fx.admin), 0);
    // No fee transfer is attempted.
    assert_eq!(fx.ledger.entry_count(), 2);
}

#[test]
fn test_value_is_conserved_across_many_payments() {
    let fx = Fixture::deploy(333);
    let total_before = fx.ledger.total_balance();
    for (i, amount) in [1, 7, 99, 10_001, ETHER / 3, 2 * ETHER].into_iter().enumerate() {
        let payer = if i % 2 == 0 { "alice" } else { "bob" };
        let receipt = fx
            .module
            .send_payment(account(payer), account("carol"), "", amount)
            .unwrap();
        assert_eq!(receipt.fee + receipt.net_amount, amount);
        assert!(receipt.fee <= amount / 10);
    }
    assert_eq!(fx.ledger.total_balance(), total_before);
    assert_eq!(fx.module.contract_balance(), 0);
}

#[test]
fn test_rate_change_applies_to_next_payment() {
    let fx = Fixture::deploy(0);
    fx.module.set_fee_rate(fx.admin, BasisPoints(1000)).unwrap();

    let receipt = fx
        .module
        .send_payment(account("alice"), account("carol"), "", ETHER)
        .unwrap();
    assert_eq!(receipt.fee, ETHER / 10);
    assert_eq!(receipt.fee_rate, BasisPoints(1000));
}

// =========================================================================
// Access control
// =========================================================================

#[test]
fn test_unauthorized_fee_change() {
    let fx = Fixture::deploy(0);
    let result = fx.module.set_fee_rate(account("bob"), BasisPoints(200));
    assert_eq!(
        result,
        Err(ModuleError::Unauthorized {
            caller: account("bob")
        })
    );
    assert_eq!(fx.module.current_fee_rate(), BasisPoints::ZERO);
}

#[test]
fn test_fee_bound_is_inclusive() {
    let fx = Fixture::deploy(0);
    assert!(matches!(
        fx.module.set_fee_rate(fx.admin, BasisPoints(1001)),
        Err(ModuleError::FeeTooHigh { .. })
    ));
    assert_eq!(fx.module.current_fee_rate(), BasisPoints::ZERO);
    fx.module.set_fee_rate(fx.admin, BasisPoints(1000)).unwrap();
    assert_eq!(fx.module.current_fee_rate(), BasisPoints(1000));
}

#[test]
fn test_administrator_handover() {
    let fx = Fixture::deploy(500);
    let new_admin = account("dave");
    fx.module.transfer_administrator(fx.admin, new_admin).unwrap();
    assert_eq!(fx.module.current_administrator(), new_admin);

    assert!(matches!(
        fx.module.set_fee_rate(fx.admin, BasisPoints(0)),
        Err(ModuleError::Unauthorized { .. })
    ));
    fx.module.set_fee_rate(new_admin, BasisPoints(100)).unwrap();

    let dave_before = fx.ledger.balance_of(&new_admin);
    fx.module
        .send_payment(account("alice"), account("carol"), "", ETHER)
        .unwrap();
    assert_eq!(fx.ledger.balance_of(&new_admin), dave_before + ETHER / 100);
    assert_eq!(fx.ledger.balance_of(&fx.admin), 0);
}

#[test]
fn test_transfer_to_zero_address_locks_administration() {
    let fx = Fixture::deploy(500);
    fx.module
        .transfer_administrator(fx.admin, scratch_core::Address::ZERO)
        .unwrap();
    assert!(fx.module.current_administrator().is_zero());
    assert!(fx.module.set_fee_rate(fx.admin, BasisPoints(0)).is_err());
}

// =========================================================================
// Introspection and events
// =========================================================================

#[test]
fn test_reads_are_idempotent() {
    let fx = Fixture::deploy(250);
    for _ in 0..3 {
        assert_eq!(fx.module.current_fee_rate(), BasisPoints(250));
        assert_eq!(fx.module.current_administrator(), fx.admin);
        assert_eq!(fx.module.contract_balance(), 0);
        assert_eq!(fx.module.network_identifier(), ChainId::DEVNET);
    }
    assert!(fx.module.events().is_empty());
}

#[test]
fn test_event_log_orders_all_changes() {
    let fx = Fixture::deploy(0);
    fx.module.set_fee_rate(fx.admin, BasisPoints(50)).unwrap();
    fx.module
        .send_payment(account("alice"), account("carol"), "one", 1_000)
        .unwrap();
    fx.module
        .transfer_administrator(fx.admin, account("dave"))
        .unwrap();

    let names: Vec<_> = fx
        .module
        .events()
        .since(0)
        .iter()
        .map(|r| r.event.name())
        .collect();
    assert_eq!(
        names,
        ["FeeRateUpdated", "PaymentSent", "AdministratorTransferred"]
    );

    let tail = fx.module.events().since(2);
    match &tail[0].event {
        ModuleEvent::AdministratorTransferred(e) => {
            assert_eq!(e.previous, fx.admin);
            assert_eq!(e.current, account("dave"));
        }
        other => panic!("unexpected event {other:?}"),
    }
}
