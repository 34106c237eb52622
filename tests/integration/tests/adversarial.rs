//! Integration test: hostile recipients and malformed payments.
//!
//! Every rejected call must leave balances, configuration, and the event log
//! exactly as they were.

use std::sync::Arc;

use scratch_core::{Address, BasisPoints, ModuleError, TransferError, ETHER};
use scratch_integration_tests::{account, Fixture, ReentrantReceiver, RejectingReceiver};
use scratch_settlement::Ledger;

fn snapshot(fx: &Fixture) -> Vec<u128> {
    ["alice", "bob", "carol", "dave", "mallory"]
        .iter()
        .map(|name| fx.ledger.balance_of(&account(name)))
        .chain([fx.ledger.balance_of(&fx.admin), fx.module.contract_balance()])
        .collect()
}

#[test]
fn test_rejecting_recipient_reverts_everything() {
    let fx = Fixture::deploy(500);
    fx.ledger
        .register_receiver(account("mallory"), Arc::new(RejectingReceiver));
    let before = snapshot(&fx);

    let result = fx
        .module
        .send_payment(account("alice"), account("mallory"), "", ETHER);

    assert!(matches!(
        result,
        Err(ModuleError::TransferFailed(TransferError::Rejected { .. }))
    ));
    assert_eq!(snapshot(&fx), before);
    assert!(fx.module.events().is_empty());
    assert_eq!(fx.ledger.entry_count(), 0);
}

#[test]
fn test_rejecting_administrator_blocks_fee_payments_only() {
    let fx = Fixture::deploy(500);
    fx.ledger
        .register_receiver(fx.admin, Arc::new(RejectingReceiver));
    let before = snapshot(&fx);

    assert!(fx
        .module
        .send_payment(account("alice"), account("carol"), "", ETHER)
        .is_err());
    assert_eq!(snapshot(&fx), before);

    // With no fee there is no transfer to the administrator.
    fx.module.set_fee_rate(fx.admin, BasisPoints(0)).unwrap();
    fx.module
        .send_payment(account("alice"), account("carol"), "", ETHER)
        .unwrap();
    assert_eq!(fx.ledger.balance_of(&account("carol")), ETHER);
}

#[test]
fn test_reentrant_recipient_cannot_reenter() {
    let fx = Fixture::deploy(500);
    let hook = Arc::new(ReentrantReceiver::default());
    let _ = hook.module.set(fx.module.clone());
    fx.ledger.register_receiver(account("mallory"), hook.clone());

    fx.module
        .send_payment(account("alice"), account("mallory"), "", ETHER)
        .unwrap();

    let errors = hook.nested_errors.lock().clone();
    assert_eq!(errors, vec![ModuleError::Reentrancy; 3]);
    assert_eq!(fx.module.current_fee_rate(), BasisPoints(500));
    assert_eq!(fx.module.current_administrator(), fx.admin);
    assert_eq!(fx.module.events().len(), 1);
    assert_eq!(fx.ledger.balance_of(&account("mallory")), 95 * ETHER / 100);
}

#[test]
fn test_reentrant_then_rejecting_recipient_leaves_no_trace() {
    let fx = Fixture::deploy(500);
    let hook = Arc::new(ReentrantReceiver {
        reject_after: true,
        ..Default::default()
    });
    let _ = hook.module.set(fx.module.clone());
    fx.ledger.register_receiver(account("mallory"), hook.clone());
    let before = snapshot(&fx);

    let result = fx
        .module
        .send_payment(account("alice"), account("mallory"), "", ETHER);

    assert!(matches!(result, Err(ModuleError::TransferFailed(_))));
    assert_eq!(hook.nested_errors.lock().len(), 3);
    assert_eq!(snapshot(&fx), before);
    assert!(fx.module.events().is_empty());

    // The guard is released after the failed call.
    fx.module.set_fee_rate(fx.admin, BasisPoints(10)).unwrap();
}

#[test]
fn test_bare_deposit_is_rejected() {
    let fx = Fixture::deploy(0);
    let result = fx
        .ledger
        .transfer(account("alice"), fx.module.address(), ETHER);
    assert_eq!(result, Err(TransferError::DirectDepositRejected));
    assert_eq!(fx.module.contract_balance(), 0);
    assert_eq!(fx.ledger.balance_of(&account("alice")), 10 * ETHER);
}

#[test]
fn test_invalid_payments() {
    let fx = Fixture::deploy(500);
    let before = snapshot(&fx);

    assert_eq!(
        fx.module
            .send_payment(account("alice"), account("alice"), "", ETHER)
            .unwrap_err(),
        ModuleError::SelfPayment
    );
    assert_eq!(
        fx.module
            .send_payment(account("alice"), Address::ZERO, "", ETHER)
            .unwrap_err(),
        ModuleError::InvalidRecipient
    );
    assert_eq!(
        fx.module
            .send_payment(account("alice"), account("carol"), "", 0)
            .unwrap_err(),
        ModuleError::ZeroPayment
    );
    assert!(matches!(
        fx.module
            .send_payment(account("carol"), account("alice"), "", ETHER)
            .unwrap_err(),
        ModuleError::TransferFailed(TransferError::InsufficientFunds { .. })
    ));

    assert_eq!(snapshot(&fx), before);
    assert!(fx.module.events().is_empty());
}

#[test]
fn test_payment_into_module_account_fails() {
    let fx = Fixture::deploy(0);
    let module_address = fx.module.address();
    let result = fx
        .module
        .send_payment(account("alice"), module_address, "", ETHER);
    assert_eq!(
        result.unwrap_err(),
        ModuleError::TransferFailed(TransferError::DirectDepositRejected)
    );
    assert_eq!(fx.module.contract_balance(), 0);
}
