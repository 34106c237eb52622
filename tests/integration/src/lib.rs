//! Fixtures shared by the cross-crate scenarios.

use chrono::{TimeZone, Utc};
use parking_lot::Mutex;
use scratch_core::{Address, BasisPoints, ChainId, ModuleConfig, TransferError, Wei, ETHER};
use scratch_settlement::{MemoryLedger, Receiver, SettlementModule};
use std::sync::{Arc, OnceLock};

/// A deployed module on a fresh ledger with funded payers.
pub struct Fixture {
    pub ledger: Arc<MemoryLedger>,
    pub module: Arc<SettlementModule>,
    pub admin: Address,
}

impl Fixture {
    /// Deploy with `admin` as administrator and fund `alice`, `bob`, `dave`
    /// with 10 ether each.
    pub fn deploy(fee_rate_bps: u16) -> Self {
        let admin = account("admin");
        let ledger = Arc::new(MemoryLedger::with_accounts(
            ChainId::DEVNET,
            ["alice", "bob", "dave"].map(|name| (account(name), 10 * ETHER)),
        ));
        ledger.set_time(Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap());
        let config = ModuleConfig::new(admin).with_fee_rate(BasisPoints(fee_rate_bps));
        let module = SettlementModule::deploy(config, ledger.clone())
            .expect("fixture config is valid");
        Self {
            ledger,
            module: Arc::new(module),
            admin,
        }
    }
}

/// Deterministic account for a test persona.
pub fn account(name: &str) -> Address {
    Address::dev(name)
}

/// Recipient contract that refuses all incoming funds.
pub struct RejectingReceiver;

impl Receiver for RejectingReceiver {
    fn on_receive(&self, _from: &Address, _amount: Wei) -> Result<(), TransferError> {
        Err(TransferError::Rejected {
            account: account("mallory"),
            reason: "no thanks".into(),
        })
    }
}

/// Recipient contract that calls back into the module while being paid.
#[derive(Default)]
pub struct ReentrantReceiver {
    pub module: OnceLock<Arc<SettlementModule>>,
    /// Errors returned to the nested calls.
    pub nested_errors: Mutex<Vec<scratch_core::ModuleError>>,
    /// If set, the hook fails the transfer after its nested attempts.
    pub reject_after: bool,
}

impl Receiver for ReentrantReceiver {
    fn on_receive(&self, _from: &Address, amount: Wei) -> Result<(), TransferError> {
        let Some(module) = self.module.get() else {
            return Ok(());
        };
        let attacker = account("mallory");
        let attempts = [
            module.send_payment(attacker, account("alice"), "again", amount).err(),
            module.set_fee_rate(attacker, BasisPoints(0)).err(),
            module.transfer_administrator(attacker, attacker).err(),
        ];
        self.nested_errors.lock().extend(attempts.into_iter().flatten());
        if self.reject_after {
            return Err(TransferError::Rejected {
                account: attacker,
                reason: "reentry failed".into(),
            });
        }
        Ok(())
    }
}
