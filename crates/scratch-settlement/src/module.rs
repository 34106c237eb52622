//! The settlement module.
//!
//! One instance owns the administrator identity and the fee rate, and settles
//! payments against a [`Ledger`]. Every state-changing entry point runs under
//! one re-entrant lock (a total order per instance) and a reentrancy guard,
//! so a receiver hook that calls back in is refused instead of observing a
//! half-applied settlement.

use parking_lot::ReentrantMutex;
use scratch_core::{
    AccessControl, Address, AdministratorTransferred, BasisPoints, ChainId, FeePolicy, FeeQuote,
    FeeRateUpdated, ModuleConfig, ModuleError, ModuleEvent, PaymentSent, TransferError, Wei,
};
use std::cell::RefCell;
use std::sync::Arc;

use crate::events::EventLog;
use crate::guard::{Entered, ReentrancyGuard};
use crate::traits::{Ledger, Receiver};
use crate::types::{SettlementId, SettlementReceipt, Transfer, TransferBatch};

/// Mutable configuration owned by the module.
#[derive(Debug)]
struct ModuleState {
    access: AccessControl,
    fees: FeePolicy,
}

/// Refuses every bare transfer into the module account.
struct DirectDepositGuard;

impl Receiver for DirectDepositGuard {
    fn on_receive(&self, _from: &Address, _amount: Wei) -> Result<(), TransferError> {
        Err(TransferError::DirectDepositRejected)
    }
}

/// Account-holding settlement module.
pub struct SettlementModule {
    address: Address,
    ledger: Arc<dyn Ledger>,
    state: ReentrantMutex<RefCell<ModuleState>>,
    guard: ReentrancyGuard,
    events: EventLog,
}

impl SettlementModule {
    /// Deploy a module onto `ledger`.
    ///
    /// Installs a hook on the module's account that rejects direct deposits.
    pub fn deploy(config: ModuleConfig, ledger: Arc<dyn Ledger>) -> Result<Self, ModuleError> {
        config.validate()?;
        let address = config.module_address();
        let access =
            AccessControl::new(config.administrator)?.hardened(config.harden_admin_transfer);
        let fees = FeePolicy::new(config.fee_rate)?;

        ledger.install_receiver(address, Arc::new(DirectDepositGuard));

        tracing::info!(
            module = %address,
            administrator = %config.administrator,
            fee_rate = config.fee_rate.value(),
            chain_id = %ledger.chain_id(),
            "settlement module deployed"
        );

        Ok(Self {
            address,
            ledger,
            state: ReentrantMutex::new(RefCell::new(ModuleState { access, fees })),
            guard: ReentrancyGuard::new(),
            events: EventLog::default(),
        })
    }

    /// Settle a payment of `value` from `caller` to `recipient`.
    ///
    /// Checks run in order: zero value, zero recipient, self payment. The
    /// attached value, the recipient's share, and the fee move in one ledger
    /// batch; if any leg fails nothing moves and no event is emitted.
    pub fn send_payment(
        &self,
        caller: Address,
        recipient: Address,
        message: impl Into<String>,
        value: Wei,
    ) -> Result<SettlementReceipt, ModuleError> {
        let state = self.state.lock();
        let _entered = self.enter("send_payment", &caller)?;

        let result = self.settle(&state, caller, recipient, message.into(), value);
        match &result {
            Ok(receipt) => tracing::info!(
                settlement_id = %receipt.settlement_id,
                sender = %caller,
                recipient = %recipient,
                gross = value,
                fee = receipt.fee,
                "payment settled"
            ),
            Err(e) => tracing::warn!(
                sender = %caller,
                recipient = %recipient,
                gross = value,
                code = e.code(),
                error = %e,
                "payment rejected"
            ),
        }
        result
    }

    fn settle(
        &self,
        state: &RefCell<ModuleState>,
        caller: Address,
        recipient: Address,
        message: String,
        value: Wei,
    ) -> Result<SettlementReceipt, ModuleError> {
        if value == 0 {
            return Err(ModuleError::ZeroPayment);
        }
        if recipient.is_zero() {
            return Err(ModuleError::InvalidRecipient);
        }
        if recipient == caller {
            return Err(ModuleError::SelfPayment);
        }

        // Copy out everything the transfers depend on; no borrow survives
        // into the ledger call, where receiver hooks may read module state.
        let (quote, administrator) = {
            let state = state.borrow();
            (state.fees.quote(value)?, state.access.administrator())
        };

        let mut batch = TransferBatch::new();
        batch
            .push(Transfer::attached(caller, self.address, value))
            .push(Transfer::plain(self.address, recipient, quote.net));
        if quote.fee > 0 {
            batch.push(Transfer::plain(self.address, administrator, quote.fee));
        }
        self.ledger.execute(&batch)?;

        let event = PaymentSent {
            sender: caller,
            recipient,
            amount: value,
            message,
            timestamp: self.ledger.timestamp(),
        };
        let sequence = self.events.emit(ModuleEvent::PaymentSent(event.clone()));

        Ok(SettlementReceipt {
            settlement_id: SettlementId::new(),
            sequence,
            event,
            fee: quote.fee,
            net_amount: quote.net,
            fee_rate: quote.fee_rate,
            fee_recipient: administrator,
        })
    }

    /// Replace the fee rate. Administrator only; bounded by the policy max.
    pub fn set_fee_rate(&self, caller: Address, rate: BasisPoints) -> Result<(), ModuleError> {
        let state = self.state.lock();
        let _entered = self.enter("set_fee_rate", &caller)?;

        let updated = {
            let mut state = state.borrow_mut();
            state
                .access
                .ensure_administrator(&caller)
                .and_then(|()| state.fees.set_rate(rate))
        };
        let previous = updated.map_err(|e| {
            tracing::warn!(
                %caller,
                requested = rate.value(),
                code = e.code(),
                "fee update rejected"
            );
            e
        })?;

        self.events.emit(ModuleEvent::FeeRateUpdated(FeeRateUpdated {
            previous,
            current: rate,
            timestamp: self.ledger.timestamp(),
        }));
        tracing::info!(previous = previous.value(), current = rate.value(), "fee rate updated");
        Ok(())
    }

    /// Hand administration to `new_admin`. Administrator only, immediate.
    pub fn transfer_administrator(
        &self,
        caller: Address,
        new_admin: Address,
    ) -> Result<(), ModuleError> {
        let state = self.state.lock();
        let _entered = self.enter("transfer_administrator", &caller)?;

        let previous = state
            .borrow_mut()
            .access
            .transfer(&caller, new_admin)
            .map_err(|e| {
                tracing::warn!(
                    %caller,
                    %new_admin,
                    code = e.code(),
                    "administrator transfer rejected"
                );
                e
            })?;

        self.events
            .emit(ModuleEvent::AdministratorTransferred(AdministratorTransferred {
                previous,
                current: new_admin,
                timestamp: self.ledger.timestamp(),
            }));
        tracing::info!(%previous, current = %new_admin, "administrator transferred");
        Ok(())
    }

    fn enter(&self, operation: &'static str, caller: &Address) -> Result<Entered<'_>, ModuleError> {
        self.guard.enter().map_err(|e| {
            tracing::warn!(operation, %caller, code = e.code(), "reentrant call rejected");
            e
        })
    }

    pub fn current_fee_rate(&self) -> BasisPoints {
        let state = self.state.lock();
        let rate = state.borrow().fees.rate();
        rate
    }

    pub fn current_administrator(&self) -> Address {
        let state = self.state.lock();
        let administrator = state.borrow().access.administrator();
        administrator
    }

    /// Balance held by the module account, read from the ledger.
    pub fn contract_balance(&self) -> Wei {
        self.ledger.balance_of(&self.address)
    }

    pub fn network_identifier(&self) -> ChainId {
        self.ledger.chain_id()
    }

    /// Preview the split of `value` at the current rate.
    pub fn quote(&self, value: Wei) -> Result<FeeQuote, ModuleError> {
        let state = self.state.lock();
        let quote = state.borrow().fees.quote(value);
        quote
    }

    /// Account address of this module instance.
    pub fn address(&self) -> Address {
        self.address
    }

    pub fn events(&self) -> &EventLog {
        &self.events
    }

    pub fn ledger(&self) -> &Arc<dyn Ledger> {
        &self.ledger
    }
}
