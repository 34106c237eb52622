use chrono::{DateTime, Utc};
use scratch_core::{Address, ChainId, TransferError, Wei};
use std::sync::Arc;

use crate::types::TransferBatch;

/// Execution environment a settlement module runs against.
///
/// The ledger is the source of truth for balances; the module never keeps
/// its own accounting of what it holds.
pub trait Ledger: Send + Sync {
    /// Current balance of `account`.
    fn balance_of(&self, account: &Address) -> Wei;

    /// Identifier of the network this ledger belongs to.
    fn chain_id(&self) -> ChainId;

    /// The environment's clock at the time of the call.
    fn timestamp(&self) -> DateTime<Utc>;

    /// Apply every leg of `batch`, or none of them.
    ///
    /// Receiver hooks of the target accounts may reject their legs; any
    /// rejection, shortfall, or overflow fails the whole batch and leaves all
    /// balances untouched.
    fn execute(&self, batch: &TransferBatch) -> Result<(), TransferError>;

    /// Attach a receiver hook to `account`, as deploying code there would.
    fn install_receiver(&self, account: Address, receiver: Arc<dyn Receiver>);
}

/// Hook for contract-like accounts that decide whether to accept funds.
///
/// Invoked once for every plain transfer into the account it is registered
/// for. Implementations may run arbitrary code, including calls back into a
/// settlement module. Returning an error rejects the funds and fails the
/// batch the transfer belongs to.
pub trait Receiver: Send + Sync {
    fn on_receive(&self, from: &Address, amount: Wei) -> Result<(), TransferError>;
}
