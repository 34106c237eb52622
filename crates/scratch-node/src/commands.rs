//! Commands dispatched from the HTTP API to the node event loop.

use scratch_core::{Address, BasisPoints, ModuleError, Wei};
use scratch_settlement::SettlementReceipt;
use tokio::sync::oneshot;

/// A state-changing call sent from the HTTP API to the node's event loop.
#[derive(Debug)]
pub enum NodeCommand {
    /// Settle a payment through the module.
    SendPayment {
        caller: Address,
        recipient: Address,
        message: String,
        amount: Wei,
        reply: oneshot::Sender<Result<SettlementReceipt, ModuleError>>,
    },
    /// Change the platform fee rate.
    SetFeeRate {
        caller: Address,
        rate: BasisPoints,
        reply: oneshot::Sender<Result<(), ModuleError>>,
    },
    /// Hand over administration.
    TransferAdministrator {
        caller: Address,
        new_admin: Address,
        reply: oneshot::Sender<Result<(), ModuleError>>,
    },
}

impl NodeCommand {
    pub fn name(&self) -> &'static str {
        match self {
            NodeCommand::SendPayment { .. } => "send_payment",
            NodeCommand::SetFeeRate { .. } => "set_fee_rate",
            NodeCommand::TransferAdministrator { .. } => "transfer_administrator",
        }
    }
}
