use scratch_core::{Address, BasisPoints, PaymentSent, Wei};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a settlement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SettlementId(pub Uuid);

impl SettlementId {
    /// Create a new settlement ID (UUID v7, time-ordered).
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for SettlementId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SettlementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How value reaches the target of a transfer leg.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransferKind {
    /// Value attached to a call into the target; the target's receiver hook
    /// is not consulted because the call itself accepts the funds.
    Attached,
    /// A bare value transfer; the target's receiver hook decides.
    Plain,
}

/// One leg of a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transfer {
    pub from: Address,
    pub to: Address,
    pub amount: Wei,
    pub kind: TransferKind,
}

impl Transfer {
    pub fn plain(from: Address, to: Address, amount: Wei) -> Self {
        Self {
            from,
            to,
            amount,
            kind: TransferKind::Plain,
        }
    }

    pub fn attached(from: Address, to: Address, amount: Wei) -> Self {
        Self {
            from,
            to,
            amount,
            kind: TransferKind::Attached,
        }
    }
}

/// Ordered legs applied all-or-nothing by a [`crate::Ledger`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferBatch {
    legs: Vec<Transfer>,
}

impl TransferBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, transfer: Transfer) -> &mut Self {
        self.legs.push(transfer);
        self
    }

    pub fn legs(&self) -> &[Transfer] {
        &self.legs
    }

    pub fn len(&self) -> usize {
        self.legs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.legs.is_empty()
    }
}

/// Proof that a payment settled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementReceipt {
    /// Settlement identifier.
    pub settlement_id: SettlementId,
    /// Position of the emitted event in the module's event log.
    pub sequence: u64,
    /// The emitted event.
    pub event: PaymentSent,
    /// Fee routed to the administrator.
    pub fee: Wei,
    /// Amount forwarded to the recipient.
    pub net_amount: Wei,
    /// Rate the fee was computed at.
    pub fee_rate: BasisPoints,
    /// Administrator that received the fee.
    pub fee_recipient: Address,
}
