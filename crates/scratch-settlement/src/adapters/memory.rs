use chrono::{DateTime, Utc};
use dashmap::DashMap;
use parking_lot::{Mutex, RwLock};
use scratch_core::{Address, ChainId, TransferError, Wei};
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use uuid::Uuid;

use crate::traits::{Ledger, Receiver};
use crate::types::{Transfer, TransferBatch, TransferKind};

/// Journal entries kept when no limit is given.
pub const DEFAULT_JOURNAL_LIMIT: usize = 10_000;

/// One applied leg in the ledger journal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerEntry {
    /// Batch the leg was applied in.
    pub batch_id: Uuid,
    /// The leg itself.
    pub transfer: Transfer,
    /// Ledger clock when the batch was applied.
    pub applied_at: DateTime<Utc>,
}

/// In-memory execution environment.
///
/// Holds plain account balances, a bounded journal of recently applied legs, and
/// the receiver hooks of contract-like accounts. Useful for tests and for
/// running a module inside a single node without an external chain.
pub struct MemoryLedger {
    chain_id: ChainId,
    /// Balances keyed by account. One lock so a batch commits as a unit.
    balances: Mutex<HashMap<Address, Wei>>,
    /// Most recent applied legs, in application order.
    journal: Mutex<VecDeque<LedgerEntry>>,
    journal_limit: usize,
    /// Receiver hooks keyed by account.
    receivers: DashMap<Address, Arc<dyn Receiver>>,
    /// Fixed clock override; `None` means the system clock.
    clock: RwLock<Option<DateTime<Utc>>>,
}

impl MemoryLedger {
    /// Create an empty ledger for the given chain.
    pub fn new(chain_id: ChainId) -> Self {
        Self {
            chain_id,
            balances: Mutex::new(HashMap::new()),
            journal: Mutex::new(VecDeque::new()),
            journal_limit: DEFAULT_JOURNAL_LIMIT,
            receivers: DashMap::new(),
            clock: RwLock::new(None),
        }
    }

    /// Create a ledger with genesis balances.
    pub fn with_accounts(
        chain_id: ChainId,
        accounts: impl IntoIterator<Item = (Address, Wei)>,
    ) -> Self {
        let ledger = Self::new(chain_id);
        {
            let mut balances = ledger.balances.lock();
            for (account, balance) in accounts {
                balances.insert(account, balance);
            }
        }
        ledger
    }

    /// Keep at most `limit` journal entries, dropping the oldest first.
    pub fn with_journal_limit(mut self, limit: usize) -> Self {
        self.journal_limit = limit;
        self
    }

    /// Mint `amount` into `account` outside of any batch.
    pub fn credit(&self, account: Address, amount: Wei) -> Result<Wei, TransferError> {
        let mut balances = self.balances.lock();
        let entry = balances.entry(account).or_insert(0);
        *entry = entry
            .checked_add(amount)
            .ok_or(TransferError::BalanceOverflow { account })?;
        Ok(*entry)
    }

    /// Install a receiver hook for `account`, replacing any previous one.
    pub fn register_receiver(&self, account: Address, receiver: Arc<dyn Receiver>) {
        tracing::debug!(%account, "registering receiver hook");
        self.receivers.insert(account, receiver);
    }

    /// Remove the receiver hook for `account`.
    pub fn unregister_receiver(&self, account: &Address) -> bool {
        self.receivers.remove(account).is_some()
    }

    pub fn has_receiver(&self, account: &Address) -> bool {
        self.receivers.contains_key(account)
    }

    /// Pin the ledger clock to `time`.
    pub fn set_time(&self, time: DateTime<Utc>) {
        *self.clock.write() = Some(time);
    }

    /// Return to the system clock.
    pub fn use_system_clock(&self) {
        *self.clock.write() = None;
    }

    /// A bare value transfer, as a wallet would send it.
    pub fn transfer(&self, from: Address, to: Address, amount: Wei) -> Result<(), TransferError> {
        let mut batch = TransferBatch::new();
        batch.push(Transfer::plain(from, to, amount));
        self.execute(&batch)
    }

    /// Sum of all balances.
    pub fn total_balance(&self) -> Wei {
        self.balances
            .lock()
            .values()
            .fold(0u128, |acc, b| acc.saturating_add(*b))
    }

    /// Snapshot of the retained journal.
    pub fn entries(&self) -> Vec<LedgerEntry> {
        self.journal.lock().iter().cloned().collect()
    }

    pub fn entry_count(&self) -> usize {
        self.journal.lock().len()
    }

    /// Run the receiver hooks of every plain leg, before any balance changes.
    fn consult_receivers(&self, batch: &TransferBatch) -> Result<(), TransferError> {
        for leg in batch.legs() {
            if leg.kind != TransferKind::Plain {
                continue;
            }
            // Clone the hook out so no map guard is held while it runs.
            let receiver = self.receivers.get(&leg.to).map(|r| Arc::clone(r.value()));
            if let Some(receiver) = receiver {
                receiver.on_receive(&leg.from, leg.amount).map_err(|e| {
                    tracing::debug!(account = %leg.to, error = %e, "receiver rejected transfer");
                    e
                })?;
            }
        }
        Ok(())
    }
}

impl Ledger for MemoryLedger {
    fn balance_of(&self, account: &Address) -> Wei {
        self.balances.lock().get(account).copied().unwrap_or(0)
    }

    fn chain_id(&self) -> ChainId {
        self.chain_id
    }

    fn timestamp(&self) -> DateTime<Utc> {
        let fixed = *self.clock.read();
        fixed.unwrap_or_else(Utc::now)
    }

    fn execute(&self, batch: &TransferBatch) -> Result<(), TransferError> {
        self.consult_receivers(batch)?;

        let mut balances = self.balances.lock();

        // Stage every leg against a scratch copy; commit only if all pass.
        let mut staged: HashMap<Address, Wei> = HashMap::new();
        for leg in batch.legs() {
            let available = staged
                .get(&leg.from)
                .or_else(|| balances.get(&leg.from))
                .copied()
                .unwrap_or(0);
            let debited =
                available
                    .checked_sub(leg.amount)
                    .ok_or(TransferError::InsufficientFunds {
                        account: leg.from,
                        available,
                        required: leg.amount,
                    })?;
            staged.insert(leg.from, debited);

            let current = staged
                .get(&leg.to)
                .or_else(|| balances.get(&leg.to))
                .copied()
                .unwrap_or(0);
            let credited = current
                .checked_add(leg.amount)
                .ok_or(TransferError::BalanceOverflow { account: leg.to })?;
            staged.insert(leg.to, credited);
        }

        for (account, balance) in staged {
            balances.insert(account, balance);
        }

        let batch_id = Uuid::now_v7();
        let applied_at = self.timestamp();
        let mut journal = self.journal.lock();
        for leg in batch.legs() {
            journal.push_back(LedgerEntry {
                batch_id,
                transfer: leg.clone(),
                applied_at,
            });
        }
        let excess = journal.len().saturating_sub(self.journal_limit);
        journal.drain(..excess);
        drop(journal);
        drop(balances);
        tracing::debug!(%batch_id, legs = batch.len(), "ledger batch applied");
        Ok(())
    }

    fn install_receiver(&self, account: Address, receiver: Arc<dyn Receiver>) {
        self.register_receiver(account, receiver);
    }
}
