//! Shared node state for cross-task communication.

use scratch_settlement::{MemoryLedger, SettlementModule};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc;

use crate::commands::NodeCommand;

/// Shared state for the running node, accessible from HTTP handlers.
pub struct NodeState {
    /// The hosted module. Handlers read from it directly.
    pub module: Arc<SettlementModule>,
    /// The ledger the module settles against.
    pub ledger: Arc<MemoryLedger>,
    /// When the node started.
    pub start_time: Instant,
    /// Channel to send state-changing commands to the event loop.
    pub command_tx: mpsc::Sender<NodeCommand>,
}

impl NodeState {
    pub fn new(
        module: Arc<SettlementModule>,
        ledger: Arc<MemoryLedger>,
        command_tx: mpsc::Sender<NodeCommand>,
    ) -> Self {
        Self {
            module,
            ledger,
            start_time: Instant::now(),
            command_tx,
        }
    }

    pub fn uptime_secs(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}
