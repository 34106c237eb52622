//! The Scratch node orchestrator.
//!
//! Builds the in-memory ledger from the genesis accounts, deploys the
//! settlement module onto it, forwards emitted events to observers, and runs
//! the HTTP API. State-changing calls arrive over a command channel and are
//! applied one at a time by [`ScratchNode::run`].

use anyhow::Result;
use async_trait::async_trait;
use scratch_settlement::{MemoryLedger, RecordedEvent, SettlementModule};
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;

use crate::commands::NodeCommand;
use crate::config::ScratchConfig;
use crate::state::NodeState;

/// Receives every event the module emits, in order.
#[async_trait]
pub trait EventObserver: Send + Sync {
    async fn on_event(&self, event: &RecordedEvent);
}

/// Writes each event to the log.
pub struct LogObserver;

#[async_trait]
impl EventObserver for LogObserver {
    async fn on_event(&self, recorded: &RecordedEvent) {
        match recorded.event.as_payment() {
            Some(payment) => tracing::info!(
                sequence = recorded.sequence,
                sender = %payment.sender,
                recipient = %payment.recipient,
                amount = payment.amount,
                message = %payment.message,
                "PaymentSent"
            ),
            None => tracing::info!(
                sequence = recorded.sequence,
                event = ?recorded.event,
                "{}",
                recorded.event.name()
            ),
        }
    }
}

/// A node hosting one settlement module.
pub struct ScratchNode {
    /// Node configuration.
    config: ScratchConfig,
    /// The ledger the module settles against.
    ledger: Arc<MemoryLedger>,
    /// The hosted module.
    module: Arc<SettlementModule>,
    /// Event consumers, fed by the forwarder task.
    observers: Vec<Arc<dyn EventObserver>>,
    /// Forwarder and API server tasks, aborted on shutdown.
    tasks: Vec<JoinHandle<()>>,
    /// Receives commands from the HTTP API. Closes once every `NodeState`
    /// handed out by [`ScratchNode::prepare`] is dropped.
    command_rx: Option<mpsc::Receiver<NodeCommand>>,
}

impl ScratchNode {
    /// Create a node: genesis ledger plus a freshly deployed module.
    pub fn new(config: ScratchConfig) -> Result<Self> {
        let module_config = config.module_config()?;
        let ledger = Arc::new(MemoryLedger::with_accounts(
            config.chain_id(),
            config
                .ledger
                .accounts
                .iter()
                .map(|account| (account.address, account.balance)),
        ));
        let module = Arc::new(SettlementModule::deploy(module_config, ledger.clone())?);

        tracing::info!(
            chain_id = %config.chain_id(),
            module = %module.address(),
            accounts = config.ledger.accounts.len(),
            "Scratch node created"
        );

        Ok(Self {
            config,
            ledger,
            module,
            observers: vec![Arc::new(LogObserver)],
            tasks: Vec::new(),
            command_rx: None,
        })
    }

    /// Register an additional event observer. Takes effect on `start`.
    pub fn add_observer(&mut self, observer: Arc<dyn EventObserver>) {
        self.observers.push(observer);
    }

    /// Wire up shared state without binding a listener.
    pub fn prepare(&mut self) -> Arc<NodeState> {
        let (command_tx, command_rx) = mpsc::channel::<NodeCommand>(256);
        let node_state = Arc::new(NodeState::new(
            self.module.clone(),
            self.ledger.clone(),
            command_tx,
        ));

        let events = self.module.events().subscribe();
        let observers = self.observers.clone();
        self.tasks.push(tokio::spawn(forward_events(events, observers)));

        self.command_rx = Some(command_rx);
        node_state
    }

    /// Start the event forwarder and the HTTP API.
    pub async fn start(&mut self) -> Result<()> {
        tracing::info!("starting Scratch node");

        let node_state = self.prepare();
        let api_addr = self.config.api_addr()?;
        let listener = tokio::net::TcpListener::bind(api_addr).await?;
        let local_addr = listener.local_addr()?;
        self.tasks.push(tokio::spawn(async move {
            if let Err(e) = crate::api::serve(listener, node_state).await {
                tracing::error!(error = %e, "HTTP API server error");
            }
        }));
        tracing::info!(%local_addr, "HTTP API server started");
        Ok(())
    }

    /// Run the node's main event loop: applies API commands in arrival order.
    pub async fn run(&mut self) -> Result<()> {
        let mut command_rx = self
            .command_rx
            .take()
            .ok_or_else(|| anyhow::anyhow!("node not started"))?;

        tracing::info!("entering main event loop");

        while let Some(cmd) = command_rx.recv().await {
            tracing::debug!(command = cmd.name(), "applying command");
            dispatch(&self.module, cmd);
        }

        tracing::info!("API command channel closed");
        Ok(())
    }

    /// Gracefully shut down the node.
    pub async fn shutdown(&mut self) -> Result<()> {
        tracing::info!("shutting down Scratch node");
        for task in self.tasks.drain(..) {
            task.abort();
        }
        self.command_rx = None;
        tracing::info!(
            events = self.module.events().len(),
            module_balance = self.module.contract_balance(),
            "Scratch node shut down"
        );
        Ok(())
    }

    pub fn module(&self) -> &Arc<SettlementModule> {
        &self.module
    }

    pub fn ledger(&self) -> &Arc<MemoryLedger> {
        &self.ledger
    }
}

/// Apply one command to the module and answer on its reply channel.
pub fn dispatch(module: &SettlementModule, cmd: NodeCommand) {
    // A dropped reply channel means the HTTP caller went away; the call
    // itself has already taken effect.
    match cmd {
        NodeCommand::SendPayment {
            caller,
            recipient,
            message,
            amount,
            reply,
        } => {
            let _ = reply.send(module.send_payment(caller, recipient, message, amount));
        }
        NodeCommand::SetFeeRate {
            caller,
            rate,
            reply,
        } => {
            let _ = reply.send(module.set_fee_rate(caller, rate));
        }
        NodeCommand::TransferAdministrator {
            caller,
            new_admin,
            reply,
        } => {
            let _ = reply.send(module.transfer_administrator(caller, new_admin));
        }
    }
}

/// Feed every event from `events` to each observer until the log closes.
async fn forward_events(
    mut events: broadcast::Receiver<RecordedEvent>,
    observers: Vec<Arc<dyn EventObserver>>,
) {
    loop {
        match events.recv().await {
            Ok(recorded) => {
                for observer in &observers {
                    observer.on_event(&recorded).await;
                }
            }
            Err(broadcast::error::RecvError::Lagged(n)) => {
                tracing::warn!(missed = n, "event forwarder lagged");
            }
            Err(broadcast::error::RecvError::Closed) => {
                tracing::info!("event channel closed");
                break;
            }
        }
    }
}
