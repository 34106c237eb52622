//! Scratch Settlement Layer
//!
//! Provides the settlement module that splits an attached payment between a
//! recipient and the platform administrator, the execution-environment
//! abstraction it runs against, and an in-memory ledger adapter.

pub mod adapters;
pub mod events;
pub mod guard;
pub mod module;
pub mod traits;
pub mod types;

pub use adapters::memory::{MemoryLedger, DEFAULT_JOURNAL_LIMIT};
pub use events::{EventLog, RecordedEvent, DEFAULT_EVENT_RETENTION};
pub use guard::ReentrancyGuard;
pub use module::SettlementModule;
pub use traits::{Ledger, Receiver};
pub use types::{SettlementId, SettlementReceipt, Transfer, TransferBatch, TransferKind};
