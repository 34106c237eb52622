//! Emission of module events.
//!
//! The log keeps the most recent emitted events in order so pollers can
//! resume from a sequence number, and fans each event out to live subscribers.

use parking_lot::RwLock;
use scratch_core::ModuleEvent;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use tokio::sync::broadcast;

/// Events kept for polling when no retention is given.
pub const DEFAULT_EVENT_RETENTION: usize = 10_000;

/// An event together with its position in the log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordedEvent {
    pub sequence: u64,
    pub event: ModuleEvent,
}

struct Retained {
    events: VecDeque<RecordedEvent>,
    next_sequence: u64,
}

/// Ordered record of emitted events, bounded to the newest `retention`.
///
/// Sequence numbers keep counting across evictions, so a poller that falls
/// behind the window resumes at the oldest retained event.
pub struct EventLog {
    retained: RwLock<Retained>,
    retention: usize,
    sender: broadcast::Sender<RecordedEvent>,
}

impl EventLog {
    /// `capacity` bounds how far a live subscriber may lag before it starts
    /// missing events (it can catch up with [`EventLog::since`] while they
    /// are still retained).
    pub fn new(capacity: usize) -> Self {
        Self::with_retention(capacity, DEFAULT_EVENT_RETENTION)
    }

    pub fn with_retention(capacity: usize, retention: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self {
            retained: RwLock::new(Retained {
                events: VecDeque::new(),
                next_sequence: 0,
            }),
            retention: retention.max(1),
            sender,
        }
    }

    /// Append an event and notify subscribers. Returns its sequence number.
    pub fn emit(&self, event: ModuleEvent) -> u64 {
        let mut retained = self.retained.write();
        let recorded = RecordedEvent {
            sequence: retained.next_sequence,
            event,
        };
        let sequence = recorded.sequence;
        tracing::debug!(sequence, event = recorded.event.name(), "event emitted");
        retained.next_sequence += 1;
        if retained.events.len() == self.retention {
            retained.events.pop_front();
        }
        retained.events.push_back(recorded.clone());
        // No live subscribers is fine; the log still holds the event.
        let _ = self.sender.send(recorded);
        sequence
    }

    /// Subscribe to events emitted from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<RecordedEvent> {
        self.sender.subscribe()
    }

    /// Retained events with `sequence >= from`, in order. A `from` older than
    /// the window starts at the oldest retained event.
    pub fn since(&self, from: u64) -> Vec<RecordedEvent> {
        let retained = self.retained.read();
        let skip = from.saturating_sub(retained.oldest());
        let skip = usize::try_from(skip).unwrap_or(usize::MAX);
        retained.events.iter().skip(skip).cloned().collect()
    }

    /// The event with this sequence, if it is still retained.
    pub fn get(&self, sequence: u64) -> Option<RecordedEvent> {
        let retained = self.retained.read();
        let index = usize::try_from(sequence.checked_sub(retained.oldest())?).ok()?;
        retained.events.get(index).cloned()
    }

    /// Number of events ever emitted.
    pub fn len(&self) -> usize {
        usize::try_from(self.retained.read().next_sequence).unwrap_or(usize::MAX)
    }

    pub fn is_empty(&self) -> bool {
        self.retained.read().next_sequence == 0
    }

    /// Sequence of the oldest event still held, or the next sequence when
    /// nothing is held.
    pub fn oldest_sequence(&self) -> u64 {
        self.retained.read().oldest()
    }
}

impl Retained {
    fn oldest(&self) -> u64 {
        self.events
            .front()
            .map(|e| e.sequence)
            .unwrap_or(self.next_sequence)
    }
}

impl Default for EventLog {
    fn default() -> Self {
        Self::new(1024)
    }
}
