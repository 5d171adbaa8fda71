//! Query results returned by the event log and cache

use crate::contract::VersionedPosition;
use crate::event::LockWatchEvent;
use crate::types::{LockDescriptor, Timestamp};
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

/// Events between two positions of the log
///
/// When `started_from_snapshot` is set, the first event is a synthetic
/// `LockWatchCreated` describing the full baseline state and the caller
/// must discard any finer-grained state derived from earlier queries.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ClientLogEvents {
    /// Events in sequence order
    pub events: Vec<LockWatchEvent>,
    /// Whether the answer is rooted at the snapshot baseline
    pub started_from_snapshot: bool,
}

impl ClientLogEvents {
    /// An exact delta
    pub fn delta(events: Vec<LockWatchEvent>) -> Self {
        Self {
            events,
            started_from_snapshot: false,
        }
    }

    /// A snapshot-rooted answer
    pub fn from_snapshot(events: Vec<LockWatchEvent>) -> Self {
        Self {
            events,
            started_from_snapshot: true,
        }
    }

    /// Number of events
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Check if there are no events
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Sequences of the events, in order
    pub fn sequences(&self) -> Vec<u64> {
        self.events.iter().map(LockWatchEvent::sequence).collect()
    }

    /// Every descriptor touched by any event
    pub fn touched_descriptors(&self) -> BTreeSet<LockDescriptor> {
        self.events
            .iter()
            .flat_map(|e| e.lock_descriptors().iter().cloned())
            .collect()
    }
}

/// Per-transaction answer of a batched cache query
///
/// Transactions that started at the same position share one `Arc`.
#[derive(Debug, Clone, Default)]
pub struct TransactionsLockWatchEvents {
    /// End position the events were computed up to
    pub end: Option<VersionedPosition>,
    /// Events per transaction start timestamp
    pub events: HashMap<Timestamp, Arc<ClientLogEvents>>,
}

impl TransactionsLockWatchEvents {
    /// Events for one transaction
    pub fn get(&self, timestamp: Timestamp) -> Option<&ClientLogEvents> {
        self.events.get(&timestamp).map(Arc::as_ref)
    }

    /// Number of transactions in the answer
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Check if the answer covers no transaction
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
