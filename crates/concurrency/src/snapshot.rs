//! Snapshot materializer for the client event log
//!
//! Holds the coalesced lock/watch state implied by every event that has been
//! compacted out of the log, so the log can always answer "what was the
//! state just before my oldest retained event".
//!
//! # Baseline Guarantees
//!
//! - Events are folded in increasing sequence order
//! - Folding is a pure set operation, so replaying an event is harmless
//! - A server `Snapshot` replaces the baseline wholesale
//! - A server `Failed` clears it
//!
//! The materializer is not synchronized on its own; the event log owns it
//! inside the same lock as its event map, so a compaction and the matching
//! fold are never observed half-done.

use std::collections::BTreeSet;

use lockwatch_core::{LockDescriptor, LockWatchEvent, LockWatchReference, VersionedPosition};

/// Coalesced lock/watch state of compacted events
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SnapshotMaterializer {
    /// Descriptors currently locked
    locked: BTreeSet<LockDescriptor>,
    /// Watches currently registered
    watched: BTreeSet<LockWatchReference>,
}

impl SnapshotMaterializer {
    /// Create an empty materializer
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold compacted events into the baseline
    pub fn process_events<'a>(&mut self, events: impl IntoIterator<Item = &'a LockWatchEvent>) {
        for event in events {
            self.process_event(event);
        }
    }

    /// Fold a single event into the baseline
    pub fn process_event(&mut self, event: &LockWatchEvent) {
        match event {
            LockWatchEvent::Lock {
                lock_descriptors, ..
            } => {
                self.locked.extend(lock_descriptors.iter().cloned());
            }
            LockWatchEvent::Unlock {
                lock_descriptors, ..
            } => {
                for descriptor in lock_descriptors {
                    self.locked.remove(descriptor);
                }
            }
            LockWatchEvent::LockWatchCreated {
                references,
                lock_descriptors,
                ..
            } => {
                self.watched.extend(references.iter().cloned());
                self.locked.extend(lock_descriptors.iter().cloned());
            }
        }
    }

    /// Replace the baseline with a server snapshot
    pub fn reset_with_snapshot(
        &mut self,
        locked: &BTreeSet<LockDescriptor>,
        watched: &BTreeSet<LockWatchReference>,
    ) {
        self.locked = locked.clone();
        self.watched = watched.clone();
    }

    /// Clear the baseline
    pub fn reset(&mut self) {
        self.locked.clear();
        self.watched.clear();
    }

    /// Baseline as a synthetic event labelled with `position`
    pub fn get_snapshot(&self, position: VersionedPosition) -> LockWatchEvent {
        LockWatchEvent::from_snapshot(position, self.locked.clone(), self.watched.clone())
    }

    /// Descriptors currently locked in the baseline
    pub fn locked(&self) -> &BTreeSet<LockDescriptor> {
        &self.locked
    }

    /// Watches currently registered in the baseline
    pub fn watched(&self) -> &BTreeSet<LockWatchReference> {
        &self.watched
    }

    /// Check if the baseline holds no state
    pub fn is_empty(&self) -> bool {
        self.locked.is_empty() && self.watched.is_empty()
    }
}
