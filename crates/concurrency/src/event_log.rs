//! Client-side replica of the lock server's event log
//!
//! Stores the events of one leadership epoch keyed by sequence, tracks the
//! latest known position, and keeps a materialized baseline of everything
//! compacted away.
//!
//! ## Update Processing
//!
//! ```text
//! leader change = no known position, or update epoch != known epoch
//!
//! Success  + leader change  -> discard everything (same as Failed)
//! Success                   -> append events if last_known_sequence advances
//! Snapshot                  -> clear events, baseline := snapshot, position := snapshot
//! Failed                    -> clear events, clear baseline, position := None
//! ```
//!
//! A delta cannot be trusted across a leadership boundary; the next
//! `Snapshot` re-establishes the log.
//!
//! ## Locking
//!
//! All state lives behind one `parking_lot::RwLock`. Mutations take the write
//! guard for their whole read-modify-write sequence; queries take the read
//! guard, so they never see a half-applied update or compaction.

use std::collections::{BTreeMap, BTreeSet};

use parking_lot::RwLock;
use tracing::{debug, trace, warn};

use lockwatch_core::{
    ClientLockWatchEventLog, ClientLogEvents, EpochId, LockDescriptor, LockWatchError,
    LockWatchEvent, LockWatchReference, LockWatchResult, LockWatchStateUpdate, VersionedPosition,
};

use crate::snapshot::SnapshotMaterializer;

/// State guarded by the event log lock
#[derive(Debug, Default)]
struct EventLogState {
    /// Retained events, ordered by sequence
    events: BTreeMap<u64, LockWatchEvent>,
    /// Latest known position; None before the first snapshot and after a failure
    latest: Option<VersionedPosition>,
    /// Baseline of everything older than the first retained event
    snapshot: SnapshotMaterializer,
}

impl EventLogState {
    fn is_leader_change(&self, epoch: EpochId) -> bool {
        match self.latest {
            Some(latest) => latest.epoch != epoch,
            None => true,
        }
    }

    fn process_success(&mut self, epoch: EpochId, last_known_sequence: u64, events: &[LockWatchEvent]) {
        let Some(latest) = self.latest else {
            // Leader-change handling routes every success without a position to discard()
            return;
        };

        if last_known_sequence <= latest.sequence {
            trace!(
                epoch = %epoch,
                last_known_sequence,
                latest = latest.sequence,
                "Ignoring stale lock watch update"
            );
            return;
        }

        // Sequences up to `latest` are already stored or folded into the baseline
        for event in events.iter().filter(|e| e.sequence() > latest.sequence) {
            self.events.insert(event.sequence(), event.clone());
        }

        let highest = self
            .events
            .keys()
            .next_back()
            .copied()
            .map_or(latest.sequence, |last| last.max(latest.sequence));
        self.latest = Some(VersionedPosition::new(epoch, highest));
    }

    fn process_snapshot(
        &mut self,
        epoch: EpochId,
        last_known_sequence: u64,
        locked: &BTreeSet<LockDescriptor>,
        watched: &BTreeSet<LockWatchReference>,
    ) {
        self.events.clear();
        self.snapshot.reset_with_snapshot(locked, watched);
        self.latest = Some(VersionedPosition::new(epoch, last_known_sequence));
    }

    fn discard(&mut self) {
        self.events.clear();
        self.snapshot.reset();
        self.latest = None;
    }

    /// Position describing the baseline: just before the oldest retained event
    ///
    /// Retained sequences are always above the sequence the log was
    /// established at, so the oldest one is at least 1.
    fn baseline_position(&self, latest: VersionedPosition) -> VersionedPosition {
        match self.events.keys().next() {
            Some(&first) => VersionedPosition::new(latest.epoch, first.saturating_sub(1)),
            None => latest,
        }
    }

    /// First sequence of an exact delta after `start_exclusive`, if one exists
    fn exact_delta_start(
        &self,
        start_exclusive: Option<VersionedPosition>,
        latest: VersionedPosition,
    ) -> Option<u64> {
        let start = start_exclusive?;
        if !start.same_epoch(&latest) {
            return None;
        }
        // Anything at or below the baseline position was compacted away
        if start.sequence < self.baseline_position(latest).sequence {
            return None;
        }
        Some(start.sequence.saturating_add(1))
    }

    fn events_in(&self, from: u64, to: u64) -> Vec<LockWatchEvent> {
        if from > to {
            return Vec::new();
        }
        self.events.range(from..=to).map(|(_, e)| e.clone()).collect()
    }
}

/// Client event log
///
/// One instance per database client, shared between the ingestion path,
/// the event cache, and compaction.
///
/// # Example
///
/// ```
/// use lockwatch_concurrency::EventLog;
/// use lockwatch_core::{ClientLockWatchEventLog, EpochId, LockWatchStateUpdate, VersionedPosition};
///
/// let log = EventLog::new();
/// let epoch = EpochId::new();
///
/// let position = log.process_update(&LockWatchStateUpdate::snapshot(epoch, 0, vec![], vec![]));
/// assert_eq!(position, Some(VersionedPosition::new(epoch, 0)));
/// ```
#[derive(Debug, Default)]
pub struct EventLog {
    state: RwLock<EventLogState>,
}

impl EventLog {
    /// Create an empty log with no known position
    pub fn new() -> Self {
        Self::default()
    }

    /// Clone of every retained event, in sequence order
    pub fn retained_events(&self) -> Vec<LockWatchEvent> {
        self.state.read().events.values().cloned().collect()
    }

    /// Sequence of the oldest retained event
    pub fn oldest_retained_sequence(&self) -> Option<u64> {
        self.state.read().events.keys().next().copied()
    }

    /// Clone of the materialized baseline
    pub fn baseline(&self) -> SnapshotMaterializer {
        self.state.read().snapshot.clone()
    }
}

impl ClientLockWatchEventLog for EventLog {
    fn process_update(&self, update: &LockWatchStateUpdate) -> Option<VersionedPosition> {
        let mut state = self.state.write();

        let epoch = update.epoch();
        let leader_change = state.is_leader_change(epoch);

        match update {
            LockWatchStateUpdate::Success { .. } if leader_change => {
                debug!(
                    epoch = %epoch,
                    previous = ?state.latest,
                    "Lock watch success under new leader; discarding log"
                );
                state.discard();
            }
            LockWatchStateUpdate::Success {
                last_known_sequence,
                events,
                ..
            } => state.process_success(epoch, *last_known_sequence, events),
            LockWatchStateUpdate::Snapshot {
                last_known_sequence,
                locked,
                watched,
                ..
            } => {
                debug!(
                    epoch = %epoch,
                    last_known_sequence,
                    leader_change,
                    "Resetting lock watch log from snapshot"
                );
                state.process_snapshot(epoch, *last_known_sequence, locked, watched);
            }
            LockWatchStateUpdate::Failed { .. } => {
                warn!(epoch = %epoch, "Lock watch update failed; discarding log");
                state.discard();
            }
        }

        state.latest
    }

    fn get_events_between_versions(
        &self,
        start_exclusive: Option<VersionedPosition>,
        end_inclusive: VersionedPosition,
    ) -> LockWatchResult<ClientLogEvents> {
        let state = self.state.read();

        let latest = state.latest.ok_or(LockWatchError::UnknownVersion)?;
        if !end_inclusive.same_epoch(&latest) {
            return Err(LockWatchError::EpochMismatch {
                requested: end_inclusive,
                latest,
            });
        }
        if end_inclusive.sequence > latest.sequence {
            return Err(LockWatchError::VersionAheadOfLog {
                requested: end_inclusive,
                latest,
            });
        }

        match state.exact_delta_start(start_exclusive, latest) {
            Some(from) => Ok(ClientLogEvents::delta(
                state.events_in(from, end_inclusive.sequence),
            )),
            None => {
                let baseline = state.baseline_position(latest);
                let mut events = Vec::with_capacity(state.events.len() + 1);
                events.push(state.snapshot.get_snapshot(baseline));
                if let Some(&first) = state.events.keys().next() {
                    events.extend(state.events_in(first, end_inclusive.sequence));
                }
                Ok(ClientLogEvents::from_snapshot(events))
            }
        }
    }

    fn remove_old_entries(&self, earliest_needed: VersionedPosition) {
        let mut guard = self.state.write();
        let state = &mut *guard;

        match state.latest {
            Some(latest) if latest.same_epoch(&earliest_needed) => {}
            _ => {
                trace!(
                    earliest_needed = %earliest_needed,
                    "Skipping compaction for position outside current epoch"
                );
                return;
            }
        }

        let retained = state.events.split_off(&earliest_needed.sequence);
        let removed = std::mem::replace(&mut state.events, retained);
        if removed.is_empty() {
            return;
        }

        state.snapshot.process_events(removed.values());
        debug!(
            removed = removed.len(),
            retained = state.events.len(),
            earliest_needed = earliest_needed.sequence,
            "Compacted lock watch log"
        );
    }

    fn get_latest_known_version(&self) -> Option<VersionedPosition> {
        self.state.read().latest
    }
}
