//! Per-transaction view over the client event log
//!
//! Records, for every transaction start timestamp, the log position that was
//! current when the transaction started. Queries resolve timestamps back to
//! positions and ask the log for the events since then.
//!
//! ## Compaction
//!
//! Removing a finished transaction is the only compaction trigger. After each
//! removal the cache recomputes the oldest position still referenced by a
//! live transaction in the log's current epoch and, if it advanced, tells the
//! log to fold everything older into its baseline:
//!
//! ```text
//! remove(ts) -> min(live positions in epoch) -> back off retained_sequences
//!            -> advanced past last watermark? -> log.remove_old_entries()
//! ```
//!
//! With no live transaction left, the watermark is the log's latest position.
//!
//! ## Locking
//!
//! The timestamp map sits behind its own `parking_lot::RwLock`. Mutations
//! hold it while calling into the log, so the lock order is always
//! cache -> log. The log never calls back into the cache.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, trace};

use lockwatch_core::{
    ClientLockWatchEventLog, EpochId, LockWatchEventCache, LockWatchResult, LockWatchStateUpdate,
    Timestamp, TransactionsLockWatchEvents, VersionedPosition,
};

use crate::config::EventCacheConfig;
use crate::event_log::EventLog;

/// State guarded by the event cache lock
#[derive(Debug, Default)]
struct EventCacheState {
    /// Start position of every live transaction
    timestamp_map: HashMap<Timestamp, VersionedPosition>,
    /// Last watermark handed to the log for compaction
    earliest_reported: Option<VersionedPosition>,
}

impl EventCacheState {
    /// Oldest live position within `epoch`
    fn earliest_in_epoch(&self, epoch: EpochId) -> Option<VersionedPosition> {
        self.timestamp_map
            .values()
            .filter(|p| p.epoch == epoch)
            .min_by_key(|p| p.sequence)
            .copied()
    }

    fn advances_watermark(&self, candidate: VersionedPosition) -> bool {
        match self.earliest_reported {
            Some(previous) if previous.same_epoch(&candidate) => {
                candidate.sequence > previous.sequence
            }
            _ => true,
        }
    }
}

/// Event cache layered on an event log
///
/// Generic over the log so tests can observe the calls it makes.
///
/// # Example
///
/// ```
/// use std::collections::BTreeSet;
/// use std::sync::Arc;
/// use lockwatch_concurrency::{EventCache, EventLog};
/// use lockwatch_core::{EpochId, LockWatchEventCache, LockWatchStateUpdate, VersionedPosition};
///
/// let cache = EventCache::new(Arc::new(EventLog::new()));
/// let epoch = EpochId::new();
/// let timestamps: BTreeSet<u64> = [1, 2].into_iter().collect();
///
/// cache.process_start_transactions_update(
///     &timestamps,
///     &LockWatchStateUpdate::snapshot(epoch, 0, vec![], vec![]),
/// );
///
/// let map = cache.get_timestamp_to_version_map(&timestamps);
/// assert_eq!(map[&1], Some(VersionedPosition::new(epoch, 0)));
/// ```
#[derive(Debug)]
pub struct EventCache<L: ClientLockWatchEventLog = EventLog> {
    log: Arc<L>,
    config: EventCacheConfig,
    state: RwLock<EventCacheState>,
}

impl<L: ClientLockWatchEventLog> EventCache<L> {
    /// Create a cache over `log` with default configuration
    pub fn new(log: Arc<L>) -> Self {
        Self {
            log,
            config: EventCacheConfig::default(),
            state: RwLock::new(EventCacheState::default()),
        }
    }

    /// Create a cache over `log` with explicit configuration
    pub fn with_config(log: Arc<L>, config: EventCacheConfig) -> Self {
        Self {
            log,
            config,
            state: RwLock::new(EventCacheState::default()),
        }
    }

    /// The underlying event log
    pub fn event_log(&self) -> &Arc<L> {
        &self.log
    }

    /// Active configuration
    pub fn config(&self) -> &EventCacheConfig {
        &self.config
    }

    /// Number of live transactions tracked
    pub fn tracked_timestamps(&self) -> usize {
        self.state.read().timestamp_map.len()
    }

    /// Oldest recorded start position in the log's current epoch
    pub fn earliest_live_position(&self) -> Option<VersionedPosition> {
        let latest = self.log.get_latest_known_version()?;
        self.state.read().earliest_in_epoch(latest.epoch)
    }

    /// Resolve `timestamps` and fetch their events in one call
    ///
    /// # Errors
    ///
    /// Propagates contract violations from the log.
    pub fn get_events_for_timestamps(
        &self,
        timestamps: &BTreeSet<Timestamp>,
        end_inclusive: VersionedPosition,
    ) -> LockWatchResult<TransactionsLockWatchEvents> {
        let timestamp_to_version = self.get_timestamp_to_version_map(timestamps);
        self.get_events_for_transactions(&timestamp_to_version, end_inclusive)
    }
}

impl<L: ClientLockWatchEventLog> LockWatchEventCache for EventCache<L> {
    fn process_update(&self, update: &LockWatchStateUpdate) {
        let _state = self.state.write();
        self.log.process_update(update);
    }

    fn process_start_transactions_update(
        &self,
        timestamps: &BTreeSet<Timestamp>,
        update: &LockWatchStateUpdate,
    ) {
        let mut state = self.state.write();
        let Some(position) = self.log.process_update(update) else {
            trace!(
                timestamps = timestamps.len(),
                kind = update.kind(),
                "No known lock watch position; leaving timestamps unmapped"
            );
            return;
        };

        for timestamp in timestamps {
            state.timestamp_map.insert(*timestamp, position);
        }
    }

    fn get_timestamp_to_version_map(
        &self,
        timestamps: &BTreeSet<Timestamp>,
    ) -> BTreeMap<Timestamp, Option<VersionedPosition>> {
        let state = self.state.read();
        timestamps
            .iter()
            .map(|ts| (*ts, state.timestamp_map.get(ts).copied()))
            .collect()
    }

    fn get_events_for_transactions(
        &self,
        timestamp_to_version: &BTreeMap<Timestamp, Option<VersionedPosition>>,
        end_inclusive: VersionedPosition,
    ) -> LockWatchResult<TransactionsLockWatchEvents> {
        let mut by_start: HashMap<Option<VersionedPosition>, Vec<Timestamp>> = HashMap::new();
        for (timestamp, start) in timestamp_to_version {
            by_start.entry(*start).or_default().push(*timestamp);
        }

        let mut events = HashMap::with_capacity(timestamp_to_version.len());
        for (start, timestamps) in by_start {
            let range = Arc::new(self.log.get_events_between_versions(start, end_inclusive)?);
            for timestamp in timestamps {
                events.insert(timestamp, Arc::clone(&range));
            }
        }

        Ok(TransactionsLockWatchEvents {
            end: Some(end_inclusive),
            events,
        })
    }

    fn remove_timestamp_from_cache(&self, timestamp: Timestamp) {
        let mut state = self.state.write();
        if state.timestamp_map.remove(&timestamp).is_none() || !self.config.compaction_enabled {
            return;
        }

        let Some(latest) = self.log.get_latest_known_version() else {
            return;
        };

        let earliest = state
            .earliest_in_epoch(latest.epoch)
            .unwrap_or(latest)
            .saturating_back(self.config.retained_sequences);

        if !state.advances_watermark(earliest) {
            return;
        }

        debug!(
            timestamp,
            earliest = %earliest,
            live = state.timestamp_map.len(),
            "Advancing lock watch compaction watermark"
        );
        state.earliest_reported = Some(earliest);
        self.log.remove_old_entries(earliest);
    }
}
