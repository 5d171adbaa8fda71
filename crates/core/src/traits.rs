//! Core traits for the event log and event cache
//!
//! These traits let the cache sit on top of any log implementation and let
//! tests substitute a recording log. Dependencies point one way only: the
//! cache knows the log, the log never knows the cache.
//!
//! Thread safety: All methods must be safe to call concurrently from
//! multiple threads (requires Send + Sync).

use std::collections::{BTreeMap, BTreeSet};

use crate::contract::VersionedPosition;
use crate::error::LockWatchResult;
use crate::log_events::{ClientLogEvents, TransactionsLockWatchEvents};
use crate::types::Timestamp;
use crate::update::LockWatchStateUpdate;

/// Client-side replica of the lock server's event log
pub trait ClientLockWatchEventLog: Send + Sync {
    /// Apply one update and return the latest known position afterwards
    ///
    /// A `Success` under an unknown or different epoch discards all state,
    /// exactly like `Failed`. A `Success` that does not advance the
    /// position is ignored.
    fn process_update(&self, update: &LockWatchStateUpdate) -> Option<VersionedPosition>;

    /// Events after `start_exclusive` up to and including `end_inclusive`
    ///
    /// Falls back to a snapshot-rooted answer when `start_exclusive` is
    /// absent, from another epoch, or already compacted away.
    ///
    /// # Errors
    ///
    /// Returns a contract violation if no position is known, or if
    /// `end_inclusive` is ahead of the log or from another epoch.
    fn get_events_between_versions(
        &self,
        start_exclusive: Option<VersionedPosition>,
        end_inclusive: VersionedPosition,
    ) -> LockWatchResult<ClientLogEvents>;

    /// Drop events older than `earliest_needed`, folding them into the baseline
    fn remove_old_entries(&self, earliest_needed: VersionedPosition);

    /// Latest known position, if any
    fn get_latest_known_version(&self) -> Option<VersionedPosition>;
}

/// Maps transaction start timestamps to log positions
pub trait LockWatchEventCache: Send + Sync {
    /// Apply an update without associating any timestamp
    fn process_update(&self, update: &LockWatchStateUpdate);

    /// Apply an update and record the resulting position for `timestamps`
    ///
    /// Nothing is recorded when the log ends up without a known position.
    fn process_start_transactions_update(
        &self,
        timestamps: &BTreeSet<Timestamp>,
        update: &LockWatchStateUpdate,
    );

    /// Recorded start position of each timestamp; unknown ones map to `None`
    fn get_timestamp_to_version_map(
        &self,
        timestamps: &BTreeSet<Timestamp>,
    ) -> BTreeMap<Timestamp, Option<VersionedPosition>>;

    /// Events since each transaction's start position up to `end_inclusive`
    ///
    /// # Errors
    ///
    /// Propagates contract violations from the log.
    fn get_events_for_transactions(
        &self,
        timestamp_to_version: &BTreeMap<Timestamp, Option<VersionedPosition>>,
        end_inclusive: VersionedPosition,
    ) -> LockWatchResult<TransactionsLockWatchEvents>;

    /// Forget a finished transaction and compact the log if possible
    fn remove_timestamp_from_cache(&self, timestamp: Timestamp);
}
