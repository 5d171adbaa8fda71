//! Lockwatch - client-side lock-watch event log and event cache
//!
//! Transactions use lock watches to learn, without asking the lock server on
//! every read, whether any row they touched was locked or unlocked since they
//! started. The lock server streams lock-state changes; each client keeps a
//! bounded, versioned replica of that stream and remembers, per transaction,
//! which log position existed when the transaction began.
//!
//! # Quick Start
//!
//! ```
//! use std::collections::BTreeSet;
//! use std::sync::Arc;
//! use lockwatch::{
//!     ClientLockWatchEventLog, EpochId, EventCache, EventLog, LockWatchEventCache,
//!     LockWatchStateUpdate,
//! };
//!
//! let cache = EventCache::new(Arc::new(EventLog::new()));
//! let epoch = EpochId::new();
//! let txn: BTreeSet<u64> = [100].into_iter().collect();
//!
//! // Transaction 100 starts together with the initial snapshot
//! cache.process_start_transactions_update(
//!     &txn,
//!     &LockWatchStateUpdate::snapshot(epoch, 0, vec![], vec![]),
//! );
//!
//! // Later: what changed since it started?
//! let end = cache.event_log().get_latest_known_version().unwrap();
//! let events = cache.get_events_for_timestamps(&txn, end)?;
//! assert!(events.get(100).unwrap().is_empty());
//!
//! // Done with lock-watch data
//! cache.remove_timestamp_from_cache(100);
//! # Ok::<(), lockwatch::LockWatchError>(())
//! ```
//!
//! # Architecture
//!
//! - [`lockwatch_core`]: positions, events, updates, errors, and the
//!   [`ClientLockWatchEventLog`] / [`LockWatchEventCache`] traits
//! - [`lockwatch_concurrency`]: the thread-safe [`EventLog`], its
//!   [`SnapshotMaterializer`], and the [`EventCache`]
//!
//! Network transport and the server-side lock manager are not part of this
//! crate; it consumes already-deserialized [`LockWatchStateUpdate`] values.

pub use lockwatch_concurrency::{
    EventCache, EventCacheConfig, EventLog, SnapshotMaterializer,
};
pub use lockwatch_core::*;
