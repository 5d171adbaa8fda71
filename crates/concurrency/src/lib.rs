//! Concurrency layer for lock watches
//!
//! This crate implements the shared, mutable lock-watch components:
//! - EventLog: versioned replica of the lock server's event log
//! - SnapshotMaterializer: baseline of compacted events
//! - EventCache: transaction timestamp -> log position, batched range queries
//! - EventCacheConfig: compaction tuning
//!
//! Every component is `Send + Sync` and guards its state with a single
//! `parking_lot::RwLock`.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod event_cache;
pub mod event_log;
pub mod snapshot;

pub use config::EventCacheConfig;
pub use event_cache::EventCache;
pub use event_log::EventLog;
pub use snapshot::SnapshotMaterializer;
