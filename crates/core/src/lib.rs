//! Core types and traits for lock watches
//!
//! This crate defines the foundational types used throughout the system:
//! - EpochId, VersionedPosition: Positions in the lock-watch event log
//! - LockDescriptor, LockToken, LockWatchReference: What is locked and watched
//! - LockWatchEvent: Lock state changes streamed by the lock server
//! - LockWatchStateUpdate: Success / Snapshot / Failed updates from the transport
//! - ClientLogEvents, TransactionsLockWatchEvents: Query results
//! - LockWatchError: Contract violations
//! - Traits: ClientLockWatchEventLog, LockWatchEventCache

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod contract;
pub mod error;
pub mod event;
pub mod log_events;
pub mod traits;
pub mod types;
pub mod update;

// Re-export commonly used types and traits
pub use contract::{EpochId, VersionedPosition};
pub use error::{LockWatchError, LockWatchResult};
pub use event::LockWatchEvent;
pub use log_events::{ClientLogEvents, TransactionsLockWatchEvents};
pub use traits::{ClientLockWatchEventLog, LockWatchEventCache};
pub use types::{LockDescriptor, LockToken, LockWatchReference, Timestamp};
pub use update::LockWatchStateUpdate;
