//! Lock-watch events
//!
//! Events are immutable records streamed by the lock server. Each one
//! carries the sequence number it occupies in its epoch's log.

use crate::contract::VersionedPosition;
use crate::types::{LockDescriptor, LockToken, LockWatchReference};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A change in lock or watch state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LockWatchEvent {
    /// Descriptors were locked under a token
    Lock {
        /// Sequence number within the epoch
        sequence: u64,
        /// Descriptors acquired
        lock_descriptors: BTreeSet<LockDescriptor>,
        /// Token of the granted request
        lock_token: LockToken,
    },
    /// Descriptors were released
    Unlock {
        /// Sequence number within the epoch
        sequence: u64,
        /// Descriptors released
        lock_descriptors: BTreeSet<LockDescriptor>,
    },
    /// Watches were registered, together with the descriptors already
    /// locked underneath them
    LockWatchCreated {
        /// Sequence number within the epoch
        sequence: u64,
        /// Newly registered watches
        references: BTreeSet<LockWatchReference>,
        /// Descriptors locked at registration time
        lock_descriptors: BTreeSet<LockDescriptor>,
    },
}

impl LockWatchEvent {
    /// Build a lock event
    pub fn lock(
        sequence: u64,
        lock_descriptors: impl IntoIterator<Item = LockDescriptor>,
        lock_token: LockToken,
    ) -> Self {
        LockWatchEvent::Lock {
            sequence,
            lock_descriptors: lock_descriptors.into_iter().collect(),
            lock_token,
        }
    }

    /// Build an unlock event
    pub fn unlock(sequence: u64, lock_descriptors: impl IntoIterator<Item = LockDescriptor>) -> Self {
        LockWatchEvent::Unlock {
            sequence,
            lock_descriptors: lock_descriptors.into_iter().collect(),
        }
    }

    /// Build a watch-created event
    pub fn created(
        sequence: u64,
        references: impl IntoIterator<Item = LockWatchReference>,
        lock_descriptors: impl IntoIterator<Item = LockDescriptor>,
    ) -> Self {
        LockWatchEvent::LockWatchCreated {
            sequence,
            references: references.into_iter().collect(),
            lock_descriptors: lock_descriptors.into_iter().collect(),
        }
    }

    /// Synthetic event describing the full lock/watch state at a position
    ///
    /// Used as the leading event of a snapshot-rooted answer.
    pub fn from_snapshot(
        position: VersionedPosition,
        locked: BTreeSet<LockDescriptor>,
        watched: BTreeSet<LockWatchReference>,
    ) -> Self {
        LockWatchEvent::LockWatchCreated {
            sequence: position.sequence,
            references: watched,
            lock_descriptors: locked,
        }
    }

    /// Sequence number of the event
    pub fn sequence(&self) -> u64 {
        match self {
            LockWatchEvent::Lock { sequence, .. }
            | LockWatchEvent::Unlock { sequence, .. }
            | LockWatchEvent::LockWatchCreated { sequence, .. } => *sequence,
        }
    }

    /// Descriptors this event touches
    pub fn lock_descriptors(&self) -> &BTreeSet<LockDescriptor> {
        match self {
            LockWatchEvent::Lock {
                lock_descriptors, ..
            }
            | LockWatchEvent::Unlock {
                lock_descriptors, ..
            }
            | LockWatchEvent::LockWatchCreated {
                lock_descriptors, ..
            } => lock_descriptors,
        }
    }

    /// Short name of the event kind, for logging
    pub fn kind(&self) -> &'static str {
        match self {
            LockWatchEvent::Lock { .. } => "lock",
            LockWatchEvent::Unlock { .. } => "unlock",
            LockWatchEvent::LockWatchCreated { .. } => "created",
        }
    }
}
