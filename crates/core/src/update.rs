//! Lock-watch state updates
//!
//! The transport delivers one `LockWatchStateUpdate` per poll of the lock
//! server. Each variant carries only its own payload.

use crate::contract::{EpochId, VersionedPosition};
use crate::event::LockWatchEvent;
use crate::types::{LockDescriptor, LockWatchReference};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// An update to the client's view of the lock-watch log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LockWatchStateUpdate {
    /// Incremental delta; earlier knowledge of the epoch stays valid
    Success {
        /// Epoch the events belong to
        epoch: EpochId,
        /// Highest sequence the server had when building the update
        last_known_sequence: u64,
        /// New events in sequence order
        events: Vec<LockWatchEvent>,
    },
    /// Full state; replaces everything known about the epoch
    Snapshot {
        /// Epoch of the snapshot
        epoch: EpochId,
        /// Sequence the snapshot is taken at
        last_known_sequence: u64,
        /// Descriptors currently locked
        locked: BTreeSet<LockDescriptor>,
        /// Watches currently registered
        watched: BTreeSet<LockWatchReference>,
    },
    /// The server cannot guarantee continuity; discard everything
    Failed {
        /// Epoch reported by the server
        epoch: EpochId,
    },
}

impl LockWatchStateUpdate {
    /// Build an incremental update
    pub fn success(epoch: EpochId, last_known_sequence: u64, events: Vec<LockWatchEvent>) -> Self {
        LockWatchStateUpdate::Success {
            epoch,
            last_known_sequence,
            events,
        }
    }

    /// Build a snapshot update
    pub fn snapshot(
        epoch: EpochId,
        last_known_sequence: u64,
        locked: impl IntoIterator<Item = LockDescriptor>,
        watched: impl IntoIterator<Item = LockWatchReference>,
    ) -> Self {
        LockWatchStateUpdate::Snapshot {
            epoch,
            last_known_sequence,
            locked: locked.into_iter().collect(),
            watched: watched.into_iter().collect(),
        }
    }

    /// Build a failed update
    pub fn failed(epoch: EpochId) -> Self {
        LockWatchStateUpdate::Failed { epoch }
    }

    /// Epoch the update was produced under
    pub fn epoch(&self) -> EpochId {
        match self {
            LockWatchStateUpdate::Success { epoch, .. }
            | LockWatchStateUpdate::Snapshot { epoch, .. }
            | LockWatchStateUpdate::Failed { epoch } => *epoch,
        }
    }

    /// Position the server reported, if the variant carries one
    pub fn last_known_position(&self) -> Option<VersionedPosition> {
        match self {
            LockWatchStateUpdate::Success {
                epoch,
                last_known_sequence,
                ..
            }
            | LockWatchStateUpdate::Snapshot {
                epoch,
                last_known_sequence,
                ..
            } => Some(VersionedPosition::new(*epoch, *last_known_sequence)),
            LockWatchStateUpdate::Failed { .. } => None,
        }
    }

    /// Short name of the variant, for logging
    pub fn kind(&self) -> &'static str {
        match self {
            LockWatchStateUpdate::Success { .. } => "success",
            LockWatchStateUpdate::Snapshot { .. } => "snapshot",
            LockWatchStateUpdate::Failed { .. } => "failed",
        }
    }
}
