//! Error types for the lock-watch subsystem
//!
//! Only contract violations are errors. Stale history and leader changes
//! are answered from the snapshot baseline and never surface here.
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.

use crate::contract::VersionedPosition;
use thiserror::Error;

/// Result type alias for lock-watch operations
pub type LockWatchResult<T> = std::result::Result<T, LockWatchError>;

/// Contract violations reported by the event log and cache
///
/// Callers receiving one of these have lost consistency with the log and
/// must restart the affected transaction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LockWatchError {
    /// The log has not processed any update that established a position
    #[error("Cannot get events when log does not know its version")]
    UnknownVersion,

    /// The caller's end position is newer than anything the log has seen
    #[error("Transactions' view of the world is more up-to-date than the log: requested {requested}, latest {latest}")]
    VersionAheadOfLog {
        /// Requested end position
        requested: VersionedPosition,
        /// Latest position known to the log
        latest: VersionedPosition,
    },

    /// The caller's end position belongs to a different epoch
    #[error("End position {requested} is from a different epoch than the log at {latest}")]
    EpochMismatch {
        /// Requested end position
        requested: VersionedPosition,
        /// Latest position known to the log
        latest: VersionedPosition,
    },
}

impl LockWatchError {
    /// Latest position known to the log when the violation happened
    pub fn latest(&self) -> Option<VersionedPosition> {
        match self {
            LockWatchError::UnknownVersion => None,
            LockWatchError::VersionAheadOfLog { latest, .. }
            | LockWatchError::EpochMismatch { latest, .. } => Some(*latest),
        }
    }
}
