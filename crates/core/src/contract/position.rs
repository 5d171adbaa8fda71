//! Versioned position types
//!
//! A position names a point in the lock-watch event log. It pairs the
//! leadership epoch that produced the log with a sequence number inside it.
//!
//! ## Comparison
//!
//! Positions are comparable **within the same epoch** only. Two positions
//! from different epochs carry no ordering information; seeing a new epoch
//! means the lock server changed leader and every delta built against the
//! old one is void. `PartialOrd` therefore returns `None` across epochs.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use uuid::Uuid;

/// Identifier of a leadership epoch of the lock server
///
/// A new epoch starts on every leader election. The identifier is opaque;
/// only equality is meaningful.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EpochId(Uuid);

impl EpochId {
    /// Create a new random EpochId using UUID v4
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EpochId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EpochId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A point in the event log: `(epoch, sequence)`
///
/// ## Invariants
///
/// - Sequences increase monotonically within an epoch
/// - Positions of different epochs are incomparable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VersionedPosition {
    /// Epoch that produced this position
    pub epoch: EpochId,
    /// Sequence number within the epoch
    pub sequence: u64,
}

impl VersionedPosition {
    /// Create a position
    pub const fn new(epoch: EpochId, sequence: u64) -> Self {
        Self { epoch, sequence }
    }

    /// Check whether both positions belong to the same epoch
    #[inline]
    pub fn same_epoch(&self, other: &VersionedPosition) -> bool {
        self.epoch == other.epoch
    }

    /// Position `n` sequences before this one, clamped at zero
    pub const fn saturating_back(&self, n: u64) -> Self {
        Self {
            epoch: self.epoch,
            sequence: self.sequence.saturating_sub(n),
        }
    }
}

impl PartialOrd for VersionedPosition {
    /// Compare positions of the same epoch by sequence
    ///
    /// Cross-epoch comparison yields `None`.
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if self.same_epoch(other) {
            Some(self.sequence.cmp(&other.sequence))
        } else {
            None
        }
    }
}

impl fmt::Display for VersionedPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.epoch, self.sequence)
    }
}

// ============================================================================
// Tests
// ============================================================================
