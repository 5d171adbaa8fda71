//! Event cache configuration.
//!
//! Controls how eagerly the cache compacts the event log when transactions finish.

use serde::{Deserialize, Serialize};

/// Event cache configuration parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventCacheConfig {
    /// Whether removing a timestamp compacts the log (default: true).
    ///
    /// When disabled the log grows until the next snapshot or failure.
    pub compaction_enabled: bool,

    /// Extra sequences kept behind the oldest live position (default: 0).
    ///
    /// Any value is accepted; the watermark saturates at sequence 0.
    pub retained_sequences: u64,
}

impl Default for EventCacheConfig {
    fn default() -> Self {
        EventCacheConfig {
            compaction_enabled: true,
            retained_sequences: 0,
        }
    }
}

impl EventCacheConfig {
    /// Create a new cache configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable compaction (builder pattern).
    pub fn with_compaction_enabled(mut self, enabled: bool) -> Self {
        self.compaction_enabled = enabled;
        self
    }

    /// Set the number of extra retained sequences (builder pattern).
    pub fn with_retained_sequences(mut self, sequences: u64) -> Self {
        self.retained_sequences = sequences;
        self
    }

    /// Create a configuration for tests that inspect the full log.
    pub fn for_testing() -> Self {
        EventCacheConfig {
            compaction_enabled: false,
            retained_sequences: 0,
        }
    }
}
