//! Core types for the lock-watch subsystem
//!
//! This module defines the foundational identifiers used throughout the system:
//! - Timestamp: Start timestamp of a client transaction
//! - LockDescriptor: Opaque name of a lockable row
//! - LockToken: Identity of one granted lock request
//! - LockWatchReference: What a client asked the server to watch

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Start timestamp of a transaction
///
/// Issued by the timestamp service; unique per transaction.
pub type Timestamp = u64;

/// Separator between table name and row bytes in a descriptor
const DESCRIPTOR_SEPARATOR: u8 = 0;

/// Opaque name of a lockable resource
///
/// Descriptors are compared bytewise. The lock server encodes
/// `table \0 row [\0 column]`, but clients never need to parse them.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LockDescriptor(Vec<u8>);

impl LockDescriptor {
    /// Descriptor for a whole row of a table
    pub fn row(table: &str, row: &[u8]) -> Self {
        let mut bytes = Vec::with_capacity(table.len() + 1 + row.len());
        bytes.extend_from_slice(table.as_bytes());
        bytes.push(DESCRIPTOR_SEPARATOR);
        bytes.extend_from_slice(row);
        Self(bytes)
    }

    /// Raw bytes of the descriptor
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for LockDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            if byte.is_ascii_graphic() {
                write!(f, "{}", *byte as char)?;
            } else {
                write!(f, "\\x{:02x}", byte)?;
            }
        }
        Ok(())
    }
}

/// Identity of one granted lock request
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LockToken(Uuid);

impl LockToken {
    /// Create a new random LockToken using UUID v4
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a LockToken from raw bytes
    pub fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(Uuid::from_bytes(bytes))
    }
}

impl Default for LockToken {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for LockToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A watch registered with the lock server
///
/// Lock and unlock events are only streamed for descriptors covered by a
/// registered watch.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum LockWatchReference {
    /// Every row of a table
    EntireTable(String),
    /// Rows of a table whose key starts with a prefix
    RowPrefix {
        /// Table name
        table: String,
        /// Row key prefix
        prefix: Vec<u8>,
    },
}

impl LockWatchReference {
    /// Watch an entire table
    pub fn entire_table(table: impl Into<String>) -> Self {
        LockWatchReference::EntireTable(table.into())
    }

    /// Watch rows of a table sharing a prefix
    pub fn row_prefix(table: impl Into<String>, prefix: impl Into<Vec<u8>>) -> Self {
        LockWatchReference::RowPrefix {
            table: table.into(),
            prefix: prefix.into(),
        }
    }
}
