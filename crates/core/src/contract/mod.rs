//! Contract types shared by every lock-watch component
//!
//! These types define how components and the transport talk about
//! positions in the event log.
//!
//! ## Module Structure
//!
//! - `position`: Epoch identifiers and versioned log positions
//!
//! ## Usage
//!
//! ```
//! use lockwatch_core::contract::{EpochId, VersionedPosition};
//!
//! let epoch = EpochId::new();
//! let position = VersionedPosition::new(epoch, 7);
//! assert!(position.saturating_back(2) < position);
//! ```

pub mod position;

// Re-exports
pub use position::{EpochId, VersionedPosition};
