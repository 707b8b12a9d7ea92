//! Forest-specific error types.
//!
//! Lookup-style APIs (`try_*`, `contains_*`) report absence through
//! `Option`/`bool` and never construct an error. [`ForestError`] covers
//! the hard failures: structurally invalid input to an operation that
//! requires an existing node, and cursors used after invalidation.

use std::error::Error;
use std::fmt;

use crate::handle::{NodeHandle, StructureVersion};

/// Errors that can occur during forest operations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ForestError {
    /// A handle that is out of range, tombstoned, or from a generation
    /// that has been reclaimed. Passing one to an operation that requires
    /// an existing node is a caller contract violation, not absence of
    /// data, so it fails loudly instead of being ignored.
    InvalidHandle {
        /// The offending handle.
        handle: NodeHandle,
    },
    /// A cursor was used after a structural mutation invalidated its
    /// captured version. The forest never operates on a stale position;
    /// the caller must re-resolve by key and create a fresh cursor.
    StaleCursor {
        /// The version the cursor captured.
        captured: StructureVersion,
        /// The forest's current version.
        current: StructureVersion,
    },
}

impl fmt::Display for ForestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidHandle { handle } => {
                write!(f, "invalid handle: {handle}")
            }
            Self::StaleCursor { captured, current } => {
                write!(
                    f,
                    "stale cursor: captured version {captured}, current version {current}"
                )
            }
        }
    }
}

impl Error for ForestError {}
