//! Core types for the Taiga forest store.
//!
//! This is the leaf crate with zero dependencies. It defines the
//! fundamental abstractions shared across the Taiga workspace: node
//! handles, the structural version counter, and error types.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod handle;

pub use error::ForestError;
pub use handle::{NodeHandle, StructureVersion};
