//! Arena-backed, key-indexed forest storage for Taiga.
//!
//! A [`Forest`] holds any number of independent trees in one contiguous
//! slot array, with hash indexes over root keys and `(parent, key)` pairs
//! so that every named lookup is O(1) regardless of fan-out.
//!
//! # Architecture
//!
//! ```text
//! Forest<K, V>
//! ├── NodeArena            slot array + free list + generation counter
//! │   └── Slot → NodeRecord (key, value, parent/child/sibling links)
//! ├── roots:    IndexMap<K, u32>          root key → slot
//! ├── children: IndexMap<(K, u32), u32>   (key, parent slot) → slot
//! └── StructureVersion     bumped on every structural change
//! ```
//!
//! Removal tombstones slots; once live occupancy falls to the configured
//! fraction of the array, an in-place compaction pass ([`compact`]) packs
//! survivors down and truncates. Handles are generation-checked, so a
//! handle to a removed or relocated node fails closed instead of aliasing
//! whatever took its slot.
//!
//! Detached [`Cursor`]s navigate without borrowing the forest; they carry
//! the version they were minted under and refuse to act after any
//! structural change they did not make themselves.
//!
//! [`compact`]: Forest::compact

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

mod arena;
mod compact;
pub mod config;
pub mod cursor;
pub mod forest;
pub mod iter;
mod node;
mod order;
pub mod set;

// Public re-exports for the primary API surface.
pub use config::ForestConfig;
pub use cursor::Cursor;
pub use forest::Forest;
pub use iter::{Children, PreOrder, Roots};
pub use set::ForestSet;
pub use taiga_core::{ForestError, NodeHandle, StructureVersion};
