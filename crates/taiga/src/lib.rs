//! Taiga: arena-backed hierarchical forest storage with keyed lookup.
//!
//! This is the top-level facade crate that re-exports the public API from
//! the Taiga sub-crates. For most users, adding `taiga` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use taiga::prelude::*;
//!
//! let mut forest: Forest<&str, u32> = Forest::new();
//!
//! // Roots and children are created (or found) by key.
//! let scene = forest.get_or_add_root("scene");
//! let player = forest.get_or_add_child(scene, "player").unwrap();
//! forest.set_value(player, 100).unwrap();
//!
//! // Named lookup is O(1) at every level.
//! assert_eq!(forest.try_get_child(scene, &"player"), Some(player));
//!
//! // Cursors navigate without borrowing the forest.
//! let mut cur = forest.cursor(scene).unwrap();
//! assert!(cur.move_to_child(&forest, &"player").unwrap());
//! assert_eq!(*forest.value(cur.node()).unwrap(), 100);
//!
//! // Removing a subtree invalidates its handles; keys stay authoritative.
//! forest.remove_node(player);
//! assert!(!forest.contains_handle(player));
//! assert!(forest.try_get_child(scene, &"player").is_none());
//! ```
//!
//! # Crate layout
//!
//! | Module | Crate | Contents |
//! |--------|-------|----------|
//! | [`types`] | `taiga-core` | Handles, structure versions, error types |
//! | [`forest`] | `taiga-forest` | The forest store, cursors, iterators, compaction |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Handles, versions, and errors (`taiga-core`).
///
/// [`types::NodeHandle`] and [`types::StructureVersion`] are also
/// available in the [`prelude`].
pub use taiga_core as types;

/// Forest storage, cursors, and iterators (`taiga-forest`).
///
/// The main entry points are [`forest::Forest`] and [`forest::ForestSet`].
pub use taiga_forest as forest;

/// Common imports for typical Taiga usage.
///
/// ```rust
/// use taiga::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use taiga_core::{ForestError, NodeHandle, StructureVersion};

    // Forest API
    pub use taiga_forest::{Cursor, Forest, ForestConfig, ForestSet};

    // Iterators
    pub use taiga_forest::{Children, PreOrder, Roots};
}
