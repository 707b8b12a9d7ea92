//! Node handles and the structural version counter.
//!
//! A [`NodeHandle`] encodes the physical location of a node within a
//! forest's arena. It is generation-scoped: the `generation` field allows
//! O(1) staleness checks without a lookup table, so a slot that has been
//! reused or relocated by compaction never validates an old handle.

use std::fmt;

/// Location of a node within a forest's arena.
///
/// Handles are cheap to copy and compare, but they are only stable
/// between structural mutations of the forest that issued them: removing
/// the node, or a compaction pass that relocates it, invalidates the
/// handle. Resolving an invalidated handle fails cleanly — generations
/// are drawn from a per-forest monotonic counter and are never reissued,
/// so there is no ABA window.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[must_use]
pub struct NodeHandle {
    /// Slot index within the arena.
    index: u32,
    /// Arena generation when the node was placed in this slot.
    generation: u64,
}

impl NodeHandle {
    /// Assemble a handle from its parts.
    ///
    /// Forests construct handles internally; a handle assembled by hand
    /// simply fails resolution unless it matches a live slot exactly.
    pub fn new(index: u32, generation: u64) -> Self {
        Self { index, generation }
    }

    /// Slot index within the arena.
    pub fn index(&self) -> u32 {
        self.index
    }

    /// The generation this handle belongs to.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

impl fmt::Display for NodeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeHandle(slot={}, gen={})", self.index, self.generation)
    }
}

/// Monotonically increasing structural version of a forest.
///
/// Incremented on every operation that changes link fields, index-map
/// membership, or array shape: adding a node, removing a subtree,
/// reordering siblings, compacting. Pure value updates do not change it.
/// Cursors capture the version at creation and compare it before every
/// operation to detect external mutation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StructureVersion(pub u64);

impl StructureVersion {
    /// Advance to the next version.
    pub fn bump(&mut self) {
        self.0 += 1;
    }
}

impl fmt::Display for StructureVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for StructureVersion {
    fn from(v: u64) -> Self {
        Self(v)
    }
}
