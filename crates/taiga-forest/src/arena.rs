//! Slot storage and the free-list allocator.
//!
//! [`NodeArena`] owns the dense slot array behind a forest. It hands out
//! slot indices, recycles tombstones (most recently freed first), issues
//! generations from a monotonic counter, and resolves public handles back
//! to indices. It knows nothing about links or index maps — relinking is
//! the forest layer's job, relocation is the compaction pass's.

use taiga_core::{ForestError, NodeHandle};

use crate::node::{NodeRecord, Slot};

/// Dense slot array with free-list recycling and generation tracking.
pub(crate) struct NodeArena<K, V> {
    /// All slots, live and tombstoned. The logical bound is `slots.len()`.
    slots: Vec<Slot<K, V>>,
    /// Tombstoned slot indices available for reuse, most recent last.
    free: Vec<u32>,
    /// Number of live records.
    live: usize,
    /// Next generation to issue. Never reissued, so stale handles can
    /// never collide with a record placed later (no ABA window).
    next_generation: u64,
}

impl<K, V> NodeArena<K, V> {
    /// Create an arena with `initial_capacity` slots pre-allocated.
    pub(crate) fn new(initial_capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(initial_capacity),
            free: Vec::new(),
            live: 0,
            next_generation: 0,
        }
    }

    /// Allocate a slot for a fresh detached record, recycling the most
    /// recently freed tombstone if one exists. Amortized O(1).
    pub(crate) fn alloc(&mut self, key: K, value: V) -> u32 {
        self.live += 1;
        let generation = self.issue_generation();
        let record = NodeRecord::detached(key, value);
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.generation = generation;
            slot.node = Some(record);
            index
        } else {
            let index = self.slots.len() as u32;
            self.slots.push(Slot {
                generation,
                node: Some(record),
            });
            index
        }
    }

    /// Tombstone a live slot.
    ///
    /// If the slot is the last one, the logical bound shrinks instead and
    /// no tombstone is left behind. Storage bookkeeping only; the caller
    /// has already unlinked and de-indexed the node.
    pub(crate) fn dispose(&mut self, index: u32) {
        self.live -= 1;
        if index as usize + 1 == self.slots.len() {
            self.slots.pop();
        } else {
            self.slots[index as usize].node = None;
            self.free.push(index);
        }
    }

    /// Resolve a public handle to a slot index.
    ///
    /// Fails with [`ForestError::InvalidHandle`] when the index is out of
    /// range, the slot is a tombstone, or the generation does not match.
    pub(crate) fn resolve(&self, handle: NodeHandle) -> Result<u32, ForestError> {
        match self.slots.get(handle.index() as usize) {
            Some(slot) if slot.node.is_some() && slot.generation == handle.generation() => {
                Ok(handle.index())
            }
            _ => Err(ForestError::InvalidHandle { handle }),
        }
    }

    /// The current handle for a live slot index.
    pub(crate) fn handle_at(&self, index: u32) -> NodeHandle {
        NodeHandle::new(index, self.slots[index as usize].generation)
    }

    /// Borrow the record in a live slot.
    pub(crate) fn record(&self, index: u32) -> &NodeRecord<K, V> {
        match self.slots[index as usize].node.as_ref() {
            Some(record) => record,
            None => unreachable!("slot {index} is vacant"),
        }
    }

    /// Mutably borrow the record in a live slot.
    pub(crate) fn record_mut(&mut self, index: u32) -> &mut NodeRecord<K, V> {
        match self.slots[index as usize].node.as_mut() {
            Some(record) => record,
            None => unreachable!("slot {index} is vacant"),
        }
    }

    /// Whether the slot at `index` is a tombstone.
    pub(crate) fn is_vacant(&self, index: u32) -> bool {
        self.slots[index as usize].node.is_none()
    }

    /// Take the record out of a slot without free-list bookkeeping.
    ///
    /// Compaction-only: the vacated slot is above the live bound and will
    /// be truncated at the end of the pass.
    pub(crate) fn take(&mut self, index: u32) -> NodeRecord<K, V> {
        match self.slots[index as usize].node.take() {
            Some(record) => record,
            None => unreachable!("slot {index} is vacant"),
        }
    }

    /// Place a record into a tombstoned slot under a fresh generation.
    ///
    /// Compaction-only counterpart of [`take`](Self::take); `live` is
    /// unchanged because the record merely moved.
    pub(crate) fn place(&mut self, index: u32, record: NodeRecord<K, V>) {
        let generation = self.issue_generation();
        let slot = &mut self.slots[index as usize];
        slot.generation = generation;
        slot.node = Some(record);
    }

    /// Drop every slot above the live bound and release spare capacity.
    pub(crate) fn truncate(&mut self, bound: usize) {
        self.slots.truncate(bound);
        self.slots.shrink_to_fit();
        self.free.clear();
    }

    /// Drain the free list, keeping only indices below `bound`.
    pub(crate) fn drain_free_below(&mut self, bound: u32) -> Vec<u32> {
        let drained: Vec<u32> = self.free.drain(..).filter(|&f| f < bound).collect();
        drained
    }

    /// Remove every record and reset all bookkeeping.
    pub(crate) fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
        self.live = 0;
    }

    /// Number of live records.
    pub(crate) fn live(&self) -> usize {
        self.live
    }

    /// Logical bound of the slot array (live + tombstoned).
    pub(crate) fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of tombstones on the free list.
    pub(crate) fn free_count(&self) -> usize {
        self.free.len()
    }

    fn issue_generation(&mut self) -> u64 {
        let generation = self.next_generation;
        self.next_generation += 1;
        generation
    }
}
