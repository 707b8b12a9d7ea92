//! In-place compaction of the slot array.
//!
//! Removal leaves tombstones behind; once live occupancy falls to the
//! configured fraction of the logical bound, a compaction pass relocates
//! every surviving record above the live count into a tombstone below it,
//! rewrites all cross-references (index maps, parent pointers, sibling
//! links, children's parent links and child-index keys), then truncates
//! the array and releases spare capacity.
//!
//! Handles to relocated nodes change. Callers re-resolve by key after any
//! mutation that can trigger a pass; cursors are version-gated instead,
//! and a cursor that itself triggered the pass is re-homed through the
//! watch hook.

use std::hash::Hash;

use taiga_core::NodeHandle;

use crate::forest::{ChildKey, Forest};

impl<K, V> Forest<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Toggle the automatic occupancy check that runs after removals.
    ///
    /// Switching it off lets a batch of removals skip repeated O(n)
    /// passes; switching it back on re-runs the check immediately, so a
    /// deferred compaction happens right here rather than on the next
    /// removal.
    pub fn set_auto_compact(&mut self, allow: bool) {
        let was = self.auto_compact;
        self.auto_compact = allow;
        if allow && !was {
            let _ = self.run_occupancy_check(None);
        }
    }

    /// Whether removals currently run the occupancy check.
    pub fn auto_compact(&self) -> bool {
        self.auto_compact
    }

    /// Compact now, regardless of occupancy.
    ///
    /// A no-op (version included) when there are no tombstones.
    pub fn compact(&mut self) {
        let _ = self.compact_watched(None);
    }

    /// Post-removal occupancy check. Returns `watch`'s current handle,
    /// relocated if a pass ran.
    pub(crate) fn run_occupancy_check(&mut self, watch: Option<u32>) -> Option<NodeHandle> {
        if self.auto_compact && self.should_compact() {
            self.compact_watched(watch)
        } else {
            watch.map(|w| self.arena.handle_at(w))
        }
    }

    fn should_compact(&self) -> bool {
        let capacity = self.arena.capacity();
        capacity > 0
            && self.arena.free_count() > 0
            && (self.arena.live() as f64)
                <= capacity as f64 * f64::from(self.config.compaction_ratio)
    }

    /// The pass itself: sweep from the top of the array down to the live
    /// bound, moving each survivor into a tombstone below the bound.
    fn compact_watched(&mut self, watch: Option<u32>) -> Option<NodeHandle> {
        let bound = self.arena.live() as u32;
        let capacity = self.arena.capacity() as u32;
        if capacity == bound {
            // No tombstones below the bound either, by the accounting
            // invariant, so there is nothing to move or truncate.
            return watch.map(|w| self.arena.handle_at(w));
        }
        let mut watch = watch;
        // Tombstones below the bound are exactly the destinations needed
        // for the survivors above it.
        let mut destinations = self.arena.drain_free_below(bound);
        for index in (bound..capacity).rev() {
            if self.arena.is_vacant(index) {
                continue;
            }
            let Some(dest) = destinations.pop() else {
                break;
            };
            self.relocate(index, dest);
            if watch == Some(index) {
                watch = Some(dest);
            }
        }
        self.arena.truncate(bound as usize);
        self.version.bump();
        watch.map(|w| self.arena.handle_at(w))
    }

    /// Move the record in slot `from` into the tombstoned slot `to` and
    /// rewrite every reference to `from`.
    ///
    /// Slots above the live bound that still await their own move keep
    /// dangling-free: a later [`relocate`](Self::relocate) of such a slot
    /// moves its record wholesale, and the rewrites here only touch the
    /// slots currently linked to `from`, wherever they sit.
    fn relocate(&mut self, from: u32, to: u32) {
        let record = self.arena.take(from);
        self.arena.place(to, record);

        // The moved node's own index entry.
        {
            let record = self.arena.record(to);
            match record.parent {
                Some(p) => {
                    if let Some(entry) = self.children.get_mut(&ChildKey(&record.key, p)) {
                        *entry = to;
                    }
                }
                None => {
                    if let Some(entry) = self.roots.get_mut(&record.key) {
                        *entry = to;
                    }
                }
            }
        }

        let (parent, prev, next, first_child) = {
            let record = self.arena.record(to);
            (record.parent, record.prev, record.next, record.first_child)
        };

        // The parent's child pointers, if they aimed at the old slot.
        if let Some(p) = parent {
            let record = self.arena.record_mut(p);
            if record.first_child == Some(from) {
                record.first_child = Some(to);
            }
            if record.last_child == Some(from) {
                record.last_child = Some(to);
            }
        }

        // Sibling links.
        if let Some(p) = prev {
            self.arena.record_mut(p).next = Some(to);
        }
        if let Some(n) = next {
            self.arena.record_mut(n).prev = Some(to);
        }

        // Children: parent link, and their child-index entries re-keyed
        // from the old parent slot to the new one.
        let mut child = first_child;
        while let Some(c) = child {
            let (key, next_child) = {
                let record = self.arena.record_mut(c);
                record.parent = Some(to);
                (record.key.clone(), record.next)
            };
            if let Some(slot) = self.children.swap_remove(&ChildKey(&key, from)) {
                self.children.insert((key, to), slot);
            }
            child = next_child;
        }
    }
}
