//! Versioned traversal cursors.
//!
//! A [`Cursor`] is a detached `(handle, captured version)` pair, not a
//! borrow: it is created against a forest and passed back to it for every
//! move or edit, so several cursors can exist side by side and observe
//! each other's mutations. Every method first compares the captured
//! version with the forest's current one; on mismatch it reports
//! [`ForestError::StaleCursor`] instead of touching stale positions.
//!
//! Mutating **through** a cursor re-captures the version, so that cursor
//! stays usable — and if a removal triggers compaction that relocates the
//! cursor's own node, the compaction watch hook re-homes it. Any other
//! cursor goes stale on its next use.

use std::hash::Hash;

use taiga_core::{ForestError, NodeHandle, StructureVersion};

use crate::forest::{ChildKey, Forest};

/// A lightweight traversal handle bound to one node and one structural
/// version of the forest that issued it.
#[derive(Clone, Copy, Debug)]
pub struct Cursor {
    node: NodeHandle,
    version: StructureVersion,
}

impl<K, V> Forest<K, V> {
    /// Create a cursor positioned at `at`.
    pub fn cursor(&self, at: NodeHandle) -> Result<Cursor, ForestError> {
        self.arena.resolve(at)?;
        Ok(Cursor {
            node: at,
            version: self.version(),
        })
    }
}

impl Cursor {
    /// The node the cursor is positioned at.
    ///
    /// The handle is only as fresh as the cursor: after an external
    /// structural mutation it may no longer resolve.
    pub fn node(&self) -> NodeHandle {
        self.node
    }

    /// Whether the forest has structurally changed since this cursor
    /// last captured its version.
    pub fn is_stale<K, V>(&self, forest: &Forest<K, V>) -> bool {
        self.version != forest.version()
    }

    /// Version gate shared by every operation: stale cursors fail before
    /// any link is read.
    fn check<K, V>(&self, forest: &Forest<K, V>) -> Result<u32, ForestError> {
        if self.version != forest.version() {
            return Err(ForestError::StaleCursor {
                captured: self.version,
                current: forest.version(),
            });
        }
        forest.arena.resolve(self.node)
    }

    // ── Movement ─────────────────────────────────────────────────────
    //
    // Each move returns Ok(false) and stays put when there is no such
    // neighbor.

    /// Move to the parent.
    pub fn move_to_parent<K, V>(&mut self, forest: &Forest<K, V>) -> Result<bool, ForestError> {
        let index = self.check(forest)?;
        Ok(self.reposition(forest, forest.arena.record(index).parent))
    }

    /// Move to the first child.
    pub fn move_to_first_child<K, V>(
        &mut self,
        forest: &Forest<K, V>,
    ) -> Result<bool, ForestError> {
        let index = self.check(forest)?;
        Ok(self.reposition(forest, forest.arena.record(index).first_child))
    }

    /// Move to the next sibling.
    pub fn move_to_next<K, V>(&mut self, forest: &Forest<K, V>) -> Result<bool, ForestError> {
        let index = self.check(forest)?;
        Ok(self.reposition(forest, forest.arena.record(index).next))
    }

    /// Move to the previous sibling.
    pub fn move_to_prev<K, V>(&mut self, forest: &Forest<K, V>) -> Result<bool, ForestError> {
        let index = self.check(forest)?;
        Ok(self.reposition(forest, forest.arena.record(index).prev))
    }

    /// Move to the child with this key, via the child index. O(1).
    pub fn move_to_child<K, V>(
        &mut self,
        forest: &Forest<K, V>,
        key: &K,
    ) -> Result<bool, ForestError>
    where
        K: Eq + Hash,
    {
        let index = self.check(forest)?;
        let target = forest.children.get(&ChildKey(key, index)).copied();
        Ok(self.reposition(forest, target))
    }

    /// Advance one step in pre-order: first child if present, else next
    /// sibling, else climb parents until one below `boundary` has a next
    /// sibling. Returns `Ok(false)` when the walk is exhausted.
    ///
    /// With `boundary` set to the subtree root this enumerates exactly
    /// that subtree, depth-first, without recursion or an explicit stack
    /// — the parent links are the walk-back path.
    pub fn move_pre_order<K, V>(
        &mut self,
        forest: &Forest<K, V>,
        boundary: Option<NodeHandle>,
    ) -> Result<bool, ForestError> {
        let index = self.check(forest)?;
        let bound = match boundary {
            Some(b) => Some(forest.arena.resolve(b)?),
            None => None,
        };
        if let Some(child) = forest.arena.record(index).first_child {
            return Ok(self.reposition(forest, Some(child)));
        }
        let mut current = index;
        loop {
            if Some(current) == bound {
                return Ok(false);
            }
            if let Some(next) = forest.arena.record(current).next {
                return Ok(self.reposition(forest, Some(next)));
            }
            match forest.arena.record(current).parent {
                Some(parent) => current = parent,
                None => return Ok(false),
            }
        }
    }

    fn reposition<K, V>(&mut self, forest: &Forest<K, V>, target: Option<u32>) -> bool {
        match target {
            Some(index) => {
                self.node = forest.arena.handle_at(index);
                true
            }
            None => false,
        }
    }

    // ── Localized edits ──────────────────────────────────────────────

    /// Get or add a child under the cursor's node.
    ///
    /// Re-captures the version, so this cursor stays valid; cursors
    /// created independently go stale.
    pub fn get_or_add_child<K, V>(
        &mut self,
        forest: &mut Forest<K, V>,
        key: K,
    ) -> Result<NodeHandle, ForestError>
    where
        K: Eq + Hash + Clone,
        V: Default,
    {
        self.check(forest)?;
        let handle = forest.get_or_add_child(self.node, key)?;
        self.version = forest.version();
        Ok(handle)
    }

    /// Remove the child with this key (and its subtree) from under the
    /// cursor's node. Returns `Ok(false)` if there is no such child.
    ///
    /// If the removal triggers compaction, the cursor's node may be
    /// relocated; the pass reports the new position and the cursor
    /// follows it.
    pub fn remove_child<K, V>(
        &mut self,
        forest: &mut Forest<K, V>,
        key: &K,
    ) -> Result<bool, ForestError>
    where
        K: Eq + Hash + Clone,
    {
        let index = self.check(forest)?;
        let Some(&child) = forest.children.get(&ChildKey(key, index)) else {
            return Ok(false);
        };
        if let Some(home) = forest.remove_index(child, Some(index)) {
            self.node = home;
        }
        self.version = forest.version();
        Ok(true)
    }

    /// Dispose every child subtree under the cursor's node.
    pub fn clear_children<K, V>(&mut self, forest: &mut Forest<K, V>) -> Result<(), ForestError>
    where
        K: Eq + Hash + Clone,
    {
        let index = self.check(forest)?;
        if let Some(home) = forest.clear_children_index(index, Some(index)) {
            self.node = home;
        }
        self.version = forest.version();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Forest;

    fn sample() -> (Forest<&'static str, i32>, NodeHandle) {
        let mut f = Forest::new();
        let a = f.get_or_add_root("A");
        let b = f.get_or_add_child(a, "B").unwrap();
        f.get_or_add_child(b, "B1").unwrap();
        f.get_or_add_child(b, "B2").unwrap();
        f.get_or_add_child(a, "C").unwrap();
        (f, a)
    }

    #[test]
    fn movement_walks_links() {
        let (f, a) = sample();
        let mut cur = f.cursor(a).unwrap();

        assert!(cur.move_to_first_child(&f).unwrap());
        assert_eq!(*f.key(cur.node()).unwrap(), "B");
        assert!(cur.move_to_next(&f).unwrap());
        assert_eq!(*f.key(cur.node()).unwrap(), "C");
        assert!(!cur.move_to_next(&f).unwrap());
        assert_eq!(*f.key(cur.node()).unwrap(), "C", "failed move stays put");
        assert!(cur.move_to_prev(&f).unwrap());
        assert!(cur.move_to_parent(&f).unwrap());
        assert_eq!(cur.node(), a);
        assert!(!cur.move_to_parent(&f).unwrap());
    }

    #[test]
    fn move_to_named_child() {
        let (f, a) = sample();
        let mut cur = f.cursor(a).unwrap();
        assert!(cur.move_to_child(&f, &"C").unwrap());
        assert_eq!(*f.key(cur.node()).unwrap(), "C");
        assert!(!cur.move_to_child(&f, &"missing").unwrap());
    }

    #[test]
    fn pre_order_visits_subtree_once_in_order() {
        let (f, a) = sample();
        let mut cur = f.cursor(a).unwrap();
        let mut visited = vec![*f.key(cur.node()).unwrap()];
        while cur.move_pre_order(&f, Some(a)).unwrap() {
            visited.push(*f.key(cur.node()).unwrap());
        }
        assert_eq!(visited, ["A", "B", "B1", "B2", "C"]);
    }

    #[test]
    fn pre_order_boundary_confines_the_walk() {
        let (f, a) = sample();
        let b = f.try_get_child(a, &"B").unwrap();
        let mut cur = f.cursor(b).unwrap();
        let mut visited = vec![*f.key(cur.node()).unwrap()];
        while cur.move_pre_order(&f, Some(b)).unwrap() {
            visited.push(*f.key(cur.node()).unwrap());
        }
        // Never escapes into "C".
        assert_eq!(visited, ["B", "B1", "B2"]);
    }

    #[test]
    fn direct_mutation_invalidates_cursor() {
        let (mut f, a) = sample();
        let mut cur = f.cursor(a).unwrap();
        f.get_or_add_child(a, "D").unwrap();
        assert!(cur.is_stale(&f));
        let err = cur.move_to_first_child(&f).unwrap_err();
        assert!(matches!(err, ForestError::StaleCursor { .. }));
    }

    #[test]
    fn value_update_does_not_invalidate_cursor() {
        let (mut f, a) = sample();
        let mut cur = f.cursor(a).unwrap();
        f.set_value(a, 7).unwrap();
        assert!(!cur.is_stale(&f));
        assert!(cur.move_to_first_child(&f).unwrap());
    }

    #[test]
    fn mutation_through_one_cursor_invalidates_the_other() {
        let (mut f, a) = sample();
        let mut editing = f.cursor(a).unwrap();
        let mut bystander = f.cursor(a).unwrap();

        editing.get_or_add_child(&mut f, "D").unwrap();
        // The editing cursor re-captured the version and keeps working.
        assert!(editing.move_to_child(&f, &"D").unwrap());
        // The bystander did not.
        assert!(bystander.is_stale(&f));
        assert!(bystander.move_to_first_child(&f).is_err());
    }

    #[test]
    fn remove_child_keeps_cursor_valid() {
        let (mut f, a) = sample();
        let mut cur = f.cursor(a).unwrap();
        assert!(cur.remove_child(&mut f, &"B").unwrap());
        assert!(!cur.remove_child(&mut f, &"B").unwrap());
        assert!(!cur.is_stale(&f));
        assert_eq!(f.child_count(cur.node()).unwrap(), 1);
    }

    #[test]
    fn cursor_survives_compaction_it_triggered() {
        let mut f = Forest::<String, ()>::new();
        let root = f.get_or_add_root("root".to_string());
        // 20 fillers, then the keeper, then 20 grandchildren: the keeper
        // lands in slot 21. Removing the fillers leaves 42 slots with 22
        // live — just above the 0.5 trigger.
        for i in 0..20u32 {
            f.get_or_add_child(root, format!("f{i}")).unwrap();
        }
        let keeper = f.get_or_add_child(root, "keeper".to_string()).unwrap();
        for i in 0..20u32 {
            f.get_or_add_child(keeper, format!("g{i}")).unwrap();
        }
        for i in 0..20u32 {
            let filler = f.try_get_child(root, &format!("f{i}")).unwrap();
            assert!(f.remove_node(filler));
        }
        assert_eq!(f.capacity(), 42, "no pass should have run yet");

        // One more removal, through the cursor, crosses the threshold.
        // The pass relocates the keeper below the new bound; the watch
        // hook re-homes the cursor.
        let mut cur = f.cursor(keeper).unwrap();
        let before = cur.node();
        assert!(cur.remove_child(&mut f, &"g0".to_string()).unwrap());
        assert_eq!(f.capacity(), 21);
        assert!(!cur.is_stale(&f));
        assert_ne!(cur.node(), before, "keeper was relocated");
        assert_eq!(*f.key(cur.node()).unwrap(), "keeper");
        // And the cursor remains fully usable.
        assert!(cur.move_to_first_child(&f).unwrap());
        assert!(cur.move_to_parent(&f).unwrap());
        assert_eq!(f.child_count(cur.node()).unwrap(), 19);
    }

    #[test]
    fn cursor_on_removed_node_fails_resolution() {
        let (mut f, a) = sample();
        let b = f.try_get_child(a, &"B").unwrap();
        let cur = f.cursor(b).unwrap();
        // Removal through a *different* path: version mismatch wins.
        f.remove_node(b);
        let mut cur = cur;
        assert!(matches!(
            cur.move_to_parent(&f),
            Err(ForestError::StaleCursor { .. })
        ));
    }

    #[test]
    fn cursor_at_stale_handle_is_rejected_at_creation() {
        let (mut f, a) = sample();
        f.remove_node(a);
        assert!(matches!(
            f.cursor(a),
            Err(ForestError::InvalidHandle { .. })
        ));
    }
}
