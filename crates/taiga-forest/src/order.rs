//! Sibling-list reordering.
//!
//! Insertion order is not always the order a caller wants to display or
//! process children in. [`Forest::sort_children_by`] reorders one sibling
//! list by relinking only — records never move in the arena, handles stay
//! valid, and the sort is stable so equal children keep their relative
//! order.

use std::cmp::Ordering;
use std::hash::Hash;

use smallvec::SmallVec;
use taiga_core::{ForestError, NodeHandle};

use crate::forest::Forest;

impl<K, V> Forest<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Stable-sort the children of `parent` by a comparator over
    /// `(key, value)` pairs.
    ///
    /// Structural: bumps the version (when there is anything to
    /// reorder), so outstanding cursors go stale.
    pub fn sort_children_by<F>(&mut self, parent: NodeHandle, mut cmp: F) -> Result<(), ForestError>
    where
        F: FnMut((&K, &V), (&K, &V)) -> Ordering,
    {
        let parent_index = self.arena.resolve(parent)?;

        let mut order: SmallVec<[u32; 16]> = SmallVec::new();
        let mut child = self.arena.record(parent_index).first_child;
        while let Some(c) = child {
            order.push(c);
            child = self.arena.record(c).next;
        }
        if order.len() < 2 {
            return Ok(());
        }

        order.sort_by(|&a, &b| {
            let ra = self.arena.record(a);
            let rb = self.arena.record(b);
            cmp((&ra.key, &ra.value), (&rb.key, &rb.value))
        });

        // Relink the whole list in one pass.
        {
            let record = self.arena.record_mut(parent_index);
            record.first_child = Some(order[0]);
            record.last_child = Some(order[order.len() - 1]);
        }
        for (position, &index) in order.iter().enumerate() {
            let record = self.arena.record_mut(index);
            record.prev = if position > 0 {
                Some(order[position - 1])
            } else {
                None
            };
            record.next = order.get(position + 1).copied();
        }
        self.version.bump();
        Ok(())
    }

    /// Sort the children of `parent` by key, ascending.
    pub fn sort_children_by_key(&mut self, parent: NodeHandle) -> Result<(), ForestError>
    where
        K: Ord,
    {
        self.sort_children_by(parent, |a, b| a.0.cmp(b.0))
    }
}

#[cfg(test)]
mod tests {
    use crate::Forest;

    #[test]
    fn scenario_d_sort_five_unordered_children() {
        let mut f = Forest::<&str, ()>::new();
        let a = f.get_or_add_root("A");
        for key in ["e", "b", "d", "a", "c"] {
            f.get_or_add_child(a, key).unwrap();
        }
        f.sort_children_by_key(a).unwrap();

        let keys: Vec<_> = f
            .pre_order(a)
            .unwrap()
            .map(|h| *f.key(h).unwrap())
            .collect();
        assert_eq!(keys, ["A", "a", "b", "c", "d", "e"]);
    }

    #[test]
    fn sort_is_stable_for_equal_ranks() {
        let mut f = Forest::<&str, u32>::new();
        let a = f.get_or_add_root("A");
        for (key, rank) in [("x", 1), ("y", 0), ("z", 1), ("w", 0)] {
            let h = f.get_or_add_child(a, key).unwrap();
            f.set_value(h, rank).unwrap();
        }
        // Sort by value only; x/z and y/w tie and must keep their order.
        f.sort_children_by(a, |l, r| l.1.cmp(r.1)).unwrap();
        let keys: Vec<_> = f
            .children(a)
            .unwrap()
            .map(|h| *f.key(h).unwrap())
            .collect();
        assert_eq!(keys, ["y", "w", "x", "z"]);
    }

    #[test]
    fn sort_relinks_prev_pointers_too() {
        let mut f = Forest::<u32, ()>::new();
        let a = f.get_or_add_root(0);
        for key in [3u32, 1, 2] {
            f.get_or_add_child(a, key).unwrap();
        }
        f.sort_children_by_key(a).unwrap();

        let three = f.try_get_child(a, &3).unwrap();
        let two = f.try_get_child(a, &2).unwrap();
        assert_eq!(f.next_sibling(three).unwrap(), None);
        assert_eq!(f.prev_sibling(three).unwrap(), Some(two));
        // Appending after a sort lands past the new tail.
        f.get_or_add_child(a, 9).unwrap();
        let nine = f.try_get_child(a, &9).unwrap();
        assert_eq!(f.prev_sibling(nine).unwrap(), Some(three));
    }

    #[test]
    fn sort_bumps_version_and_keeps_handles() {
        let mut f = Forest::<u32, ()>::new();
        let a = f.get_or_add_root(0);
        let h2 = f.get_or_add_child(a, 2).unwrap();
        f.get_or_add_child(a, 1).unwrap();
        let version = f.version();
        f.sort_children_by_key(a).unwrap();
        assert!(f.version() > version);
        // Relink only: the handle still resolves.
        assert_eq!(*f.key(h2).unwrap(), 2);
    }

    #[test]
    fn sorting_one_child_is_a_no_op() {
        let mut f = Forest::<u32, ()>::new();
        let a = f.get_or_add_root(0);
        f.get_or_add_child(a, 1).unwrap();
        let version = f.version();
        f.sort_children_by_key(a).unwrap();
        assert_eq!(f.version(), version);
    }
}
