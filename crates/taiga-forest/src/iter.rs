//! Borrowing iterators over forest structure.
//!
//! These iterators hold `&Forest`, so the borrow checker rules out
//! structural mutation for their whole lifetime — no version gate needed,
//! unlike [`Cursor`](crate::Cursor). All of them yield handles; combine
//! with [`Forest::key`]/[`Forest::value`] for the payloads.

use std::hash::Hash;

use taiga_core::{ForestError, NodeHandle};

use crate::forest::Forest;

/// Iterator over the forest's roots, in index-map order.
pub struct Roots<'a, K, V> {
    forest: &'a Forest<K, V>,
    inner: indexmap::map::Iter<'a, K, u32>,
}

impl<'a, K, V> Iterator for Roots<'a, K, V> {
    type Item = (&'a K, NodeHandle);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner
            .next()
            .map(|(key, &index)| (key, self.forest.arena.handle_at(index)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

/// Iterator over one node's children, in sibling order.
pub struct Children<'a, K, V> {
    forest: &'a Forest<K, V>,
    current: Option<u32>,
}

impl<K, V> Iterator for Children<'_, K, V> {
    type Item = NodeHandle;

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.current?;
        self.current = self.forest.arena.record(index).next;
        Some(self.forest.arena.handle_at(index))
    }
}

/// Depth-first iterator over a subtree, parent before children, earlier
/// sibling before later.
///
/// Walks child/next links and climbs back up through parent links,
/// bounded at the start node — no recursion, no allocated stack.
pub struct PreOrder<'a, K, V> {
    forest: &'a Forest<K, V>,
    start: u32,
    next: Option<u32>,
}

impl<K, V> Iterator for PreOrder<'_, K, V> {
    type Item = NodeHandle;

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.next?;
        self.next = self.advance(index);
        Some(self.forest.arena.handle_at(index))
    }
}

impl<K, V> PreOrder<'_, K, V> {
    fn advance(&self, index: u32) -> Option<u32> {
        if let Some(child) = self.forest.arena.record(index).first_child {
            return Some(child);
        }
        let mut current = index;
        loop {
            if current == self.start {
                return None;
            }
            if let Some(next) = self.forest.arena.record(current).next {
                return Some(next);
            }
            current = self.forest.arena.record(current).parent?;
        }
    }
}

impl<K, V> Forest<K, V> {
    /// Iterate over every root as `(key, handle)`.
    ///
    /// Order is the root index's internal order, which is insertion
    /// order until a root is removed.
    pub fn roots(&self) -> Roots<'_, K, V> {
        Roots {
            forest: self,
            inner: self.roots.iter(),
        }
    }
}

impl<K, V> Forest<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Iterate over the children of `parent` in sibling order.
    pub fn children(&self, parent: NodeHandle) -> Result<Children<'_, K, V>, ForestError> {
        let index = self.arena.resolve(parent)?;
        Ok(Children {
            forest: self,
            current: self.arena.record(index).first_child,
        })
    }

    /// Iterate over the subtree at `start` in pre-order, `start` included.
    pub fn pre_order(&self, start: NodeHandle) -> Result<PreOrder<'_, K, V>, ForestError> {
        let index = self.arena.resolve(start)?;
        Ok(PreOrder {
            forest: self,
            start: index,
            next: Some(index),
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::Forest;

    fn sample() -> (Forest<&'static str, ()>, taiga_core::NodeHandle) {
        let mut f = Forest::new();
        let a = f.get_or_add_root("A");
        let b = f.get_or_add_child(a, "B").unwrap();
        f.get_or_add_child(b, "B1").unwrap();
        let b2 = f.get_or_add_child(b, "B2").unwrap();
        f.get_or_add_child(b2, "B2a").unwrap();
        f.get_or_add_child(a, "C").unwrap();
        (f, a)
    }

    #[test]
    fn roots_lists_every_tree() {
        let mut f = Forest::<&str, ()>::new();
        f.get_or_add_root("x");
        f.get_or_add_root("y");
        let mut keys: Vec<_> = f.roots().map(|(k, _)| *k).collect();
        keys.sort_unstable();
        assert_eq!(keys, ["x", "y"]);
    }

    #[test]
    fn children_in_sibling_order() {
        let (f, a) = sample();
        let keys: Vec<_> = f
            .children(a)
            .unwrap()
            .map(|h| *f.key(h).unwrap())
            .collect();
        assert_eq!(keys, ["B", "C"]);
    }

    #[test]
    fn pre_order_full_subtree() {
        let (f, a) = sample();
        let keys: Vec<_> = f
            .pre_order(a)
            .unwrap()
            .map(|h| *f.key(h).unwrap())
            .collect();
        assert_eq!(keys, ["A", "B", "B1", "B2", "B2a", "C"]);
    }

    #[test]
    fn pre_order_of_inner_subtree_stays_inside() {
        let (f, a) = sample();
        let b = f.try_get_child(a, &"B").unwrap();
        let keys: Vec<_> = f
            .pre_order(b)
            .unwrap()
            .map(|h| *f.key(h).unwrap())
            .collect();
        assert_eq!(keys, ["B", "B1", "B2", "B2a"]);
    }

    #[test]
    fn pre_order_of_leaf_is_just_the_leaf() {
        let (f, a) = sample();
        let c = f.try_get_child(a, &"C").unwrap();
        let keys: Vec<_> = f
            .pre_order(c)
            .unwrap()
            .map(|h| *f.key(h).unwrap())
            .collect();
        assert_eq!(keys, ["C"]);
    }

    #[test]
    fn pre_order_visits_each_node_exactly_once() {
        let (f, a) = sample();
        let handles: Vec<_> = f.pre_order(a).unwrap().collect();
        assert_eq!(handles.len(), f.len());
        let mut dedup = handles.clone();
        dedup.sort_by_key(|h| h.index());
        dedup.dedup();
        assert_eq!(dedup.len(), handles.len());
    }
}
