//! Key-only forest variant.
//!
//! [`ForestSet`] is the pure-key rendition of [`Forest`]: the same arena,
//! index maps, compaction, and cursors, with no payload. It wraps
//! `Forest<K, ()>` rather than duplicating the engine; the wrapper only
//! hides the value accessors and flattens the comparator to keys.

use std::cmp::Ordering;
use std::hash::Hash;

use taiga_core::{ForestError, NodeHandle, StructureVersion};

use crate::config::ForestConfig;
use crate::cursor::Cursor;
use crate::forest::Forest;
use crate::iter::{Children, PreOrder, Roots};

/// A forest of keyed nodes with no attached values.
pub struct ForestSet<K> {
    inner: Forest<K, ()>,
}

impl<K> Default for ForestSet<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> ForestSet<K> {
    /// Create an empty set with the default configuration.
    pub fn new() -> Self {
        Self {
            inner: Forest::new(),
        }
    }

    /// Create an empty set with the given configuration.
    pub fn with_config(config: ForestConfig) -> Self {
        Self {
            inner: Forest::with_config(config),
        }
    }

    /// The underlying value-less forest, for APIs that take a `Forest` —
    /// cursors in particular.
    pub fn as_forest(&self) -> &Forest<K, ()> {
        &self.inner
    }

    /// Mutable access to the underlying forest.
    pub fn as_forest_mut(&mut self) -> &mut Forest<K, ()> {
        &mut self.inner
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Whether the set holds no nodes.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Logical bound of the slot array.
    pub fn capacity(&self) -> usize {
        self.inner.capacity()
    }

    /// Current structural version.
    pub fn version(&self) -> StructureVersion {
        self.inner.version()
    }

    /// Whether a handle currently resolves.
    pub fn contains_handle(&self, handle: NodeHandle) -> bool {
        self.inner.contains_handle(handle)
    }

    /// Create a cursor positioned at `at`; drive it through
    /// [`as_forest`](Self::as_forest)/[`as_forest_mut`](Self::as_forest_mut).
    pub fn cursor(&self, at: NodeHandle) -> Result<Cursor, ForestError> {
        self.inner.cursor(at)
    }

    /// Iterate over every root as `(key, handle)`.
    pub fn roots(&self) -> Roots<'_, K, ()> {
        self.inner.roots()
    }
}

impl<K> ForestSet<K>
where
    K: Eq + Hash + Clone,
{
    /// Return the root with this key, creating it if absent.
    pub fn get_or_add_root(&mut self, key: K) -> NodeHandle {
        self.inner.get_or_add_root(key)
    }

    /// Return the child of `parent` with this key, creating it if absent.
    pub fn get_or_add_child(
        &mut self,
        parent: NodeHandle,
        key: K,
    ) -> Result<NodeHandle, ForestError> {
        self.inner.get_or_add_child(parent, key)
    }

    /// Handle of the root with this key, if present.
    pub fn try_get_root(&self, key: &K) -> Option<NodeHandle> {
        self.inner.try_get_root(key)
    }

    /// Handle of the child of `parent` with this key, if present.
    pub fn try_get_child(&self, parent: NodeHandle, key: &K) -> Option<NodeHandle> {
        self.inner.try_get_child(parent, key)
    }

    /// Whether a root with this key exists.
    pub fn contains_root(&self, key: &K) -> bool {
        self.inner.contains_root(key)
    }

    /// Whether `parent` has a child with this key.
    pub fn contains_child(&self, parent: NodeHandle, key: &K) -> bool {
        self.inner.contains_child(parent, key)
    }

    /// Remove the root with this key and its subtree.
    pub fn remove_root(&mut self, key: &K) -> bool {
        self.inner.remove_root(key)
    }

    /// Remove the node and its subtree; `false` for stale handles.
    pub fn remove_node(&mut self, handle: NodeHandle) -> bool {
        self.inner.remove_node(handle)
    }

    /// Dispose every child subtree of `parent`.
    pub fn clear_children(&mut self, parent: NodeHandle) -> Result<(), ForestError> {
        self.inner.clear_children(parent)
    }

    /// Remove every node.
    pub fn clear(&mut self) {
        self.inner.clear();
    }

    /// The node's key.
    pub fn key(&self, handle: NodeHandle) -> Result<&K, ForestError> {
        self.inner.key(handle)
    }

    /// Handle of the node's parent, `None` for roots.
    pub fn parent(&self, handle: NodeHandle) -> Result<Option<NodeHandle>, ForestError> {
        self.inner.parent(handle)
    }

    /// Number of direct children of `parent`.
    pub fn child_count(&self, parent: NodeHandle) -> Result<usize, ForestError> {
        self.inner.child_count(parent)
    }

    /// Distance from the node to its root.
    pub fn depth(&self, handle: NodeHandle) -> Result<usize, ForestError> {
        self.inner.depth(handle)
    }

    /// Iterate over the children of `parent` in sibling order.
    pub fn children(&self, parent: NodeHandle) -> Result<Children<'_, K, ()>, ForestError> {
        self.inner.children(parent)
    }

    /// Iterate over the subtree at `start` in pre-order.
    pub fn pre_order(&self, start: NodeHandle) -> Result<PreOrder<'_, K, ()>, ForestError> {
        self.inner.pre_order(start)
    }

    /// Stable-sort the children of `parent` by a key comparator.
    pub fn sort_children_by<F>(&mut self, parent: NodeHandle, mut cmp: F) -> Result<(), ForestError>
    where
        F: FnMut(&K, &K) -> Ordering,
    {
        self.inner.sort_children_by(parent, |l, r| cmp(l.0, r.0))
    }

    /// Sort the children of `parent` by key, ascending.
    pub fn sort_children_by_key(&mut self, parent: NodeHandle) -> Result<(), ForestError>
    where
        K: Ord,
    {
        self.inner.sort_children_by_key(parent)
    }

    /// An independent, freshly indexed copy of the subtree at `handle`.
    pub fn copy_subtree(
        &self,
        handle: NodeHandle,
        include_root: bool,
    ) -> Result<ForestSet<K>, ForestError> {
        Ok(ForestSet {
            inner: self.inner.copy_subtree(handle, include_root)?,
        })
    }

    /// Toggle the automatic post-removal occupancy check.
    pub fn set_auto_compact(&mut self, allow: bool) {
        self.inner.set_auto_compact(allow);
    }

    /// Compact now, regardless of occupancy.
    pub fn compact(&mut self) {
        self.inner.compact();
    }
}
