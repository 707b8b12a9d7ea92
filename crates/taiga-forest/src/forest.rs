//! The forest container: index maps and graph mutation.
//!
//! [`Forest`] ties the arena to two auxiliary maps — root key → slot and
//! `(child key, parent slot)` → slot — kept in lock-step with the slot
//! array: a slot index appears in exactly one map iff its node is alive.
//! All structural edits (get-or-add, unlink, subtree disposal) live here;
//! storage bookkeeping stays in [`NodeArena`] and relocation in the
//! compaction pass.

use std::hash::{Hash, Hasher};

use indexmap::{Equivalent, IndexMap};
use smallvec::{smallvec, SmallVec};
use taiga_core::{ForestError, NodeHandle, StructureVersion};

use crate::arena::NodeArena;
use crate::config::ForestConfig;

/// Borrowed lookup key for the child index.
///
/// Hashes exactly like the owned `(K, u32)` map key (field by field), so
/// child lookups never clone the key.
pub(crate) struct ChildKey<'a, K>(pub(crate) &'a K, pub(crate) u32);

impl<K: Hash> Hash for ChildKey<'_, K> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash(state);
        self.1.hash(state);
    }
}

impl<K: Hash + Eq> Equivalent<(K, u32)> for ChildKey<'_, K> {
    fn equivalent(&self, key: &(K, u32)) -> bool {
        self.1 == key.1 && *self.0 == key.0
    }
}

/// A forest of trees sharing one arena.
///
/// Every node is addressed by a generational [`NodeHandle`]; top-level
/// entries (roots) and `(key, parent)` pairs resolve in O(1) through the
/// index maps. Children form an insertion-ordered doubly linked sibling
/// list with a tracked tail, so appending is O(1). Removing a node
/// disposes its entire subtree in time proportional to the subtree, and
/// may trigger an in-place compaction that relocates surviving records
/// toward low indices (see [`compact`](Forest::compact)).
///
/// Single-owner, single-threaded: the container is not internally
/// synchronized, and no operation spans more than one synchronous step.
pub struct Forest<K, V> {
    pub(crate) arena: NodeArena<K, V>,
    /// Root key → slot index, one entry per live root.
    pub(crate) roots: IndexMap<K, u32>,
    /// `(child key, parent slot)` → slot index, one entry per live non-root.
    pub(crate) children: IndexMap<(K, u32), u32>,
    pub(crate) version: StructureVersion,
    pub(crate) config: ForestConfig,
    /// Runtime switch over the occupancy check; seeded from the config.
    pub(crate) auto_compact: bool,
}

impl<K, V> Forest<K, V> {
    /// Create an empty forest with the default configuration.
    pub fn new() -> Self {
        Self::with_config(ForestConfig::new())
    }

    /// Create an empty forest with the given configuration.
    pub fn with_config(config: ForestConfig) -> Self {
        Self {
            arena: NodeArena::new(config.initial_capacity),
            roots: IndexMap::new(),
            children: IndexMap::new(),
            version: StructureVersion::default(),
            auto_compact: config.auto_compact,
            config,
        }
    }

    /// Number of live nodes across all trees.
    pub fn len(&self) -> usize {
        self.arena.live()
    }

    /// Whether the forest holds no nodes.
    pub fn is_empty(&self) -> bool {
        self.arena.live() == 0
    }

    /// Logical bound of the slot array (live nodes plus tombstones).
    pub fn capacity(&self) -> usize {
        self.arena.capacity()
    }

    /// Number of tombstoned slots awaiting reuse or compaction.
    pub fn free_slots(&self) -> usize {
        self.arena.free_count()
    }

    /// Current structural version.
    pub fn version(&self) -> StructureVersion {
        self.version
    }

    /// The configuration this forest was built with.
    pub fn config(&self) -> &ForestConfig {
        &self.config
    }

    /// Whether a handle currently resolves to a live node.
    pub fn contains_handle(&self, handle: NodeHandle) -> bool {
        self.arena.resolve(handle).is_ok()
    }
}

impl<K, V> Default for Forest<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> Forest<K, V>
where
    K: Eq + Hash + Clone,
{
    // ── Get-or-add ───────────────────────────────────────────────────

    /// Return the root with this key, creating it with a default value
    /// if absent. O(1) expected.
    pub fn get_or_add_root(&mut self, key: K) -> NodeHandle
    where
        V: Default,
    {
        self.get_or_add_root_with(key, V::default)
    }

    /// Return the root with this key, creating it with `init()` if absent.
    pub fn get_or_add_root_with(&mut self, key: K, init: impl FnOnce() -> V) -> NodeHandle {
        if let Some(&index) = self.roots.get(&key) {
            return self.arena.handle_at(index);
        }
        let index = self.arena.alloc(key.clone(), init());
        self.roots.insert(key, index);
        self.version.bump();
        self.arena.handle_at(index)
    }

    /// Return the child of `parent` with this key, creating it with a
    /// default value if absent.
    ///
    /// Fails with [`ForestError::InvalidHandle`] if `parent` does not
    /// resolve — a disposed parent is a caller error, not absence.
    pub fn get_or_add_child(&mut self, parent: NodeHandle, key: K) -> Result<NodeHandle, ForestError>
    where
        V: Default,
    {
        self.get_or_add_child_with(parent, key, V::default)
    }

    /// Return the child of `parent` with this key, creating it with
    /// `init()` if absent.
    pub fn get_or_add_child_with(
        &mut self,
        parent: NodeHandle,
        key: K,
        init: impl FnOnce() -> V,
    ) -> Result<NodeHandle, ForestError> {
        let parent_index = self.arena.resolve(parent)?;
        if let Some(&index) = self.children.get(&ChildKey(&key, parent_index)) {
            return Ok(self.arena.handle_at(index));
        }
        let index = self.arena.alloc(key.clone(), init());
        self.append_child(parent_index, index);
        self.children.insert((key, parent_index), index);
        self.version.bump();
        Ok(self.arena.handle_at(index))
    }

    /// Append a freshly allocated node at the tail of a child list.
    ///
    /// O(1) via the parent's `last_child` link — never a tail walk.
    fn append_child(&mut self, parent: u32, child: u32) {
        self.arena.record_mut(child).parent = Some(parent);
        match self.arena.record(parent).last_child {
            Some(tail) => {
                self.arena.record_mut(tail).next = Some(child);
                self.arena.record_mut(child).prev = Some(tail);
                self.arena.record_mut(parent).last_child = Some(child);
            }
            None => {
                let record = self.arena.record_mut(parent);
                record.first_child = Some(child);
                record.last_child = Some(child);
            }
        }
    }

    // ── Lookup ───────────────────────────────────────────────────────

    /// Handle of the root with this key, if present.
    pub fn try_get_root(&self, key: &K) -> Option<NodeHandle> {
        self.roots.get(key).map(|&index| self.arena.handle_at(index))
    }

    /// Handle of the child of `parent` with this key, if present.
    ///
    /// A stale or disposed `parent` yields `None` — lookups report
    /// absence rather than fail.
    pub fn try_get_child(&self, parent: NodeHandle, key: &K) -> Option<NodeHandle> {
        let parent_index = self.arena.resolve(parent).ok()?;
        self.children
            .get(&ChildKey(key, parent_index))
            .map(|&index| self.arena.handle_at(index))
    }

    /// Whether a root with this key exists.
    pub fn contains_root(&self, key: &K) -> bool {
        self.roots.contains_key(key)
    }

    /// Whether `parent` has a child with this key.
    pub fn contains_child(&self, parent: NodeHandle, key: &K) -> bool {
        self.try_get_child(parent, key).is_some()
    }

    // ── Removal ──────────────────────────────────────────────────────

    /// Remove the root with this key and its entire subtree.
    ///
    /// Returns `false` if no such root exists.
    pub fn remove_root(&mut self, key: &K) -> bool {
        match self.roots.get(key) {
            Some(&index) => {
                let handle = self.arena.handle_at(index);
                self.remove_node(handle)
            }
            None => false,
        }
    }

    /// Remove the node and its entire subtree.
    ///
    /// Cost is proportional to the subtree size, not the forest. A stale
    /// or absent handle is a no-op returning `false`, not an error.
    /// Afterwards the occupancy check may trigger a compaction pass.
    pub fn remove_node(&mut self, handle: NodeHandle) -> bool {
        let Ok(index) = self.arena.resolve(handle) else {
            return false;
        };
        let _ = self.remove_index(index, None);
        true
    }

    /// Removal on a resolved index, relocating `watch` through any
    /// triggered compaction. Shared by the direct API and cursors.
    pub(crate) fn remove_index(&mut self, index: u32, watch: Option<u32>) -> Option<NodeHandle> {
        self.unlink(index);
        self.dispose_subtree(index);
        self.version.bump();
        self.run_occupancy_check(watch)
    }

    /// Dispose every child subtree of `parent`, keeping `parent` alive.
    pub fn clear_children(&mut self, parent: NodeHandle) -> Result<(), ForestError> {
        let index = self.arena.resolve(parent)?;
        let _ = self.clear_children_index(index, None);
        Ok(())
    }

    /// [`clear_children`](Self::clear_children) on a resolved index with
    /// a compaction watch, shared with cursors.
    pub(crate) fn clear_children_index(
        &mut self,
        index: u32,
        watch: Option<u32>,
    ) -> Option<NodeHandle> {
        let mut child = self.arena.record(index).first_child;
        if child.is_none() {
            return watch.map(|w| self.arena.handle_at(w));
        }
        {
            let record = self.arena.record_mut(index);
            record.first_child = None;
            record.last_child = None;
        }
        while let Some(c) = child {
            let next = self.arena.record(c).next;
            self.dispose_subtree(c);
            child = next;
        }
        self.version.bump();
        self.run_occupancy_check(watch)
    }

    /// Reconnect the sibling list and parent pointers around `index`.
    ///
    /// The node's own links are left in place: subtree disposal still
    /// needs `parent` to pick the right index map.
    fn unlink(&mut self, index: u32) {
        let (parent, prev, next) = {
            let record = self.arena.record(index);
            (record.parent, record.prev, record.next)
        };
        match prev {
            Some(p) => self.arena.record_mut(p).next = next,
            None => {
                if let Some(par) = parent {
                    self.arena.record_mut(par).first_child = next;
                }
            }
        }
        match next {
            Some(n) => self.arena.record_mut(n).prev = prev,
            None => {
                if let Some(par) = parent {
                    self.arena.record_mut(par).last_child = prev;
                }
            }
        }
    }

    /// Dispose `start` and every descendant with an explicit work-list.
    ///
    /// Walks child chains only — sibling links of `start` itself were
    /// already reconnected by [`unlink`](Self::unlink) or belong to nodes
    /// being disposed anyway. No recursion, so deep trees cannot blow
    /// the stack.
    fn dispose_subtree(&mut self, start: u32) {
        let mut stack: SmallVec<[u32; 16]> = smallvec![start];
        while let Some(index) = stack.pop() {
            let mut child = self.arena.record(index).first_child;
            while let Some(c) = child {
                stack.push(c);
                child = self.arena.record(c).next;
            }
            let record = self.arena.record(index);
            match record.parent {
                Some(p) => {
                    self.children.swap_remove(&ChildKey(&record.key, p));
                }
                None => {
                    self.roots.swap_remove(&record.key);
                }
            }
            self.arena.dispose(index);
        }
    }

    /// Remove every node, keeping the configuration.
    pub fn clear(&mut self) {
        if self.arena.live() == 0 && self.arena.capacity() == 0 {
            return;
        }
        self.arena.clear();
        self.roots.clear();
        self.children.clear();
        self.version.bump();
    }

    // ── Node access ──────────────────────────────────────────────────

    /// The node's key.
    pub fn key(&self, handle: NodeHandle) -> Result<&K, ForestError> {
        let index = self.arena.resolve(handle)?;
        Ok(&self.arena.record(index).key)
    }

    /// The node's value.
    pub fn value(&self, handle: NodeHandle) -> Result<&V, ForestError> {
        let index = self.arena.resolve(handle)?;
        Ok(&self.arena.record(index).value)
    }

    /// Mutable access to the node's value.
    ///
    /// Value updates are not structural: the version is unchanged and no
    /// cursor goes stale.
    pub fn value_mut(&mut self, handle: NodeHandle) -> Result<&mut V, ForestError> {
        let index = self.arena.resolve(handle)?;
        Ok(&mut self.arena.record_mut(index).value)
    }

    /// Replace the node's value.
    pub fn set_value(&mut self, handle: NodeHandle, value: V) -> Result<(), ForestError> {
        *self.value_mut(handle)? = value;
        Ok(())
    }

    /// Handle of the node's parent, `None` for roots.
    pub fn parent(&self, handle: NodeHandle) -> Result<Option<NodeHandle>, ForestError> {
        let index = self.arena.resolve(handle)?;
        Ok(self.arena.record(index).parent.map(|p| self.arena.handle_at(p)))
    }

    /// Handle of the node's first child.
    pub fn first_child(&self, handle: NodeHandle) -> Result<Option<NodeHandle>, ForestError> {
        let index = self.arena.resolve(handle)?;
        Ok(self
            .arena
            .record(index)
            .first_child
            .map(|c| self.arena.handle_at(c)))
    }

    /// Handle of the node's next sibling.
    pub fn next_sibling(&self, handle: NodeHandle) -> Result<Option<NodeHandle>, ForestError> {
        let index = self.arena.resolve(handle)?;
        Ok(self.arena.record(index).next.map(|n| self.arena.handle_at(n)))
    }

    /// Handle of the node's previous sibling.
    pub fn prev_sibling(&self, handle: NodeHandle) -> Result<Option<NodeHandle>, ForestError> {
        let index = self.arena.resolve(handle)?;
        Ok(self.arena.record(index).prev.map(|p| self.arena.handle_at(p)))
    }

    // ── Queries ──────────────────────────────────────────────────────

    /// Number of direct children of `parent`.
    pub fn child_count(&self, parent: NodeHandle) -> Result<usize, ForestError> {
        let index = self.arena.resolve(parent)?;
        let mut count = 0;
        let mut child = self.arena.record(index).first_child;
        while let Some(c) = child {
            count += 1;
            child = self.arena.record(c).next;
        }
        Ok(count)
    }

    /// Distance from the node to its root (a root has depth 0).
    pub fn depth(&self, handle: NodeHandle) -> Result<usize, ForestError> {
        let index = self.arena.resolve(handle)?;
        let mut depth = 0;
        let mut current = self.arena.record(index).parent;
        while let Some(p) = current {
            depth += 1;
            current = self.arena.record(p).parent;
        }
        Ok(depth)
    }

    // ── Subtree copy ─────────────────────────────────────────────────

    /// An independent, freshly indexed copy of the subtree at `handle`.
    ///
    /// With `include_root` the node itself becomes the single root of the
    /// copy; without it, each of its children becomes a root. Handles of
    /// the copy are unrelated to handles of this forest.
    pub fn copy_subtree(
        &self,
        handle: NodeHandle,
        include_root: bool,
    ) -> Result<Forest<K, V>, ForestError>
    where
        V: Clone,
    {
        let index = self.arena.resolve(handle)?;
        let mut copy = Forest::with_config(self.config.clone());
        if include_root {
            let record = self.arena.record(index);
            let root = copy.get_or_add_root_with(record.key.clone(), || record.value.clone());
            self.copy_children_into(index, root, &mut copy)?;
        } else {
            let mut child = self.arena.record(index).first_child;
            while let Some(c) = child {
                let record = self.arena.record(c);
                let root = copy.get_or_add_root_with(record.key.clone(), || record.value.clone());
                self.copy_children_into(c, root, &mut copy)?;
                child = record.next;
            }
        }
        Ok(copy)
    }

    /// Replicate the children of `source` under `target` in the copy,
    /// preserving sibling order, with an explicit work-list.
    fn copy_children_into(
        &self,
        source: u32,
        target: NodeHandle,
        copy: &mut Forest<K, V>,
    ) -> Result<(), ForestError>
    where
        V: Clone,
    {
        let mut stack: Vec<(u32, NodeHandle)> = vec![(source, target)];
        while let Some((s, t)) = stack.pop() {
            let mut child = self.arena.record(s).first_child;
            while let Some(c) = child {
                let record = self.arena.record(c);
                let handle =
                    copy.get_or_add_child_with(t, record.key.clone(), || record.value.clone())?;
                stack.push((c, handle));
                child = record.next;
            }
        }
        Ok(())
    }
}
