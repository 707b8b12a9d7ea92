//! Node records and arena slots.
//!
//! A [`NodeRecord`] is the fixed-shape payload of one arena slot: the
//! node's key, its value, and the five links that weave it into the
//! forest. Links are raw slot indices (`Option<u32>`), not handles —
//! they are internal to the container and rewritten wholesale when
//! compaction relocates records.

/// One node's data and links.
///
/// `key` is immutable once set; it identifies the node among its siblings
/// under the same parent, or among roots. `value` is freely mutable.
/// Children form a doubly linked sibling list; `last_child` tracks the
/// tail so appending a child never walks the list.
#[derive(Clone, Debug)]
pub(crate) struct NodeRecord<K, V> {
    /// Identifying key, unique among siblings.
    pub(crate) key: K,
    /// Caller payload.
    pub(crate) value: V,
    /// Owning parent slot; `None` for roots.
    pub(crate) parent: Option<u32>,
    /// Head of the child list.
    pub(crate) first_child: Option<u32>,
    /// Tail of the child list, kept so append is O(1).
    pub(crate) last_child: Option<u32>,
    /// Next sibling under the same parent.
    pub(crate) next: Option<u32>,
    /// Previous sibling under the same parent.
    pub(crate) prev: Option<u32>,
}

impl<K, V> NodeRecord<K, V> {
    /// A fresh record with every link unset.
    pub(crate) fn detached(key: K, value: V) -> Self {
        Self {
            key,
            value,
            parent: None,
            first_child: None,
            last_child: None,
            next: None,
            prev: None,
        }
    }
}

/// One arena slot.
///
/// `node: None` encodes a tombstone. The generation stays behind when the
/// record is dropped, so the slot's history is never lost while the slot
/// exists; a fresh generation is issued whenever a record is placed.
#[derive(Clone, Debug)]
pub(crate) struct Slot<K, V> {
    /// Generation issued when the current record was placed.
    pub(crate) generation: u64,
    /// The record, or `None` for a tombstone.
    pub(crate) node: Option<NodeRecord<K, V>>,
}
