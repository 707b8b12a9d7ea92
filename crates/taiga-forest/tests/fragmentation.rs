//! Integration test: slot-array fragmentation under sustained churn.
//!
//! Runs thousands of randomized add/remove cycles against a live forest
//! and asserts that automatic compaction keeps the slot array within 2x
//! of the live node count the whole time, that freed slots are reused
//! before the array grows, and that keys, values, and sibling order all
//! survive the churn.

use rand::rngs::StdRng;
use rand::{RngExt, SeedableRng};
use taiga_forest::Forest;

// ── Randomized churn against a mirror model ──────────────────────────

#[test]
fn churn_keeps_occupancy_bounded() {
    let mut rng = StdRng::seed_from_u64(0x7a19a);
    let mut forest = Forest::<u64, u64>::new();

    // Eight fixed roots; the mirror records each root's children in
    // insertion order.
    let mut model: Vec<(u64, Vec<u64>)> = (0..8u64).map(|r| (r, Vec::new())).collect();
    for (key, _) in &model {
        forest.get_or_add_root(*key);
    }
    let mut next_key = 100u64;

    for _ in 0..10_000 {
        let slot = rng.random_range(0..model.len());
        let (root_key, children) = &mut model[slot];
        let root = forest.try_get_root(root_key).unwrap();

        if children.is_empty() || rng.random_bool(0.6) {
            let key = next_key;
            next_key += 1;
            let child = forest.get_or_add_child(root, key).unwrap();
            forest.set_value(child, key * 3).unwrap();
            children.push(key);
        } else {
            let pick = rng.random_range(0..children.len());
            let key = children.remove(pick);
            let child = forest.try_get_child(root, &key).unwrap();
            assert!(forest.remove_node(child));
        }

        // The occupancy check runs after every removal, so the array can
        // never sit at or below half full.
        assert!(
            forest.capacity() <= 2 * forest.len(),
            "capacity {} exceeds 2x live {}",
            forest.capacity(),
            forest.len()
        );
    }

    // Full reconciliation against the mirror.
    let expected: usize = model.iter().map(|(_, c)| c.len()).sum::<usize>() + model.len();
    assert_eq!(forest.len(), expected);
    for (root_key, children) in &model {
        let root = forest.try_get_root(root_key).unwrap();
        let observed: Vec<u64> = forest
            .children(root)
            .unwrap()
            .map(|h| *forest.key(h).unwrap())
            .collect();
        assert_eq!(&observed, children, "sibling order diverged for root {root_key}");
        for key in children {
            let child = forest.try_get_child(root, key).unwrap();
            assert_eq!(*forest.value(child).unwrap(), key * 3);
            assert_eq!(forest.depth(child).unwrap(), 1);
        }
    }
}

// ── Free-list reuse without growth ───────────────────────────────────

#[test]
fn freed_slots_are_reused_before_the_array_grows() {
    let mut forest = Forest::<u32, ()>::new();
    forest.set_auto_compact(false);

    let root = forest.get_or_add_root(0);
    for i in 0..1000u32 {
        forest.get_or_add_child(root, i).unwrap();
    }
    assert_eq!(forest.capacity(), 1001);

    for i in 0..500u32 {
        let child = forest.try_get_child(root, &i).unwrap();
        assert!(forest.remove_node(child));
    }
    assert_eq!(forest.free_slots(), 500);

    // Re-adding fills the tombstones; the array must not grow.
    for i in 1000..1500u32 {
        forest.get_or_add_child(root, i).unwrap();
    }
    assert_eq!(forest.capacity(), 1001);
    assert_eq!(forest.free_slots(), 0);
    assert_eq!(forest.len(), 1001);
}

// ── Worst-case fragmentation collapses in one pass ───────────────────

#[test]
fn sparse_survivors_compact_to_dense() {
    let mut forest = Forest::<u32, u32>::new();
    forest.set_auto_compact(false);

    // 2000 roots, keep every 100th: 1% occupancy.
    for i in 0..2000u32 {
        forest.get_or_add_root(i);
        let root = forest.try_get_root(&i).unwrap();
        forest.set_value(root, i).unwrap();
    }
    for i in 0..2000u32 {
        if i % 100 != 0 {
            assert!(forest.remove_root(&i));
        }
    }
    assert_eq!(forest.len(), 20);
    // Removing slot 1999 last shrank the bound by one; everything else
    // is a tombstone.
    assert_eq!(forest.capacity(), 1999);

    forest.compact();
    assert_eq!(forest.capacity(), 20);
    assert_eq!(forest.free_slots(), 0);
    for i in (0..2000u32).step_by(100) {
        let root = forest.try_get_root(&i).unwrap();
        assert_eq!(*forest.value(root).unwrap(), i);
    }
}
