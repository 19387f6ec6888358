//! Integration tests for SparseSet
//!
//! Tests insertion, swap-removal, and the dense arrays.

use canopy_foundation::Entity;
use canopy_storage::SparseSet;

fn e(index: u32) -> Entity {
    Entity::from_raw(index)
}

#[test]
fn insert_and_get() {
    let mut set = SparseSet::new();
    set.insert(e(5), "five");
    set.insert(e(0), "zero");

    assert_eq!(set.get(e(5)), Some(&"five"));
    assert_eq!(set.get(e(0)), Some(&"zero"));
    assert_eq!(set.get(e(1)), None);
    assert_eq!(set.len(), 2);
}

#[test]
fn insert_existing_overwrites_in_place() {
    let mut set = SparseSet::new();
    set.insert(e(1), 10);
    set.insert(e(2), 20);

    assert_eq!(set.insert(e(1), 11), Some(10));
    assert_eq!(set.entities(), &[e(1), e(2)]);
    assert_eq!(set.values(), &[11, 20]);
}

#[test]
fn remove_moves_last_into_hole() {
    let mut set = SparseSet::new();
    for i in 0..4 {
        set.insert(e(i), i * 10);
    }

    assert_eq!(set.remove(e(1)), Some(10));
    assert_eq!(set.entities(), &[e(0), e(3), e(2)]);
    assert_eq!(set.get(e(3)), Some(&30));
    assert_eq!(set.get(e(2)), Some(&20));
    assert!(!set.contains(e(1)));
}

#[test]
fn remove_absent_is_noop() {
    let mut set: SparseSet<u8> = SparseSet::new();
    assert_eq!(set.remove(e(100)), None);
    set.insert(e(0), 1);
    assert_eq!(set.remove(e(100)), None);
    assert_eq!(set.len(), 1);
}

#[test]
fn far_entity_grows_sparse() {
    let mut set = SparseSet::new();
    set.insert(e(10_000), 'x');
    assert!(set.contains(e(10_000)));
    assert!(!set.contains(e(9_999)));
}

#[test]
fn iter_pairs_entities_with_values() {
    let mut set = SparseSet::new();
    set.insert(e(2), 'b');
    set.insert(e(1), 'a');

    let pairs: Vec<_> = set.iter().map(|(entity, value)| (entity, *value)).collect();
    assert_eq!(pairs, vec![(e(2), 'b'), (e(1), 'a')]);
}

#[test]
fn clear_empties_set() {
    let mut set = SparseSet::new();
    set.insert(e(3), ());
    set.clear();
    assert!(set.is_empty());
    assert!(!set.contains(e(3)));
}
