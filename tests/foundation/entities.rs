//! Integration tests for Entity handles

use std::collections::HashSet;

use canopy_foundation::Entity;

#[test]
fn entity_round_trips_raw_index() {
    let e = Entity::from_raw(42);
    assert_eq!(e.index(), 42);
    assert_eq!(e.slot(), 42);
    assert_eq!(Entity::from(42u32), e);
}

#[test]
fn entity_formats() {
    let e = Entity::from_raw(7);
    assert_eq!(format!("{e}"), "#7");
    assert_eq!(format!("{e:?}"), "Entity(7)");
}

#[test]
fn entities_order_by_index() {
    let mut entities = vec![Entity::from_raw(3), Entity::from_raw(1), Entity::from_raw(2)];
    entities.sort();
    assert_eq!(entities, vec![Entity::from_raw(1), Entity::from_raw(2), Entity::from_raw(3)]);
}

#[test]
fn entities_hash_by_index() {
    let set: HashSet<_> = [Entity::from_raw(1), Entity::from_raw(1), Entity::from_raw(2)]
        .into_iter()
        .collect();
    assert_eq!(set.len(), 2);
}
