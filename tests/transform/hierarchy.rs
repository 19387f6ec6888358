//! Integration tests for hierarchy resolution

use canopy_foundation::Entity;
use canopy_storage::World;
use canopy_transform::{Parent, Position, Rotation, Scale, TransformKeys, register_transform_systems};
use glam::Vec2;

struct Scene {
    world: World,
    keys: TransformKeys,
}

impl Scene {
    fn new() -> Self {
        let mut world = World::new();
        let keys = TransformKeys::new();
        register_transform_systems(&mut world, &keys);
        Self { world, keys }
    }

    /// Spawns an entity with the same local value on every channel: `v` for
    /// position and scale, `v.x` for rotation.
    fn node(&mut self, v: Vec2, parent: Option<Entity>) -> Entity {
        let e = self.world.create_entity();
        self.attach(e, v, parent);
        e
    }

    fn attach(&mut self, e: Entity, v: Vec2, parent: Option<Entity>) {
        self.world.add_component(e, self.keys.position, Position::new(v));
        self.world.add_component(e, self.keys.rotation, Rotation::new(v.x));
        self.world.add_component(e, self.keys.scale, Scale::new(v));
        if let Some(parent) = parent {
            self.world.add_component(e, self.keys.parent, Parent(parent));
        }
    }

    fn position(&self, e: Entity) -> Vec2 {
        self.world.get_component(e, self.keys.position).unwrap().world
    }

    fn rotation(&self, e: Entity) -> f32 {
        self.world.get_component(e, self.keys.rotation).unwrap().world
    }

    fn scale(&self, e: Entity) -> Vec2 {
        self.world.get_component(e, self.keys.scale).unwrap().world
    }

    fn set_local_position(&mut self, e: Entity, local: Vec2) {
        self.world.get_component_mut(e, self.keys.position).unwrap().local = local;
    }
}

// =============================================================================
// Roots
// =============================================================================

#[test]
fn root_world_equals_local() {
    let mut scene = Scene::new();
    let root = scene.node(Vec2::new(3.0, 4.0), None);
    scene.world.get_component_mut(root, scene.keys.position).unwrap().world = Vec2::ZERO;

    scene.world.update().unwrap();
    assert_eq!(scene.position(root), Vec2::new(3.0, 4.0));
    assert_eq!(scene.rotation(root), 3.0);
    assert_eq!(scene.scale(root), Vec2::new(3.0, 4.0));
}

// =============================================================================
// Three Levels
// =============================================================================

fn three_levels(scene: &mut Scene) -> (Entity, Entity, Entity) {
    let parent = scene.world.create_entity();
    let child = scene.world.create_entity();
    let grandchild = scene.world.create_entity();

    scene.world.add_component(parent, scene.keys.position, Position::from_xy(10.0, 20.0));
    scene.world.add_component(child, scene.keys.position, Position::from_xy(5.0, 5.0));
    scene.world.add_component(grandchild, scene.keys.position, Position::from_xy(2.0, 2.0));

    scene.world.add_component(parent, scene.keys.rotation, Rotation::new(10.0));
    scene.world.add_component(child, scene.keys.rotation, Rotation::new(5.0));
    scene.world.add_component(grandchild, scene.keys.rotation, Rotation::new(2.0));

    scene.world.add_component(parent, scene.keys.scale, Scale::from_xy(10.0, 20.0));
    scene.world.add_component(child, scene.keys.scale, Scale::from_xy(5.0, 5.0));
    scene.world.add_component(grandchild, scene.keys.scale, Scale::from_xy(2.0, 2.0));

    scene.world.add_component(child, scene.keys.parent, Parent(parent));
    scene.world.add_component(grandchild, scene.keys.parent, Parent(child));

    (parent, child, grandchild)
}

#[test]
fn three_level_positions_accumulate() {
    let mut scene = Scene::new();
    let (parent, child, grandchild) = three_levels(&mut scene);
    scene.world.update().unwrap();

    assert_eq!(scene.position(parent), Vec2::new(10.0, 20.0));
    assert_eq!(scene.position(child), Vec2::new(15.0, 25.0));
    assert_eq!(scene.position(grandchild), Vec2::new(17.0, 27.0));
}

#[test]
fn three_level_rotations_accumulate() {
    let mut scene = Scene::new();
    let (parent, child, grandchild) = three_levels(&mut scene);
    scene.world.update().unwrap();

    assert_eq!(scene.rotation(parent), 10.0);
    assert_eq!(scene.rotation(child), 15.0);
    assert_eq!(scene.rotation(grandchild), 17.0);
}

#[test]
fn three_level_scales_multiply() {
    let mut scene = Scene::new();
    let (parent, child, grandchild) = three_levels(&mut scene);
    scene.world.update().unwrap();

    assert_eq!(scene.scale(parent), Vec2::new(10.0, 20.0));
    assert_eq!(scene.scale(child), Vec2::new(50.0, 100.0));
    assert_eq!(scene.scale(grandchild), Vec2::new(100.0, 200.0));
}

#[test]
fn update_is_idempotent() {
    let mut scene = Scene::new();
    let (_, _, grandchild) = three_levels(&mut scene);
    scene.world.update().unwrap();
    scene.world.update().unwrap();

    assert_eq!(scene.position(grandchild), Vec2::new(17.0, 27.0));
    assert_eq!(scene.scale(grandchild), Vec2::new(100.0, 200.0));
}

// =============================================================================
// Registration Order
// =============================================================================

#[test]
fn out_of_order_registration_matches_in_order() {
    let locals = [Vec2::new(10.0, 20.0), Vec2::new(5.0, 5.0), Vec2::new(2.0, 2.0)];

    let mut in_order = Scene::new();
    let a = in_order.node(locals[0], None);
    let b = in_order.node(locals[1], Some(a));
    let c = in_order.node(locals[2], Some(b));
    in_order.world.update().unwrap();

    // Grandchild's components land in every set first, the root's last.
    let mut reversed = Scene::new();
    let ra = reversed.world.create_entity();
    let rb = reversed.world.create_entity();
    let rc = reversed.world.create_entity();
    reversed.attach(rc, locals[2], Some(rb));
    reversed.attach(rb, locals[1], Some(ra));
    reversed.attach(ra, locals[0], None);
    reversed.world.update().unwrap();

    for (x, y) in [(a, ra), (b, rb), (c, rc)] {
        assert_eq!(in_order.position(x), reversed.position(y));
        assert_eq!(in_order.rotation(x), reversed.rotation(y));
        assert_eq!(in_order.scale(x), reversed.scale(y));
    }
}

#[test]
fn parent_attached_after_first_update_takes_effect() {
    let mut scene = Scene::new();
    let a = scene.node(Vec2::new(1.0, 1.0), None);
    let b = scene.node(Vec2::new(1.0, 1.0), None);
    scene.world.update().unwrap();
    assert_eq!(scene.position(b), Vec2::new(1.0, 1.0));

    scene.world.add_component(b, scene.keys.parent, Parent(a));
    scene.world.update().unwrap();
    assert_eq!(scene.position(b), Vec2::new(2.0, 2.0));
}

// =============================================================================
// Incremental Edits
// =============================================================================

#[test]
fn editing_child_local_only_moves_its_subtree() {
    let mut scene = Scene::new();
    let root = scene.node(Vec2::new(100.0, 0.0), None);
    let left = scene.node(Vec2::new(-10.0, 0.0), Some(root));
    let left_leaf = scene.node(Vec2::new(-1.0, 0.0), Some(left));
    let right = scene.node(Vec2::new(10.0, 0.0), Some(root));
    let right_leaf = scene.node(Vec2::new(1.0, 0.0), Some(right));
    scene.world.update().unwrap();

    let before = [root, right, right_leaf].map(|e| scene.position(e));
    scene.set_local_position(left, Vec2::new(-20.0, 5.0));
    scene.world.update().unwrap();

    assert_eq!(scene.position(left), Vec2::new(80.0, 5.0));
    assert_eq!(scene.position(left_leaf), Vec2::new(79.0, 5.0));
    assert_eq!([root, right, right_leaf].map(|e| scene.position(e)), before);
}

#[test]
fn stale_world_values_are_overwritten() {
    let mut scene = Scene::new();
    let root = scene.node(Vec2::new(1.0, 2.0), None);
    let child = scene.node(Vec2::new(1.0, 1.0), Some(root));
    scene.world.get_component_mut(child, scene.keys.position).unwrap().world = Vec2::splat(999.0);

    scene.world.update().unwrap();
    assert_eq!(scene.position(child), Vec2::new(2.0, 3.0));
}

// =============================================================================
// Partial Hierarchies
// =============================================================================

#[test]
fn channels_resolve_independently() {
    let mut scene = Scene::new();
    let parent = scene.world.create_entity();
    scene.world.add_component(parent, scene.keys.position, Position::from_xy(5.0, 5.0));
    let child = scene.world.create_entity();
    scene.world.add_component(child, scene.keys.parent, Parent(parent));
    scene.world.add_component(child, scene.keys.position, Position::from_xy(1.0, 1.0));
    scene.world.add_component(child, scene.keys.rotation, Rotation::new(30.0));

    scene.world.update().unwrap();
    assert_eq!(scene.position(child), Vec2::new(6.0, 6.0));
    // The parent has no rotation, so the child's rotation is its own.
    assert_eq!(scene.rotation(child), 30.0);
}

#[test]
fn removed_parent_leaves_child_as_root() {
    let mut scene = Scene::new();
    let parent = scene.node(Vec2::new(5.0, 5.0), None);
    let child = scene.node(Vec2::new(1.0, 1.0), Some(parent));
    scene.world.remove_entity(parent);

    scene.world.update().unwrap();
    assert_eq!(scene.position(child), Vec2::new(1.0, 1.0));
}

#[test]
fn parent_id_that_was_never_created_is_ignored() {
    let mut scene = Scene::new();
    let ghost = Entity::from_raw(50);
    scene.attach(ghost, Vec2::new(100.0, 100.0), None);
    let child = scene.node(Vec2::new(1.0, 1.0), Some(ghost));
    assert!(!scene.world.is_alive(ghost));

    scene.world.update().unwrap();
    assert_eq!(scene.position(child), Vec2::new(1.0, 1.0));
    assert_eq!(scene.rotation(child), 1.0);
    assert_eq!(scene.scale(child), Vec2::new(1.0, 1.0));
}
