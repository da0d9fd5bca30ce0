use arcade_loop::config::GameConfig;
use arcade_loop::entities::*;
use arcade_loop::games::{advance_movers, is_offscreen, prune_offscreen};
use arcade_loop::store::EntityStore;

fn block(kind: EntityKind, x: f32) -> Entity {
    Entity::new(kind, Vec2::new(x, 0.0), Vec2::new(10.0, 10.0))
}

fn xs(store: &EntityStore, kind: EntityKind) -> Vec<f32> {
    store.for_each(kind).map(|e| e.position.x).collect()
}

// ── spawn / iteration order ───────────────────────────────────────────────────

#[test]
fn spawn_preserves_insertion_order() {
    let mut store = EntityStore::new();
    for x in [30.0, 10.0, 20.0] {
        store.spawn(block(EntityKind::Enemy, x));
    }
    assert_eq!(xs(&store, EntityKind::Enemy), vec![30.0, 10.0, 20.0]);
}

#[test]
fn spawn_assigns_distinct_ids() {
    let mut store = EntityStore::new();
    let a = store.spawn(block(EntityKind::Enemy, 0.0));
    let b = store.spawn(block(EntityKind::Enemy, 0.0));
    assert_ne!(a, b);
    assert_eq!(store.get(a).map(|e| e.id), Some(a));
}

#[test]
fn for_each_filters_by_kind() {
    let mut store = EntityStore::new();
    store.spawn(block(EntityKind::Player, 0.0));
    store.spawn(block(EntityKind::Bullet, 1.0));
    store.spawn(block(EntityKind::Enemy, 2.0));
    store.spawn(block(EntityKind::Bullet, 3.0));
    assert_eq!(xs(&store, EntityKind::Bullet), vec![1.0, 3.0]);
    assert_eq!(store.count(EntityKind::Enemy), 1);
    assert_eq!(store.len(), 4);
}

#[test]
fn for_each_can_be_restarted() {
    let mut store = EntityStore::new();
    for x in [1.0, 2.0, 3.0] {
        store.spawn(block(EntityKind::Enemy, x));
    }
    let mut iter = store.for_each(EntityKind::Enemy);
    iter.next();
    let checkpoint = iter.clone();
    let rest: Vec<f32> = iter.map(|e| e.position.x).collect();
    let again: Vec<f32> = checkpoint.map(|e| e.position.x).collect();
    assert_eq!(rest, vec![2.0, 3.0]);
    assert_eq!(rest, again);
}

#[test]
fn for_each_mut_mutates_in_place() {
    let mut store = EntityStore::new();
    store.spawn(block(EntityKind::Enemy, 1.0));
    store.spawn(block(EntityKind::Bullet, 2.0));
    for e in store.for_each_mut(EntityKind::Enemy) {
        e.position.x += 100.0;
    }
    assert_eq!(xs(&store, EntityKind::Enemy), vec![101.0]);
    assert_eq!(xs(&store, EntityKind::Bullet), vec![2.0]);
}

// ── remove / kill / sweep ─────────────────────────────────────────────────────

#[test]
fn remove_is_idempotent() {
    let mut store = EntityStore::new();
    let a = store.spawn(block(EntityKind::Enemy, 0.0));
    assert!(store.remove(a));
    assert!(!store.remove(a));
    assert!(store.is_empty());
}

#[test]
fn remove_unknown_id_is_a_no_op() {
    let mut store = EntityStore::new();
    store.spawn(block(EntityKind::Enemy, 0.0));
    assert!(!store.remove(EntityId::UNASSIGNED));
    assert_eq!(store.len(), 1);
}

#[test]
fn kill_during_iteration_neither_skips_nor_repeats() {
    let mut store = EntityStore::new();
    for x in [1.0, 2.0, 3.0, 4.0] {
        store.spawn(block(EntityKind::Enemy, x));
    }
    let mut visited = Vec::new();
    for id in store.ids(EntityKind::Enemy) {
        let x = store.get(id).map(|e| e.position.x);
        visited.extend(x);
        if x == Some(2.0) {
            store.kill(id);
        }
    }
    assert_eq!(visited, vec![1.0, 2.0, 3.0, 4.0]);
    assert_eq!(xs(&store, EntityKind::Enemy), vec![1.0, 3.0, 4.0]);
    assert_eq!(store.sweep(), 1);
}

#[test]
fn kill_group_takes_every_member() {
    let mut store = EntityStore::new();
    let top = store.spawn(block(EntityKind::Obstacle, 0.0));
    if let Some(e) = store.get_mut(top) {
        e.group = Some(top);
    }
    store.spawn(block(EntityKind::Obstacle, 0.0).with_group(top));
    store.spawn(block(EntityKind::Obstacle, 50.0));

    assert_eq!(store.kill_group(top), 2);
    assert_eq!(store.kill_group(top), 0);
    assert_eq!(xs(&store, EntityKind::Obstacle), vec![50.0]);
}

#[test]
fn clear_empties_the_store() {
    let mut store = EntityStore::new();
    store.spawn(block(EntityKind::Player, 0.0));
    store.spawn(block(EntityKind::Enemy, 0.0));
    store.clear();
    assert!(store.is_empty());
    assert!(store.first(EntityKind::Player).is_none());
}

#[test]
fn snapshot_skips_dead_entities() {
    let mut store = EntityStore::new();
    let a = store.spawn(block(EntityKind::Enemy, 1.0));
    store.spawn(block(EntityKind::Bullet, 2.0));
    store.kill(a);
    let snapshot = store.snapshot();
    assert_eq!(snapshot.len(), 1);
    assert_eq!(snapshot[0].kind, EntityKind::Bullet);
    assert_eq!(snapshot[0].position, Vec2::new(2.0, 0.0));
}

// ── Movement and pruning helpers ──────────────────────────────────────────────

#[test]
fn advance_moves_everything_but_the_player() {
    let mut store = EntityStore::new();
    store.spawn(block(EntityKind::Player, 0.0).with_velocity(Vec2::new(5.0, 0.0)));
    store.spawn(block(EntityKind::Enemy, 0.0).with_velocity(Vec2::new(0.0, -2.0)));
    advance_movers(&mut store, 1.0);
    assert_eq!(store.first(EntityKind::Player).map(|e| e.position), Some(Vec2::new(0.0, 0.0)));
    assert_eq!(store.first(EntityKind::Enemy).map(|e| e.position), Some(Vec2::new(0.0, -2.0)));
}

#[test]
fn offscreen_depends_on_direction_of_travel() {
    let config = GameConfig::helicopter();
    let left = block(EntityKind::Obstacle, -11.0).with_velocity(Vec2::new(-2.0, 0.0));
    let parked = block(EntityKind::Obstacle, -11.0);
    let entering = block(EntityKind::Obstacle, 601.0).with_velocity(Vec2::new(-2.0, 0.0));
    assert!(is_offscreen(&left, &config));
    assert!(!is_offscreen(&parked, &config));
    assert!(!is_offscreen(&entering, &config));
}

#[test]
fn obstacle_is_pruned_once_fully_past_the_left_edge() {
    let config = GameConfig::helicopter();
    let mut store = EntityStore::new();
    let id = store.spawn(
        Entity::new(EntityKind::Obstacle, Vec2::new(600.0, 0.0), Vec2::new(1.0, 1.0))
            .with_velocity(Vec2::new(-2.0, 0.0)),
    );

    for _ in 0..300 {
        advance_movers(&mut store, 1.0);
        assert!(prune_offscreen(&mut store, &config).is_empty());
        store.sweep();
    }
    assert_eq!(store.get(id).map(|e| e.position.x), Some(0.0));

    advance_movers(&mut store, 1.0);
    let pruned = prune_offscreen(&mut store, &config);
    assert_eq!(pruned.len(), 1);
    assert!(store.get(id).is_none());
    assert!(store.snapshot().is_empty());
}

#[test]
fn pruning_one_half_takes_its_partner() {
    let config = GameConfig::helicopter();
    let mut store = EntityStore::new();
    let top = store.spawn(
        Entity::new(EntityKind::Obstacle, Vec2::new(-40.0, 300.0), Vec2::new(30.0, 100.0))
            .with_velocity(Vec2::new(-2.0, 0.0)),
    );
    // Partner still on screen; it goes because its group does.
    store.spawn(
        Entity::new(EntityKind::Obstacle, Vec2::new(10.0, 0.0), Vec2::new(30.0, 100.0))
            .with_velocity(Vec2::new(-2.0, 0.0))
            .with_group(top),
    );
    if let Some(e) = store.get_mut(top) {
        e.group = Some(top);
    }

    prune_offscreen(&mut store, &config);
    assert_eq!(store.count(EntityKind::Obstacle), 0);
}
