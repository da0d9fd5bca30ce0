//! Ordered entity collection owned by a game session.
//!
//! Removal during a step is deferred: rules call [`EntityStore::kill`] while
//! iterating, dead entities stop showing up in every iterator at once, and the
//! session calls [`EntityStore::sweep`] between steps to drop them for good.

use std::slice;

use crate::entities::{Entity, EntityId, EntityKind, Renderable};

#[derive(Clone, Debug, Default)]
pub struct EntityStore {
    entities: Vec<Entity>,
    next_id: u32,
}

impl EntityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `entity`, assigning it a fresh id.
    pub fn spawn(&mut self, mut entity: Entity) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        entity.id = id;
        entity.alive = true;
        self.entities.push(entity);
        id
    }

    /// Remove immediately.  Returns `false` if `id` is not present.
    pub fn remove(&mut self, id: EntityId) -> bool {
        match self.entities.iter().position(|e| e.id == id) {
            Some(idx) => {
                self.entities.remove(idx);
                true
            }
            None => false,
        }
    }

    /// Mark for removal at the next [`sweep`](Self::sweep).
    pub fn kill(&mut self, id: EntityId) -> bool {
        match self.get_mut(id) {
            Some(entity) => {
                entity.alive = false;
                true
            }
            None => false,
        }
    }

    /// Mark every member of `group` for removal; returns how many were live.
    pub fn kill_group(&mut self, group: EntityId) -> usize {
        let mut killed = 0;
        for entity in self.entities.iter_mut() {
            if entity.alive && (entity.id == group || entity.group == Some(group)) {
                entity.alive = false;
                killed += 1;
            }
        }
        killed
    }

    /// Drop every dead entity, preserving the order of the rest.
    pub fn sweep(&mut self) -> usize {
        let before = self.entities.len();
        self.entities.retain(|e| e.alive);
        before - self.entities.len()
    }

    pub fn clear(&mut self) {
        self.entities.clear();
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id && e.alive)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|e| e.id == id && e.alive)
    }

    /// Live entities of `kind` in insertion order.  The iterator is `Clone`,
    /// so a caller can restart it from the same point.
    pub fn for_each(&self, kind: EntityKind) -> KindIter<'_> {
        KindIter {
            inner: self.entities.iter(),
            kind,
        }
    }

    pub fn for_each_mut(&mut self, kind: EntityKind) -> impl Iterator<Item = &mut Entity> {
        self.entities
            .iter_mut()
            .filter(move |e| e.alive && e.kind == kind)
    }

    /// Snapshot of the ids of `kind`, for loops that mutate the store.
    pub fn ids(&self, kind: EntityKind) -> Vec<EntityId> {
        self.for_each(kind).map(|e| e.id).collect()
    }

    pub fn first(&self, kind: EntityKind) -> Option<&Entity> {
        self.for_each(kind).next()
    }

    pub fn first_mut(&mut self, kind: EntityKind) -> Option<&mut Entity> {
        self.for_each_mut(kind).next()
    }

    pub fn count(&self, kind: EntityKind) -> usize {
        self.for_each(kind).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter().filter(|e| e.alive)
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Entity> {
        self.entities.iter_mut().filter(|e| e.alive)
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every live entity in insertion order.
    pub fn snapshot(&self) -> Vec<Renderable> {
        self.iter().map(Entity::renderable).collect()
    }
}

/// Iterator returned by [`EntityStore::for_each`].
#[derive(Clone, Debug)]
pub struct KindIter<'a> {
    inner: slice::Iter<'a, Entity>,
    kind: EntityKind,
}

impl<'a> Iterator for KindIter<'a> {
    type Item = &'a Entity;

    fn next(&mut self) -> Option<Self::Item> {
        let kind = self.kind;
        self.inner.by_ref().find(|e| e.alive && e.kind == kind)
    }
}
