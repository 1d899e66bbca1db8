//! Entity arena
//!
//! Entities live in generation-checked slots and are addressed by
//! [`EntityId`]. Parent/child links are ids into the same arena, so the
//! tree carries no owning references. Iteration order is depth-first
//! pre-order over the roots in insertion order, children in insertion order.
//!
//! Structural changes made while a frame is running are deferred: kills are
//! soft (`alive = false`) and applied by [`World::remove_dead`]; spawns are
//! queued and applied by [`World::commit_pending`].

use std::any::Any;

use glam::Vec2;

use super::aabb::Aabb;
use super::entity::{Behavior, Entity};
use crate::distance_squared;

/// Stable handle to an entity. Stale handles never alias a new entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId {
    index: u32,
    generation: u32,
}

impl EntityId {
    #[inline]
    pub fn index(&self) -> u32 {
        self.index
    }
}

struct Slot<S: 'static> {
    generation: u32,
    entity: Option<Entity<S>>,
}

struct Pending<S: 'static> {
    id: EntityId,
    parent: Option<EntityId>,
    entity: Entity<S>,
}

pub struct World<S: 'static> {
    slots: Vec<Slot<S>>,
    free: Vec<u32>,
    roots: Vec<EntityId>,
    pending: Vec<Pending<S>>,
    len: usize,
}

impl<S: 'static> Default for World<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: 'static> World<S> {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            roots: Vec::new(),
            pending: Vec::new(),
            len: 0,
        }
    }

    /// Number of stored entities (dead ones included until cleanup)
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Spawns waiting for the next commit
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn roots(&self) -> &[EntityId] {
        &self.roots
    }

    /// Allocate a slot without filling it
    fn reserve(&mut self) -> EntityId {
        if let Some(index) = self.free.pop() {
            let generation = self.slots[index as usize].generation;
            return EntityId { index, generation };
        }
        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            entity: None,
        });
        EntityId {
            index,
            generation: 0,
        }
    }

    fn release(&mut self, index: u32) {
        let slot = &mut self.slots[index as usize];
        slot.entity = None;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(index);
    }

    fn place(&mut self, id: EntityId, parent: Option<EntityId>, mut entity: Entity<S>) {
        entity.parent = parent;
        match parent {
            Some(p) => {
                if let Some(parent) = self.get_mut(p) {
                    parent.children.push(id);
                }
            }
            None => self.roots.push(id),
        }
        self.slots[id.index as usize].entity = Some(entity);
        self.len += 1;
    }

    /// Insert a top-level entity immediately
    pub fn insert(&mut self, entity: Entity<S>) -> EntityId {
        let id = self.reserve();
        self.place(id, None, entity);
        id
    }

    /// Insert `entity` as the last child of `parent`.
    /// Returns None if `parent` does not exist.
    pub fn insert_child(&mut self, parent: EntityId, entity: Entity<S>) -> Option<EntityId> {
        if !self.contains(parent) {
            log::warn!("Cannot attach '{}': parent {:?} does not exist", entity.name, parent);
            return None;
        }
        let id = self.reserve();
        self.place(id, Some(parent), entity);
        Some(id)
    }

    /// Queue an entity for the next commit. The id is valid immediately but
    /// resolves to nothing until committed.
    pub fn queue(&mut self, parent: Option<EntityId>, entity: Entity<S>) -> EntityId {
        let id = self.reserve();
        self.pending.push(Pending { id, parent, entity });
        id
    }

    /// Attach all queued spawns. Children whose parent vanished are dropped.
    pub fn commit_pending(&mut self) -> usize {
        let pending = std::mem::take(&mut self.pending);
        let mut committed = 0;
        for Pending { id, parent, entity } in pending {
            match parent {
                Some(p) if !self.contains(p) => {
                    log::debug!("Dropping spawn '{}': parent {:?} is gone", entity.name, p);
                    self.release(id.index);
                }
                _ => {
                    self.place(id, parent, entity);
                    committed += 1;
                }
            }
        }
        committed
    }

    #[inline]
    pub fn contains(&self, id: EntityId) -> bool {
        self.get(id).is_some()
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity<S>> {
        let slot = self.slots.get(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.entity.as_ref()
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity<S>> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.entity.as_mut()
    }

    /// Mark an entity dead. Returns false if it does not exist.
    pub fn kill(&mut self, id: EntityId) -> bool {
        match self.get_mut(id) {
            Some(entity) => {
                entity.kill();
                true
            }
            None => false,
        }
    }

    /// Alive and every ancestor alive
    pub fn is_live(&self, id: EntityId) -> bool {
        let mut current = Some(id);
        while let Some(cid) = current {
            match self.get(cid) {
                Some(e) if e.is_alive() => current = e.parent,
                _ => return false,
            }
        }
        true
    }

    /// Live entities in update/draw order. Dead entities hide their subtree.
    pub fn traverse(&self) -> Vec<EntityId> {
        let mut order = Vec::with_capacity(self.len);
        let mut stack: Vec<EntityId> = self.roots.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            let Some(entity) = self.get(id) else { continue };
            if !entity.is_alive() {
                continue;
            }
            order.push(id);
            stack.extend(entity.children.iter().rev().copied());
        }
        order
    }

    /// Remove every dead entity together with its subtree.
    /// Returns the number of entities freed.
    pub fn remove_dead(&mut self) -> usize {
        let mut dead = Vec::new();
        let mut stack: Vec<EntityId> = self.roots.clone();
        while let Some(id) = stack.pop() {
            let Some(entity) = self.get(id) else { continue };
            if entity.is_alive() {
                stack.extend(entity.children.iter().copied());
            } else {
                dead.push(id);
            }
        }

        let mut freed = 0;
        for id in dead {
            self.detach(id);
            freed += self.free_subtree(id);
        }
        freed
    }

    /// Unlink `id` from its parent's children (or from the roots)
    fn detach(&mut self, id: EntityId) {
        let parent = self.get(id).and_then(|e| e.parent);
        match parent.and_then(|p| self.get_mut(p)) {
            Some(parent) => parent.children.retain(|c| *c != id),
            None => self.roots.retain(|r| *r != id),
        }
    }

    fn free_subtree(&mut self, id: EntityId) -> usize {
        let mut freed = 0;
        let mut stack = vec![id];
        while let Some(id) = stack.pop() {
            let Some(entity) = self.get_mut(id) else { continue };
            stack.append(&mut entity.children);
            log::debug!("Removing entity '{}' ({:?})", entity.name, id);
            self.release(id.index);
            self.len -= 1;
            freed += 1;
        }
        freed
    }

    /// Sum of ancestor positions, up to the first ancestor without a
    /// collider. That ancestor and everything above it add nothing.
    pub fn origin(&self, id: EntityId) -> Vec2 {
        let mut origin = Vec2::ZERO;
        let mut current = self.get(id).and_then(|e| e.parent);
        while let Some(pid) = current {
            let Some(parent) = self.get(pid) else { break };
            let Some(pos) = parent.position() else { break };
            origin += pos;
            current = parent.parent;
        }
        origin
    }

    /// Position in world space; None if the entity has no collider
    pub fn global_position(&self, id: EntityId) -> Option<Vec2> {
        let local = self.get(id)?.position()?;
        Some(self.origin(id) + local)
    }

    /// Collider box in world space
    pub fn world_aabb(&self, id: EntityId) -> Option<Aabb> {
        let aabb = self.get(id)?.collider.as_ref()?.aabb;
        Some(aabb.translated(self.origin(id)))
    }

    /// Live entity closest to `point` whose name passes `filter`.
    /// Ties go to the first entity in traversal order.
    pub fn nearest(&self, point: Vec2, filter: impl Fn(&str) -> bool) -> Option<EntityId> {
        let mut best = None;
        let mut best_dist_sq = f32::INFINITY;
        for id in self.traverse() {
            let Some(entity) = self.get(id) else { continue };
            if !filter(&entity.name) {
                continue;
            }
            let Some(pos) = self.global_position(id) else { continue };
            let dist_sq = distance_squared(pos, point);
            if dist_sq < best_dist_sq {
                best_dist_sq = dist_sq;
                best = Some(id);
            }
        }
        best
    }

    pub fn children(&self, id: EntityId) -> &[EntityId] {
        self.get(id).map(|e| e.children.as_slice()).unwrap_or(&[])
    }

    /// First child named `name`
    pub fn find_child(&self, id: EntityId, name: &str) -> Option<EntityId> {
        self.children(id)
            .iter()
            .copied()
            .find(|c| self.get(*c).is_some_and(|e| e.name == name))
    }

    /// Children whose behavior is of kind `T`
    pub fn children_of<T: Any>(&self, id: EntityId) -> Vec<EntityId> {
        self.children(id)
            .iter()
            .copied()
            .filter(|c| self.get(*c).is_some_and(|e| e.is::<T>()))
            .collect()
    }

    /// Live entities named `name`, in traversal order
    pub fn entities_named(&self, name: &str) -> Vec<EntityId> {
        self.traverse()
            .into_iter()
            .filter(|id| self.get(*id).is_some_and(|e| e.name == name))
            .collect()
    }

    pub fn behavior<T: Any>(&self, id: EntityId) -> Option<&T> {
        self.get(id)?.behavior::<T>()
    }

    pub fn behavior_mut<T: Any>(&mut self, id: EntityId) -> Option<&mut T> {
        self.get_mut(id)?.behavior_mut::<T>()
    }

    pub(crate) fn take_behavior(&mut self, id: EntityId) -> Option<Box<dyn Behavior<S>>> {
        self.get_mut(id)?.behavior.take()
    }

    pub(crate) fn restore_behavior(&mut self, id: EntityId, behavior: Box<dyn Behavior<S>>) {
        if let Some(entity) = self.get_mut(id) {
            entity.behavior = Some(behavior);
        }
    }
}
