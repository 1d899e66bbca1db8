//! Frame contexts handed to behaviors
//!
//! `Ctx` is the mutable view an entity gets during update and collision:
//! the arena, the shared game state, particles, audio queue, input and
//! assets. `DrawCtx` is the read-only counterpart for the draw phase.

use std::any::Any;

use glam::Vec2;

use super::aabb::Aabb;
use super::entity::Entity;
use super::particles::ParticleSystem;
use super::world::{EntityId, World};
use crate::assets::{AssetRegistry, AudioClip};
use crate::platform::InputState;
use crate::renderer::{Color, Surface};

pub struct Ctx<'a, S: 'static> {
    id: EntityId,
    world: &'a mut World<S>,
    particles: &'a mut ParticleSystem,
    sounds: &'a mut Vec<AudioClip>,
    assets: &'a mut AssetRegistry,
    input: &'a InputState,
    state: &'a mut S,
}

impl<'a, S: 'static> Ctx<'a, S> {
    pub(crate) fn new(
        id: EntityId,
        world: &'a mut World<S>,
        particles: &'a mut ParticleSystem,
        sounds: &'a mut Vec<AudioClip>,
        assets: &'a mut AssetRegistry,
        input: &'a InputState,
        state: &'a mut S,
    ) -> Self {
        Self {
            id,
            world,
            particles,
            sounds,
            assets,
            input,
            state,
        }
    }

    /// The entity whose hook is running
    #[inline]
    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn entity(&self) -> Option<&Entity<S>> {
        self.world.get(self.id)
    }

    pub fn entity_mut(&mut self) -> Option<&mut Entity<S>> {
        self.world.get_mut(self.id)
    }

    pub fn world(&self) -> &World<S> {
        &*self.world
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity<S>> {
        self.world.get(id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity<S>> {
        self.world.get_mut(id)
    }

    /// Name of another entity, if it exists
    pub fn name_of(&self, id: EntityId) -> Option<&str> {
        self.world.get(id).map(|e| e.name.as_str())
    }

    /// Typed access to another entity's behavior. The running entity's own
    /// behavior is checked out while its hook runs and resolves to None.
    pub fn behavior<T: Any>(&self, id: EntityId) -> Option<&T> {
        self.world.behavior::<T>(id)
    }

    pub fn behavior_mut<T: Any>(&mut self, id: EntityId) -> Option<&mut T> {
        self.world.behavior_mut::<T>(id)
    }

    /// World-space position of the running entity
    pub fn position(&self) -> Option<Vec2> {
        self.world.global_position(self.id)
    }

    pub fn global_position(&self, id: EntityId) -> Option<Vec2> {
        self.world.global_position(id)
    }

    /// World-space collider box of the running entity
    pub fn aabb(&self) -> Option<Aabb> {
        self.world.world_aabb(self.id)
    }

    /// Move the running entity's collider box
    pub fn translate(&mut self, delta: Vec2) {
        if let Some(entity) = self.world.get_mut(self.id) {
            entity.translate(delta);
        }
    }

    pub fn kill(&mut self, id: EntityId) {
        self.world.kill(id);
    }

    pub fn kill_self(&mut self) {
        self.world.kill(self.id);
    }

    pub fn is_alive(&self, id: EntityId) -> bool {
        self.world.is_live(id)
    }

    /// Queue a top-level entity. It is drawn this frame and updated from the next.
    pub fn spawn(&mut self, entity: Entity<S>) -> EntityId {
        self.world.queue(None, entity)
    }

    /// Queue a child of `parent`
    pub fn spawn_child(&mut self, parent: EntityId, entity: Entity<S>) -> EntityId {
        self.world.queue(Some(parent), entity)
    }

    pub fn nearest_entity(&self, point: Vec2, filter: impl Fn(&str) -> bool) -> Option<EntityId> {
        self.world.nearest(point, filter)
    }

    /// Closest live entity named exactly `name`
    pub fn nearest_named(&self, point: Vec2, name: &str) -> Option<EntityId> {
        self.world.nearest(point, |n| n == name)
    }

    pub fn emit_particles(&mut self, pos: Vec2, count: usize, color: Color) {
        self.particles.emit(pos, count, color);
    }

    /// Queue a clip for the host to play after the frame
    pub fn play_sound(&mut self, clip: &AudioClip) {
        self.sounds.push(clip.clone());
    }

    /// Queue the clip registered as `name` (silence if unknown)
    pub fn play(&mut self, name: &str) {
        let clip = self.assets.get_audio(name);
        self.sounds.push(clip);
    }

    pub fn assets(&mut self) -> &mut AssetRegistry {
        &mut *self.assets
    }

    pub fn input(&self) -> &InputState {
        self.input
    }

    pub fn state(&self) -> &S {
        &*self.state
    }

    pub fn state_mut(&mut self) -> &mut S {
        &mut *self.state
    }
}

/// Read-only view for the draw phase
pub struct DrawCtx<'a, S: 'static> {
    id: EntityId,
    world: &'a World<S>,
    state: &'a S,
}

impl<'a, S: 'static> DrawCtx<'a, S> {
    pub(crate) fn new(id: EntityId, world: &'a World<S>, state: &'a S) -> Self {
        Self { id, world, state }
    }

    #[inline]
    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn entity(&self) -> Option<&Entity<S>> {
        self.world.get(self.id)
    }

    pub fn world(&self) -> &World<S> {
        self.world
    }

    pub fn state(&self) -> &S {
        self.state
    }

    pub fn position(&self) -> Option<Vec2> {
        self.world.global_position(self.id)
    }

    pub fn aabb(&self) -> Option<Aabb> {
        self.world.world_aabb(self.id)
    }

    /// Paint the entity's sprite over its world box. Skipped silently when
    /// either is missing.
    pub fn draw_sprite(&self, surface: &mut dyn Surface) {
        let Some(sprite) = self.entity().and_then(|e| e.sprite.as_ref()) else {
            return;
        };
        if let Some(dest) = self.aabb() {
            sprite.draw(surface, dest);
        }
    }
}
