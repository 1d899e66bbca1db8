//! Entities and their behaviors
//!
//! An entity is a named record that may own a collider and a sprite. What it
//! does each frame is supplied by a [`Behavior`]; the record itself only
//! carries the data the frame loop needs (liveness, geometry, hierarchy).

use std::any::Any;
use std::fmt;

use glam::Vec2;

use super::aabb::Aabb;
use super::collider::Collider;
use super::context::{Ctx, DrawCtx};
use super::world::EntityId;
use crate::assets::ImageHandle;
use crate::renderer::Surface;

/// Downcasting support for boxed behaviors
pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Per-kind entity logic.
///
/// `S` is the game's shared state, reachable through the context. Every hook
/// has a default, so a kind only implements what it reacts to.
pub trait Behavior<S: 'static>: AsAny {
    /// Called once per frame while the entity is live
    fn update(&mut self, _ctx: &mut Ctx<'_, S>, _dt: f32) {}

    /// Called when this entity's mask admits `other`'s layer and their boxes overlap
    fn on_collision(&mut self, _ctx: &mut Ctx<'_, S>, _other: EntityId) {}

    /// Paints the entity. Default: sprite stretched over the collider box.
    fn draw(&self, ctx: &DrawCtx<'_, S>, surface: &mut dyn Surface) {
        ctx.draw_sprite(surface);
    }
}

/// Behavior of entities that only carry data
#[derive(Debug, Clone, Copy, Default)]
pub struct Plain;

impl<S: 'static> Behavior<S> for Plain {}

/// An image drawn over a box, optionally rotated about the box center
#[derive(Debug, Clone)]
pub struct Sprite {
    pub image: ImageHandle,
    /// Radians, clockwise in screen space
    pub rotation: f32,
}

impl Sprite {
    pub fn new(image: ImageHandle) -> Self {
        Self { image, rotation: 0.0 }
    }

    pub fn draw(&self, surface: &mut dyn Surface, dest: Aabb) {
        surface.draw_image(&self.image, dest, self.rotation);
    }
}

pub struct Entity<S: 'static> {
    pub name: String,
    alive: bool,
    pub collider: Option<Collider>,
    pub sprite: Option<Sprite>,
    pub(crate) parent: Option<EntityId>,
    pub(crate) children: Vec<EntityId>,
    /// `None` only while the frame loop is running one of its hooks
    pub(crate) behavior: Option<Box<dyn Behavior<S>>>,
}

impl<S: 'static> Entity<S> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            alive: true,
            collider: None,
            sprite: None,
            parent: None,
            children: Vec::new(),
            behavior: Some(Box::new(Plain)),
        }
    }

    pub fn with_collider(mut self, collider: Collider) -> Self {
        self.collider = Some(collider);
        self
    }

    pub fn with_sprite(mut self, sprite: Sprite) -> Self {
        self.sprite = Some(sprite);
        self
    }

    pub fn with_behavior(mut self, behavior: impl Behavior<S> + 'static) -> Self {
        self.behavior = Some(Box::new(behavior));
        self
    }
}

impl<S: 'static> Entity<S> {
    #[inline]
    pub fn is_alive(&self) -> bool {
        self.alive
    }

    /// Soft delete; the loop removes the entity at the next cleanup
    pub fn kill(&mut self) {
        self.alive = false;
    }

    /// Center of the collider box, relative to the parent (if any)
    pub fn position(&self) -> Option<Vec2> {
        self.collider.as_ref().map(|c| c.aabb.center())
    }

    /// Re-center the collider box. No-op without a collider.
    pub fn set_position(&mut self, pos: Vec2) {
        if let Some(collider) = self.collider.as_mut() {
            collider.aabb.set_center(pos);
        }
    }

    /// Move the collider box. No-op without a collider.
    pub fn translate(&mut self, delta: Vec2) {
        if let Some(collider) = self.collider.as_mut() {
            collider.aabb.translate(delta);
        }
    }

    pub fn parent(&self) -> Option<EntityId> {
        self.parent
    }

    pub fn children(&self) -> &[EntityId] {
        &self.children
    }

    /// Typed view of the behavior (None for other kinds, or while it runs)
    pub fn behavior<T: Any>(&self) -> Option<&T> {
        self.behavior.as_deref()?.as_any().downcast_ref::<T>()
    }

    pub fn behavior_mut<T: Any>(&mut self) -> Option<&mut T> {
        self.behavior.as_deref_mut()?.as_any_mut().downcast_mut::<T>()
    }

    /// Whether the behavior is of kind `T`
    pub fn is<T: Any>(&self) -> bool {
        self.behavior::<T>().is_some()
    }
}

impl<S: 'static> fmt::Debug for Entity<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entity")
            .field("name", &self.name)
            .field("alive", &self.alive)
            .field("collider", &self.collider)
            .field("parent", &self.parent)
            .field("children", &self.children)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Walker {
        steps: u32,
    }

    impl Behavior<()> for Walker {}

    #[test]
    fn test_position_follows_collider() {
        let mut e: Entity<()> = Entity::new("Box");
        assert_eq!(e.position(), None);
        e.set_position(Vec2::new(3.0, 4.0));
        assert_eq!(e.position(), None);

        let mut e: Entity<()> =
            Entity::new("Box").with_collider(Collider::new(Aabb::new(0.0, 0.0, 16.0, 16.0)));
        e.set_position(Vec2::new(3.0, 4.0));
        assert_eq!(e.position(), Some(Vec2::new(3.0, 4.0)));
        e.translate(Vec2::new(1.0, -1.0));
        assert_eq!(e.position(), Some(Vec2::new(4.0, 3.0)));
        assert_eq!(e.collider.map(|c| c.aabb.size()), Some(Vec2::new(16.0, 16.0)));
    }

    #[test]
    fn test_behavior_downcast() {
        let mut e: Entity<()> = Entity::new("Walker").with_behavior(Walker { steps: 2 });
        assert!(e.is::<Walker>());
        assert!(!e.is::<Plain>());
        if let Some(w) = e.behavior_mut::<Walker>() {
            w.steps += 1;
        }
        assert_eq!(e.behavior::<Walker>().map(|w| w.steps), Some(3));
    }

    #[test]
    fn test_kill_is_soft() {
        let mut e: Entity<()> = Entity::new("Doomed");
        assert!(e.is_alive());
        e.kill();
        assert!(!e.is_alive());
        assert_eq!(e.name, "Doomed");
    }
}
