//! Frame loop
//!
//! Each frame runs UPDATE → COLLIDE → CLEANUP → DRAW to completion:
//! 1. every live entity is updated in traversal order
//! 2. contacts are detected over the live colliders and dispatched
//! 3. dead entities are removed, queued spawns attached, particles aged
//! 4. the surface is cleared and every live entity, then every particle, drawn

use std::any::Any;

use glam::Vec2;

use super::aabb::Aabb;
use super::collision::detect_contacts;
use super::context::{Ctx, DrawCtx};
use super::entity::Entity;
use super::particles::ParticleSystem;
use super::world::{EntityId, World};
use crate::assets::{AssetRegistry, AudioClip};
use crate::platform::{FrameClock, InputState};
use crate::renderer::{Color, Surface, TextAlign};
use crate::settings::EngineSettings;

/// Which hook to run on a checked-out behavior
enum Hook {
    Update(f32),
    Collision(EntityId),
}

pub struct Game<S: 'static> {
    pub name: String,
    settings: EngineSettings,
    world: World<S>,
    particles: ParticleSystem,
    clock: FrameClock,
    input: InputState,
    assets: AssetRegistry,
    sounds: Vec<AudioClip>,
    state: S,
    paused: bool,
    frame: u64,
}

impl<S: 'static> Game<S> {
    pub fn new(name: impl Into<String>, settings: EngineSettings, state: S) -> Self {
        let name = name.into();
        log::info!("Starting game '{}' ({}x{})", name, settings.width, settings.height);
        Self {
            name,
            particles: ParticleSystem::new(settings.rng_seed, settings.max_particles),
            clock: FrameClock::new(settings.max_frame_dt),
            settings,
            world: World::new(),
            input: InputState::default(),
            assets: AssetRegistry::new(),
            sounds: Vec::new(),
            state,
            paused: false,
            frame: 0,
        }
    }

    /// Register a top-level entity. Takes part from the next frame on.
    pub fn add_entity(&mut self, entity: Entity<S>) -> EntityId {
        self.world.insert(entity)
    }

    /// Attach `entity` under `parent`. None if the parent does not exist.
    pub fn add_child(&mut self, parent: EntityId, entity: Entity<S>) -> Option<EntityId> {
        self.world.insert_child(parent, entity)
    }

    /// Mark an entity dead; it is removed at the next cleanup
    pub fn delete_entity(&mut self, id: EntityId) -> bool {
        self.world.kill(id)
    }

    pub fn entity(&self, id: EntityId) -> Option<&Entity<S>> {
        self.world.get(id)
    }

    pub fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity<S>> {
        self.world.get_mut(id)
    }

    pub fn behavior<T: Any>(&self, id: EntityId) -> Option<&T> {
        self.world.behavior::<T>(id)
    }

    pub fn behavior_mut<T: Any>(&mut self, id: EntityId) -> Option<&mut T> {
        self.world.behavior_mut::<T>(id)
    }

    pub fn world(&self) -> &World<S> {
        &self.world
    }

    /// Entities currently stored (dead ones linger until cleanup)
    pub fn entity_count(&self) -> usize {
        self.world.len()
    }

    /// Closest live, positioned entity whose name passes `filter`
    pub fn nearest_entity(&self, point: Vec2, filter: impl Fn(&str) -> bool) -> Option<EntityId> {
        self.world.nearest(point, filter)
    }

    pub fn state(&self) -> &S {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut S {
        &mut self.state
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    pub fn input(&self) -> &InputState {
        &self.input
    }

    /// The host writes key presses/releases here
    pub fn input_mut(&mut self) -> &mut InputState {
        &mut self.input
    }

    pub fn assets(&self) -> &AssetRegistry {
        &self.assets
    }

    pub fn assets_mut(&mut self) -> &mut AssetRegistry {
        &mut self.assets
    }

    pub fn particles(&self) -> &ParticleSystem {
        &self.particles
    }

    pub fn particles_mut(&mut self) -> &mut ParticleSystem {
        &mut self.particles
    }

    /// Clips queued by entities since the last call
    pub fn drain_sounds(&mut self) -> Vec<AudioClip> {
        std::mem::take(&mut self.sounds)
    }

    /// Stop updating; frames keep drawing
    pub fn pause(&mut self) {
        if !self.paused {
            log::info!("Game '{}' paused", self.name);
        }
        self.paused = true;
    }

    pub fn resume(&mut self) {
        if self.paused {
            log::info!("Game '{}' resumed", self.name);
        }
        self.paused = false;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Frames advanced so far
    pub fn frame_count(&self) -> u64 {
        self.frame
    }

    pub fn fps(&self) -> f32 {
        self.clock.fps()
    }

    /// Host frame callback: derive dt from `timestamp_ms`, update, draw.
    /// Returns the dt used.
    pub fn advance(&mut self, timestamp_ms: f64, surface: &mut dyn Surface) -> f32 {
        let dt = self.clock.tick(timestamp_ms);
        self.frame += 1;
        self.update(dt);
        self.draw(surface);
        dt
    }

    /// Update, collision and cleanup phases
    pub fn update(&mut self, dt: f32) {
        if self.paused {
            return;
        }

        for id in self.world.traverse() {
            // Killed earlier this frame (directly or via an ancestor)
            if !self.world.is_live(id) {
                continue;
            }
            self.run_hook(id, Hook::Update(dt));
        }

        self.collide();

        let removed = self.world.remove_dead();
        let spawned = self.world.commit_pending();
        if removed > 0 || spawned > 0 {
            log::debug!(
                "Frame {}: removed {} entities, spawned {}",
                self.frame,
                removed,
                spawned
            );
        }

        self.particles.update(dt);
    }

    /// Detect all contacts, then notify each reacting side. Pairs where
    /// either side died earlier in the pass are skipped.
    fn collide(&mut self) {
        for contact in detect_contacts(&self.world) {
            if contact.a_reacts && self.both_live(contact.a, contact.b) {
                self.run_hook(contact.a, Hook::Collision(contact.b));
            }
            if contact.b_reacts && self.both_live(contact.a, contact.b) {
                self.run_hook(contact.b, Hook::Collision(contact.a));
            }
        }
    }

    fn both_live(&self, a: EntityId, b: EntityId) -> bool {
        self.world.is_live(a) && self.world.is_live(b)
    }

    /// Check the behavior out of the arena, run it with a frame context,
    /// and put it back.
    fn run_hook(&mut self, id: EntityId, hook: Hook) {
        let Some(mut behavior) = self.world.take_behavior(id) else {
            return;
        };
        {
            let mut ctx = Ctx::new(
                id,
                &mut self.world,
                &mut self.particles,
                &mut self.sounds,
                &mut self.assets,
                &self.input,
                &mut self.state,
            );
            match hook {
                Hook::Update(dt) => behavior.update(&mut ctx, dt),
                Hook::Collision(other) => behavior.on_collision(&mut ctx, other),
            }
        }
        self.world.restore_behavior(id, behavior);
    }

    /// Draw phase: clear, entities in order, particles, debug overlay
    pub fn draw(&self, surface: &mut dyn Surface) {
        let (w, h) = (surface.width(), surface.height());
        surface.fill_rect(
            Aabb::new(w / 2.0, h / 2.0, w, h),
            self.settings.clear_color,
        );

        for id in self.world.traverse() {
            let Some(behavior) = self.world.get(id).and_then(|e| e.behavior.as_deref()) else {
                continue;
            };
            let ctx = DrawCtx::new(id, &self.world, &self.state);
            behavior.draw(&ctx, surface);
        }

        self.particles.draw(surface);

        if self.settings.show_debug_overlay {
            self.draw_debug_overlay(surface, w, h);
        }
    }

    fn draw_debug_overlay(&self, surface: &mut dyn Surface, w: f32, h: f32) {
        let fps = format!("FPS: {}", self.fps() as u32);
        let count = format!("#Obj: {}", self.world.len() + self.particles.len());
        let align = TextAlign::BOTTOM_RIGHT;
        surface.draw_text(&fps, Vec2::new(w - 10.0, h - 60.0), 24.0, align, Color::RED);
        surface.draw_text(&count, Vec2::new(w - 10.0, h - 30.0), 24.0, align, Color::RED);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{Behavior, Collider, Sprite, Timer, TimerNode};
    use crate::renderer::{DrawCommand, RecordingSurface};

    /// Records every collision it sees
    #[derive(Default)]
    struct Probe {
        hits: Vec<EntityId>,
        updates: u32,
    }

    impl Behavior<()> for Probe {
        fn update(&mut self, _ctx: &mut Ctx<'_, ()>, _dt: f32) {
            self.updates += 1;
        }

        fn on_collision(&mut self, _ctx: &mut Ctx<'_, ()>, other: EntityId) {
            self.hits.push(other);
        }
    }

    fn game() -> Game<()> {
        let settings = EngineSettings {
            show_debug_overlay: false,
            ..EngineSettings::default()
        };
        Game::new("Test", settings, ())
    }

    fn probe_at(x: f32, layer: u8, mask: u32) -> Entity<()> {
        Entity::new("Probe")
            .with_collider(
                Collider::new(Aabb::new(x, 0.0, 10.0, 10.0))
                    .with_layer(layer)
                    .with_mask(mask),
            )
            .with_behavior(Probe::default())
    }

    fn hits(game: &Game<()>, id: EntityId) -> Vec<EntityId> {
        game.behavior::<Probe>(id).map(|p| p.hits.clone()).unwrap_or_default()
    }

    #[test]
    fn test_overlap_fires_once_per_frame() {
        let mut game = game();
        let a = game.add_entity(probe_at(0.0, 0, 0b1));
        let b = game.add_entity(probe_at(5.0, 0, 0));

        game.update(0.016);
        assert_eq!(hits(&game, a), vec![b]);
        assert!(hits(&game, b).is_empty());

        game.update(0.016);
        assert_eq!(hits(&game, a), vec![b, b]);

        game.entity_mut(b).unwrap().set_position(Vec2::new(100.0, 0.0));
        game.update(0.016);
        assert_eq!(hits(&game, a).len(), 2);
    }

    #[test]
    fn test_collision_is_symmetric_when_both_masks_agree() {
        let mut game = game();
        let a = game.add_entity(probe_at(0.0, 0, 0b1));
        let b = game.add_entity(probe_at(5.0, 0, 0b1));
        game.update(0.016);
        assert_eq!(hits(&game, a), vec![b]);
        assert_eq!(hits(&game, b), vec![a]);
    }

    /// Kills itself on its first update
    struct Doomed;

    impl Behavior<()> for Doomed {
        fn update(&mut self, ctx: &mut Ctx<'_, ()>, _dt: f32) {
            ctx.kill_self();
        }
    }

    #[test]
    fn test_entity_killed_in_update_skips_collision_and_draw() {
        let mut game = game();
        let probe = game.add_entity(probe_at(0.0, 0, 0b1));
        let image = game.assets().placeholder();
        let doomed = game.add_entity(
            Entity::new("Doomed")
                .with_collider(Collider::new(Aabb::new(0.0, 0.0, 10.0, 10.0)))
                .with_sprite(Sprite::new(image))
                .with_behavior(Doomed),
        );

        let mut surface = RecordingSurface::new(200.0, 200.0);
        game.advance(0.0, &mut surface);

        assert!(hits(&game, probe).is_empty());
        assert!(game.entity(doomed).is_none());
        assert_eq!(game.entity_count(), 1);
        assert!(surface.commands().iter().all(|c| !matches!(c, DrawCommand::Image { .. })));
    }

    /// Kills the victim on contact
    struct Killer;

    impl Behavior<()> for Killer {
        fn on_collision(&mut self, ctx: &mut Ctx<'_, ()>, other: EntityId) {
            if ctx.name_of(other) == Some("Victim") {
                ctx.kill(other);
            }
        }
    }

    #[test]
    fn test_victim_killed_in_pass_gets_no_further_contacts() {
        let mut game = game();
        let killer = game.add_entity(
            Entity::new("Killer")
                .with_collider(Collider::new(Aabb::new(0.0, 0.0, 10.0, 10.0)).with_mask(0b1))
                .with_behavior(Killer),
        );
        let mut victim = probe_at(2.0, 0, 0b1);
        victim.name = "Victim".into();
        let victim = game.add_entity(victim);
        let bystander = game.add_entity(probe_at(4.0, 0, 0b1));
        game.update(0.016);

        assert!(game.entity(victim).is_none());
        // The victim's pending contact with the bystander is dropped
        assert_eq!(hits(&game, bystander), vec![killer]);
    }

    /// Spawns a probe on every update
    struct Spawner;

    impl Behavior<()> for Spawner {
        fn update(&mut self, ctx: &mut Ctx<'_, ()>, _dt: f32) {
            ctx.spawn(probe_at(0.0, 0, 0b1));
        }
    }

    #[test]
    fn test_spawned_entities_join_next_frame() {
        let mut game = game();
        let target = game.add_entity(probe_at(0.0, 0, 0b1));
        game.add_entity(Entity::new("Spawner").with_behavior(Spawner));

        game.update(0.016);
        // Spawned after update: no contact yet, but stored now
        assert!(hits(&game, target).is_empty());
        assert_eq!(game.entity_count(), 3);

        game.update(0.016);
        assert_eq!(hits(&game, target).len(), 1);
    }

    #[test]
    fn test_draw_order_is_registration_order() {
        let mut game = game();
        let image = game.assets().placeholder();
        for x in [10.0, 30.0, 50.0] {
            game.add_entity(
                Entity::new("Tile")
                    .with_collider(Collider::new(Aabb::new(x, 10.0, 10.0, 10.0)))
                    .with_sprite(Sprite::new(image.clone())),
            );
        }
        // Sprite without collider is silently skipped
        game.add_entity(Entity::new("Floating").with_sprite(Sprite::new(image)));

        let mut surface = RecordingSurface::new(100.0, 100.0);
        game.draw(&mut surface);
        let xs: Vec<f32> = surface
            .commands()
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Image { dest, .. } => Some(dest.center().x),
                _ => None,
            })
            .collect();
        assert_eq!(xs, vec![10.0, 30.0, 50.0]);
        assert_eq!(surface.images(), 3);
        assert!(matches!(surface.commands()[0], DrawCommand::Rect { .. }));
    }

    #[test]
    fn test_pause_freezes_update_but_draws() {
        let mut game = game();
        let a = game.add_entity(probe_at(0.0, 0, 0));
        game.pause();
        let mut surface = RecordingSurface::new(10.0, 10.0);
        game.advance(0.0, &mut surface);
        game.advance(16.0, &mut surface);
        assert_eq!(game.behavior::<Probe>(a).map(|p| p.updates), Some(0));
        assert!(!surface.commands().is_empty());
        game.resume();
        game.advance(32.0, &mut surface);
        assert_eq!(game.behavior::<Probe>(a).map(|p| p.updates), Some(1));
    }

    #[test]
    fn test_advance_computes_dt_from_timestamps() {
        let mut game = game();
        let mut surface = RecordingSurface::new(10.0, 10.0);
        assert_eq!(game.advance(1000.0, &mut surface), 0.0);
        let dt = game.advance(1016.0, &mut surface);
        assert!((dt - 0.016).abs() < 1e-6);
        assert_eq!(game.advance(900.0, &mut surface), 0.0);
        assert_eq!(game.frame_count(), 3);
    }

    #[test]
    fn test_particles_are_drawn_after_entities_and_expire() {
        let mut game = game();
        game.particles_mut().emit(Vec2::new(5.0, 5.0), 4, Color::ORANGE);
        let mut surface = RecordingSurface::new(10.0, 10.0);
        game.draw(&mut surface);
        assert_eq!(surface.circles(), 4);

        game.update(1.0);
        surface.clear();
        game.draw(&mut surface);
        assert_eq!(surface.circles(), 0);
    }

    #[test]
    fn test_timer_node_kills_parent() {
        let mut game = game();
        let item = game.add_entity(Entity::new("Item"));
        let despawn = TimerNode::new(Timer::one_shot(1.0), |ctx: &mut Ctx<'_, ()>| {
            if let Some(parent) = ctx.entity().and_then(|e| e.parent()) {
                ctx.kill(parent);
            }
        });
        game.add_child(item, Entity::new("Despawn").with_behavior(despawn));

        game.update(0.5);
        assert!(game.entity(item).is_some());
        game.update(0.6);
        assert!(game.entity(item).is_none());
        assert_eq!(game.entity_count(), 0);
    }

    #[test]
    fn test_debug_overlay() {
        let mut game = Game::new("Overlay", EngineSettings::default(), ());
        game.add_entity(Entity::new("One"));
        let mut surface = RecordingSurface::new(640.0, 480.0);
        game.advance(0.0, &mut surface);
        assert!(surface.texts().iter().any(|t| *t == "#Obj: 1"));
    }

    #[test]
    fn test_sound_queue_drains() {
        struct Noisy;
        impl Behavior<()> for Noisy {
            fn update(&mut self, ctx: &mut Ctx<'_, ()>, _dt: f32) {
                ctx.play("Boom");
            }
        }
        let mut game = game();
        game.add_entity(Entity::new("Noisy").with_behavior(Noisy));
        game.update(0.016);
        let sounds = game.drain_sounds();
        assert_eq!(sounds.len(), 1);
        assert!(sounds[0].is_silent());
        assert!(game.drain_sounds().is_empty());
    }
}
