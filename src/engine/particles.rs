//! Fading circular particles
//!
//! Particles are plain values kept outside the entity arena, so the
//! collision pass never sees them.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::consts::*;
use crate::renderer::{Color, Surface};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Seconds left
    pub life: f32,
    pub max_life: f32,
    /// Radius in pixels
    pub size: f32,
    pub color: Color,
}

impl Particle {
    pub fn new(pos: Vec2, vel: Vec2, life: f32, size: f32, color: Color) -> Self {
        Self {
            pos,
            vel,
            life,
            max_life: life,
            size,
            color,
        }
    }

    /// Linear fade, 1 at birth to 0 at death
    pub fn alpha(&self) -> f32 {
        if self.max_life <= 0.0 {
            return 0.0;
        }
        (self.life / self.max_life).max(0.0)
    }

    #[inline]
    pub fn is_dead(&self) -> bool {
        self.life <= 0.0
    }

    pub fn update(&mut self, dt: f32) {
        self.life -= dt;
        self.pos += self.vel * dt;
    }
}

pub struct ParticleSystem {
    particles: Vec<Particle>,
    rng: Pcg32,
    max_particles: usize,
}

impl ParticleSystem {
    pub fn new(seed: u64, max_particles: usize) -> Self {
        Self {
            particles: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
            max_particles,
        }
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Add one particle; ignored when the cap is reached
    pub fn spawn(&mut self, particle: Particle) -> bool {
        if self.particles.len() >= self.max_particles {
            return false;
        }
        self.particles.push(particle);
        true
    }

    /// Burst of `count` particles at `pos` with random heading, speed,
    /// lifetime and size. Returns how many were actually spawned.
    pub fn emit(&mut self, pos: Vec2, count: usize, color: Color) -> usize {
        let room = self.max_particles.saturating_sub(self.particles.len());
        let count = count.min(room);
        for _ in 0..count {
            let angle = self.rng.random_range(0.0..std::f32::consts::TAU);
            let speed = self.rng.random_range(PARTICLE_SPEED_MIN..PARTICLE_SPEED_MAX);
            let life = self.rng.random_range(PARTICLE_LIFE_MIN..PARTICLE_LIFE_MAX);
            let size = self.rng.random_range(PARTICLE_SIZE_MIN..PARTICLE_SIZE_MAX);
            let vel = Vec2::new(angle.cos(), angle.sin()) * speed;
            self.particles.push(Particle::new(pos, vel, life, size, color));
        }
        count
    }

    /// Age and move every particle, dropping the dead ones
    pub fn update(&mut self, dt: f32) {
        for particle in &mut self.particles {
            particle.update(dt);
        }
        self.particles.retain(|p| !p.is_dead());
    }

    pub fn draw(&self, surface: &mut dyn Surface) {
        for p in &self.particles {
            surface.fill_circle(p.pos, p.size, p.color.with_alpha(p.alpha()));
        }
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::{DrawCommand, RecordingSurface};

    #[test]
    fn test_particle_fades_and_dies() {
        let mut system = ParticleSystem::new(1, 16);
        system.spawn(Particle::new(Vec2::ZERO, Vec2::new(10.0, 0.0), 0.5, 3.0, Color::WHITE));

        system.update(0.25);
        let p = system.particles()[0];
        assert!((p.alpha() - 0.5).abs() < 1e-6);
        assert!((p.pos.x - 2.5).abs() < 1e-5);

        let mut system = ParticleSystem::new(1, 16);
        system.spawn(Particle::new(Vec2::ZERO, Vec2::ZERO, 0.5, 3.0, Color::WHITE));
        system.update(0.6);
        assert!(system.is_empty());
        let mut surface = RecordingSurface::new(100.0, 100.0);
        system.draw(&mut surface);
        assert!(surface.commands().is_empty());
    }

    #[test]
    fn test_alpha_clamped() {
        let mut p = Particle::new(Vec2::ZERO, Vec2::ZERO, 1.0, 2.0, Color::WHITE);
        p.update(3.0);
        assert_eq!(p.alpha(), 0.0);
    }

    #[test]
    fn test_emit_uses_configured_ranges() {
        let mut system = ParticleSystem::new(42, 1000);
        assert_eq!(system.emit(Vec2::new(5.0, 5.0), 200, Color::ORANGE), 200);
        for p in system.particles() {
            let speed = p.vel.length();
            assert!(speed >= PARTICLE_SPEED_MIN - 1e-3 && speed < PARTICLE_SPEED_MAX + 1e-3);
            assert!(p.life >= PARTICLE_LIFE_MIN && p.life < PARTICLE_LIFE_MAX);
            assert!(p.size >= PARTICLE_SIZE_MIN && p.size < PARTICLE_SIZE_MAX);
            assert_eq!(p.pos, Vec2::new(5.0, 5.0));
            assert_eq!(p.max_life, p.life);
        }
    }

    #[test]
    fn test_emit_is_deterministic_per_seed() {
        let mut a = ParticleSystem::new(7, 100);
        let mut b = ParticleSystem::new(7, 100);
        a.emit(Vec2::ZERO, 10, Color::YELLOW);
        b.emit(Vec2::ZERO, 10, Color::YELLOW);
        assert_eq!(a.particles(), b.particles());
    }

    #[test]
    fn test_cap_limits_emission() {
        let mut system = ParticleSystem::new(3, 5);
        assert_eq!(system.emit(Vec2::ZERO, 3, Color::WHITE), 3);
        assert_eq!(system.emit(Vec2::ZERO, 3, Color::WHITE), 2);
        assert!(!system.spawn(Particle::new(Vec2::ZERO, Vec2::ZERO, 1.0, 1.0, Color::WHITE)));
        assert_eq!(system.len(), 5);
    }

    #[test]
    fn test_draw_emits_faded_circles() {
        let mut system = ParticleSystem::new(1, 16);
        system.spawn(Particle::new(Vec2::new(1.0, 2.0), Vec2::ZERO, 1.0, 4.0, Color::RED));
        system.update(0.5);
        let mut surface = RecordingSurface::new(100.0, 100.0);
        system.draw(&mut surface);
        match surface.commands() {
            [DrawCommand::Circle { center, radius, color }] => {
                assert_eq!(*center, Vec2::new(1.0, 2.0));
                assert_eq!(*radius, 4.0);
                assert!((color.a - 0.5).abs() < 1e-6);
            }
            other => panic!("unexpected commands: {:?}", other),
        }
    }
}
