//! ToMiGE - a minimal 2D game engine
//!
//! Core modules:
//! - `engine`: Frame loop, entity arena, AABB collision, timers, particles
//! - `renderer`: Render surface interface and a headless recording surface
//! - `platform`: Host-facing input map and frame clock
//! - `assets`: Name-keyed image/audio registry with lazy file loading
//! - `settings`: Engine configuration

pub mod assets;
pub mod engine;
pub mod platform;
pub mod renderer;
pub mod settings;

pub use assets::{AssetError, AssetRegistry, AudioClip, ImageData, ImageHandle};
pub use settings::{EngineSettings, SettingsError};

use glam::Vec2;

/// Engine configuration constants
pub mod consts {
    /// Layers a collider reacts to unless told otherwise (layers 0-3)
    pub const DEFAULT_COLLISION_MASK: u32 = 0b1111;
    /// Highest valid collision layer
    pub const MAX_LAYER: u8 = 31;

    /// Longest frame the clock will report (seconds)
    pub const DEFAULT_MAX_FRAME_DT: f32 = 0.25;

    /// Particle speed range (pixels/s)
    pub const PARTICLE_SPEED_MIN: f32 = 50.0;
    pub const PARTICLE_SPEED_MAX: f32 = 250.0;
    /// Particle lifetime range (seconds)
    pub const PARTICLE_LIFE_MIN: f32 = 0.3;
    pub const PARTICLE_LIFE_MAX: f32 = 0.8;
    /// Particle radius range (pixels)
    pub const PARTICLE_SIZE_MIN: f32 = 2.0;
    pub const PARTICLE_SIZE_MAX: f32 = 5.0;
    /// Default particle cap
    pub const MAX_PARTICLES: usize = 2000;
}

/// Unit vector pointing from `from` to `to`.
///
/// Coincident points produce NaN components; callers must guard.
#[inline]
pub fn direction_to(from: Vec2, to: Vec2) -> Vec2 {
    let d = to - from;
    d / d.length()
}

/// Squared euclidean distance between two points
#[inline]
pub fn distance_squared(a: Vec2, b: Vec2) -> f32 {
    (b - a).length_squared()
}
