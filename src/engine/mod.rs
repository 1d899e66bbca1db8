//! Engine core
//!
//! Everything that runs inside a frame lives here:
//! - Entity arena with stable ids and parent/child links
//! - Fixed-order frame loop (update, collide, cleanup, draw)
//! - AABB collision with layer/mask filtering
//! - Countdown timers and fading particles

pub mod aabb;
pub mod collider;
pub mod collision;
pub mod context;
pub mod entity;
pub mod game;
pub mod particles;
pub mod timer;
pub mod world;

pub use aabb::Aabb;
pub use collider::Collider;
pub use collision::{Contact, detect_contacts};
pub use context::{Ctx, DrawCtx};
pub use entity::{AsAny, Behavior, Entity, Plain, Sprite};
pub use game::Game;
pub use particles::{Particle, ParticleSystem};
pub use timer::{Timer, TimerNode, TimerState};
pub use world::{EntityId, World};
