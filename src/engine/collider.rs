//! Layered colliders
//!
//! A collider pairs a box with the layer it lives on and a bitmask of
//! the layers it reacts to.

use serde::{Deserialize, Serialize};

use super::aabb::Aabb;
use crate::consts::{DEFAULT_COLLISION_MASK, MAX_LAYER};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "ColliderDef")]
pub struct Collider {
    pub aabb: Aabb,
    layer: u8,
    pub mask: u32,
}

/// Serialized form; the layer is clamped on the way in
#[derive(Deserialize)]
struct ColliderDef {
    aabb: Aabb,
    layer: u8,
    mask: u32,
}

impl From<ColliderDef> for Collider {
    fn from(def: ColliderDef) -> Self {
        Collider::new(def.aabb)
            .with_layer(def.layer)
            .with_mask(def.mask)
    }
}

impl Collider {
    /// Collider on layer 0 reacting to layers 0-3
    pub fn new(aabb: Aabb) -> Self {
        Self {
            aabb,
            layer: 0,
            mask: DEFAULT_COLLISION_MASK,
        }
    }

    /// Put the collider on `layer`. Values above 31 are clamped.
    pub fn with_layer(mut self, layer: u8) -> Self {
        if layer > MAX_LAYER {
            log::warn!("Collision layer {} out of range, clamping to {}", layer, MAX_LAYER);
        }
        self.layer = layer.min(MAX_LAYER);
        self
    }

    pub fn with_mask(mut self, mask: u32) -> Self {
        self.mask = mask;
        self
    }

    #[inline]
    pub fn layer(&self) -> u8 {
        self.layer
    }

    /// Bit this collider occupies in other colliders' masks
    #[inline]
    pub fn layer_bit(&self) -> u32 {
        1u32 << self.layer
    }

    /// Whether this collider reacts to `other` (one direction only)
    #[inline]
    pub fn can_collide_with(&self, other: &Collider) -> bool {
        self.mask & other.layer_bit() != 0
    }
}
