//! Axis-aligned bounding boxes
//!
//! Boxes are built from a center and full width/height but stored as
//! min/max corners; center and size are always derived.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle. Invariant: `min <= max` on both axes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "Corners")]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

/// Serialized form; corners are reordered on the way in
#[derive(Deserialize)]
struct Corners {
    min: Vec2,
    max: Vec2,
}

impl From<Corners> for Aabb {
    fn from(c: Corners) -> Self {
        Self {
            min: c.min.min(c.max),
            max: c.min.max(c.max),
        }
    }
}

impl Aabb {
    /// Box centered at `(cx, cy)` with the given width and height
    pub fn new(cx: f32, cy: f32, width: f32, height: f32) -> Self {
        Self::from_center(Vec2::new(cx, cy), width, height)
    }

    /// Negative extents are taken by magnitude so the corners stay ordered.
    pub fn from_center(center: Vec2, width: f32, height: f32) -> Self {
        let half = Vec2::new(width.abs(), height.abs()) / 2.0;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Shift both corners, shape is preserved
    #[inline]
    pub fn translate(&mut self, delta: Vec2) {
        self.min += delta;
        self.max += delta;
    }

    /// Copy of this box shifted by `delta`
    #[inline]
    pub fn translated(&self, delta: Vec2) -> Self {
        let mut b = *self;
        b.translate(delta);
        b
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) / 2.0
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    /// Move the box so its center lands on `center`
    pub fn set_center(&mut self, center: Vec2) {
        let delta = center - self.center();
        self.translate(delta);
    }

    /// Strict overlap test. Boxes that only share an edge do not intersect.
    #[inline]
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }

    /// Point containment, edges included
    pub fn contains_point(&self, point: Vec2) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
    }
}
