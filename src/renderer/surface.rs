//! The drawing context exposed by the host

use glam::Vec2;

use super::color::Color;
use crate::assets::ImageHandle;
use crate::engine::Aabb;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HAlign {
    #[default]
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VAlign {
    #[default]
    Top,
    Middle,
    Bottom,
}

/// Anchor of a text run relative to its position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextAlign {
    pub h: HAlign,
    pub v: VAlign,
}

impl TextAlign {
    pub const BOTTOM_RIGHT: TextAlign = TextAlign {
        h: HAlign::Right,
        v: VAlign::Bottom,
    };
}

/// A 2D drawing target. Coordinates are pixels, y pointing down.
pub trait Surface {
    fn width(&self) -> f32;
    fn height(&self) -> f32;

    fn fill_rect(&mut self, rect: Aabb, color: Color);

    /// Stretch `image` over `dest`, rotated by `rotation` radians about the
    /// center of `dest`
    fn draw_image(&mut self, image: &ImageHandle, dest: Aabb, rotation: f32);

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color);

    fn draw_text(&mut self, text: &str, pos: Vec2, size: f32, align: TextAlign, color: Color);
}
