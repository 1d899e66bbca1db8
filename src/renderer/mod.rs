//! Rendering interface
//!
//! The engine never talks to a graphics API directly. The host hands the
//! draw phase a [`Surface`]; `RecordingSurface` is the headless one used
//! by tests and the demo binary.

pub mod color;
pub mod recording;
pub mod surface;

pub use color::Color;
pub use recording::{DrawCommand, RecordingSurface};
pub use surface::{HAlign, Surface, TextAlign, VAlign};
