//! Platform abstraction layer
//!
//! Host-facing pieces the core reads from:
//! - Time: frame clock turning host timestamps into dt
//! - Input: held-key map written by the host's key events

pub mod clock;
pub mod input;

pub use clock::FrameClock;
pub use input::InputState;
