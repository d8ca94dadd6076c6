//! Color types used for framebuffer clears.

mod color;

pub use color::Color;
