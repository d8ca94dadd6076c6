//! Oscillo engine crate.
//!
//! A single-window OpenGL 3.3 core renderer: one triangle, one program, and a
//! frame loop that slides it back and forth while it spins.
//!
//! Layering, bottom-up:
//! - `device`: the `GlApi` seam and native entry points
//! - `render`: static geometry + program setup, per-frame draw
//! - `animation`: offset/rotation scalars and the model matrix
//! - `window`: window + context owner, event pump, buffer swap
//! - `core`: the frame loop state machine

pub mod animation;
pub mod core;
pub mod device;
pub mod error;
pub mod logging;
pub mod paint;
pub mod render;
pub mod time;
pub mod window;

pub use error::{EngineError, ErrorKind};
