//! Window + GL context ownership.
//!
//! Owns the `winit` event loop and window and the `glutin` context/surface
//! current on the main thread. Events are pumped explicitly, once per frame,
//! instead of handing control to `EventLoop::run_app`.

mod config;
mod gl_window;

pub use config::{GlVersion, WindowConfig};
pub use gl_window::GlWindow;
