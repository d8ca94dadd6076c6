//! Frame loop.
//!
//! `FrameHost` is the seam between the loop and the platform (window, context,
//! event pump, buffer swap). `Driver` owns a host and the renderable and runs
//! the fixed per-frame sequence until the host reports a close request.

mod driver;
mod host;

pub use driver::{Driver, DriverConfig, FrameSummary, LoopState};
pub use host::FrameHost;
