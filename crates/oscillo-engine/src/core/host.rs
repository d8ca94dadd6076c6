use crate::device::GlApi;
use crate::error::Result;

/// Platform side of the frame loop.
///
/// Implementors own the window and a GL context that stays current on the
/// calling thread for as long as the host lives.
pub trait FrameHost {
    type Gl: GlApi;

    /// GL entry points for the host's context.
    fn gl(&self) -> &Self::Gl;

    /// Processes pending window/input events without blocking.
    ///
    /// May set the close flag.
    fn pump_events(&mut self);

    /// Whether the user asked for the window to close.
    fn should_close(&self) -> bool;

    /// Presents the back buffer.
    fn present(&mut self) -> Result<()>;
}
