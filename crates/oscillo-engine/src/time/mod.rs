//! Frame timing.
//!
//! One `FrameClock` per render loop; `tick()` once per presented frame.
//! Feeds delta-time pacing and the loop's frame statistics.

mod frame_clock;

pub use frame_clock::{FrameClock, FrameTime};
