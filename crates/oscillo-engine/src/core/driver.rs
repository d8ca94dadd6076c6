use std::time::Duration;

use crate::animation::{Animation, AnimationConfig};
use crate::device::GlApi;
use crate::error::Result;
use crate::paint::Color;
use crate::render::Renderable;
use crate::time::FrameClock;

use super::host::FrameHost;

/// Frame loop configuration.
#[derive(Debug, Clone)]
pub struct DriverConfig {
    pub clear_color: Color,
    pub animation: AnimationConfig,

    /// Frames between frame-rate debug lines. `0` disables them.
    pub stats_interval: u64,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            clear_color: Color::black(),
            animation: AnimationConfig::default(),
            stats_interval: 600,
        }
    }
}

/// Loop lifecycle.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum LoopState {
    /// GPU resources not built yet.
    Uninitialized,
    Running,
    /// Close flag observed; resources released. Terminal.
    Terminated,
}

/// Totals reported when the loop ends.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FrameSummary {
    pub frames: u64,
    pub elapsed: Duration,
}

impl FrameSummary {
    pub fn average_fps(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 { self.frames as f64 / secs } else { 0.0 }
    }
}

/// Owns the host and the renderable and runs the per-frame cycle.
///
/// Per iteration, in order: close check, event pump, animation update, clear,
/// draw, present. The close flag is only checked at the top of an iteration.
pub struct Driver<H: FrameHost> {
    host: H,
    renderable: Option<Renderable>,
    animation: Animation,
    clock: FrameClock,
    clear_color: Color,
    stats_interval: u64,
    stats_mark: Duration,
    state: LoopState,
}

impl<H: FrameHost> Driver<H> {
    pub fn new(host: H, config: DriverConfig) -> Self {
        debug_assert!(config.clear_color.is_finite());
        Self {
            host,
            renderable: None,
            animation: Animation::new(config.animation),
            clock: FrameClock::new(),
            clear_color: config.clear_color.clamped(),
            stats_interval: config.stats_interval,
            stats_mark: Duration::ZERO,
            state: LoopState::Uninitialized,
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn animation(&self) -> &Animation {
        &self.animation
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    /// Builds the renderable and enters `Running`. No-op in any other state.
    pub fn start(&mut self) -> Result<()> {
        if self.state != LoopState::Uninitialized {
            return Ok(());
        }

        let renderable = Renderable::build(self.host.gl())?;
        log::info!("renderable built ({} vertices)", renderable.vertex_count());

        self.renderable = Some(renderable);
        self.clock = FrameClock::new();
        self.state = LoopState::Running;
        Ok(())
    }

    /// Runs one loop iteration and returns the resulting state.
    pub fn step(&mut self) -> Result<LoopState> {
        match self.state {
            LoopState::Uninitialized => self.start()?,
            LoopState::Running => {}
            LoopState::Terminated => return Ok(LoopState::Terminated),
        }

        if self.host.should_close() {
            self.terminate();
            return Ok(self.state);
        }

        self.host.pump_events();

        let ft = self.clock.tick();
        self.advance_and_render(ft.dt)?;
        self.host.present()?;

        self.log_stats();
        Ok(self.state)
    }

    /// Updates the animation by one frame of `dt` seconds, then clears and draws.
    ///
    /// Does not present. Builds the renderable first if the loop has not started.
    /// A terminated loop is left untouched: nothing advances, clears or draws.
    pub fn advance_and_render(&mut self, dt: f32) -> Result<()> {
        if self.state == LoopState::Terminated {
            return Ok(());
        }
        self.start()?;

        let steps = self.animation.config().steps_for(dt);
        self.animation.advance(steps);

        let gl = self.host.gl();
        gl.clear_color_buffer(self.clear_color);

        if let Some(renderable) = &self.renderable {
            renderable.draw(gl, &self.animation.model_matrix());
        }
        Ok(())
    }

    /// Steps until the host requests close, then releases GPU resources.
    ///
    /// Resources are released on error too, while the context is still current.
    pub fn run(mut self) -> Result<FrameSummary> {
        let outcome = loop {
            match self.step() {
                Ok(LoopState::Terminated) => break Ok(()),
                Ok(_) => {}
                Err(err) => break Err(err),
            }
        };

        self.terminate();
        outcome.map(|()| FrameSummary {
            frames: self.clock.frames(),
            elapsed: self.clock.elapsed(),
        })
    }

    fn terminate(&mut self) {
        if let Some(renderable) = self.renderable.take() {
            renderable.release(self.host.gl());
        }
        if self.state != LoopState::Terminated {
            log::debug!("frame loop terminated after {} frames", self.clock.frames());
        }
        self.state = LoopState::Terminated;
    }

    fn log_stats(&mut self) {
        let frames = self.clock.frames();
        if self.stats_interval == 0 || frames % self.stats_interval != 0 {
            return;
        }

        let now = self.clock.elapsed();
        let window = now.saturating_sub(self.stats_mark).as_secs_f64();
        self.stats_mark = now;

        if window > 0.0 {
            log::debug!(
                "frame {frames}: {:.1} fps, rotation {:.2}",
                self.stats_interval as f64 / window,
                self.animation.rotation()
            );
        }
    }
}
