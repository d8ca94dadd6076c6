use std::ffi::CString;
use std::num::NonZeroU32;
use std::time::Duration;

use glutin::config::{Config, ConfigTemplateBuilder, GlConfig};
use glutin::context::{
    ContextApi, ContextAttributesBuilder, GlProfile, NotCurrentGlContext, PossiblyCurrentContext,
    Version,
};
use glutin::display::{GetGlDisplay, GlDisplay};
use glutin::surface::{GlSurface, Surface, SwapInterval, WindowSurface};
use glutin_winit::{DisplayBuilder, GlWindow as _};
use raw_window_handle::HasWindowHandle;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::platform::pump_events::{EventLoopExtPumpEvents, PumpStatus};
use winit::window::{Window, WindowId};

use crate::core::FrameHost;
use crate::device::{GlApi, NativeGl};
use crate::error::{EngineError, ErrorKind, Result};

use super::config::WindowConfig;

/// Pumps allowed before the platform delivers its first `resumed`.
const STARTUP_PUMP_LIMIT: usize = 64;
const STARTUP_PUMP_TIMEOUT: Duration = Duration::from_millis(10);

/// Window, surface and current context.
///
/// Field order is drop order: the context goes first, the window last.
struct GlTarget {
    context: PossiblyCurrentContext,
    surface: Surface<WindowSurface>,
    window: Window,
}

/// `winit` handler driven by `pump_app_events`.
///
/// Creates the GL target on the first `resumed` and records close requests.
struct EventPump {
    config: WindowConfig,
    target: Option<GlTarget>,
    error: Option<EngineError>,
    window_id: Option<WindowId>,
    close_requested: bool,
}

impl EventPump {
    fn new(config: WindowConfig) -> Self {
        Self {
            config,
            target: None,
            error: None,
            window_id: None,
            close_requested: false,
        }
    }
}

impl ApplicationHandler for EventPump {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window_id.is_some() || self.error.is_some() {
            return;
        }

        match create_target(event_loop, &self.config) {
            Ok(target) => {
                self.window_id = Some(target.window.id());
                self.target = Some(target);
            }
            Err(err) => {
                self.error = Some(err);
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        if self.window_id != Some(window_id) {
            return;
        }

        match event {
            WindowEvent::CloseRequested | WindowEvent::Destroyed => {
                if !self.close_requested {
                    log::debug!("close requested");
                }
                self.close_requested = true;
            }
            _ => {}
        }
    }
}

/// The window/context owner.
///
/// Construction performs the whole platform setup: event loop, window,
/// OpenGL core context made current on this thread, entry point loading and
/// the full-framebuffer viewport. Anything acquired before a failing step is
/// released by drop before the error is returned.
pub struct GlWindow {
    gl: NativeGl,
    target: GlTarget,
    pump: EventPump,
    event_loop: EventLoop<()>,
}

impl GlWindow {
    pub fn initialize(config: &WindowConfig) -> Result<Self> {
        let mut event_loop = EventLoop::new()
            .map_err(|e| EngineError::from_display(ErrorKind::PlatformInit, e))?;
        let mut pump = EventPump::new(config.clone());

        // The window can only be created from inside the handler, on `resumed`.
        for _ in 0..STARTUP_PUMP_LIMIT {
            let status = event_loop.pump_app_events(Some(STARTUP_PUMP_TIMEOUT), &mut pump);
            if let Some(err) = pump.error.take() {
                return Err(err);
            }
            if pump.target.is_some() {
                break;
            }
            if let PumpStatus::Exit(code) = status {
                return Err(EngineError::new(
                    ErrorKind::PlatformInit,
                    format!("event loop exited with status {code} before the window was created"),
                ));
            }
        }

        let target = pump.target.take().ok_or_else(|| {
            EngineError::new(
                ErrorKind::WindowCreation,
                format!("platform did not resume within {STARTUP_PUMP_LIMIT} event pumps"),
            )
        })?;

        let framebuffer = target.window.inner_size();

        let display = target.context.display();
        let gl = NativeGl::load(|symbol| match CString::new(symbol) {
            Ok(symbol) => display.get_proc_address(&symbol),
            Err(_) => std::ptr::null(),
        })?;

        gl.viewport(
            0,
            0,
            i32::try_from(framebuffer.width).unwrap_or(i32::MAX),
            i32::try_from(framebuffer.height).unwrap_or(i32::MAX),
        );

        if config.vsync {
            let interval = SwapInterval::Wait(NonZeroU32::MIN);
            if let Err(e) = target.surface.set_swap_interval(&target.context, interval) {
                log::warn!("vsync not available: {e}");
            }
        }

        log::info!(
            "window \"{}\" created: {}x{} framebuffer, GL {} ({})",
            config.title,
            framebuffer.width,
            framebuffer.height,
            gl.version_string().as_deref().unwrap_or("unknown"),
            gl.renderer_string().as_deref().unwrap_or("unknown renderer"),
        );

        Ok(Self { gl, target, pump, event_loop })
    }

    /// Framebuffer size in physical pixels.
    pub fn framebuffer_size(&self) -> PhysicalSize<u32> {
        self.target.window.inner_size()
    }
}

impl FrameHost for GlWindow {
    type Gl = NativeGl;

    fn gl(&self) -> &NativeGl {
        &self.gl
    }

    fn pump_events(&mut self) {
        let status = self.event_loop.pump_app_events(Some(Duration::ZERO), &mut self.pump);
        if let PumpStatus::Exit(code) = status {
            log::debug!("event loop exited with status {code}");
            self.pump.close_requested = true;
        }
    }

    fn should_close(&self) -> bool {
        self.pump.close_requested
    }

    fn present(&mut self) -> Result<()> {
        self.target.window.pre_present_notify();
        self.target
            .surface
            .swap_buffers(&self.target.context)
            .map_err(|e| EngineError::from_display(ErrorKind::Present, e))
    }
}

fn create_target(event_loop: &ActiveEventLoop, config: &WindowConfig) -> Result<GlTarget> {
    let window_attributes = Window::default_attributes()
        .with_title(config.title.clone())
        .with_inner_size(PhysicalSize::new(config.width, config.height))
        .with_resizable(config.resizable);

    let (window, gl_config) = DisplayBuilder::new()
        .with_window_attributes(Some(window_attributes))
        .build(event_loop, ConfigTemplateBuilder::new(), pick_config)
        .map_err(|e| EngineError::from_display(ErrorKind::WindowCreation, e))?;

    let window = window.ok_or_else(|| {
        EngineError::new(ErrorKind::WindowCreation, "display builder returned no window")
    })?;

    let raw_handle = window
        .window_handle()
        .map_err(|e| EngineError::from_display(ErrorKind::WindowCreation, e))?
        .as_raw();

    let version = Version::new(config.gl_version.major, config.gl_version.minor);
    let context_attributes = ContextAttributesBuilder::new()
        .with_context_api(ContextApi::OpenGl(Some(version)))
        .with_profile(GlProfile::Core)
        .build(Some(raw_handle));

    let display = gl_config.display();

    // SAFETY: `raw_handle` belongs to `window`, which `GlTarget` drops after the context.
    let not_current = unsafe { display.create_context(&gl_config, &context_attributes) }
        .map_err(|e| EngineError::from_display(ErrorKind::ContextCreation, e))?;

    let surface_attributes = window
        .build_surface_attributes(Default::default())
        .map_err(|e| EngineError::from_display(ErrorKind::WindowCreation, e))?;

    // SAFETY: as above, the surface is dropped before the window.
    let surface = unsafe { display.create_window_surface(&gl_config, &surface_attributes) }
        .map_err(|e| EngineError::from_display(ErrorKind::ContextCreation, e))?;

    let context = not_current
        .make_current(&surface)
        .map_err(|e| EngineError::from_display(ErrorKind::ContextCreation, e))?;

    log::debug!(
        "GL {}.{} core context current ({} samples)",
        config.gl_version.major,
        config.gl_version.minor,
        gl_config.num_samples()
    );

    Ok(GlTarget { context, surface, window })
}

/// Prefers the config with the most samples.
///
/// `DisplayBuilder::build` only calls the picker after `find_configs`
/// succeeded, and every glutin backend reports an empty match as an error
/// there, so the iterator is never empty.
fn pick_config(configs: Box<dyn Iterator<Item = Config> + '_>) -> Config {
    most_samples(configs, |config| config.num_samples())
        .expect("glutin yields at least one config to the picker")
}

/// First item with the highest sample count, or `None` for an empty iterator.
fn most_samples<T>(items: impl Iterator<Item = T>, samples: impl Fn(&T) -> u8) -> Option<T> {
    items.reduce(|best, item| if samples(&item) > samples(&best) { item } else { best })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn most_samples_prefers_the_first_highest() {
        let configs = [(0u8, 'a'), (4, 'b'), (2, 'c'), (4, 'd')];
        let best = most_samples(configs.into_iter(), |c| c.0);
        assert_eq!(best, Some((4, 'b')));
    }

    #[test]
    fn most_samples_of_nothing_is_none() {
        assert_eq!(most_samples(std::iter::empty::<(u8, char)>(), |c| c.0), None);
    }
}
