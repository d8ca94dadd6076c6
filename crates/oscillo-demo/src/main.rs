use std::process::ExitCode;

use anyhow::{Context, Result};
use oscillo_engine::core::{Driver, DriverConfig, FrameSummary};
use oscillo_engine::logging::{init_logging, LoggingConfig};
use oscillo_engine::window::{GlWindow, WindowConfig};
use oscillo_engine::EngineError;

fn main() -> ExitCode {
    init_logging(LoggingConfig::default());

    match run() {
        Ok(summary) => {
            log::info!(
                "closed after {} frames in {:.1}s ({:.1} fps average)",
                summary.frames,
                summary.elapsed.as_secs_f64(),
                summary.average_fps()
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::from(exit_status(&err))
        }
    }
}

fn run() -> Result<FrameSummary> {
    let window_config = WindowConfig::default();

    let window = GlWindow::initialize(&window_config)
        .with_context(|| format!("failed to open \"{}\"", window_config.title))?;
    log::debug!("framebuffer {:?}", window.framebuffer_size());

    let summary = Driver::new(window, DriverConfig::default())
        .run()
        .context("frame loop failed")?;

    Ok(summary)
}

/// Engine failures map to their kind's status; anything else exits with 1.
fn exit_status(err: &anyhow::Error) -> u8 {
    err.downcast_ref::<EngineError>()
        .map_or(1, EngineError::exit_code)
}
