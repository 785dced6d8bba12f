//! Runs the bootstrap once inside the winit event loop.

use anyhow::anyhow;
use cello_gpu::{bootstrap_with, AshApi, BootstrapReport, GpuError};
use cello_platform::{create_event_loop, open_window, PlatformError};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::ActiveEventLoop;
use winit::window::WindowId;

use crate::config::AppConfig;

/// Initialize logging. `RUST_LOG` overrides the default `info` level.
pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();
}

/// Run the bootstrap with the given configuration.
///
/// Failures are logged, never returned: the process exits normally either
/// way. The windowing system is shut down when this returns.
pub fn run(config: AppConfig) {
    info!("{} starting...", config.platform.title);

    let event_loop = match create_event_loop() {
        Ok(event_loop) => event_loop,
        Err(e) => {
            report_failure(&e.into());
            return;
        }
    };

    let mut runner = BootstrapRunner {
        config,
        finished: false,
    };
    if let Err(e) = event_loop.run_app(&mut runner) {
        report_failure(&PlatformError::EventLoop(e.to_string()).into());
    }
}

struct BootstrapRunner {
    config: AppConfig,
    finished: bool,
}

impl BootstrapRunner {
    /// Listing sections go to stdout as they become available, so a failed
    /// run still shows what was enumerated before the failure.
    fn bootstrap(&self, event_loop: &ActiveEventLoop) -> anyhow::Result<BootstrapReport> {
        let window = open_window(event_loop, &self.config.platform)
            .ok_or_else(|| anyhow!("No window to bootstrap against"))?;
        let api = AshApi::load()?;
        let report = bootstrap_with(&api, &window, &self.config.bootstrap, |section| {
            print!("{section}");
        })?;
        Ok(report)
    }
}

impl ApplicationHandler for BootstrapRunner {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.finished {
            return;
        }
        self.finished = true;

        match self.bootstrap(event_loop) {
            Ok(report) => info!(
                device = %report.device,
                surface_supported = report.surface_supported,
                "Bootstrap finished"
            ),
            Err(e) => report_failure(&e),
        }
        event_loop.exit();
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        if let WindowEvent::CloseRequested = event {
            info!("Close requested");
            event_loop.exit();
        }
    }
}

/// Log a failure with detail depending on what kind of failure it is.
fn report_failure(err: &anyhow::Error) {
    if let Some(gpu) = err.downcast_ref::<GpuError>() {
        match gpu.status() {
            Some(status) => error!(
                code = status.code(),
                name = status.name(),
                "Vulkan error: {gpu}"
            ),
            None => error!("Vulkan bootstrap failed: {gpu}"),
        }
    } else if let Some(platform) = err.downcast_ref::<PlatformError>() {
        error!("Platform error: {platform}");
    } else {
        error!("Bootstrap failed: {err:#}");
    }
}
