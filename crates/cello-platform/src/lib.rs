//! Platform abstraction for Cello.
//!
//! Provides the event loop, window creation via winit, and the window's side
//! of Vulkan presentation via ash-window.

use std::ffi::CStr;

use ash::vk;
use cello_gpu::{AshApi, GpuError, PresentationWindow, Status};
use raw_window_handle::{HasDisplayHandle, HasWindowHandle};
use thiserror::Error;
use winit::dpi::{PhysicalPosition, PhysicalSize};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::window::Window;

#[derive(Error, Debug)]
pub enum PlatformError {
    #[error("Windowing system failed to initialize: {0}")]
    Init(String),
    #[error("Window creation failed: {0}")]
    WindowCreation(String),
    #[error("Event loop error: {0}")]
    EventLoop(String),
}

pub type Result<T> = std::result::Result<T, PlatformError>;

/// Platform configuration.
#[derive(Debug, Clone)]
pub struct PlatformConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub resizable: bool,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            title: "My Game".to_string(),
            width: 800,
            height: 600,
            resizable: false,
        }
    }
}

/// Initialize the windowing system.
///
/// The returned event loop is the windowing system; dropping it shuts the
/// system down.
pub fn create_event_loop() -> Result<EventLoop<()>> {
    EventLoop::new().map_err(|e| PlatformError::Init(e.to_string()))
}

/// Open a window for Vulkan rendering, centered on the primary monitor.
///
/// Returns `None` if the window system refuses to create the window; that is
/// logged and kept distinct from a failed [`create_event_loop`].
pub fn open_window(event_loop: &ActiveEventLoop, config: &PlatformConfig) -> Option<PlatformWindow> {
    let mut attributes = Window::default_attributes()
        .with_title(&config.title)
        .with_inner_size(PhysicalSize::new(config.width, config.height))
        .with_resizable(config.resizable)
        .with_visible(true);

    if let Some(monitor) = event_loop.primary_monitor() {
        let position = monitor.position();
        let size = monitor.size();
        let (x, y) = centered_position(
            (position.x, position.y),
            (size.width, size.height),
            (config.width, config.height),
        );
        attributes = attributes.with_position(PhysicalPosition::new(x, y));
    }

    match event_loop.create_window(attributes) {
        Ok(window) => {
            tracing::info!(
                "Window {:?} opened: {}x{}",
                window.id(),
                config.width,
                config.height
            );
            Some(PlatformWindow { window })
        }
        Err(e) => {
            tracing::error!("{}", PlatformError::WindowCreation(e.to_string()));
            None
        }
    }
}

/// Top-left corner that centers a `window`-sized rectangle on a monitor.
fn centered_position(
    monitor_position: (i32, i32),
    monitor_size: (u32, u32),
    window: (u32, u32),
) -> (i32, i32) {
    let offset = |monitor: u32, window: u32| (i64::from(monitor) - i64::from(window)) / 2;
    let x = i64::from(monitor_position.0) + offset(monitor_size.0, window.0);
    let y = i64::from(monitor_position.1) + offset(monitor_size.1, window.1);
    (clamp_i32(x), clamp_i32(y))
}

fn clamp_i32(value: i64) -> i32 {
    i32::try_from(value).unwrap_or(if value < 0 { i32::MIN } else { i32::MAX })
}

/// A window that can be presented into through Vulkan.
pub struct PlatformWindow {
    window: Window,
}

impl PlatformWindow {
    fn describe(&self) -> String {
        format!("{:?}", self.window.id())
    }
}

impl PresentationWindow<AshApi> for PlatformWindow {
    fn required_extensions(&self) -> cello_gpu::Result<Vec<String>> {
        let display = self
            .window
            .display_handle()
            .map_err(|e| GpuError::WindowQuery(format!("Failed to get display handle: {e}")))?;
        let names = ash_window::enumerate_required_extensions(display.as_raw())
            .map_err(|status| GpuError::WindowQuery(Status(status).to_string()))?;

        // SAFETY: ash-window returns pointers to static NUL-terminated names.
        Ok(names
            .iter()
            .map(|&name| unsafe { CStr::from_ptr(name) }.to_string_lossy().into_owned())
            .collect())
    }

    unsafe fn create_surface(
        &self,
        api: &AshApi,
        instance: &ash::Instance,
    ) -> cello_gpu::Result<vk::SurfaceKHR> {
        let surface_error = |status| GpuError::WindowSurface {
            window: self.describe(),
            status: Status(status),
        };

        let display = self
            .window
            .display_handle()
            .map_err(|_| surface_error(vk::Result::ERROR_INITIALIZATION_FAILED))?;
        let window_handle = self
            .window
            .window_handle()
            .map_err(|_| surface_error(vk::Result::ERROR_INITIALIZATION_FAILED))?;

        ash_window::create_surface(
            api.entry(),
            instance,
            display.as_raw(),
            window_handle.as_raw(),
            None,
        )
        .map_err(surface_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_window_is_800_by_600() {
        let config = PlatformConfig::default();
        assert_eq!((config.width, config.height), (800, 600));
        assert!(!config.resizable);
    }

    #[test]
    fn window_is_centered_on_monitor() {
        assert_eq!(centered_position((0, 0), (1920, 1080), (800, 600)), (560, 240));
    }

    #[test]
    fn centering_respects_monitor_origin() {
        assert_eq!(
            centered_position((1920, -200), (1280, 1024), (800, 600)),
            (2160, 12)
        );
    }

    #[test]
    fn oversized_window_starts_before_monitor_origin() {
        assert_eq!(centered_position((0, 0), (640, 480), (800, 600)), (-80, -60));
    }

    #[test]
    fn init_error_message() {
        let err = PlatformError::Init("no display".into());
        assert_eq!(
            err.to_string(),
            "Windowing system failed to initialize: no display"
        );
    }
}
