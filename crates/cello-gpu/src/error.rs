//! GPU error types.

use crate::status::Status;
use ash::vk;
use thiserror::Error;

/// Errors raised while bootstrapping the Vulkan side.
#[derive(Error, Debug)]
pub enum GpuError {
    /// The Vulkan loader library could not be loaded.
    #[error("Failed to load Vulkan: {0}")]
    Loader(String),

    /// A count-then-fill enumeration returned a non-success status.
    #[error("Error enumerating {what}: {status}")]
    Enumeration { what: &'static str, status: Status },

    /// A count-then-fill enumeration reported nothing to enumerate.
    #[error("Error enumerating {what}: count is zero")]
    EmptyEnumeration { what: &'static str },

    /// The instance sees no physical devices.
    #[error("No physical devices available")]
    NoPhysicalDevice,

    /// The selected physical device has no graphics-capable queue family.
    #[error("Selected device has no graphics queue family")]
    NoGraphicsQueue,

    /// Instance or device creation returned a non-success status.
    #[error("Error while creating {what}: {status}")]
    Operation { what: &'static str, status: Status },

    /// Requested device extensions the device does not offer.
    #[error("Not all extensions found: {}", .missing.join(" "))]
    MissingExtensions { missing: Vec<String> },

    /// A layer or extension name contained an interior NUL.
    #[error("Invalid layer or extension name: {0:?}")]
    InvalidName(String),

    /// The window system could not report its required extensions.
    #[error("Failed to query window extensions: {0}")]
    WindowQuery(String),

    /// The window system could not create a surface.
    #[error("Could not create surface for window {window}: {status}")]
    WindowSurface { window: String, status: Status },
}

impl GpuError {
    pub(crate) fn enumeration(what: &'static str, status: vk::Result) -> Self {
        Self::Enumeration {
            what,
            status: Status(status),
        }
    }

    pub(crate) fn operation(what: &'static str, status: vk::Result) -> Self {
        Self::Operation {
            what,
            status: Status(status),
        }
    }

    /// Native status carried by this error, if any.
    pub fn status(&self) -> Option<Status> {
        match self {
            Self::Enumeration { status, .. }
            | Self::Operation { status, .. }
            | Self::WindowSurface { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Result type alias.
pub type Result<T> = std::result::Result<T, GpuError>;
