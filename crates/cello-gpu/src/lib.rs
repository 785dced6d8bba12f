//! Vulkan bootstrap for Cello.
//!
//! This crate provides:
//! - Layer and extension enumeration
//! - Instance creation and physical device selection
//! - Logical device creation with extension checks
//! - Surface creation and presentation support checks
//!
//! Native calls go through [`VulkanApi`]; [`AshApi`] is the runtime-loaded
//! implementation.

pub mod api;
pub mod bootstrap;
pub mod capabilities;
pub mod device;
pub mod error;
pub mod instance;
pub mod status;
pub mod surface;

#[cfg(test)]
mod mock;

pub use api::{AshApi, VulkanApi};
pub use bootstrap::{bootstrap, bootstrap_with, BootstrapConfig, BootstrapReport, LayerSelection, VALIDATION_LAYER};
pub use capabilities::{
    filter_by_name, list_extensions, list_layers, DeviceSummary, ExtensionInfo, GpuVendor,
    LayerInfo, Named,
};
pub use device::{DeviceRequest, LogicalDevice, PhysicalDevice};
pub use error::{GpuError, Result};
pub use instance::{Instance, InstanceDescriptor};
pub use status::{status_name, Status};
pub use surface::{PresentationWindow, Surface};
