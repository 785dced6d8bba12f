//! Physical device handle and logical device creation.

use crate::api::VulkanApi;
use crate::capabilities::{enumerate, DeviceSummary, ExtensionInfo};
use crate::error::{GpuError, Result};
use crate::instance::{Instance, NameArray};
use crate::surface::Surface;
use ash::vk;
use std::collections::BTreeSet;

/// Layers and extensions requested for a logical device.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceRequest {
    pub layers: Vec<String>,
    pub extensions: Vec<String>,
}

impl DeviceRequest {
    /// Request the swapchain extension and nothing else.
    pub fn swapchain() -> Self {
        Self {
            layers: Vec::new(),
            extensions: vec![ash::khr::swapchain::NAME.to_string_lossy().into_owned()],
        }
    }
}

/// A physical device selected from an instance.
///
/// Not owned: the handle belongs to the instance and is only valid while it
/// is alive, which the borrow enforces.
pub struct PhysicalDevice<'i, A: VulkanApi> {
    instance: &'i Instance<'i, A>,
    raw: vk::PhysicalDevice,
    index: usize,
    queue_family_index: u32,
    summary: DeviceSummary,
}

impl<'i, A: VulkanApi> PhysicalDevice<'i, A> {
    pub(crate) fn new(
        instance: &'i Instance<'i, A>,
        raw: vk::PhysicalDevice,
        index: usize,
        queue_family_index: u32,
        summary: DeviceSummary,
    ) -> Self {
        Self {
            instance,
            raw,
            index,
            queue_family_index,
            summary,
        }
    }

    pub fn raw(&self) -> vk::PhysicalDevice {
        self.raw
    }

    /// Position of this device in the instance's enumeration.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn queue_family_index(&self) -> u32 {
        self.queue_family_index
    }

    pub fn summary(&self) -> &DeviceSummary {
        &self.summary
    }

    /// Extensions this device offers.
    pub fn extensions(&self) -> Result<Vec<ExtensionInfo>> {
        let api = self.instance.api();
        let instance = self.instance.raw();
        // SAFETY: the device was enumerated from the borrowed, live instance.
        let properties = enumerate(
            "device extensions",
            || unsafe { api.count_device_extensions(instance, self.raw) },
            |count| unsafe { api.fill_device_extensions(instance, self.raw, count) },
        )?;
        Ok(properties.iter().map(ExtensionInfo::from_properties).collect())
    }

    /// Create a logical device with one queue on the recorded queue family.
    ///
    /// Fails with [`GpuError::MissingExtensions`] without creating anything if
    /// the device lacks any requested extension.
    pub fn create_logical_device(&self, request: &DeviceRequest) -> Result<LogicalDevice<'i, A>> {
        let available = self.extensions()?;
        let requested: BTreeSet<&str> = request.extensions.iter().map(String::as_str).collect();
        let found: BTreeSet<&str> = available
            .iter()
            .map(|ext| ext.name.as_str())
            .filter(|name| requested.contains(name))
            .collect();

        if found.len() != requested.len() {
            let missing: Vec<String> = requested
                .difference(&found)
                .map(|name| (*name).to_string())
                .collect();
            return Err(GpuError::MissingExtensions { missing });
        }

        let layer_names = NameArray::new(&request.layers)?;
        let extension_names = NameArray::new(&request.extensions)?;

        let queue_priority = 1.0_f32;
        let queue_create_info = vk::DeviceQueueCreateInfo::default()
            .queue_family_index(self.queue_family_index)
            .queue_priorities(std::slice::from_ref(&queue_priority));

        #[allow(deprecated)]
        let create_info = vk::DeviceCreateInfo::default()
            .queue_create_infos(std::slice::from_ref(&queue_create_info))
            .enabled_layer_names(layer_names.as_ptrs())
            .enabled_extension_names(extension_names.as_ptrs());

        let api = self.instance.api();
        // SAFETY: create_info and everything it points to outlive this call.
        let raw = unsafe { api.create_device(self.instance.raw(), self.raw, &create_info) }
            .map_err(|status| GpuError::operation("logical device", status))?;

        tracing::info!(
            queue_family = self.queue_family_index,
            extensions = ?request.extensions,
            "Logical device created"
        );

        Ok(LogicalDevice {
            instance: self.instance,
            raw,
            queue_family_index: self.queue_family_index,
        })
    }

    /// Whether the recorded queue family can present to `surface`.
    pub fn is_surface_supported(&self, surface: &Surface<'_, A>) -> bool {
        // SAFETY: both the device and the surface belong to the live instance.
        unsafe {
            self.instance.api().surface_support(
                self.instance.raw(),
                self.raw,
                self.queue_family_index,
                surface.raw(),
            )
        }
    }
}

/// An owned logical device, destroyed on drop.
pub struct LogicalDevice<'i, A: VulkanApi> {
    instance: &'i Instance<'i, A>,
    raw: A::Device,
    queue_family_index: u32,
}

impl<A: VulkanApi> LogicalDevice<'_, A> {
    pub fn raw(&self) -> &A::Device {
        &self.raw
    }

    /// Queue family the device's single queue was created on.
    pub fn queue_family_index(&self) -> u32 {
        self.queue_family_index
    }
}

impl<A: VulkanApi> Drop for LogicalDevice<'_, A> {
    fn drop(&mut self) {
        // SAFETY: nothing created from this device outlives it.
        unsafe { self.instance.api().destroy_device(&self.raw) };
        tracing::debug!("Logical device destroyed");
    }
}
