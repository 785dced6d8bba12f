//! Vulkan instance creation and physical device selection.

use crate::api::VulkanApi;
use crate::capabilities::{enumerate, DeviceSummary};
use crate::device::PhysicalDevice;
use crate::error::{GpuError, Result};
use ash::vk;
use std::ffi::{c_char, CString};

/// Parameters of one instance creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceDescriptor {
    pub application_name: String,
    pub application_version: u32,
    pub engine_name: String,
    pub engine_version: u32,
    /// Layer names to enable.
    pub layers: Vec<String>,
    /// Instance extension names to enable.
    pub extensions: Vec<String>,
}

impl Default for InstanceDescriptor {
    fn default() -> Self {
        Self {
            application_name: "Cello Application".to_string(),
            application_version: 0,
            engine_name: "Cello".to_string(),
            engine_version: 0,
            layers: Vec::new(),
            extensions: Vec::new(),
        }
    }
}

/// Owned C strings plus the pointer array Vulkan wants for `pp_enabled_*`.
///
/// The pointers borrow from `strings`, so both must live as long as the
/// create-info that uses them.
pub(crate) struct NameArray {
    #[allow(dead_code)]
    strings: Vec<CString>,
    pointers: Vec<*const c_char>,
}

impl NameArray {
    pub(crate) fn new(names: &[String]) -> Result<Self> {
        let strings = names
            .iter()
            .map(|name| CString::new(name.as_str()).map_err(|_| GpuError::InvalidName(name.clone())))
            .collect::<Result<Vec<_>>>()?;
        let pointers = strings.iter().map(|s| s.as_ptr()).collect();
        Ok(Self { strings, pointers })
    }

    pub(crate) fn as_ptrs(&self) -> &[*const c_char] {
        &self.pointers
    }
}

/// An owned Vulkan instance, destroyed on drop.
pub struct Instance<'a, A: VulkanApi> {
    api: &'a A,
    raw: A::Instance,
}

impl<'a, A: VulkanApi> Instance<'a, A> {
    /// Create an instance enabling the descriptor's layers and extensions.
    pub fn new(api: &'a A, descriptor: &InstanceDescriptor) -> Result<Self> {
        let layer_names = NameArray::new(&descriptor.layers)?;
        let extension_names = NameArray::new(&descriptor.extensions)?;
        let application_name = CString::new(descriptor.application_name.as_str())
            .map_err(|_| GpuError::InvalidName(descriptor.application_name.clone()))?;
        let engine_name = CString::new(descriptor.engine_name.as_str())
            .map_err(|_| GpuError::InvalidName(descriptor.engine_name.clone()))?;

        let app_info = vk::ApplicationInfo::default()
            .application_name(&application_name)
            .application_version(descriptor.application_version)
            .engine_name(&engine_name)
            .engine_version(descriptor.engine_version)
            .api_version(vk::API_VERSION_1_0);

        let create_info = vk::InstanceCreateInfo::default()
            .application_info(&app_info)
            .enabled_layer_names(layer_names.as_ptrs())
            .enabled_extension_names(extension_names.as_ptrs());

        // SAFETY: every pointer in create_info outlives this call.
        let raw = unsafe { api.create_instance(&create_info) }
            .map_err(|status| GpuError::operation("vulkan instance", status))?;

        tracing::info!(
            layers = descriptor.layers.len(),
            extensions = descriptor.extensions.len(),
            "Vulkan instance created"
        );

        Ok(Self { api, raw })
    }

    /// The backend this instance was created with.
    pub fn api(&self) -> &'a A {
        self.api
    }

    /// The backend's instance value.
    pub fn raw(&self) -> &A::Instance {
        &self.raw
    }

    /// Pick the physical device to use.
    ///
    /// Always the first enumerated device; devices are not ranked.
    pub fn select_gpu(&self) -> Result<PhysicalDevice<'_, A>> {
        // SAFETY: self.raw is alive for the duration of both calls.
        let devices = enumerate(
            "physical devices",
            || unsafe { self.api.count_physical_devices(&self.raw) },
            |count| unsafe { self.api.fill_physical_devices(&self.raw, count) },
        )
        .map_err(|e| match e {
            GpuError::EmptyEnumeration { .. } => GpuError::NoPhysicalDevice,
            other => other,
        })?;

        let index = 0;
        let raw = *devices.get(index).ok_or(GpuError::NoPhysicalDevice)?;

        // SAFETY: raw was just enumerated from this instance.
        let (properties, families) = unsafe {
            (
                self.api.physical_device_properties(&self.raw, raw),
                self.api.queue_family_properties(&self.raw, raw),
            )
        };
        let summary = DeviceSummary::from_properties(&properties);
        let queue_family_index = families
            .iter()
            .position(|family| family.queue_flags.contains(vk::QueueFlags::GRAPHICS))
            .ok_or(GpuError::NoGraphicsQueue)? as u32;

        tracing::info!(
            "Selected GPU {index} of {}: {summary} (queue family {queue_family_index})",
            devices.len()
        );

        Ok(PhysicalDevice::new(self, raw, index, queue_family_index, summary))
    }
}

impl<A: VulkanApi> Drop for Instance<'_, A> {
    fn drop(&mut self) {
        // SAFETY: everything created from this instance borrows it and has
        // therefore already been dropped.
        unsafe { self.api.destroy_instance(&self.raw) };
        tracing::debug!("Vulkan instance destroyed");
    }
}
