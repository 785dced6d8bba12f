//! The native Vulkan entry points used by the bootstrap sequence.
//!
//! Enumerations keep their native two-call shape: a `count_*` call followed by
//! a `fill_*` call sized from it. [`AshApi`] is the runtime-loaded backend;
//! tests drive the same sequence through a mock.

use crate::error::{GpuError, Result};
use ash::prelude::VkResult;
use ash::vk;
use std::ptr;

/// Raw graphics-API calls, one method per native call the bootstrap makes.
///
/// # Safety
/// Every handle passed in must have been produced by the same implementation
/// and must still be alive.
pub trait VulkanApi {
    /// A created instance together with whatever the backend needs to call
    /// instance-level functions on it.
    type Instance;
    /// A created logical device.
    type Device;

    unsafe fn count_instance_layers(&self) -> VkResult<u32>;
    unsafe fn fill_instance_layers(&self, count: u32) -> VkResult<Vec<vk::LayerProperties>>;

    unsafe fn count_instance_extensions(&self) -> VkResult<u32>;
    unsafe fn fill_instance_extensions(
        &self,
        count: u32,
    ) -> VkResult<Vec<vk::ExtensionProperties>>;

    unsafe fn create_instance(&self, info: &vk::InstanceCreateInfo<'_>)
        -> VkResult<Self::Instance>;
    unsafe fn destroy_instance(&self, instance: &Self::Instance);

    unsafe fn count_physical_devices(&self, instance: &Self::Instance) -> VkResult<u32>;
    unsafe fn fill_physical_devices(
        &self,
        instance: &Self::Instance,
        count: u32,
    ) -> VkResult<Vec<vk::PhysicalDevice>>;

    unsafe fn physical_device_properties(
        &self,
        instance: &Self::Instance,
        physical_device: vk::PhysicalDevice,
    ) -> vk::PhysicalDeviceProperties;

    unsafe fn queue_family_properties(
        &self,
        instance: &Self::Instance,
        physical_device: vk::PhysicalDevice,
    ) -> Vec<vk::QueueFamilyProperties>;

    unsafe fn count_device_extensions(
        &self,
        instance: &Self::Instance,
        physical_device: vk::PhysicalDevice,
    ) -> VkResult<u32>;
    unsafe fn fill_device_extensions(
        &self,
        instance: &Self::Instance,
        physical_device: vk::PhysicalDevice,
        count: u32,
    ) -> VkResult<Vec<vk::ExtensionProperties>>;

    unsafe fn create_device(
        &self,
        instance: &Self::Instance,
        physical_device: vk::PhysicalDevice,
        info: &vk::DeviceCreateInfo<'_>,
    ) -> VkResult<Self::Device>;
    unsafe fn destroy_device(&self, device: &Self::Device);

    /// Whether `queue_family_index` on `physical_device` can present to `surface`.
    unsafe fn surface_support(
        &self,
        instance: &Self::Instance,
        physical_device: vk::PhysicalDevice,
        queue_family_index: u32,
        surface: vk::SurfaceKHR,
    ) -> bool;
    unsafe fn destroy_surface(&self, instance: &Self::Instance, surface: vk::SurfaceKHR);
}

/// Vulkan loaded at runtime through `ash`.
pub struct AshApi {
    entry: ash::Entry,
}

impl AshApi {
    /// Load the Vulkan loader library.
    pub fn load() -> Result<Self> {
        // SAFETY: the loaded library is kept alive by `entry` for as long as
        // any function pointer from it is used.
        let entry = unsafe { ash::Entry::load() }.map_err(|e| GpuError::Loader(e.to_string()))?;
        Ok(Self { entry })
    }

    /// The loader entry points, needed by window-system surface creation.
    pub fn entry(&self) -> &ash::Entry {
        &self.entry
    }
}

/// Second half of a count-then-fill call: fill `count` slots and trim to what
/// the driver wrote.
unsafe fn fill_vec<T>(
    count: u32,
    fill: impl FnOnce(&mut u32, *mut T) -> vk::Result,
) -> VkResult<Vec<T>> {
    let mut written = count;
    let mut data = Vec::with_capacity(count as usize);
    fill(&mut written, data.as_mut_ptr()).result()?;
    data.set_len(written.min(count) as usize);
    Ok(data)
}

impl VulkanApi for AshApi {
    type Instance = ash::Instance;
    type Device = ash::Device;

    unsafe fn count_instance_layers(&self) -> VkResult<u32> {
        let mut count = 0;
        (self.entry.fp_v1_0().enumerate_instance_layer_properties)(&mut count, ptr::null_mut())
            .result_with_success(count)
    }

    unsafe fn fill_instance_layers(&self, count: u32) -> VkResult<Vec<vk::LayerProperties>> {
        fill_vec(count, |n, data| {
            (self.entry.fp_v1_0().enumerate_instance_layer_properties)(n, data)
        })
    }

    unsafe fn count_instance_extensions(&self) -> VkResult<u32> {
        let mut count = 0;
        (self.entry.fp_v1_0().enumerate_instance_extension_properties)(
            ptr::null(),
            &mut count,
            ptr::null_mut(),
        )
        .result_with_success(count)
    }

    unsafe fn fill_instance_extensions(
        &self,
        count: u32,
    ) -> VkResult<Vec<vk::ExtensionProperties>> {
        fill_vec(count, |n, data| {
            (self.entry.fp_v1_0().enumerate_instance_extension_properties)(ptr::null(), n, data)
        })
    }

    unsafe fn create_instance(
        &self,
        info: &vk::InstanceCreateInfo<'_>,
    ) -> VkResult<Self::Instance> {
        self.entry.create_instance(info, None)
    }

    unsafe fn destroy_instance(&self, instance: &Self::Instance) {
        instance.destroy_instance(None);
    }

    unsafe fn count_physical_devices(&self, instance: &Self::Instance) -> VkResult<u32> {
        let mut count = 0;
        (instance.fp_v1_0().enumerate_physical_devices)(
            instance.handle(),
            &mut count,
            ptr::null_mut(),
        )
        .result_with_success(count)
    }

    unsafe fn fill_physical_devices(
        &self,
        instance: &Self::Instance,
        count: u32,
    ) -> VkResult<Vec<vk::PhysicalDevice>> {
        fill_vec(count, |n, data| {
            (instance.fp_v1_0().enumerate_physical_devices)(instance.handle(), n, data)
        })
    }

    unsafe fn physical_device_properties(
        &self,
        instance: &Self::Instance,
        physical_device: vk::PhysicalDevice,
    ) -> vk::PhysicalDeviceProperties {
        instance.get_physical_device_properties(physical_device)
    }

    unsafe fn queue_family_properties(
        &self,
        instance: &Self::Instance,
        physical_device: vk::PhysicalDevice,
    ) -> Vec<vk::QueueFamilyProperties> {
        instance.get_physical_device_queue_family_properties(physical_device)
    }

    unsafe fn count_device_extensions(
        &self,
        instance: &Self::Instance,
        physical_device: vk::PhysicalDevice,
    ) -> VkResult<u32> {
        let mut count = 0;
        (instance.fp_v1_0().enumerate_device_extension_properties)(
            physical_device,
            ptr::null(),
            &mut count,
            ptr::null_mut(),
        )
        .result_with_success(count)
    }

    unsafe fn fill_device_extensions(
        &self,
        instance: &Self::Instance,
        physical_device: vk::PhysicalDevice,
        count: u32,
    ) -> VkResult<Vec<vk::ExtensionProperties>> {
        fill_vec(count, |n, data| {
            (instance.fp_v1_0().enumerate_device_extension_properties)(
                physical_device,
                ptr::null(),
                n,
                data,
            )
        })
    }

    unsafe fn create_device(
        &self,
        instance: &Self::Instance,
        physical_device: vk::PhysicalDevice,
        info: &vk::DeviceCreateInfo<'_>,
    ) -> VkResult<Self::Device> {
        instance.create_device(physical_device, info, None)
    }

    unsafe fn destroy_device(&self, device: &Self::Device) {
        device.destroy_device(None);
    }

    unsafe fn surface_support(
        &self,
        instance: &Self::Instance,
        physical_device: vk::PhysicalDevice,
        queue_family_index: u32,
        surface: vk::SurfaceKHR,
    ) -> bool {
        let surface_loader = ash::khr::surface::Instance::new(&self.entry, instance);
        surface_loader
            .get_physical_device_surface_support(physical_device, queue_family_index, surface)
            .unwrap_or_else(|e| {
                tracing::warn!("Surface support query failed: {e}");
                false
            })
    }

    unsafe fn destroy_surface(&self, instance: &Self::Instance, surface: vk::SurfaceKHR) {
        let surface_loader = ash::khr::surface::Instance::new(&self.entry, instance);
        surface_loader.destroy_surface(surface, None);
    }
}
