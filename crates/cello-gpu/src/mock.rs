//! Scriptable stand-ins for the Vulkan loader and a window, for tests.

use crate::api::VulkanApi;
use crate::capabilities::{ExtensionInfo, LayerInfo};
use crate::error::{GpuError, Result};
use crate::status::Status;
use crate::surface::PresentationWindow;
use ash::prelude::VkResult;
use ash::vk::{self, Handle};
use std::cell::RefCell;
use std::ffi::{c_char, CStr};

/// What the mock loader reports.
pub(crate) struct MockConfig {
    pub layers: Vec<LayerInfo>,
    pub extensions: Vec<ExtensionInfo>,
    pub layer_count_status: Option<vk::Result>,
    pub layer_fill_status: Option<vk::Result>,
    pub extension_count_status: Option<vk::Result>,
    pub extension_fill_status: Option<vk::Result>,
    pub instance_status: Option<vk::Result>,
    pub physical_devices: u32,
    pub physical_device_fill_status: Option<vk::Result>,
    pub queue_families: Vec<vk::QueueFlags>,
    pub device_extensions: Vec<String>,
    /// Reported device extension count, when it should disagree with the list.
    pub device_extension_count: Option<u32>,
    pub device_extension_count_status: Option<vk::Result>,
    pub device_extension_fill_status: Option<vk::Result>,
    pub device_status: Option<vk::Result>,
    pub surface_supported: bool,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            layers: vec![LayerInfo {
                name: "L1".to_string(),
                description: "Test layer".to_string(),
                spec_version: 1,
                implementation_version: 1,
            }],
            extensions: vec![
                ExtensionInfo::new("VK_KHR_surface", 1),
                ExtensionInfo::new("VK_KHR_swapchain", 1),
            ],
            layer_count_status: None,
            layer_fill_status: None,
            extension_count_status: None,
            extension_fill_status: None,
            instance_status: None,
            physical_devices: 1,
            physical_device_fill_status: None,
            queue_families: vec![vk::QueueFlags::GRAPHICS | vk::QueueFlags::COMPUTE],
            device_extensions: vec!["VK_KHR_swapchain".to_string()],
            device_extension_count: None,
            device_extension_count_status: None,
            device_extension_fill_status: None,
            device_status: None,
            surface_supported: true,
        }
    }
}

/// Everything the mock observed.
#[derive(Debug, Clone, Default)]
pub(crate) struct Calls {
    pub layer_fills: u32,
    pub extension_fills: u32,
    pub physical_device_fills: u32,
    pub device_extension_fills: u32,

    pub instances_created: u32,
    pub instances_destroyed: u32,
    pub devices_created: u32,
    pub devices_destroyed: u32,
    pub surfaces_created: u32,
    pub surfaces_destroyed: u32,
    /// Kinds of objects in the order they were destroyed.
    pub teardown: Vec<&'static str>,

    pub application_name: String,
    pub engine_name: String,
    pub instance_layers: Vec<String>,
    pub instance_extensions: Vec<String>,

    pub device_queue_family: Option<u32>,
    pub device_queue_priorities: Vec<f32>,
    pub device_layers: Vec<String>,
    pub device_extensions: Vec<String>,

    pub support_queried_family: Option<u32>,
}

pub(crate) struct MockInstance(#[allow(dead_code)] u64);
pub(crate) struct MockDevice(#[allow(dead_code)] u64);

/// A fake loader answering from a [`MockConfig`].
pub(crate) struct MockApi {
    config: MockConfig,
    calls: RefCell<Calls>,
}

impl MockApi {
    pub fn new(config: MockConfig) -> Self {
        Self {
            config,
            calls: RefCell::new(Calls::default()),
        }
    }

    /// Snapshot of the calls observed so far.
    pub fn calls(&self) -> Calls {
        self.calls.borrow().clone()
    }

    /// Handle the mock reports for device `index`.
    pub fn physical_device(index: u32) -> vk::PhysicalDevice {
        vk::PhysicalDevice::from_raw(0x1000 + u64::from(index))
    }

    pub fn record(&self, f: impl FnOnce(&mut Calls)) {
        f(&mut self.calls.borrow_mut());
    }
}

fn name_array<const N: usize>(name: &str) -> [c_char; N] {
    let mut out = [0 as c_char; N];
    for (slot, byte) in out.iter_mut().zip(name.bytes().take(N - 1)) {
        *slot = byte as c_char;
    }
    out
}

unsafe fn read_names(pointers: *const *const c_char, count: u32) -> Vec<String> {
    if count == 0 || pointers.is_null() {
        return Vec::new();
    }
    std::slice::from_raw_parts(pointers, count as usize)
        .iter()
        .map(|&p| CStr::from_ptr(p).to_string_lossy().into_owned())
        .collect()
}

unsafe fn read_name(p: *const c_char) -> String {
    if p.is_null() {
        String::new()
    } else {
        CStr::from_ptr(p).to_string_lossy().into_owned()
    }
}

fn extension_properties(name: &str, spec_version: u32) -> vk::ExtensionProperties {
    let mut props = vk::ExtensionProperties::default();
    props.extension_name = name_array(name);
    props.spec_version = spec_version;
    props
}

impl VulkanApi for MockApi {
    type Instance = MockInstance;
    type Device = MockDevice;

    unsafe fn count_instance_layers(&self) -> VkResult<u32> {
        match self.config.layer_count_status {
            Some(status) => Err(status),
            None => Ok(self.config.layers.len() as u32),
        }
    }

    unsafe fn fill_instance_layers(&self, count: u32) -> VkResult<Vec<vk::LayerProperties>> {
        self.record(|c| c.layer_fills += 1);
        if let Some(status) = self.config.layer_fill_status {
            return Err(status);
        }
        Ok(self
            .config
            .layers
            .iter()
            .take(count as usize)
            .map(|layer| {
                let mut props = vk::LayerProperties::default();
                props.layer_name = name_array(&layer.name);
                props.description = name_array(&layer.description);
                props.spec_version = layer.spec_version;
                props.implementation_version = layer.implementation_version;
                props
            })
            .collect())
    }

    unsafe fn count_instance_extensions(&self) -> VkResult<u32> {
        match self.config.extension_count_status {
            Some(status) => Err(status),
            None => Ok(self.config.extensions.len() as u32),
        }
    }

    unsafe fn fill_instance_extensions(
        &self,
        count: u32,
    ) -> VkResult<Vec<vk::ExtensionProperties>> {
        self.record(|c| c.extension_fills += 1);
        if let Some(status) = self.config.extension_fill_status {
            return Err(status);
        }
        Ok(self
            .config
            .extensions
            .iter()
            .take(count as usize)
            .map(|ext| extension_properties(&ext.name, ext.spec_version))
            .collect())
    }

    unsafe fn create_instance(
        &self,
        info: &vk::InstanceCreateInfo<'_>,
    ) -> VkResult<Self::Instance> {
        if let Some(status) = self.config.instance_status {
            return Err(status);
        }
        let app = &*info.p_application_info;
        let application_name = read_name(app.p_application_name);
        let engine_name = read_name(app.p_engine_name);
        let layers = read_names(info.pp_enabled_layer_names, info.enabled_layer_count);
        let extensions = read_names(info.pp_enabled_extension_names, info.enabled_extension_count);

        self.record(|c| {
            c.instances_created += 1;
            c.application_name = application_name;
            c.engine_name = engine_name;
            c.instance_layers = layers;
            c.instance_extensions = extensions;
        });
        Ok(MockInstance(1))
    }

    unsafe fn destroy_instance(&self, _instance: &Self::Instance) {
        self.record(|c| {
            c.instances_destroyed += 1;
            c.teardown.push("instance");
        });
    }

    unsafe fn count_physical_devices(&self, _instance: &Self::Instance) -> VkResult<u32> {
        Ok(self.config.physical_devices)
    }

    unsafe fn fill_physical_devices(
        &self,
        _instance: &Self::Instance,
        count: u32,
    ) -> VkResult<Vec<vk::PhysicalDevice>> {
        self.record(|c| c.physical_device_fills += 1);
        if let Some(status) = self.config.physical_device_fill_status {
            return Err(status);
        }
        Ok((0..count).map(Self::physical_device).collect())
    }

    unsafe fn physical_device_properties(
        &self,
        _instance: &Self::Instance,
        _physical_device: vk::PhysicalDevice,
    ) -> vk::PhysicalDeviceProperties {
        let mut props = vk::PhysicalDeviceProperties::default();
        props.device_name = name_array("Mock GPU");
        props.vendor_id = 0x10DE;
        props.device_type = vk::PhysicalDeviceType::DISCRETE_GPU;
        props.api_version = vk::API_VERSION_1_0;
        props
    }

    unsafe fn queue_family_properties(
        &self,
        _instance: &Self::Instance,
        _physical_device: vk::PhysicalDevice,
    ) -> Vec<vk::QueueFamilyProperties> {
        self.config
            .queue_families
            .iter()
            .map(|&flags| {
                let mut family = vk::QueueFamilyProperties::default();
                family.queue_flags = flags;
                family.queue_count = 1;
                family
            })
            .collect()
    }

    unsafe fn count_device_extensions(
        &self,
        _instance: &Self::Instance,
        _physical_device: vk::PhysicalDevice,
    ) -> VkResult<u32> {
        if let Some(status) = self.config.device_extension_count_status {
            return Err(status);
        }
        Ok(self
            .config
            .device_extension_count
            .unwrap_or(self.config.device_extensions.len() as u32))
    }

    unsafe fn fill_device_extensions(
        &self,
        _instance: &Self::Instance,
        _physical_device: vk::PhysicalDevice,
        count: u32,
    ) -> VkResult<Vec<vk::ExtensionProperties>> {
        self.record(|c| c.device_extension_fills += 1);
        if let Some(status) = self.config.device_extension_fill_status {
            return Err(status);
        }
        Ok(self
            .config
            .device_extensions
            .iter()
            .take(count as usize)
            .map(|name| extension_properties(name, 1))
            .collect())
    }

    unsafe fn create_device(
        &self,
        _instance: &Self::Instance,
        _physical_device: vk::PhysicalDevice,
        info: &vk::DeviceCreateInfo<'_>,
    ) -> VkResult<Self::Device> {
        if let Some(status) = self.config.device_status {
            return Err(status);
        }
        let queues =
            std::slice::from_raw_parts(info.p_queue_create_infos, info.queue_create_info_count as usize);
        let queue = queues[0];
        let priorities =
            std::slice::from_raw_parts(queue.p_queue_priorities, queue.queue_count as usize).to_vec();
        #[allow(deprecated)]
        let layers = read_names(info.pp_enabled_layer_names, info.enabled_layer_count);
        let extensions = read_names(info.pp_enabled_extension_names, info.enabled_extension_count);

        self.record(|c| {
            c.devices_created += 1;
            c.device_queue_family = Some(queue.queue_family_index);
            c.device_queue_priorities = priorities;
            c.device_layers = layers;
            c.device_extensions = extensions;
        });
        Ok(MockDevice(2))
    }

    unsafe fn destroy_device(&self, _device: &Self::Device) {
        self.record(|c| {
            c.devices_destroyed += 1;
            c.teardown.push("device");
        });
    }

    unsafe fn surface_support(
        &self,
        _instance: &Self::Instance,
        _physical_device: vk::PhysicalDevice,
        queue_family_index: u32,
        _surface: vk::SurfaceKHR,
    ) -> bool {
        self.record(|c| c.support_queried_family = Some(queue_family_index));
        self.config.surface_supported
    }

    unsafe fn destroy_surface(&self, _instance: &Self::Instance, _surface: vk::SurfaceKHR) {
        self.record(|c| {
            c.surfaces_destroyed += 1;
            c.teardown.push("surface");
        });
    }
}

/// A window reporting fixed required extensions.
pub(crate) struct MockWindow {
    pub required: Vec<String>,
    pub query_error: Option<String>,
    pub surface_status: Option<vk::Result>,
}

impl MockWindow {
    pub fn new(required: &[&str]) -> Self {
        Self {
            required: required.iter().map(|name| (*name).to_string()).collect(),
            query_error: None,
            surface_status: None,
        }
    }

    /// Handle of every surface this window creates.
    pub fn surface() -> vk::SurfaceKHR {
        vk::SurfaceKHR::from_raw(0x5)
    }
}

impl PresentationWindow<MockApi> for MockWindow {
    fn required_extensions(&self) -> Result<Vec<String>> {
        match &self.query_error {
            Some(reason) => Err(GpuError::WindowQuery(reason.clone())),
            None => Ok(self.required.clone()),
        }
    }

    unsafe fn create_surface(
        &self,
        api: &MockApi,
        _instance: &MockInstance,
    ) -> Result<vk::SurfaceKHR> {
        if let Some(status) = self.surface_status {
            return Err(GpuError::WindowSurface {
                window: "mock-window".to_string(),
                status: Status(status),
            });
        }
        api.record(|c| c.surfaces_created += 1);
        Ok(Self::surface())
    }
}
