//! Layer and extension enumeration.

use crate::api::VulkanApi;
use crate::error::{GpuError, Result};
use ash::prelude::VkResult;
use ash::vk;
use std::collections::HashSet;
use std::ffi::{c_char, CStr};

/// Metadata of one instance layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerInfo {
    pub name: String,
    pub description: String,
    pub spec_version: u32,
    pub implementation_version: u32,
}

impl LayerInfo {
    fn from_properties(props: &vk::LayerProperties) -> Self {
        Self {
            name: fixed_str(&props.layer_name),
            description: fixed_str(&props.description),
            spec_version: props.spec_version,
            implementation_version: props.implementation_version,
        }
    }
}

/// Metadata of one instance or device extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionInfo {
    pub name: String,
    pub spec_version: u32,
}

impl ExtensionInfo {
    /// Build an info by hand, e.g. for extensions known only by name.
    pub fn new(name: impl Into<String>, spec_version: u32) -> Self {
        Self {
            name: name.into(),
            spec_version,
        }
    }

    pub(crate) fn from_properties(props: &vk::ExtensionProperties) -> Self {
        Self {
            name: fixed_str(&props.extension_name),
            spec_version: props.spec_version,
        }
    }
}

/// Anything identified by a layer or extension name.
pub trait Named {
    fn name(&self) -> &str;
}

impl Named for LayerInfo {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Named for ExtensionInfo {
    fn name(&self) -> &str {
        &self.name
    }
}

/// Keep the candidates whose name appears in `wanted`, in candidate order.
///
/// Duplicate wanted names collapse; wanted names without a candidate are
/// dropped silently.
pub fn filter_by_name<T, S>(candidates: &[T], wanted: &[S]) -> Vec<T>
where
    T: Named + Clone,
    S: AsRef<str>,
{
    let wanted: HashSet<&str> = wanted.iter().map(AsRef::as_ref).collect();
    candidates
        .iter()
        .filter(|candidate| wanted.contains(candidate.name()))
        .cloned()
        .collect()
}

/// Names of a list of infos, in order.
pub fn names<T: Named>(infos: &[T]) -> Vec<String> {
    infos.iter().map(|info| info.name().to_string()).collect()
}

/// Run a count-then-fill enumeration.
///
/// A zero count fails without issuing the fill call.
pub(crate) fn enumerate<T>(
    what: &'static str,
    count: impl FnOnce() -> VkResult<u32>,
    fill: impl FnOnce(u32) -> VkResult<Vec<T>>,
) -> Result<Vec<T>> {
    let count = count().map_err(|status| GpuError::enumeration(what, status))?;
    if count == 0 {
        return Err(GpuError::EmptyEnumeration { what });
    }
    fill(count).map_err(|status| GpuError::enumeration(what, status))
}

/// List the instance layers available from the loader.
pub fn list_layers<A: VulkanApi>(api: &A) -> Result<Vec<LayerInfo>> {
    // SAFETY: instance-independent global queries.
    let properties = enumerate(
        "instance layers",
        || unsafe { api.count_instance_layers() },
        |count| unsafe { api.fill_instance_layers(count) },
    )?;
    Ok(properties.iter().map(LayerInfo::from_properties).collect())
}

/// List the instance extensions available from the loader.
pub fn list_extensions<A: VulkanApi>(api: &A) -> Result<Vec<ExtensionInfo>> {
    // SAFETY: instance-independent global queries.
    let properties = enumerate(
        "instance extensions",
        || unsafe { api.count_instance_extensions() },
        |count| unsafe { api.fill_instance_extensions(count) },
    )?;
    Ok(properties.iter().map(ExtensionInfo::from_properties).collect())
}

/// GPU vendor identification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GpuVendor {
    Nvidia,
    Amd,
    Intel,
    Apple,
    Other(u32),
}

impl GpuVendor {
    /// Identify vendor from PCI vendor ID.
    pub fn from_vendor_id(id: u32) -> Self {
        match id {
            0x10DE => Self::Nvidia,
            0x1002 => Self::Amd,
            0x8086 => Self::Intel,
            0x106B => Self::Apple,
            other => Self::Other(other),
        }
    }
}

/// What the log says about the selected device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceSummary {
    pub name: String,
    pub vendor: GpuVendor,
    pub device_type: vk::PhysicalDeviceType,
    pub api_version: u32,
}

impl DeviceSummary {
    pub(crate) fn from_properties(properties: &vk::PhysicalDeviceProperties) -> Self {
        Self {
            name: fixed_str(&properties.device_name),
            vendor: GpuVendor::from_vendor_id(properties.vendor_id),
            device_type: properties.device_type,
            api_version: properties.api_version,
        }
    }
}

impl std::fmt::Display for DeviceSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} ({:?}, {:?}) - Vulkan {}.{}.{}",
            self.name,
            self.vendor,
            self.device_type,
            vk::api_version_major(self.api_version),
            vk::api_version_minor(self.api_version),
            vk::api_version_patch(self.api_version),
        )
    }
}

/// Read a NUL-terminated fixed-size name array; unterminated arrays are read
/// to their end.
fn fixed_str(raw: &[c_char]) -> String {
    // c_char is i8 or u8 depending on target; reinterpret as bytes.
    let bytes: Vec<u8> = raw.iter().map(|&c| c as u8).collect();
    match CStr::from_bytes_until_nul(&bytes) {
        Ok(name) => name.to_string_lossy().into_owned(),
        Err(_) => String::from_utf8_lossy(&bytes).into_owned(),
    }
}
