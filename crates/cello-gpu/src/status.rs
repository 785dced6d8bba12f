//! Symbolic names for `VkResult` codes.

use ash::vk;
use std::fmt;

/// Known result codes and their Vulkan enum names.
static STATUS_NAMES: &[(vk::Result, &str)] = &[
    (vk::Result::SUCCESS, "VK_SUCCESS"),
    (vk::Result::NOT_READY, "VK_NOT_READY"),
    (vk::Result::TIMEOUT, "VK_TIMEOUT"),
    (vk::Result::EVENT_SET, "VK_EVENT_SET"),
    (vk::Result::EVENT_RESET, "VK_EVENT_RESET"),
    (vk::Result::INCOMPLETE, "VK_INCOMPLETE"),
    (vk::Result::ERROR_OUT_OF_HOST_MEMORY, "VK_ERROR_OUT_OF_HOST_MEMORY"),
    (vk::Result::ERROR_OUT_OF_DEVICE_MEMORY, "VK_ERROR_OUT_OF_DEVICE_MEMORY"),
    (vk::Result::ERROR_INITIALIZATION_FAILED, "VK_ERROR_INITIALIZATION_FAILED"),
    (vk::Result::ERROR_DEVICE_LOST, "VK_ERROR_DEVICE_LOST"),
    (vk::Result::ERROR_MEMORY_MAP_FAILED, "VK_ERROR_MEMORY_MAP_FAILED"),
    (vk::Result::ERROR_LAYER_NOT_PRESENT, "VK_ERROR_LAYER_NOT_PRESENT"),
    (vk::Result::ERROR_EXTENSION_NOT_PRESENT, "VK_ERROR_EXTENSION_NOT_PRESENT"),
    (vk::Result::ERROR_FEATURE_NOT_PRESENT, "VK_ERROR_FEATURE_NOT_PRESENT"),
    (vk::Result::ERROR_INCOMPATIBLE_DRIVER, "VK_ERROR_INCOMPATIBLE_DRIVER"),
    (vk::Result::ERROR_TOO_MANY_OBJECTS, "VK_ERROR_TOO_MANY_OBJECTS"),
    (vk::Result::ERROR_FORMAT_NOT_SUPPORTED, "VK_ERROR_FORMAT_NOT_SUPPORTED"),
    (vk::Result::ERROR_FRAGMENTED_POOL, "VK_ERROR_FRAGMENTED_POOL"),
    (vk::Result::ERROR_UNKNOWN, "VK_ERROR_UNKNOWN"),
    (vk::Result::ERROR_OUT_OF_POOL_MEMORY, "VK_ERROR_OUT_OF_POOL_MEMORY"),
    (vk::Result::ERROR_INVALID_EXTERNAL_HANDLE, "VK_ERROR_INVALID_EXTERNAL_HANDLE"),
    (vk::Result::ERROR_FRAGMENTATION, "VK_ERROR_FRAGMENTATION"),
    (
        vk::Result::ERROR_INVALID_OPAQUE_CAPTURE_ADDRESS,
        "VK_ERROR_INVALID_OPAQUE_CAPTURE_ADDRESS",
    ),
    (vk::Result::ERROR_SURFACE_LOST_KHR, "VK_ERROR_SURFACE_LOST_KHR"),
    (vk::Result::ERROR_NATIVE_WINDOW_IN_USE_KHR, "VK_ERROR_NATIVE_WINDOW_IN_USE_KHR"),
    (vk::Result::SUBOPTIMAL_KHR, "VK_SUBOPTIMAL_KHR"),
    (vk::Result::ERROR_OUT_OF_DATE_KHR, "VK_ERROR_OUT_OF_DATE_KHR"),
    (vk::Result::ERROR_INCOMPATIBLE_DISPLAY_KHR, "VK_ERROR_INCOMPATIBLE_DISPLAY_KHR"),
    (vk::Result::from_raw(-1_000_011_001), "VK_ERROR_VALIDATION_FAILED_EXT"),
    (vk::Result::from_raw(-1_000_012_000), "VK_ERROR_INVALID_SHADER_NV"),
    (
        vk::Result::from_raw(-1_000_158_000),
        "VK_ERROR_INVALID_DRM_FORMAT_MODIFIER_PLANE_LAYOUT_EXT",
    ),
    (vk::Result::from_raw(-1_000_174_001), "VK_ERROR_NOT_PERMITTED_EXT"),
    (
        vk::Result::from_raw(-1_000_255_000),
        "VK_ERROR_FULL_SCREEN_EXCLUSIVE_MODE_LOST_EXT",
    ),
    (vk::Result::from_raw(1_000_268_000), "VK_THREAD_IDLE_KHR"),
    (vk::Result::from_raw(1_000_268_001), "VK_THREAD_DONE_KHR"),
    (vk::Result::from_raw(1_000_268_002), "VK_OPERATION_DEFERRED_KHR"),
    (vk::Result::from_raw(1_000_268_003), "VK_OPERATION_NOT_DEFERRED_KHR"),
    (vk::Result::from_raw(1_000_297_000), "VK_PIPELINE_COMPILE_REQUIRED_EXT"),
];

/// Look up the Vulkan enum name of a result code, `"???"` when unknown.
pub fn status_name(status: vk::Result) -> &'static str {
    STATUS_NAMES
        .iter()
        .find(|(code, _)| *code == status)
        .map_or("???", |(_, name)| *name)
}

/// A native status code as carried by errors.
///
/// Displays as `<code> (<name>)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Status(pub vk::Result);

impl Status {
    /// Raw numeric code.
    pub fn code(self) -> i32 {
        self.0.as_raw()
    }

    /// Symbolic name from the static table.
    pub fn name(self) -> &'static str {
        status_name(self.0)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.code(), self.name())
    }
}
