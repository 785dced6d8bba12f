//! The bootstrap sequence: capabilities, instance, device and surface.

use crate::api::VulkanApi;
use crate::capabilities::{
    filter_by_name, list_extensions, list_layers, names, DeviceSummary, ExtensionInfo, LayerInfo,
};
use crate::device::DeviceRequest;
use crate::error::Result;
use crate::instance::{Instance, InstanceDescriptor};
use crate::surface::{PresentationWindow, Surface};
use std::fmt::Write as _;
use tracing::{debug, info};

/// Which of the enumerated instance layers to enable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayerSelection {
    /// Every layer the loader reports.
    All,
    /// The reported layers with these names; names not reported are skipped.
    Named(Vec<String>),
}

impl Default for LayerSelection {
    fn default() -> Self {
        if cfg!(debug_assertions) {
            Self::Named(vec![VALIDATION_LAYER.to_string()])
        } else {
            Self::Named(Vec::new())
        }
    }
}

/// Standard validation layer name.
pub const VALIDATION_LAYER: &str = "VK_LAYER_KHRONOS_validation";

/// Inputs of one bootstrap run.
#[derive(Debug, Clone)]
pub struct BootstrapConfig {
    pub application_name: String,
    pub application_version: u32,
    pub engine_name: String,
    pub engine_version: u32,
    pub layers: LayerSelection,
    /// Extensions the logical device must support.
    pub device_extensions: Vec<String>,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        let descriptor = InstanceDescriptor::default();
        Self {
            application_name: descriptor.application_name,
            application_version: descriptor.application_version,
            engine_name: descriptor.engine_name,
            engine_version: descriptor.engine_version,
            layers: LayerSelection::default(),
            device_extensions: DeviceRequest::swapchain().extensions,
        }
    }
}

impl BootstrapConfig {
    /// Create a new config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the application name.
    pub fn app_name(mut self, name: impl Into<String>) -> Self {
        self.application_name = name.into();
        self
    }

    /// Set the layer selection policy.
    pub fn layers(mut self, layers: LayerSelection) -> Self {
        self.layers = layers;
        self
    }

    /// Set the required device extensions.
    pub fn device_extensions(mut self, extensions: Vec<String>) -> Self {
        self.device_extensions = extensions;
        self
    }

    fn descriptor(&self, layers: &[LayerInfo], extensions: &[ExtensionInfo]) -> InstanceDescriptor {
        InstanceDescriptor {
            application_name: self.application_name.clone(),
            application_version: self.application_version,
            engine_name: self.engine_name.clone(),
            engine_version: self.engine_version,
            layers: names(layers),
            extensions: names(extensions),
        }
    }
}

/// What a successful bootstrap found and enabled.
#[derive(Debug, Clone)]
pub struct BootstrapReport {
    pub layers: Vec<LayerInfo>,
    pub extensions: Vec<ExtensionInfo>,
    pub window_extensions: Vec<String>,
    pub enabled_layers: Vec<LayerInfo>,
    pub enabled_extensions: Vec<ExtensionInfo>,
    pub device_index: usize,
    pub device: DeviceSummary,
    pub queue_family_index: u32,
    pub device_extensions: Vec<String>,
    pub surface_supported: bool,
}

impl BootstrapReport {
    /// Human-readable listing for the console.
    ///
    /// The same text [`bootstrap_with`] emits section by section.
    pub fn listing(&self) -> String {
        [
            layers_section(&self.layers),
            extensions_section(&self.extensions),
            window_extensions_section(&self.window_extensions),
            device_section(self.device_index, &self.device, self.queue_family_index),
            support_section(self.surface_supported),
        ]
        .concat()
    }
}

fn layers_section(layers: &[LayerInfo]) -> String {
    let mut out = String::from("Engine Layers:\n");
    for layer in layers {
        let _ = writeln!(out, " - {}", layer.name);
        let _ = writeln!(out, "      {}", layer.description);
        let _ = writeln!(out, "      spec vers : {}", layer.spec_version);
        let _ = writeln!(out, "      impl vers : {}", layer.implementation_version);
    }
    out
}

fn extensions_section(extensions: &[ExtensionInfo]) -> String {
    let mut out = String::from("Engine Extensions:\n");
    for extension in extensions {
        let _ = writeln!(out, " - {}", extension.name);
        let _ = writeln!(out, "      spec vers : {}", extension.spec_version);
    }
    out
}

fn window_extensions_section(names: &[String]) -> String {
    let mut out = String::from("Window Extension names:\n");
    for name in names {
        let _ = writeln!(out, " - {name}");
    }
    out
}

fn device_section(index: usize, device: &DeviceSummary, queue_family_index: u32) -> String {
    format!("Selected device {index}: {device} (queue family {queue_family_index})\n")
}

fn support_section(supported: bool) -> String {
    format!("Is surface supported: {supported}\n")
}

/// Run the whole sequence against `window`.
///
/// Every object created along the way is released before this returns,
/// whether it succeeds or not.
pub fn bootstrap<A, W>(api: &A, window: &W, config: &BootstrapConfig) -> Result<BootstrapReport>
where
    A: VulkanApi,
    W: PresentationWindow<A>,
{
    bootstrap_with(api, window, config, |_| {})
}

/// Like [`bootstrap`], but hands each listing section to `emit` as soon as
/// its data is known, so a failing run still shows what was enumerated.
pub fn bootstrap_with<A, W, F>(
    api: &A,
    window: &W,
    config: &BootstrapConfig,
    mut emit: F,
) -> Result<BootstrapReport>
where
    A: VulkanApi,
    W: PresentationWindow<A>,
    F: FnMut(&str),
{
    let layers = list_layers(api)?;
    debug!(count = layers.len(), "Enumerated instance layers");
    emit(&layers_section(&layers));

    let extensions = list_extensions(api)?;
    debug!(count = extensions.len(), "Enumerated instance extensions");
    emit(&extensions_section(&extensions));

    let window_extensions = window.required_extensions()?;
    debug!(?window_extensions, "Window requires");
    emit(&window_extensions_section(&window_extensions));

    let enabled_extensions = filter_by_name(&extensions, &window_extensions);
    let enabled_layers = match &config.layers {
        LayerSelection::All => layers.clone(),
        LayerSelection::Named(wanted) => filter_by_name(&layers, wanted),
    };
    info!(
        layers = ?names(&enabled_layers),
        extensions = ?names(&enabled_extensions),
        "Enabling instance capabilities"
    );

    let instance = Instance::new(api, &config.descriptor(&enabled_layers, &enabled_extensions))?;
    let gpu = instance.select_gpu()?;
    emit(&device_section(gpu.index(), gpu.summary(), gpu.queue_family_index()));

    let request = DeviceRequest {
        layers: names(&enabled_layers),
        extensions: config.device_extensions.clone(),
    };
    let device = gpu.create_logical_device(&request)?;
    let surface = Surface::new(&instance, window)?;
    let surface_supported = gpu.is_surface_supported(&surface);
    info!(surface_supported, "Bootstrap complete");
    emit(&support_section(surface_supported));

    Ok(BootstrapReport {
        layers,
        extensions,
        window_extensions,
        enabled_layers,
        enabled_extensions,
        device_index: gpu.index(),
        device: gpu.summary().clone(),
        queue_family_index: device.queue_family_index(),
        device_extensions: request.extensions,
        surface_supported,
    })
}
