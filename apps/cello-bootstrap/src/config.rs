//! Command line configuration.

use cello_gpu::{BootstrapConfig, LayerSelection, VALIDATION_LAYER};
use cello_platform::PlatformConfig;
use tracing::warn;

/// Everything one run needs.
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub platform: PlatformConfig,
    pub bootstrap: BootstrapConfig,
}

/// What the command line asked for.
#[derive(Debug)]
pub enum Command {
    Run(AppConfig),
    Help,
}

impl AppConfig {
    /// Parse arguments (without the program name).
    ///
    /// Unknown flags and unparsable values are logged and ignored.
    pub fn from_args<I>(args: I) -> Command
    where
        I: IntoIterator<Item = String>,
    {
        let mut config = Self::default();
        let mut layers: Option<Vec<String>> = None;
        let mut all_layers = false;
        let mut validation = true;
        let mut device_extensions: Option<Vec<String>> = None;

        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "-h" | "--help" => return Command::Help,
                "--title" => {
                    if let Some(v) = args.next() {
                        config.platform.title = v;
                    }
                }
                "--width" => {
                    if let Some(v) = parse_next(&mut args, "--width") {
                        config.platform.width = v;
                    }
                }
                "--height" => {
                    if let Some(v) = parse_next(&mut args, "--height") {
                        config.platform.height = v;
                    }
                }
                "--app-name" => {
                    if let Some(v) = args.next() {
                        config.bootstrap.application_name = v;
                    }
                }
                "--layer" => {
                    if let Some(v) = args.next() {
                        layers.get_or_insert_with(Vec::new).push(v);
                    }
                }
                "--all-layers" => all_layers = true,
                "--no-validation" => validation = false,
                "--device-extension" => {
                    if let Some(v) = args.next() {
                        device_extensions.get_or_insert_with(Vec::new).push(v);
                    }
                }
                other => warn!("Ignoring unknown argument {other:?}"),
            }
        }

        config.bootstrap.layers = if all_layers {
            LayerSelection::All
        } else {
            let mut names = match (layers, &config.bootstrap.layers) {
                (Some(names), _) => names,
                (None, LayerSelection::Named(defaults)) => defaults.clone(),
                (None, LayerSelection::All) => Vec::new(),
            };
            if !validation {
                names.retain(|name| name != VALIDATION_LAYER);
            }
            LayerSelection::Named(names)
        };
        if let Some(extensions) = device_extensions {
            config.bootstrap.device_extensions = extensions;
        }

        Command::Run(config)
    }
}

fn parse_next<I, T>(args: &mut I, flag: &str) -> Option<T>
where
    I: Iterator<Item = String>,
    T: std::str::FromStr,
{
    let value = args.next()?;
    match value.parse() {
        Ok(v) => Some(v),
        Err(_) => {
            warn!("Ignoring invalid value {value:?} for {flag}");
            None
        }
    }
}

pub fn print_help() {
    eprintln!(
        "Cello bootstrap: opens a window and creates a Vulkan device and surface for it

USAGE:
    cello-bootstrap [OPTIONS]

WINDOW OPTIONS:
    --title <TITLE>              Window title (default: \"My Game\")
    --width <N>                  Window width (default: 800)
    --height <N>                 Window height (default: 600)

VULKAN OPTIONS:
    --app-name <NAME>            Application name reported to the driver
    --layer <NAME>               Enable an instance layer if available (repeatable)
    --all-layers                 Enable every available instance layer
    --no-validation              Do not enable {VALIDATION_LAYER}
    --device-extension <NAME>    Require a device extension (repeatable)
                                 Default: VK_KHR_swapchain

OTHER:
    -h, --help                   Print this help message

ENVIRONMENT VARIABLES:
    RUST_LOG                     Set log level (e.g., info, debug, trace)"
    );
}
