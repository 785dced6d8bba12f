//! Cello bootstrap.
//!
//! Opens a window, enumerates Vulkan layers and extensions, creates an
//! instance, a logical device on the first physical device, and a surface
//! for the window, then prints what it found and whether the device can
//! present to the surface.
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p cello-bootstrap -- [OPTIONS]
//! ```
//!
//! Run with `--help` for the option list.
//!
//! ## Environment Variables
//!
//! - `RUST_LOG`: Set log level (e.g., info, debug, trace)

mod config;
mod runner;

use crate::config::{print_help, AppConfig, Command};

fn main() {
    runner::init_logging();

    match AppConfig::from_args(std::env::args().skip(1)) {
        Command::Help => print_help(),
        Command::Run(config) => runner::run(config),
    }
}
