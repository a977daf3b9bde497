//! Configuration module.
//!
//! This module defines the command-line interface (CLI) using `clap`.

use clap::Parser;
use std::path::PathBuf;

/// Extracts the STM32 firmware embedded in an Xbox HD+ executable.
///
/// The firmware (and optionally the bootloader) is located inside the XBE,
/// validated, and written out as a flat binary ready for flashing.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// Firmware XBE, or a directory containing firmware.xbe
    pub firmware: PathBuf,

    /// Bootloader XBE (or directory) to prepend to the firmware
    #[arg(short, long)]
    pub bootloader: Option<PathBuf>,

    /// Release tag used to name the output
    #[arg(short, long, default_value = "", help = "Release tag used to name the output (defaults to the embedded version)")]
    pub tag: String,

    /// Output directory
    #[arg(short, long, default_value = ".", help = "Directory to write firmware_<tag>.bin to")]
    pub output_dir: PathBuf,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info", help = "Set the logging level")]
    pub log_level: String,
}
