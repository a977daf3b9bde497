//! Entry point for xbe2bin.
//!
//! This file handles high-level application flow:
//! 1. Parse command-line arguments using `clap` and set up logging.
//! 2. Resolve and memory-map the firmware (and optional bootloader) XBE.
//! 3. Extract, concatenate and checksum the STM32 images.
//! 4. Write `firmware_<tag>.bin`.
//!
//! Error handling is done via `anyhow`.

use anyhow::{Context, Result};
use clap::Parser;
use memmap2::Mmap;
use std::fs::File;
use std::path::Path;
use tracing_subscriber::EnvFilter;

use xbe2bin::config::Config;
use xbe2bin::extractor::{Job, PayloadExtractor};
use xbe2bin::{inputs, writer, PayloadKind};

fn map_input(path: &Path, kind: PayloadKind) -> Result<Mmap> {
    let path = inputs::resolve(path, kind)?;
    let file = File::open(&path).with_context(|| format!("failed to open {}", path.display()))?;
    let mmap = unsafe { Mmap::map(&file) }
        .with_context(|| format!("failed to map {}", path.display()))?;
    Ok(mmap)
}

fn main() -> Result<()> {
    let config = Config::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let firmware = map_input(&config.firmware, PayloadKind::Firmware)?;
    let bootloader = config
        .bootloader
        .as_deref()
        .map(|path| map_input(path, PayloadKind::Bootloader))
        .transpose()?;

    let job = match &bootloader {
        Some(bootloader) => Job::Dual {
            bootloader: &bootloader[..],
            firmware: &firmware[..],
        },
        None => Job::Single {
            firmware: &firmware[..],
        },
    };

    let extractor = PayloadExtractor::with_release_tag(config.tag);
    let extraction = extractor.extract(job)?;
    let path = writer::write_output(&config.output_dir, &extraction)?;

    if let Some(version) = extraction.version {
        println!("Release version (from firmware): {}", version);
    }
    if let Some(tag) = extractor.release_tag() {
        println!("Release version (from release tag): {}", tag);
    }
    println!("MD5SUM: {}", extraction.md5);
    println!("{}", path.display());
    Ok(())
}
