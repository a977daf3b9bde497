//! STM32 firmware extraction from Xbox executables.
//!
//! This library locates the microcontroller images embedded in Xbox HD+ XBE
//! files and turns them into flat binaries. It is organized into several modules:
//! - `config`: CLI configuration.
//! - `container`: XBE signature check and header decoding.
//! - `locate`: Preamble search and trailer validation.
//! - `payload`: Extracted images, version string and plaintext check.
//! - `extractor`: Job orchestration, concatenation, checksum and naming.
//! - `inputs` / `writer`: Filesystem glue around the core.

pub mod config;
pub mod container;
pub mod error;
pub mod extractor;
pub mod inputs;
pub mod locate;
pub mod payload;
pub mod utils;
pub mod writer;

#[cfg(test)]
mod testutil;

pub use container::{Container, PayloadKind};
pub use error::{Advisory, ExtractError};
pub use extractor::{Extraction, Job, PayloadExtractor};
pub use payload::{FirmwareVersion, Payload};
