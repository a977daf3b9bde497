//! Extraction orchestration.
//!
//! [`PayloadExtractor`] runs a [`Job`] end to end:
//! 1. Validate every container's signature.
//! 2. Locate and bounds-check each payload.
//! 3. Read the version and check for plaintext strings in the firmware payload.
//! 4. Concatenate the payloads, bootloader first.
//! 5. Checksum the result and pick the output name.

use crate::container::{Container, PayloadKind};
use crate::error::{Advisory, ExtractError};
use crate::locate::PayloadLocation;
use crate::payload::{FirmwareVersion, Payload};

/// Tag used in the output name when neither a release tag nor a version is available.
pub const UNKNOWN_TAG: &str = "unknown";

/// The containers to extract from.
#[derive(Debug, Clone, Copy)]
pub enum Job<'a> {
    /// Firmware image only.
    Single { firmware: &'a [u8] },
    /// Bootloader and firmware, emitted as one flat image.
    Dual {
        bootloader: &'a [u8],
        firmware: &'a [u8],
    },
}

impl<'a> Job<'a> {
    /// Inputs in output order. Flashing tools expect the bootloader first.
    fn segments(&self) -> Vec<(PayloadKind, &'a [u8])> {
        match *self {
            Job::Single { firmware } => vec![(PayloadKind::Firmware, firmware)],
            Job::Dual {
                bootloader,
                firmware,
            } => vec![
                (PayloadKind::Bootloader, bootloader),
                (PayloadKind::Firmware, firmware),
            ],
        }
    }
}

/// Result of a successful extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    /// The flat image to write.
    pub output: Vec<u8>,
    /// Version read from the firmware payload, if present.
    pub version: Option<FirmwareVersion>,
    /// Tag used in `file_name`.
    pub tag: String,
    /// `firmware_{tag}.bin`
    pub file_name: String,
    /// Lowercase hex MD5 of `output`.
    pub md5: String,
    pub advisories: Vec<Advisory>,
    /// Where each segment was found in its container, in output order.
    pub segments: Vec<(PayloadKind, PayloadLocation)>,
}

/// Extracts STM32 images from XBE containers.
#[derive(Debug, Clone, Default)]
pub struct PayloadExtractor {
    release_tag: Option<String>,
}

impl PayloadExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses `tag` to name the output. An empty tag means none was supplied.
    pub fn with_release_tag(tag: impl Into<String>) -> Self {
        let tag = tag.into();
        Self {
            release_tag: (!tag.is_empty()).then_some(tag),
        }
    }

    pub fn release_tag(&self) -> Option<&str> {
        self.release_tag.as_deref()
    }

    pub fn extract(&self, job: Job<'_>) -> Result<Extraction, ExtractError> {
        if let Some(tag) = self.release_tag() {
            if tag.contains(['/', '\\']) {
                return Err(ExtractError::InvalidReleaseTag {
                    tag: tag.to_string(),
                });
            }
        }

        let containers = job
            .segments()
            .into_iter()
            .map(|(kind, data)| Container::new(kind, data))
            .collect::<Result<Vec<_>, _>>()?;

        let payloads = containers
            .iter()
            .map(Payload::extract)
            .collect::<Result<Vec<_>, _>>()?;

        let mut advisories = Vec::new();
        let mut version = None;
        for payload in payloads.iter().filter(|p| p.kind() == PayloadKind::Firmware) {
            if payload.strings_look_valid() {
                tracing::info!("Strings look valid!");
            } else {
                tracing::warn!("Binary may be obfuscated... this might not work");
                advisories.push(Advisory::MaybeObfuscated);
            }

            match payload.version() {
                Ok(v) => version = Some(v),
                Err(e) => {
                    tracing::warn!("{}", e);
                    advisories.push(Advisory::VersionNotFound);
                }
            }
        }

        let total = payloads.iter().map(|p| p.bytes().len()).sum();
        let output = payloads
            .iter()
            .fold(Vec::with_capacity(total), |mut out, p| {
                out.extend_from_slice(p.bytes());
                out
            });

        let md5 = format!("{:x}", md5::compute(&output));
        let tag = self.choose_tag(version);

        tracing::debug!("output is {} bytes, md5 {}", output.len(), md5);
        if let (Some(v), Some(t)) = (version, self.release_tag()) {
            if v.to_string() != t {
                tracing::warn!("firmware reports {} but release tag is {}", v, t);
            }
        }

        Ok(Extraction {
            file_name: output_file_name(&tag),
            output,
            version,
            tag,
            md5,
            advisories,
            segments: payloads.iter().map(|p| (p.kind(), p.location())).collect(),
        })
    }

    fn choose_tag(&self, version: Option<FirmwareVersion>) -> String {
        match (&self.release_tag, version) {
            (Some(tag), _) => tag.clone(),
            (None, Some(v)) => v.to_string(),
            (None, None) => UNKNOWN_TAG.to_string(),
        }
    }
}

/// Name of the flat image for `tag`.
pub fn output_file_name(tag: &str) -> String {
    format!("firmware_{}.bin", tag)
}
