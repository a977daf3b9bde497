//! Extracted STM32 images.

use std::fmt;

use crate::container::{Container, PayloadKind};
use crate::error::ExtractError;
use crate::locate::{self, PayloadLocation};
use crate::utils::find_bytes;

/// String present in unobfuscated firmware builds.
pub const KNOWN_STRING_ENCODER: &[u8] = b"ENCODER_CONEXANT";

/// Hex digit table the version bytes are stored relative to.
pub const KNOWN_STRING_HEX: &[u8] = b"0123456789abcdef";

/// Offset of the version bytes from [`KNOWN_STRING_HEX`].
pub const VERSION_OFFSET: usize = 0xD7;

/// Firmware version as embedded in the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FirmwareVersion {
    pub major: u8,
    pub minor: u8,
    pub patch: u8,
}

impl fmt::Display for FirmwareVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// A validated payload borrowed from its container.
#[derive(Debug, Clone, Copy)]
pub struct Payload<'a> {
    kind: PayloadKind,
    location: PayloadLocation,
    bytes: &'a [u8],
}

impl<'a> Payload<'a> {
    /// Locates and validates the payload of `container`.
    pub fn extract(container: &Container<'a>) -> Result<Self, ExtractError> {
        let location = locate::locate(container)?;
        Ok(Self {
            kind: container.kind(),
            location,
            bytes: &container.data()[location.range()],
        })
    }

    pub fn kind(&self) -> PayloadKind {
        self.kind
    }

    /// Where the payload sits in its container.
    pub fn location(&self) -> PayloadLocation {
        self.location
    }

    pub fn bytes(&self) -> &'a [u8] {
        self.bytes
    }

    /// Reads the version bytes stored after the hex digit table.
    ///
    /// Some releases are known to carry a stale version here, so callers should
    /// prefer a release tag when one is available.
    pub fn version(&self) -> Result<FirmwareVersion, ExtractError> {
        let idx = find_bytes(self.bytes, KNOWN_STRING_HEX).ok_or(ExtractError::VersionNotFound)?
            + VERSION_OFFSET;
        match self.bytes.get(idx..idx + 3) {
            Some(&[major, minor, patch]) => Ok(FirmwareVersion { major, minor, patch }),
            _ => Err(ExtractError::VersionNotFound),
        }
    }

    /// Whether the known plaintext string is present.
    pub fn strings_look_valid(&self) -> bool {
        find_bytes(self.bytes, KNOWN_STRING_ENCODER).is_some()
    }
}
