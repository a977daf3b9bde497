//! Payload location.
//!
//! The STM32 image is found by searching for a preamble anchor and then checked by
//! looking for the 0xFF padding that fills the image up to its declared length.

use std::ops::Range;

use crate::container::Container;
use crate::error::ExtractError;
use crate::utils::find_bytes;

/// Anchor preceding the STM32 image.
///
/// The image itself starts with `00 20 00 20` (initial stack pointer), but that
/// alone is not unique enough in the container to search for.
pub const STM32_PREAMBLE: [u8; 8] = [0x64, 0x44, 0x00, 0x00, 0x00, 0x20, 0x00, 0x20];

/// Distance from the anchor to the first byte of the image.
pub const STM32_PREAMBLE_OFFSET: usize = 4;

/// Number of 0xFF bytes required immediately before the end of the image.
pub const TRAILER_LEN: usize = 0xFF;

/// Byte range of a payload within its container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PayloadLocation {
    pub start: usize,
    pub stop: usize,
}

impl PayloadLocation {
    pub fn range(&self) -> Range<usize> {
        self.start..self.stop
    }
}

/// Returns the offset where the STM32 image starts.
pub fn find_payload_start(container: &Container) -> Result<usize, ExtractError> {
    let anchor = find_bytes(container.data(), &STM32_PREAMBLE).ok_or(
        ExtractError::PreambleNotFound {
            kind: container.kind(),
        },
    )?;
    tracing::debug!("{} preamble anchor at 0x{:x}", container.kind(), anchor);
    Ok(anchor + STM32_PREAMBLE_OFFSET)
}

/// Checks that the image starting at `start` ends with the 0xFF trailer.
pub fn validate_bounds(container: &Container, start: usize) -> Result<PayloadLocation, ExtractError> {
    let kind = container.kind();
    let len = kind.payload_len();
    let truncated = ExtractError::TruncatedPayload { kind, start, len };

    let stop = start.checked_add(len).ok_or_else(|| truncated.clone())?;
    let trailer = container
        .data()
        .get(stop - TRAILER_LEN..stop)
        .ok_or_else(|| truncated.clone())?;
    if trailer.iter().any(|&b| b != 0xFF) {
        return Err(truncated);
    }

    Ok(PayloadLocation { start, stop })
}

/// Locates and validates the payload of `container`.
pub fn locate(container: &Container) -> Result<PayloadLocation, ExtractError> {
    let start = find_payload_start(container)?;
    let location = validate_bounds(container, start)?;
    tracing::info!(
        "Found STM32 {} binary at 0x{:x}..0x{:x}",
        container.kind(),
        location.start,
        location.stop
    );
    if let Some(section) = container.section_containing(location.start) {
        tracing::debug!(
            "payload lies in section {} (raw 0x{:x}, vaddr 0x{:08x})",
            section.name,
            section.raw_addr,
            section.virt_addr
        );
    }
    Ok(location)
}
