//! XBE container handling.
//!
//! A [`Container`] is a borrowed XBE image tagged with the [`PayloadKind`] it is
//! expected to carry. Only the `XBEH` signature is required for extraction; the
//! image and section headers are decoded on demand for diagnostics.

use object::endian::{LittleEndian as LE, U32};
use object::read::ReadRef;
use std::fmt;
use std::ops::Range;

use crate::error::ExtractError;
use crate::utils::cstring_at;

/// "XBEH"
pub const XBE_MAGIC: [u8; 4] = *b"XBEH";

/// The microcontroller image a container carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PayloadKind {
    Bootloader,
    Firmware,
}

impl PayloadKind {
    /// Length of the embedded STM32 image, including its 0xFF padding.
    pub const fn payload_len(self) -> usize {
        match self {
            PayloadKind::Bootloader => 0x2800,
            PayloadKind::Firmware => 0xD000,
        }
    }

    /// Name of the container inside a release archive.
    pub const fn file_name(self) -> &'static str {
        match self {
            PayloadKind::Bootloader => "bootloader.xbe",
            PayloadKind::Firmware => "firmware.xbe",
        }
    }
}

impl fmt::Display for PayloadKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PayloadKind::Bootloader => f.write_str("bootloader"),
            PayloadKind::Firmware => f.write_str("firmware"),
        }
    }
}

// Image header field offsets.
const BASE_ADDR_OFFSET: usize = 0x104;
const HEADER_SIZE_OFFSET: usize = 0x108;
const IMAGE_SIZE_OFFSET: usize = 0x10C;
const NUM_SECTIONS_OFFSET: usize = 0x11C;
const SECTION_HEADERS_ADDR_OFFSET: usize = 0x120;

// Section header layout.
const SECTION_HEADER_LEN: usize = 0x38;
const SECTION_VIRT_ADDR: usize = 0x04;
const SECTION_VIRT_SIZE: usize = 0x08;
const SECTION_RAW_ADDR: usize = 0x0C;
const SECTION_RAW_SIZE: usize = 0x10;
const SECTION_NAME_ADDR: usize = 0x14;

/// The image header fields needed to map the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageHeader {
    /// Virtual address the image is loaded at.
    pub base_addr: u32,
    pub header_size: u32,
    pub image_size: u32,
    pub num_sections: u32,
    /// Virtual address of the section header table.
    pub section_headers_addr: u32,
}

impl ImageHeader {
    /// Translates a virtual address inside the mapped headers to a file offset.
    fn rel_addr(&self, virt_addr: u32) -> Result<usize, ExtractError> {
        virt_addr
            .checked_sub(self.base_addr)
            .map(|off| off as usize)
            .ok_or_else(|| {
                ExtractError::MalformedHeader(format!(
                    "address 0x{:08x} below base address 0x{:08x}",
                    virt_addr, self.base_addr
                ))
            })
    }
}

/// A section of the XBE image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionInfo {
    pub name: String,
    pub virt_addr: u32,
    pub virt_size: u32,
    /// File offset of the section's data.
    pub raw_addr: u32,
    pub raw_size: u32,
}

impl SectionInfo {
    /// File offsets covered by the section.
    pub fn raw_range(&self) -> Range<usize> {
        let start = self.raw_addr as usize;
        start..start + self.raw_size as usize
    }
}

/// A validated XBE image.
#[derive(Debug, Clone, Copy)]
pub struct Container<'a> {
    kind: PayloadKind,
    data: &'a [u8],
}

impl<'a> Container<'a> {
    /// Wraps `data`, checking the `XBEH` signature.
    pub fn new(kind: PayloadKind, data: &'a [u8]) -> Result<Self, ExtractError> {
        if !data.starts_with(&XBE_MAGIC) {
            return Err(ExtractError::InvalidContainer { kind });
        }
        tracing::info!("{} file appears to be a valid OG Xbox Executable", kind);
        Ok(Self { kind, data })
    }

    pub fn kind(&self) -> PayloadKind {
        self.kind
    }

    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    fn read_u32(&self, offset: usize) -> Result<u32, ExtractError> {
        self.data
            .read_at::<U32<LE>>(offset as u64)
            .map(|v| v.get(LE))
            .map_err(|()| {
                ExtractError::MalformedHeader(format!("field at 0x{:x} outside image", offset))
            })
    }

    /// Decodes the image header.
    pub fn header(&self) -> Result<ImageHeader, ExtractError> {
        Ok(ImageHeader {
            base_addr: self.read_u32(BASE_ADDR_OFFSET)?,
            header_size: self.read_u32(HEADER_SIZE_OFFSET)?,
            image_size: self.read_u32(IMAGE_SIZE_OFFSET)?,
            num_sections: self.read_u32(NUM_SECTIONS_OFFSET)?,
            section_headers_addr: self.read_u32(SECTION_HEADERS_ADDR_OFFSET)?,
        })
    }

    /// Decodes the section header table.
    pub fn sections(&self) -> Result<Vec<SectionInfo>, ExtractError> {
        let header = self.header()?;
        let table_off = header.rel_addr(header.section_headers_addr)?;
        let count = header.num_sections as usize;
        let table_len = count.checked_mul(SECTION_HEADER_LEN);
        let fits = table_len
            .map(|len| self.data.read_bytes_at(table_off as u64, len as u64).is_ok())
            .unwrap_or(false);
        if !fits {
            return Err(ExtractError::MalformedHeader(format!(
                "section table of {} entries at 0x{:x} exceeds image",
                count, table_off
            )));
        }

        (0..count)
            .map(|i| {
                let entry = table_off + i * SECTION_HEADER_LEN;
                let name_off = header.rel_addr(self.read_u32(entry + SECTION_NAME_ADDR)?)?;
                let name = cstring_at(self.data, name_off).ok_or_else(|| {
                    ExtractError::MalformedHeader(format!(
                        "section name at 0x{:x} outside image",
                        name_off
                    ))
                })?;
                Ok(SectionInfo {
                    name,
                    virt_addr: self.read_u32(entry + SECTION_VIRT_ADDR)?,
                    virt_size: self.read_u32(entry + SECTION_VIRT_SIZE)?,
                    raw_addr: self.read_u32(entry + SECTION_RAW_ADDR)?,
                    raw_size: self.read_u32(entry + SECTION_RAW_SIZE)?,
                })
            })
            .collect()
    }

    /// Finds the section whose file data covers `offset`.
    ///
    /// Header problems are logged and treated as "no section".
    pub fn section_containing(&self, offset: usize) -> Option<SectionInfo> {
        match self.sections() {
            Ok(sections) => sections.into_iter().find(|s| s.raw_range().contains(&offset)),
            Err(e) => {
                tracing::debug!("{}: {}", self.kind, e);
                None
            }
        }
    }
}
