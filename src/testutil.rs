//! Synthetic XBE images for tests.
//!
//! Shared with the integration tests through `tests/common`, so this file only
//! depends on std.

#![allow(dead_code)]

pub const PREAMBLE: [u8; 8] = [0x64, 0x44, 0x00, 0x00, 0x00, 0x20, 0x00, 0x20];
pub const BOOTLOADER_LEN: usize = 0x2800;
pub const FIRMWARE_LEN: usize = 0xD000;

pub const BASE_ADDR: u32 = 0x10000;
pub const SECTION_RAW_ADDR: usize = 0x1000;
pub const ANCHOR_OFFSET: usize = SECTION_RAW_ADDR + 0x40;

const SECTION_TABLE: usize = 0x200;
const SECTION_NAME: usize = 0x300;
const PADDING_LEN: usize = 0x400;

fn put_u32(buf: &mut [u8], at: usize, v: u32) {
    buf[at..at + 4].copy_from_slice(&v.to_le_bytes());
}

/// A `len` byte image: stack pointer word, counting body, 0xFF padding.
pub fn payload(len: usize) -> Vec<u8> {
    let mut bytes: Vec<u8> = (0..len).map(|i| (i % 251) as u8).collect();
    bytes[..4].copy_from_slice(&PREAMBLE[4..]);
    bytes[len - PADDING_LEN..].fill(0xFF);
    bytes
}

/// A firmware image, optionally carrying a version and the known string.
pub fn firmware_payload(version: Option<[u8; 3]>, conexant: bool) -> Vec<u8> {
    let mut bytes = vec![0u8; FIRMWARE_LEN];
    bytes[..4].copy_from_slice(&PREAMBLE[4..]);
    if let Some(v) = version {
        bytes[0x100..0x110].copy_from_slice(b"0123456789abcdef");
        bytes[0x100 + 0xD7..0x100 + 0xD7 + 3].copy_from_slice(&v);
    }
    if conexant {
        bytes[0x300..0x310].copy_from_slice(b"ENCODER_CONEXANT");
    }
    bytes[FIRMWARE_LEN - PADDING_LEN..].fill(0xFF);
    bytes
}

/// Wraps `payload` in an XBE with a single `.rdata` section holding it.
pub fn xbe_image(payload: &[u8]) -> Vec<u8> {
    xbe_image_at(ANCHOR_OFFSET, payload)
}

/// Like [`xbe_image`], with the preamble at `anchor_at`.
///
/// An anchor inside the headers overwrites them; only the signature survives.
pub fn xbe_image_at(anchor_at: usize, payload: &[u8]) -> Vec<u8> {
    let total = (anchor_at + 4 + payload.len()).max(SECTION_RAW_ADDR) + 0x20;
    let mut image = vec![0u8; total];
    image[..4].copy_from_slice(b"XBEH");
    put_u32(&mut image, 0x104, BASE_ADDR);
    put_u32(&mut image, 0x108, SECTION_RAW_ADDR as u32);
    put_u32(&mut image, 0x10C, total as u32);
    put_u32(&mut image, 0x11C, 1);
    put_u32(&mut image, 0x120, BASE_ADDR + SECTION_TABLE as u32);

    let raw_size = (total - SECTION_RAW_ADDR) as u32;
    put_u32(&mut image, SECTION_TABLE + 4, BASE_ADDR + SECTION_RAW_ADDR as u32);
    put_u32(&mut image, SECTION_TABLE + 8, raw_size);
    put_u32(&mut image, SECTION_TABLE + 12, SECTION_RAW_ADDR as u32);
    put_u32(&mut image, SECTION_TABLE + 16, raw_size);
    put_u32(&mut image, SECTION_TABLE + 20, BASE_ADDR + SECTION_NAME as u32);
    image[SECTION_NAME..SECTION_NAME + 7].copy_from_slice(b".rdata\0");

    image[anchor_at..anchor_at + 4].copy_from_slice(&PREAMBLE[..4]);
    image[anchor_at + 4..anchor_at + 4 + payload.len()].copy_from_slice(payload);
    image
}
