//! Image file header (32 bytes).
//!
//! - 0-3: magic `KLC\0`
//! - 4-7: version bytes
//! - 8-31: file size, header size, endian tag, directory offset,
//!   directory entry count, package name block size (6 × u32)

use super::{ENDIAN_TAG, HEADER_SIZE, MAGIC, VERSION};

/// File header, first 32 bytes of an image.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(C)]
pub struct Header {
    pub magic: [u8; 4],
    pub version: [u8; 4],
    /// Computed by `Image::finish`. Counts the package block twice, so it is
    /// larger than the written file by `pkg_size`.
    pub file_size: u32,
    pub header_size: u32,
    pub endian_tag: u32,
    /// Directory offset: `header_size + pkg_size`.
    pub map_offset: u32,
    /// Number of directory entries.
    pub map_size: u32,
    pub pkg_size: u32,
}

const _: () = assert!(std::mem::size_of::<Header>() == HEADER_SIZE as usize);

impl Header {
    /// Fresh header for a package block of `pkg_size` bytes. Sizes are zero
    /// until the image is finished.
    pub fn new(pkg_size: u32) -> Self {
        Self {
            magic: MAGIC,
            version: VERSION,
            file_size: 0,
            header_size: HEADER_SIZE,
            endian_tag: ENDIAN_TAG,
            map_offset: HEADER_SIZE + pkg_size,
            map_size: 0,
            pkg_size,
        }
    }

    /// Decode header from 32 bytes.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        assert!(bytes.len() >= HEADER_SIZE as usize, "header too short");

        let u32_at = |at: usize| {
            u32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
        };

        Self {
            magic: [bytes[0], bytes[1], bytes[2], bytes[3]],
            version: [bytes[4], bytes[5], bytes[6], bytes[7]],
            file_size: u32_at(8),
            header_size: u32_at(12),
            endian_tag: u32_at(16),
            map_offset: u32_at(20),
            map_size: u32_at(24),
            pkg_size: u32_at(28),
        }
    }

    /// Encode header to 32 bytes.
    pub fn to_bytes(&self) -> [u8; 32] {
        let mut bytes = [0u8; 32];
        bytes[0..4].copy_from_slice(&self.magic);
        bytes[4..8].copy_from_slice(&self.version);
        bytes[8..12].copy_from_slice(&self.file_size.to_le_bytes());
        bytes[12..16].copy_from_slice(&self.header_size.to_le_bytes());
        bytes[16..20].copy_from_slice(&self.endian_tag.to_le_bytes());
        bytes[20..24].copy_from_slice(&self.map_offset.to_le_bytes());
        bytes[24..28].copy_from_slice(&self.map_size.to_le_bytes());
        bytes[28..32].copy_from_slice(&self.pkg_size.to_le_bytes());
        bytes
    }

    /// Only the three letters are significant; the fourth byte is a NUL pad.
    pub fn validate_magic(&self) -> bool {
        self.magic[..3] == MAGIC[..3]
    }

    pub fn validate_endian(&self) -> bool {
        self.endian_tag == ENDIAN_TAG
    }

    pub fn major(&self) -> u8 {
        self.version[0].wrapping_sub(b'0')
    }

    pub fn minor(&self) -> u8 {
        self.version[1].wrapping_sub(b'0')
    }

    pub fn build(&self) -> u16 {
        let hi = self.version[2].wrapping_sub(b'0') as u16;
        let lo = self.version[3].wrapping_sub(b'0') as u16;
        (hi << 8) | lo
    }
}
