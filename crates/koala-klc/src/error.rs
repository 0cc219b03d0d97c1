//! Image load errors.

use std::io;

use crate::format::Category;

/// Why an image could not be loaded or written.
///
/// Only malformed input and I/O land here. A producer-side bug (a record
/// pointing at an index that was never interned) panics instead.
#[derive(Debug, thiserror::Error)]
pub enum ImageError {
    #[error("invalid magic: expected KLC")]
    InvalidMagic,
    #[error("endian tag mismatch: found {0:#x}, expected {expected:#x}", expected = crate::format::ENDIAN_TAG)]
    EndianMismatch(u32),
    #[error("truncated {what} at offset {offset}: need {needed} bytes, {available} available")]
    Truncated {
        what: &'static str,
        offset: usize,
        needed: usize,
        available: usize,
    },
    #[error("unknown category id {0} in directory")]
    UnknownCategory(u16),
    #[error("invalid {what} record: {detail}")]
    InvalidRecord { what: &'static str, detail: String },
    #[error("{category} #{index} references missing {target} #{target_index}")]
    DanglingReference {
        category: Category,
        index: u32,
        target: Category,
        target_index: u32,
    },
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, ImageError>;
