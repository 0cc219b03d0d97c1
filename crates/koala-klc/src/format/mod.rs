//! KLC binary format.
//!
//! Layout: Header (32 bytes) → package name (NUL-padded to 4 bytes) →
//! directory (one 12-byte entry per non-empty category) → category sections
//! in ascending category id order. All integers are little-endian, and every
//! cross-record reference is an index into another category's table.

mod category;
mod header;
mod items;
mod reader;

#[cfg(test)]
mod header_tests;
#[cfg(test)]
mod items_tests;

pub use category::Category;
pub use header::Header;
pub use items::{
    Access, ClassItem, CodeItem, ConstItem, FieldItem, FuncItem, IMethItem, LocVarItem,
    LocalScope, MapItem, MethodItem, ProtoItem, Record, StringItem, TraitItem, TypeItem,
    TypeListItem, TypePayload, VarItem,
};
pub use reader::ByteReader;

/// Magic bytes: b"KLC\0".
pub const MAGIC: [u8; 4] = *b"KLC\0";

/// Version bytes: major, minor, build high, build low, each stored as `'0' + n`.
pub const VERSION: [u8; 4] = [b'0', b'0' + 1, b'0', b'0' + 1];

/// Written as-is so a reader on the other byte order sees a different value.
pub const ENDIAN_TAG: u32 = 0x1a2b3c4d;

pub const HEADER_SIZE: u32 = 32;

/// Size of one directory entry.
pub const MAP_ITEM_SIZE: u32 = 12;

/// Package name alignment.
pub const PKG_ALIGN: u32 = 4;

/// Round up to the next multiple of `align`.
pub fn align_up(value: u32, align: u32) -> u32 {
    (value + align - 1) & !(align - 1)
}

/// Byte size of the padded package name block.
pub fn package_size(package: &str) -> u32 {
    align_up(package.len() as u32 + 1, PKG_ALIGN)
}
