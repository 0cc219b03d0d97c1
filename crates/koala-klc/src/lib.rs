#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! KLC module image container.
//!
//! This crate contains:
//! - The binary format (header, category ids, record layouts)
//! - The per-category atom table with deduplicating and append-only stores
//! - [`Image`]: finish, write and read of a complete module image
//! - Producer operations (`add_variable`, `add_function`, ...) and resolution
//!   of record indices back into type descriptors
//! - A human-readable [`dump`]

mod atoms;
mod catalog;
mod dump;
mod error;
pub mod format;
mod image;
mod invariants;
mod resolve;


pub use atoms::{AtomTable, Stored};
pub use dump::{dump, dump_without_header};
pub use error::{ImageError, Result};
pub use format::{
    Access, Category, ClassItem, CodeItem, ConstItem, ENDIAN_TAG, FieldItem, FuncItem,
    HEADER_SIZE, Header, IMethItem, LocVarItem, LocalScope, MAGIC, MAP_ITEM_SIZE, MapItem,
    MethodItem, ProtoItem, Record, StringItem, TraitItem, TypeItem, TypeListItem, TypePayload,
    VERSION, VarItem,
};
pub use image::Image;
pub use koala_core::{Colors, Index, Primitive, TypeDesc, TypeKind};
