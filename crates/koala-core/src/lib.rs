#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Core data structures shared by the Koala image writer and loader.
//!
//! - [`TypeDesc`]: type expressions and their compact signature grammar
//! - [`ItemTable`]: insertion-ordered store with optional deduplication
//! - [`Colors`]: ANSI palette for human-readable dumps

mod colors;
mod invariants;
mod item_table;
pub mod typedesc;


pub use colors::Colors;
pub use item_table::{Index, ItemTable};
pub use typedesc::{Primitive, SignatureError, TypeDesc, TypeKind};
