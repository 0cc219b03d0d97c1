//! Invariant checks excluded from coverage reports.
//!
//! These fire on producer bugs, never on untrusted input.

#![cfg_attr(coverage_nightly, coverage(off))]

use koala_core::{TypeDesc, TypeKind};

use crate::atoms::AtomTable;
use crate::format::{Category, Record};

pub(crate) fn ensure_deduplicated(category: Category) {
    if !category.is_deduplicated() {
        panic!("AtomTable: set on append-only category {category}");
    }
}

pub(crate) fn ensure_references<R: Record>(atoms: &AtomTable, record: &R) {
    for (target, index) in record.references() {
        if !atoms.contains(target, index) {
            panic!(
                "AtomTable: {} record {record:?} references missing {target} #{index}",
                R::CATEGORY
            );
        }
    }
}

pub(crate) fn ensure_finished(finished: bool) {
    if !finished {
        panic!("Image: finish() must run before the image is serialized");
    }
}

/// Split a prototype descriptor into `(returns, params)`.
pub(crate) fn ensure_proto(desc: &TypeDesc) -> (&[TypeDesc], &[TypeDesc]) {
    match desc.kind() {
        TypeKind::Proto { returns, params } => (returns.as_slice(), params.as_slice()),
        _ => panic!("Image: expected a prototype descriptor, got {desc}"),
    }
}
