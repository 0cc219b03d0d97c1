//! Invariant checks excluded from coverage reports.

#![cfg_attr(coverage_nightly, coverage(off))]

use crate::typedesc::{SignatureError, TypeDesc};

impl TypeDesc {
    pub(crate) fn ensure_modifiers(&self) {
        if self.is_variadic() && self.dims() > 0 {
            panic!("TypeDesc: variadic descriptor cannot have array dims (got {self:?})");
        }
    }
}

pub(crate) fn ensure_parsed<T>(sig: &str, parsed: Result<T, SignatureError>) -> T {
    parsed.unwrap_or_else(|err| panic!("malformed signature {sig:?}: {err}"))
}
