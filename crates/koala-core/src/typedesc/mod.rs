//! Type descriptors.
//!
//! A [`TypeDesc`] is an immutable type expression: a [`TypeKind`] plus two
//! modifiers, array nesting depth (`dims`) and the variadic marker (`varg`).
//! Descriptors are produced by the compiler, usually by parsing the compact
//! signature grammar in [`signature`], and are interned into an image's type
//! table by exact equality.
//!
//! Two equality notions exist:
//! - `Eq`/`Hash`: exact structural equality, used for interning.
//! - [`TypeDesc::is_compatible`]: gradual-typing check where `Any` matches
//!   everything.

mod primitive;
pub mod signature;

#[cfg(test)]
mod signature_tests;
#[cfg(test)]
mod typedesc_tests;

use std::fmt;

use crate::invariants::ensure_parsed;

pub use primitive::Primitive;
pub use signature::SignatureError;

/// The variant part of a type descriptor.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub enum TypeKind {
    Primitive(Primitive),
    /// Class or trait, optionally qualified by the package path declaring it.
    UserDefined { path: Option<String>, name: String },
    /// Function prototype. Owns its return and parameter descriptors.
    Proto {
        returns: Vec<TypeDesc>,
        params: Vec<TypeDesc>,
    },
    /// Reference to a package by path.
    PackagePath(String),
}

/// A type expression.
///
/// Fields are private so a variadic descriptor with array dims cannot exist.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct TypeDesc {
    kind: TypeKind,
    /// Array nesting depth. `[[int` has dims 2.
    dims: u16,
    /// Variadic marker. Only valid on the trailing parameter, never with dims.
    varg: bool,
}

impl TypeDesc {
    fn new(kind: TypeKind) -> Self {
        Self {
            kind,
            dims: 0,
            varg: false,
        }
    }

    pub fn primitive(primitive: Primitive) -> Self {
        Self::new(TypeKind::Primitive(primitive))
    }

    pub fn user_defined(path: Option<&str>, name: &str) -> Self {
        Self::new(TypeKind::UserDefined {
            path: path.map(str::to_owned),
            name: name.to_owned(),
        })
    }

    pub fn proto(returns: Vec<TypeDesc>, params: Vec<TypeDesc>) -> Self {
        Self::new(TypeKind::Proto { returns, params })
    }

    pub fn package_path(path: &str) -> Self {
        Self::new(TypeKind::PackagePath(path.to_owned()))
    }

    /// Reassemble a descriptor from stored parts. `None` if the modifiers
    /// conflict.
    pub fn from_parts(kind: TypeKind, dims: u16, varg: bool) -> Option<Self> {
        if varg && dims > 0 {
            return None;
        }
        Some(Self { kind, dims, varg })
    }

    pub fn kind(&self) -> &TypeKind {
        &self.kind
    }

    pub fn into_kind(self) -> TypeKind {
        self.kind
    }

    pub fn dims(&self) -> u16 {
        self.dims
    }

    pub fn is_variadic(&self) -> bool {
        self.varg
    }

    /// Same type wrapped in `dims` array levels.
    ///
    /// # Panics
    /// Panics if the descriptor is variadic.
    pub fn with_dims(mut self, dims: u16) -> Self {
        self.dims = dims;
        self.ensure_modifiers();
        self
    }

    /// Mark the descriptor as the variadic trailing parameter.
    ///
    /// # Panics
    /// Panics if the descriptor has array dims.
    pub fn into_variadic(mut self) -> Self {
        self.varg = true;
        self.ensure_modifiers();
        self
    }

    pub fn is_any(&self) -> bool {
        matches!(self.kind, TypeKind::Primitive(p) if p.is_any())
    }

    pub fn is_array(&self) -> bool {
        self.dims > 0
    }

    pub fn is_proto(&self) -> bool {
        matches!(self.kind, TypeKind::Proto { .. })
    }

    /// For prototypes, whether the last parameter is variadic.
    pub fn has_varargs(&self) -> bool {
        match &self.kind {
            TypeKind::Proto { params, .. } => params.last().is_some_and(|p| p.varg),
            _ => false,
        }
    }

    /// Gradual-typing compatibility.
    ///
    /// `Any` on either side matches everything. Otherwise kinds and dims must
    /// agree; user types compare names, and paths only when both sides carry
    /// one. Prototypes are not compared structurally.
    pub fn is_compatible(&self, other: &TypeDesc) -> bool {
        if self.is_any() || other.is_any() {
            return true;
        }
        if self.dims != other.dims {
            return false;
        }

        match (&self.kind, &other.kind) {
            (TypeKind::Primitive(a), TypeKind::Primitive(b)) => a == b,
            (
                TypeKind::UserDefined { path: p1, name: n1 },
                TypeKind::UserDefined { path: p2, name: n2 },
            ) => match (p1, p2) {
                (Some(p1), Some(p2)) => p1 == p2 && n1 == n2,
                _ => n1 == n2,
            },
            (TypeKind::Proto { .. }, TypeKind::Proto { .. }) => true,
            (TypeKind::PackagePath(a), TypeKind::PackagePath(b)) => a == b,
            _ => false,
        }
    }

    /// Parse a single descriptor from its signature.
    pub fn parse(sig: &str) -> Result<Self, SignatureError> {
        signature::parse(sig)
    }

    /// Parse a concatenated descriptor list, e.g. a parameter list.
    pub fn parse_list(sig: &str) -> Result<Vec<Self>, SignatureError> {
        signature::parse_list(sig)
    }

    /// Parse a compiler-generated signature.
    ///
    /// # Panics
    /// Panics on a malformed signature: those only come from a compiler bug.
    pub fn from_signature(sig: &str) -> Self {
        ensure_parsed(sig, signature::parse(sig))
    }

    /// List counterpart of [`from_signature`](Self::from_signature).
    pub fn list_from_signature(sig: &str) -> Vec<Self> {
        ensure_parsed(sig, signature::parse_list(sig))
    }

    /// Build a prototype from return and parameter list signatures.
    pub fn proto_from_signatures(returns: &str, params: &str) -> Self {
        Self::proto(
            Self::list_from_signature(returns),
            Self::list_from_signature(params),
        )
    }

    /// Encode back into the signature grammar.
    pub fn signature(&self) -> String {
        let mut out = String::new();
        signature::write(self, &mut out);
        out
    }
}

impl fmt::Display for TypeDesc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.varg {
            f.write_str("...")?;
        }
        for _ in 0..self.dims {
            f.write_str("[]")?;
        }
        match &self.kind {
            TypeKind::Primitive(p) => f.write_str(p.name()),
            TypeKind::UserDefined {
                path: Some(path),
                name,
            } => write!(f, "{path}.{name}"),
            TypeKind::UserDefined { path: None, name } => f.write_str(name),
            TypeKind::Proto { .. } => f.write_str("proto"),
            TypeKind::PackagePath(path) => f.write_str(path),
        }
    }
}

/// Render a descriptor list as `a, b, c`.
pub fn list_to_string(list: &[TypeDesc]) -> String {
    list.iter()
        .map(TypeDesc::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
