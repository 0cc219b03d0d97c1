//! Record category ids.

use std::fmt;

/// Record category. The discriminant is the id stored in directory entries.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
#[repr(u16)]
pub enum Category {
    /// Section directory. Filled by `Image::finish`, never by producers.
    Map = 0,
    String = 1,
    Type = 2,
    TypeList = 3,
    Proto = 4,
    Const = 5,
    LocVar = 6,
    Var = 7,
    Func = 8,
    Code = 9,
    Class = 10,
    Field = 11,
    Method = 12,
    Trait = 13,
    IMeth = 14,
}

impl Category {
    /// All categories in id order, which is also serialization order.
    pub const ALL: [Self; 15] = [
        Self::Map,
        Self::String,
        Self::Type,
        Self::TypeList,
        Self::Proto,
        Self::Const,
        Self::LocVar,
        Self::Var,
        Self::Func,
        Self::Code,
        Self::Class,
        Self::Field,
        Self::Method,
        Self::Trait,
        Self::IMeth,
    ];

    /// Convert from a stored id.
    pub fn from_u16(v: u16) -> Option<Self> {
        Self::ALL.get(v as usize).copied()
    }

    #[inline]
    pub fn id(self) -> u16 {
        self as u16
    }

    /// Categories described by directory entries (everything but the directory).
    pub fn payload() -> impl Iterator<Item = Self> {
        Self::ALL.into_iter().skip(1)
    }

    /// Whether insertion goes through lookup-or-insert.
    ///
    /// Symbol-bearing categories and code blobs are append-only: two symbols
    /// may share every attribute and still be distinct.
    pub fn is_deduplicated(self) -> bool {
        matches!(
            self,
            Self::String | Self::Type | Self::TypeList | Self::Proto | Self::Const
        )
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Map => "map",
            Self::String => "string",
            Self::Type => "type",
            Self::TypeList => "typelist",
            Self::Proto => "proto",
            Self::Const => "const",
            Self::LocVar => "locvar",
            Self::Var => "variable",
            Self::Func => "function",
            Self::Code => "code",
            Self::Class => "class",
            Self::Field => "field",
            Self::Method => "method",
            Self::Trait => "trait",
            Self::IMeth => "imeth",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
