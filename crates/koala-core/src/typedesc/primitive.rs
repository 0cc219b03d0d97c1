//! Primitive type tags.

/// Built-in scalar types, keyed by their one-byte signature tag.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[repr(u8)]
pub enum Primitive {
    Byte = b'b',
    Char = b'c',
    Int = b'i',
    Float = b'f',
    Bool = b'z',
    String = b's',
    /// Root of the type hierarchy; compatible with every other type.
    Any = b'A',
}

impl Primitive {
    pub const ALL: [Self; 7] = [
        Self::Byte,
        Self::Char,
        Self::Int,
        Self::Float,
        Self::Bool,
        Self::String,
        Self::Any,
    ];

    /// Convert from a signature tag.
    pub fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            b'b' => Some(Self::Byte),
            b'c' => Some(Self::Char),
            b'i' => Some(Self::Int),
            b'f' => Some(Self::Float),
            b'z' => Some(Self::Bool),
            b's' => Some(Self::String),
            b'A' => Some(Self::Any),
            _ => None,
        }
    }

    #[inline]
    pub fn tag(self) -> u8 {
        self as u8
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Byte => "byte",
            Self::Char => "char",
            Self::Int => "int",
            Self::Float => "float",
            Self::Bool => "bool",
            Self::String => "string",
            Self::Any => "Any",
        }
    }

    pub fn is_any(self) -> bool {
        matches!(self, Self::Any)
    }
}
