//! Record layouts, one per category.
//!
//! Each record type knows its serialized length, how to write and read
//! itself, and which other records it points at. References are [`Index`]
//! values into the target category's table; an absent optional reference is
//! stored as `-1`.

use std::fmt;
use std::hash::Hash;

use koala_core::{Index, Primitive};

use super::{ByteReader, Category};
use crate::error::{ImageError, Result};

/// Per-category behavior shared by every record type.
pub trait Record: Clone + Eq + Hash + fmt::Debug {
    const CATEGORY: Category;

    /// Serialized size in bytes.
    fn byte_len(&self) -> usize;

    fn write(&self, out: &mut Vec<u8>);

    fn read(r: &mut ByteReader<'_>) -> Result<Self>;

    /// Records this one points at, as `(target category, index)`.
    fn references(&self) -> Vec<(Category, Index)> {
        Vec::new()
    }
}

fn put_i16(out: &mut Vec<u8>, v: i16) {
    out.extend_from_slice(&v.to_le_bytes());
}

fn put_i32(out: &mut Vec<u8>, v: i32) {
    out.extend_from_slice(&v.to_le_bytes());
}

fn put_index(out: &mut Vec<u8>, index: Index) {
    put_i32(out, index.as_u32() as i32);
}

fn put_optional(out: &mut Vec<u8>, index: Option<Index>) {
    put_i32(out, index.map_or(-1, |i| i.as_u32() as i32));
}

fn invalid(what: &'static str, detail: impl Into<String>) -> ImageError {
    ImageError::InvalidRecord {
        what,
        detail: detail.into(),
    }
}

fn read_index(r: &mut ByteReader<'_>, what: &'static str) -> Result<Index> {
    let raw = r.i32(what)?;
    if raw < 0 {
        return Err(invalid(what, format!("negative index {raw}")));
    }
    Ok(Index::from_raw(raw as u32))
}

fn read_optional(r: &mut ByteReader<'_>, what: &'static str) -> Result<Option<Index>> {
    match r.i32(what)? {
        -1 => Ok(None),
        raw if raw >= 0 => Ok(Some(Index::from_raw(raw as u32))),
        raw => Err(invalid(what, format!("negative index {raw}"))),
    }
}

fn read_count(r: &mut ByteReader<'_>, what: &'static str) -> Result<usize> {
    let raw = r.i32(what)?;
    if raw < 0 {
        return Err(invalid(what, format!("negative length {raw}")));
    }
    Ok(raw as usize)
}

fn read_access(raw: i32, what: &'static str) -> Result<Access> {
    Access::from_bits(raw).ok_or_else(|| invalid(what, format!("invalid access flags {raw}")))
}

// ============================================================================
// Access flags
// ============================================================================

/// Symbol access flags.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct Access(u8);

impl Access {
    pub const PUBLIC: Self = Self(0);
    pub const PRIVATE: Self = Self(1);
    pub const CONST: Self = Self(2);

    /// Access implied by a symbol name: a leading uppercase letter exports it.
    pub fn for_name(name: &str, is_const: bool) -> Self {
        let mut bits = if name.starts_with(char::is_uppercase) {
            Self::PUBLIC.0
        } else {
            Self::PRIVATE.0
        };
        if is_const {
            bits |= Self::CONST.0;
        }
        Self(bits)
    }

    pub fn from_bits(bits: i32) -> Option<Self> {
        (0..=3).contains(&bits).then_some(Self(bits as u8))
    }

    #[inline]
    pub fn bits(self) -> u8 {
        self.0
    }

    pub fn is_public(self) -> bool {
        self.0 & Self::PRIVATE.0 == 0
    }

    pub fn is_const(self) -> bool {
        self.0 & Self::CONST.0 != 0
    }

    pub fn visibility(self) -> &'static str {
        if self.is_public() { "public" } else { "private" }
    }
}

impl fmt::Display for Access {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let binding = if self.is_const() { "const" } else { "var" };
        write!(f, "{binding},{}", self.visibility())
    }
}

// ============================================================================
// Directory
// ============================================================================

/// Directory entry: where a category's section starts and how many records it has.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct MapItem {
    pub category: Category,
    pub offset: u32,
    pub count: u32,
}

impl Record for MapItem {
    const CATEGORY: Category = Category::Map;

    fn byte_len(&self) -> usize {
        12
    }

    fn write(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.category.id().to_le_bytes());
        out.extend_from_slice(&0u16.to_le_bytes());
        out.extend_from_slice(&self.offset.to_le_bytes());
        put_i32(out, self.count as i32);
    }

    fn read(r: &mut ByteReader<'_>) -> Result<Self> {
        let id = r.u16("map")?;
        let category = Category::from_u16(id).ok_or(ImageError::UnknownCategory(id))?;
        let _reserved = r.u16("map")?;
        let offset = r.u32("map")?;
        let count = read_count(r, "map")? as u32;
        Ok(Self {
            category,
            offset,
            count,
        })
    }
}

// ============================================================================
// Deduplicated records
// ============================================================================

/// Length-prefixed, NUL-terminated string.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct StringItem(pub String);

impl Record for StringItem {
    const CATEGORY: Category = Category::String;

    fn byte_len(&self) -> usize {
        4 + self.0.len() + 1
    }

    fn write(&self, out: &mut Vec<u8>) {
        put_i32(out, self.0.len() as i32 + 1);
        out.extend_from_slice(self.0.as_bytes());
        out.push(0);
    }

    fn read(r: &mut ByteReader<'_>) -> Result<Self> {
        let len = read_count(r, "string")?;
        let raw = r.bytes(len, "string")?;
        let Some((&0, text)) = raw.split_last() else {
            return Err(invalid("string", "missing NUL terminator"));
        };
        let text = std::str::from_utf8(text).map_err(|e| invalid("string", e.to_string()))?;
        Ok(Self(text.to_owned()))
    }
}

const KIND_PRIMITIVE: i8 = 1;
const KIND_USER_DEFINED: i8 = 2;
const KIND_PROTO: i8 = 3;
const KIND_PACKAGE_PATH: i8 = 4;

/// Kind-specific part of a [`TypeItem`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum TypePayload {
    Primitive(Primitive),
    UserDefined { path: Option<Index>, name: Index },
    Proto(Index),
    PackagePath(Index),
}

/// Interned type descriptor.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct TypeItem {
    pub varg: bool,
    pub dims: u16,
    pub payload: TypePayload,
}

impl Record for TypeItem {
    const CATEGORY: Category = Category::Type;

    fn byte_len(&self) -> usize {
        12
    }

    fn write(&self, out: &mut Vec<u8>) {
        let kind = match self.payload {
            TypePayload::Primitive(_) => KIND_PRIMITIVE,
            TypePayload::UserDefined { .. } => KIND_USER_DEFINED,
            TypePayload::Proto(_) => KIND_PROTO,
            TypePayload::PackagePath(_) => KIND_PACKAGE_PATH,
        };
        out.push(kind as u8);
        out.push(self.varg as u8);
        put_i16(out, self.dims as i16);

        match self.payload {
            TypePayload::Primitive(p) => {
                out.push(p.tag());
                out.extend_from_slice(&[0; 7]);
            }
            TypePayload::UserDefined { path, name } => {
                put_optional(out, path);
                put_index(out, name);
            }
            TypePayload::Proto(proto) => {
                put_index(out, proto);
                put_i32(out, 0);
            }
            TypePayload::PackagePath(path) => {
                put_index(out, path);
                put_i32(out, -1);
            }
        }
    }

    fn read(r: &mut ByteReader<'_>) -> Result<Self> {
        let kind = r.u8("type")? as i8;
        let varg = r.u8("type")? != 0;
        let dims = r.i16("type")? as u16;
        if varg && dims > 0 {
            return Err(invalid("type", "variadic type with array dims"));
        }

        let payload = match kind {
            KIND_PRIMITIVE => {
                let raw = r.bytes(8, "type")?;
                let p = Primitive::from_tag(raw[0])
                    .ok_or_else(|| invalid("type", format!("unknown primitive tag {:#04x}", raw[0])))?;
                TypePayload::Primitive(p)
            }
            KIND_USER_DEFINED => TypePayload::UserDefined {
                path: read_optional(r, "type")?,
                name: read_index(r, "type")?,
            },
            KIND_PROTO => {
                let proto = read_index(r, "type")?;
                r.i32("type")?;
                TypePayload::Proto(proto)
            }
            KIND_PACKAGE_PATH => {
                let path = read_index(r, "type")?;
                r.i32("type")?;
                TypePayload::PackagePath(path)
            }
            other => return Err(invalid("type", format!("unknown kind {other}"))),
        };

        Ok(Self {
            varg,
            dims,
            payload,
        })
    }

    fn references(&self) -> Vec<(Category, Index)> {
        match self.payload {
            TypePayload::Primitive(_) => Vec::new(),
            TypePayload::UserDefined { path, name } => path
                .into_iter()
                .chain([name])
                .map(|i| (Category::String, i))
                .collect(),
            TypePayload::Proto(proto) => vec![(Category::Proto, proto)],
            TypePayload::PackagePath(path) => vec![(Category::String, path)],
        }
    }
}

/// Ordered list of type indices. Never empty: an empty list is encoded as a
/// `-1` reference by whoever would point at it.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct TypeListItem(pub Vec<Index>);

impl Record for TypeListItem {
    const CATEGORY: Category = Category::TypeList;

    fn byte_len(&self) -> usize {
        4 + 4 * self.0.len()
    }

    fn write(&self, out: &mut Vec<u8>) {
        put_i32(out, self.0.len() as i32);
        for &index in &self.0 {
            put_index(out, index);
        }
    }

    fn read(r: &mut ByteReader<'_>) -> Result<Self> {
        let len = read_count(r, "typelist")?;
        if len.saturating_mul(4) > r.remaining() {
            return Err(ImageError::Truncated {
                what: "typelist",
                offset: r.position(),
                needed: len.saturating_mul(4),
                available: r.remaining(),
            });
        }
        let items = (0..len)
            .map(|_| read_index(r, "typelist"))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self(items))
    }

    fn references(&self) -> Vec<(Category, Index)> {
        self.0.iter().map(|&i| (Category::Type, i)).collect()
    }
}

/// Function prototype: return and parameter type lists.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct ProtoItem {
    pub returns: Option<Index>,
    pub params: Option<Index>,
}

impl Record for ProtoItem {
    const CATEGORY: Category = Category::Proto;

    fn byte_len(&self) -> usize {
        8
    }

    fn write(&self, out: &mut Vec<u8>) {
        put_optional(out, self.returns);
        put_optional(out, self.params);
    }

    fn read(r: &mut ByteReader<'_>) -> Result<Self> {
        Ok(Self {
            returns: read_optional(r, "proto")?,
            params: read_optional(r, "proto")?,
        })
    }

    fn references(&self) -> Vec<(Category, Index)> {
        [self.returns, self.params]
            .into_iter()
            .flatten()
            .map(|i| (Category::TypeList, i))
            .collect()
    }
}

const CONST_INT: i32 = 1;
const CONST_FLOAT: i32 = 2;
const CONST_BOOL: i32 = 3;
const CONST_STRING: i32 = 4;

/// Constant pool entry.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum ConstItem {
    Int(i64),
    /// IEEE-754 bits, so equal constants are bit-identical.
    Float(u64),
    Bool(bool),
    String(Index),
}

impl ConstItem {
    pub fn float(value: f64) -> Self {
        Self::Float(value.to_bits())
    }

    pub fn as_f64(self) -> Option<f64> {
        match self {
            Self::Float(bits) => Some(f64::from_bits(bits)),
            _ => None,
        }
    }
}

impl Record for ConstItem {
    const CATEGORY: Category = Category::Const;

    fn byte_len(&self) -> usize {
        16
    }

    fn write(&self, out: &mut Vec<u8>) {
        let (kind, value) = match *self {
            Self::Int(v) => (CONST_INT, v),
            Self::Float(bits) => (CONST_FLOAT, bits as i64),
            Self::Bool(b) => (CONST_BOOL, b as i64),
            Self::String(index) => (CONST_STRING, index.as_u32() as i64),
        };
        put_i32(out, kind);
        put_i32(out, 0);
        out.extend_from_slice(&value.to_le_bytes());
    }

    fn read(r: &mut ByteReader<'_>) -> Result<Self> {
        let kind = r.i32("const")?;
        r.i32("const")?;
        let value = r.i64("const")?;

        match kind {
            CONST_INT => Ok(Self::Int(value)),
            CONST_FLOAT => Ok(Self::Float(value as u64)),
            CONST_BOOL => Ok(Self::Bool(value != 0)),
            CONST_STRING => u32::try_from(value)
                .map(|i| Self::String(Index::from_raw(i)))
                .map_err(|_| invalid("const", format!("string index {value} out of range"))),
            other => Err(invalid("const", format!("unknown kind {other}"))),
        }
    }

    fn references(&self) -> Vec<(Category, Index)> {
        match *self {
            Self::String(index) => vec![(Category::String, index)],
            _ => Vec::new(),
        }
    }
}

// ============================================================================
// Append-only records
// ============================================================================

/// Which kind of record owns a local variable.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[repr(u16)]
pub enum LocalScope {
    Function = 1,
    Method = 2,
}

impl LocalScope {
    pub fn from_u16(v: u16) -> Option<Self> {
        match v {
            1 => Some(Self::Function),
            2 => Some(Self::Method),
            _ => None,
        }
    }

    /// Category of the owning record.
    pub fn owner(self) -> Category {
        match self {
            Self::Function => Category::Func,
            Self::Method => Category::Method,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Function => "in-func",
            Self::Method => "in-meth",
        }
    }
}

/// Local variable debug info.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct LocVarItem {
    pub name: Index,
    pub ty: Index,
    /// Index of the owning function or method record.
    pub pos: Index,
    pub scope: LocalScope,
    /// Slot number inside the owner's frame.
    pub index: u16,
}

impl Record for LocVarItem {
    const CATEGORY: Category = Category::LocVar;

    fn byte_len(&self) -> usize {
        16
    }

    fn write(&self, out: &mut Vec<u8>) {
        put_index(out, self.name);
        put_index(out, self.ty);
        put_index(out, self.pos);
        put_i16(out, self.scope as u16 as i16);
        put_i16(out, self.index as i16);
    }

    fn read(r: &mut ByteReader<'_>) -> Result<Self> {
        let name = read_index(r, "locvar")?;
        let ty = read_index(r, "locvar")?;
        let pos = read_index(r, "locvar")?;
        let flags = r.u16("locvar")?;
        let scope = LocalScope::from_u16(flags)
            .ok_or_else(|| invalid("locvar", format!("unknown scope flags {flags}")))?;
        let index = r.u16("locvar")?;
        Ok(Self {
            name,
            ty,
            pos,
            scope,
            index,
        })
    }

    fn references(&self) -> Vec<(Category, Index)> {
        vec![
            (Category::String, self.name),
            (Category::Type, self.ty),
            (self.scope.owner(), self.pos),
        ]
    }
}

/// Module-level variable or constant.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct VarItem {
    pub name: Index,
    pub ty: Index,
    pub access: Access,
}

impl Record for VarItem {
    const CATEGORY: Category = Category::Var;

    fn byte_len(&self) -> usize {
        12
    }

    fn write(&self, out: &mut Vec<u8>) {
        put_index(out, self.name);
        put_index(out, self.ty);
        put_i32(out, self.access.bits() as i32);
    }

    fn read(r: &mut ByteReader<'_>) -> Result<Self> {
        Ok(Self {
            name: read_index(r, "variable")?,
            ty: read_index(r, "variable")?,
            access: read_access(r.i32("variable")?, "variable")?,
        })
    }

    fn references(&self) -> Vec<(Category, Index)> {
        vec![(Category::String, self.name), (Category::Type, self.ty)]
    }
}

/// Module-level function.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct FuncItem {
    pub name: Index,
    pub proto: Index,
    pub access: Access,
    pub locvars: u16,
    pub code: Index,
}

impl Record for FuncItem {
    const CATEGORY: Category = Category::Func;

    fn byte_len(&self) -> usize {
        16
    }

    fn write(&self, out: &mut Vec<u8>) {
        put_index(out, self.name);
        put_index(out, self.proto);
        put_i16(out, self.access.bits() as i16);
        put_i16(out, self.locvars as i16);
        put_index(out, self.code);
    }

    fn read(r: &mut ByteReader<'_>) -> Result<Self> {
        let name = read_index(r, "function")?;
        let proto = read_index(r, "function")?;
        let access = read_access(r.i16("function")? as i32, "function")?;
        let locvars = r.u16("function")?;
        let code = read_index(r, "function")?;
        Ok(Self {
            name,
            proto,
            access,
            locvars,
            code,
        })
    }

    fn references(&self) -> Vec<(Category, Index)> {
        vec![
            (Category::String, self.name),
            (Category::Proto, self.proto),
            (Category::Code, self.code),
        ]
    }
}

/// Raw instruction bytes of one function or method.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct CodeItem(pub Vec<u8>);

impl Record for CodeItem {
    const CATEGORY: Category = Category::Code;

    fn byte_len(&self) -> usize {
        4 + self.0.len()
    }

    fn write(&self, out: &mut Vec<u8>) {
        put_i32(out, self.0.len() as i32);
        out.extend_from_slice(&self.0);
    }

    fn read(r: &mut ByteReader<'_>) -> Result<Self> {
        let len = read_count(r, "code")?;
        Ok(Self(r.bytes(len, "code")?.to_vec()))
    }
}

/// Class declaration.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct ClassItem {
    /// The class's own nominal type.
    pub ty: Index,
    pub access: Access,
    pub super_type: Option<Index>,
    pub traits: Option<Index>,
}

impl Record for ClassItem {
    const CATEGORY: Category = Category::Class;

    fn byte_len(&self) -> usize {
        16
    }

    fn write(&self, out: &mut Vec<u8>) {
        put_index(out, self.ty);
        put_i32(out, self.access.bits() as i32);
        put_optional(out, self.super_type);
        put_optional(out, self.traits);
    }

    fn read(r: &mut ByteReader<'_>) -> Result<Self> {
        Ok(Self {
            ty: read_index(r, "class")?,
            access: read_access(r.i32("class")?, "class")?,
            super_type: read_optional(r, "class")?,
            traits: read_optional(r, "class")?,
        })
    }

    fn references(&self) -> Vec<(Category, Index)> {
        let mut refs = vec![(Category::Type, self.ty)];
        refs.extend(self.super_type.map(|i| (Category::Type, i)));
        refs.extend(self.traits.map(|i| (Category::TypeList, i)));
        refs
    }
}

/// Class field.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct FieldItem {
    /// Nominal type of the declaring class.
    pub class: Index,
    pub name: Index,
    pub ty: Index,
    pub access: Access,
}

impl Record for FieldItem {
    const CATEGORY: Category = Category::Field;

    fn byte_len(&self) -> usize {
        16
    }

    fn write(&self, out: &mut Vec<u8>) {
        put_index(out, self.class);
        put_index(out, self.name);
        put_index(out, self.ty);
        put_i32(out, self.access.bits() as i32);
    }

    fn read(r: &mut ByteReader<'_>) -> Result<Self> {
        Ok(Self {
            class: read_index(r, "field")?,
            name: read_index(r, "field")?,
            ty: read_index(r, "field")?,
            access: read_access(r.i32("field")?, "field")?,
        })
    }

    fn references(&self) -> Vec<(Category, Index)> {
        vec![
            (Category::Type, self.class),
            (Category::String, self.name),
            (Category::Type, self.ty),
        ]
    }
}

/// Class method.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct MethodItem {
    pub class: Index,
    pub name: Index,
    pub proto: Index,
    pub access: Access,
    pub locvars: u16,
    pub code: Index,
}

impl Record for MethodItem {
    const CATEGORY: Category = Category::Method;

    fn byte_len(&self) -> usize {
        20
    }

    fn write(&self, out: &mut Vec<u8>) {
        put_index(out, self.class);
        put_index(out, self.name);
        put_index(out, self.proto);
        put_i16(out, self.access.bits() as i16);
        put_i16(out, self.locvars as i16);
        put_index(out, self.code);
    }

    fn read(r: &mut ByteReader<'_>) -> Result<Self> {
        let class = read_index(r, "method")?;
        let name = read_index(r, "method")?;
        let proto = read_index(r, "method")?;
        let access = read_access(r.i16("method")? as i32, "method")?;
        let locvars = r.u16("method")?;
        let code = read_index(r, "method")?;
        Ok(Self {
            class,
            name,
            proto,
            access,
            locvars,
            code,
        })
    }

    fn references(&self) -> Vec<(Category, Index)> {
        vec![
            (Category::Type, self.class),
            (Category::String, self.name),
            (Category::Proto, self.proto),
            (Category::Code, self.code),
        ]
    }
}

/// Trait declaration.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct TraitItem {
    pub ty: Index,
    pub access: Access,
    /// Inherited traits.
    pub traits: Option<Index>,
}

impl Record for TraitItem {
    const CATEGORY: Category = Category::Trait;

    fn byte_len(&self) -> usize {
        12
    }

    fn write(&self, out: &mut Vec<u8>) {
        put_index(out, self.ty);
        put_i32(out, self.access.bits() as i32);
        put_optional(out, self.traits);
    }

    fn read(r: &mut ByteReader<'_>) -> Result<Self> {
        Ok(Self {
            ty: read_index(r, "trait")?,
            access: read_access(r.i32("trait")?, "trait")?,
            traits: read_optional(r, "trait")?,
        })
    }

    fn references(&self) -> Vec<(Category, Index)> {
        let mut refs = vec![(Category::Type, self.ty)];
        refs.extend(self.traits.map(|i| (Category::TypeList, i)));
        refs
    }
}

/// Interface method declared by a trait.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct IMethItem {
    /// Nominal type of the declaring trait.
    pub owner: Index,
    pub name: Index,
    pub proto: Index,
    pub access: Access,
}

impl Record for IMethItem {
    const CATEGORY: Category = Category::IMeth;

    fn byte_len(&self) -> usize {
        16
    }

    fn write(&self, out: &mut Vec<u8>) {
        put_index(out, self.owner);
        put_index(out, self.name);
        put_index(out, self.proto);
        put_i32(out, self.access.bits() as i32);
    }

    fn read(r: &mut ByteReader<'_>) -> Result<Self> {
        Ok(Self {
            owner: read_index(r, "imeth")?,
            name: read_index(r, "imeth")?,
            proto: read_index(r, "imeth")?,
            access: read_access(r.i32("imeth")?, "imeth")?,
        })
    }

    fn references(&self) -> Vec<(Category, Index)> {
        vec![
            (Category::Type, self.owner),
            (Category::String, self.name),
            (Category::Proto, self.proto),
        ]
    }
}
