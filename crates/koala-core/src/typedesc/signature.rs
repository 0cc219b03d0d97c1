//! Compact signature grammar for type descriptors.
//!
//! ```text
//! list  := desc*
//! desc  := '...'? '['* base
//! base  := prim                       b c i f z s A
//!        | 'O' (path '.')? name ';'   user-defined type
//!        | 'P' list ':' list ';'      prototype: params, then returns
//!        | 'K' path ';'               package path
//! ```
//!
//! The user-defined form splits path and name at the first `.`.
//! Within a list, `...` may appear once and only on the last element.

use super::{Primitive, TypeDesc, TypeKind};

/// Signature grammar violation.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SignatureError {
    #[error("empty signature")]
    Empty,
    #[error("unknown type tag '{tag}' at offset {offset}")]
    UnknownTag { tag: char, offset: usize },
    #[error("unterminated {what} starting at offset {offset}")]
    Unterminated { what: &'static str, offset: usize },
    #[error("empty name in type starting at offset {offset}")]
    EmptyName { offset: usize },
    #[error("variadic marker at offset {offset} is not on the last element")]
    MisplacedVariadic { offset: usize },
    #[error("variadic marker at offset {offset} combined with array dims")]
    VariadicArray { offset: usize },
    #[error("array nesting starting at offset {offset} exceeds 65535 levels")]
    TooManyDims { offset: usize },
    #[error("trailing input at offset {offset}")]
    Trailing { offset: usize },
}

type Result<T> = std::result::Result<T, SignatureError>;

/// Parse exactly one descriptor.
pub fn parse(sig: &str) -> Result<TypeDesc> {
    if sig.is_empty() {
        return Err(SignatureError::Empty);
    }

    let mut parser = Parser::new(sig);
    let desc = parser.desc()?;
    if !parser.at_end() {
        return Err(SignatureError::Trailing { offset: parser.pos });
    }
    Ok(desc)
}

/// Parse a concatenated list of descriptors. The empty string is the empty list.
pub fn parse_list(sig: &str) -> Result<Vec<TypeDesc>> {
    let mut parser = Parser::new(sig);
    parser.list(None)
}

/// Append the signature encoding of `desc` to `out`.
pub fn write(desc: &TypeDesc, out: &mut String) {
    if desc.varg {
        out.push_str("...");
    }
    for _ in 0..desc.dims {
        out.push('[');
    }

    match &desc.kind {
        TypeKind::Primitive(p) => out.push(p.tag() as char),
        TypeKind::UserDefined { path, name } => {
            out.push('O');
            if let Some(path) = path {
                out.push_str(path);
                out.push('.');
            }
            out.push_str(name);
            out.push(';');
        }
        TypeKind::Proto { returns, params } => {
            out.push('P');
            for p in params {
                write(p, out);
            }
            out.push(':');
            for r in returns {
                write(r, out);
            }
            out.push(';');
        }
        TypeKind::PackagePath(path) => {
            out.push('K');
            out.push_str(path);
            out.push(';');
        }
    }
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.src.len()
    }

    fn peek(&self) -> Option<u8> {
        self.src.as_bytes().get(self.pos).copied()
    }

    fn unknown_tag(&self) -> SignatureError {
        let tag = self.src[self.pos..].chars().next().unwrap_or('\0');
        SignatureError::UnknownTag {
            tag,
            offset: self.pos,
        }
    }

    /// Descriptors up to `terminator` (not consumed) or end of input.
    fn list(&mut self, terminator: Option<u8>) -> Result<Vec<TypeDesc>> {
        let mut items = Vec::new();
        let mut variadic_at = None;

        loop {
            match self.peek() {
                None if terminator.is_none() => break,
                None => {
                    return Err(SignatureError::Unterminated {
                        what: "prototype",
                        offset: self.pos,
                    });
                }
                Some(b) if Some(b) == terminator => break,
                Some(_) => {
                    let start = self.pos;
                    if let Some(offset) = variadic_at {
                        return Err(SignatureError::MisplacedVariadic { offset });
                    }
                    let desc = self.desc()?;
                    if desc.varg {
                        variadic_at = Some(start);
                    }
                    items.push(desc);
                }
            }
        }

        Ok(items)
    }

    fn desc(&mut self) -> Result<TypeDesc> {
        let start = self.pos;

        let varg = self.src[self.pos..].starts_with("...");
        if varg {
            self.pos += 3;
        }

        let mut dims: u16 = 0;
        while self.peek() == Some(b'[') {
            dims = dims
                .checked_add(1)
                .ok_or(SignatureError::TooManyDims { offset: start })?;
            self.pos += 1;
        }
        if varg && dims > 0 {
            return Err(SignatureError::VariadicArray { offset: start });
        }

        let kind = self.base()?;
        Ok(TypeDesc { kind, dims, varg })
    }

    fn base(&mut self) -> Result<TypeKind> {
        let start = self.pos;
        let Some(tag) = self.peek() else {
            return Err(SignatureError::Unterminated {
                what: "descriptor",
                offset: start,
            });
        };

        if let Some(p) = Primitive::from_tag(tag) {
            self.pos += 1;
            return Ok(TypeKind::Primitive(p));
        }

        match tag {
            b'O' => {
                self.pos += 1;
                let body = self.until_semicolon("user type", start)?;
                let (path, name) = match body.split_once('.') {
                    Some((path, name)) => (Some(path), name),
                    None => (None, body),
                };
                if name.is_empty() || path.is_some_and(str::is_empty) {
                    return Err(SignatureError::EmptyName { offset: start });
                }
                Ok(TypeKind::UserDefined {
                    path: path.map(str::to_owned),
                    name: name.to_owned(),
                })
            }
            b'K' => {
                self.pos += 1;
                let path = self.until_semicolon("package path", start)?;
                if path.is_empty() {
                    return Err(SignatureError::EmptyName { offset: start });
                }
                Ok(TypeKind::PackagePath(path.to_owned()))
            }
            b'P' => {
                self.pos += 1;
                let params = self.list(Some(b':'))?;
                self.pos += 1;
                let returns = self.list(Some(b';'))?;
                self.pos += 1;
                Ok(TypeKind::Proto { returns, params })
            }
            _ => Err(self.unknown_tag()),
        }
    }

    /// Consume through the next `;`, returning the text before it.
    fn until_semicolon(&mut self, what: &'static str, start: usize) -> Result<&'a str> {
        let src = self.src;
        let rest = &src[self.pos..];
        let Some(end) = rest.find(';') else {
            return Err(SignatureError::Unterminated {
                what,
                offset: start,
            });
        };
        self.pos += end + 1;
        Ok(&rest[..end])
    }
}
