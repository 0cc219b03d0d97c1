//! Record indices back to descriptors.

use koala_core::{Index, TypeDesc, TypeKind};

use crate::atoms::AtomTable;
use crate::format::{ProtoItem, StringItem, TypeItem, TypeListItem, TypePayload};
use crate::image::Image;

/// Nesting limit for prototypes inside prototypes. Stops reference cycles
/// in a crafted file.
const MAX_DEPTH: usize = 64;

/// Type records one resolution may visit. A shared record is expanded at
/// every use, so a crafted file can fan out exponentially below the depth
/// limit.
const MAX_NODES: usize = 4096;

impl AtomTable {
    pub fn string(&self, index: Index) -> Option<&str> {
        self.get::<StringItem>(index).map(|s| s.0.as_str())
    }

    /// Rebuild the descriptor stored at `index`. `None` if it or anything it
    /// references is missing, or if it expands past the node budget.
    pub fn resolve_type(&self, index: Index) -> Option<TypeDesc> {
        Resolver::new(self).type_at(index, 0)
    }

    pub fn resolve_type_list(&self, index: Index) -> Option<Vec<TypeDesc>> {
        Resolver::new(self).type_list_at(Some(index), 0)
    }

    /// Rebuild the prototype stored at `index` as a proto descriptor.
    pub fn resolve_proto(&self, index: Index) -> Option<TypeDesc> {
        Resolver::new(self).proto_at(index, 0)
    }
}

struct Resolver<'a> {
    atoms: &'a AtomTable,
    budget: usize,
}

impl<'a> Resolver<'a> {
    fn new(atoms: &'a AtomTable) -> Self {
        Self {
            atoms,
            budget: MAX_NODES,
        }
    }

    fn type_at(&mut self, index: Index, depth: usize) -> Option<TypeDesc> {
        if depth > MAX_DEPTH {
            return None;
        }
        self.budget = self.budget.checked_sub(1)?;

        let atoms = self.atoms;
        let item = atoms.get::<TypeItem>(index)?;
        let kind = match item.payload {
            TypePayload::Primitive(p) => TypeKind::Primitive(p),
            TypePayload::UserDefined { path, name } => TypeKind::UserDefined {
                path: match path {
                    Some(p) => Some(atoms.string(p)?.to_owned()),
                    None => None,
                },
                name: atoms.string(name)?.to_owned(),
            },
            TypePayload::Proto(proto) => self.proto_at(proto, depth + 1)?.into_kind(),
            TypePayload::PackagePath(path) => TypeKind::PackagePath(atoms.string(path)?.to_owned()),
        };
        TypeDesc::from_parts(kind, item.dims, item.varg)
    }

    fn type_list_at(&mut self, index: Option<Index>, depth: usize) -> Option<Vec<TypeDesc>> {
        let Some(index) = index else {
            return Some(Vec::new());
        };
        let atoms = self.atoms;
        atoms
            .get::<TypeListItem>(index)?
            .0
            .iter()
            .map(|&t| self.type_at(t, depth))
            .collect()
    }

    fn proto_at(&mut self, index: Index, depth: usize) -> Option<TypeDesc> {
        let ProtoItem { returns, params } = *self.atoms.get::<ProtoItem>(index)?;
        Some(TypeDesc::proto(
            self.type_list_at(returns, depth)?,
            self.type_list_at(params, depth)?,
        ))
    }
}

impl Image {
    pub fn string(&self, index: Index) -> Option<&str> {
        self.atoms().string(index)
    }

    pub fn resolve_type(&self, index: Index) -> Option<TypeDesc> {
        self.atoms().resolve_type(index)
    }

    pub fn resolve_type_list(&self, index: Index) -> Option<Vec<TypeDesc>> {
        self.atoms().resolve_type_list(index)
    }

    pub fn resolve_proto(&self, index: Index) -> Option<TypeDesc> {
        self.atoms().resolve_proto(index)
    }
}
