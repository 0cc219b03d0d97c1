//! Producer operations: turn compiler-level declarations into records.
//!
//! Dependencies (names, types, type lists, prototypes, constants) are
//! interned, so symbols that share them share indices. Symbol records and
//! code blobs are always appended: two declarations are two records even
//! when every field matches.

use koala_core::{Index, TypeDesc, TypeKind};

use crate::atoms::AtomTable;
use crate::format::{
    Access, ClassItem, CodeItem, ConstItem, FieldItem, FuncItem, IMethItem, LocVarItem,
    LocalScope, MethodItem, ProtoItem, StringItem, TraitItem, TypeItem, TypeListItem,
    TypePayload, VarItem,
};
use crate::image::Image;
use crate::invariants::ensure_proto;

impl AtomTable {
    pub fn intern_string(&mut self, value: &str) -> Index {
        self.set(StringItem(value.to_owned()))
    }

    /// Intern `desc` and everything it mentions.
    ///
    /// A prototype interns its type lists first, then the proto record,
    /// then the type record pointing at it.
    pub fn intern_type(&mut self, desc: &TypeDesc) -> Index {
        let payload = match desc.kind() {
            TypeKind::Primitive(p) => TypePayload::Primitive(*p),
            TypeKind::UserDefined { path, name } => {
                let path = path.as_deref().map(|p| self.intern_string(p));
                let name = self.intern_string(name);
                TypePayload::UserDefined { path, name }
            }
            TypeKind::Proto { returns, params } => {
                TypePayload::Proto(self.intern_proto(returns, params))
            }
            TypeKind::PackagePath(path) => TypePayload::PackagePath(self.intern_string(path)),
        };
        self.set(TypeItem {
            varg: desc.is_variadic(),
            dims: desc.dims(),
            payload,
        })
    }

    /// Intern a type list. Empty lists have no record and return `None`.
    pub fn intern_type_list(&mut self, list: &[TypeDesc]) -> Option<Index> {
        if list.is_empty() {
            return None;
        }
        let items = list.iter().map(|d| self.intern_type(d)).collect();
        Some(self.set(TypeListItem(items)))
    }

    pub fn intern_proto(&mut self, returns: &[TypeDesc], params: &[TypeDesc]) -> Index {
        let returns = self.intern_type_list(returns);
        let params = self.intern_type_list(params);
        self.set(ProtoItem { returns, params })
    }

    pub fn index_of_string(&self, value: &str) -> Option<Index> {
        self.index_of(&StringItem(value.to_owned()))
    }

    /// Lookup without insertion. `None` if `desc` or anything it mentions was
    /// never interned.
    pub fn index_of_type(&self, desc: &TypeDesc) -> Option<Index> {
        let payload = match desc.kind() {
            TypeKind::Primitive(p) => TypePayload::Primitive(*p),
            TypeKind::UserDefined { path, name } => {
                let path = match path {
                    Some(p) => Some(self.index_of_string(p)?),
                    None => None,
                };
                TypePayload::UserDefined {
                    path,
                    name: self.index_of_string(name)?,
                }
            }
            TypeKind::Proto { returns, params } => {
                TypePayload::Proto(self.index_of_proto(returns, params)?)
            }
            TypeKind::PackagePath(path) => TypePayload::PackagePath(self.index_of_string(path)?),
        };
        self.index_of(&TypeItem {
            varg: desc.is_variadic(),
            dims: desc.dims(),
            payload,
        })
    }

    /// Lookup without insertion. The empty list has no record, so it is
    /// always `None`.
    pub fn index_of_type_list(&self, list: &[TypeDesc]) -> Option<Index> {
        self.list_reference(list)?
    }

    pub fn index_of_proto(&self, returns: &[TypeDesc], params: &[TypeDesc]) -> Option<Index> {
        let returns = self.list_reference(returns)?;
        let params = self.list_reference(params)?;
        self.index_of(&ProtoItem { returns, params })
    }

    /// How a list would be referenced: `Some(None)` for the empty list,
    /// `None` when a non-empty list is missing.
    fn list_reference(&self, list: &[TypeDesc]) -> Option<Option<Index>> {
        if list.is_empty() {
            return Some(None);
        }
        let items = list
            .iter()
            .map(|d| self.index_of_type(d))
            .collect::<Option<Vec<_>>>()?;
        self.index_of(&TypeListItem(items)).map(Some)
    }

    /// Nominal type of a class or trait declared in the current package.
    fn intern_local_type(&mut self, name: &str) -> Index {
        self.intern_type(&TypeDesc::user_defined(None, name))
    }
}

impl Image {
    pub fn intern_string(&mut self, value: &str) -> Index {
        self.atoms_mut().intern_string(value)
    }

    pub fn intern_type(&mut self, desc: &TypeDesc) -> Index {
        self.atoms_mut().intern_type(desc)
    }

    pub fn intern_type_list(&mut self, list: &[TypeDesc]) -> Option<Index> {
        self.atoms_mut().intern_type_list(list)
    }

    pub fn intern_proto(&mut self, returns: &[TypeDesc], params: &[TypeDesc]) -> Index {
        self.atoms_mut().intern_proto(returns, params)
    }

    pub fn index_of_string(&self, value: &str) -> Option<Index> {
        self.atoms().index_of_string(value)
    }

    pub fn index_of_type(&self, desc: &TypeDesc) -> Option<Index> {
        self.atoms().index_of_type(desc)
    }

    pub fn index_of_type_list(&self, list: &[TypeDesc]) -> Option<Index> {
        self.atoms().index_of_type_list(list)
    }

    pub fn index_of_proto(&self, returns: &[TypeDesc], params: &[TypeDesc]) -> Option<Index> {
        self.atoms().index_of_proto(returns, params)
    }

    pub fn add_int_const(&mut self, value: i64) -> Index {
        self.atoms_mut().set(ConstItem::Int(value))
    }

    /// Float constants deduplicate by bit pattern: `0.0` and `-0.0` differ.
    pub fn add_float_const(&mut self, value: f64) -> Index {
        self.atoms_mut().set(ConstItem::float(value))
    }

    pub fn add_bool_const(&mut self, value: bool) -> Index {
        self.atoms_mut().set(ConstItem::Bool(value))
    }

    pub fn add_string_const(&mut self, value: &str) -> Index {
        let atoms = self.atoms_mut();
        let string = atoms.intern_string(value);
        atoms.set(ConstItem::String(string))
    }

    /// Record a local variable of the function or method at `pos`.
    pub fn add_local_variable(
        &mut self,
        name: &str,
        ty: &TypeDesc,
        pos: Index,
        scope: LocalScope,
        index: u16,
    ) -> Index {
        let atoms = self.atoms_mut();
        let name = atoms.intern_string(name);
        let ty = atoms.intern_type(ty);
        atoms.append(LocVarItem {
            name,
            ty,
            pos,
            scope,
            index,
        })
    }

    /// Module-level variable, or constant when `is_const`.
    pub fn add_variable(&mut self, name: &str, ty: &TypeDesc, is_const: bool) -> Index {
        let access = Access::for_name(name, is_const);
        let atoms = self.atoms_mut();
        let name = atoms.intern_string(name);
        let ty = atoms.intern_type(ty);
        atoms.append(VarItem { name, ty, access })
    }

    /// Module-level function. Returns the function index for
    /// [`add_local_variable`](Self::add_local_variable).
    ///
    /// # Panics
    /// Panics if `proto` is not a prototype descriptor.
    pub fn add_function(&mut self, name: &str, proto: &TypeDesc, locvars: u16, code: &[u8]) -> Index {
        let (returns, params) = ensure_proto(proto);
        let access = Access::for_name(name, false);
        let atoms = self.atoms_mut();
        let name = atoms.intern_string(name);
        let proto = atoms.intern_proto(returns, params);
        let code = atoms.append(CodeItem(code.to_vec()));
        atoms.append(FuncItem {
            name,
            proto,
            access,
            locvars,
            code,
        })
    }

    /// Class `name` with an optional superclass `(path, name)` and implemented traits.
    pub fn add_class(
        &mut self,
        name: &str,
        super_class: Option<(Option<&str>, &str)>,
        traits: &[TypeDesc],
    ) -> Index {
        let access = Access::for_name(name, false);
        let atoms = self.atoms_mut();
        let ty = atoms.intern_local_type(name);
        let super_type = super_class
            .map(|(path, name)| atoms.intern_type(&TypeDesc::user_defined(path, name)));
        let traits = atoms.intern_type_list(traits);
        atoms.append(ClassItem {
            ty,
            access,
            super_type,
            traits,
        })
    }

    pub fn add_field(&mut self, class: &str, name: &str, ty: &TypeDesc) -> Index {
        let access = Access::for_name(name, false);
        let atoms = self.atoms_mut();
        let class = atoms.intern_local_type(class);
        let name = atoms.intern_string(name);
        let ty = atoms.intern_type(ty);
        atoms.append(FieldItem {
            class,
            name,
            ty,
            access,
        })
    }

    /// Method of `class`. Returns the method index for local variables.
    ///
    /// # Panics
    /// Panics if `proto` is not a prototype descriptor.
    pub fn add_method(
        &mut self,
        class: &str,
        name: &str,
        proto: &TypeDesc,
        locvars: u16,
        code: &[u8],
    ) -> Index {
        let (returns, params) = ensure_proto(proto);
        let access = Access::for_name(name, false);
        let atoms = self.atoms_mut();
        let class = atoms.intern_local_type(class);
        let name = atoms.intern_string(name);
        let proto = atoms.intern_proto(returns, params);
        let code = atoms.append(CodeItem(code.to_vec()));
        atoms.append(MethodItem {
            class,
            name,
            proto,
            access,
            locvars,
            code,
        })
    }

    /// Trait `name` extending `traits`.
    pub fn add_trait(&mut self, name: &str, traits: &[TypeDesc]) -> Index {
        let access = Access::for_name(name, false);
        let atoms = self.atoms_mut();
        let ty = atoms.intern_local_type(name);
        let traits = atoms.intern_type_list(traits);
        atoms.append(TraitItem { ty, access, traits })
    }

    /// Method signature declared by trait `owner`.
    ///
    /// # Panics
    /// Panics if `proto` is not a prototype descriptor.
    pub fn add_interface_method(&mut self, owner: &str, name: &str, proto: &TypeDesc) -> Index {
        let (returns, params) = ensure_proto(proto);
        let access = Access::for_name(name, false);
        let atoms = self.atoms_mut();
        let owner = atoms.intern_local_type(owner);
        let name = atoms.intern_string(name);
        let proto = atoms.intern_proto(returns, params);
        atoms.append(IMethItem {
            owner,
            name,
            proto,
            access,
        })
    }
}
