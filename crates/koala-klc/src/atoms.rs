//! Per-category record tables of one image.
//!
//! [`AtomTable`] holds one [`ItemTable`] per [`Category`]. Typed access goes
//! through the [`Stored`] trait (`atoms.get::<TypeItem>(index)`); code that
//! only knows a category at runtime goes through the `dispatch!` macro, which
//! maps a `Category` value onto the matching record type.

use koala_core::{Index, ItemTable};
use tracing::trace;

use crate::error::Result;
use crate::format::{
    ByteReader, Category, ClassItem, CodeItem, ConstItem, FieldItem, FuncItem, IMethItem,
    LocVarItem, MapItem, MethodItem, ProtoItem, Record, StringItem, TraitItem, TypeItem,
    TypeListItem, VarItem,
};
use crate::invariants::{ensure_deduplicated, ensure_references};

/// All record tables of an image.
#[derive(Debug, Clone, Default)]
pub struct AtomTable {
    map: ItemTable<MapItem>,
    strings: ItemTable<StringItem>,
    types: ItemTable<TypeItem>,
    type_lists: ItemTable<TypeListItem>,
    protos: ItemTable<ProtoItem>,
    consts: ItemTable<ConstItem>,
    locvars: ItemTable<LocVarItem>,
    vars: ItemTable<VarItem>,
    funcs: ItemTable<FuncItem>,
    codes: ItemTable<CodeItem>,
    classes: ItemTable<ClassItem>,
    fields: ItemTable<FieldItem>,
    methods: ItemTable<MethodItem>,
    traits: ItemTable<TraitItem>,
    imeths: ItemTable<IMethItem>,
}

/// A record type with a table in [`AtomTable`].
pub trait Stored: Record {
    fn table(atoms: &AtomTable) -> &ItemTable<Self>;
    fn table_mut(atoms: &mut AtomTable) -> &mut ItemTable<Self>;
}

macro_rules! impl_stored {
    ($($ty:ty => $field:ident),* $(,)?) => {
        $(
            impl Stored for $ty {
                #[inline]
                fn table(atoms: &AtomTable) -> &ItemTable<Self> {
                    &atoms.$field
                }

                #[inline]
                fn table_mut(atoms: &mut AtomTable) -> &mut ItemTable<Self> {
                    &mut atoms.$field
                }
            }
        )*
    };
}

impl_stored! {
    MapItem => map,
    StringItem => strings,
    TypeItem => types,
    TypeListItem => type_lists,
    ProtoItem => protos,
    ConstItem => consts,
    LocVarItem => locvars,
    VarItem => vars,
    FuncItem => funcs,
    CodeItem => codes,
    ClassItem => classes,
    FieldItem => fields,
    MethodItem => methods,
    TraitItem => traits,
    IMethItem => imeths,
}

/// Call a generic function with the record type of a runtime category.
macro_rules! dispatch {
    ($category:expr, $f:ident($($arg:expr),* $(,)?)) => {
        match $category {
            Category::Map => $f::<MapItem>($($arg),*),
            Category::String => $f::<StringItem>($($arg),*),
            Category::Type => $f::<TypeItem>($($arg),*),
            Category::TypeList => $f::<TypeListItem>($($arg),*),
            Category::Proto => $f::<ProtoItem>($($arg),*),
            Category::Const => $f::<ConstItem>($($arg),*),
            Category::LocVar => $f::<LocVarItem>($($arg),*),
            Category::Var => $f::<VarItem>($($arg),*),
            Category::Func => $f::<FuncItem>($($arg),*),
            Category::Code => $f::<CodeItem>($($arg),*),
            Category::Class => $f::<ClassItem>($($arg),*),
            Category::Field => $f::<FieldItem>($($arg),*),
            Category::Method => $f::<MethodItem>($($arg),*),
            Category::Trait => $f::<TraitItem>($($arg),*),
            Category::IMeth => $f::<IMethItem>($($arg),*),
        }
    };
}

fn count_of<R: Stored>(atoms: &AtomTable) -> usize {
    R::table(atoms).len()
}

fn contains_in<R: Stored>(atoms: &AtomTable, index: Index) -> bool {
    R::table(atoms).contains(index)
}

fn byte_len_of<R: Stored>(atoms: &AtomTable) -> usize {
    R::table(atoms).iter().map(|(_, r)| r.byte_len()).sum()
}

fn write_records<R: Stored>(atoms: &AtomTable, out: &mut Vec<u8>) {
    for (_, record) in R::table(atoms).iter() {
        record.write(out);
    }
}

fn load_records<R: Stored>(atoms: &mut AtomTable, r: &mut ByteReader<'_>, count: usize) -> Result<()> {
    let table = R::table_mut(atoms);
    for _ in 0..count {
        let record = R::read(r)?;
        if R::CATEGORY.is_deduplicated() {
            table.append_indexed(record);
        } else {
            table.append(record);
        }
    }
    Ok(())
}

fn first_dangling<R: Stored>(atoms: &AtomTable) -> Option<(Index, Category, Index)> {
    R::table(atoms).iter().find_map(|(index, record)| {
        record
            .references()
            .into_iter()
            .find(|&(target, target_index)| !atoms.contains(target, target_index))
            .map(|(target, target_index)| (index, target, target_index))
    })
}

impl AtomTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get<R: Stored>(&self, index: Index) -> Option<&R> {
        R::table(self).get(index)
    }

    /// Record at `index`.
    ///
    /// # Panics
    /// Panics if `index` is out of range.
    pub fn resolve<R: Stored>(&self, index: Index) -> &R {
        R::table(self).resolve(index)
    }

    /// Lookup without insertion. Only deduplicated categories are indexed.
    pub fn index_of<R: Stored>(&self, record: &R) -> Option<Index> {
        R::table(self).index_of(record)
    }

    /// Lookup-or-insert into a deduplicated category.
    ///
    /// # Panics
    /// Panics if the category is append-only or the record references a
    /// missing index.
    pub fn set<R: Stored>(&mut self, record: R) -> Index {
        ensure_deduplicated(R::CATEGORY);
        ensure_references(self, &record);
        R::table_mut(self).set(record)
    }

    /// Unconditional insert.
    ///
    /// # Panics
    /// Panics if the record references a missing index.
    pub fn append<R: Stored>(&mut self, record: R) -> Index {
        ensure_references(self, &record);
        R::table_mut(self).append(record)
    }

    pub fn records<R: Stored>(&self) -> &[R] {
        R::table(self).as_slice()
    }

    /// Number of records in `category`.
    pub fn len(&self, category: Category) -> usize {
        dispatch!(category, count_of(self))
    }

    /// Whether every payload category is empty.
    pub fn is_empty(&self) -> bool {
        Category::payload().all(|c| self.len(c) == 0)
    }

    pub fn contains(&self, category: Category, index: Index) -> bool {
        dispatch!(category, contains_in(self, index))
    }

    /// Serialized size of the whole `category` section.
    pub fn section_len(&self, category: Category) -> usize {
        dispatch!(category, byte_len_of(self))
    }

    /// Append every record of `category` to `out`, in index order.
    pub fn write_section(&self, category: Category, out: &mut Vec<u8>) {
        dispatch!(category, write_records(self, out));
    }

    /// Read `count` records of `category` and append them in stored order.
    ///
    /// Deduplicated categories are re-registered in their lookup index so a
    /// later `set` still finds them. References are not checked here; see
    /// [`validate_references`](Self::validate_references).
    pub(crate) fn load_section(
        &mut self,
        category: Category,
        r: &mut ByteReader<'_>,
        count: usize,
    ) -> Result<()> {
        trace!(%category, count, offset = r.position(), "loading section");
        dispatch!(category, load_records(self, r, count))
    }

    /// First record, in category order, that points at a missing index.
    pub(crate) fn find_dangling(&self) -> Option<(Category, Index, Category, Index)> {
        Category::payload().find_map(|category| {
            dispatch!(category, first_dangling(self))
                .map(|(index, target, target_index)| (category, index, target, target_index))
        })
    }

    /// Drop the directory so it can be recomputed.
    pub(crate) fn clear_map(&mut self) {
        self.map.clear();
    }
}
