//! Insertion-ordered record storage with optional deduplication.
//!
//! Every record category of an image lives in one `ItemTable`. Records are
//! addressed by an [`Index`] handle that stays valid for the table's lifetime:
//! tables only grow, and nothing is ever removed or reordered.
//!
//! Two insertion disciplines share the same table:
//! - [`ItemTable::set`] looks the record up first and returns the existing
//!   index on a content match (strings, types, type lists, prototypes, constants).
//! - [`ItemTable::append`] always creates a new record (symbols and code blobs).

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

/// Position of a record inside its table.
///
/// Handles are ordered by insertion, which is also serialization order.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
pub struct Index(u32);

impl Index {
    #[inline]
    pub fn as_u32(self) -> u32 {
        self.0
    }

    #[inline]
    pub fn as_usize(self) -> usize {
        self.0 as usize
    }

    /// Create an Index from a raw position. Use only for deserialization.
    #[inline]
    pub fn from_raw(index: u32) -> Self {
        Self(index)
    }
}

impl fmt::Display for Index {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Record table. Optionally deduplicates and hands out [`Index`] handles.
#[derive(Debug, Clone)]
pub struct ItemTable<T> {
    /// Lookup index for records inserted through `set` or `append_indexed`.
    map: HashMap<T, Index>,
    /// Storage in insertion order, indexed by `Index`.
    items: Vec<T>,
}

impl<T> Default for ItemTable<T> {
    fn default() -> Self {
        Self {
            map: HashMap::new(),
            items: Vec::new(),
        }
    }
}

impl<T: Hash + Eq + Clone> ItemTable<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index of a record with identical content, if one was registered.
    ///
    /// Records added through [`append`](Self::append) are never found here.
    #[inline]
    pub fn index_of(&self, item: &T) -> Option<Index> {
        self.map.get(item).copied()
    }

    /// Insert a record unless an identical one exists; return its index.
    pub fn set(&mut self, item: T) -> Index {
        if let Some(&index) = self.map.get(&item) {
            return index;
        }

        let index = self.next_index();
        self.items.push(item.clone());
        self.map.insert(item, index);
        index
    }

    /// Insert a record unconditionally, without registering it for lookup.
    pub fn append(&mut self, item: T) -> Index {
        let index = self.next_index();
        self.items.push(item);
        index
    }

    /// Insert a record unconditionally but make it visible to later lookups.
    ///
    /// Used when reloading a deduplicated table: the stored order is kept as-is,
    /// and if the same content appears twice the first position wins.
    pub fn append_indexed(&mut self, item: T) -> Index {
        let index = self.next_index();
        self.map.entry(item.clone()).or_insert(index);
        self.items.push(item);
        index
    }

    #[inline]
    pub fn get(&self, index: Index) -> Option<&T> {
        self.items.get(index.as_usize())
    }

    /// Resolve an index back to its record.
    ///
    /// # Panics
    /// Panics if the index was not handed out by this table.
    #[inline]
    pub fn resolve(&self, index: Index) -> &T {
        &self.items[index.as_usize()]
    }

    #[inline]
    pub fn contains(&self, index: Index) -> bool {
        index.as_usize() < self.items.len()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    /// Iterate over all records with their indices.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (Index, &T)> {
        self.items
            .iter()
            .enumerate()
            .map(|(i, item)| (Index(i as u32), item))
    }

    /// Drop every record. Previously issued indices become invalid.
    pub fn clear(&mut self) {
        self.map.clear();
        self.items.clear();
    }

    fn next_index(&self) -> Index {
        Index(self.items.len() as u32)
    }
}
