//! Module image container: finish, serialize, deserialize.
//!
//! Write path: [`Image::new`] → `add_*` producer calls → [`Image::finish`] →
//! [`Image::write`]. Read path: [`Image::read`] yields a finished image whose
//! tables hold the stored records in stored order.

use std::fs;
use std::path::Path;

use koala_core::Index;
use tracing::debug;

use crate::atoms::{AtomTable, Stored};
use crate::error::{ImageError, Result};
use crate::format::{
    ByteReader, Category, HEADER_SIZE, Header, MAP_ITEM_SIZE, MapItem, package_size,
};
use crate::invariants::ensure_finished;

/// One compiled module.
#[derive(Debug, Clone)]
pub struct Image {
    header: Header,
    package: String,
    atoms: AtomTable,
    finished: bool,
}

impl Image {
    /// Empty image for `package`. Header sizes stay zero until [`finish`](Self::finish).
    pub fn new(package: &str) -> Self {
        let header = Header::new(package_size(package));
        debug!(package, pkg_size = header.pkg_size, "creating image");
        Self {
            header,
            package: package.to_owned(),
            atoms: AtomTable::new(),
            finished: false,
        }
    }

    pub fn package(&self) -> &str {
        &self.package
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    pub fn atoms(&self) -> &AtomTable {
        &self.atoms
    }

    /// Mutable tables. Any mutation invalidates a previous `finish`.
    pub(crate) fn atoms_mut(&mut self) -> &mut AtomTable {
        self.finished = false;
        &mut self.atoms
    }

    /// Whether the directory and header sizes reflect the current tables.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Number of records in `category`.
    pub fn count(&self, category: Category) -> usize {
        self.atoms.len(category)
    }

    pub fn get<R: Stored>(&self, index: Index) -> Option<&R> {
        self.atoms.get(index)
    }

    pub fn records<R: Stored>(&self) -> &[R] {
        self.atoms.records()
    }

    /// Directory entries, one per non-empty category in id order.
    pub fn directory(&self) -> &[MapItem] {
        self.atoms.records()
    }

    /// Compute the section directory and header sizes.
    ///
    /// Offsets assume the directory sits right after the package block and
    /// the sections follow it back-to-back in category id order. Running it
    /// again recomputes everything from scratch.
    pub fn finish(&mut self) {
        self.atoms.clear_map();

        let present: Vec<Category> = Category::payload()
            .filter(|&c| self.atoms.len(c) > 0)
            .collect();

        let pkg_size = self.header.pkg_size;
        let mut offset = self.header.header_size + pkg_size + present.len() as u32 * MAP_ITEM_SIZE;
        let mut length = 0u32;

        for category in present {
            offset += length;
            let count = self.atoms.len(category) as u32;
            self.atoms.append(MapItem {
                category,
                offset,
                count,
            });
            length = self.atoms.section_len(category) as u32;
        }

        self.header.file_size = offset + length + pkg_size;
        self.header.map_size = self.atoms.len(Category::Map) as u32;
        self.finished = true;

        debug!(
            package = %self.package,
            sections = self.header.map_size,
            file_size = self.header.file_size,
            "finished image"
        );
    }

    /// Serialize a finished image.
    ///
    /// # Panics
    /// Panics if the image is not finished.
    pub fn to_bytes(&self) -> Vec<u8> {
        ensure_finished(self.finished);

        let mut out = Vec::with_capacity(self.header.file_size as usize);
        out.extend_from_slice(&self.header.to_bytes());

        out.extend_from_slice(self.package.as_bytes());
        out.resize(HEADER_SIZE as usize + self.header.pkg_size as usize, 0);

        // The directory (category 0) comes first, then the sections.
        for category in Category::ALL {
            self.atoms.write_section(category, &mut out);
        }
        out
    }

    /// Write a finished image to `path`.
    ///
    /// # Panics
    /// Panics if the image is not finished.
    pub fn write(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let bytes = self.to_bytes();
        fs::write(path, &bytes)?;
        debug!(path = %path.display(), bytes = bytes.len(), "wrote image");
        Ok(())
    }

    /// Read an image file.
    pub fn read(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path)?;
        let image = Self::from_bytes(&bytes).inspect_err(|err| {
            debug!(path = %path.display(), %err, "rejected image");
        })?;
        debug!(
            path = %path.display(),
            package = %image.package,
            sections = image.header.map_size,
            "read image"
        );
        Ok(image)
    }

    /// Decode an image. Nothing is returned unless every section decodes and
    /// every cross-reference resolves.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < HEADER_SIZE as usize {
            return Err(ImageError::Truncated {
                what: "header",
                offset: 0,
                needed: HEADER_SIZE as usize,
                available: bytes.len(),
            });
        }

        let header = Header::from_bytes(&bytes[..HEADER_SIZE as usize]);
        if !header.validate_magic() {
            return Err(ImageError::InvalidMagic);
        }
        if !header.validate_endian() {
            return Err(ImageError::EndianMismatch(header.endian_tag));
        }

        let mut r = ByteReader::new(bytes);
        r.seek(HEADER_SIZE as usize, "package")?;
        let block = r.bytes(header.pkg_size as usize, "package")?;
        let name = block.split(|&b| b == 0).next().unwrap_or_default();
        let package = std::str::from_utf8(name)
            .map_err(|e| ImageError::InvalidRecord {
                what: "package",
                detail: e.to_string(),
            })?
            .to_owned();

        let mut atoms = AtomTable::new();
        r.seek(header.map_offset as usize, "map")?;
        atoms.load_section(Category::Map, &mut r, header.map_size as usize)?;

        let directory = atoms.records::<MapItem>().to_vec();
        let mut seen = Vec::with_capacity(directory.len());
        for entry in &directory {
            if entry.category == Category::Map {
                return Err(ImageError::InvalidRecord {
                    what: "map",
                    detail: "directory entry describes the directory".into(),
                });
            }
            if seen.contains(&entry.category) {
                return Err(ImageError::InvalidRecord {
                    what: "map",
                    detail: format!("duplicate entry for {}", entry.category),
                });
            }
            seen.push(entry.category);

            r.seek(entry.offset as usize, entry.category.name())?;
            atoms.load_section(entry.category, &mut r, entry.count as usize)?;
        }

        if let Some((category, index, target, target_index)) = atoms.find_dangling() {
            return Err(ImageError::DanglingReference {
                category,
                index: index.as_u32(),
                target,
                target_index: target_index.as_u32(),
            });
        }

        Ok(Self {
            header,
            package,
            atoms,
            finished: true,
        })
    }
}
