//! Generic catalog table
//!
//! All four catalog collections share one repository type, keyed by entry id
//! and, where the entry has one, by its lookup field.

use crate::error::{Error, Result};
use crate::types::{DestinationFieldDef, EntryId, MappingLink, SourceFieldDef, TransformDef};
use std::collections::HashMap;

/// An entry that can live in a [`CatalogTable`]
pub trait CatalogEntry {
    /// Table name used in diagnostics
    const TABLE: &'static str;
    /// Whether the lookup field must be unique within the table
    const UNIQUE_FIELD: bool;

    fn id(&self) -> EntryId;

    /// Value of the lookup field, if the entry has one
    fn field(&self) -> Option<&str>;
}

impl CatalogEntry for SourceFieldDef {
    const TABLE: &'static str = "source";
    const UNIQUE_FIELD: bool = true;

    fn id(&self) -> EntryId {
        self.id
    }

    fn field(&self) -> Option<&str> {
        Some(&self.name)
    }
}

impl CatalogEntry for DestinationFieldDef {
    const TABLE: &'static str = "destination";
    const UNIQUE_FIELD: bool = true;

    fn id(&self) -> EntryId {
        self.id
    }

    fn field(&self) -> Option<&str> {
        Some(&self.name)
    }
}

impl CatalogEntry for TransformDef {
    const TABLE: &'static str = "transform";
    // Several transform entries may share a mask
    const UNIQUE_FIELD: bool = false;

    fn id(&self) -> EntryId {
        self.id
    }

    fn field(&self) -> Option<&str> {
        Some(&self.mask)
    }
}

impl CatalogEntry for MappingLink {
    const TABLE: &'static str = "mapping";
    const UNIQUE_FIELD: bool = false;

    fn id(&self) -> EntryId {
        self.id
    }

    fn field(&self) -> Option<&str> {
        None
    }
}

/// An immutable, insertion-ordered table of catalog entries
#[derive(Debug, Clone)]
pub struct CatalogTable<T> {
    entries: Vec<T>,
    by_id: HashMap<EntryId, usize>,
    by_field: HashMap<String, Vec<usize>>,
}

impl<T: CatalogEntry> CatalogTable<T> {
    /// Build a table, rejecting duplicate ids and, where required, duplicate fields
    pub fn new(entries: Vec<T>) -> Result<Self> {
        let mut by_id = HashMap::with_capacity(entries.len());
        let mut by_field: HashMap<String, Vec<usize>> = HashMap::new();

        for (index, entry) in entries.iter().enumerate() {
            if by_id.insert(entry.id(), index).is_some() {
                return Err(Error::catalog_entry(
                    format!("duplicate id {} in {} table", entry.id(), T::TABLE),
                    T::TABLE,
                    entry.id(),
                ));
            }

            if let Some(field) = entry.field() {
                let slots = by_field.entry(field.to_string()).or_default();
                if T::UNIQUE_FIELD && !slots.is_empty() {
                    return Err(Error::catalog_entry(
                        format!("duplicate field name '{}' in {} table", field, T::TABLE),
                        T::TABLE,
                        entry.id(),
                    ));
                }
                slots.push(index);
            }
        }

        Ok(Self {
            entries,
            by_id,
            by_field,
        })
    }

    pub fn by_id(&self, id: EntryId) -> Option<&T> {
        self.by_id.get(&id).map(|&index| &self.entries[index])
    }

    /// First entry whose lookup field equals `field`
    pub fn by_field(&self, field: &str) -> Option<&T> {
        self.by_field
            .get(field)
            .and_then(|slots| slots.first())
            .map(|&index| &self.entries[index])
    }

    /// Every entry whose lookup field equals `field`, in insertion order
    pub fn all_by_field(&self, field: &str) -> Vec<&T> {
        self.by_field
            .get(field)
            .map(|slots| slots.iter().map(|&index| &self.entries[index]).collect())
            .unwrap_or_default()
    }

    /// Entries in insertion order
    pub fn all(&self) -> &[T] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn table_name(&self) -> &'static str {
        T::TABLE
    }
}

impl<T: CatalogEntry> Default for CatalogTable<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            by_id: HashMap::new(),
            by_field: HashMap::new(),
        }
    }
}

impl<'a, T> IntoIterator for &'a CatalogTable<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
