//! Mapping catalog
//!
//! The catalog holds the four tables that drive a transformation: source
//! field definitions, destination field definitions, transform definitions
//! and the ordered mapping links between them. It is validated once at
//! construction and immutable afterwards.

pub mod loader;
pub mod table;

#[cfg(test)]
mod tests;

pub use table::{CatalogEntry, CatalogTable};

use crate::error::{Error, Result};
use crate::translation::coercion;
use crate::translation::jsonpath::FieldPath;
use crate::translation::transformer::TransformRegistry;
use crate::types::{DestinationFieldDef, EntryId, MappingLink, SourceFieldDef, TransformDef};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Serialized shape of a catalog: four named collections
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogDocument {
    pub source: Vec<SourceFieldDef>,
    pub destination: Vec<DestinationFieldDef>,
    #[serde(default)]
    pub transform: Vec<TransformDef>,
    pub mapping: Vec<MappingLink>,
}

/// Counts describing a loaded catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CatalogSummary {
    pub sources: usize,
    pub required_sources: usize,
    pub destinations: usize,
    pub transforms: usize,
    pub links: usize,
}

/// Validated, read-only set of catalog tables
#[derive(Debug, Clone, Default)]
pub struct MappingCatalog {
    sources: CatalogTable<SourceFieldDef>,
    destinations: CatalogTable<DestinationFieldDef>,
    transforms: CatalogTable<TransformDef>,
    links: CatalogTable<MappingLink>,
}

impl MappingCatalog {
    /// Build a catalog from its tables.
    ///
    /// Checks id and field-name uniqueness, path syntax and that every non-null
    /// destination default converts to its declared kind. Link references and
    /// mask names are checked separately by [`MappingCatalog::validate_links`].
    pub fn new(
        sources: Vec<SourceFieldDef>,
        destinations: Vec<DestinationFieldDef>,
        transforms: Vec<TransformDef>,
        links: Vec<MappingLink>,
    ) -> Result<Self> {
        let catalog = Self {
            sources: CatalogTable::new(sources)?,
            destinations: CatalogTable::new(destinations)?,
            transforms: CatalogTable::new(transforms)?,
            links: CatalogTable::new(links)?,
        };

        for source in &catalog.sources {
            FieldPath::parse(&source.path)?;
        }

        for destination in &catalog.destinations {
            FieldPath::parse(&destination.path)?;
            coercion::coerce_default(&destination.name, destination.kind, &destination.default)?;
        }

        tracing::debug!(
            sources = catalog.sources.len(),
            destinations = catalog.destinations.len(),
            transforms = catalog.transforms.len(),
            links = catalog.links.len(),
            "Catalog constructed"
        );

        Ok(catalog)
    }

    pub fn from_document(document: CatalogDocument) -> Result<Self> {
        Self::new(
            document.source,
            document.destination,
            document.transform,
            document.mapping,
        )
    }

    /// Serialize back into the four-collection document shape
    pub fn to_document(&self) -> CatalogDocument {
        CatalogDocument {
            source: self.sources.all().to_vec(),
            destination: self.destinations.all().to_vec(),
            transform: self.transforms.all().to_vec(),
            mapping: self.links.all().to_vec(),
        }
    }

    /// Check every mapping link against the other tables and the registry.
    ///
    /// Fails on the first dangling source, destination or transform id and on
    /// masks the registry does not know.
    pub fn validate_links(&self, registry: &TransformRegistry) -> Result<()> {
        let mut seen_destinations = HashSet::new();

        for link in &self.links {
            self.link_source(link)?;
            let destination = self.link_destination(link)?;
            if let Some(transform) = self.link_transform(link)? {
                if !registry.contains(&transform.mask) {
                    return Err(registry.unknown_mask(&transform.mask));
                }
            }

            if !seen_destinations.insert(destination.id) {
                tracing::warn!(
                    link = link.id,
                    destination = %destination.name,
                    "Destination field is written by more than one mapping link; the last one wins"
                );
            }
        }

        Ok(())
    }

    pub fn source_by_id(&self, id: EntryId) -> Option<&SourceFieldDef> {
        self.sources.by_id(id)
    }

    pub fn destination_by_id(&self, id: EntryId) -> Option<&DestinationFieldDef> {
        self.destinations.by_id(id)
    }

    pub fn transform_by_id(&self, id: EntryId) -> Option<&TransformDef> {
        self.transforms.by_id(id)
    }

    pub fn link_by_id(&self, id: EntryId) -> Option<&MappingLink> {
        self.links.by_id(id)
    }

    pub fn source_by_name(&self, name: &str) -> Option<&SourceFieldDef> {
        self.sources.by_field(name)
    }

    pub fn destination_by_name(&self, name: &str) -> Option<&DestinationFieldDef> {
        self.destinations.by_field(name)
    }

    /// All transform entries using `mask`
    pub fn transforms_by_mask(&self, mask: &str) -> Vec<&TransformDef> {
        self.transforms.all_by_field(mask)
    }

    /// Mapping links in catalog order
    pub fn links(&self) -> &[MappingLink] {
        self.links.all()
    }

    pub fn sources(&self) -> &CatalogTable<SourceFieldDef> {
        &self.sources
    }

    pub fn destinations(&self) -> &CatalogTable<DestinationFieldDef> {
        &self.destinations
    }

    pub fn transforms(&self) -> &CatalogTable<TransformDef> {
        &self.transforms
    }

    pub fn summary(&self) -> CatalogSummary {
        CatalogSummary {
            sources: self.sources.len(),
            required_sources: self.sources.iter().filter(|s| s.required).count(),
            destinations: self.destinations.len(),
            transforms: self.transforms.len(),
            links: self.links.len(),
        }
    }

    /// Source definition of `link`, or a catalog error naming the link
    pub fn link_source(&self, link: &MappingLink) -> Result<&SourceFieldDef> {
        self.source_by_id(link.source).ok_or_else(|| {
            Error::catalog_entry(
                format!(
                    "mapping link {} references unknown source field id {}",
                    link.id, link.source
                ),
                "mapping",
                link.id,
            )
        })
    }

    /// Destination definition of `link`, or a catalog error naming the link
    pub fn link_destination(&self, link: &MappingLink) -> Result<&DestinationFieldDef> {
        self.destination_by_id(link.destination).ok_or_else(|| {
            Error::catalog_entry(
                format!(
                    "mapping link {} references unknown destination field id {}",
                    link.id, link.destination
                ),
                "mapping",
                link.id,
            )
        })
    }

    /// Transform definition of `link`, if it carries one
    pub fn link_transform(&self, link: &MappingLink) -> Result<Option<&TransformDef>> {
        match link.transform {
            None => Ok(None),
            Some(id) => self.transform_by_id(id).map(Some).ok_or_else(|| {
                Error::catalog_entry(
                    format!(
                        "mapping link {} references unknown transform id {}",
                        link.id, id
                    ),
                    "mapping",
                    link.id,
                )
            }),
        }
    }
}
