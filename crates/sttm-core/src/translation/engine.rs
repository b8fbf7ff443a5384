//! Transformation engine
//!
//! Converts one input record into one output record by walking the catalog's
//! mapping links in order. Each link resolves its source value, enforces the
//! required flag and the declared source kind, coerces the value into the
//! destination kind (or substitutes the destination default) and applies the
//! link's transform mask to present values. The first failing link aborts the
//! whole record; no partial output is returned.
//!
//! Copyright (c) 2025 STTM Engine Authors
//! Licensed under the Apache-2.0 license

use super::coercion;
use super::jsonpath::FieldPath;
use super::transformer::TransformRegistry;
use crate::catalog::MappingCatalog;
use crate::error::{Error, Result};
use crate::types::{describe_kind, EntryId, FieldKind, MappingLink, OutputRecord};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// When mapping links are checked against the catalog and registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkValidation {
    /// Check every link and mask when the engine is built
    #[default]
    Eager,
    /// Discover broken links while records are processed
    Lazy,
}

/// Engine construction options
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineOptions {
    pub link_validation: LinkValidation,
}

/// Applies a mapping catalog to input records.
///
/// The engine holds no per-record state and is `Send + Sync`, so one
/// instance can be shared across worker threads.
#[derive(Debug, Clone)]
pub struct TransformationEngine {
    catalog: MappingCatalog,
    registry: TransformRegistry,
    options: EngineOptions,
    /// Compiled source paths by source field id
    source_paths: HashMap<EntryId, FieldPath>,
}

impl TransformationEngine {
    /// Build an engine with eager link validation
    pub fn new(catalog: MappingCatalog, registry: TransformRegistry) -> Result<Self> {
        Self::with_options(catalog, registry, EngineOptions::default())
    }

    pub fn with_options(
        catalog: MappingCatalog,
        registry: TransformRegistry,
        options: EngineOptions,
    ) -> Result<Self> {
        if options.link_validation == LinkValidation::Eager {
            catalog.validate_links(&registry)?;
        }

        let source_paths = catalog
            .sources()
            .iter()
            .map(|source| Ok((source.id, FieldPath::parse(&source.path)?)))
            .collect::<Result<HashMap<_, _>>>()?;

        tracing::debug!(
            links = catalog.links().len(),
            masks = registry.len(),
            validation = ?options.link_validation,
            "Transformation engine ready"
        );

        Ok(Self {
            catalog,
            registry,
            options,
            source_paths,
        })
    }

    pub fn catalog(&self) -> &MappingCatalog {
        &self.catalog
    }

    pub fn registry(&self) -> &TransformRegistry {
        &self.registry
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    /// Names of the output fields, in the order records will carry them
    pub fn output_fields(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for link in self.catalog.links() {
            if let Some(destination) = self.catalog.destination_by_id(link.destination) {
                if !names.contains(&destination.name.as_str()) {
                    names.push(&destination.name);
                }
            }
        }
        names
    }

    /// Transform one record
    pub fn transform(&self, record: &Value) -> Result<OutputRecord> {
        let mut output = OutputRecord::new();

        for link in self.catalog.links() {
            self.apply_link(link, record, &mut output)?;
        }

        Ok(output)
    }

    fn apply_link(&self, link: &MappingLink, record: &Value, output: &mut OutputRecord) -> Result<()> {
        let source = self.catalog.link_source(link)?;
        let destination = self.catalog.link_destination(link)?;

        let path = self.source_paths.get(&source.id).ok_or_else(|| {
            Error::catalog_entry(
                format!("source field '{}' has no compiled path", source.name),
                "source",
                source.id,
            )
        })?;

        // None: the path does not exist. Some(Null): present but empty.
        let resolved = path.resolve(record);
        if resolved.is_none() && source.required {
            return Err(Error::MissingRequiredField {
                field: source.name.clone(),
                path: source.path.clone(),
            });
        }

        let present = resolved.filter(|value| !value.is_null());
        if let Some(value) = present {
            if FieldKind::of(value) != Some(source.kind) {
                return Err(Error::TypeMismatch {
                    field: source.name.clone(),
                    expected: source.kind,
                    found: describe_kind(value),
                    value: value.to_string(),
                });
            }
        }

        let mask = match self.catalog.link_transform(link)? {
            Some(transform) => match self.registry.get(&transform.mask) {
                Some(function) => Some(function),
                None => return Err(self.registry.unknown_mask(&transform.mask)),
            },
            None => None,
        };

        let coerced = coercion::coerce(
            &destination.name,
            present,
            destination.kind,
            &destination.default,
        )?;

        let stored = match (mask, present) {
            (Some(function), Some(_)) => match coerced {
                Value::String(text) => Value::String(function(&text)),
                other => return Err(coercion::mismatch(&destination.name, FieldKind::String, &other)),
            },
            _ => coerced,
        };

        tracing::trace!(
            link = link.id,
            source = %source.name,
            destination = %destination.name,
            defaulted = present.is_none(),
            "Mapping link applied"
        );

        output.insert(destination.name.clone(), stored);
        Ok(())
    }
}
