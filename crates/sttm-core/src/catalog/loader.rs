//! Catalog loading from JSON, YAML and files

use super::{CatalogDocument, MappingCatalog};
use crate::error::{Error, Result};
use std::path::Path;

/// Serialization format of a catalog document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogFormat {
    Json,
    Yaml,
}

impl CatalogFormat {
    /// Guess the format from a file extension, defaulting to JSON
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml") | Some("yml") => CatalogFormat::Yaml,
            _ => CatalogFormat::Json,
        }
    }
}

impl MappingCatalog {
    /// Parse and validate a JSON catalog document
    pub fn from_json_str(text: &str) -> Result<Self> {
        let document: CatalogDocument = serde_json::from_str(text).map_err(malformed)?;
        Self::from_document(document)
    }

    /// Parse and validate a YAML catalog document
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        let document: CatalogDocument = serde_yaml::from_str(text).map_err(malformed)?;
        Self::from_document(document)
    }

    pub fn from_str_with_format(text: &str, format: CatalogFormat) -> Result<Self> {
        match format {
            CatalogFormat::Json => Self::from_json_str(text),
            CatalogFormat::Yaml => Self::from_yaml_str(text),
        }
    }

    /// Load a catalog file; `.yaml`/`.yml` are read as YAML, anything else as JSON
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| Error::Io {
            message: format!("failed to read catalog {}: {}", path.display(), source),
            source,
        })?;

        tracing::debug!(path = %path.display(), bytes = text.len(), "Loading catalog");
        Self::from_str_with_format(&text, CatalogFormat::from_path(path))
    }
}

fn malformed(err: impl std::fmt::Display) -> Error {
    Error::catalog(format!("malformed catalog document: {}", err))
}
