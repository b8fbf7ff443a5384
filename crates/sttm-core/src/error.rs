//! Error types for the STTM core library
//!
//! This module defines the error taxonomy of the transformation engine using
//! thiserror. Errors fall into two families: catalog-level errors, which are
//! configuration bugs and never recoverable per record, and record-level errors,
//! which abort the transformation of a single input record.

use crate::translation::jsonpath::JSONPathError;
use crate::types::FieldKind;
use thiserror::Error;

/// Main error type for STTM operations
#[derive(Error, Debug)]
pub enum Error {
    /// Broken catalog: dangling id, bad default, unknown declared type
    #[error("Catalog error: {message}")]
    Catalog {
        message: String,
        /// Table or entry the error refers to, e.g. `mapping#4`
        entity: Option<String>,
    },

    /// Input record lacks a required source field
    #[error("Missing required field: '{field}' is not present in the input record (path {path})")]
    MissingRequiredField { field: String, path: String },

    /// Observed vs. declared kind disagreement, or an unparsable coercion
    #[error("Type mismatch for field '{field}': expected {expected}, found {found} (value: {value})")]
    TypeMismatch {
        field: String,
        expected: FieldKind,
        found: String,
        value: String,
    },

    /// A mapping references a mask absent from the transform registry
    #[error(
        "Unknown transform mask '{mask}'; select one of the available masks: {}",
        available.join(", ")
    )]
    UnknownTransform { mask: String, available: Vec<String> },

    /// A catalog path expression could not be parsed
    #[error("Invalid path expression '{path}': {source}")]
    InvalidPath {
        path: String,
        #[source]
        source: JSONPathError,
    },

    /// JSON parsing and serialization errors
    #[error("JSON error: {message}")]
    Json {
        message: String,
        #[source]
        source: serde_json::Error,
    },

    /// YAML parsing errors
    #[error("YAML error: {message}")]
    Yaml {
        message: String,
        #[source]
        source: serde_yaml::Error,
    },

    /// IO errors
    #[error("IO error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience type alias for Results using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a catalog error without an entity reference
    pub fn catalog(message: impl Into<String>) -> Self {
        Self::Catalog {
            message: message.into(),
            entity: None,
        }
    }

    /// Create a catalog error pointing at a table entry
    pub fn catalog_entry(message: impl Into<String>, table: &str, id: u64) -> Self {
        Self::Catalog {
            message: message.into(),
            entity: Some(format!("{}#{}", table, id)),
        }
    }

    /// Errors that only affect the record being transformed
    pub fn is_record_level(&self) -> bool {
        matches!(
            self,
            Self::MissingRequiredField { .. } | Self::TypeMismatch { .. }
        )
    }

    /// Short machine-readable name of the error class
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Catalog { .. } => "catalog",
            Self::MissingRequiredField { .. } => "missing_required_field",
            Self::TypeMismatch { .. } => "type_mismatch",
            Self::UnknownTransform { .. } => "unknown_transform",
            Self::InvalidPath { .. } => "invalid_path",
            Self::Json { .. } => "json",
            Self::Yaml { .. } => "yaml",
            Self::Io { .. } => "io",
        }
    }

    /// Errors caused by the catalog or registry, fatal for every record
    pub fn is_catalog_level(&self) -> bool {
        matches!(
            self,
            Self::Catalog { .. } | Self::UnknownTransform { .. } | Self::InvalidPath { .. }
        )
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(err: serde_yaml::Error) -> Self {
        Error::Yaml {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io {
            message: err.to_string(),
            source: err,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::MissingRequiredField {
            field: "Married".to_string(),
            path: "$.Married".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Missing required field: 'Married' is not present in the input record (path $.Married)"
        );
    }

    #[test]
    fn test_unknown_transform_lists_masks() {
        let err = Error::UnknownTransform {
            mask: "SHOUT".to_string(),
            available: vec!["CAPITAL_LETTER".to_string(), "CLEAN_STRING".to_string()],
        };
        let message = err.to_string();
        assert!(message.contains("'SHOUT'"));
        assert!(message.contains("CAPITAL_LETTER, CLEAN_STRING"));
    }

    #[test]
    fn test_error_classification() {
        let mismatch = Error::TypeMismatch {
            field: "Age".to_string(),
            expected: FieldKind::String,
            found: "integer".to_string(),
            value: "34".to_string(),
        };
        assert!(mismatch.is_record_level());
        assert!(!mismatch.is_catalog_level());
        assert_eq!(mismatch.kind(), "type_mismatch");

        let catalog = Error::catalog_entry("dangling source id 99", "mapping", 4);
        assert!(catalog.is_catalog_level());
        assert!(!catalog.is_record_level());
        match catalog {
            Error::Catalog { entity, .. } => assert_eq!(entity.as_deref(), Some("mapping#4")),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
