//! Error types and handling for the CLI
//!
//! This module provides error types and utilities for handling
//! various failure modes in the CLI application.

use std::io;
use std::path::PathBuf;

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for CLI operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error (file operations, etc.)
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Error from sttm-core library
    #[error("{0}")]
    Core(#[from] sttm_core::Error),

    /// File not found
    #[error("File not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    /// Input records could not be parsed
    #[error("Invalid record input {}: {}", path.display(), message)]
    InvalidRecords { path: PathBuf, message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid argument combination
    #[error("Invalid arguments: {0}")]
    InvalidArgs(String),

    /// At least one record failed to transform
    #[error("{failed} of {submitted} record(s) failed to transform")]
    RecordsFailed { failed: usize, submitted: usize },

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML serialization/deserialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Generic error with context
    #[error("{message}")]
    Other { message: String },
}

impl Error {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create an invalid arguments error
    pub fn invalid_args(message: impl Into<String>) -> Self {
        Self::InvalidArgs(message.into())
    }

    /// Create a generic error with message
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }

    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Io(_) => 1,
            Self::Core(err) if err.is_catalog_level() => 2,
            Self::Core(_) => 3,
            Self::FileNotFound { .. } => 4,
            Self::InvalidRecords { .. } => 5,
            Self::Config(_) => 6,
            Self::InvalidArgs(_) => 7,
            Self::RecordsFailed { .. } => 8,
            Self::Json(_) => 12,
            Self::Yaml(_) => 13,
            Self::Other { .. } => 99,
        }
    }

    /// Check if this error should display usage help
    pub fn should_show_help(&self) -> bool {
        matches!(self, Self::InvalidArgs(_))
    }
}

/// Format an error for display to the user
pub fn format_error(error: &Error, use_color: bool) -> String {
    let label = match error {
        Error::Core(core) if core.is_catalog_level() => "Catalog error:",
        _ => "Error:",
    };

    // Core catalog errors already start with their own label
    let message = match error {
        Error::Core(sttm_core::Error::Catalog { message, entity }) => match entity {
            Some(entity) => format!("{} ({})", message, entity),
            None => message.clone(),
        },
        other => other.to_string(),
    };

    if use_color {
        use colored::Colorize;
        format!("{} {}", label.red().bold(), message)
    } else {
        format!("{} {}", label, message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes_separate_catalog_and_record_errors() {
        let catalog = Error::from(sttm_core::Error::catalog("dangling id"));
        assert_eq!(catalog.exit_code(), 2);

        let record = Error::from(sttm_core::Error::MissingRequiredField {
            field: "Married".to_string(),
            path: "$.Married".to_string(),
        });
        assert_eq!(record.exit_code(), 3);

        let failed = Error::RecordsFailed {
            failed: 2,
            submitted: 5,
        };
        assert_eq!(failed.exit_code(), 8);
        assert_eq!(failed.to_string(), "2 of 5 record(s) failed to transform");
    }

    #[test]
    fn test_format_catalog_error_with_entity() {
        let err = Error::from(sttm_core::Error::catalog_entry(
            "mapping link 4 references unknown source field id 99",
            "mapping",
            4,
        ));
        assert_eq!(
            format_error(&err, false),
            "Catalog error: mapping link 4 references unknown source field id 99 (mapping#4)"
        );
    }

    #[test]
    fn test_format_plain_error() {
        let err = Error::config("bad value");
        assert_eq!(format_error(&err, false), "Error: Configuration error: bad value");
        assert!(!err.should_show_help());
        assert!(Error::invalid_args("x").should_show_help());
    }
}
