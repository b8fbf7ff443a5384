//! Error types for path expression parsing
//!
//! Copyright (c) 2025 STTM Engine Authors
//! Licensed under the Apache-2.0 license

use thiserror::Error;

/// Errors raised while parsing a field path expression.
///
/// Resolution never fails; a path that does not match the record is absent.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum JSONPathError {
    /// Parse errors during expression parsing
    #[error("Parse error at position {position}: {message}")]
    Parse {
        message: String,
        position: usize,
        input: String,
    },

    /// Syntax errors with the tokens that would have been accepted
    #[error("Syntax error at position {position}: {message} (expected {}, found '{found}')", expected.join(" or "))]
    Syntax {
        message: String,
        position: usize,
        input: String,
        expected: Vec<String>,
        found: String,
    },

    /// Constructs outside the supported subset (wildcards, slices, filters)
    #[error("Unsupported path feature: {feature}")]
    Unsupported { feature: String, input: String },
}

impl JSONPathError {
    /// Create a parse error with position and context
    pub fn parse(message: impl Into<String>, position: usize, input: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
            position,
            input: input.into(),
        }
    }

    /// Create a syntax error with detailed information
    pub fn syntax(
        message: impl Into<String>,
        position: usize,
        input: impl Into<String>,
        expected: Vec<String>,
        found: impl Into<String>,
    ) -> Self {
        Self::Syntax {
            message: message.into(),
            position,
            input: input.into(),
            expected,
            found: found.into(),
        }
    }

    pub fn unsupported(feature: impl Into<String>, input: impl Into<String>) -> Self {
        Self::Unsupported {
            feature: feature.into(),
            input: input.into(),
        }
    }

    /// Byte offset of the error, when known
    pub fn position(&self) -> Option<usize> {
        match self {
            Self::Parse { position, .. } | Self::Syntax { position, .. } => Some(*position),
            Self::Unsupported { .. } => None,
        }
    }
}
