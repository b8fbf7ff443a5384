//! Field path resolution against input records
//!
//! Catalog entries locate their values with a minimal JSONPath subset:
//! a `$` root followed by dotted names, quoted bracket names and array
//! indices. Paths are compiled once and resolved many times; absence is a
//! normal result, never an error.
//!
//! Copyright (c) 2025 STTM Engine Authors
//! Licensed under the Apache-2.0 license

pub mod error;
pub mod parser;

pub use error::JSONPathError;
pub use parser::Parser;

use crate::error::{Error, Result};
use serde_json::Value;
use std::fmt;

/// One step of a compiled path
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    /// Object member access
    Key(String),
    /// Array element access
    Index(usize),
}

/// A compiled path expression
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldPath {
    pub(crate) raw: String,
    pub(crate) segments: Vec<Segment>,
}

impl FieldPath {
    /// Parse and compile a path expression
    pub fn parse(path: &str) -> Result<Self> {
        Parser::new(path)
            .and_then(Parser::parse)
            .map_err(|source| Error::InvalidPath {
                path: path.to_string(),
                source,
            })
    }

    /// Locate the value this path points at, `None` when any step is absent
    pub fn resolve<'a>(&self, record: &'a Value) -> Option<&'a Value> {
        self.segments
            .iter()
            .try_fold(record, |current, segment| match (segment, current) {
                (Segment::Key(key), Value::Object(map)) => map.get(key),
                (Segment::Index(index), Value::Array(items)) => items.get(*index),
                _ => None,
            })
    }

    /// The expression as written in the catalog
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

/// Parse `path` and resolve it against `record` in one step
pub fn resolve<'a>(record: &'a Value, path: &str) -> Result<Option<&'a Value>> {
    Ok(FieldPath::parse(path)?.resolve(record))
}
