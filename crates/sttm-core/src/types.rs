//! Core data types for STTM catalogs and records
//!
//! Catalog entries keep the field names of the catalog document on the wire
//! (`source_field_name`, `mapping_destination`, ...) and expose Rust names in code.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// Identifier of an entry in one of the catalog tables
pub type EntryId = u64;

/// One transformed record: destination field name to value, in link order
pub type OutputRecord = Map<String, Value>;

/// Closed set of value kinds a field can declare
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum FieldKind {
    String,
    Float,
    Integer,
    Boolean,
    List,
    Mapping,
}

impl FieldKind {
    /// All kinds, in declaration order
    pub const ALL: [FieldKind; 6] = [
        FieldKind::String,
        FieldKind::Float,
        FieldKind::Integer,
        FieldKind::Boolean,
        FieldKind::List,
        FieldKind::Mapping,
    ];

    /// Canonical keyword used when serializing
    pub fn as_str(self) -> &'static str {
        match self {
            FieldKind::String => "str",
            FieldKind::Float => "float",
            FieldKind::Integer => "int",
            FieldKind::Boolean => "bool",
            FieldKind::List => "list",
            FieldKind::Mapping => "dict",
        }
    }

    /// Kind of a runtime JSON value, `None` for `null`.
    ///
    /// Numbers are integers when they carry no fractional representation,
    /// so `34` is an integer and `34.0` is a float.
    pub fn of(value: &Value) -> Option<FieldKind> {
        match value {
            Value::Null => None,
            Value::Bool(_) => Some(FieldKind::Boolean),
            Value::Number(n) if n.is_f64() => Some(FieldKind::Float),
            Value::Number(_) => Some(FieldKind::Integer),
            Value::String(_) => Some(FieldKind::String),
            Value::Array(_) => Some(FieldKind::List),
            Value::Object(_) => Some(FieldKind::Mapping),
        }
    }
}

/// Human-readable kind name of a runtime value (including `null`)
pub fn describe_kind(value: &Value) -> String {
    FieldKind::of(value)
        .map(|kind| kind.to_string())
        .unwrap_or_else(|| "null".to_string())
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FieldKind::String => "string",
            FieldKind::Float => "float",
            FieldKind::Integer => "integer",
            FieldKind::Boolean => "boolean",
            FieldKind::List => "list",
            FieldKind::Mapping => "mapping",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for FieldKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "str" | "string" => Ok(FieldKind::String),
            "float" | "float64" | "double" | "number" => Ok(FieldKind::Float),
            "int" | "int64" | "integer" => Ok(FieldKind::Integer),
            "bool" | "boolean" => Ok(FieldKind::Boolean),
            "list" | "array" => Ok(FieldKind::List),
            "dict" | "object" | "mapping" | "map" => Ok(FieldKind::Mapping),
            other => Err(Error::catalog(format!(
                "unknown type keyword '{}' (expected one of: {})",
                other,
                FieldKind::ALL
                    .iter()
                    .map(|k| k.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            ))),
        }
    }
}

impl TryFrom<String> for FieldKind {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<FieldKind> for String {
    fn from(kind: FieldKind) -> Self {
        kind.as_str().to_string()
    }
}

/// Definition of a field in the input record shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceFieldDef {
    pub id: EntryId,
    #[serde(rename = "source_field_name")]
    pub name: String,
    #[serde(rename = "source_field_mapping")]
    pub path: String,
    #[serde(rename = "source_field_type")]
    pub kind: FieldKind,
    #[serde(rename = "is_required", default)]
    pub required: bool,
}

/// Definition of a field in the output record shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DestinationFieldDef {
    pub id: EntryId,
    #[serde(rename = "destination_field_name")]
    pub name: String,
    /// Informational only; output records are flat
    #[serde(rename = "destination_field_mapping")]
    pub path: String,
    #[serde(rename = "destination_field_type")]
    pub kind: FieldKind,
    #[serde(rename = "default_value", default)]
    pub default: Value,
}

/// A reference to a registered transform mask
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransformDef {
    pub id: EntryId,
    #[serde(rename = "transform_mask")]
    pub mask: String,
}

/// One rule binding a source field, a destination field and an optional transform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingLink {
    pub id: EntryId,
    #[serde(rename = "mapping_source")]
    pub source: EntryId,
    #[serde(rename = "mapping_destination")]
    pub destination: EntryId,
    #[serde(
        rename = "mapping_transform",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub transform: Option<EntryId>,
}

impl SourceFieldDef {
    pub fn new(id: EntryId, name: impl Into<String>, kind: FieldKind, required: bool) -> Self {
        let name = name.into();
        Self {
            id,
            path: format!("$.{}", name),
            name,
            kind,
            required,
        }
    }

    /// Override the path expression (defaults to `$.<name>`)
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }
}

impl DestinationFieldDef {
    pub fn new(id: EntryId, name: impl Into<String>, kind: FieldKind, default: Value) -> Self {
        let name = name.into();
        Self {
            id,
            path: format!("$.{}", name),
            name,
            kind,
            default,
        }
    }
}

impl TransformDef {
    pub fn new(id: EntryId, mask: impl Into<String>) -> Self {
        Self {
            id,
            mask: mask.into(),
        }
    }
}

impl MappingLink {
    pub fn new(id: EntryId, source: EntryId, destination: EntryId) -> Self {
        Self {
            id,
            source,
            destination,
            transform: None,
        }
    }

    pub fn with_transform(mut self, transform: EntryId) -> Self {
        self.transform = Some(transform);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_kind_keywords_and_aliases() {
        assert_eq!("str".parse::<FieldKind>().unwrap(), FieldKind::String);
        assert_eq!("Float64".parse::<FieldKind>().unwrap(), FieldKind::Float);
        assert_eq!("int".parse::<FieldKind>().unwrap(), FieldKind::Integer);
        assert_eq!("boolean".parse::<FieldKind>().unwrap(), FieldKind::Boolean);
        assert_eq!("array".parse::<FieldKind>().unwrap(), FieldKind::List);
        assert_eq!("dict".parse::<FieldKind>().unwrap(), FieldKind::Mapping);

        let err = "set".parse::<FieldKind>().unwrap_err();
        assert!(matches!(err, Error::Catalog { .. }));
        assert!(err.to_string().contains("unknown type keyword 'set'"));
    }

    #[test]
    fn test_kind_of_runtime_values() {
        assert_eq!(FieldKind::of(&json!("x")), Some(FieldKind::String));
        assert_eq!(FieldKind::of(&json!(34)), Some(FieldKind::Integer));
        assert_eq!(FieldKind::of(&json!(34.0)), Some(FieldKind::Float));
        assert_eq!(FieldKind::of(&json!(true)), Some(FieldKind::Boolean));
        assert_eq!(FieldKind::of(&json!([1])), Some(FieldKind::List));
        assert_eq!(FieldKind::of(&json!({})), Some(FieldKind::Mapping));
        assert_eq!(FieldKind::of(&Value::Null), None);
        assert_eq!(describe_kind(&Value::Null), "null");
    }

    #[test]
    fn test_source_def_wire_format() {
        let def: SourceFieldDef = serde_json::from_value(json!({
            "id": 3,
            "source_field_name": "Age",
            "source_field_mapping": "$.Age",
            "source_field_type": "str",
            "is_required": true
        }))
        .unwrap();
        assert_eq!(def, SourceFieldDef::new(3, "Age", FieldKind::String, true));

        let back = serde_json::to_value(&def).unwrap();
        assert_eq!(back["source_field_type"], "str");
    }

    #[test]
    fn test_optional_wire_fields_default() {
        let dest: DestinationFieldDef = serde_json::from_value(json!({
            "id": 1,
            "destination_field_name": "Area",
            "destination_field_mapping": "$.Area",
            "destination_field_type": "str"
        }))
        .unwrap();
        assert_eq!(dest.default, Value::Null);

        let link: MappingLink = serde_json::from_value(json!({
            "id": 1, "mapping_source": 1, "mapping_destination": 2
        }))
        .unwrap();
        assert_eq!(link.transform, None);
    }

    #[test]
    fn test_missing_declared_type_is_rejected() {
        let result: std::result::Result<SourceFieldDef, _> = serde_json::from_value(json!({
            "id": 1,
            "source_field_name": "Gender",
            "source_field_mapping": "$.Gender"
        }));
        assert!(result.is_err());
    }
}
