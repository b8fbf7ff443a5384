//! Shared utilities for command handlers

use crate::error::{Error, Result};
use serde_json::Value;
use std::fs;
use std::path::Path;
use sttm_core::MappingCatalog;

/// Shape of a record file, chosen by extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordFormat {
    /// A JSON array of records or a single JSON object
    Json,
    /// One JSON value per line
    JsonLines,
    /// A YAML sequence of records or a single YAML mapping
    Yaml,
}

impl RecordFormat {
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|s| s.to_str()) {
            Some("jsonl") | Some("ndjson") => RecordFormat::JsonLines,
            Some("yaml") | Some("yml") => RecordFormat::Yaml,
            _ => RecordFormat::Json,
        }
    }
}

/// Load a mapping catalog, reporting a missing file distinctly
pub fn load_catalog(path: &Path) -> Result<MappingCatalog> {
    if !path.exists() {
        return Err(Error::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    Ok(MappingCatalog::from_path(path)?)
}

/// Load input records from a file
pub fn load_records(path: &Path) -> Result<Vec<Value>> {
    if !path.exists() {
        return Err(Error::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let content = fs::read_to_string(path)?;
    let records = parse_records(&content, RecordFormat::from_path(path)).map_err(|message| {
        Error::InvalidRecords {
            path: path.to_path_buf(),
            message,
        }
    })?;

    tracing::debug!(path = %path.display(), count = records.len(), "Loaded input records");
    Ok(records)
}

/// Parse record text; the error is a human-readable reason
pub fn parse_records(content: &str, format: RecordFormat) -> std::result::Result<Vec<Value>, String> {
    match format {
        RecordFormat::JsonLines => content
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(number, line)| {
                serde_json::from_str(line).map_err(|e| format!("line {}: {}", number + 1, e))
            })
            .collect(),
        RecordFormat::Json => {
            let value: Value = serde_json::from_str(content).map_err(|e| e.to_string())?;
            into_records(value)
        }
        RecordFormat::Yaml => {
            let value: Value = serde_yaml::from_str(content).map_err(|e| e.to_string())?;
            into_records(value)
        }
    }
}

fn into_records(value: Value) -> std::result::Result<Vec<Value>, String> {
    match value {
        Value::Array(records) => Ok(records),
        Value::Object(_) => Ok(vec![value]),
        other => Err(format!(
            "expected a list of records or a single record, found {}",
            sttm_core::types::describe_kind(&other)
        )),
    }
}

/// Write transformed records to a file in the format its extension implies
pub fn save_records(path: &Path, records: &[Value]) -> Result<()> {
    let content = match RecordFormat::from_path(path) {
        RecordFormat::JsonLines => {
            let mut content = String::new();
            for record in records {
                content.push_str(&serde_json::to_string(record)?);
                content.push('\n');
            }
            content
        }
        RecordFormat::Yaml => serde_yaml::to_string(records)?,
        RecordFormat::Json => serde_json::to_string_pretty(records)?,
    };

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    fs::write(path, content)?;
    Ok(())
}
