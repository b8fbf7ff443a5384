//! Configuration management for the CLI
//!
//! This module handles loading configuration from:
//! - Default values
//! - Configuration files (YAML/JSON/TOML)
//! - Command-line arguments, which take precedence over both

use crate::cli::OutputFormat;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use sttm_core::{EngineOptions, FailurePolicy, LinkValidation};

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Engine and batch settings
    pub engine: EngineConfig,

    /// Output settings
    pub output: OutputConfig,

    /// Logging settings
    pub logging: LoggingConfig,
}

/// Engine and batch configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Failure policy for batches
    pub policy: FailurePolicy,

    /// When mapping links are checked
    pub link_validation: LinkValidation,

    /// Worker threads used by `transform`
    pub workers: usize,
}

/// Output configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Output format used when `--output` is not given
    pub format: Option<OutputFormat>,

    /// Use colored output by default
    pub color: bool,

    /// Show progress indicators
    pub progress: bool,
}

/// Logging configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: Option<String>,

    /// Log format (compact, full, json)
    pub format: Option<String>,

    /// Log file path
    pub file: Option<PathBuf>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            policy: FailurePolicy::default(),
            link_validation: LinkValidation::default(),
            workers: std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: None,
            color: true,
            progress: true,
        }
    }
}

/// Supported configuration file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FileFormat {
    Json,
    Yaml,
    Toml,
}

impl FileFormat {
    fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|s| s.to_str()) {
            Some("yaml") | Some("yml") => FileFormat::Yaml,
            Some("toml") => FileFormat::Toml,
            _ => FileFormat::Json,
        }
    }
}

impl EngineConfig {
    pub fn options(&self) -> EngineOptions {
        EngineOptions {
            link_validation: self.link_validation,
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!("failed to read {}: {}", path.display(), e))
        })?;

        Self::from_str_with_format(&content, FileFormat::from_path(path))
            .map_err(|e| Error::config(format!("invalid config {}: {}", path.display(), e)))
    }

    fn from_str_with_format(content: &str, format: FileFormat) -> Result<Self> {
        let config = match format {
            FileFormat::Yaml => serde_yaml::from_str(content)?,
            FileFormat::Toml => toml::from_str(content).map_err(|e| Error::config(e.to_string()))?,
            FileFormat::Json => serde_json::from_str(content)?,
        };
        Ok(config)
    }

    /// Load configuration from the first default location that exists
    pub fn load() -> Result<Self> {
        for path in Self::default_config_paths() {
            if path.exists() {
                match Self::from_file(&path) {
                    Ok(config) => {
                        tracing::debug!(path = %path.display(), "Loaded configuration");
                        return Ok(config);
                    }
                    Err(e) => {
                        tracing::warn!(path = %path.display(), error = %e, "Ignoring unreadable configuration");
                    }
                }
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file or default locations
    pub fn load_with_file(file: Option<&Path>) -> Result<Self> {
        if let Some(path) = file {
            Self::from_file(path)
        } else {
            Self::load()
        }
    }

    /// Default configuration file paths, in lookup order
    fn default_config_paths() -> Vec<PathBuf> {
        const EXTENSIONS: [&str; 4] = ["yaml", "yml", "json", "toml"];
        let mut paths = Vec::new();

        // Current directory
        for ext in EXTENSIONS {
            paths.push(PathBuf::from(format!(".sttm.{}", ext)));
        }

        // User config directory
        if let Some(config_dir) = dirs::config_dir() {
            let sttm_dir = config_dir.join("sttm");
            for ext in EXTENSIONS {
                paths.push(sttm_dir.join(format!("config.{}", ext)));
            }
        }

        // Home directory
        if let Some(home_dir) = dirs::home_dir() {
            for ext in EXTENSIONS {
                paths.push(home_dir.join(format!(".sttm.{}", ext)));
            }
        }

        paths
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.engine.policy, FailurePolicy::HaltOnFirstError);
        assert_eq!(config.engine.link_validation, LinkValidation::Eager);
        assert!(config.engine.workers >= 1);
        assert!(config.output.format.is_none());
        assert!(config.output.progress);
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = Config::from_str_with_format(
            "engine:\n  policy: collect\noutput:\n  format: json-pretty\n",
            FileFormat::Yaml,
        )
        .unwrap();

        assert_eq!(config.engine.policy, FailurePolicy::CollectErrors);
        assert_eq!(config.engine.link_validation, LinkValidation::Eager);
        assert_eq!(config.output.format, Some(OutputFormat::JsonPretty));
        assert!(config.output.color);
    }

    #[test]
    fn test_toml_config_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[engine]\nlink_validation = \"lazy\"\nworkers = 3\n\n[logging]\nlevel = \"debug\""
        )
        .unwrap();

        let config = Config::load_with_file(Some(file.path())).unwrap();
        assert_eq!(config.engine.options().link_validation, LinkValidation::Lazy);
        assert_eq!(config.engine.workers, 3);
        assert_eq!(config.logging.level.as_deref(), Some("debug"));
    }

    #[test]
    fn test_json_config_file() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, r#"{{"output": {{"progress": false}}}}"#).unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert!(!config.output.progress);
    }

    #[test]
    fn test_invalid_config_is_reported() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(file, "engine:\n  policy: sometimes").unwrap();

        let err = Config::from_file(file.path()).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_default_paths_start_in_current_directory() {
        let paths = Config::default_config_paths();
        assert_eq!(paths[0], PathBuf::from(".sttm.yaml"));
        assert!(paths.iter().any(|p| p.ends_with("sttm/config.toml")));
    }
}
