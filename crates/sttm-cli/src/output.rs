//! Output formatting and writing utilities
//!
//! This module provides utilities for formatting and writing output
//! in various formats (JSON, YAML, human-readable), with specialized
//! rendering for catalog summaries, batch summaries and record failures.

use crate::cli::OutputFormat;
use crate::error::Result;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use serde_json::Value;
use std::io::{self, IsTerminal, Write};
use sttm_core::{BatchSummary, CatalogSummary};
use tracing::trace;

/// A failed record as reported to the user
#[derive(Debug, Clone, Serialize)]
pub struct RecordFailure {
    pub index: usize,
    pub kind: String,
    pub message: String,
}

impl RecordFailure {
    pub fn new(index: usize, error: &sttm_core::Error) -> Self {
        Self {
            index,
            kind: error.kind().to_string(),
            message: error.to_string(),
        }
    }
}

/// Trait for formatting output with specialized support for common types
pub trait OutputFormatter {
    /// Format a serializable value
    fn format<T: Serialize>(&self, value: &T) -> Result<String>;

    /// Format the table counts of a loaded catalog
    fn format_catalog_summary(&self, summary: &CatalogSummary) -> Result<String>;

    /// Format the counts and timing of a batch
    fn format_batch_summary(&self, summary: &BatchSummary) -> Result<String>;
}

impl OutputFormatter for OutputFormat {
    fn format<T: Serialize>(&self, value: &T) -> Result<String> {
        match self {
            OutputFormat::Json => Ok(serde_json::to_string(value)?),
            OutputFormat::JsonPretty => Ok(serde_json::to_string_pretty(value)?),
            OutputFormat::Yaml => Ok(serde_yaml::to_string(value)?),
            OutputFormat::Human => {
                // For human format, use pretty JSON as fallback
                Ok(serde_json::to_string_pretty(value)?)
            }
        }
    }

    fn format_catalog_summary(&self, summary: &CatalogSummary) -> Result<String> {
        match self {
            OutputFormat::Human => Ok(format_catalog_summary_human(summary)),
            _ => self.format(summary),
        }
    }

    fn format_batch_summary(&self, summary: &BatchSummary) -> Result<String> {
        match self {
            OutputFormat::Human => Ok(format_batch_summary_human(summary)),
            _ => self.format(summary),
        }
    }
}

/// Output writer that handles different output formats and colors
pub struct OutputWriter {
    format: OutputFormat,
    use_color: bool,
    show_progress: bool,
    quiet: bool,
    writer: Box<dyn Write>,
}

impl OutputWriter {
    /// Create a new output writer
    pub fn new(format: OutputFormat, use_color: bool, quiet: bool) -> Self {
        Self {
            format,
            use_color,
            show_progress: !quiet && io::stderr().is_terminal(),
            quiet,
            writer: Box::new(io::stdout()),
        }
    }

    /// Create an output writer with a custom writer
    #[cfg(test)]
    pub fn with_writer(format: OutputFormat, use_color: bool, quiet: bool, writer: Box<dyn Write>) -> Self {
        Self {
            format,
            use_color,
            show_progress: false, // No progress bars with custom writers
            quiet,
            writer,
        }
    }

    /// Get the output format
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Turn progress indicators off regardless of the terminal
    pub fn disable_progress(&mut self) {
        self.show_progress = false;
    }

    /// Write raw output
    pub fn write(&mut self, content: &str) -> Result<()> {
        write!(self.writer, "{}", content)?;
        self.writer.flush()?;
        Ok(())
    }

    /// Write a line of output
    pub fn writeln(&mut self, content: &str) -> Result<()> {
        writeln!(self.writer, "{}", content)?;
        self.writer.flush()?;
        Ok(())
    }

    /// Write an info message
    pub fn info(&mut self, message: &str) -> Result<()> {
        if self.quiet || self.format != OutputFormat::Human {
            return Ok(());
        }

        if self.use_color {
            self.writeln(&format!("{} {}", "ℹ".blue(), message))
        } else {
            self.writeln(&format!("INFO: {}", message))
        }
    }

    /// Write a success message
    pub fn success(&mut self, message: &str) -> Result<()> {
        if self.quiet || self.format != OutputFormat::Human {
            return Ok(());
        }

        if self.use_color {
            self.writeln(&message.green().to_string())
        } else {
            self.writeln(message)
        }
    }

    /// Write a warning message
    pub fn warning(&mut self, message: &str) -> Result<()> {
        if self.format != OutputFormat::Human {
            return Ok(());
        }

        if self.use_color {
            self.writeln(&message.yellow().to_string())
        } else {
            self.writeln(&format!("WARNING: {}", message))
        }
    }

    /// Write an error message
    pub fn error(&mut self, message: &str) -> Result<()> {
        if self.format != OutputFormat::Human {
            return Ok(());
        }

        if self.use_color {
            self.writeln(&message.red().to_string())
        } else {
            self.writeln(&format!("ERROR: {}", message))
        }
    }

    /// Write a section header
    pub fn section(&mut self, title: &str) -> Result<()> {
        if self.quiet || self.format != OutputFormat::Human {
            return Ok(());
        }

        self.writeln("")?;
        if self.use_color {
            self.writeln(&format!("═══ {} ═══", title).bright_blue().to_string())
        } else {
            self.writeln(&format!("=== {} ===", title))
        }
    }

    /// Write data in the configured format
    pub fn data<T: Serialize>(&mut self, value: &T) -> Result<()> {
        let formatted = self.format.format(value)?;
        trace!(bytes = formatted.len(), "Writing formatted data");

        if formatted.ends_with('\n') {
            self.write(&formatted)
        } else {
            self.writeln(&formatted)
        }
    }

    /// Write one transformed record
    pub fn record(&mut self, index: usize, record: &Value) -> Result<()> {
        if self.format == OutputFormat::Human {
            let label = format!("[{}]", index);
            let label = if self.use_color {
                label.dimmed().to_string()
            } else {
                label
            };
            self.writeln(&format!("{} {}", label, record))
        } else {
            self.data(record)
        }
    }

    /// Write a catalog summary
    pub fn catalog_summary(&mut self, summary: &CatalogSummary) -> Result<()> {
        let formatted = self.format.format_catalog_summary(summary)?;
        self.writeln(formatted.trim_end())
    }

    /// Write a batch summary
    pub fn batch_summary(&mut self, summary: &BatchSummary) -> Result<()> {
        let formatted = self.format.format_batch_summary(summary)?;
        self.writeln(formatted.trim_end())
    }

    /// Write a failed record
    pub fn record_failure(&mut self, failure: &RecordFailure) -> Result<()> {
        self.error(&format!("record {}: {}", failure.index, failure.message))
    }

    /// Create a progress bar for long operations
    pub fn progress_bar(&self, length: u64, message: &str) -> Option<ProgressBar> {
        if !self.show_progress {
            return None;
        }

        let pb = ProgressBar::new(length);
        pb.set_style(default_progress_style());
        pb.set_message(message.to_string());
        Some(pb)
    }

    /// Write a table (for human format)
    pub fn table(&mut self, headers: &[&str], rows: Vec<Vec<String>>) -> Result<()> {
        if self.quiet || self.format != OutputFormat::Human {
            return Ok(());
        }

        // Calculate column widths
        let mut widths = headers.iter().map(|h| h.len()).collect::<Vec<_>>();
        for row in &rows {
            for (i, cell) in row.iter().enumerate() {
                if i < widths.len() {
                    widths[i] = widths[i].max(cell.len());
                }
            }
        }

        let header_row = headers
            .iter()
            .enumerate()
            .map(|(i, h)| format!("{:width$}", h, width = widths[i]))
            .collect::<Vec<_>>()
            .join(" │ ");

        if self.use_color {
            self.writeln(&header_row.bold().to_string())?;
        } else {
            self.writeln(&header_row)?;
        }

        let separator = widths
            .iter()
            .map(|w| "─".repeat(*w))
            .collect::<Vec<_>>()
            .join("─┼─");
        self.writeln(&separator)?;

        for row in rows {
            let row_str = row
                .iter()
                .enumerate()
                .map(|(i, cell)| match widths.get(i) {
                    Some(width) => format!("{:width$}", cell, width = width),
                    None => cell.clone(),
                })
                .collect::<Vec<_>>()
                .join(" │ ");
            self.writeln(&row_str)?;
        }

        Ok(())
    }
}

/// Helper function to create a progress bar style
pub fn default_progress_style() -> ProgressStyle {
    ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("#>-")
}

/// Format a catalog summary for human reading
fn format_catalog_summary_human(summary: &CatalogSummary) -> String {
    let mut output = String::new();

    output.push_str("Catalog Tables:\n");
    output.push_str(&format!(
        "  Source fields:      {} ({} required)\n",
        summary.sources, summary.required_sources
    ));
    output.push_str(&format!("  Destination fields: {}\n", summary.destinations));
    output.push_str(&format!("  Transforms:         {}\n", summary.transforms));
    output.push_str(&format!("  Mapping links:      {}\n", summary.links));

    output
}

/// Format a batch summary for human reading
fn format_batch_summary_human(summary: &BatchSummary) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "Records: {} submitted, {} processed, {} succeeded, {} failed\n",
        summary.submitted, summary.processed, summary.succeeded, summary.failed
    ));
    if summary.halted {
        output.push_str(&format!(
            "Halted after the first failure; {} record(s) not processed\n",
            summary.submitted - summary.processed
        ));
    }
    output.push_str(&format!(
        "Started: {}  Duration: {}ms\n",
        summary.started_at.to_rfc3339(),
        summary.duration_ms
    ));

    output
}
