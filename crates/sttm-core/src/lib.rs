//! STTM Core - Source-to-target transformation mapping engine
//!
//! This crate converts loosely structured input records into flat output
//! records according to a declarative mapping catalog. The catalog names the
//! source fields and where to find them, the destination fields with their
//! kinds and defaults, the transform masks to apply and the ordered links
//! between them.
//!
//! # Main Components
//!
//! - **Error Handling**: Catalog-level and record-level errors using `thiserror`
//! - **Catalog**: Validated source, destination, transform and mapping tables
//! - **Path Resolution**: A small JSONPath subset for locating input values
//! - **Transform Registry**: Named, pure string masks registered in code
//! - **Coercion**: Non-lossy conversion into destination kinds
//! - **Engine and Batches**: Per-record transformation and batch policies
//!
//! # Example
//!
//! ```no_run
//! use sttm_core::{BatchRunner, FailurePolicy, MappingCatalog, TransformRegistry,
//!     TransformationEngine};
//!
//! fn example() -> sttm_core::Result<()> {
//!     let catalog = MappingCatalog::from_path("loan_catalog.json")?;
//!     let engine = TransformationEngine::new(catalog, TransformRegistry::builtin())?;
//!
//!     let records = vec![serde_json::json!({"Gender": " male "})];
//!     let report = BatchRunner::new(&engine, FailurePolicy::HaltOnFirstError).run_all(&records);
//!     for (index, output) in report.successes() {
//!         println!("{index}: {}", serde_json::Value::Object(output.clone()));
//!     }
//!     Ok(())
//! }
//! ```

pub mod catalog;
pub mod error;
pub mod translation;
pub mod types;

// Re-export main types for convenience
pub use error::{Error, Result};
pub use types::{
    // Catalog entries
    DestinationFieldDef, MappingLink, SourceFieldDef, TransformDef,

    // Values
    EntryId, FieldKind, OutputRecord,
};

pub use catalog::{CatalogDocument, CatalogSummary, CatalogTable, MappingCatalog};
pub use translation::{
    BatchReport, BatchRunner, BatchSummary, EngineOptions, FailurePolicy, FieldPath,
    LinkValidation, ParsePolicyError, RecordOutcome, TransformRegistry, TransformationEngine,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_error_and_policy_defaults() {
        assert_eq!(FailurePolicy::default(), FailurePolicy::HaltOnFirstError);
        assert_eq!(EngineOptions::default().link_validation, LinkValidation::Eager);
        assert!(TransformRegistry::default().contains("CAPITAL_LETTER"));
    }
}
