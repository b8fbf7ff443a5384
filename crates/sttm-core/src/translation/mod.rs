//! Record transformation
//!
//! Everything that runs per record lives here: path resolution over input
//! records, the transform mask registry, value coercion, the engine that walks
//! the mapping links and the batch runner that drives the engine over many
//! records.
//!
//! # Example
//!
//! ```
//! use serde_json::json;
//! use sttm_core::translation::{BatchRunner, FailurePolicy, TransformationEngine};
//! use sttm_core::{DestinationFieldDef, FieldKind, MappingCatalog, MappingLink, SourceFieldDef,
//!     TransformDef, TransformRegistry};
//!
//! # fn example() -> sttm_core::Result<()> {
//! let catalog = MappingCatalog::new(
//!     vec![SourceFieldDef::new(1, "Married", FieldKind::String, true)],
//!     vec![DestinationFieldDef::new(1, "Married", FieldKind::String, json!("n/a"))],
//!     vec![TransformDef::new(1, "CAPITAL_LETTER")],
//!     vec![MappingLink::new(1, 1, 1).with_transform(1)],
//! )?;
//! let engine = TransformationEngine::new(catalog, TransformRegistry::builtin())?;
//!
//! let output = engine.transform(&json!({"Married": " yes "}))?;
//! assert_eq!(output["Married"], json!("Yes"));
//!
//! let report = BatchRunner::new(&engine, FailurePolicy::CollectErrors)
//!     .run_all(&[json!({"Married": "no"}), json!({})]);
//! assert_eq!(report.summary().failed, 1);
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```
//!
//! Copyright (c) 2025 STTM Engine Authors
//! Licensed under the Apache-2.0 license

pub mod batch;
pub mod coercion;
pub mod engine;
pub mod jsonpath;
pub mod transformer;

pub use batch::{
    BatchReport, BatchRunner, BatchSummary, FailurePolicy, ParsePolicyError, RecordOutcome,
};
pub use engine::{EngineOptions, LinkValidation, TransformationEngine};
pub use jsonpath::{FieldPath, Segment};
pub use transformer::{MaskFunction, TransformRegistry};
