//! Transform mask system
//!
//! Transform masks are named, pure string functions applied to a value after
//! it has been coerced to its destination kind.
//!
//! # Module Organization
//!
//! - [`registry`] - The closed name-to-function registry
//! - [`built_in`] - The masks shipped with the engine
//!
//! # Examples
//!
//! ```
//! use sttm_core::translation::transformer::{built_in, TransformRegistry};
//!
//! let registry = TransformRegistry::builtin();
//! assert_eq!(
//!     registry.apply(built_in::CAPITAL_LETTER, "  semi-URBAN "),
//!     Some("Semi-Urban".to_string())
//! );
//! assert_eq!(registry.apply("SHOUT", "x"), None);
//! ```
//!
//! Copyright (c) 2025 STTM Engine Authors
//! Licensed under the Apache-2.0 license

pub mod built_in;
pub mod registry;


pub use registry::{MaskFunction, TransformRegistry};
