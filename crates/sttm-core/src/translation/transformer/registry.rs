//! Transform mask registry
//!
//! Maps mask names to compiled functions. The set is closed at construction:
//! masks are registered in code, never evaluated from catalog text.
//!
//! Copyright (c) 2025 STTM Engine Authors
//! Licensed under the Apache-2.0 license

use super::built_in;
use crate::error::Error;
use std::collections::BTreeMap;
use std::fmt;

/// A pure string-to-string transform
pub type MaskFunction = fn(&str) -> String;

/// Named transform masks available to mapping links
#[derive(Clone)]
pub struct TransformRegistry {
    masks: BTreeMap<String, MaskFunction>,
}

impl TransformRegistry {
    /// An empty registry
    pub fn empty() -> Self {
        Self {
            masks: BTreeMap::new(),
        }
    }

    /// Registry holding the built-in masks
    pub fn builtin() -> Self {
        Self::empty()
            .register(built_in::CLEAN_STRING, built_in::clean_string)
            .register(built_in::CAPITAL_LETTER, built_in::capital_letter)
            .register(built_in::UPPER_CASE, built_in::upper_case)
            .register(built_in::TRIM, built_in::trim)
    }

    /// Add (or replace) a mask
    pub fn register(mut self, name: impl Into<String>, mask: MaskFunction) -> Self {
        self.masks.insert(name.into(), mask);
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.masks.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<MaskFunction> {
        self.masks.get(name).copied()
    }

    /// Apply mask `name` to `input`; `None` when the mask is not registered
    pub fn apply(&self, name: &str, input: &str) -> Option<String> {
        self.get(name).map(|mask| mask(input))
    }

    /// Registered mask names, sorted
    pub fn names(&self) -> Vec<String> {
        self.masks.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.masks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.masks.is_empty()
    }

    /// The diagnostic raised when a catalog references `mask`
    pub fn unknown_mask(&self, mask: &str) -> Error {
        Error::UnknownTransform {
            mask: mask.to_string(),
            available: self.names(),
        }
    }
}

impl Default for TransformRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl fmt::Debug for TransformRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransformRegistry")
            .field("masks", &self.masks.keys().collect::<Vec<_>>())
            .finish()
    }
}
