//! Batch execution
//!
//! Applies a [`TransformationEngine`] to a sequence of records and reports
//! one outcome per processed record, tagged with its originating index. The
//! failure policy decides whether the first failing record stops the batch.
//!
//! Partitioned runs (for example one partition per worker thread) use
//! [`BatchRunner::run_from`] and are reassembled with [`BatchReport::merge`],
//! which yields the same report a sequential run would.
//!
//! Copyright (c) 2025 STTM Engine Authors
//! Licensed under the Apache-2.0 license

use super::engine::TransformationEngine;
use crate::error::{Error, Result};
use crate::types::OutputRecord;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// What to do when a record fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FailurePolicy {
    /// Stop submitting records after the first failure
    #[default]
    #[serde(rename = "halt", alias = "halt_on_first_error")]
    HaltOnFirstError,
    /// Process every record and report each failure
    #[serde(rename = "collect", alias = "collect_errors")]
    CollectErrors,
}

impl FailurePolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            FailurePolicy::HaltOnFirstError => "halt",
            FailurePolicy::CollectErrors => "collect",
        }
    }
}

impl fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A string that names no [`FailurePolicy`]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown failure policy '{0}' (expected 'halt' or 'collect')")]
pub struct ParsePolicyError(pub String);

impl FromStr for FailurePolicy {
    type Err = ParsePolicyError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "halt" | "halt_on_first_error" => Ok(FailurePolicy::HaltOnFirstError),
            "collect" | "collect_errors" => Ok(FailurePolicy::CollectErrors),
            _ => Err(ParsePolicyError(s.to_string())),
        }
    }
}

/// Result of one record, with its position in the input
#[derive(Debug)]
pub struct RecordOutcome {
    pub index: usize,
    pub result: Result<OutputRecord>,
}

impl RecordOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Outcomes of a batch in input order
#[derive(Debug)]
pub struct BatchReport {
    pub outcomes: Vec<RecordOutcome>,
    /// Whether the batch stopped before consuming all submitted records
    pub halted: bool,
    /// Number of records handed to the runner
    pub submitted: usize,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

/// Aggregate counts of a [`BatchReport`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub submitted: usize,
    pub processed: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub halted: bool,
    pub started_at: DateTime<Utc>,
    pub duration_ms: i64,
}

impl BatchReport {
    pub fn successes(&self) -> impl Iterator<Item = (usize, &OutputRecord)> {
        self.outcomes
            .iter()
            .filter_map(|outcome| outcome.result.as_ref().ok().map(|record| (outcome.index, record)))
    }

    pub fn failures(&self) -> impl Iterator<Item = (usize, &Error)> {
        self.outcomes
            .iter()
            .filter_map(|outcome| outcome.result.as_ref().err().map(|err| (outcome.index, err)))
    }

    pub fn has_failures(&self) -> bool {
        self.outcomes.iter().any(|outcome| !outcome.is_success())
    }

    pub fn summary(&self) -> BatchSummary {
        let failed = self.failures().count();
        BatchSummary {
            submitted: self.submitted,
            processed: self.outcomes.len(),
            succeeded: self.outcomes.len() - failed,
            failed,
            halted: self.halted,
            started_at: self.started_at,
            duration_ms: (self.finished_at - self.started_at).num_milliseconds(),
        }
    }

    /// Reassemble partition reports into one report in index order.
    ///
    /// Under [`FailurePolicy::HaltOnFirstError`] everything after the lowest
    /// failing index is dropped, matching what a sequential run would have
    /// processed.
    pub fn merge(parts: Vec<BatchReport>, policy: FailurePolicy) -> BatchReport {
        let now = Utc::now();
        let started_at = parts.iter().map(|part| part.started_at).min().unwrap_or(now);
        let finished_at = parts.iter().map(|part| part.finished_at).max().unwrap_or(now);
        let submitted = parts.iter().map(|part| part.submitted).sum();
        let mut halted = parts.iter().any(|part| part.halted);

        let mut outcomes: Vec<RecordOutcome> =
            parts.into_iter().flat_map(|part| part.outcomes).collect();
        outcomes.sort_by_key(|outcome| outcome.index);

        if policy == FailurePolicy::HaltOnFirstError {
            if let Some(position) = outcomes.iter().position(|outcome| !outcome.is_success()) {
                if position + 1 < outcomes.len() {
                    outcomes.truncate(position + 1);
                }
                halted = outcomes.len() < submitted;
            }
        }

        BatchReport {
            outcomes,
            halted,
            submitted,
            started_at,
            finished_at,
        }
    }
}

/// Runs an engine over record sequences
#[derive(Debug, Clone, Copy)]
pub struct BatchRunner<'a> {
    engine: &'a TransformationEngine,
    policy: FailurePolicy,
}

impl<'a> BatchRunner<'a> {
    pub fn new(engine: &'a TransformationEngine, policy: FailurePolicy) -> Self {
        Self { engine, policy }
    }

    pub fn policy(&self) -> FailurePolicy {
        self.policy
    }

    /// Transform every record, honoring the failure policy
    pub fn run_all(&self, records: &[Value]) -> BatchReport {
        self.run_from(records, 0)
    }

    /// Transform a partition whose first record sits at `offset` in the full input
    pub fn run_from(&self, records: &[Value], offset: usize) -> BatchReport {
        let started_at = Utc::now();
        let mut outcomes = Vec::with_capacity(records.len());
        let mut halted = false;

        for (position, record) in records.iter().enumerate() {
            let index = offset + position;
            let result = self.engine.transform(record);

            if let Err(err) = &result {
                tracing::warn!(index, error = %err, "Record transformation failed");
            }

            let failed = result.is_err();
            outcomes.push(RecordOutcome { index, result });

            if failed && self.policy == FailurePolicy::HaltOnFirstError {
                halted = position + 1 < records.len();
                break;
            }
        }

        let report = BatchReport {
            outcomes,
            halted,
            submitted: records.len(),
            started_at,
            finished_at: Utc::now(),
        };

        let summary = report.summary();
        tracing::info!(
            offset,
            submitted = summary.submitted,
            succeeded = summary.succeeded,
            failed = summary.failed,
            halted = summary.halted,
            "Batch finished"
        );

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::MappingCatalog;
    use crate::translation::transformer::TransformRegistry;
    use crate::types::{DestinationFieldDef, FieldKind, MappingLink, SourceFieldDef};
    use serde_json::json;

    fn engine() -> TransformationEngine {
        let catalog = MappingCatalog::new(
            vec![SourceFieldDef::new(1, "n", FieldKind::String, true)],
            vec![DestinationFieldDef::new(1, "N", FieldKind::Integer, json!(0))],
            vec![],
            vec![MappingLink::new(1, 1, 1)],
        )
        .unwrap();
        TransformationEngine::new(catalog, TransformRegistry::builtin()).unwrap()
    }

    fn records() -> Vec<Value> {
        vec![
            json!({"n": "1"}),
            json!({}),
            json!({"n": "3"}),
            json!({"n": 4}),
            json!({"n": "5"}),
        ]
    }

    fn indices(report: &BatchReport) -> Vec<usize> {
        report.outcomes.iter().map(|o| o.index).collect()
    }

    #[test]
    fn test_halt_stops_after_first_failure() {
        let engine = engine();
        let report = BatchRunner::new(&engine, FailurePolicy::HaltOnFirstError).run_all(&records());

        assert_eq!(indices(&report), vec![0, 1]);
        assert!(report.halted);
        let summary = report.summary();
        assert_eq!(summary.submitted, 5);
        assert_eq!(summary.processed, 2);
        assert_eq!(summary.succeeded, 1);
        assert_eq!(summary.failed, 1);
    }

    #[test]
    fn test_collect_reports_every_record() {
        let engine = engine();
        let report = BatchRunner::new(&engine, FailurePolicy::CollectErrors).run_all(&records());

        assert_eq!(indices(&report), vec![0, 1, 2, 3, 4]);
        assert!(!report.halted);
        let failed: Vec<_> = report.failures().map(|(index, _)| index).collect();
        assert_eq!(failed, vec![1, 3]);
        let values: Vec<_> = report.successes().map(|(_, record)| record["N"].clone()).collect();
        assert_eq!(values, vec![json!(1), json!(3), json!(5)]);
    }

    #[test]
    fn test_failure_on_last_record_is_not_a_halt() {
        let engine = engine();
        let report = BatchRunner::new(&engine, FailurePolicy::HaltOnFirstError)
            .run_all(&[json!({"n": "1"}), json!({})]);
        assert_eq!(report.outcomes.len(), 2);
        assert!(!report.halted);
    }

    #[test]
    fn test_empty_batch() {
        let engine = engine();
        let report = BatchRunner::new(&engine, FailurePolicy::default()).run_all(&[]);
        assert!(report.outcomes.is_empty());
        assert_eq!(report.summary().processed, 0);
    }

    #[test]
    fn test_partitioned_merge_matches_sequential() {
        let engine = engine();
        let records = records();

        for policy in [FailurePolicy::HaltOnFirstError, FailurePolicy::CollectErrors] {
            let runner = BatchRunner::new(&engine, policy);
            let sequential = runner.run_all(&records);

            let parts = vec![
                runner.run_from(&records[3..], 3),
                runner.run_from(&records[..3], 0),
            ];
            let merged = BatchReport::merge(parts, policy);

            assert_eq!(indices(&merged), indices(&sequential), "policy {policy}");
            assert_eq!(merged.halted, sequential.halted);
            assert_eq!(merged.submitted, sequential.submitted);
        }
    }

    #[test]
    fn test_policy_parsing() {
        assert_eq!("halt".parse::<FailurePolicy>().unwrap(), FailurePolicy::HaltOnFirstError);
        assert_eq!(
            "Collect-Errors".parse::<FailurePolicy>().unwrap(),
            FailurePolicy::CollectErrors
        );
        assert_eq!(
            "retry".parse::<FailurePolicy>(),
            Err(ParsePolicyError("retry".to_string()))
        );
        assert_eq!(
            ParsePolicyError("retry".to_string()).to_string(),
            "unknown failure policy 'retry' (expected 'halt' or 'collect')"
        );

        let policy: FailurePolicy = serde_json::from_value(json!("collect")).unwrap();
        assert_eq!(policy, FailurePolicy::CollectErrors);
    }
}
