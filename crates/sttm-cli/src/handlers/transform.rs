//! Transform command handler
//!
//! Records are split into contiguous partitions that run on blocking worker
//! threads, all sharing one engine. Partition reports are merged back into
//! input order, so the result matches a sequential run.

use super::utils::{load_catalog, load_records, save_records};
use crate::cli::{OutputFormat, TransformArgs};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::logging::timing::Timer;
use crate::output::{OutputWriter, RecordFailure};
use indicatif::ProgressBar;
use serde::Serialize;
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;
use sttm_core::{
    BatchReport, BatchRunner, BatchSummary, FailurePolicy, LinkValidation, TransformRegistry,
    TransformationEngine,
};
use tokio::task::JoinSet;
use tracing::{debug, info, instrument};

/// Largest number of records handed to one worker at a time
const MAX_PARTITION: usize = 1024;

/// Machine-readable transform result
#[derive(Debug, Serialize)]
struct TransformOutput {
    summary: BatchSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    saved_to: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    records: Option<Vec<Value>>,
    failures: Vec<RecordFailure>,
}

/// Handle the transform command
#[instrument(skip(config, output), fields(catalog = %args.catalog.display(), records = %args.records.display()))]
pub async fn handle_transform(
    args: TransformArgs,
    config: &Config,
    output: &mut OutputWriter,
) -> Result<()> {
    let timer = Timer::with_details("transform_command", &args.records.display().to_string());

    if args.save_to.as_deref() == Some(args.records.as_path()) {
        return Err(Error::invalid_args("--save-to must not overwrite the input records"));
    }

    let policy = args.policy.map(FailurePolicy::from).unwrap_or(config.engine.policy);
    let workers = args
        .workers
        .map(usize::from)
        .unwrap_or(config.engine.workers)
        .max(1);
    let mut options = config.engine.options();
    if args.lazy {
        options.link_validation = LinkValidation::Lazy;
    }

    output.info(&format!("Loading catalog: {}", args.catalog.display()))?;
    let catalog = load_catalog(&args.catalog)?;
    let engine = Arc::new(TransformationEngine::with_options(
        catalog,
        TransformRegistry::builtin(),
        options,
    )?);

    let records = Arc::new(load_records(&args.records)?);
    output.info(&format!(
        "Transforming {} record(s) with {} worker(s), policy '{}'",
        records.len(),
        workers,
        policy
    ))?;

    let progress = output.progress_bar(records.len() as u64, "records");
    let report = run_partitioned(engine, records, policy, workers, progress.as_ref()).await?;
    if let Some(pb) = progress {
        pb.finish_and_clear();
    }

    let summary = report.summary();
    let failures: Vec<RecordFailure> = report
        .failures()
        .map(|(index, error)| RecordFailure::new(index, error))
        .collect();
    let (indices, transformed): (Vec<usize>, Vec<Value>) = report
        .successes()
        .map(|(index, record)| (index, Value::Object(record.clone())))
        .unzip();

    if let Some(path) = &args.save_to {
        save_records(path, &transformed)?;
        info!(path = %path.display(), count = transformed.len(), "Saved transformed records");
    }

    if output.format() == OutputFormat::Human {
        match &args.save_to {
            Some(path) => output.success(&format!(
                "✓ Wrote {} record(s) to {}",
                transformed.len(),
                path.display()
            ))?,
            None => {
                output.section("Records")?;
                for (index, record) in indices.iter().zip(&transformed) {
                    output.record(*index, record)?;
                }
            }
        }

        if !failures.is_empty() {
            output.section("Failures")?;
            for failure in &failures {
                output.record_failure(failure)?;
            }
        }

        output.section("Summary")?;
        output.batch_summary(&summary)?;
    } else {
        let saved = args.save_to.is_some();
        output.data(&TransformOutput {
            summary: summary.clone(),
            saved_to: args.save_to.clone(),
            records: (!saved).then_some(transformed),
            failures,
        })?;
    }

    debug!(elapsed_ms = timer.elapsed().as_millis() as u64, "Transform finished");

    if summary.failed > 0 {
        return Err(Error::RecordsFailed {
            failed: summary.failed,
            submitted: summary.submitted,
        });
    }

    Ok(())
}

/// Run the batch in partitions on up to `workers` blocking threads.
///
/// Under [`FailurePolicy::HaltOnFirstError`] no new partition is started once
/// a finished partition reports a failure.
async fn run_partitioned(
    engine: Arc<TransformationEngine>,
    records: Arc<Vec<Value>>,
    policy: FailurePolicy,
    workers: usize,
    progress: Option<&ProgressBar>,
) -> Result<BatchReport> {
    let total = records.len();
    let mut pending = partitions(total, workers).into_iter();
    let mut tasks = JoinSet::new();
    let mut parts = Vec::new();
    let mut stop = false;

    loop {
        while !stop && tasks.len() < workers {
            let Some((start, end)) = pending.next() else {
                break;
            };
            let engine = Arc::clone(&engine);
            let records = Arc::clone(&records);
            tasks.spawn_blocking(move || {
                BatchRunner::new(&engine, policy).run_from(&records[start..end], start)
            });
        }

        let Some(joined) = tasks.join_next().await else {
            break;
        };
        let part = joined.map_err(|e| Error::other(format!("worker task failed: {}", e)))?;

        if let Some(pb) = progress {
            pb.inc(part.outcomes.len() as u64);
        }
        if policy == FailurePolicy::HaltOnFirstError && part.has_failures() {
            stop = true;
        }
        parts.push(part);
    }

    let mut report = BatchReport::merge(parts, policy);
    // Partitions never started still count as submitted
    report.submitted = total;
    if policy == FailurePolicy::HaltOnFirstError {
        report.halted = report.has_failures() && report.outcomes.len() < total;
    }

    Ok(report)
}

/// Contiguous `(start, end)` ranges covering `total` records
fn partitions(total: usize, workers: usize) -> Vec<(usize, usize)> {
    if total == 0 {
        return Vec::new();
    }

    let size = total.div_ceil(workers.max(1)).clamp(1, MAX_PARTITION);
    (0..total)
        .step_by(size)
        .map(|start| (start, (start + size).min(total)))
        .collect()
}
