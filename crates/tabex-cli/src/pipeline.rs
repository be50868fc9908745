//! The extraction run behind `tabex extract`.
//!
//! Stages, in order:
//! 1. **Configure**: load the batch file and apply command-line overrides
//! 2. **Ingest**: open the workbook
//! 3. **Extract**: run every configured table through the batch orchestrator
//! 4. **Output**: write the combined JSON array (skipped on dry runs)

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result, anyhow};
use tracing::{info, info_span};

use tabex_extract::{BatchOutcome, run_batch, write_records_json};
use tabex_ingest::{TableSource, Workbook};
use tabex_model::{BatchConfig, Record, load_batch_config};

use crate::logging::REDACTED_VALUE;

/// Inputs to an extraction run.
#[derive(Debug, Clone, Default)]
pub struct ExtractOptions {
    /// Batch configuration file.
    pub config: PathBuf,
    /// Workbook overriding the one named in the configuration.
    pub workbook: Option<PathBuf>,
    /// Output path overriding the one named in the configuration.
    pub output: Option<PathBuf>,
    /// Run extraction without writing the output file.
    pub dry_run: bool,
}

/// Result of an extraction run.
#[derive(Debug)]
pub struct ExtractRun {
    /// Workbook that was read.
    pub workbook: PathBuf,
    /// Output path, when one was resolved.
    pub output: Option<PathBuf>,
    /// Whether the output file was written.
    pub written: bool,
    /// Records and per-table summary.
    pub outcome: BatchOutcome,
}

impl ExtractRun {
    /// Returns true if any configured table failed.
    pub fn has_errors(&self) -> bool {
        self.outcome.summary.has_errors()
    }
}

// ============================================================================
// Stage 1: Configure
// ============================================================================

/// Loads the batch file and resolves the workbook and output paths.
///
/// Command-line paths win over configured ones. An output path is required
/// unless `dry_run` is set.
pub fn configure(options: &ExtractOptions) -> Result<(BatchConfig, PathBuf, Option<PathBuf>)> {
    let config = load_batch_config(&options.config)
        .with_context(|| format!("load config {}", options.config.display()))?;

    let workbook = options
        .workbook
        .clone()
        .or_else(|| config.workbook.clone())
        .ok_or_else(|| {
            anyhow!(
                "no workbook given: pass --workbook or set `workbook` in {}",
                options.config.display()
            )
        })?;

    let output = options.output.clone().or_else(|| config.output.clone());
    if output.is_none() && !options.dry_run {
        return Err(anyhow!(
            "no output path given: pass --output or set `output` in {}",
            options.config.display()
        ));
    }

    Ok((config, workbook, output))
}

// ============================================================================
// Stages 2-4: Ingest, Extract, Output
// ============================================================================

/// Runs a full extraction from a configuration file.
pub fn run_extract(options: &ExtractOptions) -> Result<ExtractRun> {
    let (config, workbook_path, output) = configure(options)?;

    let span = info_span!("extract", workbook = %workbook_path.display());
    let _guard = span.enter();
    let start = Instant::now();

    let mut workbook = Workbook::open(&workbook_path)
        .with_context(|| format!("open workbook {}", workbook_path.display()))?;
    let target = if options.dry_run { None } else { output.as_deref() };
    let outcome = extract_and_write(&mut workbook, &config, target)?;

    info!(
        records = outcome.records.len(),
        tables = outcome.summary.tables.len(),
        dry_run = options.dry_run,
        duration_ms = start.elapsed().as_millis(),
        "extraction complete"
    );

    Ok(ExtractRun {
        workbook: workbook_path,
        written: target.is_some(),
        output,
        outcome,
    })
}

/// Runs the batch against `source` and writes the records to `output`, if given.
///
/// Table-level failures stay in the returned summary; only a failed write
/// is an error.
pub fn extract_and_write<S: TableSource + ?Sized>(
    source: &mut S,
    config: &BatchConfig,
    output: Option<&Path>,
) -> Result<BatchOutcome> {
    let outcome = run_batch(source, config);
    if let Some(path) = output {
        write_records_json(path, &outcome.records)
            .with_context(|| format!("write {}", path.display()))?;
    }
    Ok(outcome)
}

/// Copies the first `limit` records for display.
///
/// Values are replaced with a redaction marker unless `reveal` is set;
/// keys and nulls are kept in order.
pub fn sample_records(records: &[Record], limit: usize, reveal: bool) -> Vec<Record> {
    records
        .iter()
        .take(limit)
        .map(|record| {
            let mut sample = Record::with_capacity(record.len());
            for (key, value) in record.iter() {
                let shown = match value {
                    Some(value) if reveal => Some(value.to_string()),
                    Some(_) => Some(REDACTED_VALUE.to_string()),
                    None => None,
                };
                sample.insert(key, shown);
            }
            sample
        })
        .collect()
}
