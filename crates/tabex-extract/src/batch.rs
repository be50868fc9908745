//! Batch orchestration across configured tables.

use std::collections::BTreeMap;

use tabex_ingest::{TableSource, resolve_table_name};
use tabex_model::{BatchConfig, Record, TableConfig};
use tracing::{info, info_span, warn};

use crate::error::{ExtractError, Result};
use crate::header::{HeaderMap, resolve_header_row};
use crate::rows::RecordIter;

/// Records and summary produced by [`run_batch`].
#[derive(Debug)]
pub struct BatchOutcome {
    /// All records, in entry order then row order.
    pub records: Vec<Record>,
    /// Per-entry results and aggregate counts.
    pub summary: BatchSummary,
}

/// What happened to one batch entry.
#[derive(Debug)]
pub struct TableSummary {
    /// Table name as configured.
    pub table: String,
    /// Sheet the name resolved to, if any.
    pub resolved: Option<String>,
    /// Header row used (1-based).
    pub header_row: Option<usize>,
    /// Records emitted.
    pub records: usize,
    /// Rows dropped for blank mandatory fields.
    pub skipped: usize,
    /// Rows where every field was blank.
    pub blank_rows: usize,
    /// Declared fields without a header column.
    pub missing_columns: Vec<String>,
    /// Why the entry contributed nothing, if it failed.
    pub error: Option<ExtractError>,
}

impl TableSummary {
    fn failed(table: &str, error: ExtractError) -> Self {
        Self {
            table: table.to_string(),
            resolved: None,
            header_row: None,
            records: 0,
            skipped: 0,
            blank_rows: 0,
            missing_columns: Vec::new(),
            error: Some(error),
        }
    }
}

/// Summary of a whole batch, for operator-facing reporting.
#[derive(Debug, Default)]
pub struct BatchSummary {
    /// One entry per configured table, in configuration order.
    pub tables: Vec<TableSummary>,
    /// For each summary key that occurred, record counts per distinct value.
    /// Keys keep their configured order.
    pub counts: Vec<(String, BTreeMap<String, usize>)>,
}

impl BatchSummary {
    /// Total records emitted.
    pub fn total_records(&self) -> usize {
        self.tables.iter().map(|t| t.records).sum()
    }

    /// Total rows dropped for blank mandatory fields.
    pub fn total_skipped(&self) -> usize {
        self.tables.iter().map(|t| t.skipped).sum()
    }

    /// Returns true if any entry failed.
    pub fn has_errors(&self) -> bool {
        self.tables.iter().any(|t| t.error.is_some())
    }

    /// Entries that failed.
    pub fn failures(&self) -> impl Iterator<Item = &TableSummary> {
        self.tables.iter().filter(|t| t.error.is_some())
    }

    fn for_keys(keys: &[String]) -> Self {
        Self {
            tables: Vec::new(),
            counts: keys.iter().map(|key| (key.clone(), BTreeMap::new())).collect(),
        }
    }

    /// Record counts per distinct value of `key`.
    pub fn counts_for(&self, key: &str) -> Option<&BTreeMap<String, usize>> {
        self.counts
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, values)| values)
    }

    /// Values of `key` with their counts, most frequent first, ties by value.
    pub fn top_values(&self, key: &str, limit: usize) -> Vec<(&str, usize)> {
        let Some(values) = self.counts_for(key) else {
            return Vec::new();
        };
        let mut ranked: Vec<(&str, usize)> = values
            .iter()
            .map(|(value, count)| (value.as_str(), *count))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        ranked.truncate(limit);
        ranked
    }

    fn tally(&mut self, record: &Record) {
        for (key, values) in &mut self.counts {
            if let Some(value) = record.get(key) {
                *values.entry(value.to_string()).or_default() += 1;
            }
        }
    }
}

/// Runs every configured entry against `source`.
///
/// Entry-level failures are recorded in the summary and never stop the
/// batch; the records of every successful entry are returned in order.
pub fn run_batch<S: TableSource + ?Sized>(source: &mut S, config: &BatchConfig) -> BatchOutcome {
    let mut records = Vec::new();
    let mut summary = BatchSummary::for_keys(&config.effective_summary_keys());

    for entry in &config.tables {
        let span = info_span!("table", table = %entry.table);
        let _guard = span.enter();

        match extract_entry(source, entry, config.header_scan_rows) {
            Ok((table_records, table_summary)) => {
                info!(
                    resolved = table_summary.resolved.as_deref().unwrap_or_default(),
                    header_row = table_summary.header_row.unwrap_or_default(),
                    records = table_summary.records,
                    skipped = table_summary.skipped,
                    blank_rows = table_summary.blank_rows,
                    "extracted table"
                );
                for record in &table_records {
                    summary.tally(record);
                }
                records.extend(table_records);
                summary.tables.push(table_summary);
            }
            Err(error) => {
                warn!(error = %error, "table skipped");
                summary.tables.push(TableSummary::failed(&entry.table, error));
            }
        }
    }

    summary.counts.retain(|(_, values)| !values.is_empty());
    info!(
        tables = summary.tables.len(),
        records = records.len(),
        failed = summary.failures().count(),
        "batch complete"
    );
    BatchOutcome { records, summary }
}

fn extract_entry<S: TableSource + ?Sized>(
    source: &mut S,
    entry: &TableConfig,
    scan_rows: usize,
) -> Result<(Vec<Record>, TableSummary)> {
    let available = source.table_names();
    let resolved = std::iter::once(&entry.table)
        .chain(&entry.aliases)
        .find_map(|name| resolve_table_name(&available, name))
        .map(str::to_string)
        .ok_or_else(|| ExtractError::TableNotFound {
            table: entry.table.clone(),
            available: available.clone(),
        })?;

    let table = source
        .load_table(&resolved)
        .map_err(|e| ExtractError::TableLoad {
            table: entry.table.clone(),
            source: e,
        })?;

    let header_row = match entry.header_row {
        Some(row) => row - 1,
        None => resolve_header_row(&table, &entry.fields, scan_rows)?,
    };
    if let Some(end_row) = entry.end_row
        && end_row < header_row + 1
    {
        return Err(ExtractError::InvalidRowRange {
            table: entry.table.clone(),
            header_row: header_row + 1,
            end_row,
        });
    }

    let header = HeaderMap::build(&table, header_row, &entry.fields);
    let missing_columns: Vec<String> = header.missing().into_iter().map(String::from).collect();
    if !missing_columns.is_empty() {
        warn!(missing = ?missing_columns, header_row = header_row + 1, "columns not found in header row");
    }

    let mut rows = RecordIter::new(&table, entry, &header);
    let records: Vec<Record> = rows.by_ref().collect();

    let summary = TableSummary {
        table: entry.table.clone(),
        resolved: Some(resolved),
        header_row: Some(header_row + 1),
        records: records.len(),
        skipped: rows.skipped(),
        blank_rows: rows.blank_rows(),
        missing_columns,
        error: None,
    };
    Ok((records, summary))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabex_ingest::MemoryWorkbook;
    use tabex_model::{Cell, LabelSpec, Table};

    fn sheet(name: &str, rows: &[&[&str]]) -> Table {
        Table::new(
            name,
            rows.iter()
                .map(|row| row.iter().map(|v| Cell::text(*v)).collect())
                .collect(),
        )
    }

    #[test]
    fn test_alias_lookup() {
        let mut workbook = MemoryWorkbook::new().with_table(sheet(
            "Shakti Team",
            &[&["Group Name"], &["Shakti Rosera"]],
        ));
        let config = BatchConfig::new(vec![
            TableConfig::new("Sakti Team", ["Group Name"])
                .with_alias("shakti team")
                .with_metadata("form_type", "shakti"),
        ]);

        let outcome = run_batch(&mut workbook, &config);
        assert!(!outcome.summary.has_errors());
        assert_eq!(outcome.records.len(), 1);
        assert_eq!(
            outcome.summary.tables[0].resolved.as_deref(),
            Some("Shakti Team")
        );
    }

    #[test]
    fn test_end_row_before_detected_header() {
        let mut workbook = MemoryWorkbook::new().with_table(sheet(
            "WTM",
            &[&["title"], &["title"], &["Name"], &["Asha Devi"]],
        ));
        let config = BatchConfig::new(vec![TableConfig::new("WTM", ["Name"]).with_end_row(2)]);

        let outcome = run_batch(&mut workbook, &config);
        assert!(matches!(
            outcome.summary.tables[0].error,
            Some(ExtractError::InvalidRowRange {
                header_row: 3,
                end_row: 2,
                ..
            })
        ));
    }

    #[test]
    fn test_top_values() {
        let mut summary = BatchSummary::for_keys(&["assembly".to_string()]);
        for value in ["Rosera", "Paro", "Rosera", "Jale", "Paro", "Rosera"] {
            let mut record = Record::new();
            record.insert("assembly", Some(value.to_string()));
            summary.tally(&record);
        }

        assert_eq!(
            summary.top_values("assembly", 2),
            vec![("Rosera", 3), ("Paro", 2)]
        );
        assert!(summary.top_values("form_type", 5).is_empty());
    }

    #[test]
    fn test_counts_follow_summary_key_order() {
        let mut workbook = MemoryWorkbook::new().with_table(sheet(
            "ROSERA AC",
            &[&["Name"], &["Asha Devi"], &["Ravi Kumar"]],
        ));
        let mut config = BatchConfig::new(vec![
            TableConfig::new("ROSERA AC", ["Name"])
                .with_label(LabelSpec::new("assembly"))
                .with_metadata("form_type", "assembly"),
        ]);
        config.summary_keys = ["form_type", "zone", "assembly"]
            .map(String::from)
            .to_vec();

        let outcome = run_batch(&mut workbook, &config);
        let keys: Vec<&str> = outcome
            .summary
            .counts
            .iter()
            .map(|(key, _)| key.as_str())
            .collect();
        assert_eq!(keys, vec!["form_type", "assembly"]);
        assert_eq!(
            outcome.summary.counts_for("assembly").map(|values| values["Rosera"]),
            Some(2)
        );
        assert!(outcome.summary.counts_for("zone").is_none());
    }
}
