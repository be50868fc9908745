//! Row-by-row record extraction.

use std::ops::Range;

use tabex_model::{Record, Table, TableConfig};

use crate::clean::clean_value;
use crate::header::HeaderMap;
use crate::label::normalize_label;

/// Lazily extracts records from the data rows of one table.
///
/// Data rows run from the row after the header through the configured
/// `end_row`, or through the last populated row of the table. Rows where
/// every field is blank are skipped silently; rows missing a mandatory field
/// are skipped and counted. Read [`skipped`](Self::skipped) and
/// [`blank_rows`](Self::blank_rows) after draining the iterator.
#[derive(Debug)]
pub struct RecordIter<'a> {
    table: &'a Table,
    config: &'a TableConfig,
    header: &'a HeaderMap,
    label: Option<String>,
    rows: Range<usize>,
    skipped: usize,
    blank_rows: usize,
}

enum RowOutcome {
    Record(Record),
    Blank,
    Incomplete(Vec<String>),
}

impl<'a> RecordIter<'a> {
    /// Prepares extraction for `table` using an already-built header map.
    pub fn new(table: &'a Table, config: &'a TableConfig, header: &'a HeaderMap) -> Self {
        let start = header.header_row() + 1;
        // 1-based inclusive `end_row` equals the 0-based exclusive bound.
        let end = match config.end_row {
            Some(end_row) => end_row.min(table.height()),
            None => table.last_populated_row().map_or(0, |row| row + 1),
        };
        let label = config
            .label
            .as_ref()
            .and_then(|spec| normalize_label(table.name(), &spec.suffix));

        Self {
            table,
            config,
            header,
            label,
            rows: start..end.max(start),
            skipped: 0,
            blank_rows: 0,
        }
    }

    /// Rows dropped because a mandatory field was blank.
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// Rows where every field was blank.
    pub fn blank_rows(&self) -> usize {
        self.blank_rows
    }

    fn extract_row(&self, row: usize) -> RowOutcome {
        let values: Vec<Option<String>> = self
            .config
            .fields
            .iter()
            .map(|field| {
                self.header
                    .column(&field.name)
                    .and_then(|column| clean_value(self.table.cell(row, column)))
            })
            .collect();

        if values.iter().all(Option::is_none) {
            return RowOutcome::Blank;
        }

        let missing: Vec<String> = self
            .config
            .fields
            .iter()
            .zip(&values)
            .filter(|(field, value)| value.is_none() && self.config.is_mandatory(field))
            .map(|(field, _)| field.name.clone())
            .collect();
        if !missing.is_empty() {
            return RowOutcome::Incomplete(missing);
        }

        let mut record = Record::with_capacity(
            values.len() + usize::from(self.config.label.is_some()) + self.config.metadata.len(),
        );
        for (field, value) in self.config.fields.iter().zip(values) {
            record.insert(field.key.clone(), value);
        }
        if let Some(spec) = &self.config.label {
            record.insert(spec.key.clone(), self.label.clone());
        }
        for (key, value) in &self.config.metadata {
            record.insert(key.clone(), Some(value.clone()));
        }
        RowOutcome::Record(record)
    }
}

impl Iterator for RecordIter<'_> {
    type Item = Record;

    fn next(&mut self) -> Option<Record> {
        loop {
            let row = self.rows.next()?;
            match self.extract_row(row) {
                RowOutcome::Record(record) => return Some(record),
                RowOutcome::Blank => self.blank_rows += 1,
                RowOutcome::Incomplete(missing) => {
                    self.skipped += 1;
                    tracing::debug!(
                        table = self.table.name(),
                        row = row + 1,
                        missing = ?missing,
                        "skipped row with blank mandatory fields"
                    );
                }
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.rows.len()))
    }
}
