//! Header row detection and field-to-column mapping.

use std::collections::BTreeSet;

use tabex_model::{Cell, FieldSpec, Table, normalize_text};

use crate::clean::clean_value;
use crate::error::{ExtractError, Result};

/// Resolved column positions for the declared fields of one table.
///
/// Built once per table and read-only afterwards. Fields whose header could
/// not be found map to `None`; their values read as absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderMap {
    header_row: usize,
    columns: Vec<(String, Option<usize>)>,
}

impl HeaderMap {
    /// Maps `fields` onto the cells of `header_row` (0-based).
    ///
    /// Cells are visited left to right; each non-blank cell is claimed by the
    /// first still-unmapped field that matches it, so a column never serves
    /// two fields and a field keeps its leftmost matching column.
    pub fn build(table: &Table, header_row: usize, fields: &[FieldSpec]) -> Self {
        let patterns: Vec<String> = fields.iter().map(|f| normalize_text(&f.name)).collect();
        let mut columns: Vec<(String, Option<usize>)> =
            fields.iter().map(|f| (f.name.clone(), None)).collect();

        let cells = table.row(header_row).unwrap_or_default();
        for (index, cell) in cells.iter().enumerate() {
            let Some(text) = header_text(cell) else {
                continue;
            };
            let claimed = fields.iter().enumerate().find(|(i, field)| {
                columns[*i].1.is_none() && field.policy.matches(&text, &patterns[*i])
            });
            if let Some((i, _)) = claimed {
                columns[i].1 = Some(index);
            }
        }

        Self {
            header_row,
            columns,
        }
    }

    /// Header row index (0-based).
    pub fn header_row(&self) -> usize {
        self.header_row
    }

    /// Column of a field, or `None` if the field is unknown or unmapped.
    pub fn column(&self, field: &str) -> Option<usize> {
        self.columns
            .iter()
            .find(|(name, _)| name == field)
            .and_then(|(_, column)| *column)
    }

    /// Fields without a matching header cell, in declaration order.
    pub fn missing(&self) -> Vec<&str> {
        self.columns
            .iter()
            .filter(|(_, column)| column.is_none())
            .map(|(name, _)| name.as_str())
            .collect()
    }

    /// Returns true when every field has a column.
    pub fn is_complete(&self) -> bool {
        self.columns.iter().all(|(_, column)| column.is_some())
    }
}

/// Finds the first row among the leading `scan_rows` rows in which every
/// field has a matching header cell. Returns a 0-based row index.
pub fn resolve_header_row(table: &Table, fields: &[FieldSpec], scan_rows: usize) -> Result<usize> {
    let scanned = scan_rows.min(table.height());
    let mut seen: BTreeSet<&str> = BTreeSet::new();

    for row in 0..scanned {
        let map = HeaderMap::build(table, row, fields);
        if map.is_complete() {
            tracing::debug!(table = table.name(), header_row = row + 1, "detected header row");
            return Ok(row);
        }
        for field in fields {
            if map.column(&field.name).is_some() {
                seen.insert(field.name.as_str());
            }
        }
    }

    let missing = fields
        .iter()
        .filter(|field| !seen.contains(field.name.as_str()))
        .map(|field| field.name.clone())
        .collect();
    Err(ExtractError::HeaderNotFound {
        table: table.name().to_string(),
        scanned_rows: scanned,
        missing,
    })
}

fn header_text(cell: &Cell) -> Option<String> {
    clean_value(cell)
        .map(|text| normalize_text(&text))
        .filter(|text| !text.is_empty())
}
