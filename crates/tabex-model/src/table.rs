//! Named tables of cells.

use crate::cell::Cell;

static EMPTY: Cell = Cell::Empty;

/// One named sheet of a workbook.
///
/// Row and column indices are 0-based and absolute: row 0 is the first row of
/// the sheet, regardless of where its populated area starts. Rows may have
/// different lengths; cells past the end of a row read as [`Cell::Empty`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    name: String,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    /// Creates a table from its name and rows.
    pub fn new(name: impl Into<String>, rows: Vec<Vec<Cell>>) -> Self {
        Self {
            name: name.into(),
            rows,
        }
    }

    /// Sheet name as it appears in the workbook.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of stored rows, including trailing blank rows.
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Width of the widest row.
    pub fn width(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Returns true if the table holds no rows at all.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns the cells of a row, or `None` past the end of the table.
    pub fn row(&self, index: usize) -> Option<&[Cell]> {
        self.rows.get(index).map(Vec::as_slice)
    }

    /// Iterates over all rows in order.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.rows.iter().map(Vec::as_slice)
    }

    /// Returns the cell at `(row, column)`; out-of-range positions are empty.
    pub fn cell(&self, row: usize, column: usize) -> &Cell {
        self.rows
            .get(row)
            .and_then(|cells| cells.get(column))
            .unwrap_or(&EMPTY)
    }

    /// Index of the last row that contains at least one non-blank cell.
    pub fn last_populated_row(&self) -> Option<usize> {
        self.rows
            .iter()
            .rposition(|row| row.iter().any(|cell| !cell.is_blank()))
    }
}
