//! Spreadsheet workbooks read through `calamine`.

use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use calamine::{Data, Range, Reader, Sheets, open_workbook_auto};
use chrono::{NaiveDate, NaiveDateTime};
use tabex_model::{Cell, Table};

use crate::error::{IngestError, Result};
use crate::source::TableSource;

/// A workbook file opened for reading.
///
/// The underlying file handle is released when the workbook is dropped.
pub struct Workbook {
    path: PathBuf,
    sheets: Sheets<BufReader<File>>,
}

impl Workbook {
    /// Opens a workbook, detecting the format from the file extension.
    pub fn open(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(IngestError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let sheets = open_workbook_auto(path).map_err(|e| IngestError::Workbook {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        tracing::debug!(path = %path.display(), "opened workbook");
        Ok(Self {
            path: path.to_path_buf(),
            sheets,
        })
    }
}

impl fmt::Debug for Workbook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Workbook")
            .field("path", &self.path)
            .field("sheets", &self.sheets.sheet_names())
            .finish()
    }
}

impl TableSource for Workbook {
    fn table_names(&self) -> Vec<String> {
        self.sheets.sheet_names()
    }

    fn load_table(&mut self, name: &str) -> Result<Table> {
        if !self.sheets.sheet_names().iter().any(|sheet| sheet == name) {
            return Err(IngestError::SheetNotFound {
                name: name.to_string(),
            });
        }
        let range = self
            .sheets
            .worksheet_range(name)
            .map_err(|e| IngestError::SheetRead {
                name: name.to_string(),
                message: e.to_string(),
            })?;
        let table = table_from_range(name, &range);
        tracing::debug!(
            sheet = name,
            rows = table.height(),
            columns = table.width(),
            "loaded sheet"
        );
        Ok(table)
    }
}

/// Builds a table from a sheet range, keeping absolute row/column positions.
///
/// `calamine` ranges start at the first used cell; the rows and columns
/// before it are filled with empty cells so that row 1 of the sheet is
/// always row index 0 of the table.
pub fn table_from_range(name: &str, range: &Range<Data>) -> Table {
    let Some((start_row, start_col)) = range.start() else {
        return Table::new(name, Vec::new());
    };
    let start_row = start_row as usize;
    let start_col = start_col as usize;

    let mut rows: Vec<Vec<Cell>> = Vec::with_capacity(start_row + range.height());
    rows.resize_with(start_row, Vec::new);
    for data_row in range.rows() {
        let mut cells = Vec::with_capacity(start_col + data_row.len());
        cells.resize(start_col, Cell::Empty);
        cells.extend(data_row.iter().map(cell_from_data));
        rows.push(cells);
    }
    Table::new(name, rows)
}

/// Maps a `calamine` cell value onto the format-independent [`Cell`].
pub fn cell_from_data(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::String(value) => Cell::Text(value.clone()),
        Data::Int(value) => Cell::Int(*value),
        Data::Float(value) => Cell::Float(*value),
        Data::Bool(value) => Cell::Bool(*value),
        Data::DateTime(value) if value.is_duration() => Cell::Float(value.as_f64()),
        Data::DateTime(value) => match value.as_datetime() {
            Some(datetime) => Cell::DateTime(datetime),
            None => Cell::Float(value.as_f64()),
        },
        Data::DateTimeIso(value) => match parse_iso_datetime(value) {
            Some(datetime) => Cell::DateTime(datetime),
            None => Cell::Text(value.clone()),
        },
        Data::DurationIso(value) => Cell::Text(value.clone()),
        Data::Error(error) => Cell::Error(error.to_string()),
    }
}

fn parse_iso_datetime(value: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}
