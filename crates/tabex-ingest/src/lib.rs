//! Workbook ingestion for tabex.
//!
//! This crate turns spreadsheet files into [`tabex_model::Table`] values and
//! resolves configured table names against the sheets a workbook offers.
//!
//! # Features
//!
//! - **Workbook Loading**: xlsx, xlsm, xlsb, xls and ods files via `calamine`
//! - **Table Lookup**: exact, then case/whitespace-insensitive sheet names
//! - **In-Memory Sources**: [`MemoryWorkbook`] for tests and generated data
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use tabex_ingest::{TableSource, Workbook};
//!
//! let mut workbook = Workbook::open(Path::new("workbook.xlsx"))?;
//! for name in workbook.table_names() {
//!     let table = workbook.load_table(&name)?;
//!     println!("{name}: {} rows", table.height());
//! }
//! ```

mod error;
mod lookup;
mod source;
mod workbook;

// === Error Types ===
pub use error::{IngestError, Result};

// === Table Sources ===
pub use source::{MemoryWorkbook, TableSource};
pub use workbook::{Workbook, cell_from_data, table_from_range};

// === Table Lookup ===
pub use lookup::resolve_table_name;
