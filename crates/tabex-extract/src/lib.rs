//! Tabular extraction with header resolution and normalization.
//!
//! The pipeline for one table is:
//!
//! 1. [`resolve_header_row`] finds the header row (unless configured)
//! 2. [`HeaderMap::build`] maps each declared field to a column
//! 3. [`RecordIter`] walks the data rows, cleaning values with
//!    [`clean_value`] and dropping incomplete rows
//!
//! [`run_batch`] drives that pipeline over every configured table and
//! [`write_records_json`] serializes the combined output.
//!
//! # Example
//!
//! ```ignore
//! use tabex_extract::{run_batch, write_records_json};
//! use tabex_ingest::Workbook;
//! use tabex_model::load_batch_config;
//!
//! let config = load_batch_config(Path::new("batch.toml"))?;
//! let mut workbook = Workbook::open(Path::new("workbook.xlsx"))?;
//! let outcome = run_batch(&mut workbook, &config);
//! write_records_json(Path::new("out.json"), &outcome.records)?;
//! ```

mod batch;
mod clean;
mod error;
mod header;
mod label;
mod output;
mod rows;

// === Error Types ===
pub use error::{ExtractError, Result};

// === Per-table Stages ===
pub use clean::clean_value;
pub use header::{HeaderMap, resolve_header_row};
pub use label::normalize_label;
pub use rows::RecordIter;

// === Batch ===
pub use batch::{BatchOutcome, BatchSummary, TableSummary, run_batch};

// === Output ===
pub use output::{records_to_json, write_records_json};
