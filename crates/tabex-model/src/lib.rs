//! Core data model for tabex.
//!
//! This crate holds the types shared by every stage of an extraction run:
//!
//! - **Tables**: named sheets as ordered rows of typed [`Cell`] values
//! - **Records**: flat, ordered key/value rows produced by extraction
//! - **Configuration**: the declarative batch file describing which tables to
//!   read, which fields to pull out of them, and which metadata to attach
//!
//! # Example
//!
//! ```ignore
//! use tabex_model::{Cell, Table};
//!
//! let table = Table::new(
//!     "WTM",
//!     vec![
//!         vec![Cell::text("Name"), Cell::text("Mobile Number")],
//!         vec![Cell::text("Asha Devi"), Cell::Float(9876543210.0)],
//!     ],
//! );
//! assert_eq!(table.last_populated_row(), Some(1));
//! ```

mod cell;
mod config;
mod error;
mod record;
mod table;
mod text;

// === Table Model ===
pub use cell::Cell;
pub use table::Table;

// === Records ===
pub use record::Record;

// === Configuration ===
pub use config::{
    BatchConfig, DEFAULT_HEADER_SCAN_ROWS, DEFAULT_LABEL_SUFFIX, FieldSpec, LabelSpec,
    MatchPolicy, TableConfig, load_batch_config,
};
pub use error::ConfigError;

// === Text Helpers ===
pub use text::normalize_text;
