//! Error types for extraction.

use std::path::PathBuf;

use tabex_ingest::IngestError;
use thiserror::Error;

/// Errors raised while extracting records from tables.
#[derive(Debug, Error)]
pub enum ExtractError {
    // === Per-table Errors ===
    /// No sheet matches the configured name or any alias.
    #[error("table '{table}' not found; available tables: {}", available.join(", "))]
    TableNotFound {
        table: String,
        available: Vec<String>,
    },

    /// No scanned row contains every declared field.
    #[error(
        "no header row found in the first {scanned_rows} rows of '{table}'; never matched: {}",
        missing.join(", ")
    )]
    HeaderNotFound {
        table: String,
        scanned_rows: usize,
        missing: Vec<String>,
    },

    /// The configured last row lies before the header row (1-based rows).
    #[error("table '{table}' end_row {end_row} is before header row {header_row}")]
    InvalidRowRange {
        table: String,
        header_row: usize,
        end_row: usize,
    },

    /// The sheet exists but could not be loaded.
    #[error("failed to load table '{table}': {source}")]
    TableLoad {
        table: String,
        #[source]
        source: IngestError,
    },

    // === Output Errors ===
    /// Failed to write the output file.
    #[error("failed to write {path}: {source}")]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to serialize records.
    #[error("failed to serialize records: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Result type for extraction operations.
pub type Result<T> = std::result::Result<T, ExtractError>;
