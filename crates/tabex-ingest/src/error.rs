//! Error types for workbook ingestion.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while opening workbooks or reading sheets.
#[derive(Debug, Error)]
pub enum IngestError {
    // === File System Errors ===
    /// Workbook file not found.
    #[error("workbook not found: {path}")]
    FileNotFound { path: PathBuf },

    /// The file exists but could not be opened as a workbook.
    #[error("failed to open workbook {path}: {message}")]
    Workbook { path: PathBuf, message: String },

    // === Sheet Errors ===
    /// The workbook has no sheet with this name.
    #[error("sheet not found: {name}")]
    SheetNotFound { name: String },

    /// The sheet exists but its cells could not be read.
    #[error("failed to read sheet {name}: {message}")]
    SheetRead { name: String, message: String },
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;
