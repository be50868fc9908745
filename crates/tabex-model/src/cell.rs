//! Typed cell values.

use std::fmt;

use chrono::NaiveDateTime;

/// A single cell value read from a sheet.
///
/// Workbook readers map their native cell types onto this enum so that the
/// extraction stages never depend on a particular file format.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Cell {
    /// No value.
    #[default]
    Empty,
    /// Free text, as stored.
    Text(String),
    /// Integer value.
    Int(i64),
    /// Floating-point value (spreadsheets store most numbers this way).
    Float(f64),
    /// Boolean value.
    Bool(bool),
    /// Date and/or time value.
    DateTime(NaiveDateTime),
    /// Formula error such as `#N/A` or `#DIV/0!`.
    Error(String),
}

impl Cell {
    /// Convenience constructor for text cells.
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// Returns true for empty cells and text cells holding only whitespace.
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Text(value) => value.trim().is_empty(),
            _ => false,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => Ok(()),
            Self::Text(value) | Self::Error(value) => f.write_str(value),
            Self::Int(value) => write!(f, "{value}"),
            Self::Float(value) => write!(f, "{value}"),
            Self::Bool(value) => write!(f, "{value}"),
            Self::DateTime(value) => write!(f, "{}", value.format("%Y-%m-%dT%H:%M:%S")),
        }
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for Cell {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}
