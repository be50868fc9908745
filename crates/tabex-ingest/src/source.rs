//! The table source abstraction.

use tabex_model::Table;

use crate::error::{IngestError, Result};

/// Anything that can list and load named tables.
///
/// The extraction batch only talks to this trait, so workbooks on disk and
/// tables built in memory are interchangeable.
pub trait TableSource {
    /// Names of all tables, in workbook order.
    fn table_names(&self) -> Vec<String>;

    /// Loads one table by its exact name.
    fn load_table(&mut self, name: &str) -> Result<Table>;
}

/// A table source backed by tables held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryWorkbook {
    tables: Vec<Table>,
}

impl MemoryWorkbook {
    /// Creates an empty workbook.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a table; a table with the same name is replaced in place.
    #[must_use]
    pub fn with_table(mut self, table: Table) -> Self {
        self.insert(table);
        self
    }

    /// Adds or replaces a table.
    pub fn insert(&mut self, table: Table) {
        match self.tables.iter_mut().find(|t| t.name() == table.name()) {
            Some(existing) => *existing = table,
            None => self.tables.push(table),
        }
    }
}

impl FromIterator<Table> for MemoryWorkbook {
    fn from_iter<I: IntoIterator<Item = Table>>(iter: I) -> Self {
        let mut workbook = Self::new();
        for table in iter {
            workbook.insert(table);
        }
        workbook
    }
}

impl TableSource for MemoryWorkbook {
    fn table_names(&self) -> Vec<String> {
        self.tables.iter().map(|t| t.name().to_string()).collect()
    }

    fn load_table(&mut self, name: &str) -> Result<Table> {
        self.tables
            .iter()
            .find(|t| t.name() == name)
            .cloned()
            .ok_or_else(|| IngestError::SheetNotFound {
                name: name.to_string(),
            })
    }
}
