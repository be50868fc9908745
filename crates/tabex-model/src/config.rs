//! Declarative batch configuration.
//!
//! A batch file lists the tables to read and, per table, the fields to
//! extract, how to find the header row, and the metadata to attach:
//!
//! ```toml
//! workbook = "workbook.xlsx"
//! output = "call_center_purposes.json"
//!
//! [[tables]]
//! table = "WTM"
//! fields = ["Name", "Mobile Number", { name = "Assembly", key = "assembly" }]
//! header_row = 1
//! metadata = { form_type = "wtm" }
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ConfigError;
use crate::text::normalize_text;

/// Number of leading rows searched for a header row when none is configured.
pub const DEFAULT_HEADER_SCAN_ROWS: usize = 20;

/// Suffix token stripped from table names by the label normalizer.
pub const DEFAULT_LABEL_SUFFIX: &str = "AC";

fn default_header_scan_rows() -> usize {
    DEFAULT_HEADER_SCAN_ROWS
}

fn default_label_suffix() -> String {
    DEFAULT_LABEL_SUFFIX.to_string()
}

/// How a field name is compared against header cell text.
///
/// Both sides are normalized with [`normalize_text`] first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchPolicy {
    /// Normalized header text must equal the normalized field name.
    #[default]
    Exact,
    /// Normalized header text must contain the normalized field name.
    Contains,
}

impl MatchPolicy {
    /// Compares already-normalized header text with an already-normalized pattern.
    pub fn matches(self, header: &str, pattern: &str) -> bool {
        if header.is_empty() || pattern.is_empty() {
            return false;
        }
        match self {
            Self::Exact => header == pattern,
            Self::Contains => header.contains(pattern),
        }
    }
}

/// A field to extract from a table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "RawFieldSpec")]
pub struct FieldSpec {
    /// Header text identifying the column.
    pub name: String,
    /// Key used for this field in emitted records.
    pub key: String,
    /// Header matching policy.
    pub policy: MatchPolicy,
}

impl FieldSpec {
    /// Creates an exact-match field whose output key equals its header name.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            key: name.clone(),
            name,
            policy: MatchPolicy::Exact,
        }
    }

    /// Sets the output key.
    #[must_use]
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    /// Sets the header matching policy.
    #[must_use]
    pub fn with_policy(mut self, policy: MatchPolicy) -> Self {
        self.policy = policy;
        self
    }
}

impl From<&str> for FieldSpec {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// Accepts either `"Name"` or `{ name = "Name", key = "name", match = "contains" }`.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawFieldSpec {
    Name(String),
    Detailed {
        name: String,
        #[serde(default)]
        key: Option<String>,
        #[serde(default, rename = "match")]
        policy: MatchPolicy,
    },
}

impl From<RawFieldSpec> for FieldSpec {
    fn from(raw: RawFieldSpec) -> Self {
        match raw {
            RawFieldSpec::Name(name) => Self::new(name),
            RawFieldSpec::Detailed { name, key, policy } => Self {
                key: key.unwrap_or_else(|| name.clone()),
                name,
                policy,
            },
        }
    }
}

/// Attaches the normalized table name to every record under `key`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LabelSpec {
    /// Record key receiving the label.
    pub key: String,
    /// Trailing token removed from the table name before normalizing.
    #[serde(default = "default_label_suffix")]
    pub suffix: String,
}

impl LabelSpec {
    /// Creates a label spec with the default suffix.
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            suffix: default_label_suffix(),
        }
    }
}

/// Configuration for one batch entry (one table).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TableConfig {
    /// Table (sheet) name to open.
    pub table: String,
    /// Alternative names tried when `table` is not present.
    #[serde(default)]
    pub aliases: Vec<String>,
    /// Fields to resolve and extract, in output order.
    pub fields: Vec<FieldSpec>,
    /// Field names whose blankness drops a row. `None` means every field.
    #[serde(default)]
    pub mandatory: Option<Vec<String>>,
    /// Explicit 1-based header row; detected when absent.
    #[serde(default)]
    pub header_row: Option<usize>,
    /// Explicit 1-based last data row (inclusive); last populated row when absent.
    #[serde(default)]
    pub end_row: Option<usize>,
    /// Optional label derived from the table name.
    #[serde(default)]
    pub label: Option<LabelSpec>,
    /// Constant fields attached to every record.
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
}

impl TableConfig {
    /// Creates an entry where every field is mandatory and the header is detected.
    pub fn new<I, F>(table: impl Into<String>, fields: I) -> Self
    where
        I: IntoIterator<Item = F>,
        F: Into<FieldSpec>,
    {
        Self {
            table: table.into(),
            aliases: Vec::new(),
            fields: fields.into_iter().map(Into::into).collect(),
            mandatory: None,
            header_row: None,
            end_row: None,
            label: None,
            metadata: BTreeMap::new(),
        }
    }

    /// Restricts the mandatory fields to the given names.
    #[must_use]
    pub fn with_mandatory<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.mandatory = Some(names.into_iter().map(Into::into).collect());
        self
    }

    /// Sets the 1-based header row.
    #[must_use]
    pub fn with_header_row(mut self, row: usize) -> Self {
        self.header_row = Some(row);
        self
    }

    /// Sets the 1-based last data row.
    #[must_use]
    pub fn with_end_row(mut self, row: usize) -> Self {
        self.end_row = Some(row);
        self
    }

    /// Adds an alternative table name.
    #[must_use]
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    /// Attaches a label derived from the table name.
    #[must_use]
    pub fn with_label(mut self, label: LabelSpec) -> Self {
        self.label = Some(label);
        self
    }

    /// Adds a constant metadata field.
    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Returns true if a blank value for `field` drops the row.
    pub fn is_mandatory(&self, field: &FieldSpec) -> bool {
        match &self.mandatory {
            None => true,
            Some(names) => names.iter().any(|name| *name == field.name),
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let table = &self.table;
        if table.trim().is_empty() {
            return Err(ConfigError::invalid("table name must not be empty"));
        }
        if self.fields.is_empty() {
            return Err(ConfigError::invalid(format!(
                "table '{table}' declares no fields"
            )));
        }

        let mut keys = BTreeSet::new();
        let mut names = BTreeSet::new();
        for field in &self.fields {
            if normalize_text(&field.name).is_empty() {
                return Err(ConfigError::invalid(format!(
                    "table '{table}' has a field with an empty name"
                )));
            }
            if !names.insert(normalize_text(&field.name)) {
                return Err(ConfigError::invalid(format!(
                    "table '{table}' declares field '{}' twice",
                    field.name
                )));
            }
            if !keys.insert(field.key.as_str()) {
                return Err(ConfigError::invalid(format!(
                    "table '{table}' uses output key '{}' more than once",
                    field.key
                )));
            }
        }

        if let Some(label) = &self.label
            && !keys.insert(label.key.as_str())
        {
            return Err(ConfigError::invalid(format!(
                "table '{table}' label key '{}' collides with another key",
                label.key
            )));
        }
        for key in self.metadata.keys() {
            if !keys.insert(key.as_str()) {
                return Err(ConfigError::invalid(format!(
                    "table '{table}' metadata key '{key}' collides with another key"
                )));
            }
        }

        if let Some(mandatory) = &self.mandatory {
            for name in mandatory {
                if !self.fields.iter().any(|field| field.name == *name) {
                    return Err(ConfigError::invalid(format!(
                        "table '{table}' marks '{name}' mandatory but does not declare it as a field"
                    )));
                }
            }
        }

        if self.header_row == Some(0) || self.end_row == Some(0) {
            return Err(ConfigError::invalid(format!(
                "table '{table}' row numbers are 1-based"
            )));
        }
        if let (Some(header), Some(end)) = (self.header_row, self.end_row)
            && end < header
        {
            return Err(ConfigError::invalid(format!(
                "table '{table}' end_row {end} is before header_row {header}"
            )));
        }
        Ok(())
    }
}

/// A full extraction batch.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BatchConfig {
    /// Workbook to read (the CLI may override it).
    #[serde(default)]
    pub workbook: Option<PathBuf>,
    /// JSON output path (the CLI may override it).
    #[serde(default)]
    pub output: Option<PathBuf>,
    /// Leading rows searched when detecting a header row.
    #[serde(default = "default_header_scan_rows")]
    pub header_scan_rows: usize,
    /// Record keys to tally in the summary. Empty means metadata and label keys.
    #[serde(default)]
    pub summary_keys: Vec<String>,
    /// Entries, processed in order.
    pub tables: Vec<TableConfig>,
}

impl BatchConfig {
    /// Creates a batch with default settings.
    pub fn new(tables: Vec<TableConfig>) -> Self {
        Self {
            workbook: None,
            output: None,
            header_scan_rows: DEFAULT_HEADER_SCAN_ROWS,
            summary_keys: Vec::new(),
            tables,
        }
    }

    /// Parses a batch from TOML text without validating it.
    pub fn from_toml_str(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    /// Checks the configuration for mistakes that would make a run meaningless.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tables.is_empty() {
            return Err(ConfigError::invalid("no tables configured"));
        }
        if self.header_scan_rows == 0 {
            return Err(ConfigError::invalid("header_scan_rows must be at least 1"));
        }
        self.tables.iter().try_for_each(TableConfig::validate)
    }

    /// Keys tallied in the summary, in first-seen order.
    ///
    /// Uses `summary_keys` when set, otherwise every label key followed by
    /// every metadata key declared by any entry.
    pub fn effective_summary_keys(&self) -> Vec<String> {
        if !self.summary_keys.is_empty() {
            return self.summary_keys.clone();
        }
        let mut keys: Vec<String> = Vec::new();
        let candidates = self.tables.iter().flat_map(|table| {
            table
                .label
                .iter()
                .map(|label| label.key.clone())
                .chain(table.metadata.keys().cloned())
        });
        for key in candidates {
            if !keys.contains(&key) {
                keys.push(key);
            }
        }
        keys
    }

    /// Makes relative `workbook`/`output` paths relative to `base_dir`.
    pub fn resolve_paths(&mut self, base_dir: &Path) {
        for path in [&mut self.workbook, &mut self.output].into_iter().flatten() {
            if path.is_relative() {
                *path = base_dir.join(&*path);
            }
        }
    }
}

/// Loads, path-resolves, and validates a batch configuration file.
pub fn load_batch_config(path: &Path) -> Result<BatchConfig, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    let mut config = BatchConfig::from_toml_str(&contents).map_err(|e| ConfigError::Toml {
        path: path.to_path_buf(),
        source: e,
    })?;
    if let Some(base_dir) = path.parent() {
        config.resolve_paths(base_dir);
    }
    config.validate()?;
    Ok(config)
}
