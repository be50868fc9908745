//! JSON serialization of extracted records.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use tabex_model::Record;

use crate::error::{ExtractError, Result};

/// Renders records as a pretty-printed JSON array (two-space indent,
/// non-ASCII characters kept as-is).
pub fn records_to_json(records: &[Record]) -> Result<String> {
    Ok(serde_json::to_string_pretty(records)?)
}

/// Writes records as a pretty-printed JSON array to `path`.
///
/// Missing parent directories are created. The file is flushed before
/// returning so that write errors surface here rather than on drop.
pub fn write_records_json(path: &Path, records: &[Record]) -> Result<()> {
    let output_error = |source: std::io::Error| ExtractError::Output {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(output_error)?;
    }
    let file = File::create(path).map_err(output_error)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, records)
        .map_err(|e| output_error(e.into()))?;
    writer.write_all(b"\n").map_err(output_error)?;
    writer.flush().map_err(output_error)?;

    tracing::info!(path = %path.display(), records = records.len(), "wrote records");
    Ok(())
}
