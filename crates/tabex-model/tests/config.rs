//! Tests for loading batch configuration files.

use std::io::Write;

use tabex_model::{ConfigError, MatchPolicy, load_batch_config};
use tempfile::TempDir;

fn write_config(dir: &TempDir, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join("batch.toml");
    let mut file = std::fs::File::create(&path).unwrap();
    write!(file, "{contents}").unwrap();
    path
}

#[test]
fn loads_and_resolves_relative_paths() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        r#"
workbook = "whatsapp_workbook.xlsx"
output = "whatsapp_groups.json"
header_scan_rows = 10

[[tables]]
table = "Sakti Team"
aliases = ["Shakti Team"]
fields = ["Assembly", "Group Name", "Group Link", "Group Members", "Admin"]
mandatory = []
metadata = { form_type = "shakti" }
"#,
    );

    let config = load_batch_config(&path).expect("load config");
    assert_eq!(
        config.workbook.as_deref(),
        Some(dir.path().join("whatsapp_workbook.xlsx").as_path())
    );
    assert_eq!(
        config.output.as_deref(),
        Some(dir.path().join("whatsapp_groups.json").as_path())
    );
    assert_eq!(config.header_scan_rows, 10);

    let entry = &config.tables[0];
    assert_eq!(entry.aliases, vec!["Shakti Team"]);
    assert_eq!(entry.fields.len(), 5);
    assert!(entry.fields.iter().all(|f| f.policy == MatchPolicy::Exact));
    assert!(entry.fields.iter().all(|f| !entry.is_mandatory(f)));
}

#[test]
fn missing_file_is_io_error() {
    let dir = TempDir::new().unwrap();
    let result = load_batch_config(&dir.path().join("nope.toml"));
    assert!(matches!(result, Err(ConfigError::Io { .. })));
}

#[test]
fn malformed_toml_is_parse_error() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "[[tables]\ntable = ");
    let result = load_batch_config(&path);
    assert!(matches!(result, Err(ConfigError::Toml { .. })));
}

#[test]
fn invalid_config_is_rejected_after_parse() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        r#"
[[tables]]
table = "WTM"
fields = []
"#,
    );
    let err = load_batch_config(&path).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid { .. }));
    assert!(err.to_string().contains("declares no fields"));
}

#[test]
fn demo_batches_load() {
    let demos = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("../../demos");
    for (file, tables) in [
        ("assembly_contacts.toml", 16),
        ("call_center_purposes.toml", 5),
        ("slp_identification.toml", 3),
        ("whatsapp_groups.toml", 3),
    ] {
        let config = load_batch_config(&demos.join(file))
            .unwrap_or_else(|e| panic!("{file}: {e}"));
        assert_eq!(config.tables.len(), tables, "{file}");
        assert!(config.workbook.is_some(), "{file}");
    }

    let contacts = load_batch_config(&demos.join("assembly_contacts.toml")).unwrap();
    let rosera = &contacts.tables[14];
    assert_eq!(rosera.table, "ROSERA AC");
    assert_eq!(rosera.fields[1].policy, MatchPolicy::Contains);
    assert_eq!(contacts.effective_summary_keys(), vec!["assembly"]);
}

#[test]
fn demo_slp_batch_tags_sheet_source() {
    let demos = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("../../demos");
    let config = load_batch_config(&demos.join("slp_identification.toml")).unwrap();

    let tags: Vec<(&str, &str)> = config
        .tables
        .iter()
        .map(|table| (table.table.as_str(), table.metadata["sheet_source"].as_str()))
        .collect();
    assert_eq!(
        tags,
        vec![
            ("OLD APPLICANT", "old_applicant"),
            ("SLP APPICANT", "slp_applicant"),
            ("SLP MISSED CALL", "slp_missed_call"),
        ]
    );
}
