//! Integration tests for batch extraction over in-memory workbooks.

use tabex_extract::{ExtractError, records_to_json, run_batch};
use tabex_ingest::MemoryWorkbook;
use tabex_model::{BatchConfig, Cell, FieldSpec, LabelSpec, MatchPolicy, Table, TableConfig};

fn text(value: &str) -> Cell {
    if value.is_empty() {
        Cell::Empty
    } else {
        Cell::text(value)
    }
}

fn purposes_sheet(name: &str, rows: Vec<Vec<Cell>>) -> Table {
    let mut all = vec![vec![text("Name"), text("Mobile Number"), text("Assembly")]];
    all.extend(rows);
    Table::new(name, all)
}

fn purposes_entry(sheet: &str, form_type: &str) -> TableConfig {
    TableConfig::new(
        sheet,
        [
            FieldSpec::new("Name"),
            FieldSpec::new("Mobile Number"),
            FieldSpec::new("Assembly").with_key("assembly"),
        ],
    )
    .with_header_row(1)
    .with_metadata("form_type", form_type)
}

fn purposes_workbook() -> MemoryWorkbook {
    MemoryWorkbook::new()
        .with_table(purposes_sheet(
            "WTM",
            vec![
                vec![text("Asha Devi"), Cell::Float(9876543210.0), text("Rosera")],
                vec![text(""), Cell::Float(9876543210.0), text("Rosera")],
                vec![text(" Sunil "), Cell::Int(9000000001), text("Paro ")],
            ],
        ))
        .with_table(purposes_sheet(
            "PRND",
            vec![vec![text("Meena"), text("9000000002"), text("Rosera")]],
        ))
}

#[test]
fn extracts_the_documented_record() {
    let mut workbook = purposes_workbook();
    let config = BatchConfig::new(vec![purposes_entry("WTM", "wtm")]);

    let outcome = run_batch(&mut workbook, &config);
    let first = serde_json::to_value(&outcome.records[0]).unwrap();

    assert_eq!(
        first,
        serde_json::json!({
            "Name": "Asha Devi",
            "Mobile Number": "9876543210",
            "assembly": "Rosera",
            "form_type": "wtm"
        })
    );
}

#[test]
fn row_missing_mandatory_field_is_counted_not_emitted() {
    let mut workbook = purposes_workbook();
    let config = BatchConfig::new(vec![purposes_entry("WTM", "wtm")]);

    let outcome = run_batch(&mut workbook, &config);
    let wtm = &outcome.summary.tables[0];

    assert_eq!(wtm.records, 2);
    assert_eq!(wtm.skipped, 1);
    assert!(outcome.records.iter().all(|r| r.get("Name").is_some()));
    assert_eq!(outcome.records[1].get("assembly"), Some("Paro"));
}

#[test]
fn missing_table_does_not_stop_the_batch() {
    let mut workbook = purposes_workbook();
    let config = BatchConfig::new(vec![
        purposes_entry("WTM", "wtm"),
        purposes_entry("DONOR", "donor"),
        purposes_entry("PRND", "prnd"),
    ]);

    let outcome = run_batch(&mut workbook, &config);
    let summary = &outcome.summary;

    assert!(summary.has_errors());
    assert_eq!(summary.tables.len(), 3);
    assert_eq!(summary.total_records(), 3);
    assert_eq!(outcome.records.len(), 3);

    let donor = &summary.tables[1];
    assert_eq!(donor.table, "DONOR");
    assert_eq!(donor.records, 0);
    match &donor.error {
        Some(ExtractError::TableNotFound { table, available }) => {
            assert_eq!(table, "DONOR");
            assert_eq!(available, &vec!["WTM".to_string(), "PRND".to_string()]);
        }
        other => panic!("expected TableNotFound, got {other:?}"),
    }

    let failures: Vec<&str> = summary.failures().map(|t| t.table.as_str()).collect();
    assert_eq!(failures, vec!["DONOR"]);
}

#[test]
fn summary_counts_by_metadata_and_label() {
    let mut workbook = purposes_workbook();
    let config = BatchConfig::new(vec![
        purposes_entry("WTM", "wtm"),
        purposes_entry("PRND", "prnd"),
    ]);

    let outcome = run_batch(&mut workbook, &config);
    let form_types = outcome.summary.counts_for("form_type").unwrap();

    assert_eq!(form_types["wtm"], 2);
    assert_eq!(form_types["prnd"], 1);
    assert!(outcome.summary.counts_for("assembly").is_none());

    let mut config = config;
    config.summary_keys = vec!["assembly".to_string()];
    let outcome = run_batch(&mut workbook, &config);
    assert_eq!(
        outcome.summary.top_values("assembly", 5),
        vec![("Rosera", 2), ("Paro", 1)]
    );
}

#[test]
fn header_detection_is_column_order_independent() {
    let table = Table::new(
        "Shakti Team",
        vec![
            vec![text("Shakti Team WhatsApp Groups")],
            vec![],
            vec![
                text("Admin"),
                text("group link"),
                text("Assembly"),
                text("GROUP  NAME"),
                text("Group Members"),
            ],
            vec![
                text("Rekha"),
                text("https://chat.example/x"),
                text("Rosera"),
                text("Shakti Rosera"),
                Cell::Float(212.0),
            ],
        ],
    );
    let mut workbook = MemoryWorkbook::new().with_table(table);
    let config = BatchConfig::new(vec![
        TableConfig::new(
            "Sakti Team",
            ["Assembly", "Group Name", "Group Link", "Group Members", "Admin"],
        )
        .with_alias("Shakti Team")
        .with_mandatory(Vec::<String>::new())
        .with_metadata("form_type", "shakti"),
    ]);

    let outcome = run_batch(&mut workbook, &config);
    assert!(!outcome.summary.has_errors());
    assert_eq!(outcome.summary.tables[0].header_row, Some(3));

    let record = serde_json::to_value(&outcome.records[0]).unwrap();
    assert_eq!(
        record,
        serde_json::json!({
            "Assembly": "Rosera",
            "Group Name": "Shakti Rosera",
            "Group Link": "https://chat.example/x",
            "Group Members": "212",
            "Admin": "Rekha",
            "form_type": "shakti"
        })
    );
}

#[test]
fn header_not_found_is_reported_per_table() {
    let mut workbook = MemoryWorkbook::new()
        .with_table(Table::new("public", vec![vec![text("Assembly")]]))
        .with_table(purposes_sheet("WTM", Vec::new()));
    let config = BatchConfig::new(vec![
        TableConfig::new("public", ["Assembly", "Group Name"]),
        TableConfig::new("WTM", ["Name"]),
    ]);

    let outcome = run_batch(&mut workbook, &config);
    assert!(matches!(
        &outcome.summary.tables[0].error,
        Some(ExtractError::HeaderNotFound { missing, .. }) if missing == &vec!["Group Name".to_string()]
    ));
    assert!(outcome.summary.tables[1].error.is_none());
}

#[test]
fn label_is_derived_from_sheet_name() {
    let table = Table::new(
        "LAKHISARAI AC",
        vec![
            vec![text("LAKHISARAI ASSEMBLY - MEMBER LIST")],
            vec![text("S.No"), text("Name of Member"), text("Mobile No.")],
            vec![Cell::Int(1), text("Asha Devi"), Cell::Float(9876543210.0)],
            vec![Cell::Int(2), text(""), text("")],
            vec![Cell::Int(3), text("Ravi"), Cell::Float(9123456789.0)],
        ],
    );
    let mut workbook = MemoryWorkbook::new().with_table(table);
    let config = BatchConfig::new(vec![
        TableConfig::new(
            "LAKHISARAI AC",
            [
                FieldSpec::new("name")
                    .with_key("name")
                    .with_policy(MatchPolicy::Contains),
                FieldSpec::new("mobile")
                    .with_key("mobile_number")
                    .with_policy(MatchPolicy::Contains),
            ],
        )
        .with_header_row(2)
        .with_end_row(4)
        .with_label(LabelSpec::new("assembly")),
    ]);

    let outcome = run_batch(&mut workbook, &config);
    let json = serde_json::to_value(&outcome.records).unwrap();

    assert_eq!(
        json,
        serde_json::json!([
            { "name": "Asha Devi", "mobile_number": "9876543210", "assembly": "Lakhisarai" }
        ])
    );
    // Row 4 has only a serial number; neither declared field is present.
    assert_eq!(outcome.summary.tables[0].blank_rows, 1);
    assert_eq!(outcome.summary.counts_for("assembly").unwrap()["Lakhisarai"], 1);
}

#[test]
fn rerunning_the_batch_is_byte_identical() {
    let config = BatchConfig::new(vec![
        purposes_entry("WTM", "wtm"),
        purposes_entry("PRND", "prnd"),
    ]);

    let first = run_batch(&mut purposes_workbook(), &config);
    let second = run_batch(&mut purposes_workbook(), &config);

    assert_eq!(
        records_to_json(&first.records).unwrap(),
        records_to_json(&second.records).unwrap()
    );
}
