use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{
    Attribute, Cell, CellAlignment, Color, ColumnConstraint, ContentArrangement, Table, Width,
};

use tabex_cli::logging::log_data_enabled;
use tabex_cli::pipeline::{ExtractRun, sample_records};
use tabex_extract::{BatchSummary, ExtractError, TableSummary};

/// Values listed per summary key before the remainder is folded into one row.
const TOP_VALUES: usize = 5;

pub fn print_summary(run: &ExtractRun, sample: usize) {
    let summary = &run.outcome.summary;
    println!("Workbook: {}", run.workbook.display());
    match (&run.output, run.written) {
        (Some(path), true) => println!("Output: {}", path.display()),
        (Some(path), false) => println!("Output: {} (dry run, not written)", path.display()),
        (None, _) => println!("Output: (dry run, not written)"),
    }

    print_table_summary(summary);
    print_counts(summary);
    if sample > 0 {
        print_samples(run, sample);
    }

    let failures: Vec<&TableSummary> = summary.failures().collect();
    if !failures.is_empty() {
        eprintln!("Errors:");
        for failed in failures {
            if let Some(error) = &failed.error {
                eprintln!("- {}: {error}", failed.table);
            }
        }
    }
}

fn print_table_summary(summary: &BatchSummary) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Table"),
        header_cell("Sheet"),
        header_cell("Header"),
        header_cell("Records"),
        header_cell("Skipped"),
        header_cell("Blank"),
        header_cell("Status"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Right);
    align_column(&mut table, 4, CellAlignment::Right);
    align_column(&mut table, 5, CellAlignment::Right);

    let mut total_blank = 0usize;
    for entry in &summary.tables {
        total_blank += entry.blank_rows;
        table.add_row(vec![
            table_cell(&entry.table),
            entry
                .resolved
                .as_deref()
                .map_or_else(|| dim_cell("-"), Cell::new),
            entry.header_row.map_or_else(|| dim_cell("-"), Cell::new),
            Cell::new(entry.records),
            count_cell(Some(entry.skipped), Color::Yellow),
            dim_cell(entry.blank_rows),
            status_cell(entry),
        ]);
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        dim_cell("-"),
        dim_cell("-"),
        Cell::new(summary.total_records()).add_attribute(Attribute::Bold),
        count_cell(Some(summary.total_skipped()), Color::Yellow).add_attribute(Attribute::Bold),
        dim_cell(total_blank),
        count_cell(Some(summary.failures().count()), Color::Red).add_attribute(Attribute::Bold),
    ]);
    println!("{table}");
}

fn print_counts(summary: &BatchSummary) {
    for (key, values) in &summary.counts {
        let mut table = Table::new();
        table.set_header(vec![header_cell(key), header_cell("Records")]);
        apply_table_style(&mut table);
        align_column(&mut table, 1, CellAlignment::Right);

        let top = summary.top_values(key, TOP_VALUES);
        let shown: usize = top.iter().map(|(_, count)| count).sum();
        for (value, count) in &top {
            table.add_row(vec![Cell::new(value), Cell::new(count)]);
        }
        let rest = values.len().saturating_sub(top.len());
        if rest > 0 {
            let remaining: usize = values.values().sum::<usize>() - shown;
            table.add_row(vec![
                dim_cell(format!("({rest} more)")),
                dim_cell(remaining),
            ]);
        }
        println!();
        println!("Records by {key}:");
        println!("{table}");
    }
}

fn print_samples(run: &ExtractRun, sample: usize) {
    let samples = sample_records(&run.outcome.records, sample, log_data_enabled());
    if samples.is_empty() {
        return;
    }
    println!();
    println!("Sample records ({} of {}):", samples.len(), run.outcome.records.len());
    match serde_json::to_string_pretty(&samples) {
        Ok(json) => println!("{json}"),
        Err(error) => eprintln!("error: cannot render sample records: {error}"),
    }
}

fn status_cell(entry: &TableSummary) -> Cell {
    if let Some(error) = &entry.error {
        return Cell::new(error_label(error)).fg(Color::Red);
    }
    if !entry.missing_columns.is_empty() {
        return Cell::new(format!("missing: {}", entry.missing_columns.join(", ")))
            .fg(Color::Yellow);
    }
    Cell::new("ok").fg(Color::Green)
}

fn error_label(error: &ExtractError) -> &'static str {
    match error {
        ExtractError::TableNotFound { .. } => "table not found",
        ExtractError::HeaderNotFound { .. } => "header not found",
        ExtractError::InvalidRowRange { .. } => "invalid row range",
        ExtractError::TableLoad { .. } => "read failed",
        ExtractError::Output { .. } | ExtractError::Serialize(_) => "output failed",
    }
}

fn table_cell(name: &str) -> Cell {
    Cell::new(name)
        .fg(Color::Blue)
        .add_attribute(Attribute::Bold)
}

fn count_cell(count: Option<usize>, color: Color) -> Cell {
    match count {
        Some(value) if value > 0 => Cell::new(value).fg(color).add_attribute(Attribute::Bold),
        Some(value) => dim_cell(value),
        None => dim_cell("-"),
    }
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(140);
    if table.column_count() >= 7 {
        table.set_constraints(vec![
            ColumnConstraint::UpperBoundary(Width::Percentage(25)),
            ColumnConstraint::UpperBoundary(Width::Percentage(25)),
            ColumnConstraint::LowerBoundary(Width::Fixed(6)),
            ColumnConstraint::LowerBoundary(Width::Fixed(7)),
            ColumnConstraint::LowerBoundary(Width::Fixed(7)),
            ColumnConstraint::LowerBoundary(Width::Fixed(5)),
            ColumnConstraint::UpperBoundary(Width::Percentage(35)),
        ]);
    }
}

pub fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

pub fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

pub fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
