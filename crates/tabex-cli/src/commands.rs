use anyhow::{Context, Result, anyhow};
use comfy_table::{Cell, CellAlignment, Table};
use tracing::info_span;

use tabex_cli::pipeline::{self, ExtractOptions, ExtractRun};
use tabex_ingest::{TableSource, Workbook, resolve_table_name};

use crate::cli::{ExtractArgs, InspectArgs, SheetsArgs};
use crate::summary::{align_column, apply_table_style, dim_cell, header_cell};

pub fn run_extract(args: &ExtractArgs) -> Result<ExtractRun> {
    let options = ExtractOptions {
        config: args.config.clone(),
        workbook: args.workbook.clone(),
        output: args.output.clone(),
        dry_run: args.dry_run,
    };
    pipeline::run_extract(&options)
}

pub fn run_sheets(args: &SheetsArgs) -> Result<()> {
    let mut workbook = Workbook::open(&args.workbook)
        .with_context(|| format!("open workbook {}", args.workbook.display()))?;

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("#"),
        header_cell("Sheet"),
        header_cell("Rows"),
        header_cell("Columns"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Right);

    for (index, name) in workbook.table_names().into_iter().enumerate() {
        let sheet = workbook
            .load_table(&name)
            .with_context(|| format!("read sheet {name}"))?;
        let rows = sheet.last_populated_row().map_or(0, |row| row + 1);
        table.add_row(vec![
            Cell::new(index + 1),
            Cell::new(&name),
            Cell::new(rows),
            Cell::new(sheet.width()),
        ]);
    }
    println!("Workbook: {}", args.workbook.display());
    println!("{table}");
    Ok(())
}

pub fn run_inspect(args: &InspectArgs) -> Result<()> {
    let span = info_span!("inspect", sheet = %args.sheet);
    let _guard = span.enter();

    let mut workbook = Workbook::open(&args.workbook)
        .with_context(|| format!("open workbook {}", args.workbook.display()))?;
    let available = workbook.table_names();
    let name = resolve_table_name(&available, &args.sheet).ok_or_else(|| {
        anyhow!(
            "sheet '{}' not found; available: {}",
            args.sheet,
            available.join(", ")
        )
    })?;
    let sheet = workbook
        .load_table(name)
        .with_context(|| format!("read sheet {name}"))?;

    let shown: Vec<_> = sheet.rows().take(args.rows).collect();
    let width = shown.iter().map(|row| row.len()).max().unwrap_or(0);

    let mut table = Table::new();
    let mut header = vec![header_cell("Row")];
    header.extend((1..=width).map(|column| header_cell(&column.to_string())));
    table.set_header(header);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);

    for (index, row) in shown.iter().enumerate() {
        let mut cells = vec![dim_cell(index + 1)];
        cells.extend((0..width).map(|column| match row.get(column) {
            Some(cell) if !cell.is_blank() => Cell::new(cell.to_string()),
            _ => Cell::new(""),
        }));
        table.add_row(cells);
    }

    println!("Sheet: {name} ({} rows, {} columns)", sheet.height(), sheet.width());
    println!("{table}");
    Ok(())
}
