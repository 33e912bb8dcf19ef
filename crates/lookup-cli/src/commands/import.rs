//! Import command - bulk import rows from JSON or CSV/TSV.

use std::fs;
use std::path::{Path, PathBuf};

use colored::Colorize;
use lookup::{Column, LookupEngine, LookupError, RawRow, RawValue, RawValues, Storage};

use crate::cli::InputFormat;

use super::{key_by_column_id, resolve_table, CommandResult};

pub fn run<S: Storage>(
    engine: &LookupEngine<S>,
    table: &str,
    file: PathBuf,
    format: InputFormat,
    json_output: bool,
) -> CommandResult {
    if !file.exists() {
        return Err(format!("Import file not found: {}", file.display()).into());
    }

    let table = resolve_table(engine, table)?;
    let columns = engine.list_columns(&table.id)?;

    let rows = match detect_format(&file, format) {
        InputFormat::Json => read_json(&file, &columns, &table.id)?,
        InputFormat::Tsv => read_delimited(&file, b'\t', &columns, &table.id)?,
        _ => read_delimited(&file, b',', &columns, &table.id)?,
    };
    tracing::debug!(rows = rows.len(), file = %file.display(), "read import file");

    let summary = engine.import_rows(&table.id, &rows)?;

    if json_output {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!(
            "{} {} rows into {}",
            "Imported".cyan().bold(),
            rows.len().to_string().white().bold(),
            table.name.white()
        );
        println!("  Inserted:              {}", summary.inserted.to_string().green());
        println!("  Skipped (blank):       {}", summary.skipped_blank.to_string().yellow());
        println!(
            "  Skipped (in-file dup): {}",
            summary.skipped_duplicate_in_request.to_string().yellow()
        );
        println!("  Skipped (existing):    {}", summary.skipped_existing.to_string().yellow());
    }

    Ok(())
}

fn detect_format(file: &Path, format: InputFormat) -> InputFormat {
    match format {
        InputFormat::Auto => match file
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .as_deref()
        {
            Some("json") => InputFormat::Json,
            Some("tsv") | Some("tab") => InputFormat::Tsv,
            _ => InputFormat::Csv,
        },
        other => other,
    }
}

/// A JSON array of `{values, sortOrder?}` objects.
fn read_json(file: &Path, columns: &[Column], table_id: &str) -> lookup::Result<Vec<RawRow>> {
    let contents = fs::read_to_string(file).map_err(|e| LookupError::Io {
        path: file.to_path_buf(),
        source: e,
    })?;
    let rows: Vec<RawRow> = serde_json::from_str(&contents).map_err(|e| {
        LookupError::Validation(format!("Expected a JSON array of {{values, sortOrder}} rows: {}", e))
    })?;

    rows.into_iter()
        .map(|row| -> lookup::Result<RawRow> {
            Ok(RawRow {
                values: key_by_column_id(columns, table_id, row.values)?,
                sort_order: row.sort_order,
            })
        })
        .collect()
}

/// A delimited file whose header names the columns. Empty cells are left out.
fn read_delimited(
    file: &Path,
    delimiter: u8,
    columns: &[Column],
    table_id: &str,
) -> lookup::Result<Vec<RawRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .from_path(file)?;

    let headers: Vec<String> = reader.headers()?.iter().map(|h| h.trim().to_string()).collect();
    if headers.is_empty() {
        return Err(LookupError::Validation("Import file has no header row".to_string()));
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let values: RawValues = headers
            .iter()
            .zip(record.iter())
            .filter(|(_, cell)| !cell.is_empty())
            .map(|(header, cell)| (header.clone(), RawValue::from(cell)))
            .collect();
        rows.push(RawRow {
            values: key_by_column_id(columns, table_id, values)?,
            sort_order: None,
        });
    }

    Ok(rows)
}
