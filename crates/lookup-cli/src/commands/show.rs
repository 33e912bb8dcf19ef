//! Show command - print a table's columns and rows.

use colored::Colorize;
use lookup::{CellValue, LookupEngine, Storage};

use super::{resolve_table, CommandResult};

pub fn run<S: Storage>(engine: &LookupEngine<S>, table: &str, json_output: bool) -> CommandResult {
    let table = resolve_table(engine, table)?;
    let columns = engine.list_columns(&table.id)?;
    let rows = engine.list_rows(&table.id)?;

    if json_output {
        let output = serde_json::json!({
            "table": table,
            "columns": columns,
            "rows": rows,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!(
        "{} {} ({})",
        "Table".cyan().bold(),
        table.name.white().bold(),
        table.id.dimmed()
    );
    if let Some(description) = &table.description {
        println!("{}", description);
    }
    println!();

    println!("{}", "Columns:".yellow().bold());
    if columns.is_empty() {
        println!("  (none)");
    }
    for column in &columns {
        println!(
            "  {}  {} {}",
            column.id.dimmed(),
            column.name.white(),
            format!("[{}]", column.data_type).blue()
        );
    }
    println!();

    println!("{} {}", "Rows:".yellow().bold(), rows.len());
    for row in &rows {
        let cells: Vec<String> = columns
            .iter()
            .map(|c| match row.values.get(&c.id) {
                Some(CellValue::String(s)) => format!("{}={:?}", c.name, s),
                Some(CellValue::Null) | None => format!("{}={}", c.name, "null".dimmed()),
                Some(value) => format!("{}={}", c.name, value),
            })
            .collect();
        println!("  {}  {}", row.id.dimmed(), cells.join(", "));
    }

    Ok(())
}
