//! Row command - create, update and delete single rows.

use colored::Colorize;
use lookup::{LookupEngine, RawRow, RowUpdate, Storage};

use crate::cli::RowCommand;

use super::{key_by_column_id, parse_values, resolve_table, CommandResult};

pub fn run<S: Storage>(engine: &LookupEngine<S>, command: RowCommand) -> CommandResult {
    match command {
        RowCommand::Add {
            table,
            values,
            sort_order,
        } => {
            let table = resolve_table(engine, &table)?;
            let columns = engine.list_columns(&table.id)?;
            let raw = RawRow {
                values: key_by_column_id(&columns, &table.id, parse_values(&values)?)?,
                sort_order,
            };
            let row = engine.create_row(&table.id, &raw)?;
            println!(
                "{} row {} ({})",
                "Created".green().bold(),
                row.id.white().bold(),
                short_hash(&row.row_hash).dimmed()
            );
        }
        RowCommand::Update {
            table,
            row,
            values,
            sort_order,
        } => {
            let table = resolve_table(engine, &table)?;
            let columns = engine.list_columns(&table.id)?;
            let values = match values {
                Some(json) => Some(key_by_column_id(&columns, &table.id, parse_values(&json)?)?),
                None => None,
            };
            let updated = engine.update_row(&table.id, &row, &RowUpdate { values, sort_order })?;
            println!(
                "{} row {} ({})",
                "Updated".green().bold(),
                updated.id.white().bold(),
                short_hash(&updated.row_hash).dimmed()
            );
        }
        RowCommand::Delete { table, row } => {
            let table = resolve_table(engine, &table)?;
            engine.delete_row(&table.id, &row)?;
            println!("{} row {}", "Deleted".green().bold(), row.white().bold());
        }
    }
    Ok(())
}

fn short_hash(hash: &str) -> &str {
    hash.get(..12).unwrap_or(hash)
}
