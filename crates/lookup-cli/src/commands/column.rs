//! Column command - add, rename, check and delete columns.

use colored::Colorize;
use lookup::{LookupEngine, LookupError, Storage};

use crate::cli::ColumnCommand;

use super::{resolve_column, resolve_table, CommandResult};

pub fn run<S: Storage>(engine: &LookupEngine<S>, command: ColumnCommand) -> CommandResult {
    match command {
        ColumnCommand::Add {
            table,
            name,
            data_type,
            sort_order,
        } => {
            let table = resolve_table(engine, &table)?;
            let column = engine.add_column(&table.id, &name, data_type, sort_order)?;
            println!(
                "{} column {} ({}, {}) to {}",
                "Added".green().bold(),
                column.name.white().bold(),
                column.data_type,
                column.id.dimmed(),
                table.name
            );
        }
        ColumnCommand::Rename {
            table,
            column,
            new_name,
        } => {
            let table = resolve_table(engine, &table)?;
            let columns = engine.list_columns(&table.id)?;
            let column = resolve_column(&columns, &table.id, &column)?;
            let renamed = engine.rename_column(&table.id, &column.id, &new_name)?;
            println!(
                "{} {} to {}",
                "Renamed".green().bold(),
                column.name,
                renamed.name.white().bold()
            );
        }
        ColumnCommand::Delete { table, column } => {
            let table = resolve_table(engine, &table)?;
            let columns = engine.list_columns(&table.id)?;
            let column = resolve_column(&columns, &table.id, &column)?;
            engine.delete_column(&table.id, &column.id)?;
            println!(
                "{} column {} from {}",
                "Deleted".green().bold(),
                column.name.white().bold(),
                table.name
            );
        }
        ColumnCommand::Check { table, column } => {
            let table = resolve_table(engine, &table)?;
            let columns = engine.list_columns(&table.id)?;
            let column = resolve_column(&columns, &table.id, &column)?;
            match engine.can_delete_column(&table.id, &column.id) {
                Ok(()) => println!(
                    "{} column {} can be deleted",
                    "OK".green().bold(),
                    column.name.white().bold()
                ),
                Err(LookupError::DeleteConflict {
                    first_row_id,
                    second_row_id,
                    ..
                }) => println!(
                    "{} deleting {} would make rows {} and {} identical",
                    "Blocked:".red().bold(),
                    column.name.white().bold(),
                    first_row_id.cyan(),
                    second_row_id.cyan()
                ),
                Err(e) => return Err(e.into()),
            }
        }
    }
    Ok(())
}
