//! Table command - create and list tables.

use colored::Colorize;
use lookup::{LookupEngine, Storage};

use crate::cli::TableCommand;

use super::CommandResult;

pub fn run<S: Storage>(engine: &LookupEngine<S>, command: TableCommand) -> CommandResult {
    match command {
        TableCommand::Create { name, description } => {
            let table = engine.create_table(&name, description.as_deref())?;
            println!(
                "{} table {} ({})",
                "Created".green().bold(),
                table.name.white().bold(),
                table.id.dimmed()
            );
        }
        TableCommand::List => {
            let tables = engine.list_tables()?;
            if tables.is_empty() {
                println!("No tables yet. Create one with {}.", "lookup table create <NAME>".cyan());
                return Ok(());
            }
            for table in tables {
                let rows = engine.list_rows(&table.id)?.len();
                let columns = engine.list_columns(&table.id)?.len();
                println!(
                    "{}  {}  {} columns, {} rows{}",
                    table.id.dimmed(),
                    table.name.white().bold(),
                    columns,
                    rows,
                    table
                        .description
                        .map(|d| format!("  - {}", d))
                        .unwrap_or_default()
                );
            }
        }
    }
    Ok(())
}
