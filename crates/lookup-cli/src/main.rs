//! Lookup CLI - manage lookup tables with deduplicated, typed rows.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use lookup::{LookupEngine, MemoryStore};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// `RUST_LOG` wins; otherwise `--verbose` turns on debug output for this crate and the engine.
fn init_logging(verbose: bool) {
    let default = if verbose {
        "lookup=debug,lookup_cli=debug,warn"
    } else {
        "warn"
    };

    tracing_subscriber::fmt()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)))
        .init();
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let store = MemoryStore::load_or_default(&cli.store)?;
    let engine = LookupEngine::new(store);
    let mutates = cli.command.is_mutation();

    match cli.command {
        Commands::Table { command } => commands::table::run(&engine, command)?,
        Commands::Column { command } => commands::column::run(&engine, command)?,
        Commands::Row { command } => commands::row::run(&engine, command)?,
        Commands::Import {
            table,
            file,
            format,
            json,
        } => commands::import::run(&engine, &table, file, format, json)?,
        Commands::Show { table, json } => commands::show::run(&engine, &table, json)?,
    }

    // Only reached when the single engine call succeeded.
    if mutates {
        engine.storage().save(&cli.store)?;
        tracing::debug!(path = %cli.store.display(), "store saved");
    }

    Ok(())
}
