//! CLI argument definitions using clap.

use clap::{Parser, Subcommand};
use lookup::DataType;
use std::path::PathBuf;

/// Lookup: manage lookup tables with deduplicated, typed rows
#[derive(Parser)]
#[command(name = "lookup")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to the store file
    #[arg(short, long, global = true, env = "LOOKUP_STORE", default_value = "lookup.json")]
    pub store: PathBuf,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create or list tables
    Table {
        #[command(subcommand)]
        command: TableCommand,
    },

    /// Add, rename or delete columns
    Column {
        #[command(subcommand)]
        command: ColumnCommand,
    },

    /// Create, update or delete single rows
    Row {
        #[command(subcommand)]
        command: RowCommand,
    },

    /// Import rows from a JSON or CSV/TSV file, skipping blanks and duplicates
    Import {
        /// Table id or name
        table: String,

        /// Path to the file (.json, .csv or .tsv)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Input format
        #[arg(short, long, default_value = "auto")]
        format: InputFormat,

        /// Output the summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the columns and rows of a table
    Show {
        /// Table id or name
        table: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

impl Commands {
    /// Whether the command changes the store.
    pub fn is_mutation(&self) -> bool {
        match self {
            Commands::Table { command } => matches!(command, TableCommand::Create { .. }),
            Commands::Column { command } => !matches!(command, ColumnCommand::Check { .. }),
            Commands::Row { .. } | Commands::Import { .. } => true,
            Commands::Show { .. } => false,
        }
    }
}

#[derive(Subcommand)]
pub enum TableCommand {
    /// Create a table
    Create {
        /// Table name
        name: String,

        /// Table description
        #[arg(short, long)]
        description: Option<String>,
    },

    /// List all tables
    List,
}

#[derive(Subcommand)]
pub enum ColumnCommand {
    /// Add a column; existing rows get null for it
    Add {
        /// Table id or name
        table: String,

        /// Column name
        name: String,

        /// Data type (string, number, boolean, datetime)
        #[arg(short = 't', long = "type", default_value = "string")]
        data_type: DataType,

        /// Position among the table's columns
        #[arg(long, default_value = "0")]
        sort_order: i64,
    },

    /// Rename a column (row hashes are unaffected)
    Rename {
        /// Table id or name
        table: String,

        /// Column id or name
        column: String,

        /// New column name
        new_name: String,
    },

    /// Delete a column, unless that would make two rows identical
    Delete {
        /// Table id or name
        table: String,

        /// Column id or name
        column: String,
    },

    /// Check whether a column could be deleted, without deleting it
    Check {
        /// Table id or name
        table: String,

        /// Column id or name
        column: String,
    },
}

#[derive(Subcommand)]
pub enum RowCommand {
    /// Create a row from a JSON object of column (id or name) to value
    Add {
        /// Table id or name
        table: String,

        /// Row values, e.g. '{"Name": "bolt", "Qty": 10}'
        values: String,

        /// Sort order of the row
        #[arg(long)]
        sort_order: Option<i64>,
    },

    /// Update a row; omitted --values keeps the stored values
    Update {
        /// Table id or name
        table: String,

        /// Row id
        row: String,

        /// New row values, replacing all existing values
        #[arg(long)]
        values: Option<String>,

        /// New sort order
        #[arg(long)]
        sort_order: Option<i64>,
    },

    /// Delete a row
    Delete {
        /// Table id or name
        table: String,

        /// Row id
        row: String,
    },
}

#[derive(Clone, Debug, Default)]
pub enum InputFormat {
    /// Detect from the file extension
    #[default]
    Auto,
    Json,
    Csv,
    Tsv,
}

impl std::str::FromStr for InputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(InputFormat::Auto),
            "json" => Ok(InputFormat::Json),
            "csv" => Ok(InputFormat::Csv),
            "tsv" => Ok(InputFormat::Tsv),
            _ => Err(format!("Unknown format: {}. Use auto, json, csv, or tsv.", s)),
        }
    }
}

impl std::fmt::Display for InputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InputFormat::Auto => write!(f, "auto"),
            InputFormat::Json => write!(f, "json"),
            InputFormat::Csv => write!(f, "csv"),
            InputFormat::Tsv => write!(f, "tsv"),
        }
    }
}
