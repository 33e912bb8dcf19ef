//! Main LookupEngine struct and public API.

use tracing::{debug, warn};

use crate::engine::{self, ImportSummary};
use crate::error::{LookupError, Result};
use crate::row::{RawRow, Row, RowUpdate};
use crate::schema::{Column, DataType, Table};
use crate::store::{Storage, Transaction};

/// Configuration for the lookup engine.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Largest batch accepted by [`LookupEngine::import_rows`] (None = unlimited).
    pub max_import_rows: Option<usize>,
    /// Sort order given to rows created without one.
    pub default_sort_order: i64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_import_rows: None,
            default_sort_order: 0,
        }
    }
}

impl EngineConfig {
    /// Create the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Limit the size of import batches.
    pub fn with_max_import_rows(mut self, max: usize) -> Self {
        self.max_import_rows = Some(max);
        self
    }

    /// Set the default sort order for new rows.
    pub fn with_default_sort_order(mut self, sort_order: i64) -> Self {
        self.default_sort_order = sort_order;
        self
    }
}

/// Entry point for the surrounding CRUD layer.
///
/// Each method runs in exactly one transaction: committed when the operation
/// succeeds, rolled back (dropped) when it fails.
pub struct LookupEngine<S: Storage> {
    storage: S,
    config: EngineConfig,
}

impl<S: Storage> LookupEngine<S> {
    /// Create an engine with default configuration.
    pub fn new(storage: S) -> Self {
        Self::with_config(storage, EngineConfig::default())
    }

    /// Create an engine with custom configuration.
    pub fn with_config(storage: S, config: EngineConfig) -> Self {
        Self { storage, config }
    }

    /// The underlying store.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// The active configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Consume the engine and return the store.
    pub fn into_storage(self) -> S {
        self.storage
    }

    fn write<T>(
        &self,
        operation: &'static str,
        f: impl FnOnce(&mut dyn Transaction) -> Result<T>,
    ) -> Result<T> {
        let mut tx = self.storage.begin()?;
        match f(&mut *tx) {
            Ok(value) => {
                tx.commit()?;
                Ok(value)
            }
            Err(e) => {
                if e.is_rejection() {
                    debug!(operation, error = %e, "transaction rolled back");
                } else {
                    warn!(operation, error = %e, "transaction rolled back");
                }
                Err(e)
            }
        }
    }

    fn read<T>(&self, f: impl FnOnce(&dyn Transaction) -> Result<T>) -> Result<T> {
        let tx = self.storage.begin()?;
        f(&*tx)
    }

    /// Create a table.
    pub fn create_table(&self, name: &str, description: Option<&str>) -> Result<Table> {
        self.write("create_table", |tx| engine::create_table(tx, name, description))
    }

    /// Add a column to a table.
    pub fn add_column(
        &self,
        table_id: &str,
        name: &str,
        data_type: DataType,
        sort_order: i64,
    ) -> Result<Column> {
        self.write("add_column", |tx| {
            engine::add_column(tx, table_id, name, data_type, sort_order)
        })
    }

    /// Rename a column.
    pub fn rename_column(&self, table_id: &str, column_id: &str, name: &str) -> Result<Column> {
        self.write("rename_column", |tx| {
            engine::rename_column(tx, table_id, column_id, name)
        })
    }

    /// Check whether a column could be deleted without merging rows.
    pub fn can_delete_column(&self, table_id: &str, column_id: &str) -> Result<()> {
        self.read(|tx| engine::can_delete_column(tx, table_id, column_id))
    }

    /// Delete a column, unless doing so would make two rows identical.
    pub fn delete_column(&self, table_id: &str, column_id: &str) -> Result<()> {
        self.write("delete_column", |tx| {
            engine::delete_column(tx, table_id, column_id)
        })
    }

    /// Create a single row.
    pub fn create_row(&self, table_id: &str, row: &RawRow) -> Result<Row> {
        let sort_order = self.config.default_sort_order;
        self.write("create_row", |tx| {
            engine::create_row(tx, table_id, row, sort_order)
        })
    }

    /// Update a single row.
    pub fn update_row(&self, table_id: &str, row_id: &str, update: &RowUpdate) -> Result<Row> {
        self.write("update_row", |tx| {
            engine::update_row(tx, table_id, row_id, update)
        })
    }

    /// Delete a single row.
    pub fn delete_row(&self, table_id: &str, row_id: &str) -> Result<()> {
        self.write("delete_row", |tx| engine::delete_row(tx, table_id, row_id))
    }

    /// Import many rows, skipping blanks and duplicates.
    pub fn import_rows(&self, table_id: &str, rows: &[RawRow]) -> Result<ImportSummary> {
        if let Some(max) = self.config.max_import_rows {
            if rows.len() > max {
                return Err(LookupError::Validation(format!(
                    "Import of {} rows exceeds the limit of {}",
                    rows.len(),
                    max
                )));
            }
        }

        let sort_order = self.config.default_sort_order;
        self.write("import_rows", |tx| {
            engine::import_rows(tx, table_id, rows, sort_order)
        })
    }

    /// All tables.
    pub fn list_tables(&self) -> Result<Vec<Table>> {
        self.read(|tx| tx.list_tables())
    }

    /// Look up a table.
    pub fn get_table(&self, table_id: &str) -> Result<Table> {
        self.read(|tx| {
            tx.get_table(table_id)?
                .ok_or_else(|| LookupError::table_not_found(table_id))
        })
    }

    /// Current columns of a table, in registry order.
    pub fn list_columns(&self, table_id: &str) -> Result<Vec<Column>> {
        self.read(|tx| {
            if tx.get_table(table_id)?.is_none() {
                return Err(LookupError::table_not_found(table_id));
            }
            tx.list_columns(table_id)
        })
    }

    /// Rows of a table, ordered by sort order.
    pub fn list_rows(&self, table_id: &str) -> Result<Vec<Row>> {
        self.read(|tx| {
            if tx.get_table(table_id)?.is_none() {
                return Err(LookupError::table_not_found(table_id));
            }
            let mut rows = tx.find_rows_by_table(table_id)?;
            rows.sort_by_key(|r| r.sort_order);
            Ok(rows)
        })
    }

    /// Look up a row of a table.
    pub fn get_row(&self, table_id: &str, row_id: &str) -> Result<Row> {
        self.read(|tx| {
            tx.get_row(row_id)?
                .filter(|r| r.table_id == table_id)
                .ok_or_else(|| LookupError::row_not_found(table_id, row_id))
        })
    }
}
