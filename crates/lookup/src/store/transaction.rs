//! Storage and transaction traits.

use std::collections::HashSet;

use crate::error::Result;
use crate::row::{CanonicalRow, Row, RowPatch};
use crate::schema::{Column, DataType, Table};

/// What to do when an insert hits the (table, row hash) uniqueness constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnConflict {
    /// Skip the conflicting row and keep going.
    Ignore,
    /// Fail the whole insert with [`LookupError::StorageConflict`](crate::LookupError::StorageConflict).
    Error,
}

/// A row ready to be written: canonical values, hash and sort order.
#[derive(Debug, Clone, PartialEq)]
pub struct NewRow {
    pub canonical: CanonicalRow,
    pub sort_order: i64,
}

impl NewRow {
    /// Create a new row from its canonical form.
    pub fn new(canonical: CanonicalRow, sort_order: i64) -> Self {
        Self {
            canonical,
            sort_order,
        }
    }
}

/// One unit of work against the store.
///
/// Reads observe the transaction's own writes. Nothing becomes visible to
/// other transactions until [`commit`](Transaction::commit); dropping an
/// uncommitted transaction discards all of its writes.
pub trait Transaction {
    /// Look up a table.
    fn get_table(&self, table_id: &str) -> Result<Option<Table>>;

    /// All tables, in creation order.
    fn list_tables(&self) -> Result<Vec<Table>>;

    /// Create a table.
    fn insert_table(&mut self, name: &str, description: Option<&str>) -> Result<Table>;

    /// Columns of a table, ordered by sort order, then creation time, then name.
    fn list_columns(&self, table_id: &str) -> Result<Vec<Column>>;

    /// Look up a column of a table.
    fn get_column(&self, table_id: &str, column_id: &str) -> Result<Option<Column>>;

    /// Add a column to a table.
    fn insert_column(
        &mut self,
        table_id: &str,
        name: &str,
        data_type: DataType,
        sort_order: i64,
    ) -> Result<Column>;

    /// Change the display name of a column.
    fn rename_column(&mut self, table_id: &str, column_id: &str, name: &str) -> Result<Column>;

    /// Structurally remove a column. Row values are left untouched.
    fn remove_column(&mut self, table_id: &str, column_id: &str) -> Result<()>;

    /// All rows of a table, in insertion order.
    fn find_rows_by_table(&self, table_id: &str) -> Result<Vec<Row>>;

    /// The subset of `hashes` already used by rows of the table.
    fn find_row_hashes(&self, table_id: &str, hashes: &HashSet<String>) -> Result<HashSet<String>>;

    /// Insert rows, enforcing the (table, row hash) uniqueness constraint.
    ///
    /// Returns the rows actually written.
    fn insert_rows(
        &mut self,
        table_id: &str,
        rows: Vec<NewRow>,
        on_conflict: OnConflict,
    ) -> Result<Vec<Row>>;

    /// Look up a row by id.
    fn get_row(&self, row_id: &str) -> Result<Option<Row>>;

    /// Overwrite a row's values, hash and sort order.
    fn update_row(&mut self, row_id: &str, patch: RowPatch) -> Result<Row>;

    /// Delete a row.
    fn delete_row(&mut self, row_id: &str) -> Result<()>;

    /// Make every write of this transaction visible atomically.
    fn commit(self: Box<Self>) -> Result<()>;
}

/// A store that hands out transactions.
pub trait Storage {
    /// Begin a new transaction.
    fn begin(&self) -> Result<Box<dyn Transaction + '_>>;
}
