//! The row engine: single-row mutations, bulk import and the column deletion guard.
//!
//! Every function here takes the unit of work explicitly and performs all of
//! its reads (columns included) and writes through it. Committing or rolling
//! back is the caller's job; see [`LookupEngine`](crate::LookupEngine).

mod guard;
mod import;
mod mutation;
mod registry;

pub use guard::can_delete_column;
pub use import::{import_rows, ImportSummary};
pub use mutation::{create_row, delete_row, update_row};
pub use registry::{add_column, create_table, delete_column, rehash_rows, rename_column};

use crate::error::{LookupError, Result};
use crate::row::Row;
use crate::schema::Column;
use crate::store::Transaction;

/// Current columns of an existing table.
fn load_columns(tx: &dyn Transaction, table_id: &str) -> Result<Vec<Column>> {
    if tx.get_table(table_id)?.is_none() {
        return Err(LookupError::table_not_found(table_id));
    }
    tx.list_columns(table_id)
}

/// A row, provided it belongs to `table_id`.
fn load_owned_row(tx: &dyn Transaction, table_id: &str, row_id: &str) -> Result<Row> {
    tx.get_row(row_id)?
        .filter(|row| row.table_id == table_id)
        .ok_or_else(|| LookupError::row_not_found(table_id, row_id))
}
