//! Table and column plumbing that keeps stored row hashes in step with the column set.

use std::collections::HashMap;

use tracing::{info, warn};

use crate::error::{LookupError, Result};
use crate::row::{canonicalize_values, RowPatch};
use crate::schema::{Column, DataType, Table};
use crate::store::Transaction;

use super::guard::can_delete_column;
use super::load_columns;

/// Create an empty table.
pub fn create_table(
    tx: &mut dyn Transaction,
    name: &str,
    description: Option<&str>,
) -> Result<Table> {
    let name = name.trim();
    if name.is_empty() {
        return Err(LookupError::Validation("Table name must not be empty".to_string()));
    }

    let table = tx.insert_table(name, description)?;
    info!(table_id = %table.id, name, "created table");
    Ok(table)
}

/// Add a column and rehash existing rows over the widened column set.
///
/// Existing rows get null for the new column. Rows that were distinct stay
/// distinct, except on a table whose last column was deleted: its rows all
/// look alike over the new set, and the add is refused until only one remains.
pub fn add_column(
    tx: &mut dyn Transaction,
    table_id: &str,
    name: &str,
    data_type: DataType,
    sort_order: i64,
) -> Result<Column> {
    let columns = load_columns(tx, table_id)?;
    let name = name.trim();
    if name.is_empty() {
        return Err(LookupError::Validation("Column name must not be empty".to_string()));
    }
    if columns.iter().any(|c| c.name == name) {
        return Err(LookupError::Validation(format!(
            "Column '{}' already exists in table '{}'",
            name, table_id
        )));
    }

    let column = tx.insert_column(table_id, name, data_type, sort_order)?;
    let rehashed = rehash_rows(tx, table_id)?;

    info!(table_id, column_id = %column.id, name, %data_type, rehashed, "added column");
    Ok(column)
}

/// Rename a column. Hashes are keyed by column id, so rows are untouched.
pub fn rename_column(
    tx: &mut dyn Transaction,
    table_id: &str,
    column_id: &str,
    name: &str,
) -> Result<Column> {
    let columns = load_columns(tx, table_id)?;
    let name = name.trim();
    if name.is_empty() {
        return Err(LookupError::Validation("Column name must not be empty".to_string()));
    }
    if columns.iter().any(|c| c.name == name && c.id != column_id) {
        return Err(LookupError::Validation(format!(
            "Column '{}' already exists in table '{}'",
            name, table_id
        )));
    }

    let column = tx.rename_column(table_id, column_id, name)?;
    info!(table_id, column_id, name, "renamed column");
    Ok(column)
}

/// Delete a column after the deletion guard has passed.
///
/// Row values keep the deleted column's key; only the hashes are recomputed
/// over the remaining columns. When no column remains, hashes are left as they
/// are, since every row of a zero-column table would hash alike.
pub fn delete_column(tx: &mut dyn Transaction, table_id: &str, column_id: &str) -> Result<()> {
    can_delete_column(tx, table_id, column_id)?;
    tx.remove_column(table_id, column_id)?;

    let rehashed = if tx.list_columns(table_id)?.is_empty() {
        0
    } else {
        rehash_rows(tx, table_id)?
    };

    info!(table_id, column_id, rehashed, "deleted column");
    Ok(())
}

/// Recompute the hash of every row of the table over its current columns.
///
/// All new hashes are computed before any row is written. Two rows landing on
/// the same hash is a `Validation` error naming both, and nothing is written.
/// Returns the number of rows whose hash changed.
pub fn rehash_rows(tx: &mut dyn Transaction, table_id: &str) -> Result<usize> {
    let columns = load_columns(tx, table_id)?;
    let rows = tx.find_rows_by_table(table_id)?;

    let mut seen: HashMap<String, String> = HashMap::with_capacity(rows.len());
    let mut patches = Vec::new();
    for row in rows {
        let canonical = canonicalize_values(table_id, &columns, &row.values);
        if let Some(first) = seen.insert(canonical.row_hash.clone(), row.id.clone()) {
            warn!(table_id, first_row_id = %first, second_row_id = %row.id, "rehash collision");
            return Err(LookupError::Validation(format!(
                "Rows '{}' and '{}' of table '{}' would become identical over columns [{}]; \
                 delete one of them first",
                first,
                row.id,
                table_id,
                columns
                    .iter()
                    .map(|c| c.name.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            )));
        }
        if canonical.row_hash == row.row_hash {
            continue;
        }
        patches.push((
            row.id,
            RowPatch {
                values: row.values,
                row_hash: canonical.row_hash,
                sort_order: row.sort_order,
            },
        ));
    }

    let changed = patches.len();
    for (row_id, patch) in patches {
        tx.update_row(&row_id, patch)?;
    }

    Ok(changed)
}
