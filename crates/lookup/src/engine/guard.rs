//! Column deletion guard.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::error::{LookupError, Result};
use crate::row::canonicalize_values;
use crate::schema::Column;
use crate::store::Transaction;

use super::load_columns;

/// Check that removing `column_id` would not make two rows of the table identical.
///
/// Every row is re-canonicalized over the remaining columns; the first repeated
/// projected hash rejects the deletion. Nothing is written. Callers must run the
/// structural delete in the same transaction as this check.
pub fn can_delete_column(tx: &dyn Transaction, table_id: &str, column_id: &str) -> Result<()> {
    let columns = load_columns(tx, table_id)?;
    if !columns.iter().any(|c| c.id == column_id) {
        return Err(LookupError::column_not_found(table_id, column_id));
    }

    let remaining: Vec<Column> = columns.into_iter().filter(|c| c.id != column_id).collect();
    if remaining.is_empty() {
        // No columns left to compare on.
        debug!(table_id, column_id, "last column, deletion allowed");
        return Ok(());
    }

    let rows = tx.find_rows_by_table(table_id)?;
    let mut seen: HashMap<String, String> = HashMap::with_capacity(rows.len());

    for row in &rows {
        let projected = canonicalize_values(table_id, &remaining, &row.values);
        if let Some(first_row_id) = seen.insert(projected.row_hash, row.id.clone()) {
            warn!(
                table_id,
                column_id,
                first_row_id = %first_row_id,
                second_row_id = %row.id,
                "column deletion would merge rows"
            );
            return Err(LookupError::DeleteConflict {
                table_id: table_id.to_string(),
                column_id: column_id.to_string(),
                first_row_id,
                second_row_id: row.id.clone(),
            });
        }
    }

    debug!(table_id, column_id, rows = rows.len(), "column deletion allowed");
    Ok(())
}
