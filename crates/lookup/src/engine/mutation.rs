//! Single-row create, update and delete.

use tracing::{info, warn};

use crate::error::{LookupError, Result};
use crate::row::{canonicalize, canonicalize_values, RawRow, Row, RowPatch, RowUpdate};
use crate::store::{NewRow, OnConflict, Transaction};

use super::{load_columns, load_owned_row};

/// Create a row. Blank rows are rejected; an identical existing row is a conflict.
pub fn create_row(
    tx: &mut dyn Transaction,
    table_id: &str,
    raw: &RawRow,
    default_sort_order: i64,
) -> Result<Row> {
    let columns = load_columns(tx, table_id)?;
    let canonical = canonicalize(table_id, &columns, &raw.values);

    if canonical.is_blank() {
        warn!(table_id, "rejected blank row on create");
        return Err(LookupError::BlankRow {
            table_id: table_id.to_string(),
        });
    }

    let sort_order = raw.sort_order.unwrap_or(default_sort_order);
    let row = tx
        .insert_rows(
            table_id,
            vec![NewRow::new(canonical, sort_order)],
            OnConflict::Error,
        )?
        .pop()
        .ok_or_else(|| LookupError::Storage("Insert returned no row".to_string()))?;

    info!(table_id, row_id = %row.id, row_hash = %row.row_hash, "created row");
    Ok(row)
}

/// Update a row in place and recompute its hash.
///
/// Without new values the stored values are reused, so a sort-order-only
/// update keeps the row's content and hash.
pub fn update_row(
    tx: &mut dyn Transaction,
    table_id: &str,
    row_id: &str,
    update: &RowUpdate,
) -> Result<Row> {
    let existing = load_owned_row(tx, table_id, row_id)?;
    let columns = load_columns(tx, table_id)?;

    let (values, canonical) = match &update.values {
        Some(raw) => {
            let canonical = canonicalize(table_id, &columns, raw);
            (canonical.values.clone(), canonical)
        }
        None => {
            let canonical = canonicalize_values(table_id, &columns, &existing.values);
            (existing.values.clone(), canonical)
        }
    };

    if canonical.is_blank() {
        warn!(table_id, row_id, "rejected blank row on update");
        return Err(LookupError::BlankRow {
            table_id: table_id.to_string(),
        });
    }

    let patch = RowPatch {
        values,
        row_hash: canonical.row_hash,
        sort_order: update.sort_order.unwrap_or(existing.sort_order),
    };
    let row = tx.update_row(row_id, patch)?;

    info!(table_id, row_id, row_hash = %row.row_hash, "updated row");
    Ok(row)
}

/// Delete a row of `table_id`.
pub fn delete_row(tx: &mut dyn Transaction, table_id: &str, row_id: &str) -> Result<()> {
    load_owned_row(tx, table_id, row_id)?;
    tx.delete_row(row_id)?;

    info!(table_id, row_id, "deleted row");
    Ok(())
}
