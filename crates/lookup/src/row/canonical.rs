//! Canonical row form and content hashing.
//!
//! The canonical form of a row is the value of every current column of its
//! table, normalized to the column's declared type and ordered by column id.
//! Columns the caller left out are included as null, so omitting a key and
//! sending an explicit null hash identically.

use serde::Serialize;
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::cell::{normalize, RawValue};
use crate::schema::Column;

use super::row::{RawValues, RowValues};

/// Normalized values of a row together with their hash.
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalRow {
    pub values: RowValues,
    pub row_hash: String,
}

impl CanonicalRow {
    /// Returns true if every value is null, or the table has no columns.
    pub fn is_blank(&self) -> bool {
        is_blank(&self.values)
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct HashInput<'a> {
    table_id: &'a str,
    values: &'a RowValues,
}

/// Normalize raw input against `columns` and hash the result.
///
/// Keys of `raw` that are not current columns are ignored.
pub fn canonicalize(table_id: &str, columns: &[Column], raw: &RawValues) -> CanonicalRow {
    let values: RowValues = columns
        .iter()
        .map(|column| {
            (
                column.id.clone(),
                normalize(column.data_type, raw.get(&column.id)),
            )
        })
        .collect();

    let row_hash = row_hash(table_id, &values);
    debug!(table_id, columns = columns.len(), %row_hash, "canonicalized row");

    CanonicalRow { values, row_hash }
}

/// Canonicalize already-stored values against a (possibly different) column set.
pub fn canonicalize_values(table_id: &str, columns: &[Column], stored: &RowValues) -> CanonicalRow {
    let raw: RawValues = stored
        .iter()
        .map(|(id, value)| (id.clone(), RawValue::from(value)))
        .collect();
    canonicalize(table_id, columns, &raw)
}

/// Returns true if every value is null, including the zero-column case.
pub fn is_blank(values: &RowValues) -> bool {
    values.values().all(|v| v.is_null())
}

/// SHA-256 of `{tableId, values}` serialized as JSON, as lowercase hex.
///
/// `values` must already be canonical: one entry per current column.
pub fn row_hash(table_id: &str, values: &RowValues) -> String {
    let input = HashInput { table_id, values };
    // RowValues holds only strings, finite numbers, booleans and nulls.
    let bytes = serde_json::to_vec(&input).unwrap_or_default();

    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    format!("{:x}", hasher.finalize())
}
