//! Stored rows and raw row input.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::cell::{CellValue, RawValue};
use crate::schema::{ColumnId, RowId, TableId};

/// Normalized values of a row, keyed by column id in ascending order.
pub type RowValues = BTreeMap<ColumnId, CellValue>;

/// Raw values of a row as supplied by the caller, in the caller's key order.
pub type RawValues = IndexMap<ColumnId, RawValue>;

/// A persisted row of a lookup table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Row {
    pub id: RowId,
    pub table_id: TableId,
    /// Normalized values. May carry keys of columns deleted since the row was written.
    pub values: RowValues,
    /// SHA-256 of the canonical form; the uniqueness key within the table.
    pub row_hash: String,
    #[serde(default)]
    pub sort_order: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One candidate row of a create or import request.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRow {
    #[serde(default)]
    pub values: RawValues,
    #[serde(default)]
    pub sort_order: Option<i64>,
}

impl RawRow {
    /// Create a raw row from `(column id, value)` pairs.
    pub fn new<K, V>(values: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<ColumnId>,
        V: Into<RawValue>,
    {
        Self {
            values: values
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            sort_order: None,
        }
    }

    /// Set the sort order.
    pub fn with_sort_order(mut self, sort_order: i64) -> Self {
        self.sort_order = Some(sort_order);
        self
    }
}

/// Changes written to an existing row by an update.
#[derive(Debug, Clone, PartialEq)]
pub struct RowPatch {
    pub values: RowValues,
    pub row_hash: String,
    pub sort_order: i64,
}

/// Request to update an existing row.
///
/// When `values` is `None` the row's stored values are reused as-is; there is
/// no field-by-field merge, so nulling one column means resending the others.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RowUpdate {
    #[serde(default)]
    pub values: Option<RawValues>,
    #[serde(default)]
    pub sort_order: Option<i64>,
}

impl RowUpdate {
    /// Replace every value of the row.
    pub fn values<K, V>(values: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<ColumnId>,
        V: Into<RawValue>,
    {
        Self {
            values: Some(RawRow::new(values).values),
            sort_order: None,
        }
    }

    /// Change only the sort order.
    pub fn sort_order(sort_order: i64) -> Self {
        Self {
            values: None,
            sort_order: Some(sort_order),
        }
    }

    /// Also set the sort order.
    pub fn with_sort_order(mut self, sort_order: i64) -> Self {
        self.sort_order = Some(sort_order);
        self
    }
}
