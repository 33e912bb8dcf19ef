//! Column definition.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::types::DataType;
use super::{ColumnId, TableId};

/// A column of a lookup table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    /// Stable identifier, used as the key in row values and row hashes.
    pub id: ColumnId,
    /// Owning table.
    pub table_id: TableId,
    /// Display name. Renaming never changes row hashes.
    pub name: String,
    /// Declared data type.
    pub data_type: DataType,
    /// Position among the table's columns.
    #[serde(default)]
    pub sort_order: i64,
    /// When the column was created.
    pub created_at: DateTime<Utc>,
}

impl Column {
    /// Create a new column with sort order 0.
    pub fn new(
        id: impl Into<ColumnId>,
        table_id: impl Into<TableId>,
        name: impl Into<String>,
        data_type: DataType,
    ) -> Self {
        Self {
            id: id.into(),
            table_id: table_id.into(),
            name: name.into(),
            data_type,
            sort_order: 0,
            created_at: Utc::now(),
        }
    }

    /// Set the sort order.
    pub fn with_sort_order(mut self, sort_order: i64) -> Self {
        self.sort_order = sort_order;
        self
    }

    /// Registry ordering: sort order, then creation time, then name.
    pub fn registry_order(a: &Column, b: &Column) -> Ordering {
        a.sort_order
            .cmp(&b.sort_order)
            .then_with(|| a.created_at.cmp(&b.created_at))
            .then_with(|| a.name.cmp(&b.name))
    }
}
