//! Schema types for lookup tables and their columns.

mod column;
mod table;
mod types;

pub use column::Column;
pub use table::Table;
pub use types::DataType;

/// Identifier of a lookup table.
pub type TableId = String;

/// Identifier of a column. Row hashes are keyed by this, never by the column name.
pub type ColumnId = String;

/// Identifier of a row.
pub type RowId = String;
