//! Rows and their canonical, hashed form.

mod canonical;
mod row;

pub use canonical::{canonicalize, canonicalize_values, is_blank, row_hash, CanonicalRow};
pub use row::{RawRow, RawValues, Row, RowPatch, RowUpdate, RowValues};
