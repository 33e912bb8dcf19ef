//! Lookup: the row engine behind user-defined lookup tables.
//!
//! Lookup tables hold loosely-typed rows under a small, editable set of typed
//! columns. This crate takes raw row input, coerces every cell to its column's
//! type, hashes the canonical result, and uses that hash to keep every row of
//! a table distinct, including across bulk imports and column deletions.
//!
//! # Core Principles
//!
//! - **Types come from columns**: a caller-declared type is never trusted
//! - **Content-addressed rows**: the SHA-256 of a row's canonical form is its uniqueness key
//! - **One transaction per operation**: no partial state is ever visible
//!
//! # Example
//!
//! ```
//! use lookup::{DataType, LookupEngine, MemoryStore, RawRow, RawValue};
//!
//! let engine = LookupEngine::new(MemoryStore::new());
//! let table = engine.create_table("parts", None).unwrap();
//! let name = engine.add_column(&table.id, "Name", DataType::String, 0).unwrap();
//! let qty = engine.add_column(&table.id, "Qty", DataType::Number, 1).unwrap();
//!
//! let rows = vec![
//!     RawRow::new([(name.id.clone(), RawValue::from("bolt")), (qty.id.clone(), RawValue::from(10))]),
//!     RawRow::new([(name.id.clone(), RawValue::from("bolt")), (qty.id.clone(), RawValue::from("10"))]),
//! ];
//! let summary = engine.import_rows(&table.id, &rows).unwrap();
//!
//! assert_eq!(summary.inserted, 1);
//! assert_eq!(summary.skipped_duplicate_in_request, 1);
//! ```

pub mod cell;
pub mod engine;
pub mod error;
pub mod row;
pub mod schema;
pub mod store;

mod lookup;

pub use crate::lookup::{EngineConfig, LookupEngine};
pub use cell::{normalize, CellValue, RawValue};
pub use engine::ImportSummary;
pub use error::{LookupError, Result};
pub use row::{canonicalize, is_blank, CanonicalRow, RawRow, RawValues, Row, RowUpdate, RowValues};
pub use schema::{Column, ColumnId, DataType, RowId, Table, TableId};
pub use store::{MemoryStore, Storage, Transaction};
