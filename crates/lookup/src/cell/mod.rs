//! Cell values and type-directed coercion.
//!
//! Raw input arrives loosely typed (JSON scalars, CSV strings, native
//! timestamps). [`normalize`] turns each raw value into a [`CellValue`] using
//! only the declared [`DataType`](crate::schema::DataType) of its column.

mod normalize;
mod value;

pub use normalize::{normalize, FALSE_TOKENS, TRUE_TOKENS};
pub use value::{CellValue, RawValue};
