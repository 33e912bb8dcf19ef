//! Core type definitions for column data types.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Declared data type of a column.
///
/// Every cell is coerced to the type of its column; a type declared by the
/// caller alongside a value is never trusted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    /// Text values. The empty string is a value, distinct from null.
    String,
    /// Finite floating-point numbers.
    Number,
    /// Boolean values (true/false).
    Boolean,
    /// Date and/or time values, kept as opaque strings.
    Datetime,
}

impl DataType {
    /// All data types, in declaration order.
    pub const ALL: [DataType; 4] = [
        DataType::String,
        DataType::Number,
        DataType::Boolean,
        DataType::Datetime,
    ];

    /// Wire name of the type.
    pub fn as_str(&self) -> &'static str {
        match self {
            DataType::String => "string",
            DataType::Number => "number",
            DataType::Boolean => "boolean",
            DataType::Datetime => "datetime",
        }
    }
}

impl Default for DataType {
    fn default() -> Self {
        DataType::String
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DataType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "string" | "text" => Ok(DataType::String),
            "number" | "numeric" => Ok(DataType::Number),
            "boolean" | "bool" => Ok(DataType::Boolean),
            "datetime" | "date" => Ok(DataType::Datetime),
            _ => Err(format!(
                "Unknown data type: {}. Use string, number, boolean, or datetime.",
                s
            )),
        }
    }
}
