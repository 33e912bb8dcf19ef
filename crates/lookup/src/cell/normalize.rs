//! Type-directed coercion of raw input into canonical cell values.

use chrono::SecondsFormat;

use crate::schema::DataType;

use super::value::{CellValue, RawValue};

/// Strings (trimmed, lower-cased) accepted as boolean true.
pub const TRUE_TOKENS: &[&str] = &["true", "1", "yes", "y"];

/// Strings (trimmed, lower-cased) accepted as boolean false.
pub const FALSE_TOKENS: &[&str] = &["false", "0", "no", "n"];

/// Coerce a raw value to the canonical value for a column of `data_type`.
///
/// `None` stands for a value the caller did not supply at all; it normalizes
/// exactly like an explicit null. This function is total and idempotent:
/// feeding its output back in (via `RawValue::from`) yields the same value.
pub fn normalize(data_type: DataType, raw: Option<&RawValue>) -> CellValue {
    let Some(raw) = raw else {
        return CellValue::Null;
    };

    match data_type {
        DataType::Boolean => normalize_boolean(raw),
        DataType::Number => normalize_number(raw),
        DataType::Datetime => normalize_datetime(raw),
        DataType::String => normalize_string(raw),
    }
}

fn normalize_boolean(raw: &RawValue) -> CellValue {
    match raw {
        RawValue::Bool(b) => CellValue::Boolean(*b),
        RawValue::Number(n) => CellValue::Boolean(*n != 0.0),
        RawValue::Text(s) => {
            let lower = s.trim().to_lowercase();
            if TRUE_TOKENS.contains(&lower.as_str()) {
                CellValue::Boolean(true)
            } else if FALSE_TOKENS.contains(&lower.as_str()) {
                CellValue::Boolean(false)
            } else {
                CellValue::Null
            }
        }
        _ => CellValue::Null,
    }
}

fn normalize_number(raw: &RawValue) -> CellValue {
    match raw {
        RawValue::Number(n) if n.is_finite() => CellValue::Number(unsigned_zero(*n)),
        RawValue::Text(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return CellValue::Null;
            }
            // Rust float syntax: no hex literals, `inf`/`NaN` parse but are dropped below.
            match trimmed.parse::<f64>() {
                Ok(n) if n.is_finite() => CellValue::Number(unsigned_zero(n)),
                _ => CellValue::Null,
            }
        }
        _ => CellValue::Null,
    }
}

/// `-0.0` compares equal to `0.0` but serializes differently, which would
/// split equal rows across two hashes.
fn unsigned_zero(n: f64) -> f64 {
    if n == 0.0 { 0.0 } else { n }
}

fn normalize_datetime(raw: &RawValue) -> CellValue {
    match raw {
        // Passed through as-is: no calendar or timezone validation.
        RawValue::Text(s) if !s.is_empty() => CellValue::String(s.clone()),
        RawValue::Timestamp(ts) => {
            CellValue::String(ts.to_rfc3339_opts(SecondsFormat::Millis, true))
        }
        _ => CellValue::Null,
    }
}

fn normalize_string(raw: &RawValue) -> CellValue {
    match raw {
        RawValue::Text(s) => CellValue::String(s.clone()),
        RawValue::Number(n) if n.is_finite() => {
            CellValue::String(unsigned_zero(*n).to_string())
        }
        RawValue::Bool(b) => CellValue::String(b.to_string()),
        _ => CellValue::Null,
    }
}
