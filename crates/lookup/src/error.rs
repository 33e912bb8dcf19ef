//! Error types for the lookup row engine.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for lookup operations.
#[derive(Debug, Error)]
pub enum LookupError {
    /// Malformed request shape, rejected before reaching the engine.
    #[error("Validation error: {0}")]
    Validation(String),

    /// A table, row or column id does not exist or does not belong to the stated table.
    #[error("{entity} '{id}' not found in table '{table_id}'")]
    NotFound {
        entity: &'static str,
        id: String,
        table_id: String,
    },

    /// Every normalized value of the row is null.
    #[error("Row for table '{table_id}' has no non-null values")]
    BlankRow { table_id: String },

    /// Removing the column would make two existing rows value-identical.
    #[error(
        "Deleting column '{column_id}' from table '{table_id}' would make rows '{first_row_id}' and '{second_row_id}' identical"
    )]
    DeleteConflict {
        table_id: String,
        column_id: String,
        first_row_id: String,
        second_row_id: String,
    },

    /// The (table, row hash) uniqueness constraint rejected a write.
    #[error("A row with hash {row_hash} already exists in table '{table_id}'")]
    StorageConflict { table_id: String, row_hash: String },

    /// Any other failure reported by the storage layer.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Error saving or loading a store file.
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// Error reading or accessing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Error from the CSV library.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl LookupError {
    pub(crate) fn row_not_found(table_id: &str, row_id: &str) -> Self {
        LookupError::NotFound {
            entity: "Row",
            id: row_id.to_string(),
            table_id: table_id.to_string(),
        }
    }

    pub(crate) fn column_not_found(table_id: &str, column_id: &str) -> Self {
        LookupError::NotFound {
            entity: "Column",
            id: column_id.to_string(),
            table_id: table_id.to_string(),
        }
    }

    pub(crate) fn table_not_found(table_id: &str) -> Self {
        LookupError::NotFound {
            entity: "Table",
            id: table_id.to_string(),
            table_id: table_id.to_string(),
        }
    }

    /// Whether this error is a client-side rejection rather than a storage failure.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            LookupError::Validation(_)
                | LookupError::NotFound { .. }
                | LookupError::BlankRow { .. }
                | LookupError::DeleteConflict { .. }
                | LookupError::StorageConflict { .. }
        )
    }
}

/// Result type alias for lookup operations.
pub type Result<T> = std::result::Result<T, LookupError>;
