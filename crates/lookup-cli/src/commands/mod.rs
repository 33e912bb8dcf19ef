//! CLI command implementations.

pub mod column;
pub mod import;
pub mod row;
pub mod show;
pub mod table;

use lookup::{Column, LookupEngine, LookupError, RawValue, RawValues, Storage, Table};

pub type CommandResult = Result<(), Box<dyn std::error::Error>>;

/// Find a table by id, falling back to its name.
pub fn resolve_table<S: Storage>(engine: &LookupEngine<S>, key: &str) -> lookup::Result<Table> {
    let tables = engine.list_tables()?;
    tables
        .iter()
        .find(|t| t.id == key)
        .or_else(|| tables.iter().find(|t| t.name == key))
        .cloned()
        .ok_or_else(|| LookupError::NotFound {
            entity: "Table",
            id: key.to_string(),
            table_id: key.to_string(),
        })
}

/// Find a column of a table by id, falling back to its name.
pub fn resolve_column<'a>(columns: &'a [Column], table_id: &str, key: &str) -> lookup::Result<&'a Column> {
    columns
        .iter()
        .find(|c| c.id == key)
        .or_else(|| columns.iter().find(|c| c.name == key))
        .ok_or_else(|| LookupError::NotFound {
            entity: "Column",
            id: key.to_string(),
            table_id: table_id.to_string(),
        })
}

/// Re-key values given by column id or name to column ids.
pub fn key_by_column_id(columns: &[Column], table_id: &str, values: RawValues) -> lookup::Result<RawValues> {
    values
        .into_iter()
        .map(|(key, value)| -> lookup::Result<(String, RawValue)> {
            let column = resolve_column(columns, table_id, &key)
                .map_err(|_| LookupError::Validation(format!("Unknown column '{}'", key)))?;
            Ok((column.id.clone(), value))
        })
        .collect()
}

/// Parse a JSON object of column to value.
pub fn parse_values(json: &str) -> lookup::Result<RawValues> {
    serde_json::from_str(json).map_err(|e| {
        LookupError::Validation(format!("Row values must be a JSON object: {}", e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use lookup::{DataType, MemoryStore};

    #[test]
    fn test_key_by_column_id() {
        let columns = vec![
            Column::new("col_1", "t", "Name", DataType::String),
            Column::new("col_2", "t", "Qty", DataType::Number),
        ];
        let values = parse_values(r#"{"Name": "bolt", "col_2": 10}"#).unwrap();
        let keyed = key_by_column_id(&columns, "t", values).unwrap();

        assert_eq!(keyed["col_1"], RawValue::from("bolt"));
        assert_eq!(keyed["col_2"], RawValue::from(10));
    }

    #[test]
    fn test_unknown_column_rejected() {
        let columns = vec![Column::new("col_1", "t", "Name", DataType::String)];
        let values = parse_values(r#"{"Colour": "red"}"#).unwrap();
        assert!(matches!(
            key_by_column_id(&columns, "t", values),
            Err(LookupError::Validation(_))
        ));
    }

    #[test]
    fn test_parse_values_requires_object() {
        assert!(parse_values("[1, 2]").is_err());
    }

    #[test]
    fn test_resolve_table_by_name() {
        let engine = LookupEngine::new(MemoryStore::new());
        let table = engine.create_table("parts", None).unwrap();

        assert_eq!(resolve_table(&engine, "parts").unwrap().id, table.id);
        assert_eq!(resolve_table(&engine, &table.id).unwrap().id, table.id);
        assert!(resolve_table(&engine, "nope").is_err());
    }
}
