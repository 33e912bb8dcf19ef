//! Integration tests for the lookup row engine.

use lookup::{
    CellValue, Column, DataType, EngineConfig, LookupEngine, LookupError, MemoryStore, RawRow,
    RawValue, RowUpdate, Table,
};

/// A `parts` table with Name(string) and Qty(number).
fn parts_table() -> (LookupEngine<MemoryStore>, Table, Column, Column) {
    let engine = LookupEngine::new(MemoryStore::new());
    let table = engine.create_table("parts", Some("Hardware parts")).unwrap();
    let name = engine
        .add_column(&table.id, "Name", DataType::String, 0)
        .unwrap();
    let qty = engine
        .add_column(&table.id, "Qty", DataType::Number, 1)
        .unwrap();
    (engine, table, name, qty)
}

fn part(name: &Column, qty: &Column, n: impl Into<RawValue>, q: impl Into<RawValue>) -> RawRow {
    RawRow::new([(name.id.clone(), n.into()), (qty.id.clone(), q.into())])
}

// =============================================================================
// Row Mutation Tests
// =============================================================================

#[test]
fn test_create_row_normalizes_values() {
    let (engine, table, name, qty) = parts_table();

    let row = engine
        .create_row(&table.id, &part(&name, &qty, "bolt", " 10 "))
        .unwrap();

    assert_eq!(row.table_id, table.id);
    assert_eq!(row.values[&name.id], CellValue::String("bolt".to_string()));
    assert_eq!(row.values[&qty.id], CellValue::Number(10.0));
    assert_eq!(row.sort_order, 0);
    assert_eq!(row.row_hash.len(), 64);
}

#[test]
fn test_create_row_fills_missing_columns_with_null() {
    let (engine, table, name, qty) = parts_table();

    let row = engine
        .create_row(&table.id, &RawRow::new([(name.id.clone(), "washer")]))
        .unwrap();

    assert_eq!(row.values.len(), 2);
    assert_eq!(row.values[&qty.id], CellValue::Null);
}

#[test]
fn test_create_blank_row_rejected() {
    let (engine, table, name, qty) = parts_table();

    let err = engine
        .create_row(&table.id, &part(&name, &qty, RawValue::Null, "abc"))
        .unwrap_err();

    assert!(matches!(err, LookupError::BlankRow { .. }));
    assert!(engine.list_rows(&table.id).unwrap().is_empty());
}

#[test]
fn test_create_on_zero_column_table_is_blank() {
    let engine = LookupEngine::new(MemoryStore::new());
    let table = engine.create_table("empty", None).unwrap();

    let err = engine
        .create_row(&table.id, &RawRow::new([("anything", "x")]))
        .unwrap_err();
    assert!(matches!(err, LookupError::BlankRow { .. }));
}

#[test]
fn test_empty_string_is_not_blank() {
    let engine = LookupEngine::new(MemoryStore::new());
    let table = engine.create_table("t", None).unwrap();
    let a = engine.add_column(&table.id, "A", DataType::Number, 0).unwrap();
    let b = engine.add_column(&table.id, "B", DataType::String, 1).unwrap();

    let row = engine
        .create_row(
            &table.id,
            &RawRow::new([(a.id.clone(), RawValue::Null), (b.id.clone(), RawValue::from(""))]),
        )
        .unwrap();
    assert_eq!(row.values[&b.id], CellValue::String(String::new()));

    let err = engine
        .create_row(
            &table.id,
            &RawRow::new([(a.id.clone(), RawValue::Null), (b.id.clone(), RawValue::Null)]),
        )
        .unwrap_err();
    assert!(matches!(err, LookupError::BlankRow { .. }));
}

#[test]
fn test_create_duplicate_row_is_conflict() {
    let (engine, table, name, qty) = parts_table();

    engine
        .create_row(&table.id, &part(&name, &qty, "bolt", 10))
        .unwrap();
    let err = engine
        .create_row(&table.id, &part(&name, &qty, "bolt", "10"))
        .unwrap_err();

    assert!(matches!(err, LookupError::StorageConflict { .. }));
    assert_eq!(engine.list_rows(&table.id).unwrap().len(), 1);
}

#[test]
fn test_create_row_unknown_table() {
    let engine = LookupEngine::new(MemoryStore::new());
    let err = engine
        .create_row("tbl_missing", &RawRow::new([("c", "x")]))
        .unwrap_err();
    assert!(matches!(err, LookupError::NotFound { entity: "Table", .. }));
}

#[test]
fn test_create_row_uses_sort_order() {
    let (engine, table, name, qty) = parts_table();

    let row = engine
        .create_row(&table.id, &part(&name, &qty, "nut", 5).with_sort_order(7))
        .unwrap();
    assert_eq!(row.sort_order, 7);
}

#[test]
fn test_default_sort_order_from_config() {
    let config = EngineConfig::new().with_default_sort_order(100);
    let engine = LookupEngine::with_config(MemoryStore::new(), config);
    let table = engine.create_table("t", None).unwrap();
    let col = engine.add_column(&table.id, "A", DataType::String, 0).unwrap();

    let row = engine
        .create_row(&table.id, &RawRow::new([(col.id.clone(), "x")]))
        .unwrap();
    assert_eq!(row.sort_order, 100);
}

#[test]
fn test_update_row_recomputes_hash() {
    let (engine, table, name, qty) = parts_table();
    let row = engine
        .create_row(&table.id, &part(&name, &qty, "bolt", 10))
        .unwrap();

    let updated = engine
        .update_row(
            &table.id,
            &row.id,
            &RowUpdate::values([(name.id.clone(), RawValue::from("bolt")), (qty.id.clone(), RawValue::from(12))]),
        )
        .unwrap();

    assert_eq!(updated.id, row.id);
    assert_eq!(updated.values[&qty.id], CellValue::Number(12.0));
    assert_ne!(updated.row_hash, row.row_hash);
}

#[test]
fn test_sort_order_only_update_keeps_hash() {
    let (engine, table, name, qty) = parts_table();
    let row = engine
        .create_row(&table.id, &part(&name, &qty, "bolt", 10))
        .unwrap();

    let updated = engine
        .update_row(&table.id, &row.id, &RowUpdate::sort_order(3))
        .unwrap();

    assert_eq!(updated.sort_order, 3);
    assert_eq!(updated.row_hash, row.row_hash);
    assert_eq!(updated.values, row.values);
}

#[test]
fn test_update_to_blank_rejected_and_row_unchanged() {
    let engine = LookupEngine::new(MemoryStore::new());
    let table = engine.create_table("t", None).unwrap();
    let a = engine.add_column(&table.id, "A", DataType::String, 0).unwrap();
    let b = engine.add_column(&table.id, "B", DataType::Number, 1).unwrap();

    let row = engine
        .create_row(&table.id, &RawRow::new([(a.id.clone(), "x")]))
        .unwrap();

    let err = engine
        .update_row(
            &table.id,
            &row.id,
            &RowUpdate::values([(a.id.clone(), RawValue::Null), (b.id.clone(), RawValue::Null)]),
        )
        .unwrap_err();

    assert!(matches!(err, LookupError::BlankRow { .. }));
    assert_eq!(engine.get_row(&table.id, &row.id).unwrap(), row);
}

#[test]
fn test_update_into_existing_content_is_conflict() {
    let (engine, table, name, qty) = parts_table();
    engine
        .create_row(&table.id, &part(&name, &qty, "bolt", 10))
        .unwrap();
    let nut = engine
        .create_row(&table.id, &part(&name, &qty, "nut", 10))
        .unwrap();

    let err = engine
        .update_row(
            &table.id,
            &nut.id,
            &RowUpdate::values([(name.id.clone(), RawValue::from("bolt")), (qty.id.clone(), RawValue::from(10))]),
        )
        .unwrap_err();

    assert!(matches!(err, LookupError::StorageConflict { .. }));
    assert_eq!(engine.get_row(&table.id, &nut.id).unwrap(), nut);
}

#[test]
fn test_update_row_of_other_table_not_found() {
    let (engine, table, name, qty) = parts_table();
    let other = engine.create_table("other", None).unwrap();
    let row = engine
        .create_row(&table.id, &part(&name, &qty, "bolt", 10))
        .unwrap();

    let err = engine
        .update_row(&other.id, &row.id, &RowUpdate::sort_order(1))
        .unwrap_err();
    assert!(matches!(err, LookupError::NotFound { entity: "Row", .. }));

    let err = engine.delete_row(&other.id, &row.id).unwrap_err();
    assert!(matches!(err, LookupError::NotFound { entity: "Row", .. }));
    assert_eq!(engine.list_rows(&table.id).unwrap().len(), 1);
}

#[test]
fn test_delete_row() {
    let (engine, table, name, qty) = parts_table();
    let row = engine
        .create_row(&table.id, &part(&name, &qty, "bolt", 10))
        .unwrap();

    engine.delete_row(&table.id, &row.id).unwrap();

    assert!(engine.list_rows(&table.id).unwrap().is_empty());
    // The same content can be created again once deleted.
    engine
        .create_row(&table.id, &part(&name, &qty, "bolt", 10))
        .unwrap();
}

// =============================================================================
// Import Tests
// =============================================================================

#[test]
fn test_import_dedups_within_request() {
    let (engine, table, name, qty) = parts_table();

    let summary = engine
        .import_rows(
            &table.id,
            &[part(&name, &qty, "bolt", 10), part(&name, &qty, "bolt", "10")],
        )
        .unwrap();

    assert_eq!(summary.inserted, 1);
    assert_eq!(summary.skipped_duplicate_in_request, 1);
    assert_eq!(summary.skipped_blank, 0);
    assert_eq!(summary.skipped_existing, 0);
}

#[test]
fn test_import_negative_zero_matches_zero() {
    let (engine, table, name, qty) = parts_table();

    let summary = engine
        .import_rows(
            &table.id,
            &[
                part(&name, &qty, "washer", 0),
                part(&name, &qty, "washer", "-0"),
                part(&name, &qty, "washer", -0.0),
            ],
        )
        .unwrap();

    assert_eq!(summary.inserted, 1);
    assert_eq!(summary.skipped_duplicate_in_request, 2);
    assert_eq!(engine.list_rows(&table.id).unwrap().len(), 1);

    let err = engine
        .create_row(&table.id, &part(&name, &qty, "washer", "-0.0"))
        .unwrap_err();
    assert!(matches!(err, LookupError::StorageConflict { .. }));
}

#[test]
fn test_reimport_skips_existing() {
    let (engine, table, name, qty) = parts_table();
    let rows = [part(&name, &qty, "bolt", 10)];

    engine.import_rows(&table.id, &rows).unwrap();
    let summary = engine.import_rows(&table.id, &rows).unwrap();

    assert_eq!(summary.inserted, 0);
    assert_eq!(summary.skipped_existing, 1);
    assert_eq!(engine.list_rows(&table.id).unwrap().len(), 1);
}

#[test]
fn test_import_accounting_identity() {
    let (engine, table, name, qty) = parts_table();
    engine
        .create_row(&table.id, &part(&name, &qty, "washer", 1))
        .unwrap();

    let rows = vec![
        part(&name, &qty, "bolt", 10),
        part(&name, &qty, RawValue::Null, "not a number"),
        part(&name, &qty, "washer", "1"),
        part(&name, &qty, "bolt", 10.0),
        RawRow::default(),
        part(&name, &qty, "nut", RawValue::Null),
    ];
    let summary = engine.import_rows(&table.id, &rows).unwrap();

    assert_eq!(summary.inserted, 2);
    assert_eq!(summary.skipped_blank, 2);
    assert_eq!(summary.skipped_duplicate_in_request, 1);
    assert_eq!(summary.skipped_existing, 1);
    assert_eq!(summary.total(), rows.len());
    assert_eq!(summary.skipped(), 4);
}

#[test]
fn test_import_first_occurrence_wins() {
    let (engine, table, name, qty) = parts_table();

    engine
        .import_rows(
            &table.id,
            &[
                part(&name, &qty, "bolt", 10).with_sort_order(1),
                part(&name, &qty, "bolt", 10).with_sort_order(2),
            ],
        )
        .unwrap();

    let rows = engine.list_rows(&table.id).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].sort_order, 1);
}

#[test]
fn test_import_empty_batch() {
    let (engine, table, _, _) = parts_table();
    let summary = engine.import_rows(&table.id, &[]).unwrap();
    assert_eq!(summary.total(), 0);
}

#[test]
fn test_import_respects_batch_limit() {
    let config = EngineConfig::new().with_max_import_rows(1);
    let engine = LookupEngine::with_config(MemoryStore::new(), config);
    let table = engine.create_table("t", None).unwrap();
    let col = engine.add_column(&table.id, "A", DataType::String, 0).unwrap();

    let rows = vec![
        RawRow::new([(col.id.clone(), "x")]),
        RawRow::new([(col.id.clone(), "y")]),
    ];
    let err = engine.import_rows(&table.id, &rows).unwrap_err();

    assert!(matches!(err, LookupError::Validation(_)));
    assert!(engine.list_rows(&table.id).unwrap().is_empty());
}

// =============================================================================
// Column Tests
// =============================================================================

/// Columns A(string), B(number) with rows {A:"x",B:1} and {A:"x",B:2}.
fn guard_table() -> (LookupEngine<MemoryStore>, Table, Column, Column) {
    let engine = LookupEngine::new(MemoryStore::new());
    let table = engine.create_table("t", None).unwrap();
    let a = engine.add_column(&table.id, "A", DataType::String, 0).unwrap();
    let b = engine.add_column(&table.id, "B", DataType::Number, 1).unwrap();
    engine
        .import_rows(
            &table.id,
            &[
                RawRow::new([(a.id.clone(), RawValue::from("x")), (b.id.clone(), RawValue::from(1))]),
                RawRow::new([(a.id.clone(), RawValue::from("x")), (b.id.clone(), RawValue::from(2))]),
            ],
        )
        .unwrap();
    (engine, table, a, b)
}

#[test]
fn test_delete_column_that_merges_rows_rejected() {
    let (engine, table, _a, b) = guard_table();
    let rows_before = engine.list_rows(&table.id).unwrap();

    let err = engine.delete_column(&table.id, &b.id).unwrap_err();

    assert!(matches!(err, LookupError::DeleteConflict { .. }));
    assert_eq!(engine.list_columns(&table.id).unwrap().len(), 2);
    assert_eq!(engine.list_rows(&table.id).unwrap(), rows_before);
}

#[test]
fn test_delete_column_keeping_rows_distinct() {
    let (engine, table, a, b) = guard_table();

    engine.can_delete_column(&table.id, &a.id).unwrap();
    engine.delete_column(&table.id, &a.id).unwrap();

    let columns = engine.list_columns(&table.id).unwrap();
    assert_eq!(columns.len(), 1);
    assert_eq!(columns[0].id, b.id);

    // The deleted column's key stays in stored values.
    let rows = engine.list_rows(&table.id).unwrap();
    assert!(rows.iter().all(|r| r.values.contains_key(&a.id)));
}

#[test]
fn test_deleted_column_content_is_deduplicated_afterwards() {
    let (engine, table, a, b) = guard_table();
    engine.delete_column(&table.id, &a.id).unwrap();

    // {B:1} already exists once A is gone.
    let summary = engine
        .import_rows(&table.id, &[RawRow::new([(b.id.clone(), 1)])])
        .unwrap();
    assert_eq!(summary.skipped_existing, 1);
    assert_eq!(summary.inserted, 0);
}

#[test]
fn test_delete_last_column_allowed() {
    let engine = LookupEngine::new(MemoryStore::new());
    let table = engine.create_table("t", None).unwrap();
    let a = engine.add_column(&table.id, "A", DataType::String, 0).unwrap();
    engine
        .import_rows(
            &table.id,
            &[RawRow::new([(a.id.clone(), "x")]), RawRow::new([(a.id.clone(), "y")])],
        )
        .unwrap();

    engine.delete_column(&table.id, &a.id).unwrap();
    assert!(engine.list_columns(&table.id).unwrap().is_empty());
    assert_eq!(engine.list_rows(&table.id).unwrap().len(), 2);
}

#[test]
fn test_add_column_after_last_column_deleted() {
    let engine = LookupEngine::new(MemoryStore::new());
    let table = engine.create_table("t", None).unwrap();
    let a = engine.add_column(&table.id, "A", DataType::String, 0).unwrap();
    engine
        .import_rows(
            &table.id,
            &[RawRow::new([(a.id.clone(), "x")]), RawRow::new([(a.id.clone(), "y")])],
        )
        .unwrap();
    let rows = engine.list_rows(&table.id).unwrap();
    engine.delete_column(&table.id, &a.id).unwrap();

    // Both rows are empty over the new column, so the add is refused.
    let err = engine
        .add_column(&table.id, "B", DataType::String, 0)
        .unwrap_err();
    match &err {
        LookupError::Validation(message) => {
            assert!(message.contains(&rows[0].id), "{}", message);
            assert!(message.contains(&rows[1].id), "{}", message);
        }
        other => panic!("expected a validation error, got {:?}", other),
    }
    assert!(engine.list_columns(&table.id).unwrap().is_empty());

    // With a single row left the table becomes usable again.
    engine.delete_row(&table.id, &rows[1].id).unwrap();
    let b = engine.add_column(&table.id, "B", DataType::String, 0).unwrap();
    engine
        .create_row(&table.id, &RawRow::new([(b.id.clone(), "z")]))
        .unwrap();
    assert_eq!(engine.list_rows(&table.id).unwrap().len(), 2);
}

#[test]
fn test_delete_unknown_column_not_found() {
    let (engine, table, _, _) = guard_table();
    let err = engine.delete_column(&table.id, "col_missing").unwrap_err();
    assert!(matches!(err, LookupError::NotFound { entity: "Column", .. }));
}

#[test]
fn test_rename_column_keeps_hashes() {
    let (engine, table, name, qty) = parts_table();
    let row = engine
        .create_row(&table.id, &part(&name, &qty, "bolt", 10))
        .unwrap();

    let renamed = engine.rename_column(&table.id, &name.id, "Part name").unwrap();

    assert_eq!(renamed.name, "Part name");
    assert_eq!(engine.get_row(&table.id, &row.id).unwrap().row_hash, row.row_hash);
}

#[test]
fn test_add_column_rehashes_existing_rows() {
    let (engine, table, name, qty) = parts_table();
    let row = engine
        .create_row(&table.id, &part(&name, &qty, "bolt", 10))
        .unwrap();

    engine
        .add_column(&table.id, "In stock", DataType::Boolean, 2)
        .unwrap();

    let after = engine.get_row(&table.id, &row.id).unwrap();
    assert_ne!(after.row_hash, row.row_hash);

    // Same content with the new column left empty is still a duplicate.
    let err = engine
        .create_row(&table.id, &part(&name, &qty, "bolt", 10))
        .unwrap_err();
    assert!(matches!(err, LookupError::StorageConflict { .. }));
}

#[test]
fn test_duplicate_column_name_rejected() {
    let (engine, table, _, _) = parts_table();
    let err = engine
        .add_column(&table.id, "Name", DataType::String, 5)
        .unwrap_err();
    assert!(matches!(err, LookupError::Validation(_)));
}

#[test]
fn test_columns_listed_in_registry_order() {
    let engine = LookupEngine::new(MemoryStore::new());
    let table = engine.create_table("t", None).unwrap();
    engine.add_column(&table.id, "Third", DataType::String, 3).unwrap();
    engine.add_column(&table.id, "First", DataType::String, 1).unwrap();
    engine.add_column(&table.id, "Second", DataType::String, 2).unwrap();

    let names: Vec<String> = engine
        .list_columns(&table.id)
        .unwrap()
        .into_iter()
        .map(|c| c.name)
        .collect();
    assert_eq!(names, vec!["First", "Second", "Third"]);
}
