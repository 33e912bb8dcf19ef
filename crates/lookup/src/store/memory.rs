//! In-memory transactional store.

use std::collections::HashSet;

use chrono::Utc;
use indexmap::IndexMap;
use parking_lot::{Mutex, MutexGuard};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{LookupError, Result};
use crate::row::{Row, RowPatch};
use crate::schema::{Column, ColumnId, DataType, RowId, Table, TableId};

use super::transaction::{NewRow, OnConflict, Storage, Transaction};

/// The complete state of a [`MemoryStore`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Database {
    pub tables: IndexMap<TableId, Table>,
    pub columns: IndexMap<ColumnId, Column>,
    pub rows: IndexMap<RowId, Row>,
    /// Counter behind generated ids. Persisted so ids are never reused.
    #[serde(default)]
    next_id: u64,
}

impl Database {
    /// Create an empty database.
    pub fn new() -> Self {
        Self::default()
    }

    fn generate_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{}_{:06}", prefix, self.next_id)
    }

    fn table_hashes(&self, table_id: &str) -> HashSet<String> {
        self.rows
            .values()
            .filter(|r| r.table_id == table_id)
            .map(|r| r.row_hash.clone())
            .collect()
    }

    fn require_table(&self, table_id: &str) -> Result<()> {
        if self.tables.contains_key(table_id) {
            Ok(())
        } else {
            Err(LookupError::table_not_found(table_id))
        }
    }

    fn column_mut(&mut self, table_id: &str, column_id: &str) -> Result<&mut Column> {
        self.columns
            .get_mut(column_id)
            .filter(|c| c.table_id == table_id)
            .ok_or_else(|| LookupError::column_not_found(table_id, column_id))
    }
}

/// Serializable in-memory store.
///
/// A transaction holds the store lock from `begin` until it is committed or
/// dropped, and writes to a private copy of the database that replaces the
/// shared state only on commit.
#[derive(Debug, Default)]
pub struct MemoryStore {
    db: Mutex<Database>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding `db`.
    pub fn from_database(db: Database) -> Self {
        Self { db: Mutex::new(db) }
    }

    /// A copy of the committed state.
    pub fn snapshot(&self) -> Database {
        self.db.lock().clone()
    }
}

impl Storage for MemoryStore {
    fn begin(&self) -> Result<Box<dyn Transaction + '_>> {
        let guard = self.db.lock();
        let working = guard.clone();
        Ok(Box::new(MemoryTransaction { guard, working }))
    }
}

/// A transaction on a [`MemoryStore`].
pub struct MemoryTransaction<'a> {
    guard: MutexGuard<'a, Database>,
    working: Database,
}

impl Transaction for MemoryTransaction<'_> {
    fn get_table(&self, table_id: &str) -> Result<Option<Table>> {
        Ok(self.working.tables.get(table_id).cloned())
    }

    fn list_tables(&self) -> Result<Vec<Table>> {
        Ok(self.working.tables.values().cloned().collect())
    }

    fn insert_table(&mut self, name: &str, description: Option<&str>) -> Result<Table> {
        let id = self.working.generate_id("tbl");
        let mut table = Table::new(id.clone(), name);
        table.description = description.map(str::to_string);
        self.working.tables.insert(id, table.clone());
        Ok(table)
    }

    fn list_columns(&self, table_id: &str) -> Result<Vec<Column>> {
        let mut columns: Vec<Column> = self
            .working
            .columns
            .values()
            .filter(|c| c.table_id == table_id)
            .cloned()
            .collect();
        columns.sort_by(Column::registry_order);
        Ok(columns)
    }

    fn get_column(&self, table_id: &str, column_id: &str) -> Result<Option<Column>> {
        Ok(self
            .working
            .columns
            .get(column_id)
            .filter(|c| c.table_id == table_id)
            .cloned())
    }

    fn insert_column(
        &mut self,
        table_id: &str,
        name: &str,
        data_type: DataType,
        sort_order: i64,
    ) -> Result<Column> {
        self.working.require_table(table_id)?;
        let id = self.working.generate_id("col");
        let column = Column::new(id.clone(), table_id, name, data_type).with_sort_order(sort_order);
        self.working.columns.insert(id, column.clone());
        Ok(column)
    }

    fn rename_column(&mut self, table_id: &str, column_id: &str, name: &str) -> Result<Column> {
        let column = self.working.column_mut(table_id, column_id)?;
        column.name = name.to_string();
        Ok(column.clone())
    }

    fn remove_column(&mut self, table_id: &str, column_id: &str) -> Result<()> {
        self.working.column_mut(table_id, column_id)?;
        self.working.columns.shift_remove(column_id);
        Ok(())
    }

    fn find_rows_by_table(&self, table_id: &str) -> Result<Vec<Row>> {
        Ok(self
            .working
            .rows
            .values()
            .filter(|r| r.table_id == table_id)
            .cloned()
            .collect())
    }

    fn find_row_hashes(&self, table_id: &str, hashes: &HashSet<String>) -> Result<HashSet<String>> {
        Ok(self
            .working
            .rows
            .values()
            .filter(|r| r.table_id == table_id && hashes.contains(&r.row_hash))
            .map(|r| r.row_hash.clone())
            .collect())
    }

    fn insert_rows(
        &mut self,
        table_id: &str,
        rows: Vec<NewRow>,
        on_conflict: OnConflict,
    ) -> Result<Vec<Row>> {
        self.working.require_table(table_id)?;
        let mut taken = self.working.table_hashes(table_id);

        // Resolve conflicts before writing anything.
        let mut accepted = Vec::with_capacity(rows.len());
        for row in rows {
            if taken.insert(row.canonical.row_hash.clone()) {
                accepted.push(row);
                continue;
            }
            match on_conflict {
                OnConflict::Ignore => {
                    warn!(table_id, row_hash = %row.canonical.row_hash, "ignoring conflicting insert");
                }
                OnConflict::Error => {
                    return Err(LookupError::StorageConflict {
                        table_id: table_id.to_string(),
                        row_hash: row.canonical.row_hash,
                    });
                }
            }
        }

        let now = Utc::now();
        let mut inserted = Vec::with_capacity(accepted.len());
        for row in accepted {
            let id = self.working.generate_id("row");
            let stored = Row {
                id: id.clone(),
                table_id: table_id.to_string(),
                values: row.canonical.values,
                row_hash: row.canonical.row_hash,
                sort_order: row.sort_order,
                created_at: now,
                updated_at: now,
            };
            self.working.rows.insert(id, stored.clone());
            inserted.push(stored);
        }

        debug!(table_id, inserted = inserted.len(), "inserted rows");
        Ok(inserted)
    }

    fn get_row(&self, row_id: &str) -> Result<Option<Row>> {
        Ok(self.working.rows.get(row_id).cloned())
    }

    fn update_row(&mut self, row_id: &str, patch: RowPatch) -> Result<Row> {
        let table_id = match self.working.rows.get(row_id) {
            Some(row) => row.table_id.clone(),
            None => {
                return Err(LookupError::Storage(format!("Row '{}' does not exist", row_id)));
            }
        };

        let collides = self
            .working
            .rows
            .values()
            .any(|r| r.id != row_id && r.table_id == table_id && r.row_hash == patch.row_hash);
        if collides {
            return Err(LookupError::StorageConflict {
                table_id,
                row_hash: patch.row_hash,
            });
        }

        let row = self
            .working
            .rows
            .get_mut(row_id)
            .ok_or_else(|| LookupError::Storage(format!("Row '{}' does not exist", row_id)))?;
        row.values = patch.values;
        row.row_hash = patch.row_hash;
        row.sort_order = patch.sort_order;
        row.updated_at = Utc::now();
        Ok(row.clone())
    }

    fn delete_row(&mut self, row_id: &str) -> Result<()> {
        match self.working.rows.shift_remove(row_id) {
            Some(_) => Ok(()),
            None => Err(LookupError::Storage(format!("Row '{}' does not exist", row_id))),
        }
    }

    fn commit(self: Box<Self>) -> Result<()> {
        let MemoryTransaction { mut guard, working } = *self;
        *guard = working;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::row::{canonicalize, RawRow};

    fn setup(store: &MemoryStore) -> (Table, Vec<Column>) {
        let mut tx = store.begin().unwrap();
        let table = tx.insert_table("parts", None).unwrap();
        tx.insert_column(&table.id, "Name", DataType::String, 0).unwrap();
        let columns = tx.list_columns(&table.id).unwrap();
        tx.commit().unwrap();
        (table, columns)
    }

    fn new_row(table: &Table, columns: &[Column], name: &str) -> NewRow {
        let raw = RawRow::new([(columns[0].id.clone(), name)]);
        NewRow::new(canonicalize(&table.id, columns, &raw.values), 0)
    }

    #[test]
    fn test_uncommitted_writes_are_discarded() {
        let store = MemoryStore::new();
        let (table, columns) = setup(&store);

        {
            let mut tx = store.begin().unwrap();
            tx.insert_rows(&table.id, vec![new_row(&table, &columns, "bolt")], OnConflict::Error)
                .unwrap();
            assert_eq!(tx.find_rows_by_table(&table.id).unwrap().len(), 1);
        }

        assert!(store.snapshot().rows.is_empty());
    }

    #[test]
    fn test_insert_ignore_skips_conflicts() {
        let store = MemoryStore::new();
        let (table, columns) = setup(&store);

        let mut tx = store.begin().unwrap();
        let rows = vec![
            new_row(&table, &columns, "bolt"),
            new_row(&table, &columns, "bolt"),
            new_row(&table, &columns, "nut"),
        ];
        let inserted = tx.insert_rows(&table.id, rows, OnConflict::Ignore).unwrap();
        assert_eq!(inserted.len(), 2);
    }

    #[test]
    fn test_insert_error_on_conflict() {
        let store = MemoryStore::new();
        let (table, columns) = setup(&store);

        let mut tx = store.begin().unwrap();
        tx.insert_rows(&table.id, vec![new_row(&table, &columns, "bolt")], OnConflict::Error)
            .unwrap();
        let err = tx
            .insert_rows(&table.id, vec![new_row(&table, &columns, "bolt")], OnConflict::Error)
            .unwrap_err();
        assert!(matches!(err, LookupError::StorageConflict { .. }));
    }

    #[test]
    fn test_columns_scoped_to_table() {
        let store = MemoryStore::new();
        let (table, columns) = setup(&store);

        let mut tx = store.begin().unwrap();
        let other = tx.insert_table("other", Some("second table")).unwrap();
        assert!(tx.get_column(&other.id, &columns[0].id).unwrap().is_none());
        assert!(tx.get_column(&table.id, &columns[0].id).unwrap().is_some());
        assert!(tx.remove_column(&other.id, &columns[0].id).is_err());
    }

    #[test]
    fn test_generated_ids_are_unique() {
        let mut db = Database::new();
        let a = db.generate_id("row");
        let b = db.generate_id("row");
        assert_ne!(a, b);
        assert!(a.starts_with("row_"));
    }
}
