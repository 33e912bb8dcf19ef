//! Bulk import with deduplication.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::Result;
use crate::row::{canonicalize, RawRow};
use crate::store::{NewRow, OnConflict, Transaction};

use super::load_columns;

/// Outcome of a bulk import.
///
/// Without concurrent writers the four counts add up to the batch size.
/// Under concurrency `skipped_existing` is best-effort: rows that lost an
/// insert race are dropped by the store and appear in no count.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSummary {
    /// Rows actually written.
    pub inserted: usize,
    /// Rows whose values were all null.
    pub skipped_blank: usize,
    /// Rows identical to an earlier row of the same batch.
    pub skipped_duplicate_in_request: usize,
    /// Rows identical to a row already in the table.
    pub skipped_existing: usize,
}

impl ImportSummary {
    /// Sum of all four counts.
    pub fn total(&self) -> usize {
        self.inserted + self.skipped_blank + self.skipped_duplicate_in_request + self.skipped_existing
    }

    /// Number of rows not written.
    pub fn skipped(&self) -> usize {
        self.skipped_blank + self.skipped_duplicate_in_request + self.skipped_existing
    }
}

/// Import many rows, skipping blanks and anything that would duplicate a row.
///
/// Within the batch the first occurrence of a row wins. The final write uses
/// insert-ignore, so a row inserted by another writer after the existence
/// check is silently dropped rather than duplicated.
pub fn import_rows(
    tx: &mut dyn Transaction,
    table_id: &str,
    rows: &[RawRow],
    default_sort_order: i64,
) -> Result<ImportSummary> {
    let columns = load_columns(tx, table_id)?;
    let mut summary = ImportSummary::default();

    let mut seen: HashSet<String> = HashSet::with_capacity(rows.len());
    let mut candidates: Vec<NewRow> = Vec::with_capacity(rows.len());

    for raw in rows {
        let canonical = canonicalize(table_id, &columns, &raw.values);
        if canonical.is_blank() {
            summary.skipped_blank += 1;
            continue;
        }
        if !seen.insert(canonical.row_hash.clone()) {
            summary.skipped_duplicate_in_request += 1;
            continue;
        }
        candidates.push(NewRow::new(
            canonical,
            raw.sort_order.unwrap_or(default_sort_order),
        ));
    }

    let existing = if candidates.is_empty() {
        HashSet::new()
    } else {
        tx.find_row_hashes(table_id, &seen)?
    };

    let before = candidates.len();
    candidates.retain(|row| !existing.contains(&row.canonical.row_hash));
    summary.skipped_existing = before - candidates.len();

    let attempted = candidates.len();
    if attempted > 0 {
        summary.inserted = tx
            .insert_rows(table_id, candidates, OnConflict::Ignore)?
            .len();
    }

    if summary.inserted < attempted {
        warn!(
            table_id,
            attempted,
            inserted = summary.inserted,
            "some rows were inserted concurrently and skipped"
        );
    }

    info!(
        table_id,
        total = rows.len(),
        inserted = summary.inserted,
        skipped_blank = summary.skipped_blank,
        skipped_duplicate_in_request = summary.skipped_duplicate_in_request,
        skipped_existing = summary.skipped_existing,
        "imported rows"
    );

    Ok(summary)
}
