//! Persistence for the in-memory store - save/load JSON files.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{LookupError, Result};

use super::memory::{Database, MemoryStore};

impl MemoryStore {
    /// Save the committed state to a JSON file.
    ///
    /// The store is written to a sibling `.tmp` file first and renamed over
    /// `path` only once fully written, so a failed save leaves the previous
    /// file intact.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use lookup::store::MemoryStore;
    /// # fn example(store: &MemoryStore) -> lookup::Result<()> {
    /// store.save("lookup.json")?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| {
                    LookupError::Persistence(format!(
                        "Failed to create directory '{}': {}",
                        parent.display(),
                        e
                    ))
                })?;
            }
        }

        let db = self.snapshot();
        let tmp_path = temp_path(path);
        if let Err(e) = write_json(&tmp_path, &db) {
            let _ = fs::remove_file(&tmp_path);
            return Err(e);
        }

        fs::rename(&tmp_path, path).map_err(|e| {
            let _ = fs::remove_file(&tmp_path);
            LookupError::Persistence(format!(
                "Failed to replace '{}': {}",
                path.display(),
                e
            ))
        })?;

        debug!(path = %path.display(), rows = db.rows.len(), "saved store");
        Ok(())
    }

    /// Load a store from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let file = File::open(path).map_err(|e| LookupError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        let reader = BufReader::new(file);
        let db: Database = serde_json::from_reader(reader).map_err(|e| {
            LookupError::Persistence(format!(
                "Failed to parse store '{}': {}",
                path.display(),
                e
            ))
        })?;

        Ok(Self::from_database(db))
    }

    /// Load a store from a JSON file, or start empty if the file does not exist.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::new())
        }
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

fn write_json(path: &Path, db: &Database) -> Result<()> {
    let file = File::create(path).map_err(|e| {
        LookupError::Persistence(format!(
            "Failed to create file '{}': {}",
            path.display(),
            e
        ))
    })?;

    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, db)
        .map_err(|e| LookupError::Persistence(format!("Failed to serialize store: {}", e)))?;

    let file = writer.into_inner().map_err(|e| LookupError::Io {
        path: path.to_path_buf(),
        source: e.into_error(),
    })?;
    file.sync_all().map_err(|e| LookupError::Io {
        path: path.to_path_buf(),
        source: e,
    })
}
