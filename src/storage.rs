//! Storage for daily and yearly CSV files.
//!
//! The pipeline only needs to check, read, write and list named blobs, so it is
//! written against [`RecordStore`]. [`FsStore`] keeps them as files in the output
//! directory; [`MemoryStore`] keeps them in a map.

use crate::errors::{AppError, AppResult};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

pub trait RecordStore {
    /// Returns whether an entry with this name exists.
    fn exists(&self, name: &str) -> AppResult<bool>;
    fn read(&self, name: &str) -> AppResult<Vec<u8>>;
    /// Creates or replaces an entry.
    fn write(&mut self, name: &str, contents: &[u8]) -> AppResult<()>;
    /// Names of all entries, in no particular order.
    fn list(&self) -> AppResult<Vec<String>>;
}

/// A flat directory of files.
#[derive(Debug, Clone)]
pub struct FsStore {
    root: PathBuf,
}

impl FsStore {
    /// Opens the directory, creating it if it doesn't exist.
    pub fn open(root: impl Into<PathBuf>) -> AppResult<Self> {
        let root = root.into();
        if !root.exists() {
            fs::create_dir_all(&root).map_err(|e| {
                AppError::IoError(format!(
                    "Failed to create directory {}: {e}",
                    root.display()
                ))
            })?;
        }
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_of(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }
}

impl RecordStore for FsStore {
    fn exists(&self, name: &str) -> AppResult<bool> {
        Ok(self.path_of(name).is_file())
    }

    fn read(&self, name: &str) -> AppResult<Vec<u8>> {
        let path = self.path_of(name);
        fs::read(&path)
            .map_err(|e| AppError::IoError(format!("Failed to read {}: {e}", path.display())))
    }

    fn write(&mut self, name: &str, contents: &[u8]) -> AppResult<()> {
        let file_path = self.path_of(name);
        let tmp_path = self.path_of(&format!("{name}.part"));

        fs::write(&tmp_path, contents).map_err(|e| {
            AppError::IoError(format!(
                "Failed to write temp file {}: {e}",
                tmp_path.display()
            ))
        })?;

        // Rename so an interrupted run never leaves a truncated file under the final name
        fs::rename(&tmp_path, &file_path).map_err(|e| {
            AppError::IoError(format!(
                "Failed to rename temp file {} to {}: {e}",
                tmp_path.display(),
                file_path.display()
            ))
        })?;

        debug!(file_path = %file_path.display(), bytes = contents.len(), "File written");
        Ok(())
    }

    fn list(&self) -> AppResult<Vec<String>> {
        let mut names = Vec::new();
        let walker = walkdir::WalkDir::new(&self.root)
            .min_depth(1)
            .max_depth(1)
            .into_iter();
        for entry in walker {
            let entry = entry.map_err(|e| {
                AppError::IoError(format!(
                    "Failed to list {}: {e}",
                    self.root.display()
                ))
            })?;
            if entry.file_type().is_file() {
                if let Some(name) = entry.file_name().to_str() {
                    names.push(name.to_string());
                }
            }
        }
        Ok(names)
    }
}

/// In-memory store, mainly for tests and dry runs.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: BTreeMap<String, Vec<u8>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn remove(&mut self, name: &str) -> Option<Vec<u8>> {
        self.entries.remove(name)
    }
}

impl RecordStore for MemoryStore {
    fn exists(&self, name: &str) -> AppResult<bool> {
        Ok(self.entries.contains_key(name))
    }

    fn read(&self, name: &str) -> AppResult<Vec<u8>> {
        self.entries
            .get(name)
            .cloned()
            .ok_or_else(|| AppError::IoError(format!("No such entry: {name}")))
    }

    fn write(&mut self, name: &str, contents: &[u8]) -> AppResult<()> {
        self.entries.insert(name.to_string(), contents.to_vec());
        Ok(())
    }

    fn list(&self) -> AppResult<Vec<String>> {
        Ok(self.entries.keys().cloned().collect())
    }
}
