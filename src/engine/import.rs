//! Taskwarrior export reader.
//!
//! Accepts the JSON array produced by `task export`, and the older
//! one-object-per-line form (with or without trailing commas).

use super::collection::TaskSource;
use super::error::StoreResult;
use super::types::Task;
use std::fs;
use std::path::{Path, PathBuf};

/// Parses export text into tasks, in file order.
///
/// # Errors
/// Returns `StoreError::Json` if any record is malformed.
pub fn parse_export(raw: &str) -> StoreResult<Vec<Task>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }
    if trimmed.starts_with('[') {
        return Ok(serde_json::from_str(trimmed)?);
    }

    let mut tasks = Vec::new();
    for line in trimmed.lines() {
        let line = line.trim().trim_end_matches(',');
        if line.is_empty() {
            continue;
        }
        tasks.push(serde_json::from_str(line)?);
    }
    Ok(tasks)
}

/// Reads and parses an export file.
///
/// # Errors
/// Returns an error if the file cannot be read or parsed.
pub fn read_export(path: &Path) -> StoreResult<Vec<Task>> {
    let raw = fs::read_to_string(path)?;
    parse_export(&raw)
}

/// A `TaskSource` that re-reads an export file on every load.
pub struct JsonExportSource {
    path: PathBuf,
}

impl JsonExportSource {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TaskSource for JsonExportSource {
    fn load(&self) -> StoreResult<Vec<Task>> {
        read_export(&self.path)
    }
}
