//! Handler for the `import` command.

use anyhow::{Context, Result};
use colored::Colorize;
use log::info;
use std::path::Path;
use taskboard::config::BoardConfig;
use taskboard::engine::import::read_export;
use taskboard::engine::repo::SqliteSource;

/// Loads a Taskwarrior export into the store, matching records by uuid.
///
/// # Errors
/// Returns error if the file cannot be parsed or a write fails.
pub fn handle(config: &BoardConfig, file: &Path) -> Result<()> {
    let tasks =
        read_export(file).with_context(|| format!("failed to read {}", file.display()))?;

    let mut source = SqliteSource::open(&config.db_path)?;
    let (added, updated) = source.import(&tasks)?;

    info!(
        "event=import module=handlers file={} added={} updated={}",
        file.display(),
        added,
        updated
    );
    println!(
        "{} Imported {} task(s): {} new, {} updated",
        "✓".green(),
        tasks.len(),
        added.to_string().cyan(),
        updated.to_string().cyan()
    );
    Ok(())
}
