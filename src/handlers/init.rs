//! Handler for the `init` command.

use anyhow::{Context, Result};
use colored::Colorize;
use log::info;
use taskboard::config::BoardConfig;
use taskboard::engine::db::Db;

/// Creates the task store.
///
/// # Errors
/// Returns error if database initialization fails.
pub fn handle(config: &BoardConfig) -> Result<()> {
    Db::init(&config.db_path)
        .with_context(|| format!("failed to initialize {}", config.db_path.display()))?;
    info!(
        "event=store_init module=handlers path={}",
        config.db_path.display()
    );
    println!("{} Initialized {}", "✓".green(), config.db_path.display());
    Ok(())
}
