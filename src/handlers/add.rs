//! Handler for the `add` command.

use anyhow::Result;
use colored::Colorize;
use log::info;
use taskboard::config::BoardConfig;
use taskboard::engine::repo::SqliteSource;
use taskboard::engine::types::parse_date;
use taskboard::Task;

/// Fields accepted by `add` beyond the description.
#[derive(Debug, Default)]
pub struct AddOptions {
    pub urgency: Option<f64>,
    pub project: Option<String>,
    pub priority: Option<String>,
    pub due: Option<String>,
    pub tags: Vec<String>,
}

/// Adds a pending task to the store.
///
/// # Errors
/// Returns error if the due date is malformed or the insert fails.
pub fn handle(config: &BoardConfig, description: &str, opts: AddOptions) -> Result<()> {
    let source = SqliteSource::open(&config.db_path)?;

    let mut task = Task::new(description).with_urgency(opts.urgency.unwrap_or(0.0));
    task.project = opts.project;
    task.priority = opts.priority.map(|p| p.to_ascii_uppercase());
    task.due = opts.due.as_deref().map(parse_date).transpose()?;
    task.tags = opts.tags;

    let id = source.repo().add(&task)?;
    info!(
        "event=task_added module=handlers id={} uuid={}",
        id, task.uuid
    );

    println!(
        "{} Created task {} [{}] {}",
        "✓".green(),
        id.to_string().yellow(),
        super::short_uuid(&task.uuid).dimmed(),
        task.description
    );
    Ok(())
}
