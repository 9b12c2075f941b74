//! Handler for the `show` command.

use anyhow::Result;
use chrono::{DateTime, Utc};
use colored::Colorize;
use taskboard::config::BoardConfig;
use taskboard::engine::resolver::TaskResolver;
use taskboard::{Task, TaskCollection};

/// Prints one task in full.
///
/// # Errors
/// Returns error if the reference does not resolve or the store cannot be read.
pub fn handle(config: &BoardConfig, reference: &str, json: bool) -> Result<()> {
    let (board, _controller) = super::open_board(config, config.default_order.clone())?;
    let board = board.borrow();
    let task = TaskResolver::new(board.tasks()).resolve(reference)?;

    if json {
        println!("{}", serde_json::to_string_pretty(task)?);
        return Ok(());
    }

    print_human(task);
    Ok(())
}

fn print_human(task: &Task) {
    println!(
        "{} [{}] {}",
        "🔎".cyan(),
        super::task_ref(task).yellow(),
        task.description.bold()
    );
    println!("   uuid:      {}", task.uuid.dimmed());
    println!("   status:    {}", task.status);
    println!("   urgency:   {:.2}", task.urgency);
    optional("project", task.project.as_deref());
    optional("priority", task.priority.as_deref());

    for (label, date) in [
        ("due", task.due),
        ("scheduled", task.scheduled),
        ("wait", task.wait),
        ("start", task.start),
        ("entry", task.entry),
        ("modified", task.modified),
    ] {
        if let Some(date) = date {
            println!("   {:<10} {}", format!("{label}:"), format_when(&date));
        }
    }

    if !task.tags.is_empty() {
        println!("   tags:      +{}", task.tags.join(" +"));
    }
    if !task.depends.is_empty() {
        let short: Vec<_> = task.depends.iter().map(|u| super::short_uuid(u)).collect();
        println!("   depends:   {}", short.join(", ").dimmed());
    }
    if !task.annotations.is_empty() {
        println!("   annotations:");
        for note in &task.annotations {
            let when = note.entry.as_ref().map(format_when).unwrap_or_default();
            println!("     {} {}", when.dimmed(), note.description);
        }
    }
}

fn optional(label: &str, value: Option<&str>) {
    if let Some(value) = value {
        println!("   {:<10} {}", format!("{label}:"), value);
    }
}

fn format_when(date: &DateTime<Utc>) -> String {
    date.format("%Y-%m-%d %H:%M").to_string()
}
