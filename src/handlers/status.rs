//! Handler for the `status` command.

use anyhow::Result;
use colored::Colorize;
use serde::Serialize;
use taskboard::config::BoardConfig;
use taskboard::engine::summary::StatusCounts;
use taskboard::{Task, TaskCollection};

const TOP_PENDING: usize = 5;

#[derive(Serialize)]
struct StatusReport {
    counts: StatusCounts,
    order: String,
    top: Vec<Task>,
}

/// Displays counts by status and the head of the pending view.
///
/// # Errors
/// Returns error if the store cannot be read.
pub fn handle(config: &BoardConfig, json: bool) -> Result<()> {
    let (board, controller) = super::open_board(config, config.default_order.clone())?;
    let counts = StatusCounts::from_tasks(board.borrow().tasks());
    let top: Vec<Task> = controller
        .pending_tasks()
        .into_iter()
        .take(TOP_PENDING)
        .collect();

    if json {
        let report = StatusReport {
            counts,
            order: controller.sort_spec().to_string(),
            top,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("{} Task Board Status", "📊".cyan());
    println!(
        "   {} pending, {} completed, {} deleted, {} waiting, {} recurring",
        counts.pending.to_string().yellow(),
        counts.completed.to_string().green(),
        counts.deleted.to_string().red(),
        counts.waiting,
        counts.recurring
    );
    if counts.other > 0 {
        println!("   {} with other status", counts.other);
    }
    println!("   {} total", counts.total());

    if !top.is_empty() {
        println!("\n   Next up:");
        for task in &top {
            println!(
                "     - [{}] {} {}",
                super::task_ref(task).dimmed(),
                task.description,
                format!("({:.1})", task.urgency).dimmed()
            );
        }
    }
    Ok(())
}
