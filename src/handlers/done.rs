//! Handler for the `done` command.

use anyhow::{bail, Result};
use colored::Colorize;
use log::info;
use taskboard::config::BoardConfig;
use taskboard::engine::resolver::TaskResolver;
use taskboard::{TaskCollection, TaskStatus};

/// Marks a task completed and prints the refreshed pending view.
///
/// # Errors
/// Returns error if the reference does not resolve or the update fails.
pub fn handle(config: &BoardConfig, reference: &str) -> Result<()> {
    close(config, reference, &TaskStatus::Completed)
}

/// Sets `status` on the referenced task in the store, then refreshes the
/// controller so the pending view picks up the change.
///
/// # Errors
/// Returns error if the reference does not resolve or the update fails.
pub fn close(config: &BoardConfig, reference: &str, status: &TaskStatus) -> Result<()> {
    let (board, controller) = super::open_board(config, config.default_order.clone())?;

    let (uuid, description, previous) = {
        let board = board.borrow();
        let task = TaskResolver::new(board.tasks()).resolve(reference)?;
        if &task.status == status {
            bail!("Task '{}' is already {}", task.description, status);
        }
        if !board.source().repo().update_status(&task.uuid, status)? {
            bail!("Task '{}' vanished from the store", task.uuid);
        }
        (task.uuid.clone(), task.description.clone(), task.status.clone())
    };

    info!(
        "event=status_changed module=handlers uuid={} from={} to={}",
        uuid, previous, status
    );
    println!(
        "{} [{}] {} -> {}",
        "✓".green(),
        super::short_uuid(&uuid).yellow(),
        description,
        status.to_string().cyan()
    );

    controller.refresh()?;
    super::print_tasks("Pending", &controller.pending_tasks());
    Ok(())
}
