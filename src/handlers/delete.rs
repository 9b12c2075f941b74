//! Handler for the `delete` command.

use anyhow::Result;
use taskboard::config::BoardConfig;
use taskboard::TaskStatus;

/// Marks a task deleted and prints the refreshed pending view.
///
/// # Errors
/// Returns error if the reference does not resolve or the update fails.
pub fn handle(config: &BoardConfig, reference: &str) -> Result<()> {
    super::done::close(config, reference, &TaskStatus::Deleted)
}
