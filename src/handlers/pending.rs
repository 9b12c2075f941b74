//! Handler for the `pending` command.

use anyhow::Result;
use taskboard::config::BoardConfig;

/// Prints the pending view.
///
/// # Errors
/// Returns error if the sort spec is invalid or the store cannot be read.
pub fn handle(config: &BoardConfig, json: bool, order_by: Option<&str>) -> Result<()> {
    let sort = config.order_for(order_by)?;
    let (_board, controller) = super::open_board(config, sort)?;
    let pending = controller.pending_tasks();

    if json {
        return super::print_json(&pending);
    }

    super::print_tasks(&format!("Pending by {}", controller.sort_spec()), &pending);
    Ok(())
}
