//! Handler for the `list` command.

use anyhow::Result;
use taskboard::config::BoardConfig;
use taskboard::engine::sort::{self, SortSpec};
use taskboard::{Task, TaskCollection, TaskStatus};

/// Lists every task, or only completed ones.
///
/// # Errors
/// Returns error if the sort spec is invalid or the store cannot be read.
pub fn handle(
    config: &BoardConfig,
    completed: bool,
    json: bool,
    order_by: Option<&str>,
) -> Result<()> {
    let sort = config.order_for(order_by)?;
    let (board, controller) = super::open_board(config, sort)?;

    let tasks = if completed {
        controller.tasks_with_status(&TaskStatus::Completed)
    } else {
        let order = order_by.map(|_| controller.sort_spec());
        all_tasks(board.borrow().tasks(), order)
    };

    if json {
        return super::print_json(&tasks);
    }

    let title = if completed { "Completed" } else { "All tasks" };
    super::print_tasks(title, &tasks);
    Ok(())
}

/// Every task, in store order unless `order` is given.
fn all_tasks(tasks: &[Task], order: Option<&SortSpec>) -> Vec<Task> {
    match order {
        Some(order) => sort::filter_sorted(tasks, |_| true, order),
        None => tasks.to_vec(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tasks() -> Vec<Task> {
        vec![
            Task::new("low").with_id(1).with_urgency(1.0),
            Task::new("done").with_id(2).with_urgency(9.0).with_status(TaskStatus::Completed),
            Task::new("high").with_id(3).with_urgency(5.0),
        ]
    }

    fn ids(tasks: &[Task]) -> Vec<i64> {
        tasks.iter().map(|t| t.id).collect()
    }

    #[test]
    fn test_full_listing_keeps_store_order_by_default() {
        assert_eq!(ids(&all_tasks(&tasks(), None)), vec![1, 2, 3]);
    }

    #[test]
    fn test_full_listing_honours_order_by() {
        let order = SortSpec::parse("urgency").unwrap();
        assert_eq!(ids(&all_tasks(&tasks(), Some(&order))), vec![1, 3, 2]);
    }
}
