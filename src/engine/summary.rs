//! Aggregate counts over a task list.

use super::types::{Task, TaskStatus};
use serde::Serialize;

/// Aggregate counts of tasks by status.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub pending: usize,
    pub completed: usize,
    pub deleted: usize,
    pub waiting: usize,
    pub recurring: usize,
    pub other: usize,
}

impl StatusCounts {
    #[must_use]
    pub fn from_tasks(tasks: &[Task]) -> Self {
        let mut counts = Self::default();
        for task in tasks {
            match task.status {
                TaskStatus::Pending => counts.pending += 1,
                TaskStatus::Completed => counts.completed += 1,
                TaskStatus::Deleted => counts.deleted += 1,
                TaskStatus::Waiting => counts.waiting += 1,
                TaskStatus::Recurring => counts.recurring += 1,
                TaskStatus::Other(_) => counts.other += 1,
            }
        }
        counts
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.pending + self.completed + self.deleted + self.waiting + self.recurring + self.other
    }
}
