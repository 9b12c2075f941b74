//! Task Resolver: matches a user reference to a loaded task.
//!
//! A reference is a working id, a full uuid, or a unique uuid prefix.

use super::error::{StoreError, StoreResult};
use super::types::Task;

pub struct TaskResolver<'a> {
    tasks: &'a [Task],
}

impl<'a> TaskResolver<'a> {
    #[must_use]
    pub fn new(tasks: &'a [Task]) -> Self {
        Self { tasks }
    }

    /// Resolves `query` to exactly one task.
    ///
    /// # Errors
    /// Returns `NotFound` if nothing matches and `Ambiguous` if a uuid
    /// prefix matches more than one task.
    pub fn resolve(&self, query: &str) -> StoreResult<&'a Task> {
        let query = query.trim();
        if query.is_empty() {
            return Err(StoreError::NotFound(String::new()));
        }

        if let Ok(id) = query.parse::<i64>() {
            if id > 0 {
                if let Some(task) = self.tasks.iter().find(|t| t.id == id) {
                    return Ok(task);
                }
            }
        }

        if let Some(task) = self
            .tasks
            .iter()
            .find(|t| t.uuid.eq_ignore_ascii_case(query))
        {
            return Ok(task);
        }

        let prefix = query.to_ascii_lowercase();
        let matches: Vec<&'a Task> = self
            .tasks
            .iter()
            .filter(|t| t.uuid.to_ascii_lowercase().starts_with(&prefix))
            .collect();

        match matches.as_slice() {
            [] => Err(StoreError::NotFound(query.to_string())),
            [task] => Ok(*task),
            _ => Err(StoreError::Ambiguous {
                query: query.to_string(),
                count: matches.len(),
            }),
        }
    }
}
