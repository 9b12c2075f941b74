//! Sort-and-filter: derives ordered task sequences from a source slice.
//!
//! Every function here is pure. Sorting is stable, so tasks that compare
//! equal on every key keep the order they had in the source.

use super::error::StoreError;
use super::types::{Task, TaskField};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// A task attribute that can order a view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Urgency,
    Due,
    Entry,
    Modified,
    Description,
    Project,
    Priority,
    Id,
}

impl SortKey {
    /// The record field this key reads, if it can change after load.
    #[must_use]
    pub fn field(self) -> Option<TaskField> {
        match self {
            Self::Urgency => Some(TaskField::Urgency),
            Self::Due => Some(TaskField::Due),
            Self::Entry => Some(TaskField::Entry),
            Self::Modified => Some(TaskField::Modified),
            Self::Description => Some(TaskField::Description),
            Self::Project => Some(TaskField::Project),
            Self::Priority => Some(TaskField::Priority),
            Self::Id => None,
        }
    }

    /// Ascending comparison. Missing values sort first.
    fn compare(self, a: &Task, b: &Task) -> Ordering {
        match self {
            // `+ 0.0` folds -0.0 into 0.0 so equal urgencies stay in source order.
            Self::Urgency => (a.urgency + 0.0).total_cmp(&(b.urgency + 0.0)),
            Self::Due => a.due.cmp(&b.due),
            Self::Entry => a.entry.cmp(&b.entry),
            Self::Modified => a.modified.cmp(&b.modified),
            Self::Description => a.description.cmp(&b.description),
            Self::Project => a.project.cmp(&b.project),
            Self::Priority => priority_rank(a).cmp(&priority_rank(b)),
            Self::Id => a.id.cmp(&b.id),
        }
    }

    fn name(self) -> &'static str {
        match self {
            Self::Urgency => "urgency",
            Self::Due => "due",
            Self::Entry => "entry",
            Self::Modified => "modified",
            Self::Description => "description",
            Self::Project => "project",
            Self::Priority => "priority",
            Self::Id => "id",
        }
    }
}

impl FromStr for SortKey {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "urgency" => Ok(Self::Urgency),
            "due" => Ok(Self::Due),
            "entry" => Ok(Self::Entry),
            "modified" => Ok(Self::Modified),
            "description" => Ok(Self::Description),
            "project" => Ok(Self::Project),
            "priority" => Ok(Self::Priority),
            "id" => Ok(Self::Id),
            _ => Err(StoreError::InvalidSortKey(s.trim().to_string())),
        }
    }
}

/// Taskwarrior priorities rank H > M > L > none.
fn priority_rank(task: &Task) -> u8 {
    match task.priority.as_deref() {
        Some("H") => 3,
        Some("M") => 2,
        Some("L") => 1,
        _ => 0,
    }
}

/// One key of a sort specification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortField {
    pub key: SortKey,
    pub ascending: bool,
}

/// Ordered list of sort keys, compared lexicographically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    fields: Vec<SortField>,
}

impl SortSpec {
    #[must_use]
    pub fn new(fields: Vec<SortField>) -> Self {
        Self { fields }
    }

    #[must_use]
    pub fn by(key: SortKey, ascending: bool) -> Self {
        Self::new(vec![SortField { key, ascending }])
    }

    /// Highest urgency first.
    #[must_use]
    pub fn urgency_descending() -> Self {
        Self::by(SortKey::Urgency, false)
    }

    /// Parses an `order_by` expression such as `-urgency,due`.
    ///
    /// A leading `-` makes a key descending. A blank expression yields the
    /// default (`-urgency`).
    ///
    /// # Errors
    /// Returns `StoreError::InvalidSortKey` for an unknown key.
    pub fn parse(raw: &str) -> Result<Self, StoreError> {
        let mut fields = Vec::new();
        for part in raw.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let (name, ascending) = match part.strip_prefix('-') {
                Some(rest) => (rest, false),
                None => (part, true),
            };
            fields.push(SortField {
                key: name.parse()?,
                ascending,
            });
        }

        if fields.is_empty() {
            return Ok(Self::default());
        }
        Ok(Self::new(fields))
    }

    #[must_use]
    pub fn fields(&self) -> &[SortField] {
        &self.fields
    }

    /// Record fields whose changes can reorder a view sorted by this spec.
    #[must_use]
    pub fn dependencies(&self) -> Vec<TaskField> {
        self.fields.iter().filter_map(|f| f.key.field()).collect()
    }

    #[must_use]
    pub fn compare(&self, a: &Task, b: &Task) -> Ordering {
        for field in &self.fields {
            let ord = field.key.compare(a, b);
            let ord = if field.ascending { ord } else { ord.reverse() };
            if ord != Ordering::Equal {
                return ord;
            }
        }
        Ordering::Equal
    }
}

impl Default for SortSpec {
    fn default() -> Self {
        Self::urgency_descending()
    }
}

impl fmt::Display for SortSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .fields
            .iter()
            .map(|field| {
                let sign = if field.ascending { "" } else { "-" };
                format!("{sign}{}", field.key.name())
            })
            .collect();
        f.write_str(&parts.join(","))
    }
}

/// Positions in `tasks` of the records that pass `keep`, ordered by `spec`.
pub fn filter_sorted_indices<F>(tasks: &[Task], keep: F, spec: &SortSpec) -> Vec<usize>
where
    F: Fn(&Task) -> bool,
{
    let mut indices: Vec<usize> = tasks
        .iter()
        .enumerate()
        .filter(|(_, task)| keep(task))
        .map(|(i, _)| i)
        .collect();

    indices.sort_by(|&a, &b| spec.compare(&tasks[a], &tasks[b]));
    indices
}

/// Fresh copy of the records that pass `keep`, ordered by `spec`.
pub fn filter_sorted<F>(tasks: &[Task], keep: F, spec: &SortSpec) -> Vec<Task>
where
    F: Fn(&Task) -> bool,
{
    filter_sorted_indices(tasks, keep, spec)
        .into_iter()
        .map(|i| tasks[i].clone())
        .collect()
}

/// Pending tasks ordered by `spec`.
#[must_use]
pub fn pending_sorted(tasks: &[Task], spec: &SortSpec) -> Vec<Task> {
    filter_sorted(tasks, Task::is_pending, spec)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::types::{parse_date, TaskStatus};

    fn make_task(id: i64, status: TaskStatus, urgency: f64) -> Task {
        Task::new(&format!("task {id}"))
            .with_id(id)
            .with_uuid(&format!("uuid-{id}"))
            .with_status(status)
            .with_urgency(urgency)
    }

    fn ids(tasks: &[Task]) -> Vec<i64> {
        tasks.iter().map(|t| t.id).collect()
    }

    #[test]
    fn test_pending_sorted_scenario() {
        let tasks = vec![
            make_task(1, TaskStatus::Pending, 5.0),
            make_task(2, TaskStatus::Completed, 9.0),
            make_task(3, TaskStatus::Pending, 9.0),
        ];
        let result = pending_sorted(&tasks, &SortSpec::default());
        assert_eq!(ids(&result), vec![3, 1]);
    }

    #[test]
    fn test_equal_urgency_keeps_source_order() {
        let tasks = vec![
            make_task(4, TaskStatus::Pending, 2.0),
            make_task(1, TaskStatus::Pending, 2.0),
            make_task(9, TaskStatus::Pending, 2.0),
            make_task(2, TaskStatus::Pending, 2.0),
        ];
        let result = pending_sorted(&tasks, &SortSpec::default());
        assert_eq!(ids(&result), vec![4, 1, 9, 2]);
    }

    #[test]
    fn test_ties_are_stable_between_distinct_urgencies() {
        let tasks = vec![
            make_task(1, TaskStatus::Pending, 1.0),
            make_task(2, TaskStatus::Pending, 7.0),
            make_task(3, TaskStatus::Waiting, 8.0),
            make_task(4, TaskStatus::Pending, 1.0),
            make_task(5, TaskStatus::Pending, 7.0),
        ];
        let result = pending_sorted(&tasks, &SortSpec::default());
        assert_eq!(ids(&result), vec![2, 5, 1, 4]);
    }

    #[test]
    fn test_signed_zero_urgencies_are_equal() {
        let tasks = vec![
            make_task(1, TaskStatus::Pending, -0.0),
            make_task(2, TaskStatus::Pending, 0.0),
            make_task(3, TaskStatus::Pending, -0.0),
        ];
        let result = pending_sorted(&tasks, &SortSpec::default());
        assert_eq!(ids(&result), vec![1, 2, 3]);

        let ascending = pending_sorted(&tasks, &SortSpec::by(SortKey::Urgency, true));
        assert_eq!(ids(&ascending), vec![1, 2, 3]);
    }

    #[test]
    fn test_empty_input() {
        assert!(pending_sorted(&[], &SortSpec::default()).is_empty());
    }

    #[test]
    fn test_other_status_is_not_pending() {
        let tasks = vec![make_task(1, TaskStatus::Other("Pending".into()), 1.0)];
        assert!(pending_sorted(&tasks, &SortSpec::default()).is_empty());
    }

    #[test]
    fn test_parse_spec() {
        let spec = SortSpec::parse("-urgency, due").unwrap();
        assert_eq!(
            spec.fields(),
            &[
                SortField {
                    key: SortKey::Urgency,
                    ascending: false
                },
                SortField {
                    key: SortKey::Due,
                    ascending: true
                },
            ]
        );
        assert_eq!(spec.to_string(), "-urgency,due");
        assert_eq!(
            spec.dependencies(),
            vec![TaskField::Urgency, TaskField::Due]
        );
    }

    #[test]
    fn test_parse_blank_is_default() {
        assert_eq!(SortSpec::parse("  ").unwrap(), SortSpec::urgency_descending());
    }

    #[test]
    fn test_parse_rejects_unknown_key() {
        let err = SortSpec::parse("-urgency,colour").unwrap_err();
        assert!(matches!(err, StoreError::InvalidSortKey(k) if k == "colour"));
    }

    #[test]
    fn test_secondary_key_breaks_ties() {
        let mut early = make_task(1, TaskStatus::Pending, 3.0);
        early.due = Some(parse_date("20240101T000000Z").unwrap());
        let mut late = make_task(2, TaskStatus::Pending, 3.0);
        late.due = Some(parse_date("20240601T000000Z").unwrap());
        let tasks = vec![late, early];

        let spec = SortSpec::parse("-urgency,due").unwrap();
        assert_eq!(ids(&pending_sorted(&tasks, &spec)), vec![1, 2]);
    }

    #[test]
    fn test_priority_rank() {
        let mut low = make_task(1, TaskStatus::Pending, 0.0);
        low.priority = Some("L".into());
        let mut high = make_task(2, TaskStatus::Pending, 0.0);
        high.priority = Some("H".into());
        let none = make_task(3, TaskStatus::Pending, 0.0);
        let tasks = vec![low, none, high];

        let spec = SortSpec::parse("-priority").unwrap();
        assert_eq!(ids(&pending_sorted(&tasks, &spec)), vec![2, 1, 3]);
    }

    #[test]
    fn test_filter_sorted_indices_point_into_source() {
        let tasks = vec![
            make_task(1, TaskStatus::Completed, 1.0),
            make_task(2, TaskStatus::Completed, 4.0),
            make_task(3, TaskStatus::Pending, 2.0),
        ];
        let done = filter_sorted_indices(
            &tasks,
            |t| t.status == TaskStatus::Completed,
            &SortSpec::default(),
        );
        assert_eq!(done, vec![1, 0]);
    }
}
