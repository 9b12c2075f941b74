//! Observable task collection.
//!
//! `TaskCollection` is the contract a view-model reads from: an ordered
//! slice of records, an `update()` that reloads them from the backing
//! source, and change notifications. `ObservableTasks` is the in-memory
//! implementation used by the CLI and the tests.

use super::error::StoreError;
use super::types::{Task, TaskField, TaskStatus};
use log::debug;

/// Change notification emitted by a collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CollectionEvent {
    RowsAdded { index: usize, count: usize },
    RowsRemoved { index: usize, count: usize },
    RowChanged { index: usize, field: TaskField },
    /// Everything may have changed (reload).
    Reset,
}

impl CollectionEvent {
    /// Whether this event can change a view that reads `dependencies`.
    ///
    /// Membership changes and resets always do.
    #[must_use]
    pub fn touches(&self, dependencies: &[TaskField]) -> bool {
        match self {
            Self::RowChanged { field, .. } => dependencies.contains(field),
            Self::RowsAdded { .. } | Self::RowsRemoved { .. } | Self::Reset => true,
        }
    }
}

/// Handle returned by `subscribe`, used to detach the listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub(crate) u64);

pub type Listener = Box<dyn Fn(&CollectionEvent)>;

/// The contract a view-model consumes.
pub trait TaskCollection {
    /// Current records, in collection order.
    fn tasks(&self) -> &[Task];

    /// Re-fetches the records from the backing source and notifies
    /// listeners.
    ///
    /// # Errors
    /// Returns whatever error the backing source reports.
    fn update(&mut self) -> Result<(), StoreError>;

    fn subscribe(&mut self, listener: Listener) -> SubscriptionId;

    /// Detaches a listener. Returns `false` if it was not attached.
    fn unsubscribe(&mut self, id: SubscriptionId) -> bool;
}

/// Where a collection loads its records from.
pub trait TaskSource {
    /// Loads every record in source order.
    ///
    /// # Errors
    /// Returns an error if the source cannot be read.
    fn load(&self) -> Result<Vec<Task>, StoreError>;
}

/// A fixed list of records. Useful as a fixture.
impl TaskSource for Vec<Task> {
    fn load(&self) -> Result<Vec<Task>, StoreError> {
        Ok(self.clone())
    }
}

#[derive(Default)]
struct Listeners {
    next_id: u64,
    entries: Vec<(SubscriptionId, Listener)>,
}

impl Listeners {
    fn add(&mut self, listener: Listener) -> SubscriptionId {
        self.next_id += 1;
        let id = SubscriptionId(self.next_id);
        self.entries.push((id, listener));
        id
    }

    fn remove(&mut self, id: SubscriptionId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry_id, _)| *entry_id != id);
        self.entries.len() != before
    }

    fn emit(&self, event: &CollectionEvent) {
        for (_, listener) in &self.entries {
            listener(event);
        }
    }
}

/// In-memory, observable list of tasks backed by a `TaskSource`.
///
/// The edit methods change the in-memory records only; they never write
/// through to the source. A later `update()` replaces local edits with
/// whatever the source holds.
pub struct ObservableTasks<S> {
    tasks: Vec<Task>,
    source: S,
    listeners: Listeners,
}

impl<S: TaskSource> ObservableTasks<S> {
    /// Creates an empty collection. Call `update()` to populate it.
    #[must_use]
    pub fn new(source: S) -> Self {
        Self {
            tasks: Vec::new(),
            source,
            listeners: Listeners::default(),
        }
    }

    /// Creates a collection and loads it from `source`.
    ///
    /// # Errors
    /// Returns an error if the initial load fails.
    pub fn load(source: S) -> Result<Self, StoreError> {
        let mut collection = Self::new(source);
        collection.update()?;
        Ok(collection)
    }

    #[must_use]
    pub fn source(&self) -> &S {
        &self.source
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    #[must_use]
    pub fn find(&self, uuid: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.uuid == uuid)
    }

    #[must_use]
    pub fn position(&self, uuid: &str) -> Option<usize> {
        self.tasks.iter().position(|t| t.uuid == uuid)
    }

    /// Appends a record.
    pub fn push(&mut self, task: Task) {
        let index = self.tasks.len();
        self.tasks.push(task);
        self.listeners
            .emit(&CollectionEvent::RowsAdded { index, count: 1 });
    }

    /// Removes the record with `uuid`, if present.
    pub fn remove(&mut self, uuid: &str) -> Option<Task> {
        let index = self.position(uuid)?;
        let task = self.tasks.remove(index);
        self.listeners
            .emit(&CollectionEvent::RowsRemoved { index, count: 1 });
        Some(task)
    }

    /// Sets the status of the record with `uuid`.
    ///
    /// Returns `false` if no record matched or the status was unchanged.
    pub fn set_status(&mut self, uuid: &str, status: TaskStatus) -> bool {
        self.modify(uuid, TaskField::Status, |task| {
            if task.status == status {
                return false;
            }
            task.status = status;
            true
        })
    }

    /// Sets the urgency of the record with `uuid`.
    pub fn set_urgency(&mut self, uuid: &str, urgency: f64) -> bool {
        self.modify(uuid, TaskField::Urgency, |task| {
            if task.urgency.total_cmp(&urgency).is_eq() {
                return false;
            }
            task.urgency = urgency;
            true
        })
    }

    /// Sets the description of the record with `uuid`.
    pub fn set_description(&mut self, uuid: &str, description: &str) -> bool {
        self.modify(uuid, TaskField::Description, |task| {
            if task.description == description {
                return false;
            }
            task.description = description.to_string();
            true
        })
    }

    /// Replaces every record at once.
    pub fn replace_all(&mut self, tasks: Vec<Task>) {
        self.tasks = tasks;
        self.listeners.emit(&CollectionEvent::Reset);
    }

    fn modify<F>(&mut self, uuid: &str, field: TaskField, edit: F) -> bool
    where
        F: FnOnce(&mut Task) -> bool,
    {
        let Some(index) = self.position(uuid) else {
            return false;
        };
        if !edit(&mut self.tasks[index]) {
            return false;
        }
        self.listeners
            .emit(&CollectionEvent::RowChanged { index, field });
        true
    }
}

impl<S: TaskSource> TaskCollection for ObservableTasks<S> {
    fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    fn update(&mut self) -> Result<(), StoreError> {
        let tasks = self.source.load()?;
        debug!(
            "event=collection_update module=collection status=ok count={}",
            tasks.len()
        );
        self.replace_all(tasks);
        Ok(())
    }

    fn subscribe(&mut self, listener: Listener) -> SubscriptionId {
        self.listeners.add(listener)
    }

    fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.listeners.remove(id)
    }
}
