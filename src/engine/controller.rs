//! Pending-tasks view-model.
//!
//! `TasksController` reads a shared `TaskCollection` and exposes the
//! pending records ordered by a `SortSpec` (highest urgency first by
//! default). The ordering is memoized: a listener on the collection marks
//! it dirty when membership or a dependency field changes, and the next
//! read rebuilds it. The controller never mutates the collection.

use super::collection::{CollectionEvent, SubscriptionId, TaskCollection};
use super::error::StoreError;
use super::sort::{self, SortSpec};
use super::types::{Task, TaskField, TaskStatus};
use log::{debug, info, warn};
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

/// Invalidation state shared with the collection listener.
struct Tracker {
    dirty: Cell<bool>,
    dependencies: RefCell<Vec<TaskField>>,
}

impl Tracker {
    fn new(sort: &SortSpec) -> Self {
        Self {
            dirty: Cell::new(true),
            dependencies: RefCell::new(dependencies_for(sort)),
        }
    }

    fn observe(&self, event: &CollectionEvent) {
        if event.touches(&self.dependencies.borrow()) {
            self.dirty.set(true);
        }
    }
}

/// `status` always, plus whatever the sort keys read.
fn dependencies_for(sort: &SortSpec) -> Vec<TaskField> {
    let mut deps = vec![TaskField::Status];
    for field in sort.dependencies() {
        if !deps.contains(&field) {
            deps.push(field);
        }
    }
    deps
}

fn attach<C: TaskCollection>(model: &Rc<RefCell<C>>, tracker: &Rc<Tracker>) -> SubscriptionId {
    let weak: Weak<Tracker> = Rc::downgrade(tracker);
    model
        .borrow_mut()
        .subscribe(Box::new(move |event: &CollectionEvent| {
            if let Some(tracker) = weak.upgrade() {
                tracker.observe(event);
            }
        }))
}

/// View-model over a task collection.
pub struct TasksController<C: TaskCollection> {
    model: Rc<RefCell<C>>,
    subscription: SubscriptionId,
    tracker: Rc<Tracker>,
    sort: SortSpec,
    /// Positions into `model.tasks()`; `None` until first read.
    pending: RefCell<Option<Vec<usize>>>,
    revision: Cell<u64>,
}

impl<C: TaskCollection> TasksController<C> {
    /// Creates a controller ordering pending tasks by urgency, descending.
    ///
    /// # Panics
    /// Panics if the collection is already borrowed.
    pub fn new(model: Rc<RefCell<C>>) -> Self {
        Self::with_sort(model, SortSpec::default())
    }

    /// Creates a controller ordering pending tasks by `sort`.
    ///
    /// The controller subscribes to `model` here and unsubscribes when
    /// dropped. If the collection is borrowed at drop time the listener
    /// stays registered; it holds only a weak handle and goes inert.
    ///
    /// # Panics
    /// Panics if the collection is already borrowed.
    pub fn with_sort(model: Rc<RefCell<C>>, sort: SortSpec) -> Self {
        let tracker = Rc::new(Tracker::new(&sort));
        let subscription = attach(&model, &tracker);
        Self {
            model,
            subscription,
            tracker,
            sort,
            pending: RefCell::new(None),
            revision: Cell::new(0),
        }
    }

    #[must_use]
    pub fn model(&self) -> &Rc<RefCell<C>> {
        &self.model
    }

    #[must_use]
    pub fn sort_spec(&self) -> &SortSpec {
        &self.sort
    }

    /// Asks the collection to reload itself.
    ///
    /// The collection's change notifications invalidate the pending view;
    /// nothing is recomputed here.
    ///
    /// # Errors
    /// Propagates the collection's `update()` error unchanged.
    ///
    /// # Panics
    /// Panics if the collection is already mutably borrowed.
    pub fn refresh(&self) -> Result<(), StoreError> {
        info!("event=refresh module=controller status=start");
        self.model.borrow_mut().update()
    }

    /// Pending tasks, ordered by the sort spec.
    ///
    /// Rebuilt only when the collection reported a relevant change since
    /// the previous read. Records are read fresh from the collection, so
    /// edits to non-dependency fields show up without a rebuild.
    #[must_use]
    pub fn pending_tasks(&self) -> Vec<Task> {
        self.ensure_fresh();
        let model = self.model.borrow();
        let tasks = model.tasks();
        self.pending
            .borrow()
            .as_deref()
            .unwrap_or_default()
            .iter()
            .filter_map(|&i| tasks.get(i).cloned())
            .collect()
    }

    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.ensure_fresh();
        self.pending.borrow().as_ref().map_or(0, Vec::len)
    }

    /// Whether the next read will rebuild the pending view.
    #[must_use]
    pub fn is_stale(&self) -> bool {
        self.tracker.dirty.get() || self.pending.borrow().is_none()
    }

    /// Number of times the pending view has been rebuilt.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision.get()
    }

    /// Tasks with `status`, ordered by the sort spec. Not memoized.
    #[must_use]
    pub fn tasks_with_status(&self, status: &TaskStatus) -> Vec<Task> {
        let model = self.model.borrow();
        sort::filter_sorted(model.tasks(), |t| &t.status == status, &self.sort)
    }

    /// Points the controller at another collection.
    ///
    /// # Panics
    /// Panics if the new collection is already borrowed.
    pub fn set_model(&mut self, model: Rc<RefCell<C>>) {
        let _ = self.detach();
        self.subscription = attach(&model, &self.tracker);
        self.model = model;
        self.invalidate();
    }

    pub fn set_sort(&mut self, sort: SortSpec) {
        *self.tracker.dependencies.borrow_mut() = dependencies_for(&sort);
        self.sort = sort;
        self.invalidate();
    }

    fn invalidate(&self) {
        self.tracker.dirty.set(true);
    }

    fn ensure_fresh(&self) {
        if !self.is_stale() {
            return;
        }

        let indices = {
            let model = self.model.borrow();
            sort::filter_sorted_indices(model.tasks(), Task::is_pending, &self.sort)
        };
        let revision = self.revision.get() + 1;
        debug!(
            "event=pending_rebuilt module=controller revision={} count={} order={}",
            revision,
            indices.len(),
            self.sort
        );

        *self.pending.borrow_mut() = Some(indices);
        self.tracker.dirty.set(false);
        self.revision.set(revision);
    }

    /// Returns `false` if the collection was borrowed and the listener
    /// could not be removed.
    fn detach(&self) -> bool {
        match self.model.try_borrow_mut() {
            Ok(mut model) => {
                model.unsubscribe(self.subscription);
                true
            }
            Err(_) => {
                warn!(
                    "event=unsubscribe_skipped module=controller reason=collection_borrowed subscription={}",
                    self.subscription.0
                );
                false
            }
        }
    }
}

impl<C: TaskCollection> Drop for TasksController<C> {
    fn drop(&mut self) {
        let _ = self.detach();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::collection::{Listener, ObservableTasks, TaskSource};

    fn make_task(id: i64, status: TaskStatus, urgency: f64) -> Task {
        Task::new(&format!("task {id}"))
            .with_id(id)
            .with_uuid(&format!("uuid-{id}"))
            .with_status(status)
            .with_urgency(urgency)
    }

    fn shared(tasks: Vec<Task>) -> Rc<RefCell<ObservableTasks<Vec<Task>>>> {
        Rc::new(RefCell::new(ObservableTasks::load(tasks).unwrap()))
    }

    fn ids(tasks: &[Task]) -> Vec<i64> {
        tasks.iter().map(|t| t.id).collect()
    }

    /// Collection double that counts `update()` calls.
    #[derive(Default)]
    struct CountingCollection {
        tasks: Vec<Task>,
        updates: usize,
        fail: bool,
        listeners: Vec<Listener>,
    }

    impl TaskCollection for CountingCollection {
        fn tasks(&self) -> &[Task] {
            &self.tasks
        }

        fn update(&mut self) -> Result<(), StoreError> {
            self.updates += 1;
            if self.fail {
                return Err(StoreError::NotFound("backing source".into()));
            }
            for listener in &self.listeners {
                listener(&CollectionEvent::Reset);
            }
            Ok(())
        }

        fn subscribe(&mut self, listener: Listener) -> SubscriptionId {
            self.listeners.push(listener);
            SubscriptionId(self.listeners.len() as u64)
        }

        fn unsubscribe(&mut self, _id: SubscriptionId) -> bool {
            true
        }
    }

    #[test]
    fn test_scenario_filters_and_orders() {
        let model = shared(vec![
            make_task(1, TaskStatus::Pending, 5.0),
            make_task(2, TaskStatus::Completed, 9.0),
            make_task(3, TaskStatus::Pending, 9.0),
        ]);
        let controller = TasksController::new(model);
        assert_eq!(ids(&controller.pending_tasks()), vec![3, 1]);
        assert_eq!(controller.pending_count(), 2);
    }

    #[test]
    fn test_empty_model() {
        let model = Rc::new(RefCell::new(ObservableTasks::new(Vec::<Task>::new())));
        let controller = TasksController::new(model);
        assert!(controller.pending_tasks().is_empty());
    }

    #[test]
    fn test_lazy_and_memoized() {
        let model = shared(vec![make_task(1, TaskStatus::Pending, 1.0)]);
        let controller = TasksController::new(model);

        assert!(controller.is_stale());
        assert_eq!(controller.revision(), 0);

        let _ = controller.pending_tasks();
        let _ = controller.pending_tasks();
        assert_eq!(controller.revision(), 1);
        assert!(!controller.is_stale());
    }

    #[test]
    fn test_status_change_updates_without_refresh() {
        let model = shared(vec![
            make_task(1, TaskStatus::Pending, 5.0),
            make_task(2, TaskStatus::Completed, 9.0),
        ]);
        let controller = TasksController::new(model.clone());
        assert_eq!(ids(&controller.pending_tasks()), vec![1]);

        model.borrow_mut().set_status("uuid-2", TaskStatus::Pending);
        assert!(controller.is_stale());
        assert_eq!(ids(&controller.pending_tasks()), vec![2, 1]);

        model.borrow_mut().set_status("uuid-1", TaskStatus::Completed);
        assert_eq!(ids(&controller.pending_tasks()), vec![2]);
    }

    #[test]
    fn test_urgency_change_reorders() {
        let model = shared(vec![
            make_task(1, TaskStatus::Pending, 5.0),
            make_task(2, TaskStatus::Pending, 1.0),
        ]);
        let controller = TasksController::new(model.clone());
        assert_eq!(ids(&controller.pending_tasks()), vec![1, 2]);

        model.borrow_mut().set_urgency("uuid-2", 8.0);
        assert_eq!(ids(&controller.pending_tasks()), vec![2, 1]);
    }

    #[test]
    fn test_description_edit_does_not_rebuild() {
        let model = shared(vec![make_task(1, TaskStatus::Pending, 5.0)]);
        let controller = TasksController::new(model.clone());
        let _ = controller.pending_tasks();

        model.borrow_mut().set_description("uuid-1", "renamed");
        assert!(!controller.is_stale());

        let pending = controller.pending_tasks();
        assert_eq!(pending[0].description, "renamed");
        assert_eq!(controller.revision(), 1);
    }

    #[test]
    fn test_membership_change_rebuilds() {
        let model = shared(vec![make_task(1, TaskStatus::Pending, 5.0)]);
        let controller = TasksController::new(model.clone());
        let _ = controller.pending_tasks();

        model.borrow_mut().push(make_task(2, TaskStatus::Pending, 6.0));
        assert_eq!(ids(&controller.pending_tasks()), vec![2, 1]);

        model.borrow_mut().remove("uuid-2");
        assert_eq!(ids(&controller.pending_tasks()), vec![1]);
        assert_eq!(controller.revision(), 3);
    }

    #[test]
    fn test_refresh_calls_update_once() {
        let model = Rc::new(RefCell::new(CountingCollection::default()));
        let controller = TasksController::new(model.clone());

        controller.refresh().unwrap();
        assert_eq!(model.borrow().updates, 1);
        controller.refresh().unwrap();
        assert_eq!(model.borrow().updates, 2);
    }

    #[test]
    fn test_refresh_propagates_error() {
        let model = Rc::new(RefCell::new(CountingCollection {
            fail: true,
            ..CountingCollection::default()
        }));
        let controller = TasksController::new(model.clone());

        let err = controller.refresh().unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
        assert_eq!(model.borrow().updates, 1);
    }

    #[test]
    fn test_refresh_picks_up_source_changes() {
        struct Shifting(RefCell<Vec<Vec<Task>>>);

        impl TaskSource for Shifting {
            fn load(&self) -> Result<Vec<Task>, StoreError> {
                Ok(self.0.borrow_mut().pop().unwrap_or_default())
            }
        }

        let source = Shifting(RefCell::new(vec![
            vec![make_task(7, TaskStatus::Pending, 2.0)],
            vec![make_task(1, TaskStatus::Pending, 1.0)],
        ]));
        let model = Rc::new(RefCell::new(ObservableTasks::load(source).unwrap()));
        let controller = TasksController::new(model);
        assert_eq!(ids(&controller.pending_tasks()), vec![1]);

        controller.refresh().unwrap();
        assert!(controller.is_stale());
        assert_eq!(ids(&controller.pending_tasks()), vec![7]);
    }

    #[test]
    fn test_set_model_switches_source() {
        let first = shared(vec![make_task(1, TaskStatus::Pending, 1.0)]);
        let second = shared(vec![make_task(2, TaskStatus::Pending, 1.0)]);
        let mut controller = TasksController::new(first.clone());
        assert_eq!(ids(&controller.pending_tasks()), vec![1]);

        controller.set_model(second);
        assert_eq!(ids(&controller.pending_tasks()), vec![2]);

        first.borrow_mut().push(make_task(3, TaskStatus::Pending, 9.0));
        assert!(!controller.is_stale());
    }

    #[test]
    fn test_set_sort() {
        let model = shared(vec![
            make_task(1, TaskStatus::Pending, 5.0),
            make_task(2, TaskStatus::Pending, 1.0),
        ]);
        let mut controller = TasksController::new(model);
        controller.set_sort(SortSpec::parse("urgency").unwrap());
        assert_eq!(ids(&controller.pending_tasks()), vec![2, 1]);
    }

    #[test]
    fn test_tasks_with_status() {
        let model = shared(vec![
            make_task(1, TaskStatus::Completed, 1.0),
            make_task(2, TaskStatus::Pending, 1.0),
            make_task(3, TaskStatus::Completed, 3.0),
        ]);
        let controller = TasksController::new(model);
        let done = controller.tasks_with_status(&TaskStatus::Completed);
        assert_eq!(ids(&done), vec![3, 1]);
    }

    #[test]
    fn test_drop_unsubscribes() {
        let model = Rc::new(RefCell::new(ObservableTasks::new(Vec::<Task>::new())));
        let controller = TasksController::new(model.clone());
        let id = controller.subscription;
        drop(controller);
        assert!(!model.borrow_mut().unsubscribe(id));
    }

    #[test]
    fn test_drop_while_borrowed_leaves_listener_inert() {
        let model = shared(vec![make_task(1, TaskStatus::Pending, 1.0)]);
        let controller = TasksController::new(model.clone());
        let id = controller.subscription;

        {
            let _guard = model.borrow();
            assert!(!controller.detach());
            drop(controller);
        }

        // Still registered, but its tracker is gone, so events are no-ops.
        model.borrow_mut().set_status("uuid-1", TaskStatus::Completed);
        assert!(model.borrow_mut().unsubscribe(id));
    }

    #[test]
    fn test_controller_never_mutates_source() {
        let tasks = vec![
            make_task(1, TaskStatus::Pending, 1.0),
            make_task(2, TaskStatus::Pending, 3.0),
        ];
        let model = shared(tasks.clone());
        let controller = TasksController::new(model.clone());
        let _ = controller.pending_tasks();
        assert_eq!(model.borrow().tasks(), tasks.as_slice());
    }
}
