//! Pending-tasks view-model over an observable task collection.
//!
//! `engine::controller::TasksController` is the view-model; the rest of
//! `engine` provides the collection it observes and the stores behind it.

pub mod config;
pub mod engine;
pub mod logging;

pub use engine::collection::{ObservableTasks, TaskCollection, TaskSource};
pub use engine::controller::TasksController;
pub use engine::error::{StoreError, StoreResult};
pub use engine::sort::SortSpec;
pub use engine::types::{Task, TaskStatus};
