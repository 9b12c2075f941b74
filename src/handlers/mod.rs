//! Command handlers. One module per subcommand.

pub mod add;
pub mod delete;
pub mod done;
pub mod import;
pub mod init;
pub mod list;
pub mod pending;
pub mod show;
pub mod status;

use anyhow::Result;
use colored::Colorize;
use std::cell::RefCell;
use std::rc::Rc;
use taskboard::config::BoardConfig;
use taskboard::engine::repo::SqliteSource;
use taskboard::{ObservableTasks, SortSpec, Task, TaskStatus, TasksController};

pub type Board = ObservableTasks<SqliteSource>;

/// Loads the store into an observable collection and attaches a
/// controller to it.
///
/// # Errors
/// Returns error if the store is missing or cannot be read.
pub fn open_board(
    config: &BoardConfig,
    sort: SortSpec,
) -> Result<(Rc<RefCell<Board>>, TasksController<Board>)> {
    let source = SqliteSource::open(&config.db_path)?;
    let board = Rc::new(RefCell::new(ObservableTasks::load(source)?));
    let controller = TasksController::with_sort(Rc::clone(&board), sort);
    Ok((board, controller))
}

pub fn print_tasks(title: &str, tasks: &[Task]) {
    println!("{} {} ({})", "📋".cyan(), title, tasks.len());

    if tasks.is_empty() {
        println!("   (none)");
        return;
    }

    for task in tasks {
        print_task(task);
    }
}

fn print_task(task: &Task) {
    let id = task_ref(task);
    let mut line = format!(
        "   {} [{}] {} {}",
        status_icon(&task.status),
        id.yellow(),
        format!("{:>5.1}", task.urgency).dimmed(),
        task.description
    );
    if let Some(project) = &task.project {
        line.push_str(&format!(" {}", format!("project:{project}").blue()));
    }
    if let Some(due) = &task.due {
        line.push_str(&format!(" {}", format!("due:{}", due.format("%Y-%m-%d")).red()));
    }
    if !task.tags.is_empty() {
        line.push_str(&format!(" {}", format!("+{}", task.tags.join(" +")).dimmed()));
    }
    println!("{line}");
}

pub fn print_json(tasks: &[Task]) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(tasks)?);
    Ok(())
}

/// Working id when the task has one, else the short uuid.
pub fn task_ref(task: &Task) -> String {
    if task.id > 0 {
        task.id.to_string()
    } else {
        short_uuid(&task.uuid).to_string()
    }
}

pub fn short_uuid(uuid: &str) -> &str {
    uuid.get(..8).unwrap_or(uuid)
}

fn status_icon(status: &TaskStatus) -> colored::ColoredString {
    match status {
        TaskStatus::Pending => "○".normal(),
        TaskStatus::Completed => "✓".green(),
        TaskStatus::Deleted => "✗".red(),
        TaskStatus::Waiting => "…".yellow(),
        TaskStatus::Recurring => "↻".cyan(),
        TaskStatus::Other(_) => "?".dimmed(),
    }
}
