//! Task Repository: all `SQLite` operations in one place.

use super::collection::TaskSource;
use super::db::Db;
use super::error::StoreResult;
use super::types::{format_date, now_seconds, parse_date, Task, TaskStatus};
use chrono::{DateTime, Utc};
use log::debug;
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use std::path::Path;

pub const TASK_SELECT: &str = "SELECT id, uuid, description, status, urgency, project, priority, \
     due, entry, modified, start, wait, scheduled, tags, annotations, depends FROM tasks";

const TASK_INSERT: &str = "INSERT INTO tasks (uuid, description, status, urgency, project, priority, \
     due, entry, modified, start, wait, scheduled, tags, annotations, depends)
     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)";

pub struct TaskRepo<'a> {
    conn: &'a Connection,
}

impl<'a> TaskRepo<'a> {
    /// Creates a new repository instance borrowing the connection.
    #[must_use]
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Inserts a new task and returns its working id.
    ///
    /// The record's own `id` is ignored.
    ///
    /// # Errors
    /// Returns an error if the insertion fails (for example a duplicate uuid).
    pub fn add(&self, task: &Task) -> StoreResult<i64> {
        self.write(TASK_INSERT, task)?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Inserts `task`, or overwrites the stored record with the same uuid.
    ///
    /// An existing record keeps its working id.
    ///
    /// # Errors
    /// Returns an error if the statement fails.
    pub fn upsert(&self, task: &Task) -> StoreResult<()> {
        let sql = format!(
            "{TASK_INSERT}
             ON CONFLICT(uuid) DO UPDATE SET
                description = excluded.description,
                status = excluded.status,
                urgency = excluded.urgency,
                project = excluded.project,
                priority = excluded.priority,
                due = excluded.due,
                entry = excluded.entry,
                modified = excluded.modified,
                start = excluded.start,
                wait = excluded.wait,
                scheduled = excluded.scheduled,
                tags = excluded.tags,
                annotations = excluded.annotations,
                depends = excluded.depends"
        );
        self.write(&sql, task)
    }

    fn write(&self, sql: &str, task: &Task) -> StoreResult<()> {
        self.conn.execute(
            sql,
            params![
                task.uuid,
                task.description,
                task.status.as_str(),
                task.urgency,
                task.project,
                task.priority,
                task.due.as_ref().map(format_date),
                task.entry.as_ref().map(format_date),
                task.modified.as_ref().map(format_date),
                task.start.as_ref().map(format_date),
                task.wait.as_ref().map(format_date),
                task.scheduled.as_ref().map(format_date),
                serde_json::to_string(&task.tags)?,
                serde_json::to_string(&task.annotations)?,
                serde_json::to_string(&task.depends)?,
            ],
        )?;
        Ok(())
    }

    /// Retrieves all tasks in insertion order.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub fn get_all(&self) -> StoreResult<Vec<Task>> {
        let sql = format!("{TASK_SELECT} ORDER BY id");
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([], row_to_task)?;
        let mut tasks = Vec::new();
        for task in rows {
            tasks.push(task?);
        }
        Ok(tasks)
    }

    /// Finds a task by its uuid.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub fn find_by_uuid(&self, uuid: &str) -> StoreResult<Option<Task>> {
        let sql = format!("{TASK_SELECT} WHERE uuid = ?1");
        Ok(self
            .conn
            .query_row(&sql, params![uuid], row_to_task)
            .optional()?)
    }

    /// Finds a task by its working id.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub fn find_by_id(&self, id: i64) -> StoreResult<Option<Task>> {
        let sql = format!("{TASK_SELECT} WHERE id = ?1");
        Ok(self
            .conn
            .query_row(&sql, params![id], row_to_task)
            .optional()?)
    }

    /// Sets a task's status and stamps `modified`.
    ///
    /// Returns `false` if no task has that uuid.
    ///
    /// # Errors
    /// Returns an error if the update fails.
    pub fn update_status(&self, uuid: &str, status: &TaskStatus) -> StoreResult<bool> {
        let changed = self.conn.execute(
            "UPDATE tasks SET status = ?1, modified = ?2 WHERE uuid = ?3",
            params![status.as_str(), format_date(&now_seconds()), uuid],
        )?;
        Ok(changed > 0)
    }
}

/// Converts a database row to a Task object.
///
/// # Errors
/// Returns a `rusqlite` error if a column cannot be decoded.
pub fn row_to_task(row: &rusqlite::Row) -> rusqlite::Result<Task> {
    Ok(Task {
        id: row.get(0)?,
        uuid: row.get(1)?,
        description: row.get(2)?,
        status: TaskStatus::from(row.get::<_, String>(3)?),
        urgency: row.get(4)?,
        project: row.get(5)?,
        priority: row.get(6)?,
        due: date_column(row, 7)?,
        entry: date_column(row, 8)?,
        modified: date_column(row, 9)?,
        start: date_column(row, 10)?,
        wait: date_column(row, 11)?,
        scheduled: date_column(row, 12)?,
        tags: json_column(row, 13)?,
        annotations: json_column(row, 14)?,
        depends: json_column(row, 15)?,
    })
}

fn json_column<T: DeserializeOwned>(row: &rusqlite::Row, idx: usize) -> rusqlite::Result<T> {
    let raw: String = row.get(idx)?;
    serde_json::from_str(&raw)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn date_column(row: &rusqlite::Row, idx: usize) -> rusqlite::Result<Option<DateTime<Utc>>> {
    let raw: Option<String> = row.get(idx)?;
    raw.map(|s| parse_date(&s))
        .transpose()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

/// A `TaskSource` that reads the `SQLite` store.
pub struct SqliteSource {
    conn: Connection,
}

impl SqliteSource {
    #[must_use]
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }

    /// Opens the initialized store at `path`.
    ///
    /// # Errors
    /// Returns `NotInitialized` if there is no store at `path`.
    pub fn open(path: &Path) -> StoreResult<Self> {
        Ok(Self::new(Db::connect(path)?))
    }

    #[must_use]
    pub fn repo(&self) -> TaskRepo<'_> {
        TaskRepo::new(&self.conn)
    }

    /// Upserts `tasks` in one transaction. Returns `(added, updated)`.
    ///
    /// # Errors
    /// Returns an error if any write fails; nothing is committed then.
    pub fn import(&mut self, tasks: &[Task]) -> StoreResult<(usize, usize)> {
        let tx = self.conn.transaction()?;
        let repo = TaskRepo::new(&tx);
        let (mut added, mut updated) = (0, 0);
        for task in tasks {
            if repo.find_by_uuid(&task.uuid)?.is_some() {
                updated += 1;
            } else {
                added += 1;
            }
            repo.upsert(task)?;
        }
        tx.commit()?;
        debug!(
            "event=import_committed module=repo added={} updated={}",
            added, updated
        );
        Ok((added, updated))
    }
}

impl TaskSource for SqliteSource {
    fn load(&self) -> StoreResult<Vec<Task>> {
        self.repo().get_all()
    }
}
