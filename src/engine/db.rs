use super::error::{StoreError, StoreResult};
use log::debug;
use rusqlite::Connection;
use std::fs;
use std::path::{Path, PathBuf};

pub const DB_DIR: &str = ".taskboard";
pub const DB_FILE: &str = "tasks.db";

/// Default store location, relative to the working directory.
#[must_use]
pub fn default_path() -> PathBuf {
    Path::new(DB_DIR).join(DB_FILE)
}

pub struct Db;

impl Db {
    /// Creates the store directory and `SQLite` schema at `path`.
    ///
    /// Safe to run against an existing store.
    ///
    /// # Errors
    /// Returns error if directory creation, DB opening, or migration fails.
    pub fn init(path: &Path) -> StoreResult<Connection> {
        if let Some(dir) = path.parent() {
            if !dir.as_os_str().is_empty() && !dir.exists() {
                fs::create_dir_all(dir)?;
            }
        }

        let conn = Connection::open(path)?;
        Self::migrate(&conn)?;
        Ok(conn)
    }

    /// Connects to an existing store.
    ///
    /// # Errors
    /// Returns `NotInitialized` if the database file does not exist.
    pub fn connect(path: &Path) -> StoreResult<Connection> {
        if !path.exists() {
            return Err(StoreError::NotInitialized(path.display().to_string()));
        }
        Ok(Connection::open(path)?)
    }

    /// Opens a migrated in-memory store.
    ///
    /// # Errors
    /// Returns error if migration fails.
    pub fn open_in_memory() -> StoreResult<Connection> {
        let conn = Connection::open_in_memory()?;
        Self::migrate(&conn)?;
        Ok(conn)
    }

    fn migrate(conn: &Connection) -> StoreResult<()> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS tasks (
                id INTEGER PRIMARY KEY,
                uuid TEXT UNIQUE NOT NULL,
                description TEXT NOT NULL,
                status TEXT NOT NULL,
                urgency REAL NOT NULL DEFAULT 0,
                project TEXT,
                priority TEXT,
                due TEXT,
                entry TEXT,
                modified TEXT,
                start TEXT,
                wait TEXT,
                scheduled TEXT,
                tags TEXT NOT NULL DEFAULT '[]',
                annotations TEXT NOT NULL DEFAULT '[]',
                depends TEXT NOT NULL DEFAULT '[]'
            )",
            [],
        )?;
        Self::add_missing_columns(conn)?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_tasks_status ON tasks (status)",
            [],
        )?;

        Ok(())
    }

    /// Brings stores created before the wait/start/annotation columns up
    /// to the current schema.
    fn add_missing_columns(conn: &Connection) -> StoreResult<()> {
        let mut stmt = conn.prepare("PRAGMA table_info(tasks)")?;
        let existing = stmt
            .query_map([], |row| row.get::<_, String>(1))?
            .collect::<Result<Vec<_>, _>>()?;

        for (column, decl) in LATE_COLUMNS {
            if existing.iter().any(|c| c == column) {
                continue;
            }
            conn.execute(&format!("ALTER TABLE tasks ADD COLUMN {column} {decl}"), [])?;
            debug!("event=column_added module=db column={column}");
        }
        Ok(())
    }
}

const LATE_COLUMNS: &[(&str, &str)] = &[
    ("start", "TEXT"),
    ("wait", "TEXT"),
    ("scheduled", "TEXT"),
    ("annotations", "TEXT NOT NULL DEFAULT '[]'"),
    ("depends", "TEXT NOT NULL DEFAULT '[]'"),
];
