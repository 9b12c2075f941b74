//! Errors raised by task sources and the collection contract.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed task json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid date `{0}`; expected YYYYMMDDTHHMMSSZ")]
    InvalidDate(String),

    #[error("unknown sort key `{0}`")]
    InvalidSortKey(String),

    #[error("no task matches `{0}`")]
    NotFound(String),

    #[error("`{query}` is ambiguous: it matches {count} tasks")]
    Ambiguous { query: String, count: usize },

    #[error("task store not initialized at {0}. Run `taskboard init` first.")]
    NotInitialized(String),
}

pub type StoreResult<T> = Result<T, StoreError>;
