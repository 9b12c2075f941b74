//! Runtime settings shared by every command.

use crate::engine::db;
use crate::engine::error::StoreResult;
use crate::engine::sort::SortSpec;
use crate::logging::DEFAULT_LOG_LEVEL;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq)]
pub struct BoardConfig {
    pub db_path: PathBuf,
    pub log_level: String,
    pub default_order: SortSpec,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            db_path: db::default_path(),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            default_order: SortSpec::default(),
        }
    }
}

impl BoardConfig {
    /// Builds a config from command-line values, falling back to defaults
    /// for anything not given.
    ///
    /// # Errors
    /// Returns `InvalidSortKey` if `order_by` names an unknown field.
    pub fn from_options(
        db_path: Option<PathBuf>,
        log_level: Option<String>,
        order_by: Option<&str>,
    ) -> StoreResult<Self> {
        let defaults = Self::default();
        Ok(Self {
            db_path: db_path.unwrap_or(defaults.db_path),
            log_level: log_level.unwrap_or(defaults.log_level),
            default_order: match order_by {
                Some(raw) => SortSpec::parse(raw)?,
                None => defaults.default_order,
            },
        })
    }

    /// Returns the order for one command: `order_by` when given, else the
    /// configured default.
    ///
    /// # Errors
    /// Returns `InvalidSortKey` if `order_by` names an unknown field.
    pub fn order_for(&self, order_by: Option<&str>) -> StoreResult<SortSpec> {
        match order_by {
            Some(raw) => SortSpec::parse(raw),
            None => Ok(self.default_order.clone()),
        }
    }
}
