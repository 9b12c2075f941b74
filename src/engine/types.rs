//! Core types for the task board.
//!
//! Records follow the Taskwarrior export shape. Dates use the compact
//! `YYYYMMDDTHHMMSSZ` form both on the wire and in the `SQLite` store.

use super::error::StoreError;
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Compact UTC timestamp format used by Taskwarrior.
pub const DATE_FORMAT: &str = "%Y%m%dT%H%M%SZ";

/// Lifecycle status of a task.
///
/// Unknown values are kept verbatim in `Other` so a record never silently
/// turns into a pending one.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TaskStatus {
    Pending,
    Completed,
    Deleted,
    Waiting,
    Recurring,
    Other(String),
}

impl TaskStatus {
    /// Returns the wire form (`pending`, `completed`, ...).
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Deleted => "deleted",
            Self::Waiting => "waiting",
            Self::Recurring => "recurring",
            Self::Other(s) => s,
        }
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for TaskStatus {
    fn from(s: &str) -> Self {
        match s {
            "pending" => Self::Pending,
            "completed" => Self::Completed,
            "deleted" => Self::Deleted,
            "waiting" => Self::Waiting,
            "recurring" => Self::Recurring,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for TaskStatus {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}

impl Serialize for TaskStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for TaskStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Self::from)
    }
}

/// Names a mutable field of a [`Task`] in change notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskField {
    Description,
    Status,
    Urgency,
    Project,
    Priority,
    Due,
    Entry,
    Modified,
    Tags,
}

impl fmt::Display for TaskField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Description => "description",
            Self::Status => "status",
            Self::Urgency => "urgency",
            Self::Project => "project",
            Self::Priority => "priority",
            Self::Due => "due",
            Self::Entry => "entry",
            Self::Modified => "modified",
            Self::Tags => "tags",
        };
        f.write_str(name)
    }
}

/// A task record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Working id. Assigned by the store; `0` when the record has none.
    #[serde(default)]
    pub id: i64,
    pub uuid: String,
    pub description: String,
    pub status: TaskStatus,
    #[serde(default, deserialize_with = "urgency_or_zero")]
    pub urgency: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
    #[serde(default, with = "compact_date", skip_serializing_if = "Option::is_none")]
    pub due: Option<DateTime<Utc>>,
    #[serde(default, with = "compact_date", skip_serializing_if = "Option::is_none")]
    pub entry: Option<DateTime<Utc>>,
    #[serde(default, with = "compact_date", skip_serializing_if = "Option::is_none")]
    pub modified: Option<DateTime<Utc>>,
    #[serde(default, with = "compact_date", skip_serializing_if = "Option::is_none")]
    pub start: Option<DateTime<Utc>>,
    #[serde(default, with = "compact_date", skip_serializing_if = "Option::is_none")]
    pub wait: Option<DateTime<Utc>>,
    #[serde(default, with = "compact_date", skip_serializing_if = "Option::is_none")]
    pub scheduled: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "null_as_empty", skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, deserialize_with = "null_as_empty", skip_serializing_if = "Vec::is_empty")]
    pub annotations: Vec<Annotation>,
    /// Uuids of the tasks this one waits on.
    #[serde(default, deserialize_with = "uuid_list", skip_serializing_if = "Vec::is_empty")]
    pub depends: Vec<String>,
}

/// A timestamped note attached to a task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    #[serde(default, with = "compact_date", skip_serializing_if = "Option::is_none")]
    pub entry: Option<DateTime<Utc>>,
    pub description: String,
}

impl Task {
    /// Creates a pending task with a fresh uuid and `entry` set to now.
    #[must_use]
    pub fn new(description: &str) -> Self {
        Self {
            id: 0,
            uuid: uuid::Uuid::new_v4().to_string(),
            description: description.to_string(),
            status: TaskStatus::Pending,
            urgency: 0.0,
            project: None,
            priority: None,
            due: None,
            entry: Some(now_seconds()),
            modified: None,
            start: None,
            wait: None,
            scheduled: None,
            tags: Vec::new(),
            annotations: Vec::new(),
            depends: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_id(mut self, id: i64) -> Self {
        self.id = id;
        self
    }

    #[must_use]
    pub fn with_uuid(mut self, uuid: &str) -> Self {
        self.uuid = uuid.to_string();
        self
    }

    #[must_use]
    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }

    #[must_use]
    pub fn with_urgency(mut self, urgency: f64) -> Self {
        self.urgency = urgency;
        self
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.status.is_pending()
    }
}

/// Parses a compact `YYYYMMDDTHHMMSSZ` timestamp.
///
/// # Errors
/// Returns `StoreError::InvalidDate` if the input does not match the format.
pub fn parse_date(raw: &str) -> Result<DateTime<Utc>, StoreError> {
    NaiveDateTime::parse_from_str(raw.trim(), DATE_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|_| StoreError::InvalidDate(raw.to_string()))
}

#[must_use]
pub fn format_date(date: &DateTime<Utc>) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Current time truncated to whole seconds, the store's precision.
#[must_use]
pub fn now_seconds() -> DateTime<Utc> {
    DateTime::from_timestamp(Utc::now().timestamp(), 0).unwrap_or_default()
}

fn urgency_or_zero<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(0.0))
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Older exports write `depends` as one comma-separated string.
fn uuid_list<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Joined(String),
        List(Vec<String>),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Joined(joined)) => joined
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
        Some(Raw::List(list)) => list,
        None => Vec::new(),
    })
}

mod compact_date {
    use super::{format_date, parse_date};
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        value: &Option<DateTime<Utc>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(date) => serializer.serialize_str(&format_date(date)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<DateTime<Utc>>, D::Error> {
        match Option::<String>::deserialize(deserializer)? {
            Some(raw) if !raw.trim().is_empty() => {
                parse_date(&raw).map(Some).map_err(serde::de::Error::custom)
            }
            _ => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_status_wire_form() {
        assert_eq!(TaskStatus::from("pending"), TaskStatus::Pending);
        assert_eq!(TaskStatus::from("completed").to_string(), "completed");
        assert_eq!(
            TaskStatus::from("archived"),
            TaskStatus::Other("archived".to_string())
        );
        assert!(!TaskStatus::from("Pending").is_pending());
    }

    #[test]
    fn test_parse_date() {
        let date = parse_date("20240315T083000Z").unwrap();
        assert_eq!(date.year(), 2024);
        assert_eq!(date.month(), 3);
        assert_eq!(date.hour(), 8);
        assert_eq!(format_date(&date), "20240315T083000Z");
    }

    #[test]
    fn test_parse_date_rejects_iso() {
        let err = parse_date("2024-03-15T08:30:00Z").unwrap_err();
        assert!(matches!(err, StoreError::InvalidDate(_)));
    }

    #[test]
    fn test_deserialize_export_record() {
        let raw = r#"{
            "id": 4,
            "uuid": "8f2c1d7e-0000-4000-8000-000000000001",
            "description": "Water plants",
            "status": "pending",
            "urgency": 3.5,
            "due": "20240401T000000Z",
            "tags": null,
            "imask": 1
        }"#;
        let task: Task = serde_json::from_str(raw).unwrap();
        assert_eq!(task.id, 4);
        assert!(task.is_pending());
        assert!((task.urgency - 3.5).abs() < f64::EPSILON);
        assert!(task.due.is_some());
        assert!(task.entry.is_none());
        assert!(task.tags.is_empty());
    }

    #[test]
    fn test_missing_urgency_reads_as_zero() {
        let raw = r#"{"uuid": "a", "description": "x", "status": "waiting", "urgency": null}"#;
        let task: Task = serde_json::from_str(raw).unwrap();
        assert_eq!(task.urgency, 0.0);
        assert_eq!(task.status, TaskStatus::Waiting);
    }

    #[test]
    fn test_deserialize_annotations_and_depends() {
        let raw = r#"{
            "uuid": "a",
            "description": "Renew lease",
            "status": "pending",
            "start": "20240210T080000Z",
            "wait": "20240205T000000Z",
            "scheduled": "20240212T000000Z",
            "annotations": [{"entry": "20240201T120000Z", "description": "called agent"}],
            "depends": "b1, c2"
        }"#;
        let task: Task = serde_json::from_str(raw).unwrap();
        assert_eq!(task.start, Some(parse_date("20240210T080000Z").unwrap()));
        assert!(task.wait.is_some());
        assert!(task.scheduled.is_some());
        assert_eq!(task.annotations.len(), 1);
        assert_eq!(task.annotations[0].description, "called agent");
        assert_eq!(
            task.annotations[0].entry,
            Some(parse_date("20240201T120000Z").unwrap())
        );
        assert_eq!(task.depends, vec!["b1".to_string(), "c2".to_string()]);

        let listed: Task = serde_json::from_str(
            r#"{"uuid":"a","description":"x","status":"pending","depends":["b1"],"annotations":null}"#,
        )
        .unwrap();
        assert_eq!(listed.depends, vec!["b1".to_string()]);
        assert!(listed.annotations.is_empty());
    }

    #[test]
    fn test_serialize_skips_empty_fields() {
        let task = Task::new("Call bank").with_uuid("u1").with_id(1);
        let value = serde_json::to_value(&task).unwrap();
        assert_eq!(value["status"], "pending");
        assert!(value.get("due").is_none());
        assert!(value.get("tags").is_none());
        assert!(value["entry"].as_str().unwrap().ends_with('Z'));
    }
}
