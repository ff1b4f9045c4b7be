//! Task records pulled from the task-tracking service

use chrono::NaiveDate;
use serde::Deserialize;
use std::fmt;

/// Identifier of a task in the task-tracking service
///
/// The service has used both numeric and string identifiers across API
/// versions, so both decode into the same string form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(from = "RawTaskId")]
pub struct TaskId(String);

impl TaskId {
    /// Create a task id from its string form
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the id as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<TaskId> for String {
    fn from(id: TaskId) -> Self {
        id.0
    }
}

impl From<&str> for TaskId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<u64> for TaskId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawTaskId {
    Number(u64),
    Text(String),
}

impl From<RawTaskId> for TaskId {
    fn from(raw: RawTaskId) -> Self {
        match raw {
            RawTaskId::Number(n) => n.into(),
            RawTaskId::Text(s) => Self(s),
        }
    }
}

/// A single pending task
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Todo {
    /// Service identifier, used to close the task
    pub id: TaskId,
    /// Task text as shown on the display
    pub title: String,
    /// Priority in 0..=3, higher is more urgent
    pub priority: u8,
    /// Due date in local time
    pub due: NaiveDate,
}

impl Todo {
    /// Create a new todo
    pub fn new(id: impl Into<TaskId>, title: impl Into<String>, priority: u8, due: NaiveDate) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            priority,
            due,
        }
    }

    /// Whole days between the due date and `today`, never negative
    pub fn days_overdue(&self, today: NaiveDate) -> u32 {
        let days = (today - self.due).num_days();
        u32::try_from(days.max(0)).unwrap_or(u32::MAX)
    }

    /// Whether the task was due before `today`
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.days_overdue(today) > 0
    }
}

/// Sort todos by descending priority, keeping service order among equals
pub fn sort_by_priority(todos: &mut [Todo]) {
    todos.sort_by_key(|todo| std::cmp::Reverse(todo.priority));
}
