//! External collaborators of the orchestrator
//!
//! The task-tracking service, the display service and the wall clock are
//! abstracted behind traits so the orchestrator can be driven by real HTTP
//! adapters in production and in-memory handlers in tests.

use crate::layout::Layout;
use crate::todo::{TaskId, Todo};
use async_trait::async_trait;
use chrono::NaiveDateTime;

/// Error type returned by adapters
pub type SourceError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// A physical display registered with the display service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayNode {
    /// Hardware id
    pub id: String,
    /// Model tag, e.g. `D42B`
    pub model: String,
}

impl DisplayNode {
    /// Create a node record
    pub fn new(id: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            model: model.into(),
        }
    }
}

/// Pending tasks provider
#[async_trait]
pub trait TaskSource: Send + Sync {
    /// Tasks due today or overdue, sorted by descending priority
    async fn get_pending(&self) -> Result<Vec<Todo>, SourceError>;

    /// Mark a task complete
    async fn close_task(&self, id: &TaskId) -> Result<(), SourceError>;
}

/// Display service
#[async_trait]
pub trait DisplaySink: Send + Sync {
    /// All registered nodes
    async fn node_list(&self) -> Result<Vec<DisplayNode>, SourceError>;

    /// Replace what `node_id` shows with `layout`
    async fn node_draw(&self, node_id: &str, layout: &Layout) -> Result<(), SourceError>;
}

/// Wall clock used to judge overdue tasks and stamp renders
pub trait Clock: Send + Sync {
    /// Current local date and time
    fn now(&self) -> NaiveDateTime;
}

/// Local system time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        chrono::Local::now().naive_local()
    }
}
