//! Fetch -> render -> push cycle
//!
//! Both trigger paths (the webhook routes and the device buttons) end up
//! here. Cycles are serialised: a refresh or mark-done waits for any cycle
//! already in flight, so two overlapping triggers cannot interleave their
//! fetches and pushes.

use crate::effects::{Clock, DisplayNode, DisplaySink, SourceError, TaskSource};
use crate::render::{RenderError, Renderer};
use crate::todo::TaskId;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

/// Model tag of the nodes that get the todo screen by default
pub const DEFAULT_NODE_MODEL: &str = "D42B";

/// Orchestration failures
#[derive(Debug, Error)]
pub enum OrchestratorError {
    /// Fetching or closing tasks failed
    #[error("Task service error: {0}")]
    Tasks(#[source] SourceError),

    /// Listing display nodes failed
    #[error("Display service error: {0}")]
    Display(#[source] SourceError),

    /// The task list could not be drawn
    #[error(transparent)]
    Render(#[from] RenderError),
}

/// Outcome of a refresh cycle
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RefreshReport {
    /// Number of tasks rendered
    pub tasks: usize,
    /// Nodes that accepted the render
    pub pushed: Vec<String>,
    /// Nodes whose push failed
    pub failed: Vec<String>,
    /// Nodes skipped because of their model
    pub skipped: usize,
}

/// Outcome of a mark-done request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkDone {
    /// The task was closed and the display refreshed
    Closed {
        /// The closed task
        id: TaskId,
        /// The refresh that followed
        report: RefreshReport,
    },
    /// No task at the requested position
    NoTask,
}

/// Drives the task source and the display service
pub struct Orchestrator {
    tasks: Arc<dyn TaskSource>,
    display: Arc<dyn DisplaySink>,
    clock: Arc<dyn Clock>,
    renderer: Renderer,
    node_model: String,
    cycle: Mutex<()>,
}

impl Orchestrator {
    /// Wire the orchestrator to its services
    pub fn new(
        tasks: Arc<dyn TaskSource>,
        display: Arc<dyn DisplaySink>,
        clock: Arc<dyn Clock>,
        renderer: Renderer,
    ) -> Self {
        Self {
            tasks,
            display,
            clock,
            renderer,
            node_model: DEFAULT_NODE_MODEL.to_string(),
            cycle: Mutex::new(()),
        }
    }

    /// Only push to nodes of this model
    pub fn with_node_model(mut self, model: impl Into<String>) -> Self {
        self.node_model = model.into();
        self
    }

    /// Model tag of the nodes that receive renders
    pub fn node_model(&self) -> &str {
        &self.node_model
    }

    /// Fetch pending tasks, render them and push to every eligible node
    pub async fn refresh(&self) -> Result<RefreshReport, OrchestratorError> {
        let _cycle = self.cycle.lock().await;
        self.refresh_locked().await
    }

    /// Close the task at `index` in the pending list, then refresh
    pub async fn mark_done(&self, index: usize) -> Result<MarkDone, OrchestratorError> {
        let _cycle = self.cycle.lock().await;

        let todos = self
            .tasks
            .get_pending()
            .await
            .map_err(OrchestratorError::Tasks)?;

        let Some(todo) = todos.get(index) else {
            info!(index, pending = todos.len(), "No task to close");
            return Ok(MarkDone::NoTask);
        };

        info!(index, task_id = %todo.id, title = %todo.title, "Closing task");
        self.tasks
            .close_task(&todo.id)
            .await
            .map_err(OrchestratorError::Tasks)?;

        let report = self.refresh_locked().await?;
        Ok(MarkDone::Closed {
            id: todo.id.clone(),
            report,
        })
    }

    /// Display nodes known to the display service
    pub async fn nodes(&self) -> Result<Vec<DisplayNode>, OrchestratorError> {
        self.display
            .node_list()
            .await
            .map_err(OrchestratorError::Display)
    }

    async fn refresh_locked(&self) -> Result<RefreshReport, OrchestratorError> {
        let todos = self
            .tasks
            .get_pending()
            .await
            .map_err(OrchestratorError::Tasks)?;
        debug!(count = todos.len(), "Fetched pending tasks");

        let layout = self.renderer.render(&todos, self.clock.now())?;

        let nodes = self.nodes().await?;
        let mut report = RefreshReport {
            tasks: todos.len(),
            ..RefreshReport::default()
        };

        for node in nodes {
            if node.model != self.node_model {
                debug!(node_id = %node.id, model = %node.model, "Skipping node");
                report.skipped += 1;
                continue;
            }
            match self.display.node_draw(&node.id, &layout).await {
                Ok(()) => {
                    info!(node_id = %node.id, "Pushed render");
                    report.pushed.push(node.id);
                }
                Err(e) => {
                    error!(node_id = %node.id, error = %e, "Render push failed");
                    report.failed.push(node.id);
                }
            }
        }

        if report.pushed.is_empty() && report.failed.is_empty() {
            warn!(model = %self.node_model, "No display nodes matched");
        }
        Ok(report)
    }
}
