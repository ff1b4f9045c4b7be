//! In-memory service handlers
//!
//! Both mocks are cheap to clone and share state between clones, so a test
//! can hand one clone to the orchestrator and inspect the other.

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use thiserror::Error;
use todoscreens_core::{
    sort_by_priority, DisplayNode, DisplaySink, Layout, SourceError, TaskId, TaskSource, Todo,
};

/// Failure injected by a mock
#[derive(Debug, Error)]
#[error("mock failure: {0}")]
pub struct MockFailure(pub String);

#[derive(Debug, Default)]
struct TaskState {
    todos: Vec<Todo>,
    closed: Vec<TaskId>,
    fetches: usize,
    fail_fetch: bool,
}

/// Task source backed by a vector
#[derive(Debug, Clone, Default)]
pub struct MockTaskSource {
    state: Arc<Mutex<TaskState>>,
}

impl MockTaskSource {
    pub fn new(todos: Vec<Todo>) -> Self {
        let source = Self::default();
        source.state.lock().unwrap().todos = todos;
        source
    }

    /// Make every fetch fail
    pub fn failing() -> Self {
        let source = Self::default();
        source.state.lock().unwrap().fail_fetch = true;
        source
    }

    /// Ids passed to `close_task`, in call order
    pub fn closed(&self) -> Vec<TaskId> {
        self.state.lock().unwrap().closed.clone()
    }

    /// Number of `get_pending` calls
    pub fn fetch_count(&self) -> usize {
        self.state.lock().unwrap().fetches
    }

    /// Total calls of either kind
    pub fn call_count(&self) -> usize {
        let state = self.state.lock().unwrap();
        state.fetches + state.closed.len()
    }
}

#[async_trait]
impl TaskSource for MockTaskSource {
    async fn get_pending(&self) -> Result<Vec<Todo>, SourceError> {
        let mut state = self.state.lock().unwrap();
        state.fetches += 1;
        if state.fail_fetch {
            return Err(Box::new(MockFailure("task fetch".to_string())));
        }
        let mut todos = state.todos.clone();
        sort_by_priority(&mut todos);
        Ok(todos)
    }

    async fn close_task(&self, id: &TaskId) -> Result<(), SourceError> {
        let mut state = self.state.lock().unwrap();
        state.closed.push(id.clone());
        state.todos.retain(|todo| &todo.id != id);
        Ok(())
    }
}

#[derive(Debug, Default)]
struct DisplayState {
    nodes: Vec<DisplayNode>,
    draws: Vec<(String, serde_json::Value)>,
    failing_nodes: HashSet<String>,
    list_calls: usize,
    fail_list: bool,
}

/// Display service that records every render
#[derive(Debug, Clone, Default)]
pub struct MockDisplay {
    state: Arc<Mutex<DisplayState>>,
}

impl MockDisplay {
    pub fn new(nodes: Vec<DisplayNode>) -> Self {
        let display = Self::default();
        display.state.lock().unwrap().nodes = nodes;
        display
    }

    /// A single `D42B` node called `NODE-1`
    pub fn single() -> Self {
        Self::new(vec![DisplayNode::new("NODE-1", "D42B")])
    }

    /// Make `node_list` fail
    pub fn failing_list(self) -> Self {
        self.state.lock().unwrap().fail_list = true;
        self
    }

    /// Make pushes to `node_id` fail
    pub fn failing_node(self, node_id: &str) -> Self {
        self.state
            .lock()
            .unwrap()
            .failing_nodes
            .insert(node_id.to_string());
        self
    }

    /// Exported layouts per accepted push, in call order
    pub fn draws(&self) -> Vec<(String, serde_json::Value)> {
        self.state.lock().unwrap().draws.clone()
    }

    /// Total service calls
    pub fn call_count(&self) -> usize {
        let state = self.state.lock().unwrap();
        state.list_calls + state.draws.len()
    }
}

#[async_trait]
impl DisplaySink for MockDisplay {
    async fn node_list(&self) -> Result<Vec<DisplayNode>, SourceError> {
        let mut state = self.state.lock().unwrap();
        state.list_calls += 1;
        if state.fail_list {
            return Err(Box::new(MockFailure("node list".to_string())));
        }
        Ok(state.nodes.clone())
    }

    async fn node_draw(&self, node_id: &str, layout: &Layout) -> Result<(), SourceError> {
        let mut state = self.state.lock().unwrap();
        if state.failing_nodes.contains(node_id) {
            return Err(Box::new(MockFailure(format!("draw {node_id}"))));
        }
        let doc = serde_json::to_value(layout.export())?;
        state.draws.push((node_id.to_string(), doc));
        Ok(())
    }
}
