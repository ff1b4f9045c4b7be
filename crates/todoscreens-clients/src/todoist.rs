//! Task-tracking service adapter

use crate::error::{ClientError, ClientResult};
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;
use todoscreens_core::{sort_by_priority, SourceError, TaskId, TaskSource, Todo};
use tracing::{debug, info, warn};

const SERVICE: &str = "todoist";

/// Task service settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TodoistConfig {
    /// API token, sent as a bearer token
    pub token: String,
    /// REST API root
    pub base_url: String,
    /// Filter query selecting the tasks to show
    pub filter: String,
}

impl Default for TodoistConfig {
    fn default() -> Self {
        Self {
            token: String::new(),
            base_url: "https://api.todoist.com/rest/v1".to_string(),
            filter: "(today|overdue)".to_string(),
        }
    }
}

/// A task as returned by the REST API
#[derive(Debug, Clone, Deserialize)]
pub struct TaskRecord {
    /// Task id, numeric or string depending on API version
    pub id: TaskId,
    /// Task text
    pub content: String,
    /// Priority as reported by the service
    pub priority: u8,
    /// Due date, absent for undated tasks
    pub due: Option<DueRecord>,
}

/// Due information attached to a task
#[derive(Debug, Clone, Deserialize)]
pub struct DueRecord {
    /// Calendar date as `YYYY-MM-DD`
    pub date: String,
}

/// Map API records to todos, sorted by descending priority
///
/// Records without a due date cannot be due today or overdue and are
/// skipped.
pub fn decode_tasks(records: Vec<TaskRecord>) -> ClientResult<Vec<Todo>> {
    let mut todos = Vec::with_capacity(records.len());
    for record in records {
        let Some(due) = record.due else {
            warn!(task_id = %record.id, "Skipping task without due date");
            continue;
        };
        let due = NaiveDate::parse_from_str(&due.date, "%Y-%m-%d").map_err(|source| {
            ClientError::Decode {
                value: due.date.clone(),
                source,
            }
        })?;
        todos.push(Todo {
            id: record.id,
            title: record.content,
            priority: record.priority,
            due,
        });
    }
    sort_by_priority(&mut todos);
    Ok(todos)
}

/// Client for the task-tracking REST API
#[derive(Debug, Clone)]
pub struct TodoistClient {
    client: reqwest::Client,
    config: TodoistConfig,
}

impl TodoistClient {
    /// Build the HTTP client
    pub fn new(config: TodoistConfig) -> ClientResult<Self> {
        let client = reqwest::Client::builder()
            .user_agent(crate::USER_AGENT)
            .build()?;
        Ok(Self { client, config })
    }

    /// Tasks due today or overdue, highest priority first
    pub async fn get_pending(&self) -> ClientResult<Vec<Todo>> {
        let url = format!("{}/tasks", self.config.base_url.trim_end_matches('/'));
        let response = self
            .client
            .get(&url)
            .query(&[("filter", self.config.filter.as_str())])
            .bearer_auth(&self.config.token)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status {
                service: SERVICE,
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await?;
        let records: Vec<TaskRecord> =
            serde_json::from_slice(&body).map_err(|e| ClientError::Shape {
                service: SERVICE,
                detail: e.to_string(),
            })?;
        let todos = decode_tasks(records)?;
        debug!(count = todos.len(), "Fetched pending tasks");
        Ok(todos)
    }

    /// Close a task; the response status is logged but not enforced
    pub async fn close_task(&self, id: &TaskId) -> ClientResult<()> {
        let url = format!(
            "{}/tasks/{}/close",
            self.config.base_url.trim_end_matches('/'),
            id
        );
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.token)
            .send()
            .await?;

        if response.status().is_success() {
            info!(task_id = %id, "Closed task");
        } else {
            warn!(task_id = %id, status = %response.status(), "Close request not accepted");
        }
        Ok(())
    }
}

#[async_trait]
impl TaskSource for TodoistClient {
    async fn get_pending(&self) -> Result<Vec<Todo>, SourceError> {
        Ok(TodoistClient::get_pending(self).await?)
    }

    async fn close_task(&self, id: &TaskId) -> Result<(), SourceError> {
        Ok(TodoistClient::close_task(self, id).await?)
    }
}
