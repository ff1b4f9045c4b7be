//! Todoscreens webhook server
//!
//! Exposes the refresh and mark-done triggers over HTTP, guarded by a shared
//! update token, and wires the HTTP adapters into the orchestrator.

pub mod config;
pub mod routes;

pub use config::{ConfigError, ServerConfig};
pub use routes::{router, AppState};

use std::sync::Arc;
use todoscreens_clients::{ClientResult, SyncSignClient, TodoistClient};
use todoscreens_core::{Orchestrator, Renderer, SystemClock};

/// Build an orchestrator backed by the real services
pub fn build_orchestrator(config: &ServerConfig) -> ClientResult<Orchestrator> {
    let tasks = TodoistClient::new(config.todoist.clone())?;
    let display = SyncSignClient::new(&config.syncsign)?;
    Ok(Orchestrator::new(
        Arc::new(tasks),
        Arc::new(display),
        Arc::new(SystemClock),
        Renderer::new(config.render.clone()),
    )
    .with_node_model(config.syncsign.model.clone()))
}
