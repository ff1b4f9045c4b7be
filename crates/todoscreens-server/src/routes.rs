//! Webhook routes
//!
//! - `GET /` liveness probe
//! - `GET|POST /update/<token>` refresh every display
//! - `POST /update/<token>/done/<n>` close the n-th pending task (1-based),
//!   then refresh
//!
//! The token is checked before anything else; a mismatch answers 403 without
//! touching either external service.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use std::sync::Arc;
use todoscreens_core::{MarkDone, Orchestrator, OrchestratorError};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

/// Shared state for the handlers
#[derive(Clone)]
pub struct AppState {
    orchestrator: Arc<Orchestrator>,
    update_token: Arc<str>,
}

impl AppState {
    /// State serving `orchestrator` behind `update_token`
    pub fn new(orchestrator: Arc<Orchestrator>, update_token: impl Into<Arc<str>>) -> Self {
        Self {
            orchestrator,
            update_token: update_token.into(),
        }
    }

    fn token_matches(&self, token: &str) -> bool {
        token == &*self.update_token
    }
}

/// Build the webhook router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health_check))
        .route("/update/:token", get(update).post(update))
        .route("/update/:token/done/:number", axum::routing::post(done))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// A failed cycle, reported as a 500
struct CycleFailed(OrchestratorError);

impl IntoResponse for CycleFailed {
    fn into_response(self) -> Response {
        error!(error = %self.0, "Update failed");
        (StatusCode::INTERNAL_SERVER_ERROR, "Update failed").into_response()
    }
}

impl From<OrchestratorError> for CycleFailed {
    fn from(e: OrchestratorError) -> Self {
        Self(e)
    }
}

fn bad_token() -> Response {
    warn!("Rejected request with bad token");
    (StatusCode::FORBIDDEN, "Bad token").into_response()
}

async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

async fn update(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<Response, CycleFailed> {
    if !state.token_matches(&token) {
        return Ok(bad_token());
    }
    let report = state.orchestrator.refresh().await?;
    info!(
        tasks = report.tasks,
        pushed = report.pushed.len(),
        failed = report.failed.len(),
        "Refresh complete"
    );
    Ok((StatusCode::OK, "Updated").into_response())
}

async fn done(
    State(state): State<AppState>,
    Path((token, number)): Path<(String, String)>,
) -> Result<Response, CycleFailed> {
    if !state.token_matches(&token) {
        return Ok(bad_token());
    }
    let index = match number.parse::<usize>() {
        Ok(n) if n >= 1 => n - 1,
        _ => {
            warn!(number = %number, "Rejected bad task number");
            return Ok((StatusCode::BAD_REQUEST, "Bad task number").into_response());
        }
    };

    match state.orchestrator.mark_done(index).await? {
        MarkDone::Closed { id, report } => {
            info!(task_id = %id, pushed = report.pushed.len(), "Task done");
            Ok((StatusCode::OK, "OK").into_response())
        }
        MarkDone::NoTask => Ok((StatusCode::OK, "No tasks to close").into_response()),
    }
}
