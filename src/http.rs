//! Webhook, manual sync and reporting routes.

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use devops_api::WorkItemId;
use log::{debug, error, warn};
use std::sync::Arc;

use crate::error::SyncError;
use crate::event::WorkItemEvent;
use crate::redact::{collapse_whitespace, truncate_text};
use crate::sync::{ItemOutcome, SyncOrchestrator};

const PAYLOAD_LOG_LIMIT: usize = 500;

/// Shared handler state. Holds the reason instead of an orchestrator when the DevOps settings are incomplete.
#[derive(Clone)]
pub struct AppState {
    orchestrator: Arc<Result<SyncOrchestrator, String>>,
}

impl AppState {
    pub fn ready(orchestrator: SyncOrchestrator) -> Self {
        Self {
            orchestrator: Arc::new(Ok(orchestrator)),
        }
    }

    pub fn unconfigured(reason: impl Into<String>) -> Self {
        Self {
            orchestrator: Arc::new(Err(reason.into())),
        }
    }

    pub fn orchestrator(&self) -> Result<&SyncOrchestrator, SyncError> {
        self.orchestrator
            .as_ref()
            .as_ref()
            .map_err(|reason| SyncError::Configuration(reason.clone()))
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/procesar_eventos", post(handle_event))
        .route("/api/sync", post(handle_bulk_sync))
        .route("/api/work-items/{id}/time-log", get(handle_time_log_summary))
        .route("/health", get(|| async { "ok" }))
        .with_state(state)
}

async fn handle_event(State(state): State<AppState>, body: Bytes) -> Response {
    debug!(
        "Event payload received: {}",
        truncate_text(
            &collapse_whitespace(&String::from_utf8_lossy(&body)),
            PAYLOAD_LOG_LIMIT
        )
    );

    match process_event(&state, &body).await {
        Ok(outcome) => (
            StatusCode::OK,
            format!("Hours updated successfully: {}", outcome.hours),
        )
            .into_response(),
        Err(err) => {
            let status = err.status_code();
            if status.is_client_error() {
                warn!("Rejected event: {}", err);
            } else {
                error!("Event processing failed: {}", err);
            }
            (status, error_message(&err)).into_response()
        }
    }
}

async fn process_event(state: &AppState, body: &[u8]) -> Result<ItemOutcome, SyncError> {
    let event = WorkItemEvent::from_slice(body)?;
    // A payload without an id is the caller's fault even when the service is unconfigured.
    event.work_item_id()?;
    state.orchestrator()?.sync_event(&event).await
}

async fn handle_bulk_sync(State(state): State<AppState>) -> Response {
    match state.orchestrator() {
        Ok(orchestrator) => Json(orchestrator.run_bulk().await).into_response(),
        Err(err) => {
            error!("Manual sync refused: {}", err);
            (err.status_code(), error_message(&err)).into_response()
        }
    }
}

async fn handle_time_log_summary(
    State(state): State<AppState>,
    Path(work_item_id): Path<WorkItemId>,
) -> Response {
    match state.orchestrator() {
        Ok(orchestrator) => Json(orchestrator.summarize(work_item_id).await).into_response(),
        Err(err) => (err.status_code(), error_message(&err)).into_response(),
    }
}

fn error_message(err: &SyncError) -> String {
    match err {
        SyncError::MissingWorkItemId => {
            "Missing work item id in resource.id or resource.workItemId".to_string()
        }
        SyncError::UpdateRejected { body, .. } => format!("Error updating work item: {}", body),
        other => format!("Error: {}", other),
    }
}
