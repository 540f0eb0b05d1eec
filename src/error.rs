//! Failure taxonomy of the sync pipeline and its HTTP mapping.

use axum::http::StatusCode;
use devops_api::{DevOpsError, WorkItemId};
use thiserror::Error;

use crate::config::ConfigError;

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("work item id missing from resource.id / resource.workItemId")]
    MissingWorkItemId,
    #[error("invalid event payload: {0}")]
    InvalidPayload(String),
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("work item {work_item_id} update rejected ({status}): {body}")]
    UpdateRejected {
        work_item_id: WorkItemId,
        status: u16,
        body: String,
    },
    #[error(transparent)]
    Upstream(#[from] DevOpsError),
}

impl SyncError {
    /// HTTP status the webhook answers with for this failure.
    pub fn status_code(&self) -> StatusCode {
        match self {
            SyncError::MissingWorkItemId | SyncError::InvalidPayload(_) => StatusCode::BAD_REQUEST,
            SyncError::Configuration(_)
            | SyncError::UpdateRejected { .. }
            | SyncError::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Upstream HTTP status involved in the failure, if any.
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            SyncError::UpdateRejected { status, .. } => Some(*status),
            SyncError::Upstream(err) => err.status().map(|status| status.as_u16()),
            _ => None,
        }
    }
}

impl From<ConfigError> for SyncError {
    fn from(err: ConfigError) -> Self {
        SyncError::Configuration(err.to_string())
    }
}
