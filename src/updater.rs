//! Writes computed hours back onto a work item.

use axum::http::StatusCode;
use devops_api::{DevOpsClient, PatchOperation, WorkItemId};
use log::error;

use crate::error::SyncError;
use crate::redact::redact_log_details;

/// Raw answer of the patch endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateOutcome {
    pub status: u16,
    pub body: String,
}

impl UpdateOutcome {
    /// Only a plain 200 counts as a successful update.
    pub fn is_success(&self) -> bool {
        self.status == StatusCode::OK.as_u16()
    }
}

#[derive(Clone)]
pub struct WorkItemUpdater {
    api: DevOpsClient,
    field: String,
}

impl WorkItemUpdater {
    pub fn new(api: DevOpsClient, field: impl Into<String>) -> Self {
        Self {
            api,
            field: field.into(),
        }
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    /// Sets the hours field of `work_item_id`. Non-200 answers are returned, not retried; transport failures are errors.
    pub async fn update_hours(
        &self,
        work_item_id: WorkItemId,
        hours: f64,
    ) -> Result<UpdateOutcome, SyncError> {
        let operations = [PatchOperation::add_field(&self.field, hours)];
        let response = self.api.patch_work_item(work_item_id, &operations).await?;
        let outcome = UpdateOutcome {
            status: response.status.as_u16(),
            body: response.body,
        };
        if !outcome.is_success() {
            error!(
                "Updating work item {} failed with {}: {}",
                work_item_id,
                outcome.status,
                redact_log_details(&outcome.body)
            );
        }
        Ok(outcome)
    }
}
