//! Reads time-log entries for a single work item.

use devops_api::{DevOpsClient, TimeLogEntry};
use log::{debug, info, warn};

use crate::redact::redact_log_details;

#[derive(Clone)]
pub struct TimeLogClient {
    api: DevOpsClient,
}

impl TimeLogClient {
    pub fn new(api: DevOpsClient) -> Self {
        Self { api }
    }

    /// Entries logged against `work_item_id`. Read failures are logged and yield an empty list.
    pub async fn fetch_entries_for(&self, work_item_id: &str) -> Vec<TimeLogEntry> {
        let documents = match self.api.get_time_log_documents().await {
            Ok(documents) => documents,
            Err(err) => {
                warn!("Failed to read TimeLog documents for work item {}", work_item_id);
                debug!("TimeLog read details: {}", redact_log_details(&err.to_string()));
                return Vec::new();
            }
        };

        let entries: Vec<TimeLogEntry> = documents
            .into_iter()
            .filter(|entry| entry.belongs_to(work_item_id))
            .collect();

        if entries.is_empty() {
            info!("No time-log entries found for work item {}", work_item_id);
        }
        for entry in &entries {
            debug!(
                "Time-log entry for work item {}: {:?} minutes on {}",
                work_item_id,
                entry.time,
                entry.date.as_deref().unwrap_or("unknown date")
            );
        }

        entries
    }
}
