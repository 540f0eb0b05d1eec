//! Single-item and bulk hour synchronization.

use devops_api::{DevOpsClient, WorkItemId};
use log::{error, info};
use serde::Serialize;

use crate::aggregate::{aggregate, summarize, TimeLogSummary};
use crate::config::SyncConfig;
use crate::discovery::TaskDiscovery;
use crate::error::SyncError;
use crate::event::WorkItemEvent;
use crate::time_log::TimeLogClient;
use crate::updater::WorkItemUpdater;

/// Result of a successful single-item sync.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemOutcome {
    pub work_item_id: WorkItemId,
    pub hours: f64,
    pub http_status: u16,
}

/// Per-item line of a [`SyncRunResult`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemStatus {
    pub work_item_id: WorkItemId,
    /// Absent when no HTTP answer was obtained.
    pub http_status: Option<u16>,
    pub hours: Option<f64>,
    pub success: bool,
    pub message: String,
}

impl ItemStatus {
    fn from_result(work_item_id: WorkItemId, result: &Result<ItemOutcome, SyncError>) -> Self {
        match result {
            Ok(outcome) => Self {
                work_item_id,
                http_status: Some(outcome.http_status),
                hours: Some(outcome.hours),
                success: true,
                message: format!("updated with {} hours", outcome.hours),
            },
            Err(err) => Self {
                work_item_id,
                http_status: err.upstream_status(),
                hours: None,
                success: false,
                message: err.to_string(),
            },
        }
    }
}

/// Summary of one bulk run, in processing order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncRunResult {
    pub processed_count: usize,
    pub items: Vec<ItemStatus>,
}

impl SyncRunResult {
    pub fn failures(&self) -> impl Iterator<Item = &ItemStatus> {
        self.items.iter().filter(|item| !item.success)
    }

    pub fn failed_count(&self) -> usize {
        self.failures().count()
    }

    fn record(&mut self, status: ItemStatus) {
        self.processed_count += 1;
        self.items.push(status);
    }
}

#[derive(Clone)]
pub struct SyncOrchestrator {
    time_log: TimeLogClient,
    updater: WorkItemUpdater,
    discovery: TaskDiscovery,
}

impl SyncOrchestrator {
    pub fn new(config: &SyncConfig) -> Result<Self, SyncError> {
        let api = DevOpsClient::new(config.devops.clone())?;
        Ok(Self::from_parts(
            TimeLogClient::new(api.clone()),
            WorkItemUpdater::new(api.clone(), config.hours_field.clone()),
            TaskDiscovery::new(api),
        ))
    }

    pub fn from_parts(
        time_log: TimeLogClient,
        updater: WorkItemUpdater,
        discovery: TaskDiscovery,
    ) -> Self {
        Self {
            time_log,
            updater,
            discovery,
        }
    }

    /// Single-item mode: syncs the work item a service-hook event points at.
    pub async fn sync_event(&self, event: &WorkItemEvent) -> Result<ItemOutcome, SyncError> {
        let work_item_id = event.work_item_id()?;
        self.sync_work_item(work_item_id).await
    }

    /// Fetches, sums and writes back the hours of one work item.
    pub async fn sync_work_item(&self, work_item_id: WorkItemId) -> Result<ItemOutcome, SyncError> {
        let entries = self.time_log.fetch_entries_for(&work_item_id.to_string()).await;
        let totals = aggregate(work_item_id, &entries);
        info!(
            "Work item {}: {} hours from {} time-log entries",
            work_item_id,
            totals.total_hours,
            entries.len()
        );

        let outcome = self.updater.update_hours(work_item_id, totals.total_hours).await?;
        if !outcome.is_success() {
            return Err(SyncError::UpdateRejected {
                work_item_id,
                status: outcome.status,
                body: outcome.body,
            });
        }

        info!(
            "Work item {} updated ({} = {} hours)",
            work_item_id,
            self.updater.field(),
            totals.total_hours
        );
        Ok(ItemOutcome {
            work_item_id,
            hours: totals.total_hours,
            http_status: outcome.status,
        })
    }

    /// Refreshes every task changed this month, one at a time.
    pub async fn run_bulk(&self) -> SyncRunResult {
        info!("Starting bulk time-log sync");
        let ids = self.discovery.list_tasks_changed_this_month().await;
        info!("Found {} tasks to process", ids.len());
        let result = self.sync_all(&ids).await;
        info!(
            "Bulk sync finished: {} processed, {} failed",
            result.processed_count,
            result.failed_count()
        );
        result
    }

    /// Syncs `ids` sequentially. A failing item is recorded and the loop moves on.
    pub async fn sync_all(&self, ids: &[WorkItemId]) -> SyncRunResult {
        let mut result = SyncRunResult::default();
        for &work_item_id in ids {
            let outcome = self.sync_work_item(work_item_id).await;
            if let Err(err) = &outcome {
                error!("Failed to sync work item {}: {}", work_item_id, err);
            }
            result.record(ItemStatus::from_result(work_item_id, &outcome));
        }
        result
    }

    /// Read-only report of the time logged against a work item.
    pub async fn summarize(&self, work_item_id: WorkItemId) -> TimeLogSummary {
        let entries = self.time_log.fetch_entries_for(&work_item_id.to_string()).await;
        summarize(work_item_id, &entries)
    }
}
