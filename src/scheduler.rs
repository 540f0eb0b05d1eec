//! Periodic bulk sync loop.

use log::{debug, error, info, warn};
use std::time::Duration;
use tokio::time::{interval, MissedTickBehavior};

use crate::http::AppState;
use crate::sync::SyncRunResult;

/// One timer-triggered bulk run. Yields an empty result when the service is not configured.
pub async fn run_scheduled_sync(state: &AppState) -> SyncRunResult {
    let orchestrator = match state.orchestrator() {
        Ok(orchestrator) => orchestrator,
        Err(err) => {
            error!("Scheduled sync skipped: {}", err);
            return SyncRunResult::default();
        }
    };

    let result = orchestrator.run_bulk().await;
    for failure in result.failures() {
        debug!(
            "Scheduled sync failure for work item {}: {}",
            failure.work_item_id, failure.message
        );
    }
    if result.failed_count() > 0 {
        warn!(
            "Scheduled sync completed with {} of {} items failing",
            result.failed_count(),
            result.processed_count
        );
    }
    result
}

/// Runs [`run_scheduled_sync`] every `every`, starting one period after launch. Late ticks are skipped, so runs never overlap.
pub async fn run_periodic_sync(state: AppState, every: Duration) {
    info!("Periodic sync enabled every {}s", every.as_secs());
    let mut ticker = interval(every);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    // The first tick completes immediately.
    ticker.tick().await;
    loop {
        ticker.tick().await;
        run_scheduled_sync(&state).await;
    }
}
