//! Keeps the hours field of Azure DevOps work items in line with the minutes recorded through the TimeLog extension.

pub mod aggregate;
pub mod config;
pub mod discovery;
pub mod error;
pub mod event;
pub mod http;
mod redact;
pub mod scheduler;
pub mod sync;
pub mod time_log;
pub mod updater;

#[cfg(test)]
mod test_support;

pub use aggregate::{AggregationResult, DaySummary, TimeLogSummary};
pub use config::{ConfigError, SyncConfig};
pub use error::SyncError;
pub use http::{router, AppState};
pub use scheduler::{run_periodic_sync, run_scheduled_sync};
pub use sync::{ItemOutcome, ItemStatus, SyncOrchestrator, SyncRunResult};

use log::{error, info, warn};
use std::net::SocketAddr;
use tokio::net::TcpListener;

/// Process entry point: loads `.env`, sets up logging and serves until Ctrl-C.
pub fn run() -> std::io::Result<()> {
    let _ = dotenvy::dotenv();
    let _ = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info"),
    )
    .format_timestamp_millis()
    .try_init();

    info!("Starting time-log sync service");

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(serve())
}

/// Binds the HTTP surface and, when configured, the periodic bulk sync.
pub async fn serve() -> std::io::Result<()> {
    let (state, bind_addr, sync_interval) = match SyncConfig::from_env() {
        Ok(config) => match SyncOrchestrator::new(&config) {
            Ok(orchestrator) => (
                AppState::ready(orchestrator),
                config.bind_addr,
                config.sync_interval,
            ),
            Err(err) => {
                error!("DevOps client could not be created: {}", err);
                (
                    AppState::unconfigured(err.to_string()),
                    config.bind_addr,
                    None,
                )
            }
        },
        Err(err) => {
            error!("Configuration incomplete, sync requests will fail: {}", err);
            (
                AppState::unconfigured(err.to_string()),
                SyncConfig::bind_addr_from_env(),
                None,
            )
        }
    };

    match sync_interval {
        Some(every) => {
            tokio::spawn(run_periodic_sync(state.clone(), every));
        }
        None => warn!("Periodic sync disabled"),
    }

    listen(bind_addr, state).await
}

async fn listen(bind_addr: SocketAddr, state: AppState) -> std::io::Result<()> {
    let listener = TcpListener::bind(bind_addr).await?;
    info!("Listening on {}", listener.local_addr()?);
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("Shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", err);
        std::future::pending::<()>().await;
    }
}
