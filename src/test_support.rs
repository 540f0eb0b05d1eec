//! Shared fixtures for tests that talk to a mockito server.

use devops_api::{DevOpsClient, DevOpsConfig};
use mockito::ServerGuard;

use crate::config::DEFAULT_HOURS_FIELD;
use crate::discovery::TaskDiscovery;
use crate::sync::SyncOrchestrator;
use crate::time_log::TimeLogClient;
use crate::updater::WorkItemUpdater;

pub const DOCUMENTS_PATH: &str = "/contoso/_apis/ExtensionManagement/InstalledExtensions/TechsBCN/DevOps-TimeLog/Data/Scopes/Default/Current/Collections/TimeLogData/Documents";

pub fn api_for(server: &ServerGuard) -> DevOpsClient {
    let config = DevOpsConfig::new("contoso", "Fabrikam", "pat-123")
        .with_base_url(server.url())
        .with_extension_base_url(server.url());
    DevOpsClient::new(config).expect("test client should build")
}

pub fn orchestrator_for(server: &ServerGuard) -> SyncOrchestrator {
    let api = api_for(server);
    SyncOrchestrator::from_parts(
        TimeLogClient::new(api.clone()),
        WorkItemUpdater::new(api.clone(), DEFAULT_HOURS_FIELD),
        TaskDiscovery::new(api),
    )
}
