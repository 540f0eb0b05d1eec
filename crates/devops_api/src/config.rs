use std::time::Duration;

pub const DEFAULT_DEVOPS_BASE: &str = "https://dev.azure.com";
pub const DEFAULT_EXTENSION_BASE: &str = "https://extmgmt.dev.azure.com";
pub const DEFAULT_WIT_API_VERSION: &str = "7.0";
pub const DEFAULT_TIMELOG_API_VERSION: &str = "7.2-preview.1";
pub const DEFAULT_TIMELOG_PUBLISHER: &str = "TechsBCN";
pub const DEFAULT_TIMELOG_EXTENSION: &str = "DevOps-TimeLog";
pub const DEFAULT_TIMELOG_COLLECTION: &str = "TimeLogData";
pub const DEFAULT_USER_AGENT: &str = "timelog-sync";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Coordinates of the extension data collection that stores time-log documents.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TimeLogCollection {
    pub publisher: String,
    pub extension: String,
    pub collection: String,
}

impl Default for TimeLogCollection {
    fn default() -> Self {
        Self {
            publisher: DEFAULT_TIMELOG_PUBLISHER.to_string(),
            extension: DEFAULT_TIMELOG_EXTENSION.to_string(),
            collection: DEFAULT_TIMELOG_COLLECTION.to_string(),
        }
    }
}

#[derive(Clone)]
pub struct DevOpsConfig {
    pub organization: String,
    pub project: String,
    pub pat: String,
    pub base_url: String,
    pub extension_base_url: String,
    pub wit_api_version: String,
    pub timelog_api_version: String,
    pub timelog: TimeLogCollection,
    pub user_agent: String,
    pub timeout: Duration,
    pub connect_timeout: Duration,
}

impl std::fmt::Debug for DevOpsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DevOpsConfig")
            .field("organization", &self.organization)
            .field("project", &self.project)
            .field("pat", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("extension_base_url", &self.extension_base_url)
            .field("timelog", &self.timelog)
            .finish_non_exhaustive()
    }
}

impl DevOpsConfig {
    pub fn new(
        organization: impl Into<String>,
        project: impl Into<String>,
        pat: impl Into<String>,
    ) -> Self {
        Self {
            organization: organization.into(),
            project: project.into(),
            pat: pat.into(),
            base_url: DEFAULT_DEVOPS_BASE.to_string(),
            extension_base_url: DEFAULT_EXTENSION_BASE.to_string(),
            wit_api_version: DEFAULT_WIT_API_VERSION.to_string(),
            timelog_api_version: DEFAULT_TIMELOG_API_VERSION.to_string(),
            timelog: TimeLogCollection::default(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_extension_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.extension_base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, duration: Duration) -> Self {
        self.timeout = duration;
        self
    }

    pub fn with_connect_timeout(mut self, duration: Duration) -> Self {
        self.connect_timeout = duration;
        self
    }

    /// Names of the required settings that are blank.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("organization", &self.organization),
            ("project", &self.project),
            ("pat", &self.pat),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect()
    }

    /// Root of the project-scoped work item tracking API.
    pub fn wit_root(&self) -> String {
        format!(
            "{}/{}/{}/_apis/wit/",
            self.base_url.trim_end_matches('/'),
            self.organization.trim(),
            self.project.trim()
        )
    }

    /// Documents endpoint of the time-log extension data collection.
    pub fn timelog_documents_url(&self) -> String {
        format!(
            "{}/{}/_apis/ExtensionManagement/InstalledExtensions/{}/{}/Data/Scopes/Default/Current/Collections/{}/Documents",
            self.extension_base_url.trim_end_matches('/'),
            self.organization.trim(),
            self.timelog.publisher,
            self.timelog.extension,
            self.timelog.collection
        )
    }
}
