use crate::auth::basic_auth_value;
use crate::config::DevOpsConfig;
use crate::error::{DevOpsError, Result};
use crate::models::{
    PatchOperation, TimeLogDocuments, TimeLogEntry, WiqlQuery, WiqlQueryResult, WorkItemId,
    WorkItemReference,
};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use reqwest::{Client as HttpClient, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;

const JSON_PATCH_CONTENT_TYPE: &str = "application/json-patch+json";

/// Status and raw body of a write call, returned as-is so callers can decide what counts as success.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub body: String,
}

#[derive(Clone)]
pub struct DevOpsClient {
    http: HttpClient,
    config: DevOpsConfig,
}

impl DevOpsClient {
    pub fn new(config: DevOpsConfig) -> Result<Self> {
        let missing = config.missing_fields();
        if !missing.is_empty() {
            return Err(DevOpsError::Configuration(format!(
                "missing required settings: {}",
                missing.join(", ")
            )));
        }
        let http = build_http_client(&config)?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &DevOpsConfig {
        &self.config
    }

    /// Reads the whole time-log document collection. There is no paging: the collection is returned in one response.
    pub async fn get_time_log_documents(&self) -> Result<Vec<TimeLogEntry>> {
        let url = self.config.timelog_documents_url();
        let accept = header_value(format!(
            "application/json;api-version={}",
            self.config.timelog_api_version
        ))?;
        debug!(url = %url, "fetching time-log documents");
        let response = self.http.get(url).header(ACCEPT, accept).send().await?;
        let documents: TimeLogDocuments = Self::parse_json(response).await?;
        Ok(documents.into_entries())
    }

    /// Runs a flat WIQL query and returns the referenced work items.
    pub async fn query_work_items(&self, wiql: &str) -> Result<Vec<WorkItemReference>> {
        let url = format!("{}wiql", self.config.wit_root());
        debug!(url = %url, "running wiql query");
        let response = self
            .http
            .post(url)
            .query(&[("api-version", self.config.wit_api_version.as_str())])
            .json(&WiqlQuery { query: wiql })
            .send()
            .await?;
        let result: WiqlQueryResult = Self::parse_json(response).await?;
        Ok(result.work_items)
    }

    /// Sends a JSON-patch update for one work item. Any HTTP status is returned as `Ok`; transport failures, including an unreadable response body, are errors.
    pub async fn patch_work_item(
        &self,
        work_item_id: WorkItemId,
        operations: &[PatchOperation],
    ) -> Result<ApiResponse> {
        let url = format!("{}workitems/{}", self.config.wit_root(), work_item_id);
        let body = serde_json::to_vec(operations)?;
        debug!(url = %url, operations = operations.len(), "patching work item");
        let response = self
            .http
            .patch(url)
            .query(&[("api-version", self.config.wit_api_version.as_str())])
            .header(CONTENT_TYPE, HeaderValue::from_static(JSON_PATCH_CONTENT_TYPE))
            .body(body)
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await.map_err(|err| {
            debug!(status = %status, error = %err, "patch response body could not be read");
            DevOpsError::from(err)
        })?;
        Ok(ApiResponse { status, body })
    }

    async fn parse_json<T>(response: Response) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let status = response.status();
        if status.is_success() {
            let bytes = response.bytes().await?;
            serde_json::from_slice(&bytes).map_err(DevOpsError::from)
        } else if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            let body = response.text().await.unwrap_or_default();
            Err(DevOpsError::Authentication(format!(
                "Access denied ({}) - {}",
                status, body
            )))
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(DevOpsError::http(status, body))
        }
    }
}

fn build_http_client(config: &DevOpsConfig) -> Result<HttpClient> {
    let mut headers = HeaderMap::new();
    headers.insert(AUTHORIZATION, basic_auth_value(&config.pat)?);
    headers.insert(USER_AGENT, header_value(config.user_agent.clone())?);

    HttpClient::builder()
        .default_headers(headers)
        .timeout(config.timeout)
        .connect_timeout(config.connect_timeout)
        .build()
        .map_err(|err| DevOpsError::Other(err.to_string()))
}

fn header_value(value: String) -> Result<HeaderValue> {
    HeaderValue::from_str(&value).map_err(|err| DevOpsError::Other(err.to_string()))
}
