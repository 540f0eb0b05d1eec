//! Finds the tasks a bulk run should refresh.

use chrono::{DateTime, Datelike, NaiveDate, TimeZone, Utc};
use devops_api::{DevOpsClient, WorkItemId};
use log::{debug, info, warn};

use crate::redact::redact_log_details;

/// First instant of the UTC calendar month containing `now`.
pub fn start_of_month(now: DateTime<Utc>) -> DateTime<Utc> {
    NaiveDate::from_ymd_opt(now.year(), now.month(), 1)
        .and_then(|day| day.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
        .unwrap_or(now)
}

/// WIQL selecting the project's tasks changed at or after `since`.
pub fn changed_tasks_query(project: &str, since: DateTime<Utc>) -> String {
    format!(
        "SELECT [System.Id] FROM WorkItems \
         WHERE [System.WorkItemType] = 'Task' \
         AND [System.TeamProject] = '{}' \
         AND [System.ChangedDate] >= '{}'",
        project.trim().replace('\'', "''"),
        since.format("%Y-%m-%dT%H:%M:%SZ")
    )
}

#[derive(Clone)]
pub struct TaskDiscovery {
    api: DevOpsClient,
}

impl TaskDiscovery {
    pub fn new(api: DevOpsClient) -> Self {
        Self { api }
    }

    /// Ids of tasks changed this month (UTC). The window moves with the calendar.
    pub async fn list_tasks_changed_this_month(&self) -> Vec<WorkItemId> {
        self.list_task_ids_changed_since(start_of_month(Utc::now()))
            .await
    }

    /// Ids of tasks changed at or after `reference`. Query failures are logged and yield an empty list.
    pub async fn list_task_ids_changed_since(&self, reference: DateTime<Utc>) -> Vec<WorkItemId> {
        let project = &self.api.config().project;
        info!(
            "Listing tasks of project {} changed since {}",
            project,
            reference.to_rfc3339()
        );

        let query = changed_tasks_query(project, reference);
        match self.api.query_work_items(&query).await {
            Ok(items) => {
                info!("WIQL query returned {} tasks", items.len());
                items.into_iter().map(|item| item.id).collect()
            }
            Err(err) => {
                warn!("WIQL query for project {} failed", project);
                debug!("WIQL failure details: {}", redact_log_details(&err.to_string()));
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::api_for;
    use mockito::{Matcher, Server};
    use serde_json::json;

    fn at(rfc3339: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(rfc3339)
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn start_of_month_truncates_to_first_midnight() {
        assert_eq!(
            start_of_month(at("2025-05-17T13:45:12Z")),
            at("2025-05-01T00:00:00Z")
        );
        assert_eq!(
            start_of_month(at("2024-02-29T23:59:59Z")),
            at("2024-02-01T00:00:00Z")
        );
        assert_eq!(
            start_of_month(at("2025-01-01T00:00:00Z")),
            at("2025-01-01T00:00:00Z")
        );
    }

    #[test]
    fn query_filters_type_project_and_changed_date() {
        let query = changed_tasks_query("Fabrikam", at("2025-05-01T00:00:00Z"));
        assert_eq!(
            query,
            "SELECT [System.Id] FROM WorkItems \
             WHERE [System.WorkItemType] = 'Task' \
             AND [System.TeamProject] = 'Fabrikam' \
             AND [System.ChangedDate] >= '2025-05-01T00:00:00Z'"
        );
    }

    #[test]
    fn query_escapes_quotes_in_project_name() {
        let query = changed_tasks_query("O'Brien Ops", at("2025-05-01T00:00:00Z"));
        assert!(query.contains("[System.TeamProject] = 'O''Brien Ops'"));
    }

    #[tokio::test]
    async fn returns_ids_from_wiql_result() {
        let since = at("2025-05-01T00:00:00Z");
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/contoso/Fabrikam/_apis/wit/wiql")
            .match_query(Matcher::Any)
            .match_body(Matcher::Json(json!({
                "query": changed_tasks_query("Fabrikam", since)
            })))
            .with_status(200)
            .with_body(r#"{"workItems": [{"id": 11}, {"id": 12}]}"#)
            .create_async()
            .await;

        let discovery = TaskDiscovery::new(api_for(&server));
        let ids = discovery.list_task_ids_changed_since(since).await;

        mock.assert_async().await;
        assert_eq!(ids, vec![11, 12]);
    }

    #[tokio::test]
    async fn failed_query_yields_no_tasks() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/contoso/Fabrikam/_apis/wit/wiql")
            .match_query(Matcher::Any)
            .with_status(400)
            .with_body(r#"{"message": "TF51005: The query references a field that does not exist."}"#)
            .create_async()
            .await;

        let discovery = TaskDiscovery::new(api_for(&server));
        assert!(discovery.list_tasks_changed_this_month().await.is_empty());
    }
}
