use serde::{Deserialize, Serialize};
use serde_json::Value;

pub type WorkItemId = u64;

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct WorkItemReference {
    pub id: WorkItemId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct WiqlQuery<'a> {
    pub query: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WiqlQueryResult {
    #[serde(default)]
    pub work_items: Vec<WorkItemReference>,
}

/// One operation of a `application/json-patch+json` work item update.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct PatchOperation {
    pub op: &'static str,
    pub path: String,
    pub value: Value,
}

impl PatchOperation {
    /// Sets `field` (a reference name such as `Custom.HorasRegistradas`) to `value`.
    pub fn add_field(field: &str, value: impl Into<Value>) -> Self {
        Self {
            op: "add",
            path: format!("/fields/{}", field.trim()),
            value: value.into(),
        }
    }
}
