//! Service-hook payloads that trigger a single-item sync.

use devops_api::WorkItemId;
use serde::Deserialize;
use serde_json::Value;

use crate::error::SyncError;

/// Largest id a JSON float still represents exactly (2^53).
const MAX_EXACT_ID: f64 = 9_007_199_254_740_992.0;

/// Inbound work item event. Only the `resource` object is read.
#[derive(Debug, Default, Deserialize)]
pub struct WorkItemEvent {
    #[serde(default)]
    pub resource: Option<EventResource>,
}

/// Work item events carry the id as `resource.workItemId` (update events, where `id` is the revision) or as `resource.id` (create events).
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventResource {
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub work_item_id: Option<Value>,
}

impl WorkItemEvent {
    pub fn from_slice(body: &[u8]) -> Result<Self, SyncError> {
        serde_json::from_slice(body).map_err(|err| SyncError::InvalidPayload(err.to_string()))
    }

    /// Canonical work item id, preferring `workItemId` over `id`.
    pub fn work_item_id(&self) -> Result<WorkItemId, SyncError> {
        let resource = self.resource.as_ref().ok_or(SyncError::MissingWorkItemId)?;
        resource
            .work_item_id
            .as_ref()
            .and_then(parse_id)
            .or_else(|| resource.id.as_ref().and_then(parse_id))
            .ok_or(SyncError::MissingWorkItemId)
    }
}

fn parse_id(value: &Value) -> Option<WorkItemId> {
    let id = match value {
        Value::Number(number) => number.as_u64().or_else(|| {
            number
                .as_f64()
                .filter(|float| {
                    float.fract() == 0.0 && (1.0..=MAX_EXACT_ID).contains(float)
                })
                .map(|float| float as WorkItemId)
        }),
        Value::String(text) => text.trim().parse::<WorkItemId>().ok(),
        _ => None,
    }?;
    (id > 0).then_some(id)
}
