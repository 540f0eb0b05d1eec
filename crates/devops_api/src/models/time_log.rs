//! Documents stored by the TimeLog extension.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use super::wire::{deserialize_number_field, deserialize_string_field};

/// Represents one time-log document: the work item it was logged against, the user, entry type, logged minutes, date and optional notes.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TimeLogEntry {
    #[serde(default, deserialize_with = "deserialize_string_field")]
    pub work_item_id: Option<String>,
    #[serde(default, deserialize_with = "deserialize_string_field")]
    pub user: Option<String>,
    #[serde(default, rename = "type", deserialize_with = "deserialize_string_field")]
    pub entry_type: Option<String>,
    /// Logged minutes. Absent when the stored value is not a number.
    #[serde(default, deserialize_with = "deserialize_number_field")]
    pub time: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_string_field")]
    pub date: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_string_field"
    )]
    pub notes: Option<String>,
}

impl TimeLogEntry {
    /// Compares the entry's work item against `work_item_id` by their textual form.
    pub fn belongs_to(&self, work_item_id: &str) -> bool {
        self.work_item_id.as_deref() == Some(work_item_id.trim())
    }
}

/// The documents endpoint answers either with a bare array or with a `{ "value": [...] }` envelope.
/// Elements stay raw until [`TimeLogDocuments::into_entries`] so one foreign document cannot void the collection.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum TimeLogDocuments {
    Bare(Vec<Value>),
    Wrapped {
        #[serde(default)]
        value: Vec<Value>,
    },
}

impl TimeLogDocuments {
    /// Decodes every object element; anything else is skipped with a warning.
    pub fn into_entries(self) -> Vec<TimeLogEntry> {
        let documents = match self {
            TimeLogDocuments::Bare(documents) => documents,
            TimeLogDocuments::Wrapped { value } => value,
        };

        documents
            .into_iter()
            .enumerate()
            .filter_map(|(index, document)| {
                if !document.is_object() {
                    warn!(
                        index,
                        kind = json_kind(&document),
                        "skipping non-object time-log document"
                    );
                    return None;
                }
                match serde_json::from_value::<TimeLogEntry>(document) {
                    Ok(entry) => Some(entry),
                    Err(err) => {
                        warn!(index, error = %err, "skipping undecodable time-log document");
                        None
                    }
                }
            })
            .collect()
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_bare_array_and_value_envelope() {
        let bare: TimeLogDocuments =
            serde_json::from_str(r#"[{"workItemId": 7, "time": 30}]"#).unwrap();
        let wrapped: TimeLogDocuments =
            serde_json::from_str(r#"{"count": 1, "value": [{"workItemId": "7", "time": 30}]}"#)
                .unwrap();

        assert_eq!(bare.into_entries(), wrapped.into_entries());
    }

    #[test]
    fn non_object_documents_are_skipped() {
        let docs: TimeLogDocuments = serde_json::from_str(
            r#"[{"workItemId": 7, "time": 60}, null, "stray", 12, {"workItemId": 7, "time": 30}]"#,
        )
        .unwrap();
        let entries = docs.into_entries();

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].time, Some(30.0));

        let wrapped: TimeLogDocuments =
            serde_json::from_str(r#"{"value": [[1, 2], {"workItemId": "8"}]}"#).unwrap();
        assert_eq!(wrapped.into_entries().len(), 1);
    }

    #[test]
    fn envelope_without_value_is_empty() {
        let docs: TimeLogDocuments = serde_json::from_str(r#"{"count": 0}"#).unwrap();
        assert!(docs.into_entries().is_empty());
    }

    #[test]
    fn decodes_full_document_and_ignores_unknown_fields() {
        let entry: TimeLogEntry = serde_json::from_str(
            r#"{
                "id": "b3c1",
                "__etag": 2,
                "workItemId": 42,
                "user": "Ana Ruiz",
                "type": "Development",
                "time": 45,
                "date": "2025-05-03",
                "notes": "pairing"
            }"#,
        )
        .unwrap();

        assert_eq!(entry.work_item_id.as_deref(), Some("42"));
        assert_eq!(entry.user.as_deref(), Some("Ana Ruiz"));
        assert_eq!(entry.entry_type.as_deref(), Some("Development"));
        assert_eq!(entry.time, Some(45.0));
        assert_eq!(entry.date.as_deref(), Some("2025-05-03"));
        assert_eq!(entry.notes.as_deref(), Some("pairing"));
    }

    #[test]
    fn belongs_to_ignores_identifier_type() {
        let numeric: TimeLogEntry = serde_json::from_str(r#"{"workItemId": 42}"#).unwrap();
        let textual: TimeLogEntry = serde_json::from_str(r#"{"workItemId": "42"}"#).unwrap();

        assert!(numeric.belongs_to("42"));
        assert!(textual.belongs_to("42"));
        assert!(!numeric.belongs_to("420"));
        assert!(!TimeLogEntry::default().belongs_to("42"));
    }

    #[test]
    fn serializes_with_wire_field_names() {
        let entry = TimeLogEntry {
            work_item_id: Some("7".to_string()),
            entry_type: Some("Meeting".to_string()),
            time: Some(15.0),
            ..TimeLogEntry::default()
        };
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["workItemId"], "7");
        assert_eq!(json["type"], "Meeting");
        assert!(json.get("notes").is_none());
    }
}
