//! Lenient field decoders for documents written by third-party extensions.

use serde::de::Deserializer;
use serde::Deserialize;
use serde_json::Value;

/// Accepts strings, numbers and booleans; blank strings and nulls become `None`.
pub(crate) fn deserialize_string_field<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|val| match val {
        Value::String(text) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        }
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Null => None,
        other => serde_json::to_string(&other).ok(),
    }))
}

/// Keeps only JSON numbers; anything else decodes as `None` instead of failing the document.
pub(crate) fn deserialize_number_field<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(number)) => number.as_f64(),
        _ => None,
    })
}
