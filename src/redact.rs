//! Log-safe rendering of payloads and Azure DevOps error bodies.

use serde_json::Value;
use std::borrow::Cow;

const SENSITIVE_HINTS: [&str; 6] = [
    "token",
    "authorization",
    "basic ",
    "bearer ",
    "password",
    "set-cookie",
];
const DETAILS_LIMIT: usize = 180;

pub fn collapse_whitespace(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Char-safe truncation to at most `limit` characters, ellipsis included.
pub fn truncate_text(value: &str, limit: usize) -> String {
    let trimmed = value.trim();
    if trimmed.chars().count() <= limit {
        return trimmed.to_string();
    }
    match limit {
        0 | 1 => "…".to_string(),
        _ => trimmed.chars().take(limit - 1).chain(Some('…')).collect(),
    }
}

/// Condenses an upstream failure for the log.
///
/// An embedded DevOps error document (`{"$id": .., "message": ..}`) is reduced to its message.
/// When the text hints at credentials only the leading category and the `TFnnnnn` code survive.
pub fn redact_log_details(value: &str) -> String {
    let collapsed = collapse_whitespace(&unwrap_error_document(value));
    let lowered = collapsed.to_lowercase();
    if !SENSITIVE_HINTS.iter().any(|hint| lowered.contains(hint)) {
        return truncate_text(&collapsed, DETAILS_LIMIT);
    }

    let category = collapsed
        .split(':')
        .next()
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .unwrap_or("error");
    match tf_error_code(&collapsed) {
        Some(code) => format!(
            "{} [{}]: <redacted-sensitive-details>",
            truncate_text(category, 64),
            code
        ),
        None => format!("{}: <redacted-sensitive-details>", truncate_text(category, 64)),
    }
}

fn unwrap_error_document(value: &str) -> Cow<'_, str> {
    let Some(start) = value.find('{') else {
        return Cow::Borrowed(value);
    };
    let message = serde_json::from_str::<Value>(&value[start..])
        .ok()
        .and_then(|document| {
            document
                .get("message")
                .and_then(Value::as_str)
                .map(str::to_string)
        });
    match message {
        Some(message) => Cow::Owned(format!("{}{}", &value[..start], message)),
        None => Cow::Borrowed(value),
    }
}

/// First Team Foundation error code (`TF401349`) in `value`.
fn tf_error_code(value: &str) -> Option<&str> {
    value
        .split(|c: char| !c.is_ascii_alphanumeric())
        .find(|word| {
            word.len() > 2
                && word.starts_with("TF")
                && word[2..].chars().all(|c| c.is_ascii_digit())
        })
}
