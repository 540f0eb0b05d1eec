//! Minute totals, hour conversion and grouping of time-log entries.

use devops_api::{TimeLogEntry, WorkItemId};
use serde::Serialize;
use std::collections::HashMap;

const UNKNOWN_KEY: &str = "unknown";

/// Totals computed for one work item.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregationResult {
    pub work_item_id: WorkItemId,
    pub total_minutes: f64,
    pub total_hours: f64,
}

/// Per-day slice of a [`TimeLogSummary`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DaySummary {
    pub date: String,
    pub minutes: f64,
    pub hours: f64,
    pub entries: Vec<TimeLogEntry>,
}

/// Read-only report of the time logged against one work item.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeLogSummary {
    #[serde(flatten)]
    pub totals: AggregationResult,
    pub days: Vec<DaySummary>,
}

/// Rounds to two decimals, halves away from zero (`0.125` → `0.13`).
pub fn round_hours(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub fn minutes_to_hours(minutes: f64) -> f64 {
    round_hours(minutes / 60.0)
}

/// Sum of the usable `time` values. Non-numeric, non-finite and negative values are skipped.
pub fn total_minutes(entries: &[TimeLogEntry]) -> f64 {
    entries
        .iter()
        .filter_map(|entry| entry.time)
        .filter(|minutes| minutes.is_finite() && *minutes >= 0.0)
        .sum()
}

pub fn aggregate(work_item_id: WorkItemId, entries: &[TimeLogEntry]) -> AggregationResult {
    let total_minutes = total_minutes(entries);
    AggregationResult {
        work_item_id,
        total_minutes,
        total_hours: minutes_to_hours(total_minutes),
    }
}

/// Groups entries by calendar day, keeping first-seen day order and input order inside each day.
pub fn group_by_date(entries: &[TimeLogEntry]) -> Vec<(String, Vec<TimeLogEntry>)> {
    group_by(entries, |entry| day_key(entry.date.as_deref()))
}

/// Groups entries by work item id (as text), keeping first-seen order.
pub fn group_by_work_item(entries: &[TimeLogEntry]) -> Vec<(String, Vec<TimeLogEntry>)> {
    group_by(entries, |entry| {
        entry
            .work_item_id
            .clone()
            .unwrap_or_else(|| UNKNOWN_KEY.to_string())
    })
}

pub fn summarize(work_item_id: WorkItemId, entries: &[TimeLogEntry]) -> TimeLogSummary {
    let days = group_by_date(entries)
        .into_iter()
        .map(|(date, entries)| {
            let minutes = total_minutes(&entries);
            DaySummary {
                date,
                minutes,
                hours: minutes_to_hours(minutes),
                entries,
            }
        })
        .collect();

    TimeLogSummary {
        totals: aggregate(work_item_id, entries),
        days,
    }
}

fn group_by<F>(entries: &[TimeLogEntry], key_of: F) -> Vec<(String, Vec<TimeLogEntry>)>
where
    F: Fn(&TimeLogEntry) -> String,
{
    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<(String, Vec<TimeLogEntry>)> = Vec::new();

    for entry in entries {
        let key = key_of(entry);
        match positions.get(&key) {
            Some(&index) => groups[index].1.push(entry.clone()),
            None => {
                positions.insert(key.clone(), groups.len());
                groups.push((key, vec![entry.clone()]));
            }
        }
    }

    groups
}

fn day_key(date: Option<&str>) -> String {
    let Some(raw) = date.map(str::trim).filter(|value| !value.is_empty()) else {
        return UNKNOWN_KEY.to_string();
    };
    raw.get(..10)
        .filter(|prefix| chrono::NaiveDate::parse_from_str(prefix, "%Y-%m-%d").is_ok())
        .unwrap_or(raw)
        .to_string()
}
