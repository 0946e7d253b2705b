//! Encoding of a committed block list for the schedule-generation request.
//!
//! Each block becomes `{"startTime": "HHMM", "endTime": "HHMM", "day": n}`
//! with 24-hour, zero-padded times. Midnight at the end of a day is `"2400"`.

use serde::{Deserialize, Serialize};

use crate::engine::sorted_week;
use crate::model::*;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmittedAvailability {
    pub start_time: String,
    pub end_time: String,
    pub day: Day,
}

pub fn format_hhmm(minute: Minute) -> String {
    format!("{:02}{:02}", minute / 60, minute % 60)
}

/// One record per block, ordered by day then start.
pub fn to_submission(blocks: &[Block]) -> Vec<SubmittedAvailability> {
    sorted_week(blocks)
        .iter()
        .map(|b| SubmittedAvailability {
            start_time: format_hhmm(b.span.start),
            end_time: format_hhmm(b.span.end),
            day: b.day,
        })
        .collect()
}

pub fn to_json(blocks: &[Block]) -> serde_json::Result<String> {
    serde_json::to_string(&to_submission(blocks))
}
