use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A calendar entry to be persisted by the event sink.
///
/// Timestamps are naive local instants; no timezone is attached anywhere
/// in the pipeline.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct CalendarEvent {
    pub title: String,
    pub description: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}
