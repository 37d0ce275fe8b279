use crate::error::{invalid_event_error, SyncResult};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Duration assumed for events that do not state an end time
pub const DEFAULT_EVENT_DURATION_HOURS: i64 = 2;

/// Event record as reported by the GroupMe events list
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct RemoteEvent {
    /// Stable identifier used for the calendar tag
    pub event_id: String,
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    pub start_at: String,
    #[serde(default)]
    pub end_at: Option<String>,
    #[serde(default)]
    pub location: Option<EventLocation>,
    #[serde(default)]
    pub going_count: Option<i64>,
}

/// Location attached to a GroupMe event
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct EventLocation {
    #[serde(default)]
    pub name: Option<String>,
}

impl RemoteEvent {
    /// Parsed start time
    pub fn start(&self) -> SyncResult<DateTime<Utc>> {
        parse_timestamp(&self.start_at)
    }

    /// Parsed end time, start plus the default duration when absent
    pub fn end(&self) -> SyncResult<DateTime<Utc>> {
        match &self.end_at {
            Some(end_at) => parse_timestamp(end_at),
            None => Ok(self.start()? + Duration::hours(DEFAULT_EVENT_DURATION_HOURS)),
        }
    }

    /// Location name, if any
    pub fn location_name(&self) -> Option<&str> {
        self.location.as_ref().and_then(|l| l.name.as_deref())
    }

    /// Stand-in for a record that does not fit `RemoteEvent`
    ///
    /// Keeps only the ids, so the record still counts as seen and fails on
    /// its own when its start time is read. `None` without an `event_id`.
    pub fn unreadable(record: &Value) -> Option<Self> {
        let event_id = id_field(record, "event_id").filter(|id| !id.is_empty())?;
        Some(Self {
            event_id,
            id: id_field(record, "id").unwrap_or_default(),
            ..Default::default()
        })
    }
}

fn id_field(record: &Value, key: &str) -> Option<String> {
    match record.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn parse_timestamp(value: &str) -> SyncResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| invalid_event_error(&format!("Failed to parse timestamp '{}': {}", value, e)))
}

/// Body of the events list response
#[derive(Debug, Deserialize, Default)]
pub struct GroupMeResponse {
    #[serde(default)]
    pub response: Option<EventsPayload>,
    #[serde(default)]
    pub meta: Option<ResponseMeta>,
}

/// Events are kept as raw records so one bad record cannot fail the list
#[derive(Debug, Deserialize, Default)]
pub struct EventsPayload {
    #[serde(default)]
    pub events: Option<Vec<Value>>,
}

#[derive(Debug, Deserialize, Default)]
pub struct ResponseMeta {
    #[serde(default)]
    pub errors: Option<Vec<String>>,
}

impl GroupMeResponse {
    /// First error message reported in `meta.errors`
    pub fn first_error(&self) -> Option<&str> {
        self.meta
            .as_ref()
            .and_then(|m| m.errors.as_ref())
            .and_then(|errors| errors.first())
            .map(String::as_str)
    }
}

/// Result of one fetch from GroupMe
///
/// A failed fetch is kept distinct from an empty one so the reconciler can
/// decide what the cleanup pass does with it.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    Fetched(Vec<RemoteEvent>),
    Failed(String),
}

impl FetchOutcome {
    /// Events of a successful fetch, empty for a failed one
    pub fn events(&self) -> &[RemoteEvent] {
        match self {
            FetchOutcome::Fetched(events) => events,
            FetchOutcome::Failed(_) => &[],
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, FetchOutcome::Failed(_))
    }
}
