use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// Calendar event as seen by the sync
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarEntry {
    pub id: String,
    pub title: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub description: String,
    pub location: String,
}

/// Values for a calendar event to be created
#[derive(Debug, Clone, PartialEq)]
pub struct NewEntry {
    pub title: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub description: String,
    pub location: String,
}

/// Partial update of a calendar event; `None` fields are left untouched
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntryPatch {
    pub title: Option<String>,
    /// Start and end always change together
    pub time: Option<(DateTime<Utc>, DateTime<Utc>)>,
    pub description: Option<String>,
    pub location: Option<String>,
}

impl EntryPatch {
    /// Patch that only rewrites the description
    pub fn description(description: String) -> Self {
        Self {
            description: Some(description),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.time.is_none()
            && self.description.is_none()
            && self.location.is_none()
    }

    /// Apply the patch to an entry in place
    pub fn apply_to(&self, entry: &mut CalendarEntry) {
        if let Some(title) = &self.title {
            entry.title = title.clone();
        }
        if let Some((start, end)) = self.time {
            entry.start = start;
            entry.end = end;
        }
        if let Some(description) = &self.description {
            entry.description = description.clone();
        }
        if let Some(location) = &self.location {
            entry.location = location.clone();
        }
    }

    /// Google Calendar PATCH body
    pub fn to_google_json(&self) -> Value {
        let mut body = Map::new();
        if let Some(title) = &self.title {
            body.insert("summary".to_string(), json!(title));
        }
        if let Some((start, end)) = self.time {
            body.insert("start".to_string(), json!(GoogleEventTime::at(start)));
            body.insert("end".to_string(), json!(GoogleEventTime::at(end)));
        }
        if let Some(description) = &self.description {
            body.insert("description".to_string(), json!(description));
        }
        if let Some(location) = &self.location {
            body.insert("location".to_string(), json!(location));
        }
        Value::Object(body)
    }
}

/// Event resource of the Google Calendar API
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct GoogleEvent {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default)]
    pub start: GoogleEventTime,
    #[serde(default)]
    pub end: GoogleEventTime,
}

/// Start or end of a Google event; all-day events only carry `date`
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct GoogleEventTime {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

impl GoogleEventTime {
    pub fn at(time: DateTime<Utc>) -> Self {
        Self {
            date_time: Some(time.to_rfc3339()),
            date: None,
        }
    }
}

impl From<&NewEntry> for GoogleEvent {
    fn from(entry: &NewEntry) -> Self {
        Self {
            summary: Some(entry.title.clone()),
            description: Some(entry.description.clone()),
            location: (!entry.location.is_empty()).then(|| entry.location.clone()),
            start: GoogleEventTime::at(entry.start),
            end: GoogleEventTime::at(entry.end),
            ..Default::default()
        }
    }
}

/// One page of an events list response
#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct GoogleEventList {
    #[serde(default)]
    pub items: Vec<GoogleEvent>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}
