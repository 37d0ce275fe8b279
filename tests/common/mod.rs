#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use groupme_calendar_sync::components::google_calendar::{
    CalendarEntry, CalendarService, EntryPatch, NewEntry,
};
use groupme_calendar_sync::components::groupme::RemoteEvent;
use groupme_calendar_sync::error::{google_calendar_error, Error, SyncResult};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// A write the sync performed against the mock calendar
#[derive(Debug, Clone, PartialEq)]
pub enum Write {
    Create(NewEntry),
    Update(String, EntryPatch),
    Delete(String),
}

/// In-memory calendar recording every write
#[derive(Debug, Default)]
pub struct MockCalendar {
    entries: Mutex<Vec<CalendarEntry>>,
    writes: Mutex<Vec<Write>>,
    next_id: AtomicUsize,
    failing_titles: Vec<String>,
    missing: bool,
    failing_list: bool,
    blank_created_descriptions: bool,
}

impl MockCalendar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Calendar pre-populated with entries
    pub fn with_entries(entries: Vec<CalendarEntry>) -> Self {
        Self {
            entries: Mutex::new(entries),
            ..Default::default()
        }
    }

    /// Make creating an entry with this title fail
    pub fn failing_create(mut self, title: &str) -> Self {
        self.failing_titles.push(title.to_string());
        self
    }

    /// Pretend the configured calendar does not exist
    pub fn missing(mut self) -> Self {
        self.missing = true;
        self
    }

    /// Answer creates with an empty description, as an API that does not
    /// echo the body would
    pub fn blank_created_descriptions(mut self) -> Self {
        self.blank_created_descriptions = true;
        self
    }

    /// Make listing the window fail
    pub fn failing_list(mut self) -> Self {
        self.failing_list = true;
        self
    }

    pub fn entries(&self) -> Vec<CalendarEntry> {
        self.entries.lock().unwrap().clone()
    }

    pub fn writes(&self) -> Vec<Write> {
        self.writes.lock().unwrap().clone()
    }

    pub fn entry(&self, id: &str) -> Option<CalendarEntry> {
        self.entries().into_iter().find(|e| e.id == id)
    }
}

#[async_trait]
impl CalendarService for MockCalendar {
    async fn ensure_calendar(&self) -> SyncResult<()> {
        if self.missing {
            return Err(Error::CalendarNotFound("mock-calendar".to_string()));
        }
        Ok(())
    }

    async fn list_entries(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> SyncResult<Vec<CalendarEntry>> {
        if self.failing_list {
            return Err(google_calendar_error("Failed to fetch events: HTTP 500"));
        }
        Ok(self
            .entries()
            .into_iter()
            .filter(|e| e.start < end && e.end > start)
            .collect())
    }

    async fn create_entry(&self, entry: &NewEntry) -> SyncResult<CalendarEntry> {
        if self.failing_titles.contains(&entry.title) {
            return Err(google_calendar_error("Failed to create event: HTTP 500"));
        }
        let n = self.next_id.fetch_add(1, Ordering::SeqCst);
        let created = CalendarEntry {
            id: format!("created-{}", n),
            title: entry.title.clone(),
            start: entry.start,
            end: entry.end,
            description: entry.description.clone(),
            location: entry.location.clone(),
        };
        self.entries.lock().unwrap().push(created.clone());
        self.writes.lock().unwrap().push(Write::Create(entry.clone()));
        if self.blank_created_descriptions {
            return Ok(CalendarEntry {
                description: String::new(),
                ..created
            });
        }
        Ok(created)
    }

    async fn update_entry(&self, entry_id: &str, patch: &EntryPatch) -> SyncResult<()> {
        let mut entries = self.entries.lock().unwrap();
        let entry = entries
            .iter_mut()
            .find(|e| e.id == entry_id)
            .ok_or_else(|| google_calendar_error("Failed to update event: HTTP 404"))?;
        patch.apply_to(entry);
        self.writes
            .lock()
            .unwrap()
            .push(Write::Update(entry_id.to_string(), patch.clone()));
        Ok(())
    }

    async fn delete_entry(&self, entry_id: &str) -> SyncResult<()> {
        self.entries.lock().unwrap().retain(|e| e.id != entry_id);
        self.writes
            .lock()
            .unwrap()
            .push(Write::Delete(entry_id.to_string()));
        Ok(())
    }
}

/// Reference "now" for reconciler tests
pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap()
}

pub fn utc(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
}

/// Remote event with only the required fields set
pub fn remote_event(event_id: &str, name: &str, start_at: &str) -> RemoteEvent {
    RemoteEvent {
        event_id: event_id.to_string(),
        id: format!("msg-{}", event_id),
        name: Some(name.to_string()),
        start_at: start_at.to_string(),
        ..Default::default()
    }
}

/// Entry as the sync would have left it for a remote event
pub fn linked_entry(
    id: &str,
    remote_id: &str,
    title: &str,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    body: &str,
) -> CalendarEntry {
    CalendarEntry {
        id: id.to_string(),
        title: title.to_string(),
        start,
        end,
        description: format!("{}\n\n[GroupMe Event ID: {}]", body, remote_id),
        location: String::new(),
    }
}
