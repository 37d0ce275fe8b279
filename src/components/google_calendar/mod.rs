mod client;
pub mod models;
pub mod time;

pub use client::GoogleCalendarClient;
pub use models::{CalendarEntry, EntryPatch, NewEntry};

use crate::error::SyncResult;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Operations the sync needs from a calendar
#[async_trait]
pub trait CalendarService: Send + Sync {
    /// Fail with `CalendarNotFound` if the configured calendar does not exist
    async fn ensure_calendar(&self) -> SyncResult<()>;

    /// Entries overlapping `[start, end)`
    async fn list_entries(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> SyncResult<Vec<CalendarEntry>>;

    /// Create an entry and return it as stored
    async fn create_entry(&self, entry: &NewEntry) -> SyncResult<CalendarEntry>;

    /// Write the fields set in `patch`
    async fn update_entry(&self, entry_id: &str, patch: &EntryPatch) -> SyncResult<()>;

    async fn delete_entry(&self, entry_id: &str) -> SyncResult<()>;
}
