use super::description::{build_description, build_title};
use super::identity::IdentityStore;
use crate::components::google_calendar::{CalendarEntry, CalendarService, EntryPatch, NewEntry};
use crate::components::groupme::{FetchOutcome, RemoteEvent};
use crate::config::Config;
use crate::error::{config_error, SyncResult};
use chrono::{DateTime, Duration, Utc};
use std::collections::HashSet;
use std::fmt;
use tracing::{debug, error, info, warn};

/// Settings the reconciler needs from the configuration
#[derive(Debug, Clone)]
pub struct SyncSettings {
    /// Days ahead of now covered by the sync window
    pub horizon_days: u32,
    /// Title prefix marking entries owned by the sync
    pub event_prefix: String,
}

impl From<&Config> for SyncSettings {
    fn from(config: &Config) -> Self {
        Self {
            horizon_days: config.sync_days_ahead,
            event_prefix: config.event_prefix.clone(),
        }
    }
}

/// Counts of what a sync run did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub fetch_failed: bool,
    pub fetched: usize,
    pub created: usize,
    pub updated: usize,
    pub unchanged: usize,
    pub skipped_past: usize,
    pub failed: usize,
    pub deleted: usize,
    pub delete_failed: usize,
}

impl SyncReport {
    /// Number of entries written to the calendar
    pub fn writes(&self) -> usize {
        self.created + self.updated + self.deleted
    }

    fn record(&mut self, action: EventAction) {
        match action {
            EventAction::Created => self.created += 1,
            EventAction::Updated => self.updated += 1,
            EventAction::Unchanged => self.unchanged += 1,
            EventAction::SkippedPast => self.skipped_past += 1,
        }
    }
}

impl fmt::Display for SyncReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "fetched {}{}, created {}, updated {}, unchanged {}, skipped {} past, {} failed, deleted {} ({} failed)",
            self.fetched,
            if self.fetch_failed { " (fetch failed)" } else { "" },
            self.created,
            self.updated,
            self.unchanged,
            self.skipped_past,
            self.failed,
            self.deleted,
            self.delete_failed
        )
    }
}

/// What happened to a single remote event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EventAction {
    Created,
    Updated,
    Unchanged,
    SkippedPast,
}

/// Applies remote events to the calendar: create, update, then delete
pub struct Reconciler<'a> {
    calendar: &'a dyn CalendarService,
    identity: &'a dyn IdentityStore,
    settings: SyncSettings,
}

impl<'a> Reconciler<'a> {
    pub fn new(
        calendar: &'a dyn CalendarService,
        identity: &'a dyn IdentityStore,
        settings: SyncSettings,
    ) -> Self {
        Self {
            calendar,
            identity,
            settings,
        }
    }

    /// Reconcile the calendar window starting at `now` with a fetch result
    ///
    /// Failures on single events are logged and counted. Only a window that
    /// falls outside the date range or cannot be listed aborts the run.
    pub async fn reconcile(
        &self,
        outcome: &FetchOutcome,
        now: DateTime<Utc>,
    ) -> SyncResult<SyncReport> {
        let window_end = now
            .checked_add_signed(Duration::days(i64::from(self.settings.horizon_days)))
            .ok_or_else(|| {
                config_error(&format!(
                    "SYNC_DAYS_AHEAD of {} days is out of range",
                    self.settings.horizon_days
                ))
            })?;
        let candidates: Vec<CalendarEntry> = self
            .calendar
            .list_entries(now, window_end)
            .await?
            .into_iter()
            .filter(|e| e.title.starts_with(&self.settings.event_prefix))
            .collect();
        debug!("{} candidate calendar entries in window", candidates.len());

        let mut report = SyncReport {
            fetch_failed: outcome.is_failed(),
            fetched: outcome.events().len(),
            ..Default::default()
        };

        // A failed fetch counts as an empty event list, so the cleanup pass
        // below removes every linked entry in the window.
        let remote_events: &[RemoteEvent] = match outcome {
            FetchOutcome::Fetched(events) => events.as_slice(),
            FetchOutcome::Failed(reason) => {
                warn!("GroupMe fetch failed, treating event list as empty: {}", reason);
                &[]
            }
        };

        let mut seen = HashSet::new();
        for event in remote_events {
            seen.insert(event.event_id.clone());

            match self.sync_event(event, &candidates, now).await {
                Ok(action) => report.record(action),
                Err(e) => {
                    error!(
                        "Error processing GroupMe event {} (id {}): {}",
                        event.event_id, event.id, e
                    );
                    report.failed += 1;
                }
            }
        }

        self.remove_unseen(&candidates, &seen, &mut report).await;

        Ok(report)
    }

    async fn sync_event(
        &self,
        event: &RemoteEvent,
        candidates: &[CalendarEntry],
        now: DateTime<Utc>,
    ) -> SyncResult<EventAction> {
        let start = event.start()?;
        let end = event.end()?;

        if end < now {
            debug!("Skipping past GroupMe event {}", event.event_id);
            return Ok(EventAction::SkippedPast);
        }

        let details = NewEntry {
            title: build_title(&self.settings.event_prefix, event),
            start,
            end,
            description: build_description(event),
            location: event.location_name().unwrap_or_default().to_string(),
        };

        match self.identity.find_by_remote_id(candidates, &event.event_id) {
            Some(existing) => self.update_if_needed(existing, &details).await,
            None => {
                let created = self.calendar.create_entry(&details).await?;
                self.identity
                    .tag(self.calendar, &created, &details.description, &event.event_id)
                    .await?;
                info!("Created event: {}", details.title);
                Ok(EventAction::Created)
            }
        }
    }

    /// Write only the fields of `existing` that differ from `details`
    async fn update_if_needed(
        &self,
        existing: &CalendarEntry,
        details: &NewEntry,
    ) -> SyncResult<EventAction> {
        debug!(
            "Existing event: {} - {} to {}",
            existing.title, existing.start, existing.end
        );

        let mut patch = EntryPatch::default();

        if existing.title != details.title {
            patch.title = Some(details.title.clone());
        }

        if existing.start.timestamp_millis() != details.start.timestamp_millis()
            || existing.end.timestamp_millis() != details.end.timestamp_millis()
        {
            patch.time = Some((details.start, details.end));
        }

        if existing.location != details.location {
            patch.location = Some(details.location.clone());
        }

        let current = self.identity.untagged_description(&existing.description);
        let wanted = self.identity.untagged_description(&details.description);
        if current != wanted {
            patch.description = Some(self.identity.retain_link(existing, &details.description));
        }

        if patch.is_empty() {
            return Ok(EventAction::Unchanged);
        }

        self.calendar.update_entry(&existing.id, &patch).await?;
        info!(
            "Updated event: {} - {} to {}",
            details.title, details.start, details.end
        );
        Ok(EventAction::Updated)
    }

    /// Delete linked entries whose remote event was not seen in this run
    async fn remove_unseen(
        &self,
        candidates: &[CalendarEntry],
        seen: &HashSet<String>,
        report: &mut SyncReport,
    ) {
        for entry in candidates {
            let Some(remote_id) = self.identity.remote_id(entry) else {
                continue;
            };
            if seen.contains(&remote_id) {
                continue;
            }

            match self.calendar.delete_entry(&entry.id).await {
                Ok(()) => {
                    info!("Deleted removed event: {}", entry.title);
                    report.deleted += 1;
                }
                Err(e) => {
                    error!("Failed to delete event {}: {}", entry.title, e);
                    report.delete_failed += 1;
                }
            }
        }
    }
}
