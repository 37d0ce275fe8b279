use super::models::{CalendarEntry, EntryPatch, GoogleEvent, GoogleEventList, NewEntry};
use super::time::to_calendar_entry;
use super::CalendarService;
use crate::config::DEFAULT_GOOGLE_CALENDAR_API_URL;
use crate::error::{google_calendar_error, Error, SyncResult};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use tracing::{debug, warn};
use url::Url;

/// Upper bound the API accepts for `maxResults`
const PAGE_SIZE: &str = "250";

/// Google Calendar v3 REST client for a single calendar
#[derive(Clone)]
pub struct GoogleCalendarClient {
    base_url: String,
    calendar_id: String,
    access_token: String,
    client: Client,
}

impl GoogleCalendarClient {
    /// Create a client against the public Google Calendar API
    pub fn new(calendar_id: &str, access_token: &str) -> Self {
        Self::with_base_url(DEFAULT_GOOGLE_CALENDAR_API_URL, calendar_id, access_token)
    }

    /// Create a client against a custom API base URL
    pub fn with_base_url(base_url: &str, calendar_id: &str, access_token: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            calendar_id: calendar_id.to_string(),
            access_token: access_token.to_string(),
            client: Client::new(),
        }
    }

    /// Build `{base}/calendars/{calendar_id}/{segments...}` with each segment escaped
    fn url(&self, segments: &[&str]) -> SyncResult<Url> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| google_calendar_error(&format!("Failed to parse URL: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| google_calendar_error("Google Calendar API URL cannot be a base"))?
            .pop_if_empty()
            .push("calendars")
            .push(&self.calendar_id)
            .extend(segments);
        Ok(url)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request.header("Authorization", format!("Bearer {}", self.access_token))
    }

    /// Turn a non-success response into an error carrying the body
    async fn check(response: Response, action: &str) -> SyncResult<Response> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status();
        let error_body = response
            .text()
            .await
            .unwrap_or_else(|_| "Could not read error response".to_string());
        Err(google_calendar_error(&format!(
            "Failed to {}: HTTP {} - {}",
            action, status, error_body
        )))
    }
}

#[async_trait]
impl CalendarService for GoogleCalendarClient {
    async fn ensure_calendar(&self) -> SyncResult<()> {
        let url = self.url(&[])?;
        let response = self
            .authorized(self.client.get(url))
            .send()
            .await
            .map_err(|e| google_calendar_error(&format!("Failed to fetch calendar: {}", e)))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(Error::CalendarNotFound(self.calendar_id.clone()));
        }
        Self::check(response, "fetch calendar").await?;
        Ok(())
    }

    async fn list_entries(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> SyncResult<Vec<CalendarEntry>> {
        let mut entries = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut url = self.url(&["events"])?;
            {
                let mut query = url.query_pairs_mut();
                query
                    .append_pair("timeMin", &start.to_rfc3339())
                    .append_pair("timeMax", &end.to_rfc3339())
                    .append_pair("singleEvents", "true")
                    .append_pair("orderBy", "startTime")
                    .append_pair("maxResults", PAGE_SIZE);
                if let Some(token) = &page_token {
                    query.append_pair("pageToken", token);
                }
            }

            let response = self
                .authorized(self.client.get(url))
                .send()
                .await
                .map_err(|e| google_calendar_error(&format!("Failed to fetch events: {}", e)))?;
            let page: GoogleEventList = Self::check(response, "fetch events")
                .await?
                .json()
                .await
                .map_err(|e| {
                    google_calendar_error(&format!("Failed to parse events response: {}", e))
                })?;

            for event in page.items {
                if event.status.as_deref() == Some("cancelled") {
                    continue;
                }
                let id = event.id.clone();
                match to_calendar_entry(event) {
                    Ok(entry) => entries.push(entry),
                    Err(e) => warn!("Skipping calendar event {}: {}", id, e),
                }
            }

            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        debug!("Fetched {} calendar entries", entries.len());
        Ok(entries)
    }

    async fn create_entry(&self, entry: &NewEntry) -> SyncResult<CalendarEntry> {
        let url = self.url(&["events"])?;
        let response = self
            .authorized(self.client.post(url))
            .json(&GoogleEvent::from(entry))
            .send()
            .await
            .map_err(|e| google_calendar_error(&format!("Failed to create event: {}", e)))?;
        let created: GoogleEvent = Self::check(response, "create event")
            .await?
            .json()
            .await
            .map_err(|e| google_calendar_error(&format!("Failed to parse created event: {}", e)))?;
        to_calendar_entry(created)
    }

    async fn update_entry(&self, entry_id: &str, patch: &EntryPatch) -> SyncResult<()> {
        let url = self.url(&["events", entry_id])?;
        let response = self
            .authorized(self.client.patch(url))
            .json(&patch.to_google_json())
            .send()
            .await
            .map_err(|e| google_calendar_error(&format!("Failed to update event: {}", e)))?;
        Self::check(response, "update event").await?;
        Ok(())
    }

    async fn delete_entry(&self, entry_id: &str) -> SyncResult<()> {
        let url = self.url(&["events", entry_id])?;
        let response = self
            .authorized(self.client.delete(url))
            .send()
            .await
            .map_err(|e| google_calendar_error(&format!("Failed to delete event: {}", e)))?;

        // Already gone
        if response.status() == StatusCode::GONE {
            return Ok(());
        }
        Self::check(response, "delete event").await?;
        Ok(())
    }
}
