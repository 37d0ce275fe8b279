use super::models::{FetchOutcome, GroupMeResponse, RemoteEvent};
use crate::config::DEFAULT_GROUPME_API_URL;
use crate::error::{groupme_error, SyncResult};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, error, warn};
use url::Url;

/// Client for the GroupMe events API
#[derive(Clone)]
pub struct GroupMeClient {
    base_url: String,
    access_token: String,
    client: Client,
}

impl GroupMeClient {
    /// Create a client against the public GroupMe API
    pub fn new(access_token: &str) -> Self {
        Self::with_base_url(DEFAULT_GROUPME_API_URL, access_token)
    }

    /// Create a client against a custom API base URL
    pub fn with_base_url(base_url: &str, access_token: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            access_token: access_token.to_string(),
            client: Client::new(),
        }
    }

    /// Fetch the events of a group
    ///
    /// Never fails: transport errors and error statuses are logged and
    /// reported as [`FetchOutcome::Failed`].
    pub async fn fetch_events(&self, group_id: &str) -> FetchOutcome {
        match self.request_events(group_id).await {
            Ok(events) => FetchOutcome::Fetched(events),
            Err(e) => {
                error!("Error fetching GroupMe events: {}", e);
                FetchOutcome::Failed(e.to_string())
            }
        }
    }

    async fn request_events(&self, group_id: &str) -> SyncResult<Vec<RemoteEvent>> {
        let url = self.events_url(group_id)?;
        debug!("Fetching GroupMe events from {}", url);

        let response = self
            .client
            .get(url)
            .header("X-Access-Token", &self.access_token)
            .header("Content-Type", "application/json")
            .send()
            .await
            .map_err(|e| groupme_error(&format!("Failed to fetch events: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| groupme_error(&format!("Failed to read events response: {}", e)))?;

        if status != StatusCode::OK {
            // Error bodies are not guaranteed to be JSON
            let message = serde_json::from_str::<GroupMeResponse>(&body)
                .ok()
                .and_then(|r| r.first_error().map(str::to_string))
                .unwrap_or_else(|| "Unknown error".to_string());
            return Err(groupme_error(&format!("HTTP {} - {}", status, message)));
        }

        let data: GroupMeResponse = serde_json::from_str(&body)
            .map_err(|e| groupme_error(&format!("Failed to parse events response: {}", e)))?;

        let records = data.response.and_then(|r| r.events).unwrap_or_default();
        Ok(records.iter().filter_map(read_record).collect())
    }

    fn events_url(&self, group_id: &str) -> SyncResult<Url> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| groupme_error(&format!("Failed to parse URL: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| groupme_error("GroupMe API URL cannot be a base"))?
            .pop_if_empty()
            .extend(["conversations", group_id, "events", "list"]);
        Ok(url)
    }
}

/// Read one events list record, keeping a stand-in for records that do not fit
fn read_record(record: &Value) -> Option<RemoteEvent> {
    match RemoteEvent::deserialize(record) {
        Ok(event) => Some(event),
        Err(e) => {
            let stand_in = RemoteEvent::unreadable(record);
            match &stand_in {
                Some(event) => error!("Unreadable GroupMe event {}: {}", event.event_id, e),
                None => warn!("Dropping GroupMe event record without event_id: {}", e),
            }
            stand_in
        }
    }
}
