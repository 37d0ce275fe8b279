//! One-way sync of GroupMe events into the calendar.

mod description;
mod identity;
mod reconciler;
pub mod tag;

pub use description::{build_description, build_title, SYNC_FOOTER, UNTITLED_EVENT};
pub use identity::{DescriptionTagStore, IdentityStore};
pub use reconciler::{Reconciler, SyncReport, SyncSettings};

use crate::components::google_calendar::{CalendarService, GoogleCalendarClient};
use crate::components::groupme::{FetchOutcome, GroupMeClient};
use crate::config::Config;
use crate::error::SyncResult;
use chrono::{DateTime, Utc};
use tracing::info;

/// Run one sync pass against the configured services
pub async fn run_sync(config: &Config) -> SyncResult<SyncReport> {
    let groupme = GroupMeClient::with_base_url(&config.groupme_api_url, &config.groupme_access_token);
    let calendar = GoogleCalendarClient::with_base_url(
        &config.google_calendar_api_url,
        &config.google_calendar_id,
        &config.google_access_token,
    );

    sync_once(config, &groupme, &calendar, Utc::now()).await
}

/// Run one sync pass with the given clients and reference time
pub async fn sync_once(
    config: &Config,
    groupme: &GroupMeClient,
    calendar: &dyn CalendarService,
    now: DateTime<Utc>,
) -> SyncResult<SyncReport> {
    info!("Starting GroupMe calendar sync...");

    let outcome = groupme.fetch_events(&config.groupme_group_id).await;
    if let FetchOutcome::Fetched(events) = &outcome {
        info!("Found {} GroupMe events", events.len());
    }

    calendar.ensure_calendar().await?;

    let identity = DescriptionTagStore;
    let reconciler = Reconciler::new(calendar, &identity, SyncSettings::from(config));
    let report = reconciler.reconcile(&outcome, now).await?;

    info!("GroupMe calendar sync completed: {}", report);
    Ok(report)
}
