use super::tag;
use crate::components::google_calendar::{CalendarEntry, CalendarService, EntryPatch};
use crate::error::SyncResult;
use async_trait::async_trait;

/// Link between calendar entries and the GroupMe events they mirror
#[async_trait]
pub trait IdentityStore: Send + Sync {
    /// Remote event id an entry is linked to
    fn remote_id(&self, entry: &CalendarEntry) -> Option<String>;

    /// Entry linked to `remote_id`, if any
    fn find_by_remote_id<'a>(
        &self,
        candidates: &'a [CalendarEntry],
        remote_id: &str,
    ) -> Option<&'a CalendarEntry>;

    /// Description text with the link data removed
    fn untagged_description<'t>(&self, description: &'t str) -> &'t str;

    /// Description to write to an already linked entry, keeping its link as found
    fn retain_link(&self, existing: &CalendarEntry, description: &str) -> String;

    /// Link a freshly created entry to `remote_id`, rewriting its
    /// description as `description` plus the link
    async fn tag(
        &self,
        calendar: &dyn CalendarService,
        entry: &CalendarEntry,
        description: &str,
        remote_id: &str,
    ) -> SyncResult<()>;
}

/// Keeps the link as a marker appended to the entry description
#[derive(Debug, Clone, Copy, Default)]
pub struct DescriptionTagStore;

#[async_trait]
impl IdentityStore for DescriptionTagStore {
    fn remote_id(&self, entry: &CalendarEntry) -> Option<String> {
        tag::decode(&entry.description)
    }

    fn find_by_remote_id<'a>(
        &self,
        candidates: &'a [CalendarEntry],
        remote_id: &str,
    ) -> Option<&'a CalendarEntry> {
        let marker = tag::encode(remote_id);
        candidates.iter().find(|e| e.description.contains(&marker))
    }

    fn untagged_description<'t>(&self, description: &'t str) -> &'t str {
        tag::strip(description)
    }

    fn retain_link(&self, existing: &CalendarEntry, description: &str) -> String {
        match tag::find(&existing.description) {
            Some(marker) => format!("{}\n\n{}", description, marker),
            None => description.to_string(),
        }
    }

    async fn tag(
        &self,
        calendar: &dyn CalendarService,
        entry: &CalendarEntry,
        description: &str,
        remote_id: &str,
    ) -> SyncResult<()> {
        let description = format!("{}\n\n{}", description, tag::encode(remote_id));
        calendar
            .update_entry(&entry.id, &EntryPatch::description(description))
            .await
    }
}
