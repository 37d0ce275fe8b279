use crate::components::groupme::RemoteEvent;

/// Name used when a GroupMe event has none
pub const UNTITLED_EVENT: &str = "Untitled Event";

/// Last line of every synced description
pub const SYNC_FOOTER: &str = "Synced from GroupMe";

/// Calendar title for a remote event
pub fn build_title(prefix: &str, event: &RemoteEvent) -> String {
    format!("{}{}", prefix, event.name.as_deref().unwrap_or(UNTITLED_EVENT))
}

/// Calendar description for a remote event, without the link marker
pub fn build_description(event: &RemoteEvent) -> String {
    let mut description = String::new();

    if let Some(text) = event.description.as_deref().filter(|d| !d.is_empty()) {
        description.push_str(text);
        description.push_str("\n\n");
    }

    if let Some(location) = event.location_name().filter(|l| !l.is_empty()) {
        description.push_str(&format!("Location: {}\n", location));
    }

    if let Some(going) = event.going_count {
        description.push_str(&format!("Going: {} people\n", going));
    }

    description.push('\n');
    description.push_str(SYNC_FOOTER);
    description
}
