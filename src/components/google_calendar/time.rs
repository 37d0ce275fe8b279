use super::models::{CalendarEntry, GoogleEvent, GoogleEventTime};
use crate::error::{google_calendar_error, SyncResult};
use chrono::{DateTime, NaiveDate, Utc};

/// Parse a Google event time; all-day dates are read as midnight UTC
pub fn parse_event_time(time: &GoogleEventTime) -> SyncResult<DateTime<Utc>> {
    if let Some(date_time) = &time.date_time {
        let dt = DateTime::parse_from_rfc3339(date_time)
            .map_err(|e| google_calendar_error(&format!("Failed to parse datetime: {}", e)))?;
        Ok(dt.with_timezone(&Utc))
    } else if let Some(date) = &time.date {
        let date = NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .map_err(|e| google_calendar_error(&format!("Failed to parse date: {}", e)))?;
        let dt = date
            .and_hms_opt(0, 0, 0)
            .ok_or_else(|| google_calendar_error("Failed to create datetime"))?;
        Ok(dt.and_utc())
    } else {
        Err(google_calendar_error("Event time has neither dateTime nor date"))
    }
}

/// Convert an API event into a calendar entry
pub fn to_calendar_entry(event: GoogleEvent) -> SyncResult<CalendarEntry> {
    let start = parse_event_time(&event.start)?;
    let end = parse_event_time(&event.end)?;
    Ok(CalendarEntry {
        id: event.id,
        title: event.summary.unwrap_or_default(),
        start,
        end,
        description: event.description.unwrap_or_default(),
        location: event.location.unwrap_or_default(),
    })
}
