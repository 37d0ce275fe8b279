// Export components
pub mod google_calendar;
pub mod groupme;
pub mod sync;

pub use google_calendar::{CalendarService, GoogleCalendarClient};
pub use groupme::GroupMeClient;
