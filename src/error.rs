use miette::{Diagnostic, Result};
use thiserror::Error;

/// Main error type for the sync
#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("Environment error: {0}")]
    #[diagnostic(
        code(groupme_sync::environment),
        help("Set GROUPME_GROUP_ID, GROUPME_ACCESS_TOKEN, GOOGLE_CALENDAR_ID and GOOGLE_ACCESS_TOKEN")
    )]
    Environment(String),

    #[error("Configuration error: {0}")]
    #[diagnostic(code(groupme_sync::config))]
    Config(String),

    #[error("Google Calendar not found: {0}")]
    #[diagnostic(
        code(groupme_sync::calendar_not_found),
        help("Check your GOOGLE_CALENDAR_ID")
    )]
    CalendarNotFound(String),

    #[error("Google Calendar API error: {0}")]
    #[diagnostic(code(groupme_sync::google_calendar))]
    GoogleCalendar(String),

    #[error("GroupMe API error: {0}")]
    #[diagnostic(code(groupme_sync::groupme))]
    GroupMe(String),

    #[error("Invalid GroupMe event: {0}")]
    #[diagnostic(code(groupme_sync::invalid_event))]
    InvalidEvent(String),

    #[error("HTTP error: {0}")]
    #[diagnostic(code(groupme_sync::http))]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    #[diagnostic(code(groupme_sync::io))]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    #[diagnostic(code(groupme_sync::serialization))]
    Serialization(String),

    #[error("Other error: {0}")]
    #[diagnostic(code(groupme_sync::other))]
    Other(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

/// Type alias for Result with our Error type
pub type SyncResult<T> = Result<T, Error>;

/// Helper to create environment errors
pub fn env_error(var: &str) -> Error {
    Error::Environment(format!("Missing environment variable: {}", var))
}

/// Helper to create configuration errors
pub fn config_error(message: &str) -> Error {
    Error::Config(message.to_string())
}

/// Helper to create Google Calendar errors
pub fn google_calendar_error(message: &str) -> Error {
    Error::GoogleCalendar(message.to_string())
}

/// Helper to create GroupMe errors
pub fn groupme_error(message: &str) -> Error {
    Error::GroupMe(message.to_string())
}

/// Helper to create errors for a single malformed remote event
pub fn invalid_event_error(message: &str) -> Error {
    Error::InvalidEvent(message.to_string())
}

/// Helper to create other errors
pub fn other_error(message: &str) -> Error {
    Error::Other(message.to_string())
}
