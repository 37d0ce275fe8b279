use crate::error::{config_error, env_error, SyncResult};
use dotenvy::dotenv;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::Path;

/// Default number of days ahead to sync
pub const DEFAULT_SYNC_DAYS_AHEAD: u32 = 30;

/// Default prefix for titles of synced calendar entries
pub const DEFAULT_EVENT_PREFIX: &str = "[GroupMe] ";

/// Default GroupMe API base URL
pub const DEFAULT_GROUPME_API_URL: &str = "https://api.groupme.com/v3";

/// Default Google Calendar API base URL
pub const DEFAULT_GOOGLE_CALENDAR_API_URL: &str = "https://www.googleapis.com/calendar/v3";

/// Config file read when SYNC_CONFIG_FILE is not set
pub const DEFAULT_CONFIG_FILE: &str = "config/sync.toml";

/// Main configuration structure for the sync
#[derive(Debug, Clone)]
pub struct Config {
    /// GroupMe group whose events are synced
    pub groupme_group_id: String,
    /// GroupMe access token
    pub groupme_access_token: String,
    /// Google Calendar ID receiving the events
    pub google_calendar_id: String,
    /// Pre-obtained Google OAuth access token
    pub google_access_token: String,
    /// Sync horizon in days
    pub sync_days_ahead: u32,
    /// Prefix prepended to every synced title
    pub event_prefix: String,
    /// Re-run the sync on this period; a single pass when unset
    pub sync_interval_secs: Option<u64>,
    /// GroupMe API base URL
    pub groupme_api_url: String,
    /// Google Calendar API base URL
    pub google_calendar_api_url: String,
}

/// Optional settings that may come from the config file
#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    sync_days_ahead: Option<u32>,
    event_prefix: Option<String>,
    sync_interval_secs: Option<u64>,
}

impl Config {
    /// Load configuration from .env, the environment and the optional config file
    pub fn load() -> SyncResult<Self> {
        // Load .env file if it exists
        dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from a key lookup, validating it once
    pub fn from_lookup<F>(lookup: F) -> SyncResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Empty values count as missing
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let required = |key: &str| get(key).ok_or_else(|| env_error(key));

        let groupme_group_id = required("GROUPME_GROUP_ID")?;
        let groupme_access_token = required("GROUPME_ACCESS_TOKEN")?;
        let google_calendar_id = required("GOOGLE_CALENDAR_ID")?;
        let google_access_token = required("GOOGLE_ACCESS_TOKEN")?;

        let file = match get("SYNC_CONFIG_FILE") {
            Some(path) => read_settings(Path::new(&path))?
                .ok_or_else(|| config_error(&format!("Config file not found: {}", path)))?,
            None => read_settings(Path::new(DEFAULT_CONFIG_FILE))?.unwrap_or_default(),
        };

        let sync_days_ahead = match get("SYNC_DAYS_AHEAD") {
            Some(value) => value
                .trim()
                .parse::<u32>()
                .map_err(|_| config_error(&format!("Invalid SYNC_DAYS_AHEAD: {}", value)))?,
            None => file.sync_days_ahead.unwrap_or(DEFAULT_SYNC_DAYS_AHEAD),
        };

        // The prefix may legitimately be whitespace-padded, so only unset means default
        let event_prefix = lookup("EVENT_PREFIX")
            .or(file.event_prefix)
            .unwrap_or_else(|| DEFAULT_EVENT_PREFIX.to_string());

        let sync_interval_secs = match get("SYNC_INTERVAL_SECS") {
            Some(value) => Some(
                value
                    .trim()
                    .parse::<u64>()
                    .map_err(|_| config_error(&format!("Invalid SYNC_INTERVAL_SECS: {}", value)))?,
            ),
            None => file.sync_interval_secs,
        };
        if sync_interval_secs == Some(0) {
            return Err(config_error("SYNC_INTERVAL_SECS must be greater than zero"));
        }

        let groupme_api_url =
            get("GROUPME_API_URL").unwrap_or_else(|| DEFAULT_GROUPME_API_URL.to_string());
        let google_calendar_api_url = get("GOOGLE_CALENDAR_API_URL")
            .unwrap_or_else(|| DEFAULT_GOOGLE_CALENDAR_API_URL.to_string());

        Ok(Config {
            groupme_group_id,
            groupme_access_token,
            google_calendar_id,
            google_access_token,
            sync_days_ahead,
            event_prefix,
            sync_interval_secs,
            groupme_api_url,
            google_calendar_api_url,
        })
    }
}

/// Read optional settings from a TOML file, `None` if it does not exist
///
/// A file that exists but cannot be read or parsed is a configuration error,
/// whether it was named explicitly or found at the default path.
fn read_settings(path: &Path) -> SyncResult<Option<FileSettings>> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path).map_err(|e| {
        config_error(&format!("Failed to read config file {}: {}", path.display(), e))
    })?;
    let settings = toml::from_str::<FileSettings>(&content).map_err(|e| {
        config_error(&format!("Invalid config file {}: {}", path.display(), e))
    })?;
    Ok(Some(settings))
}
