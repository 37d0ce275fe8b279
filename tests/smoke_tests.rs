mod common;

use chrono::{Duration, Utc};
use common::{linked_entry, now, utc, MockCalendar, Write};
use groupme_calendar_sync::components::groupme::GroupMeClient;
use groupme_calendar_sync::components::sync::{build_description, run_sync, sync_once};
use groupme_calendar_sync::config::Config;
use groupme_calendar_sync::error::Error;
use serde_json::json;
use std::collections::HashMap;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config_for(groupme_url: &str, calendar_url: &str) -> Config {
    let vars: HashMap<&str, String> = [
        ("GROUPME_GROUP_ID", "123".to_string()),
        ("GROUPME_ACCESS_TOKEN", "gm-token".to_string()),
        ("GOOGLE_CALENDAR_ID", "team".to_string()),
        ("GOOGLE_ACCESS_TOKEN", "g-token".to_string()),
        ("GROUPME_API_URL", groupme_url.to_string()),
        ("GOOGLE_CALENDAR_API_URL", calendar_url.to_string()),
        // Keep a local config/sync.toml from leaking into the tests
        ("SYNC_DAYS_AHEAD", "30".to_string()),
        ("EVENT_PREFIX", "[GroupMe] ".to_string()),
    ]
    .into_iter()
    .collect();

    Config::from_lookup(|key| vars.get(key).cloned()).unwrap()
}

/// Smoke test to verify that the config can be built
#[test]
fn test_config_builds() {
    let config = config_for("http://localhost/v3", "http://localhost/calendar/v3");

    assert_eq!(config.groupme_group_id, "123");
    assert_eq!(config.sync_days_ahead, 30);
    assert_eq!(config.event_prefix, "[GroupMe] ");
}

#[tokio::test]
async fn test_failed_fetch_removes_linked_entries() {
    let groupme_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v3/conversations/123/events/list"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "meta": {"code": 401, "errors": ["unauthorized"]}
        })))
        .mount(&groupme_server)
        .await;

    let config = config_for(&format!("{}/v3", groupme_server.uri()), "http://unused");
    let groupme = GroupMeClient::with_base_url(&config.groupme_api_url, "gm-token");
    let calendar = MockCalendar::with_entries(vec![linked_entry(
        "entry-7",
        "7",
        "[GroupMe] Picnic",
        utc(2025, 1, 5, 10, 0),
        utc(2025, 1, 5, 12, 0),
        "\nSynced from GroupMe",
    )]);

    let report = sync_once(&config, &groupme, &calendar, now()).await.unwrap();

    assert!(report.fetch_failed);
    assert_eq!(report.deleted, 1);
    assert_eq!(calendar.writes(), vec![Write::Delete("entry-7".to_string())]);
}

#[tokio::test]
async fn test_bad_record_keeps_other_entries() {
    let groupme_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v3/conversations/123/events/list"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "response": {"events": [
                {"event_id": "7", "id": "msg-7", "name": "Picnic", "start_at": "2025-01-05T10:00:00Z"},
                {"event_id": "8", "name": "No start"}
            ]}
        })))
        .mount(&groupme_server)
        .await;

    let config = config_for(&format!("{}/v3", groupme_server.uri()), "http://unused");
    let groupme = GroupMeClient::with_base_url(&config.groupme_api_url, "gm-token");
    let picnic = common::remote_event("7", "Picnic", "2025-01-05T10:00:00Z");
    let calendar = MockCalendar::with_entries(vec![
        linked_entry(
            "entry-7",
            "7",
            "[GroupMe] Picnic",
            utc(2025, 1, 5, 10, 0),
            utc(2025, 1, 5, 12, 0),
            &build_description(&picnic),
        ),
        linked_entry(
            "entry-8",
            "8",
            "[GroupMe] No start",
            utc(2025, 1, 6, 10, 0),
            utc(2025, 1, 6, 12, 0),
            "\nSynced from GroupMe",
        ),
    ]);

    let report = sync_once(&config, &groupme, &calendar, now()).await.unwrap();

    assert!(!report.fetch_failed);
    assert_eq!(report.fetched, 2);
    assert_eq!(report.unchanged, 1);
    assert_eq!(report.failed, 1);
    assert_eq!(report.deleted, 0);
    assert!(calendar.writes().is_empty());
}

#[tokio::test]
async fn test_missing_calendar_aborts_before_writes() {
    let groupme_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v3/conversations/123/events/list"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "response": {"events": [{
                "event_id": "1",
                "name": "Game Night",
                "start_at": "2025-01-10T20:00:00Z"
            }]}
        })))
        .mount(&groupme_server)
        .await;

    let config = config_for(&format!("{}/v3", groupme_server.uri()), "http://unused");
    let groupme = GroupMeClient::with_base_url(&config.groupme_api_url, "gm-token");
    let calendar = MockCalendar::new().missing();

    let result = sync_once(&config, &groupme, &calendar, now()).await;

    assert!(matches!(result, Err(Error::CalendarNotFound(_))));
    assert!(calendar.writes().is_empty());
}

#[tokio::test]
async fn test_run_sync_against_both_services() {
    let groupme_server = MockServer::start().await;
    let google_server = MockServer::start().await;
    let start_at = (Utc::now() + Duration::days(3)).to_rfc3339();

    Mock::given(method("GET"))
        .and(path("/v3/conversations/123/events/list"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "response": {"events": [{
                "event_id": "42",
                "name": "Game Night",
                "start_at": start_at
            }]}
        })))
        .expect(1)
        .mount(&groupme_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/calendar/v3/calendars/team"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "team"})))
        .expect(1)
        .mount(&google_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/calendar/v3/calendars/team/events"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"items": []})))
        .expect(1)
        .mount(&google_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/calendar/v3/calendars/team/events"))
        .and(body_partial_json(json!({"summary": "[GroupMe] Game Night"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "evt-1",
            "summary": "[GroupMe] Game Night",
            "description": "\nSynced from GroupMe",
            "start": {"dateTime": start_at},
            "end": {"dateTime": start_at}
        })))
        .expect(1)
        .mount(&google_server)
        .await;

    Mock::given(method("PATCH"))
        .and(path("/calendar/v3/calendars/team/events/evt-1"))
        .and(body_partial_json(json!({
            "description": "\nSynced from GroupMe\n\n[GroupMe Event ID: 42]"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "evt-1"})))
        .expect(1)
        .mount(&google_server)
        .await;

    let config = config_for(
        &format!("{}/v3", groupme_server.uri()),
        &format!("{}/calendar/v3", google_server.uri()),
    );

    let report = run_sync(&config).await.unwrap();

    assert!(!report.fetch_failed);
    assert_eq!(report.fetched, 1);
    assert_eq!(report.created, 1);
    assert_eq!(report.deleted, 0);
}
