//! Integration tests for the Google Calendar data source
//!
//! **Coverage:**
//! - Request shape and response parsing for freeBusy and events.list
//! - HTTP error mapping (auth vs network)
//! - End-to-end prober fallback through a failing freeBusy endpoint
//! - Per-calendar enumeration failures being skipped, not fatal
//!
//! **Infrastructure:**
//! - WireMock HTTP server (simulates the Calendar v3 API)
//! - Real `GoogleCalendarClient` pointed at the mock server

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use serde_json::json;
use shiftguard_core::{AvailabilityProber, ProbeRequest};
use shiftguard_domain::{ConflictMethod, EventStatus, Policy, ShiftGuardError};
use shiftguard_infra::{GoogleBusyDataSource, GoogleCalendarClient};
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn window() -> (DateTime<Utc>, DateTime<Utc>) {
    (
        Utc.with_ymd_and_hms(2025, 6, 3, 10, 0, 0).unwrap(),
        Utc.with_ymd_and_hms(2025, 6, 3, 11, 0, 0).unwrap(),
    )
}

fn client_for(server: &MockServer) -> GoogleCalendarClient {
    GoogleCalendarClient::new().unwrap().with_base_url(server.uri())
}

#[tokio::test]
async fn free_busy_parses_intervals_per_calendar() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/freeBusy"))
        .and(header("authorization", "Bearer test-token"))
        .and(body_partial_json(json!({"items": [{"id": "primary"}]})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "calendars": {
                "primary": {
                    "busy": [
                        {"start": "2025-06-03T10:30:00Z", "end": "2025-06-03T11:30:00Z"}
                    ]
                }
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let (start, end) = window();
    let busy = client
        .query_free_busy("test-token", &["primary".to_string()], start, end)
        .await
        .unwrap();

    assert_eq!(busy["primary"].len(), 1);
    assert_eq!(busy["primary"][0].start, Utc.with_ymd_and_hms(2025, 6, 3, 10, 30, 0).unwrap());
}

#[tokio::test]
async fn free_busy_single_errored_calendar_is_tolerated() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/freeBusy"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "calendars": {
                "primary": {"busy": []},
                "ghost": {"errors": [{"domain": "global", "reason": "notFound"}]}
            }
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let (start, end) = window();
    let busy = client
        .query_free_busy(
            "test-token",
            &["primary".to_string(), "ghost".to_string()],
            start,
            end,
        )
        .await
        .unwrap();

    assert!(busy["primary"].is_empty());
    assert!(busy["ghost"].is_empty(), "errored calendar contributes no busy data");
}

#[tokio::test]
async fn free_busy_with_every_calendar_errored_fails() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/freeBusy"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "calendars": {
                "ghost": {"errors": [{"reason": "notFound"}]}
            }
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let (start, end) = window();
    let err = client
        .query_free_busy("test-token", &["ghost".to_string()], start, end)
        .await
        .unwrap_err();

    assert!(matches!(err, ShiftGuardError::Network(_)));
}

#[tokio::test]
async fn list_events_sends_window_and_parses_items() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/calendars/primary/events"))
        .and(query_param("singleEvents", "true"))
        .and(query_param("orderBy", "startTime"))
        .and(query_param("timeMin", "2025-06-03T10:00:00+00:00"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [
                {
                    "id": "evt-1",
                    "summary": "Design review",
                    "status": "confirmed",
                    "start": {"dateTime": "2025-06-03T10:15:00Z"},
                    "end": {"dateTime": "2025-06-03T10:45:00Z"}
                },
                {
                    "id": "evt-2",
                    "status": "cancelled",
                    "start": {"dateTime": "2025-06-03T10:00:00Z"},
                    "end": {"dateTime": "2025-06-03T11:00:00Z"}
                }
            ]
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let (start, end) = window();
    let events = client.list_events("test-token", "primary", start, end).await.unwrap();

    assert_eq!(events.len(), 2);
    assert_eq!(events[0].summary.as_deref(), Some("Design review"));
    assert_eq!(events[1].status, EventStatus::Cancelled);
}

#[tokio::test]
async fn unauthorized_maps_to_auth_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/calendars/primary/events"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid credentials"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let (start, end) = window();
    let err = client.list_events("test-token", "primary", start, end).await.unwrap_err();

    assert!(matches!(err, ShiftGuardError::Auth(_)));
    assert!(err.to_string().contains("invalid credentials"));
}

#[tokio::test]
async fn prober_falls_back_when_free_busy_is_down() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/freeBusy"))
        .respond_with(ResponseTemplate::new(500).set_body_string("backend unavailable"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/calendars/primary/events"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"items": []})))
        .expect(1)
        .mount(&server)
        .await;

    let source = GoogleBusyDataSource::new(client_for(&server));
    let prober = AvailabilityProber::new(Arc::new(source));
    let (start, end) = window();
    let request = ProbeRequest {
        access_token: "test-token",
        calendar_id: "primary",
        window_start: start,
        window_end: end,
    };

    let outcome = prober.probe(&request, &Policy::default()).await.unwrap();

    assert!(!outcome.conflict);
    assert_eq!(outcome.method_used, ConflictMethod::Enumerate);
}

#[tokio::test]
async fn prober_skips_a_broken_calendar_during_enumeration() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/calendars/primary/events"))
        .respond_with(ResponseTemplate::new(404).set_body_string("calendar not found"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/calendars/teamcal/events"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{
                "id": "evt-9",
                "status": "confirmed",
                "start": {"dateTime": "2025-06-03T10:30:00Z"},
                "end": {"dateTime": "2025-06-03T11:00:00Z"}
            }]
        })))
        .mount(&server)
        .await;

    let policy = Policy {
        conflict_method: ConflictMethod::Enumerate,
        calendars_to_check: vec!["teamcal".to_string()],
        ..Policy::default()
    };
    let source = GoogleBusyDataSource::new(client_for(&server));
    let prober = AvailabilityProber::new(Arc::new(source));
    let (start, end) = window();
    let request = ProbeRequest {
        access_token: "test-token",
        calendar_id: "primary",
        window_start: start,
        window_end: end,
    };

    let outcome = prober.probe(&request, &policy).await.unwrap();
    assert!(outcome.conflict, "the reachable calendar still reports its conflict");
}
