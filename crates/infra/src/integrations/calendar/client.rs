//! Google Calendar HTTP client
//!
//! Thin reqwest wrapper around the two Calendar v3 reads the validation
//! engine needs. Every request carries the caller's bearer token and is
//! bounded by the client timeout; expiry surfaces as a network error so the
//! prober's fallback chain can react.

use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::{Client, Response, StatusCode};
use shiftguard_domain::{BusyInterval, CalendarEvent, Result, ShiftGuardError};
use tracing::{debug, warn};

use super::types::{FreeBusyRequest, FreeBusyResponse, GoogleEventsResponse};

const GOOGLE_CALENDAR_API_BASE: &str = "https://www.googleapis.com/calendar/v3";
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const LIST_EVENTS_MAX_RESULTS: &str = "250";

/// Google Calendar API client
#[derive(Clone)]
pub struct GoogleCalendarClient {
    http: Client,
    base_url: String,
}

impl GoogleCalendarClient {
    /// Create a client with the default endpoint and request timeout.
    ///
    /// # Errors
    /// Returns `ShiftGuardError::Internal` if the underlying HTTP client
    /// cannot be constructed.
    pub fn new() -> Result<Self> {
        Self::with_timeout(DEFAULT_REQUEST_TIMEOUT)
    }

    /// Create a client with a custom per-request timeout.
    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let http = Client::builder().timeout(timeout).build().map_err(|e| {
            ShiftGuardError::Internal(format!("Failed to build HTTP client: {}", e))
        })?;
        Ok(Self { http, base_url: GOOGLE_CALENDAR_API_BASE.to_string() })
    }

    /// Point the client at a different endpoint (integration tests).
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Combined free/busy query across `calendar_ids` for the window.
    ///
    /// Calendar-level errors inside a successful response are logged and
    /// yield an empty busy list for that calendar; if every requested
    /// calendar errored the whole call fails, since the response then
    /// carries no availability information at all.
    pub async fn query_free_busy(
        &self,
        access_token: &str,
        calendar_ids: &[String],
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<HashMap<String, Vec<BusyInterval>>> {
        let url = format!("{}/freeBusy", self.base_url);
        let body = FreeBusyRequest::new(calendar_ids, start, end);

        debug!(calendars = calendar_ids.len(), "querying free/busy");

        let response = self
            .http
            .post(&url)
            .bearer_auth(access_token)
            .json(&body)
            .send()
            .await
            .map_err(|e| ShiftGuardError::Network(format!("freeBusy request failed: {}", e)))?;
        let response = check_status(response, "freeBusy").await?;

        let free_busy: FreeBusyResponse = response.json().await.map_err(|e| {
            ShiftGuardError::Network(format!("Failed to parse freeBusy response: {}", e))
        })?;

        let mut errored = 0usize;
        let mut busy_by_calendar = HashMap::new();
        for (calendar_id, calendar) in free_busy.calendars {
            if !calendar.errors.is_empty() {
                let reasons: Vec<&str> =
                    calendar.errors.iter().map(|e| e.reason.as_str()).collect();
                warn!(
                    calendar_id = calendar_id.as_str(),
                    reasons = reasons.join(",").as_str(),
                    "free/busy lookup errored for calendar"
                );
                errored += 1;
            }
            busy_by_calendar
                .insert(calendar_id, calendar.busy.into_iter().map(Into::into).collect());
        }

        if !calendar_ids.is_empty() && errored >= calendar_ids.len() {
            return Err(ShiftGuardError::Network(
                "freeBusy lookup errored for every requested calendar".to_string(),
            ));
        }

        Ok(busy_by_calendar)
    }

    /// Fetch events intersecting the window on one calendar, expanded to
    /// single instances and ordered by start time.
    pub async fn list_events(
        &self,
        access_token: &str,
        calendar_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<CalendarEvent>> {
        let url = format!("{}/calendars/{}/events", self.base_url, calendar_id);
        let query = [
            ("timeMin", start.to_rfc3339()),
            ("timeMax", end.to_rfc3339()),
            ("singleEvents", "true".to_string()),
            ("orderBy", "startTime".to_string()),
            ("maxResults", LIST_EVENTS_MAX_RESULTS.to_string()),
        ];

        debug!(calendar_id, "listing events");

        let response = self
            .http
            .get(&url)
            .bearer_auth(access_token)
            .query(&query)
            .send()
            .await
            .map_err(|e| ShiftGuardError::Network(format!("events request failed: {}", e)))?;
        let response = check_status(response, "events").await?;

        let events: GoogleEventsResponse = response.json().await.map_err(|e| {
            ShiftGuardError::Network(format!("Failed to parse events response: {}", e))
        })?;

        Ok(events.items.into_iter().map(Into::into).collect())
    }
}

/// Map non-success statuses to domain errors, keeping the response body in
/// the message.
async fn check_status(response: Response, operation: &str) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());
    let message = format!("Google API error on {} ({}): {}", operation, status, body);
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(ShiftGuardError::Auth(message)),
        _ => Err(ShiftGuardError::Network(message)),
    }
}
