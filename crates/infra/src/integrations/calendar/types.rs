//! Google Calendar API wire types
//!
//! Serde models for the subset of the v3 API this crate touches, plus the
//! conversions into domain types. Unknown provider values degrade rather
//! than fail: an unrecognized event status is treated as confirmed, an
//! unrecognized response status as no response.

use std::collections::HashMap;

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use shiftguard_domain::{
    Attendee, AttendeeResponse, BusyInterval, CalendarEvent, EventStatus, EventTime,
};

/// Request body for `POST /freeBusy`
#[derive(Debug, Serialize)]
pub struct FreeBusyRequest {
    #[serde(rename = "timeMin")]
    pub time_min: String,
    #[serde(rename = "timeMax")]
    pub time_max: String,
    pub items: Vec<FreeBusyRequestItem>,
}

#[derive(Debug, Serialize)]
pub struct FreeBusyRequestItem {
    pub id: String,
}

impl FreeBusyRequest {
    pub fn new(calendar_ids: &[String], start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            time_min: start.to_rfc3339(),
            time_max: end.to_rfc3339(),
            items: calendar_ids.iter().map(|id| FreeBusyRequestItem { id: id.clone() }).collect(),
        }
    }
}

/// Response body for `POST /freeBusy`
#[derive(Debug, Deserialize)]
pub struct FreeBusyResponse {
    #[serde(default)]
    pub calendars: HashMap<String, FreeBusyCalendar>,
}

#[derive(Debug, Deserialize)]
pub struct FreeBusyCalendar {
    #[serde(default)]
    pub busy: Vec<GoogleTimePeriod>,
    #[serde(default)]
    pub errors: Vec<FreeBusyError>,
}

#[derive(Debug, Deserialize)]
pub struct GoogleTimePeriod {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl From<GoogleTimePeriod> for BusyInterval {
    fn from(period: GoogleTimePeriod) -> Self {
        Self { start: period.start, end: period.end }
    }
}

#[derive(Debug, Deserialize)]
pub struct FreeBusyError {
    #[serde(default)]
    pub reason: String,
}

/// Response body for `GET /calendars/{id}/events`
#[derive(Debug, Deserialize)]
pub struct GoogleEventsResponse {
    #[serde(default)]
    pub items: Vec<GoogleEvent>,
}

#[derive(Debug, Deserialize)]
pub struct GoogleEvent {
    pub id: String,
    pub summary: Option<String>,
    pub status: Option<String>,
    #[serde(default)]
    pub start: GoogleEventDateTime,
    #[serde(default)]
    pub end: GoogleEventDateTime,
    pub attendees: Option<Vec<GoogleAttendee>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct GoogleEventDateTime {
    #[serde(rename = "dateTime")]
    pub date_time: Option<DateTime<FixedOffset>>,
    pub date: Option<NaiveDate>,
    #[serde(rename = "timeZone")]
    pub time_zone: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct GoogleAttendee {
    #[serde(default)]
    pub email: String,
    #[serde(rename = "responseStatus")]
    pub response_status: Option<String>,
    #[serde(rename = "self", default)]
    pub is_self: bool,
}

impl From<GoogleEventDateTime> for EventTime {
    fn from(value: GoogleEventDateTime) -> Self {
        Self { date_time: value.date_time, date: value.date, time_zone: value.time_zone }
    }
}

impl From<GoogleAttendee> for Attendee {
    fn from(value: GoogleAttendee) -> Self {
        let response_status = match value.response_status.as_deref() {
            Some("needsAction") => Some(AttendeeResponse::NeedsAction),
            Some("declined") => Some(AttendeeResponse::Declined),
            Some("tentative") => Some(AttendeeResponse::Tentative),
            Some("accepted") => Some(AttendeeResponse::Accepted),
            _ => None,
        };
        Self { email: value.email, response_status, is_self: value.is_self }
    }
}

impl From<GoogleEvent> for CalendarEvent {
    fn from(value: GoogleEvent) -> Self {
        let status = match value.status.as_deref() {
            Some("tentative") => EventStatus::Tentative,
            Some("cancelled") => EventStatus::Cancelled,
            // Provider data is canonical; anything unrecognized stays busy
            _ => EventStatus::Confirmed,
        };

        Self {
            id: value.id,
            summary: value.summary,
            start: value.start.into(),
            end: value.end.into(),
            status,
            attendees: value.attendees.unwrap_or_default().into_iter().map(Into::into).collect(),
        }
    }
}
