//! Calendar event model
//!
//! Read-only snapshot of a provider event, shaped after the Google Calendar
//! v3 wire format (timed events carry an offset timestamp, all-day events a
//! bare date).

use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};

/// Provider event lifecycle status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    Confirmed,
    Tentative,
    Cancelled,
}

/// Attendee response to an invitation
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum AttendeeResponse {
    NeedsAction,
    Declined,
    Tentative,
    Accepted,
}

/// One attendee on an event
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Attendee {
    pub email: String,
    pub response_status: Option<AttendeeResponse>,
    /// True for the attendee entry that represents the calendar owner
    #[serde(rename = "self", default)]
    pub is_self: bool,
}

/// Event boundary: either a timestamp with offset or an all-day date
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct EventTime {
    pub date_time: Option<DateTime<FixedOffset>>,
    pub date: Option<NaiveDate>,
    /// IANA timezone the provider stored alongside the timestamp
    pub time_zone: Option<String>,
}

impl EventTime {
    pub fn timed(date_time: DateTime<FixedOffset>, time_zone: Option<String>) -> Self {
        Self { date_time: Some(date_time), date: None, time_zone }
    }

    pub fn all_day(date: NaiveDate) -> Self {
        Self { date_time: None, date: Some(date), time_zone: None }
    }
}

/// Calendar event from the provider API
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    pub id: String,
    pub summary: Option<String>,
    pub start: EventTime,
    pub end: EventTime,
    pub status: EventStatus,
    #[serde(default)]
    pub attendees: Vec<Attendee>,
}

impl CalendarEvent {
    /// True when the calendar owner is listed as an attendee who declined.
    pub fn declined_by_owner(&self) -> bool {
        self.attendees
            .iter()
            .any(|a| a.is_self && a.response_status == Some(AttendeeResponse::Declined))
    }
}
