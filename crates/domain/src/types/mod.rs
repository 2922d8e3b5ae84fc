//! Domain types and models

pub mod event;
pub mod policy;
pub mod violation;

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};

// Re-export commonly used types for convenience
pub use event::{Attendee, AttendeeResponse, CalendarEvent, EventStatus, EventTime};
pub use policy::{BusinessHours, ConflictMethod, Policy};
pub use violation::{Violation, ViolationCode};

/// One busy span reported by an aggregate free/busy query
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BusyInterval {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Everything the validation engine needs for one reschedule check.
///
/// Constructed per request and never persisted. The proposed timestamps carry
/// their own offsets; the original event supplies the timezone fallback for
/// the business-hours check.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationInput {
    /// The event being rescheduled, as last read from the provider
    pub event: CalendarEvent,
    pub proposed_start: DateTime<FixedOffset>,
    pub proposed_end: DateTime<FixedOffset>,
    /// IANA timezone of the requesting user, if known
    pub caller_time_zone: Option<String>,
    /// Calendar holding the event being modified
    pub calendar_id: String,
    /// Opaque credential forwarded to the calendar data source
    pub access_token: String,
}
