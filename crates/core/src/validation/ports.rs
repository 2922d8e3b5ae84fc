//! Port interfaces for reschedule validation
//!
//! These traits define the boundaries between core business logic
//! and infrastructure implementations.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shiftguard_domain::{BusyInterval, CalendarEvent, Policy, Result};

/// Trait for reading busy-time data from a calendar provider
#[async_trait]
pub trait BusyDataSource: Send + Sync {
    /// One combined free/busy query across all calendars for a window.
    ///
    /// Returns the busy intervals the provider reports per calendar id.
    /// Overlap with the window is the provider's determination; callers do
    /// not re-check it.
    async fn query_free_busy(
        &self,
        access_token: &str,
        calendar_ids: &[String],
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<HashMap<String, Vec<BusyInterval>>>;

    /// Fetch events intersecting a window on one calendar.
    ///
    /// The tentative/declined flags are passed through so a provider can
    /// pre-filter, but callers must not trust that filtering and apply their
    /// own.
    async fn list_events(
        &self,
        access_token: &str,
        calendar_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        treat_tentative_as_busy: bool,
        ignore_declined: bool,
    ) -> Result<Vec<CalendarEvent>>;
}

/// Trait for loading the reschedule policy
#[async_trait]
pub trait PolicyStore: Send + Sync {
    /// Load the policy. The result is authoritative for one validation call.
    async fn load_policy(&self) -> Result<Policy>;
}

/// Trait for reading the current instant.
///
/// Injected instead of an ambient clock so tests can pin "now" without any
/// process-wide freeze state.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Production clock backed by the system time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
