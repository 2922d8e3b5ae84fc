//! In-memory test doubles for the validation engine's ports.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shiftguard_core::{BusyDataSource, Clock, PolicyStore};
use shiftguard_domain::{
    BusyInterval, CalendarEvent, EventStatus, EventTime, Policy, Result as DomainResult,
    ShiftGuardError, ValidationInput,
};

/// In-memory mock for `BusyDataSource`.
///
/// Serves fixed busy intervals and event lists per calendar id and records
/// which endpoints were exercised, so tests can assert on fallback behavior
/// without a live provider.
#[derive(Default)]
pub struct MockBusyDataSource {
    busy: Mutex<HashMap<String, Vec<BusyInterval>>>,
    events: Mutex<HashMap<String, Vec<CalendarEvent>>>,
    fail_free_busy: AtomicBool,
    failing_calendars: Mutex<HashSet<String>>,
    free_busy_calls: AtomicUsize,
    list_calls: Mutex<Vec<String>>,
}

impl MockBusyDataSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_busy(self, calendar_id: &str, intervals: Vec<BusyInterval>) -> Self {
        self.busy.lock().unwrap().insert(calendar_id.to_string(), intervals);
        self
    }

    pub fn with_events(self, calendar_id: &str, events: Vec<CalendarEvent>) -> Self {
        self.events.lock().unwrap().insert(calendar_id.to_string(), events);
        self
    }

    /// Make every aggregate free/busy query fail.
    pub fn with_free_busy_failure(self) -> Self {
        self.fail_free_busy.store(true, Ordering::SeqCst);
        self
    }

    /// Make event listing fail for one calendar.
    pub fn with_failing_calendar(self, calendar_id: &str) -> Self {
        self.failing_calendars.lock().unwrap().insert(calendar_id.to_string());
        self
    }

    pub fn free_busy_calls(&self) -> usize {
        self.free_busy_calls.load(Ordering::SeqCst)
    }

    /// Calendar ids passed to `list_events`, in call order.
    pub fn list_calls(&self) -> Vec<String> {
        self.list_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl BusyDataSource for MockBusyDataSource {
    async fn query_free_busy(
        &self,
        _access_token: &str,
        calendar_ids: &[String],
        _start: DateTime<Utc>,
        _end: DateTime<Utc>,
    ) -> DomainResult<HashMap<String, Vec<BusyInterval>>> {
        self.free_busy_calls.fetch_add(1, Ordering::SeqCst);

        if self.fail_free_busy.load(Ordering::SeqCst) {
            return Err(ShiftGuardError::Network("free/busy endpoint unavailable".into()));
        }

        let busy = self.busy.lock().unwrap();
        Ok(calendar_ids
            .iter()
            .map(|id| (id.clone(), busy.get(id).cloned().unwrap_or_default()))
            .collect())
    }

    async fn list_events(
        &self,
        _access_token: &str,
        calendar_id: &str,
        _start: DateTime<Utc>,
        _end: DateTime<Utc>,
        _treat_tentative_as_busy: bool,
        _ignore_declined: bool,
    ) -> DomainResult<Vec<CalendarEvent>> {
        self.list_calls.lock().unwrap().push(calendar_id.to_string());

        if self.failing_calendars.lock().unwrap().contains(calendar_id) {
            return Err(ShiftGuardError::Network(format!(
                "event listing failed for {}",
                calendar_id
            )));
        }

        Ok(self.events.lock().unwrap().get(calendar_id).cloned().unwrap_or_default())
    }
}

/// Policy store that always returns the same policy.
pub struct StaticPolicyStore {
    policy: Policy,
}

impl StaticPolicyStore {
    pub fn new(policy: Policy) -> Self {
        Self { policy }
    }
}

#[async_trait]
impl PolicyStore for StaticPolicyStore {
    async fn load_policy(&self) -> DomainResult<Policy> {
        Ok(self.policy.clone())
    }
}

/// Policy store whose load always fails, for error-propagation tests.
pub struct FailingPolicyStore;

#[async_trait]
impl PolicyStore for FailingPolicyStore {
    async fn load_policy(&self) -> DomainResult<Policy> {
        Err(ShiftGuardError::Config("policy file unreadable".into()))
    }
}

/// Clock pinned to a fixed instant.
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// A confirmed timed event; enough for the enumerate-strategy filters.
pub fn confirmed_event(id: &str) -> CalendarEvent {
    CalendarEvent {
        id: id.to_string(),
        summary: Some(format!("Event {}", id)),
        start: EventTime::default(),
        end: EventTime::default(),
        status: EventStatus::Confirmed,
        attendees: Vec::new(),
    }
}

/// A validation input for a one-hour-style proposal, with the original event
/// carrying an optional stored timezone.
pub fn build_input(
    proposed_start: &str,
    proposed_end: &str,
    event_time_zone: Option<&str>,
) -> ValidationInput {
    let mut event = confirmed_event("original-event");
    event.start.time_zone = event_time_zone.map(str::to_string);

    ValidationInput {
        event,
        proposed_start: DateTime::parse_from_rfc3339(proposed_start).unwrap(),
        proposed_end: DateTime::parse_from_rfc3339(proposed_end).unwrap(),
        caller_time_zone: None,
        calendar_id: "primary".to_string(),
        access_token: "test-token".to_string(),
    }
}

/// One busy interval covering the given RFC 3339 window.
pub fn busy(start: &str, end: &str) -> BusyInterval {
    BusyInterval {
        start: DateTime::parse_from_rfc3339(start).unwrap().to_utc(),
        end: DateTime::parse_from_rfc3339(end).unwrap().to_utc(),
    }
}
