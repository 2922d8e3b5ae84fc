//! Busy-time conflict detection
//!
//! Probes the calendar set (target calendar plus the policy's extra
//! calendars, de-duplicated) for busy time overlapping the proposed window.
//! The policy picks the primary strategy; a failed aggregate query falls back
//! to enumeration, and only a total data-source failure surfaces as an error.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use shiftguard_domain::{
    CalendarEvent, ConflictMethod, EventStatus, Policy, Result, ShiftGuardError,
};
use tracing::warn;

use super::ports::BusyDataSource;

/// One conflict probe: the proposed window on a target calendar
#[derive(Debug, Clone)]
pub struct ProbeRequest<'a> {
    pub access_token: &'a str,
    pub calendar_id: &'a str,
    pub window_start: DateTime<Utc>,
    pub window_end: DateTime<Utc>,
}

/// Outcome of a conflict probe
#[derive(Debug, Clone)]
pub struct ProbeOutcome {
    pub conflict: bool,
    /// The strategy that actually produced the answer (after any fallback)
    pub method_used: ConflictMethod,
    pub calendars_checked: Vec<String>,
}

/// Availability prober over an injected busy-data source
pub struct AvailabilityProber {
    source: Arc<dyn BusyDataSource>,
}

impl AvailabilityProber {
    pub fn new(source: Arc<dyn BusyDataSource>) -> Self {
        Self { source }
    }

    /// Determine whether any checked calendar is busy during the window.
    ///
    /// # Errors
    /// Returns `ShiftGuardError::ConflictCheckUnavailable` when every
    /// strategy failed; approving a reschedule without busy data would be
    /// unsafe, so this never degrades to "no conflict".
    pub async fn probe(&self, request: &ProbeRequest<'_>, policy: &Policy) -> Result<ProbeOutcome> {
        let calendars = conflict_calendar_set(request.calendar_id, &policy.calendars_to_check);

        match policy.conflict_method {
            ConflictMethod::Aggregate => {
                match self.probe_aggregate(request, &calendars).await {
                    Ok(conflict) => Ok(ProbeOutcome {
                        conflict,
                        method_used: ConflictMethod::Aggregate,
                        calendars_checked: calendars,
                    }),
                    Err(aggregate_err) => {
                        warn!(
                            error = %aggregate_err,
                            "aggregate free/busy query failed, falling back to event enumeration"
                        );
                        match self.probe_enumerate(request, &calendars, policy).await {
                            Ok(conflict) => Ok(ProbeOutcome {
                                conflict,
                                method_used: ConflictMethod::Enumerate,
                                calendars_checked: calendars,
                            }),
                            Err(enumerate_err) => {
                                Err(ShiftGuardError::ConflictCheckUnavailable(format!(
                                    "aggregate query failed ({}); enumeration failed ({})",
                                    aggregate_err, enumerate_err
                                )))
                            }
                        }
                    }
                }
            }
            ConflictMethod::Enumerate => {
                match self.probe_enumerate(request, &calendars, policy).await {
                    Ok(conflict) => Ok(ProbeOutcome {
                        conflict,
                        method_used: ConflictMethod::Enumerate,
                        calendars_checked: calendars,
                    }),
                    Err(err) => Err(ShiftGuardError::ConflictCheckUnavailable(format!(
                        "enumeration failed ({})",
                        err
                    ))),
                }
            }
        }
    }

    /// Aggregate strategy: conflict iff any calendar reports a non-empty busy
    /// list. Overlap with the window is the remote's determination.
    async fn probe_aggregate(
        &self,
        request: &ProbeRequest<'_>,
        calendars: &[String],
    ) -> Result<bool> {
        let busy_by_calendar = self
            .source
            .query_free_busy(
                request.access_token,
                calendars,
                request.window_start,
                request.window_end,
            )
            .await?;

        Ok(busy_by_calendar.values().any(|busy| !busy.is_empty()))
    }

    /// Enumerate strategy: per-calendar event listing with local filtering.
    ///
    /// A failed calendar is skipped and contributes no conflict; the strategy
    /// as a whole fails only when every calendar fetch failed.
    async fn probe_enumerate(
        &self,
        request: &ProbeRequest<'_>,
        calendars: &[String],
        policy: &Policy,
    ) -> Result<bool> {
        let mut conflict = false;
        let mut failed_calendars = 0usize;

        for calendar_id in calendars {
            let events = match self
                .source
                .list_events(
                    request.access_token,
                    calendar_id,
                    request.window_start,
                    request.window_end,
                    policy.treat_tentative_as_busy,
                    policy.ignore_declined,
                )
                .await
            {
                Ok(events) => events,
                Err(err) => {
                    warn!(
                        calendar_id = calendar_id.as_str(),
                        error = %err,
                        "event listing failed, skipping calendar"
                    );
                    failed_calendars += 1;
                    continue;
                }
            };

            if events.iter().any(|event| blocks_window(event, policy)) {
                conflict = true;
            }
        }

        if !calendars.is_empty() && failed_calendars == calendars.len() {
            return Err(ShiftGuardError::Network(format!(
                "event listing failed for all {} calendars",
                failed_calendars
            )));
        }

        Ok(conflict)
    }
}

/// Target calendar unioned with the policy's extra calendars, de-duplicated
/// with the original order preserved.
fn conflict_calendar_set(calendar_id: &str, calendars_to_check: &[String]) -> Vec<String> {
    let mut calendars = vec![calendar_id.to_string()];
    for candidate in calendars_to_check {
        if !calendars.contains(candidate) {
            calendars.push(candidate.clone());
        }
    }
    calendars
}

/// Local filtering for the enumerate strategy. The data source may have
/// pre-filtered, but its filtering is not trusted as the sole filter.
fn blocks_window(event: &CalendarEvent, policy: &Policy) -> bool {
    if event.status == EventStatus::Cancelled {
        return false;
    }
    if policy.ignore_declined && event.declined_by_owner() {
        return false;
    }
    if !policy.treat_tentative_as_busy && event.status == EventStatus::Tentative {
        return false;
    }
    true
}
