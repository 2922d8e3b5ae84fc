//! Reschedule validation service - core business logic

use std::sync::Arc;

use serde_json::json;
use shiftguard_domain::{Policy, Result, ValidationInput, Violation, ViolationCode};

use super::conflict::{AvailabilityProber, ProbeOutcome, ProbeRequest};
use super::ports::{BusyDataSource, Clock, PolicyStore, SystemClock};
use super::{business_hours, notice};

/// Reschedule validation service.
///
/// Stateless per call: the policy and calendar data are read-only inputs for
/// the duration of one evaluation, and nothing is cached between calls.
pub struct RescheduleValidator {
    prober: AvailabilityProber,
    policy_store: Arc<dyn PolicyStore>,
    clock: Arc<dyn Clock>,
}

impl RescheduleValidator {
    /// Create a new validator over a busy-data source and a policy store.
    pub fn new(source: Arc<dyn BusyDataSource>, policy_store: Arc<dyn PolicyStore>) -> Self {
        Self {
            prober: AvailabilityProber::new(source),
            policy_store,
            clock: Arc::new(SystemClock),
        }
    }

    /// Replace the clock, for deterministic "now" in tests.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Evaluate a proposed reschedule against the policy.
    ///
    /// All three checks run unconditionally; violations come back in the
    /// fixed order {notice, business hours, conflict}. An empty list means
    /// the reschedule is approved. When `policy` is `None`, one is loaded
    /// from the policy store and is authoritative for this call.
    ///
    /// # Errors
    /// Propagates policy-load failures and
    /// `ShiftGuardError::ConflictCheckUnavailable` when no conflict strategy
    /// could produce an answer. Hard errors are never reported as an empty
    /// violation list.
    pub async fn validate_reschedule(
        &self,
        input: &ValidationInput,
        policy: Option<&Policy>,
    ) -> Result<Vec<Violation>> {
        let loaded;
        let policy = match policy {
            Some(policy) => policy,
            None => {
                loaded = self.policy_store.load_policy().await?;
                &loaded
            }
        };

        let now = self.clock.now();
        let mut violations = Vec::new();

        if let Some(violation) = notice::check_notice(
            input.proposed_start,
            now,
            policy,
            input.caller_time_zone.as_deref(),
        )? {
            violations.push(violation);
        }

        if let Some(violation) = business_hours::check_business_hours(
            input.proposed_start,
            input.proposed_end,
            policy,
            input.event.start.time_zone.as_deref(),
        )? {
            violations.push(violation);
        }

        let request = ProbeRequest {
            access_token: &input.access_token,
            calendar_id: &input.calendar_id,
            window_start: input.proposed_start.to_utc(),
            window_end: input.proposed_end.to_utc(),
        };
        let outcome = self.prober.probe(&request, policy).await?;
        if outcome.conflict {
            violations.push(conflict_violation(&request, &outcome));
        }

        Ok(violations)
    }
}

/// Diagnostic violation for a detected conflict. Deliberately names the
/// window, calendar set, and method but never the conflicting event.
fn conflict_violation(request: &ProbeRequest<'_>, outcome: &ProbeOutcome) -> Violation {
    Violation::new(
        ViolationCode::TimeConflict,
        "The proposed time overlaps an existing event on a checked calendar.",
    )
    .with_detail(
        "window",
        json!({
            "start": request.window_start.to_rfc3339(),
            "end": request.window_end.to_rfc3339(),
        }),
    )
    .with_detail("calendarsChecked", outcome.calendars_checked.clone())
    .with_detail("method", json!(outcome.method_used))
}
