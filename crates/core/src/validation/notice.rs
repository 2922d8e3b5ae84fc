//! Minimum-notice check
//!
//! Evaluation timezone: policy timezone, else the caller's timezone, else
//! UTC. Note the business-hours check uses a different fallback chain (the
//! original event's timezone): notice is caller-relative, business hours are
//! venue-relative.

use chrono::{DateTime, FixedOffset, Utc};
use shiftguard_domain::{Policy, Result, Violation, ViolationCode};

use super::timezone::eval_timezone;

/// Check that the proposed start honors the policy's minimum notice.
///
/// The difference is computed on the zone-converted instants, so the hour
/// count stays correct across DST transitions. A difference exactly equal to
/// the minimum passes.
pub fn check_notice(
    proposed_start: DateTime<FixedOffset>,
    now: DateTime<Utc>,
    policy: &Policy,
    caller_time_zone: Option<&str>,
) -> Result<Option<Violation>> {
    let tz = eval_timezone(policy.policy_time_zone.as_deref(), caller_time_zone)?;

    let start_local = proposed_start.with_timezone(&tz);
    let now_local = now.with_timezone(&tz);
    let diff_hours = (start_local - now_local).num_seconds() as f64 / 3600.0;

    if diff_hours >= policy.min_notice_hours {
        return Ok(None);
    }

    let rounded = (diff_hours * 10.0).round() / 10.0;
    let violation = Violation::new(
        ViolationCode::NoticeTooSoon,
        format!(
            "Proposed start is {:.1} hours from now; the minimum notice is {} hours.",
            diff_hours, policy.min_notice_hours
        ),
    )
    .with_detail("diffHours", rounded)
    .with_detail("minNoticeHours", policy.min_notice_hours)
    .with_detail("timeZone", tz.name());

    Ok(Some(violation))
}
