//! Business-hours check
//!
//! Evaluation timezone: policy timezone, else the timezone stored on the
//! original event's start, else UTC. The open/close instants are anchored to
//! the proposed start's calendar date, so a proposal whose end crosses
//! midnight is still judged against the start day's close.

use chrono::{DateTime, Datelike, FixedOffset, LocalResult, NaiveDate, NaiveTime, TimeZone};
use chrono_tz::Tz;
use shiftguard_domain::constants::WEEKDAY_NAMES;
use shiftguard_domain::{Policy, Result, ShiftGuardError, Violation, ViolationCode};

use super::timezone::eval_timezone;

/// Check that the proposed window sits inside the weekday's business hours.
///
/// A weekday with no policy entry has no business hours at all: every
/// proposal on that day fails. An end exactly at close passes.
pub fn check_business_hours(
    proposed_start: DateTime<FixedOffset>,
    proposed_end: DateTime<FixedOffset>,
    policy: &Policy,
    event_time_zone: Option<&str>,
) -> Result<Option<Violation>> {
    let tz = eval_timezone(policy.policy_time_zone.as_deref(), event_time_zone)?;

    let start_local = proposed_start.with_timezone(&tz);
    let end_local = proposed_end.with_timezone(&tz);

    let weekday = start_local.weekday().num_days_from_sunday() as u8;
    let weekday_name = WEEKDAY_NAMES[weekday as usize];

    let Some(window) = policy.business_hours_by_weekday.get(&weekday) else {
        let violation = Violation::new(
            ViolationCode::BusinessHoursOutside,
            format!("No business hours defined for {}.", weekday_name),
        )
        .with_detail("weekday", weekday_name)
        .with_detail("timeZone", tz.name());
        return Ok(Some(violation));
    };

    let (open_time, close_time) = window.parse()?;
    let date = start_local.date_naive();
    let open = local_instant(tz, date, open_time)?;
    let close = local_instant(tz, date, close_time)?;

    if start_local < open || end_local > close {
        let violation = Violation::new(
            ViolationCode::BusinessHoursOutside,
            format!(
                "Proposed time {} to {} falls outside business hours {} to {} on {}.",
                start_local.format("%H:%M"),
                end_local.format("%H:%M"),
                window.start,
                window.end,
                weekday_name
            ),
        )
        .with_detail("weekday", weekday_name)
        .with_detail("businessHoursStart", window.start.clone())
        .with_detail("businessHoursEnd", window.end.clone())
        .with_detail("proposedStart", start_local.to_rfc3339())
        .with_detail("proposedEnd", end_local.to_rfc3339())
        .with_detail("timeZone", tz.name());
        return Ok(Some(violation));
    }

    Ok(None)
}

/// Resolve a wall-clock time on a date to an instant in `tz`.
///
/// Ambiguous local times (DST fall-back) take the earliest mapping. A local
/// time skipped by a DST gap does not exist and is rejected.
fn local_instant(tz: Tz, date: NaiveDate, time: NaiveTime) -> Result<DateTime<Tz>> {
    match tz.from_local_datetime(&date.and_time(time)) {
        LocalResult::Single(instant) => Ok(instant),
        LocalResult::Ambiguous(earliest, _) => Ok(earliest),
        LocalResult::None => Err(ShiftGuardError::InvalidInput(format!(
            "{} {} does not exist in {} (DST gap)",
            date,
            time,
            tz.name()
        ))),
    }
}
