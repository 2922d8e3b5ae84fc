//! Reschedule policy configuration
//!
//! A `Policy` is read fresh for each validation call and never mutated. It is
//! validated once at load time; a malformed policy is a configuration error,
//! never a per-request violation.

use std::collections::BTreeMap;
use std::str::FromStr;

use chrono::NaiveTime;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::constants::{
    BUSINESS_HOURS_TIME_FORMAT, DEFAULT_BUSINESS_HOURS_END, DEFAULT_BUSINESS_HOURS_START,
    DEFAULT_MIN_NOTICE_HOURS,
};
use crate::errors::{Result, ShiftGuardError};

/// How busy-time conflicts are detected
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ConflictMethod {
    /// One combined free/busy query across all calendars
    Aggregate,
    /// Per-calendar event listing with local filtering
    Enumerate,
}

/// One weekday's business-hours window, as zero-padded 24-hour `HH:MM` bounds
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BusinessHours {
    pub start: String,
    pub end: String,
}

impl BusinessHours {
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self { start: start.into(), end: end.into() }
    }

    /// Parse both bounds as wall-clock times.
    ///
    /// # Errors
    /// Returns `ShiftGuardError::Config` if either bound is not a valid
    /// zero-padded 24-hour `HH:MM` string.
    pub fn parse(&self) -> Result<(NaiveTime, NaiveTime)> {
        let open = parse_wall_clock(&self.start)?;
        let close = parse_wall_clock(&self.end)?;
        Ok((open, close))
    }
}

fn parse_wall_clock(value: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(value, BUSINESS_HOURS_TIME_FORMAT).map_err(|e| {
        ShiftGuardError::Config(format!("Invalid business-hours time '{}': {}", value, e))
    })
}

/// The configured ruleset a proposed reschedule is evaluated against.
///
/// `business_hours_by_weekday` is keyed 0 = Sunday .. 6 = Saturday. A weekday
/// with no entry has no business hours at all: every proposal on that day is
/// out of policy, not unrestricted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Policy {
    pub min_notice_hours: f64,
    /// IANA timezone the policy's wall-clock rules are anchored to
    pub policy_time_zone: Option<String>,
    pub business_hours_by_weekday: BTreeMap<u8, BusinessHours>,
    /// Calendars checked for conflicts in addition to the target calendar
    pub calendars_to_check: Vec<String>,
    pub treat_tentative_as_busy: bool,
    pub ignore_declined: bool,
    pub conflict_method: ConflictMethod,
}

impl Default for Policy {
    fn default() -> Self {
        let weekday_window =
            BusinessHours::new(DEFAULT_BUSINESS_HOURS_START, DEFAULT_BUSINESS_HOURS_END);
        // Monday through Friday
        let business_hours_by_weekday =
            (1..=5).map(|day| (day, weekday_window.clone())).collect();

        Self {
            min_notice_hours: DEFAULT_MIN_NOTICE_HOURS,
            policy_time_zone: None,
            business_hours_by_weekday,
            calendars_to_check: Vec::new(),
            treat_tentative_as_busy: true,
            ignore_declined: true,
            conflict_method: ConflictMethod::Aggregate,
        }
    }
}

impl Policy {
    /// Validate load-time invariants.
    ///
    /// # Errors
    /// Returns `ShiftGuardError::Config` if:
    /// - `min_notice_hours` is negative or not finite
    /// - `policy_time_zone` is present but not a known IANA timezone
    /// - any weekday key is outside 0..=6
    /// - any business-hours window fails to parse, or its start does not
    ///   strictly precede its end
    pub fn validate(&self) -> Result<()> {
        if !self.min_notice_hours.is_finite() || self.min_notice_hours < 0.0 {
            return Err(ShiftGuardError::Config(format!(
                "minNoticeHours must be a non-negative number, got {}",
                self.min_notice_hours
            )));
        }

        if let Some(tz) = &self.policy_time_zone {
            Tz::from_str(tz).map_err(|_| {
                ShiftGuardError::Config(format!("Unknown policy time zone: {}", tz))
            })?;
        }

        for (weekday, window) in &self.business_hours_by_weekday {
            if *weekday > 6 {
                return Err(ShiftGuardError::Config(format!(
                    "Weekday key {} is out of range (0 = Sunday .. 6 = Saturday)",
                    weekday
                )));
            }
            let (open, close) = window.parse()?;
            if open >= close {
                return Err(ShiftGuardError::Config(format!(
                    "Business hours for weekday {} must start before they end ({} >= {})",
                    weekday, window.start, window.end
                )));
            }
        }

        Ok(())
    }
}
