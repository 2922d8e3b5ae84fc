//! Evaluation-timezone resolution
//!
//! Each check resolves its evaluation timezone from a two-step preference
//! chain ending at UTC. The policy timezone was validated at load time, so a
//! parse failure there is a configuration error; the per-request fallback
//! (caller or original-event timezone) is best-effort and skipped with a
//! warning when unparseable.

use std::str::FromStr;

use chrono_tz::Tz;
use shiftguard_domain::{Result, ShiftGuardError};
use tracing::warn;

pub(crate) fn eval_timezone(policy_tz: Option<&str>, fallback_tz: Option<&str>) -> Result<Tz> {
    if let Some(name) = policy_tz {
        return Tz::from_str(name)
            .map_err(|_| ShiftGuardError::Config(format!("Unknown policy time zone: {}", name)));
    }

    if let Some(name) = fallback_tz {
        match Tz::from_str(name) {
            Ok(tz) => return Ok(tz),
            Err(_) => warn!(time_zone = name, "unparseable fallback time zone, using UTC"),
        }
    }

    Ok(Tz::UTC)
}
