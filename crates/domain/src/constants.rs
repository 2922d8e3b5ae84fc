//! Application constants
//!
//! Centralized location for all domain-level constants used throughout the
//! application.

// Weekday indexing follows the policy map: 0 = Sunday .. 6 = Saturday
pub const WEEKDAY_NAMES: [&str; 7] =
    ["Sunday", "Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday"];

// Business-hours windows are zero-padded 24-hour wall-clock times
pub const BUSINESS_HOURS_TIME_FORMAT: &str = "%H:%M";

// Default policy values (mirroring the reference deployment)
pub const DEFAULT_MIN_NOTICE_HOURS: f64 = 24.0;
pub const DEFAULT_BUSINESS_HOURS_START: &str = "09:00";
pub const DEFAULT_BUSINESS_HOURS_END: &str = "17:00";
