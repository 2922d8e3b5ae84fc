//! Google Calendar integration
//!
//! HTTP access to the Calendar v3 API for the two busy-data reads the
//! validation engine needs: the aggregate `freeBusy` query and per-calendar
//! event listing.

pub mod client;
pub mod source;
pub mod types;

pub use client::GoogleCalendarClient;
pub use source::GoogleBusyDataSource;
