//! `BusyDataSource` implementation backed by the Google Calendar API

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shiftguard_core::BusyDataSource;
use shiftguard_domain::{BusyInterval, CalendarEvent, Result};
use tracing::debug;

use super::client::GoogleCalendarClient;

/// Production busy-data source over the Google Calendar client
#[derive(Clone)]
pub struct GoogleBusyDataSource {
    client: GoogleCalendarClient,
}

impl GoogleBusyDataSource {
    pub fn new(client: GoogleCalendarClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl BusyDataSource for GoogleBusyDataSource {
    async fn query_free_busy(
        &self,
        access_token: &str,
        calendar_ids: &[String],
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<HashMap<String, Vec<BusyInterval>>> {
        self.client.query_free_busy(access_token, calendar_ids, start, end).await
    }

    async fn list_events(
        &self,
        access_token: &str,
        calendar_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        treat_tentative_as_busy: bool,
        ignore_declined: bool,
    ) -> Result<Vec<CalendarEvent>> {
        // The events endpoint has no server-side equivalent of these flags;
        // the engine applies its own filtering on whatever comes back.
        debug!(
            calendar_id,
            treat_tentative_as_busy, ignore_declined, "listing events for conflict check"
        );
        self.client.list_events(access_token, calendar_id, start, end).await
    }
}
