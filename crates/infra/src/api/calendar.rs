//! Cycle event store adapter
//!
//! Implements [`CycleEventStore`] over the `/calendar` endpoints.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use cyclarc_core::CycleEventStore;
use cyclarc_domain::utils::dates::calendar_date;
use cyclarc_domain::{
    CalendarEvent, CyclarcError, DateRange, DetailType, EventId, EventPatch, EventTypeId,
    NewCalendarEvent, PeriodStatus, Result,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use super::client::EventStoreClient;

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Deserialize)]
struct EventsEnvelope {
    #[serde(default)]
    events: Vec<CalendarEvent>,
}

#[derive(Debug, Serialize)]
struct PeriodRequest {
    #[serde(with = "calendar_date")]
    date: NaiveDate,
}

/// [`CycleEventStore`] backed by the event store REST API.
#[derive(Clone)]
pub struct CalendarGateway {
    client: Arc<EventStoreClient>,
}

impl CalendarGateway {
    /// Gateway over a shared client.
    pub fn new(client: Arc<EventStoreClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl CycleEventStore for CalendarGateway {
    #[instrument(skip(self), fields(start = %range.start(), end = %range.end()))]
    async fn list_events(&self, range: &DateRange) -> Result<Vec<CalendarEvent>> {
        let query = [
            ("start", range.start().format(DATE_FORMAT).to_string()),
            ("end", range.end().format(DATE_FORMAT).to_string()),
        ];
        let envelope: EventsEnvelope = self.client.get("/calendar/events", &query).await?;
        debug!(count = envelope.events.len(), "cycle events received");
        Ok(envelope.events)
    }

    #[instrument(skip(self, event), fields(type_id = %event.type_id, beginning = %event.beginning))]
    async fn create_event(&self, event: &NewCalendarEvent) -> Result<CalendarEvent> {
        Ok(self.client.post("/calendar/events", event).await?)
    }

    #[instrument(skip(self, patch), fields(id = %id))]
    async fn update_event(&self, id: EventId, patch: &EventPatch) -> Result<CalendarEvent> {
        Ok(self.client.put(&format!("/calendar/events/{id}"), patch).await?)
    }

    #[instrument(skip(self), fields(id = %id))]
    async fn delete_event(&self, id: EventId) -> Result<()> {
        Ok(self.client.delete(&format!("/calendar/events/{id}")).await?)
    }

    #[instrument(skip(self), fields(event_type = %event_type))]
    async fn detail_types(&self, event_type: EventTypeId) -> Result<Vec<DetailType>> {
        if event_type.detail_mode().is_none() {
            return Err(CyclarcError::InvalidInput(format!(
                "{event_type} events have no detail catalogue"
            )));
        }
        let query = [("eventType", event_type.wire_id().to_string())];
        Ok(self.client.get("/calendar/event-detail-types", &query).await?)
    }

    #[instrument(skip(self))]
    async fn period_status(&self) -> Result<PeriodStatus> {
        Ok(self.client.get("/calendar/last-menses", &[]).await?)
    }

    #[instrument(skip(self), fields(date = %date))]
    async fn start_period(&self, date: NaiveDate) -> Result<()> {
        Ok(self.client.post_unit("/calendar/start-period", &PeriodRequest { date }).await?)
    }

    #[instrument(skip(self), fields(date = %date))]
    async fn end_period(&self, date: NaiveDate) -> Result<()> {
        Ok(self.client.post_unit("/calendar/end-period", &PeriodRequest { date }).await?)
    }
}
