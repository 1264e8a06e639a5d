//! Agenda event store adapter

use std::sync::Arc;

use async_trait::async_trait;
use cyclarc_core::ScheduleEventStore;
use cyclarc_domain::{
    DateRange, Result, ScheduleColor, ScheduleEvent, ScheduleEventDraft, ScheduleEventId,
};
use serde::Deserialize;
use tracing::{debug, instrument};

use super::client::EventStoreClient;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// The list endpoint answers either a bare array or `{events: [...]}`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ScheduleList {
    Bare(Vec<ScheduleEvent>),
    Wrapped {
        #[serde(default)]
        events: Vec<ScheduleEvent>,
    },
}

impl ScheduleList {
    fn into_events(self) -> Vec<ScheduleEvent> {
        match self {
            Self::Bare(events) | Self::Wrapped { events } => events,
        }
    }
}

/// [`ScheduleEventStore`] backed by the `/schedule` endpoints.
#[derive(Clone)]
pub struct ScheduleGateway {
    client: Arc<EventStoreClient>,
}

impl ScheduleGateway {
    /// Gateway over a shared client.
    pub fn new(client: Arc<EventStoreClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ScheduleEventStore for ScheduleGateway {
    #[instrument(skip(self), fields(start = %range.start(), end = %range.end()))]
    async fn list_events(&self, range: &DateRange) -> Result<Vec<ScheduleEvent>> {
        let query = [
            ("start", range.start().format(DATE_FORMAT).to_string()),
            ("end", range.end().format(DATE_FORMAT).to_string()),
        ];
        let list: ScheduleList = self.client.get("/schedule/events", &query).await?;
        let events = list.into_events();
        debug!(count = events.len(), "schedule events received");
        Ok(events)
    }

    #[instrument(skip(self, draft), fields(heading = %draft.heading))]
    async fn create_event(&self, draft: &ScheduleEventDraft) -> Result<ScheduleEvent> {
        Ok(self.client.post("/schedule/events", draft).await?)
    }

    #[instrument(skip(self, draft), fields(id = %id))]
    async fn update_event(
        &self,
        id: ScheduleEventId,
        draft: &ScheduleEventDraft,
    ) -> Result<ScheduleEvent> {
        Ok(self.client.put(&format!("/schedule/events/{id}"), draft).await?)
    }

    #[instrument(skip(self), fields(id = %id))]
    async fn delete_event(&self, id: ScheduleEventId) -> Result<()> {
        Ok(self.client.delete(&format!("/schedule/events/{id}")).await?)
    }

    #[instrument(skip(self))]
    async fn colors(&self) -> Result<Vec<ScheduleColor>> {
        Ok(self.client.get("/schedule/colors", &[]).await?)
    }
}
