//! Port interfaces for the cycle tracker

use async_trait::async_trait;
use chrono::NaiveDate;
use cyclarc_domain::{
    CalendarEvent, DateRange, DetailType, EventId, EventPatch, EventTypeId, NewCalendarEvent,
    PeriodStatus, Result,
};

/// Trait for the cycle event store
///
/// A profile without cycle durations makes `list_events` fail with
/// `CyclarcError::Prerequisite`.
#[async_trait]
pub trait CycleEventStore: Send + Sync {
    /// Fetch every event (concrete and calculated) overlapping `range`
    async fn list_events(&self, range: &DateRange) -> Result<Vec<CalendarEvent>>;

    /// Create a concrete event
    async fn create_event(&self, event: &NewCalendarEvent) -> Result<CalendarEvent>;

    /// Update the present fields of a concrete event
    ///
    /// A `details` list replaces the stored list completely.
    async fn update_event(&self, id: EventId, patch: &EventPatch) -> Result<CalendarEvent>;

    /// Delete a concrete event
    async fn delete_event(&self, id: EventId) -> Result<()>;

    /// Detail-type catalogue for Symptoms, Drugs or Moods
    async fn detail_types(&self, event_type: EventTypeId) -> Result<Vec<DetailType>>;

    /// Whether an open period exists, regardless of the loaded range
    async fn period_status(&self) -> Result<PeriodStatus>;

    /// Open a period starting on `date`
    async fn start_period(&self, date: NaiveDate) -> Result<()>;

    /// Close the open period on `date`
    async fn end_period(&self, date: NaiveDate) -> Result<()>;
}
