//! Port interfaces for the personal agenda

use async_trait::async_trait;
use cyclarc_domain::{DateRange, Result, ScheduleColor, ScheduleEvent, ScheduleEventDraft, ScheduleEventId};

/// Trait for the schedule event store
#[async_trait]
pub trait ScheduleEventStore: Send + Sync {
    /// Fetch events starting within `range`
    async fn list_events(&self, range: &DateRange) -> Result<Vec<ScheduleEvent>>;

    /// Create an event
    async fn create_event(&self, draft: &ScheduleEventDraft) -> Result<ScheduleEvent>;

    /// Replace an event's fields
    async fn update_event(&self, id: ScheduleEventId, draft: &ScheduleEventDraft) -> Result<ScheduleEvent>;

    /// Delete an event
    async fn delete_event(&self, id: ScheduleEventId) -> Result<()>;

    /// Colour palette offered by the event dialog
    async fn colors(&self) -> Result<Vec<ScheduleColor>>;
}
