//! Domain types and models

pub mod event;
pub mod range;
pub mod schedule;

pub use event::{
    CalendarEvent, CalendarEventRecord, ConcreteEvent, DerivedEvent, DetailMode, DetailType,
    DetailTypeId, EventData, EventDetail, EventId, EventPatch, EventTypeId, Intensity,
    NewCalendarEvent, PeriodStatus, Trimester,
};
pub use range::{DateRange, Granularity};
pub use schedule::{ColorId, ScheduleColor, ScheduleEvent, ScheduleEventDraft, ScheduleEventId};
