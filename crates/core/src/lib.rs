//! # Cyclarc Core
//!
//! Calendar engine logic - no infrastructure dependencies.
//!
//! This crate contains:
//! - Range navigation and generation-guarded loading
//! - The day classifier and view grid builder
//! - Cycle invariants and the dialog state machines
//! - Port interfaces (traits) for the event store and notifications
//!
//! ## Architecture Principles
//! - Only depends on `cyclarc-domain`
//! - No HTTP or platform code
//! - All external dependencies via traits

pub mod agenda;
pub mod calendar;
pub mod cycle;

// Infrastructure ports
pub mod notification_ports;

pub use agenda::{AgendaDialog, AgendaService, ScheduleEventStore};
pub use calendar::{
    classify, range_for, CalendarView, ClassTag, Classification, Clock, FixedClock, HourWindow,
    LoadOutcome, LoadStatus, RangeLoader, SystemClock, TimeCursor,
};
pub use cycle::{ActiveInput, CycleDialog, CycleEventStore, CycleTracker};
pub use notification_ports::{Notification, NotificationLevel, NotificationSink, NoopNotificationSink};
