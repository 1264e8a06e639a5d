//! Personal agenda

pub mod dialog;
pub mod ports;
pub mod service;

pub use dialog::{prepare_draft, AgendaDialog, EventDialog, EventDialogMode};
pub use ports::ScheduleEventStore;
pub use service::{AgendaService, AgendaSnapshot};
