//! Menstrual cycle tracker

pub mod details;
pub mod dialog;
pub mod guard;
pub mod ports;
pub mod service;

pub use details::DetailSelection;
pub use dialog::{ActiveInput, CycleDialog, DayDialog, DetailsDialog};
pub use guard::{can_end_period, can_start_period, ensure_can_end_period, ensure_can_start_period};
pub use ports::CycleEventStore;
pub use service::{CycleSnapshot, CycleTracker};
