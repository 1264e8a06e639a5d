//! Commands exposed by the binary

pub mod calendar;

pub use calendar::{end_period, show_agenda, show_cycle, start_period};
