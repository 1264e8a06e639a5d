//! Shared calendar machinery: navigation, loading, classification and grids.

pub mod classifier;
pub mod grid;
pub mod loader;
pub mod time_cursor;

pub use classifier::{applicable_events, classify, classify_range, ClassTag, Classification};
pub use grid::{
    build_month, build_time_grid, build_view, CalendarView, DayCell, DayColumn, HourSlot,
    HourWindow, MonthCell, MonthGrid, TimeGrid,
};
pub use loader::{LoadOutcome, LoadStatus, LoadTicket, RangeLoader};
pub use time_cursor::{range_for, Clock, FixedClock, SystemClock, TimeCursor};
