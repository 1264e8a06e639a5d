//! Application constants
//!
//! Centralized location for domain-level constants shared by the calendar
//! engine and its adapters.

// View grid
/// First hour row of the week and day grids.
pub const DEFAULT_DAY_START_HOUR: u32 = 6;
/// Last hour row, inclusive.
pub const DEFAULT_DAY_END_HOUR: u32 = 22;
/// Columns of every grid.
pub const DAYS_PER_WEEK: usize = 7;
/// A month grid spans five or six weeks.
pub const MONTH_GRID_MIN_ROWS: usize = 5;
/// Upper bound of month grid rows.
pub const MONTH_GRID_MAX_ROWS: usize = 6;

// Detail intensity scale (Symptoms, Moods)
/// Lowest intensity level.
pub const INTENSITY_MIN: u8 = 1;
/// Highest intensity level.
pub const INTENSITY_MAX: u8 = 3;

// Single-value inputs
/// Lightest accepted weight.
pub const WEIGHT_MIN_KG: f64 = 20.0;
/// Heaviest accepted weight.
pub const WEIGHT_MAX_KG: f64 = 300.0;
/// Lowest accepted temperature.
pub const TEMPERATURE_MIN_C: f64 = 34.0;
/// Highest accepted temperature.
pub const TEMPERATURE_MAX_C: f64 = 43.0;

// Agenda
/// Longest accepted schedule heading, in characters.
pub const HEADING_MAX_LENGTH: usize = 120;

// Event store
/// Event store base URL when none is configured.
pub const DEFAULT_EVENT_STORE_URL: &str = "http://localhost:8080/api";
/// Sent with every event store request.
pub const DEFAULT_USER_AGENT: &str = concat!("cyclarc/", env!("CARGO_PKG_VERSION"));
/// Tracing filter used without `RUST_LOG`.
pub const DEFAULT_LOG_LEVEL: &str = "info";
