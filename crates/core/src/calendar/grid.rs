//! View grid construction
//!
//! Turns a pivot and granularity into ordered cells: a Monday-first month
//! grid with blank padding, or hour rows per day for week and day views.
//! Each cell carries its classification and the schedule events that start
//! in it. No state, no I/O.

use chrono::{Datelike, NaiveDate, Timelike};
use cyclarc_domain::constants::{DAYS_PER_WEEK, MONTH_GRID_MIN_ROWS};
use cyclarc_domain::{CalendarEvent, CyclarcError, DateRange, Granularity, Result, ScheduleEvent, ViewConfig};
use serde::Serialize;

use super::classifier::{classify_range, Classification};
use super::time_cursor::{first_of_month, last_of_month, range_for};

/// Inclusive hour rows shown by week and day views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HourWindow {
    first: u32,
    last: u32,
}

impl Default for HourWindow {
    fn default() -> Self {
        Self::from(&ViewConfig::default())
    }
}

impl From<&ViewConfig> for HourWindow {
    fn from(config: &ViewConfig) -> Self {
        Self::new(config.day_start_hour, config.day_end_hour).unwrap_or(Self { first: 6, last: 22 })
    }
}

impl HourWindow {
    /// Hours `first..=last`, both within 0..=23.
    pub fn new(first: u32, last: u32) -> Result<Self> {
        if first > last || last > 23 {
            return Err(CyclarcError::Config(format!("invalid hour window {first}..={last}")));
        }
        Ok(Self { first, last })
    }

    /// First hour row.
    pub const fn first(&self) -> u32 {
        self.first
    }

    /// Last hour row, inclusive.
    pub const fn last(&self) -> u32 {
        self.last
    }

    /// Every hour row in order.
    pub fn hours(&self) -> impl Iterator<Item = u32> {
        self.first..=self.last
    }

    /// Row an event starting at `hour` is attached to.
    pub fn clamp(&self, hour: u32) -> u32 {
        hour.clamp(self.first, self.last)
    }
}

/// One day of a month grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayCell {
    /// Day shown by the cell.
    pub date: NaiveDate,
    /// Tags applying to the day.
    pub classification: Classification,
    /// Schedule events starting that day.
    pub schedule: Vec<ScheduleEvent>,
}

/// Cell of a month grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MonthCell {
    /// Padding outside the pivot's month.
    Blank,
    /// A day of the pivot's month.
    Day(DayCell),
}

impl MonthCell {
    /// The day, `None` for padding.
    pub const fn day(&self) -> Option<&DayCell> {
        match self {
            Self::Day(cell) => Some(cell),
            Self::Blank => None,
        }
    }
}

/// Month view: rows of seven cells, Monday first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthGrid {
    /// First day of the shown month.
    pub month_start: NaiveDate,
    /// Five or six rows of seven cells.
    pub rows: Vec<Vec<MonthCell>>,
}

impl MonthGrid {
    /// Non-blank cells in order.
    pub fn days(&self) -> impl Iterator<Item = &DayCell> {
        self.rows.iter().flatten().filter_map(MonthCell::day)
    }

    /// Cell of `date`, if it lies in the shown month.
    pub fn cell(&self, date: NaiveDate) -> Option<&DayCell> {
        self.days().find(|cell| cell.date == date)
    }
}

/// One hour row of a day column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HourSlot {
    /// Hour of day, 0 to 23.
    pub hour: u32,
    /// Events starting in this hour, clamped into the window.
    pub schedule: Vec<ScheduleEvent>,
}

/// One day of a week or day view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayColumn {
    /// Day shown by the column.
    pub date: NaiveDate,
    /// Tags applying to the day.
    pub classification: Classification,
    /// One slot per hour of the window.
    pub slots: Vec<HourSlot>,
}

impl DayColumn {
    /// Slot of `hour`, `None` outside the window.
    pub fn slot(&self, hour: u32) -> Option<&HourSlot> {
        self.slots.iter().find(|slot| slot.hour == hour)
    }
}

/// Week or day view: one column per day, one slot per hour row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimeGrid {
    /// Hour rows shown.
    pub window: HourWindow,
    /// One column per day of the range.
    pub columns: Vec<DayColumn>,
}

/// A rendered calendar window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "granularity", rename_all = "snake_case")]
pub enum CalendarView {
    /// Monday-first month grid.
    Month(MonthGrid),
    /// Seven columns, Monday to Sunday.
    Week(TimeGrid),
    /// A single column.
    Day(TimeGrid),
}

impl CalendarView {
    /// Granularity the view was built for.
    pub const fn granularity(&self) -> Granularity {
        match self {
            Self::Month(_) => Granularity::Month,
            Self::Week(_) => Granularity::Week,
            Self::Day(_) => Granularity::Day,
        }
    }
}

/// Build the view for `pivot` at `granularity`.
pub fn build_view(
    pivot: NaiveDate,
    granularity: Granularity,
    events: &[CalendarEvent],
    schedule: &[ScheduleEvent],
    window: HourWindow,
) -> CalendarView {
    match granularity {
        Granularity::Month => CalendarView::Month(build_month(pivot, events, schedule)),
        Granularity::Week => {
            CalendarView::Week(build_time_grid(&range_for(pivot, granularity), events, schedule, window))
        }
        Granularity::Day => {
            CalendarView::Day(build_time_grid(&range_for(pivot, granularity), events, schedule, window))
        }
    }
}

/// Month grid containing `pivot`.
pub fn build_month(pivot: NaiveDate, events: &[CalendarEvent], schedule: &[ScheduleEvent]) -> MonthGrid {
    let month_start = first_of_month(pivot);
    let month_end = last_of_month(pivot);
    let range = DateRange::single(month_start);
    let range = DateRange::new(month_start, month_end).unwrap_or(range);
    let mut classes = classify_range(&range, events);

    let leading = month_start.weekday().num_days_from_monday() as usize;
    let mut cells: Vec<MonthCell> = std::iter::repeat_with(|| MonthCell::Blank).take(leading).collect();
    cells.extend(range.days().map(|date| {
        MonthCell::Day(DayCell {
            date,
            classification: classes.remove(&date).unwrap_or_default(),
            schedule: schedule.iter().filter(|event| event.starts_on(date)).cloned().collect(),
        })
    }));

    let rows = cells.len().div_ceil(DAYS_PER_WEEK).max(MONTH_GRID_MIN_ROWS);
    cells.resize(rows * DAYS_PER_WEEK, MonthCell::Blank);

    let rows = cells.chunks(DAYS_PER_WEEK).map(<[MonthCell]>::to_vec).collect();
    MonthGrid { month_start, rows }
}

/// Hour grid for every day of `range`.
pub fn build_time_grid(
    range: &DateRange,
    events: &[CalendarEvent],
    schedule: &[ScheduleEvent],
    window: HourWindow,
) -> TimeGrid {
    let mut classes = classify_range(range, events);
    let columns = range
        .days()
        .map(|date| {
            let mut slots: Vec<HourSlot> =
                window.hours().map(|hour| HourSlot { hour, schedule: Vec::new() }).collect();
            for event in schedule.iter().filter(|event| event.starts_on(date)) {
                let row = (window.clamp(event.event_beginning.hour()) - window.first()) as usize;
                if let Some(slot) = slots.get_mut(row) {
                    slot.schedule.push(event.clone());
                }
            }
            for slot in &mut slots {
                slot.schedule.sort_by_key(|event| event.event_beginning);
            }
            DayColumn { date, classification: classes.remove(&date).unwrap_or_default(), slots }
        })
        .collect();
    TimeGrid { window, columns }
}
