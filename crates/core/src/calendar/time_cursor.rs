//! Visible window navigation
//!
//! The cursor holds the navigation pivot and granularity and turns them into
//! the inclusive date range the loader queries. Weeks always start on Monday.

use chrono::{Datelike, Days, Local, Months, NaiveDate};
use cyclarc_domain::{DateRange, Granularity};

/// Source of "today" for the `today` navigation move.
pub trait Clock: Send + Sync {
    /// Current local date.
    fn today(&self) -> NaiveDate;
}

/// Local wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Clock pinned to one day.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

/// First day of the pivot's month.
pub fn first_of_month(pivot: NaiveDate) -> NaiveDate {
    pivot - Days::new(u64::from(pivot.day0()))
}

/// Last day of the pivot's month.
pub fn last_of_month(pivot: NaiveDate) -> NaiveDate {
    first_of_month(pivot)
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .unwrap_or(NaiveDate::MAX)
}

/// Monday of the week containing `pivot`.
pub fn monday_of(pivot: NaiveDate) -> NaiveDate {
    pivot - Days::new(u64::from(pivot.weekday().num_days_from_monday()))
}

/// Inclusive range covered by `granularity` around `pivot`.
pub fn range_for(pivot: NaiveDate, granularity: Granularity) -> DateRange {
    let (start, end) = match granularity {
        Granularity::Month => (first_of_month(pivot), last_of_month(pivot)),
        Granularity::Week => {
            let monday = monday_of(pivot);
            (monday, monday.checked_add_days(Days::new(6)).unwrap_or(NaiveDate::MAX))
        }
        Granularity::Day => (pivot, pivot),
    };
    DateRange::new(start, end).unwrap_or_else(|_| DateRange::single(pivot))
}

/// Navigation pivot plus granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeCursor {
    pivot: NaiveDate,
    granularity: Granularity,
}

impl TimeCursor {
    /// A cursor at `pivot` showing `granularity`.
    pub const fn new(pivot: NaiveDate, granularity: Granularity) -> Self {
        Self { pivot, granularity }
    }

    /// Anchor date of the window.
    pub const fn pivot(&self) -> NaiveDate {
        self.pivot
    }

    /// Current window size.
    pub const fn granularity(&self) -> Granularity {
        self.granularity
    }

    /// Window of days currently shown.
    pub fn range(&self) -> DateRange {
        range_for(self.pivot, self.granularity)
    }

    /// Move one window back.
    pub fn previous(&mut self) {
        self.pivot = self.step(false);
    }

    /// Move one window forward.
    pub fn next(&mut self) {
        self.pivot = self.step(true);
    }

    /// Jump to the clock's date.
    pub fn today(&mut self, clock: &dyn Clock) {
        self.pivot = clock.today();
    }

    /// Jump to `pivot`, keeping the granularity.
    pub fn go_to(&mut self, pivot: NaiveDate) {
        self.pivot = pivot;
    }

    /// Change the window size around the same pivot.
    pub fn set_granularity(&mut self, granularity: Granularity) {
        self.granularity = granularity;
    }

    fn step(&self, forward: bool) -> NaiveDate {
        let moved = match (self.granularity, forward) {
            (Granularity::Month, true) => self.pivot.checked_add_months(Months::new(1)),
            (Granularity::Month, false) => self.pivot.checked_sub_months(Months::new(1)),
            (Granularity::Week, true) => self.pivot.checked_add_days(Days::new(7)),
            (Granularity::Week, false) => self.pivot.checked_sub_days(Days::new(7)),
            (Granularity::Day, true) => self.pivot.succ_opt(),
            (Granularity::Day, false) => self.pivot.pred_opt(),
        };
        moved.unwrap_or(self.pivot)
    }
}
