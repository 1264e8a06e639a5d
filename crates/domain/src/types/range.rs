//! Visible window types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::errors::{CyclarcError, Result};
use crate::impl_label_conversions;
use crate::utils::dates::calendar_date;

/// Size of the visible calendar window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Granularity {
    /// Five or six full weeks around the pivot's month.
    #[default]
    Month,
    /// Monday to Sunday.
    Week,
    /// The pivot day only.
    Day,
}

impl_label_conversions!(Granularity {
    Month => "month",
    Week => "week",
    Day => "day",
});

/// Inclusive range of calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    #[serde(with = "calendar_date")]
    start: NaiveDate,
    #[serde(with = "calendar_date")]
    end: NaiveDate,
}

impl DateRange {
    /// Range from `start` to `end`, rejecting reversed bounds.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(CyclarcError::InvalidInput(format!(
                "range start {start} is after range end {end}"
            )));
        }
        Ok(Self { start, end })
    }

    /// A one-day range.
    pub const fn single(day: NaiveDate) -> Self {
        Self { start: day, end: day }
    }

    /// First day.
    pub const fn start(&self) -> NaiveDate {
        self.start
    }

    /// Last day, inclusive.
    pub const fn end(&self) -> NaiveDate {
        self.end
    }

    /// Whether `date` falls inside the range.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Number of days in the range (at least 1).
    pub fn len_days(&self) -> usize {
        usize::try_from((self.end - self.start).num_days() + 1).unwrap_or(1)
    }

    /// Every day of the range in ascending order.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let end = self.end;
        self.start.iter_days().take_while(move |day| *day <= end)
    }
}
