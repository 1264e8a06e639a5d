//! Menstrual period invariants
//!
//! At most one open period may exist. These checks run before the start and
//! end requests are issued; the store enforces the same rules again.

use chrono::NaiveDate;
use cyclarc_domain::{CalendarEvent, ConcreteEvent, CyclarcError, EventTypeId, PeriodStatus, Result};

fn concrete_menses(events: &[CalendarEvent]) -> impl Iterator<Item = &ConcreteEvent> {
    events
        .iter()
        .filter_map(CalendarEvent::as_concrete)
        .filter(|event| event.data.type_id == EventTypeId::Menses)
}

/// The open period among `events`, if loaded.
pub fn open_period(events: &[CalendarEvent]) -> Option<&ConcreteEvent> {
    concrete_menses(events).find(|event| event.data.is_open())
}

/// Whether a period may start on `date`.
///
/// False inside any recorded period and on every date while one is open.
/// Calculated Menses records are predictions and never block.
pub fn can_start_period(date: NaiveDate, events: &[CalendarEvent]) -> bool {
    !concrete_menses(events).any(|event| event.data.is_open() || event.data.applies_to(date))
}

/// Whether the open period may be closed.
pub const fn can_end_period(status: &PeriodStatus) -> bool {
    status.has_open_period
}

/// [`can_start_period`] plus the store's open-period flag.
pub fn ensure_can_start_period(
    date: NaiveDate,
    events: &[CalendarEvent],
    status: &PeriodStatus,
) -> Result<()> {
    if status.has_open_period || open_period(events).is_some() {
        return Err(CyclarcError::Conflict(
            "a period is already in progress; end it before starting a new one".into(),
        ));
    }
    if !can_start_period(date, events) {
        return Err(CyclarcError::Conflict(format!("{date} is already part of a recorded period")));
    }
    Ok(())
}

/// Check that the open period can be closed on `date`.
pub fn ensure_can_end_period(
    date: NaiveDate,
    events: &[CalendarEvent],
    status: &PeriodStatus,
) -> Result<()> {
    if !can_end_period(status) {
        return Err(CyclarcError::Conflict("there is no period in progress to end".into()));
    }
    if let Some(open) = open_period(events) {
        if date < open.data.beginning {
            return Err(CyclarcError::validation(
                "date",
                format!("end date {date} is before the period start {}", open.data.beginning),
            ));
        }
    }
    Ok(())
}
