//! Cycle tracker dialog state machine
//!
//! ```text
//! Closed -> Day(date) <-> Day + active input (weight | temperature)
//!              |  ^
//!              v  |
//!           Details(event type) -> Closed
//! ```
//!
//! Only one dialog exists at a time because the state is a single enum.
//! Deleting needs a pending request that is then confirmed.

use chrono::NaiveDate;
use cyclarc_domain::constants::{TEMPERATURE_MAX_C, TEMPERATURE_MIN_C, WEIGHT_MAX_KG, WEIGHT_MIN_KG};
use cyclarc_domain::{
    CalendarEvent, ConcreteEvent, CyclarcError, DetailType, EventId, EventTypeId, Result,
};

use super::details::DetailSelection;
use crate::calendar::classifier::{applicable_events, classify, Classification};

/// Single-value sub-input of the day dialog.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ActiveInput {
    /// No sub-input shown.
    #[default]
    None,
    /// Weight in kg.
    Weight,
    /// Temperature in °C.
    Temperature,
}

impl ActiveInput {
    /// Event type written by this input.
    pub const fn event_type(self) -> Option<EventTypeId> {
        match self {
            Self::None => None,
            Self::Weight => Some(EventTypeId::Weight),
            Self::Temperature => Some(EventTypeId::Temperature),
        }
    }

    const fn bounds(self) -> Option<(f64, f64)> {
        match self {
            Self::None => None,
            Self::Weight => Some((WEIGHT_MIN_KG, WEIGHT_MAX_KG)),
            Self::Temperature => Some((TEMPERATURE_MIN_C, TEMPERATURE_MAX_C)),
        }
    }

    /// Parse user text for this input, accepting a decimal comma.
    pub fn parse(self, text: &str) -> Result<f64> {
        let Some((min, max)) = self.bounds() else {
            return Err(CyclarcError::InvalidInput("no measurement input is active".into()));
        };
        let text = text.trim();
        if text.is_empty() {
            return Err(CyclarcError::validation("value", "a value is required"));
        }
        let value: f64 = text
            .replace(',', ".")
            .parse()
            .map_err(|_| CyclarcError::validation("value", format!("'{text}' is not a number")))?;
        if !value.is_finite() || value < min || value > max {
            return Err(CyclarcError::validation(
                "value",
                format!("must be between {min} and {max}, got {value}"),
            ));
        }
        Ok(value)
    }
}

/// Dialog of one selected day.
#[derive(Debug, Clone, PartialEq)]
pub struct DayDialog {
    /// Selected day.
    pub date: NaiveDate,
    /// Events applicable to `date`, calculated duplicates removed.
    pub events: Vec<CalendarEvent>,
    /// Classification of `date`.
    pub classification: Classification,
    /// Sub-input currently shown.
    pub active_input: ActiveInput,
    /// Raw text of the sub-input.
    pub input: String,
    /// Validation error shown next to the input.
    pub field_error: Option<CyclarcError>,
    /// Event awaiting delete confirmation.
    pub pending_delete: Option<EventId>,
}

impl DayDialog {
    fn new(date: NaiveDate, all_events: &[CalendarEvent]) -> Self {
        let mut dialog = Self {
            date,
            events: Vec::new(),
            classification: Classification::default(),
            active_input: ActiveInput::None,
            input: String::new(),
            field_error: None,
            pending_delete: None,
        };
        dialog.refresh(all_events);
        dialog
    }

    fn refresh(&mut self, all_events: &[CalendarEvent]) {
        self.events = applicable_events(self.date, all_events).into_iter().cloned().collect();
        self.classification = classify(self.date, all_events);
        if let Some(id) = self.pending_delete {
            if !self.events.iter().any(|event| event.id() == Some(id)) {
                self.pending_delete = None;
            }
        }
    }

    /// Concrete record of `type_id` on this day.
    pub fn concrete_of(&self, type_id: EventTypeId) -> Option<&ConcreteEvent> {
        self.events
            .iter()
            .filter_map(CalendarEvent::as_concrete)
            .find(|event| event.data.type_id == type_id)
    }

    /// Record of `type_id` on this day, concrete first.
    pub fn event_of(&self, type_id: EventTypeId) -> Option<&CalendarEvent> {
        self.events
            .iter()
            .filter(|event| event.type_id() == type_id)
            .min_by_key(|event| event.is_calculated())
    }

    /// Hide the sub-input and drop its text.
    pub fn clear_input(&mut self) {
        self.active_input = ActiveInput::None;
        self.input.clear();
        self.field_error = None;
    }

    /// Validated value of the active input.
    pub fn parsed_input(&self) -> Result<(EventTypeId, f64)> {
        let type_id = self
            .active_input
            .event_type()
            .ok_or_else(|| CyclarcError::InvalidInput("no measurement input is active".into()))?;
        Ok((type_id, self.active_input.parse(&self.input)?))
    }
}

/// Detail editor for a Symptoms, Drugs or Moods event.
#[derive(Debug, Clone, PartialEq)]
pub struct DetailsDialog {
    /// Day the event is recorded on.
    pub date: NaiveDate,
    /// Symptoms, Drugs or Moods.
    pub event_type: EventTypeId,
    /// Record being edited; a calculated one is overridden on save.
    pub existing: Option<CalendarEvent>,
    /// Detail types available for `event_type`.
    pub catalog: Vec<DetailType>,
    /// Working selection, saved as a whole.
    pub selection: DetailSelection,
    /// Event awaiting delete confirmation.
    pub pending_delete: Option<EventId>,
}

/// Dialog state of the cycle tracker.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum CycleDialog {
    /// No day selected.
    #[default]
    Closed,
    /// A day with its events and sub-inputs.
    Day(DayDialog),
    /// The detail editor opened from a day.
    Details(DetailsDialog),
}

fn not_open(what: &str) -> CyclarcError {
    CyclarcError::InvalidInput(format!("no {what} dialog is open"))
}

impl CycleDialog {
    /// Whether a day or details dialog is shown.
    pub const fn is_open(&self) -> bool {
        !matches!(self, Self::Closed)
    }

    /// Day of the open dialog.
    pub const fn date(&self) -> Option<NaiveDate> {
        match self {
            Self::Closed => None,
            Self::Day(day) => Some(day.date),
            Self::Details(details) => Some(details.date),
        }
    }

    /// The day dialog, if it is the one open.
    pub const fn day(&self) -> Option<&DayDialog> {
        match self {
            Self::Day(day) => Some(day),
            _ => None,
        }
    }

    /// The day dialog, or an error when another dialog is open.
    pub fn day_mut(&mut self) -> Result<&mut DayDialog> {
        match self {
            Self::Day(day) => Ok(day),
            _ => Err(not_open("day")),
        }
    }

    /// The details dialog, if it is the one open.
    pub const fn details(&self) -> Option<&DetailsDialog> {
        match self {
            Self::Details(details) => Some(details),
            _ => None,
        }
    }

    /// The details dialog, or an error when another dialog is open.
    pub fn details_mut(&mut self) -> Result<&mut DetailsDialog> {
        match self {
            Self::Details(details) => Ok(details),
            _ => Err(not_open("details")),
        }
    }

    /// Select a day from the grid; replaces whatever was open.
    pub fn open_day(&mut self, date: NaiveDate, events: &[CalendarEvent]) {
        *self = Self::Day(DayDialog::new(date, events));
    }

    /// Show the weight or temperature input, prefilled with the stored value.
    pub fn open_input(&mut self, input: ActiveInput) -> Result<()> {
        let day = self.day_mut()?;
        let stored = input
            .event_type()
            .and_then(|type_id| day.concrete_of(type_id))
            .and_then(|event| event.data.value);
        day.active_input = input;
        day.input = stored.map(|value| value.to_string()).unwrap_or_default();
        day.field_error = None;
        Ok(())
    }

    /// Replace the sub-input text and clear its error.
    pub fn set_input(&mut self, text: &str) -> Result<()> {
        let day = self.day_mut()?;
        day.input = text.to_string();
        day.field_error = None;
        Ok(())
    }

    /// Hide the sub-input without saving.
    pub fn cancel_input(&mut self) -> Result<()> {
        self.day_mut()?.clear_input();
        Ok(())
    }

    /// Leave the day dialog for the details of `event_type`.
    pub fn open_details(&mut self, event_type: EventTypeId, catalog: Vec<DetailType>) -> Result<()> {
        let Some(mode) = event_type.detail_mode() else {
            return Err(CyclarcError::InvalidInput(format!("{event_type} events have no details")));
        };
        let day = self.day_mut()?;
        let date = day.date;
        let existing = day.event_of(event_type).cloned();
        let selection = existing.as_ref().map_or_else(
            || DetailSelection::new(mode),
            |event| DetailSelection::from_details(mode, &event.data().details),
        );
        *self = Self::Details(DetailsDialog {
            date,
            event_type,
            existing,
            catalog,
            selection,
            pending_delete: None,
        });
        Ok(())
    }

    /// Return from the details dialog to the day it was opened from.
    pub fn close_details(&mut self, events: &[CalendarEvent]) -> Result<()> {
        let date = self.details_mut()?.date;
        self.open_day(date, events);
        Ok(())
    }

    /// Close any dialog.
    pub fn close(&mut self) {
        *self = Self::Closed;
    }

    /// Recompute the open dialog from a freshly loaded event list.
    pub fn refresh(&mut self, events: &[CalendarEvent]) {
        match self {
            Self::Closed => {}
            Self::Day(day) => day.refresh(events),
            Self::Details(details) => {
                let date = details.date;
                let event_type = details.event_type;
                details.existing = applicable_events(date, events)
                    .into_iter()
                    .filter(|event| event.type_id() == event_type)
                    .min_by_key(|event| event.is_calculated())
                    .cloned();
            }
        }
    }

    /// Record a delete request; nothing is sent until it is confirmed.
    pub fn request_delete(&mut self, id: EventId) -> Result<()> {
        match self {
            Self::Closed => Err(not_open("day")),
            Self::Day(day) => {
                let deletable = day
                    .events
                    .iter()
                    .filter_map(CalendarEvent::as_concrete)
                    .any(|event| event.id == Some(id));
                if !deletable {
                    return Err(CyclarcError::InvalidInput(format!(
                        "event {id} is not a saved entry of {}",
                        day.date
                    )));
                }
                day.pending_delete = Some(id);
                Ok(())
            }
            Self::Details(details) => {
                let deletable = details
                    .existing
                    .as_ref()
                    .and_then(CalendarEvent::as_concrete)
                    .is_some_and(|event| event.id == Some(id));
                if !deletable {
                    return Err(CyclarcError::InvalidInput(format!(
                        "event {id} is not the saved {} entry",
                        details.event_type
                    )));
                }
                details.pending_delete = Some(id);
                Ok(())
            }
        }
    }

    /// Drop a delete request without sending it.
    pub fn cancel_delete(&mut self) {
        match self {
            Self::Closed => {}
            Self::Day(day) => day.pending_delete = None,
            Self::Details(details) => details.pending_delete = None,
        }
    }

    /// Event awaiting delete confirmation, if any.
    pub const fn pending_delete(&self) -> Option<EventId> {
        match self {
            Self::Closed => None,
            Self::Day(day) => day.pending_delete,
            Self::Details(details) => details.pending_delete,
        }
    }

    /// Take the confirmed delete request.
    pub fn confirm_delete(&mut self) -> Result<EventId> {
        let pending = match self {
            Self::Closed => None,
            Self::Day(day) => day.pending_delete.take(),
            Self::Details(details) => details.pending_delete.take(),
        };
        pending.ok_or_else(|| CyclarcError::InvalidInput("no delete is awaiting confirmation".into()))
    }

    /// Show a validation error next to the day dialog's input.
    pub fn set_field_error(&mut self, error: CyclarcError) {
        if let Self::Day(day) = self {
            day.field_error = Some(error);
        }
    }
}
