//! Agenda event dialog
//!
//! `Closed -> Event(create on date | edit event) -> Closed`. Navigation does
//! not touch this state.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use cyclarc_domain::constants::HEADING_MAX_LENGTH;
use cyclarc_domain::{
    CyclarcError, Result, ScheduleColor, ScheduleEvent, ScheduleEventDraft, ScheduleEventId,
};

/// Whether the dialog creates or edits an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventDialogMode {
    /// New event on a chosen day.
    Create {
        /// Day picked in the grid.
        date: NaiveDate,
    },
    /// Changes to a stored event.
    Edit {
        /// The event as last loaded.
        event: ScheduleEvent,
    },
}

/// Open create or edit dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventDialog {
    /// Create or edit.
    pub mode: EventDialogMode,
    /// Form contents.
    pub draft: ScheduleEventDraft,
    /// Validation error shown in the form.
    pub field_error: Option<CyclarcError>,
    /// Set once delete was pressed, until confirmed or cancelled.
    pub pending_delete: bool,
}

impl EventDialog {
    /// Stored event being edited, `None` when creating.
    pub const fn editing(&self) -> Option<&ScheduleEvent> {
        match &self.mode {
            EventDialogMode::Edit { event } => Some(event),
            EventDialogMode::Create { .. } => None,
        }
    }
}

/// Dialog state of the agenda.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AgendaDialog {
    /// No dialog shown.
    #[default]
    Closed,
    /// The create or edit form.
    Event(EventDialog),
}

impl AgendaDialog {
    /// Whether the form is shown.
    pub const fn is_open(&self) -> bool {
        matches!(self, Self::Event(_))
    }

    /// The open form.
    pub const fn event(&self) -> Option<&EventDialog> {
        match self {
            Self::Event(dialog) => Some(dialog),
            Self::Closed => None,
        }
    }

    /// The open form, or an error when closed.
    pub fn event_mut(&mut self) -> Result<&mut EventDialog> {
        match self {
            Self::Event(dialog) => Ok(dialog),
            Self::Closed => Err(CyclarcError::InvalidInput("no event dialog is open".into())),
        }
    }

    /// New event on `date`, starting at `start_hour`.
    pub fn open_create(&mut self, date: NaiveDate, start_hour: u32) {
        let start = NaiveTime::from_hms_opt(start_hour, 0, 0).unwrap_or(NaiveTime::MIN);
        let draft = ScheduleEventDraft {
            event_beginning: Some(date.and_time(start)),
            ..ScheduleEventDraft::default()
        };
        *self = Self::Event(EventDialog {
            mode: EventDialogMode::Create { date },
            draft,
            field_error: None,
            pending_delete: false,
        });
    }

    /// Edit form prefilled from `event`.
    pub fn open_edit(&mut self, event: ScheduleEvent) {
        let draft = event.to_draft();
        *self = Self::Event(EventDialog {
            mode: EventDialogMode::Edit { event },
            draft,
            field_error: None,
            pending_delete: false,
        });
    }

    /// Close the form, dropping unsaved edits.
    pub fn close(&mut self) {
        *self = Self::Closed;
    }

    /// Edit the draft in place; clears the field error.
    pub fn update_draft(&mut self, edit: impl FnOnce(&mut ScheduleEventDraft)) -> Result<()> {
        let dialog = self.event_mut()?;
        edit(&mut dialog.draft);
        dialog.field_error = None;
        Ok(())
    }

    /// Ask for confirmation before deleting the edited event.
    pub fn request_delete(&mut self) -> Result<()> {
        let dialog = self.event_mut()?;
        if dialog.editing().is_none() {
            return Err(CyclarcError::InvalidInput("an unsaved event cannot be deleted".into()));
        }
        dialog.pending_delete = true;
        Ok(())
    }

    /// Drop a pending delete request.
    pub fn cancel_delete(&mut self) {
        if let Self::Event(dialog) = self {
            dialog.pending_delete = false;
        }
    }

    /// Take the confirmed delete request.
    pub fn confirm_delete(&mut self) -> Result<ScheduleEventId> {
        let dialog = self.event_mut()?;
        let id = match (&dialog.mode, dialog.pending_delete) {
            (EventDialogMode::Edit { event }, true) => event.id,
            _ => {
                return Err(CyclarcError::InvalidInput("no delete is awaiting confirmation".into()))
            }
        };
        dialog.pending_delete = false;
        Ok(id)
    }

    /// Show `error` in the form, if it is open.
    pub fn set_field_error(&mut self, error: CyclarcError) {
        if let Self::Event(dialog) = self {
            dialog.field_error = Some(error);
        }
    }
}

/// Validate `draft` and return the body to submit.
///
/// The colour is only checked when the palette is known.
pub fn prepare_draft(
    draft: &ScheduleEventDraft,
    palette: Option<&[ScheduleColor]>,
) -> Result<ScheduleEventDraft> {
    let heading = draft.heading.trim();
    if heading.is_empty() {
        return Err(CyclarcError::validation("heading", "a heading is required"));
    }
    if heading.chars().count() > HEADING_MAX_LENGTH {
        return Err(CyclarcError::validation(
            "heading",
            format!("must be at most {HEADING_MAX_LENGTH} characters"),
        ));
    }

    let beginning: NaiveDateTime = draft
        .event_beginning
        .ok_or_else(|| CyclarcError::validation("eventBeginning", "a start date is required"))?;
    if draft.event_ending.is_some_and(|ending| ending < beginning) {
        return Err(CyclarcError::validation("eventEnding", "the end is before the start"));
    }
    if draft.reminder.is_some_and(|reminder| reminder > beginning) {
        return Err(CyclarcError::validation("reminder", "the reminder is after the start"));
    }
    if let (Some(color), Some(palette)) = (draft.color, palette) {
        if !palette.iter().any(|entry| entry.id == color) {
            return Err(CyclarcError::validation("color", format!("unknown colour {}", color.0)));
        }
    }

    let message = draft.message.as_deref().map(str::trim).filter(|text| !text.is_empty());
    Ok(ScheduleEventDraft {
        heading: heading.to_string(),
        message: message.map(str::to_string),
        ..draft.clone()
    })
}
