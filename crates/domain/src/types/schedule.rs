//! Generic agenda events
//!
//! Schedule events are independent of the cycle model and keep their
//! time-of-day.

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::utils::dates::{opt_wall_clock, wall_clock};

/// Server identity of a schedule event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScheduleEventId(pub i64);

impl fmt::Display for ScheduleEventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Palette token id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColorId(pub i64);

/// A personal appointment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleEvent {
    /// Store identity.
    pub id: ScheduleEventId,
    /// Short title shown in the grid.
    pub heading: String,
    /// Free-form note.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Local start time.
    #[serde(with = "wall_clock")]
    pub event_beginning: NaiveDateTime,
    /// Local end time, if any.
    #[serde(default, with = "opt_wall_clock", skip_serializing_if = "Option::is_none")]
    pub event_ending: Option<NaiveDateTime>,
    /// When to remind the user.
    #[serde(default, with = "opt_wall_clock", skip_serializing_if = "Option::is_none")]
    pub reminder: Option<NaiveDateTime>,
    /// Palette colour.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<ColorId>,
}

impl ScheduleEvent {
    /// Whether the event starts on `date`.
    pub fn starts_on(&self, date: NaiveDate) -> bool {
        self.event_beginning.date() == date
    }

    /// Editable copy of this event.
    pub fn to_draft(&self) -> ScheduleEventDraft {
        ScheduleEventDraft {
            heading: self.heading.clone(),
            message: self.message.clone(),
            event_beginning: Some(self.event_beginning),
            event_ending: self.event_ending,
            reminder: self.reminder,
            color: self.color,
        }
    }
}

/// Body of schedule event create/update requests.
///
/// `event_beginning` is optional while the user is still editing; the
/// dialog refuses to submit a draft without it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleEventDraft {
    /// Title, at most [`HEADING_MAX_LENGTH`](crate::constants::HEADING_MAX_LENGTH) characters.
    pub heading: String,
    /// Free-form note.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Required before submitting.
    #[serde(default, with = "opt_wall_clock")]
    pub event_beginning: Option<NaiveDateTime>,
    /// Must not precede `event_beginning`.
    #[serde(default, with = "opt_wall_clock", skip_serializing_if = "Option::is_none")]
    pub event_ending: Option<NaiveDateTime>,
    /// Optional reminder time.
    #[serde(default, with = "opt_wall_clock", skip_serializing_if = "Option::is_none")]
    pub reminder: Option<NaiveDateTime>,
    /// Palette colour.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<ColorId>,
}

/// Entry of the agenda colour palette.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleColor {
    /// Palette identity.
    pub id: ColorId,
    /// Display name.
    pub name: String,
    /// `#rrggbb` value, when the server provides one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hex: Option<String>,
}
