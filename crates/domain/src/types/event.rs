//! Cycle tracker events
//!
//! A cycle event is a typed fact over an inclusive range of calendar days.
//! Records the server derived on its own (`calculated: true` on the wire) are
//! kept apart from user-entered ones at the type level: only a
//! [`ConcreteEvent`] can be updated or deleted, a [`DerivedEvent`] can only be
//! overridden by creating a new concrete record.

use std::fmt;

use chrono::NaiveDate;
use serde::de::IgnoredAny;
use serde::{Deserialize, Serialize};

use crate::constants::{INTENSITY_MAX, INTENSITY_MIN};
use crate::errors::{CyclarcError, Result};
use crate::impl_label_conversions;
use crate::utils::dates::{calendar_date, opt_calendar_date};

/// Server identity of a cycle event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(pub i64);

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Closed set of cycle event types.
///
/// On the wire each type is a small integer, see [`EventTypeId::wire_id`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum EventTypeId {
    /// Period days.
    Menses,
    /// Basal body temperature in °C.
    Temperature,
    /// Body weight in kg.
    Weight,
    /// Symptoms with an intensity per detail.
    Symptoms,
    /// Medication taken, present or absent per detail.
    Drugs,
    /// Moods with an intensity per detail.
    Moods,
    /// Ovulation day.
    Ovulation,
    /// Fertile window.
    Fertility,
    /// Expected next period, derived by the server.
    MensesExpectation,
    /// Pregnancy, optionally with a trimester.
    Pregnancy,
}

impl_label_conversions!(EventTypeId {
    Menses => "menses",
    Temperature => "temperature",
    Weight => "weight",
    Symptoms => "symptoms",
    Drugs => "drugs",
    Moods => "moods",
    Ovulation => "ovulation",
    Fertility => "fertility",
    MensesExpectation => "menses_expectation",
    Pregnancy => "pregnancy",
});

/// How details of an event type are recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailMode {
    /// Each detail carries an intensity from 1 to 3 (Symptoms, Moods).
    Intensity,
    /// Each detail is either present or absent (Drugs).
    Presence,
}

impl EventTypeId {
    /// Numeric id used by the event store.
    pub const fn wire_id(self) -> u8 {
        match self {
            Self::Menses => 1,
            Self::Temperature => 2,
            Self::Weight => 3,
            Self::Symptoms => 4,
            Self::Drugs => 5,
            Self::Moods => 6,
            Self::Ovulation => 7,
            Self::Fertility => 8,
            Self::MensesExpectation => 9,
            Self::Pregnancy => 10,
        }
    }

    /// Inverse of [`EventTypeId::wire_id`].
    pub fn from_wire_id(id: u8) -> Option<Self> {
        Self::ALL.iter().copied().find(|candidate| candidate.wire_id() == id)
    }

    /// Detail recording mode, `None` for types without details.
    pub const fn detail_mode(self) -> Option<DetailMode> {
        match self {
            Self::Symptoms | Self::Moods => Some(DetailMode::Intensity),
            Self::Drugs => Some(DetailMode::Presence),
            _ => None,
        }
    }

    /// Weight and Temperature hold one numeric value per day.
    pub const fn is_single_value(self) -> bool {
        matches!(self, Self::Weight | Self::Temperature)
    }
}

impl From<EventTypeId> for u8 {
    fn from(value: EventTypeId) -> Self {
        value.wire_id()
    }
}

impl TryFrom<u8> for EventTypeId {
    type Error = String;

    fn try_from(value: u8) -> std::result::Result<Self, Self::Error> {
        Self::from_wire_id(value).ok_or_else(|| format!("unknown event type id {value}"))
    }
}

/// Pregnancy trimester.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Trimester {
    /// Weeks 1 to 13.
    First,
    /// Weeks 14 to 27.
    Second,
    /// Week 28 onwards.
    Third,
}

impl From<Trimester> for u8 {
    fn from(value: Trimester) -> Self {
        match value {
            Trimester::First => 1,
            Trimester::Second => 2,
            Trimester::Third => 3,
        }
    }
}

impl TryFrom<u8> for Trimester {
    type Error = String;

    fn try_from(value: u8) -> std::result::Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::First),
            2 => Ok(Self::Second),
            3 => Ok(Self::Third),
            other => Err(format!("trimester must be 1, 2 or 3, got {other}")),
        }
    }
}

/// Identity of an entry in the detail-type catalogue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DetailTypeId(pub i64);

impl fmt::Display for DetailTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Intensity of a symptom or mood, always within 1..=3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Intensity(u8);

impl Intensity {
    /// Validate a raw level.
    pub fn new(level: u8) -> Result<Self> {
        if (INTENSITY_MIN..=INTENSITY_MAX).contains(&level) {
            Ok(Self(level))
        } else {
            Err(CyclarcError::validation(
                "intensity",
                format!("must be between {INTENSITY_MIN} and {INTENSITY_MAX}, got {level}"),
            ))
        }
    }

    /// Raw level, 1 to 3.
    pub const fn level(self) -> u8 {
        self.0
    }
}

impl From<Intensity> for u8 {
    fn from(value: Intensity) -> Self {
        value.0
    }
}

impl TryFrom<u8> for Intensity {
    type Error = CyclarcError;

    fn try_from(value: u8) -> Result<Self> {
        Self::new(value)
    }
}

/// One selected detail of a Symptoms, Drugs or Moods event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "EventDetailRecord")]
pub struct EventDetail {
    /// Catalogue entry this detail refers to.
    pub detail_type_id: DetailTypeId,
    /// Intensity for Symptoms/Moods; absent for Drugs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Intensity>,
    /// Whether the detail is checked for the day.
    pub selected: bool,
}

/// Detail value as stored: a level for Symptoms/Moods, a flag or 0/1 for Drugs.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawDetailValue {
    Flag(bool),
    Level(i64),
    Other(IgnoredAny),
}

/// Lenient wire shape of [`EventDetail`]; a malformed value never fails the
/// surrounding event list.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EventDetailRecord {
    detail_type_id: DetailTypeId,
    #[serde(default)]
    value: Option<RawDetailValue>,
    #[serde(default)]
    selected: Option<bool>,
}

impl From<EventDetailRecord> for EventDetail {
    fn from(record: EventDetailRecord) -> Self {
        let (value, flagged) = match record.value {
            None | Some(RawDetailValue::Other(_)) => (None, true),
            Some(RawDetailValue::Flag(flag)) => (None, flag),
            Some(RawDetailValue::Level(level)) => {
                let intensity = u8::try_from(level).ok().and_then(|level| Intensity::new(level).ok());
                (intensity, level > 0)
            }
        };
        Self {
            detail_type_id: record.detail_type_id,
            value,
            selected: record.selected.unwrap_or(flagged),
        }
    }
}

/// Keep intensities only where the event type records them.
fn normalize_details(type_id: EventTypeId, mut details: Vec<EventDetail>) -> Vec<EventDetail> {
    if type_id.detail_mode() != Some(DetailMode::Intensity) {
        for detail in &mut details {
            detail.value = None;
        }
    }
    details
}

impl EventDetail {
    /// A selected detail with an intensity.
    pub const fn with_intensity(detail_type_id: DetailTypeId, intensity: Intensity) -> Self {
        Self { detail_type_id, value: Some(intensity), selected: true }
    }

    /// A selected presence-only detail.
    pub const fn present(detail_type_id: DetailTypeId) -> Self {
        Self { detail_type_id, value: None, selected: true }
    }
}

/// Payload shared by concrete and derived events.
#[derive(Debug, Clone, PartialEq)]
pub struct EventData {
    /// Event type.
    pub type_id: EventTypeId,
    /// First day, inclusive.
    pub beginning: NaiveDate,
    /// `None` means open-ended; only meaningful for Menses.
    pub ending: Option<NaiveDate>,
    /// Weight or temperature reading.
    pub value: Option<f64>,
    /// Selected details, empty unless the type has a [`DetailMode`].
    pub details: Vec<EventDetail>,
    /// Set for Pregnancy only.
    pub trimester: Option<Trimester>,
}

impl EventData {
    /// An open event of `type_id` starting on `beginning`, without value or details.
    pub const fn new(type_id: EventTypeId, beginning: NaiveDate) -> Self {
        Self { type_id, beginning, ending: None, value: None, details: Vec::new(), trimester: None }
    }

    /// Last day the event applies to (`ending ?? beginning`).
    pub fn last_day(&self) -> NaiveDate {
        self.ending.unwrap_or(self.beginning)
    }

    /// Whether the event applies to `date`, compared by calendar day.
    pub fn applies_to(&self, date: NaiveDate) -> bool {
        self.beginning <= date && date <= self.last_day()
    }

    /// True while no ending has been recorded.
    pub fn is_open(&self) -> bool {
        self.ending.is_none()
    }
}

/// A user-entered, authoritative event. The only kind that accepts mutation.
#[derive(Debug, Clone, PartialEq)]
pub struct ConcreteEvent {
    /// Store identity, `None` before the first save.
    pub id: Option<EventId>,
    /// Event payload.
    pub data: EventData,
}

impl ConcreteEvent {
    /// Identity required to update or delete this event.
    pub fn require_id(&self) -> Result<EventId> {
        self.id.ok_or_else(|| {
            CyclarcError::InvalidInput(format!(
                "{} event on {} has not been saved yet",
                self.data.type_id, self.data.beginning
            ))
        })
    }
}

/// A server-derived event (predicted ovulation, fertility window, ...).
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedEvent {
    /// Store identity, usually absent for derived records.
    pub id: Option<EventId>,
    /// Event payload.
    pub data: EventData,
}

impl DerivedEvent {
    /// Build the concrete record that overrides this derived one.
    pub fn to_override(&self) -> NewCalendarEvent {
        NewCalendarEvent {
            type_id: self.data.type_id,
            beginning: self.data.beginning,
            ending: self.data.ending,
            value: self.data.value,
            details: self.data.details.clone(),
        }
    }
}

/// A cycle event as seen by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "CalendarEventRecord", into = "CalendarEventRecord")]
pub enum CalendarEvent {
    /// Entered by the user.
    Concrete(ConcreteEvent),
    /// Predicted by the server.
    Derived(DerivedEvent),
}

impl CalendarEvent {
    /// A saved user event.
    pub const fn concrete(id: EventId, data: EventData) -> Self {
        Self::Concrete(ConcreteEvent { id: Some(id), data })
    }

    /// A server prediction without identity.
    pub const fn derived(data: EventData) -> Self {
        Self::Derived(DerivedEvent { id: None, data })
    }

    /// Store identity, if any.
    pub const fn id(&self) -> Option<EventId> {
        match self {
            Self::Concrete(event) => event.id,
            Self::Derived(event) => event.id,
        }
    }

    /// Shared payload of either variant.
    pub const fn data(&self) -> &EventData {
        match self {
            Self::Concrete(event) => &event.data,
            Self::Derived(event) => &event.data,
        }
    }

    /// Event type, shorthand for `data().type_id`.
    pub const fn type_id(&self) -> EventTypeId {
        self.data().type_id
    }

    /// Whether the server derived this event.
    pub const fn is_calculated(&self) -> bool {
        matches!(self, Self::Derived(_))
    }

    /// The concrete event, `None` for derived ones.
    pub const fn as_concrete(&self) -> Option<&ConcreteEvent> {
        match self {
            Self::Concrete(event) => Some(event),
            Self::Derived(_) => None,
        }
    }

    /// See [`EventData::applies_to`].
    pub fn applies_to(&self, date: NaiveDate) -> bool {
        self.data().applies_to(date)
    }
}

/// Wire shape of a cycle event as returned by the event store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEventRecord {
    /// Store identity, absent for some derived records.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<EventId>,
    /// Numeric event type.
    pub type_id: EventTypeId,
    /// First day as `YYYY-MM-DD` or a timestamp.
    #[serde(with = "calendar_date")]
    pub beginning: NaiveDate,
    /// `null` or absent for an open period.
    #[serde(default, with = "opt_calendar_date")]
    pub ending: Option<NaiveDate>,
    /// Weight or temperature reading.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    /// Selected details.
    #[serde(default)]
    pub details: Vec<EventDetail>,
    /// Set by the server on derived records.
    #[serde(default)]
    pub calculated: bool,
    /// Pregnancy trimester, 1 to 3.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trimester: Option<Trimester>,
}

impl From<CalendarEventRecord> for CalendarEvent {
    fn from(record: CalendarEventRecord) -> Self {
        let data = EventData {
            type_id: record.type_id,
            beginning: record.beginning,
            ending: record.ending,
            value: record.value,
            details: normalize_details(record.type_id, record.details),
            trimester: record.trimester,
        };
        if record.calculated {
            Self::Derived(DerivedEvent { id: record.id, data })
        } else {
            Self::Concrete(ConcreteEvent { id: record.id, data })
        }
    }
}

impl From<CalendarEvent> for CalendarEventRecord {
    fn from(event: CalendarEvent) -> Self {
        let calculated = event.is_calculated();
        let (id, data) = match event {
            CalendarEvent::Concrete(event) => (event.id, event.data),
            CalendarEvent::Derived(event) => (event.id, event.data),
        };
        Self {
            id,
            type_id: data.type_id,
            beginning: data.beginning,
            ending: data.ending,
            value: data.value,
            details: data.details,
            calculated,
            trimester: data.trimester,
        }
    }
}

/// Body of `POST /calendar/events`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCalendarEvent {
    /// Event type to create.
    pub type_id: EventTypeId,
    /// First day.
    #[serde(with = "calendar_date")]
    pub beginning: NaiveDate,
    /// Last day, omitted for open events.
    #[serde(default, with = "opt_calendar_date", skip_serializing_if = "Option::is_none")]
    pub ending: Option<NaiveDate>,
    /// Weight or temperature reading.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    /// Initial details.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<EventDetail>,
}

impl NewCalendarEvent {
    /// A bare event of `type_id` on one day.
    pub const fn on(type_id: EventTypeId, beginning: NaiveDate) -> Self {
        Self { type_id, beginning, ending: None, value: None, details: Vec::new() }
    }
}

/// Body of `PUT /calendar/events/{id}`; only present fields are changed.
///
/// `details`, when present, replaces the complete detail list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventPatch {
    /// New last day.
    #[serde(default, with = "opt_calendar_date", skip_serializing_if = "Option::is_none")]
    pub ending: Option<NaiveDate>,
    /// New reading.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    /// Replacement detail list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<EventDetail>>,
}

/// Response of `GET /calendar/last-menses`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodStatus {
    /// Whether a Menses event without ending exists.
    pub has_open_period: bool,
    /// Identity of that open period.
    #[serde(default)]
    pub open_period_id: Option<EventId>,
}

/// Entry of the detail-type catalogue for Symptoms, Drugs or Moods.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailType {
    /// Catalogue identity.
    pub id: DetailTypeId,
    /// Display name.
    pub name: String,
    /// Event type the detail belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_type_id: Option<EventTypeId>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn calculated_flag_selects_the_variant() {
        let concrete: CalendarEvent = serde_json::from_value(json!({
            "id": 4, "typeId": 1, "beginning": "2024-03-01", "ending": null
        }))
        .unwrap();
        assert!(matches!(concrete, CalendarEvent::Concrete(_)));
        assert!(concrete.data().is_open());

        let derived: CalendarEvent = serde_json::from_value(json!({
            "typeId": 7, "beginning": "2024-03-14T00:00:00", "calculated": true
        }))
        .unwrap();
        assert!(derived.is_calculated());
        assert_eq!(derived.type_id(), EventTypeId::Ovulation);
        assert_eq!(derived.data().beginning, date(2024, 3, 14));
    }

    #[test]
    fn applicability_is_inclusive_and_defaults_to_single_day() {
        let mut data = EventData::new(EventTypeId::Menses, date(2024, 3, 1));
        assert!(data.applies_to(date(2024, 3, 1)));
        assert!(!data.applies_to(date(2024, 3, 2)));

        data.ending = Some(date(2024, 3, 7));
        assert!(data.applies_to(date(2024, 3, 7)));
        assert!(!data.applies_to(date(2024, 3, 8)));
        assert!(!data.applies_to(date(2024, 2, 29)));
    }

    #[test]
    fn unknown_type_id_is_rejected() {
        let result: std::result::Result<CalendarEvent, _> =
            serde_json::from_value(json!({"typeId": 42, "beginning": "2024-03-01"}));
        assert!(result.is_err());
    }

    #[test]
    fn pregnancy_trimester_round_trips_through_wire_record() {
        let mut data = EventData::new(EventTypeId::Pregnancy, date(2024, 1, 1));
        data.ending = Some(date(2024, 3, 31));
        data.trimester = Some(Trimester::First);
        let json = serde_json::to_value(CalendarEvent::concrete(EventId(9), data)).unwrap();
        assert_eq!(json["trimester"], 1);
        assert_eq!(json["typeId"], 10);
        assert_eq!(json["calculated"], false);
        assert_eq!(json["ending"], "2024-03-31");
    }

    #[test]
    fn derived_override_copies_the_payload() {
        let mut data = EventData::new(EventTypeId::Fertility, date(2024, 3, 10));
        data.ending = Some(date(2024, 3, 15));
        let derived = DerivedEvent { id: Some(EventId(3)), data };
        let draft = derived.to_override();
        assert_eq!(draft.type_id, EventTypeId::Fertility);
        assert_eq!(draft.ending, Some(date(2024, 3, 15)));
    }

    #[test]
    fn intensity_outside_scale_is_a_validation_error() {
        assert!(Intensity::new(0).is_err());
        assert!(Intensity::new(4).is_err());
        assert_eq!(Intensity::new(2).unwrap().level(), 2);
    }

    #[test]
    fn drug_details_omit_the_value() {
        let json = serde_json::to_value(EventDetail::present(DetailTypeId(11))).unwrap();
        assert_eq!(json, json!({"detailTypeId": 11, "selected": true}));
    }

    #[test]
    fn drug_flags_decode_as_presence() {
        let event: CalendarEvent = serde_json::from_value(json!({
            "id": 21, "typeId": 5, "beginning": "2024-03-04",
            "details": [
                {"detailTypeId": 3, "value": true},
                {"detailTypeId": 4, "value": 0},
                {"detailTypeId": 5, "value": 1},
                {"detailTypeId": 6, "value": false, "selected": true}
            ]
        }))
        .unwrap();

        let details = &event.data().details;
        assert_eq!(details.len(), 4);
        assert!(details.iter().all(|detail| detail.value.is_none()));
        let selected: Vec<i64> =
            details.iter().filter(|detail| detail.selected).map(|detail| detail.detail_type_id.0).collect();
        assert_eq!(selected, vec![3, 5, 6]);
    }

    #[test]
    fn out_of_scale_symptom_level_keeps_the_event() {
        let events: Vec<CalendarEvent> = serde_json::from_value(json!([
            {"id": 1, "typeId": 4, "beginning": "2024-03-04",
             "details": [{"detailTypeId": 1, "value": 2}, {"detailTypeId": 2, "value": 7}]},
            {"id": 2, "typeId": 6, "beginning": "2024-03-05",
             "details": [{"detailTypeId": 8, "value": "high"}]}
        ]))
        .unwrap();

        assert_eq!(events.len(), 2);
        let symptoms = &events[0].data().details;
        assert_eq!(symptoms[0].value, Some(Intensity::new(2).unwrap()));
        assert_eq!(symptoms[1].value, None);
        assert!(symptoms[1].selected);
        assert_eq!(events[1].data().details[0].value, None);
    }

    #[test]
    fn patch_serializes_only_changed_fields() {
        let patch = EventPatch { ending: Some(date(2024, 3, 7)), ..EventPatch::default() };
        assert_eq!(serde_json::to_value(patch).unwrap(), json!({"ending": "2024-03-07"}));
    }

    #[test]
    fn unsaved_concrete_event_has_no_identity() {
        let event = ConcreteEvent { id: None, data: EventData::new(EventTypeId::Weight, date(2024, 3, 1)) };
        assert!(matches!(event.require_id(), Err(CyclarcError::InvalidInput(_))));
    }
}
