//! Day classification
//!
//! Maps a calendar day and the loaded event list to one dominant visual
//! state plus the set of indicator tags. Everything here is pure.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use cyclarc_domain::{CalendarEvent, DateRange, EventTypeId, Trimester};
use serde::{Deserialize, Serialize};

/// Visual category of a day.
///
/// Variant order is display order of the indicator dots, not priority; use
/// [`ClassTag::priority`] for that.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "tag", content = "trimester", rename_all = "snake_case")]
pub enum ClassTag {
    /// Period day.
    Menses,
    /// Pregnancy day, with its trimester when known.
    Pregnancy(Option<Trimester>),
    /// Ovulation day.
    Ovulation,
    /// Fertile window.
    Fertility,
    /// Predicted period.
    MensesExpectation,
    /// Symptoms recorded. This and the tags below are secondary.
    Symptoms,
    /// A weight reading.
    Weight,
    /// A temperature reading.
    Temperature,
    /// Medication taken.
    Drugs,
    /// Moods recorded.
    Moods,
}

impl ClassTag {
    /// Dominance rank, higher wins. Secondary tags have no rank.
    pub const fn priority(self) -> Option<u8> {
        match self {
            Self::Menses => Some(5),
            Self::Pregnancy(_) => Some(4),
            Self::Ovulation => Some(3),
            Self::Fertility => Some(2),
            Self::MensesExpectation => Some(1),
            Self::Symptoms | Self::Weight | Self::Temperature | Self::Drugs | Self::Moods => None,
        }
    }

    /// Secondary tags only show as indicator dots.
    pub const fn is_secondary(self) -> bool {
        self.priority().is_none()
    }

    /// Stable snake_case label used by renderers.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Menses => "menses",
            Self::Pregnancy(None) => "pregnancy",
            Self::Pregnancy(Some(Trimester::First)) => "pregnancy_first_trimester",
            Self::Pregnancy(Some(Trimester::Second)) => "pregnancy_second_trimester",
            Self::Pregnancy(Some(Trimester::Third)) => "pregnancy_third_trimester",
            Self::Ovulation => "ovulation",
            Self::Fertility => "fertility",
            Self::MensesExpectation => "menses_expectation",
            Self::Symptoms => "symptoms",
            Self::Weight => "weight",
            Self::Temperature => "temperature",
            Self::Drugs => "drugs",
            Self::Moods => "moods",
        }
    }

    /// Tag for every type except Pregnancy, whose tag depends on the trimester.
    const fn for_type(type_id: EventTypeId) -> Self {
        match type_id {
            EventTypeId::Menses => Self::Menses,
            EventTypeId::Pregnancy => Self::Pregnancy(None),
            EventTypeId::Ovulation => Self::Ovulation,
            EventTypeId::Fertility => Self::Fertility,
            EventTypeId::MensesExpectation => Self::MensesExpectation,
            EventTypeId::Symptoms => Self::Symptoms,
            EventTypeId::Weight => Self::Weight,
            EventTypeId::Temperature => Self::Temperature,
            EventTypeId::Drugs => Self::Drugs,
            EventTypeId::Moods => Self::Moods,
        }
    }
}

/// Result of classifying one day.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    /// Highest-priority tag, `None` when only secondary tags (or none) apply.
    pub dominant: Option<ClassTag>,
    /// Every tag that applies, dominant included.
    pub indicators: BTreeSet<ClassTag>,
}

impl Classification {
    /// True for a day without any event.
    pub fn is_empty(&self) -> bool {
        self.indicators.is_empty()
    }

    /// Whether `tag` applies to the day.
    pub fn has(&self, tag: ClassTag) -> bool {
        self.indicators.contains(&tag)
    }
}

/// Events that apply to `date`, with calculated records dropped when a
/// concrete record of the same type also applies.
pub fn applicable_events(date: NaiveDate, events: &[CalendarEvent]) -> Vec<&CalendarEvent> {
    let concrete_types: BTreeSet<EventTypeId> = events
        .iter()
        .filter(|event| !event.is_calculated() && event.applies_to(date))
        .map(CalendarEvent::type_id)
        .collect();

    events
        .iter()
        .filter(|event| event.applies_to(date))
        .filter(|event| !(event.is_calculated() && concrete_types.contains(&event.type_id())))
        .collect()
}

/// Classify one day.
pub fn classify(date: NaiveDate, events: &[CalendarEvent]) -> Classification {
    let applicable = applicable_events(date, events);

    let mut indicators = BTreeSet::new();
    let mut pregnancy: Option<&CalendarEvent> = None;
    for event in &applicable {
        match event.type_id() {
            EventTypeId::Pregnancy => {
                // A day belongs to one trimester: the latest-starting record wins.
                let newer = pregnancy.map_or(true, |current| {
                    (event.data().beginning, event.id()) > (current.data().beginning, current.id())
                });
                if newer {
                    pregnancy = Some(event);
                }
            }
            other => {
                indicators.insert(ClassTag::for_type(other));
            }
        }
    }
    if let Some(event) = pregnancy {
        indicators.insert(ClassTag::Pregnancy(event.data().trimester));
    }

    let dominant = indicators
        .iter()
        .copied()
        .filter_map(|tag| tag.priority().map(|rank| (rank, tag)))
        .max_by_key(|(rank, _)| *rank)
        .map(|(_, tag)| tag);

    Classification { dominant, indicators }
}

/// Classify every day of `range`.
pub fn classify_range(
    range: &DateRange,
    events: &[CalendarEvent],
) -> BTreeMap<NaiveDate, Classification> {
    let relevant: Vec<CalendarEvent> = events
        .iter()
        .filter(|event| {
            let data = event.data();
            data.beginning <= range.end() && data.last_day() >= range.start()
        })
        .cloned()
        .collect();

    range.days().map(|day| (day, classify(day, &relevant))).collect()
}

#[cfg(test)]
mod tests {
    use cyclarc_domain::{EventData, EventId};
    use proptest::prelude::*;

    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn concrete(id: i64, type_id: EventTypeId, begin: NaiveDate, end: Option<NaiveDate>) -> CalendarEvent {
        let mut data = EventData::new(type_id, begin);
        data.ending = end;
        CalendarEvent::concrete(EventId(id), data)
    }

    fn derived(type_id: EventTypeId, begin: NaiveDate, end: Option<NaiveDate>) -> CalendarEvent {
        let mut data = EventData::new(type_id, begin);
        data.ending = end;
        CalendarEvent::derived(data)
    }

    #[test]
    fn empty_day_has_no_dominant() {
        let result = classify(date(2024, 3, 3), &[]);
        assert!(result.dominant.is_none());
        assert!(result.is_empty());
    }

    #[test]
    fn menses_beats_ovulation() {
        let events = vec![
            derived(EventTypeId::Ovulation, date(2024, 3, 3), None),
            concrete(1, EventTypeId::Menses, date(2024, 3, 1), Some(date(2024, 3, 5))),
        ];
        let result = classify(date(2024, 3, 3), &events);
        assert_eq!(result.dominant, Some(ClassTag::Menses));
        assert!(result.has(ClassTag::Ovulation));
    }

    #[test]
    fn secondary_tags_never_dominate() {
        let events = vec![
            concrete(1, EventTypeId::Weight, date(2024, 3, 3), None),
            concrete(2, EventTypeId::Symptoms, date(2024, 3, 3), None),
        ];
        let result = classify(date(2024, 3, 3), &events);
        assert!(result.dominant.is_none());
        assert_eq!(result.indicators.len(), 2);
    }

    #[test]
    fn concrete_record_hides_calculated_duplicate() {
        let events = vec![
            derived(EventTypeId::Menses, date(2024, 3, 1), Some(date(2024, 3, 5))),
            concrete(7, EventTypeId::Menses, date(2024, 3, 2), Some(date(2024, 3, 6))),
        ];
        let applicable = applicable_events(date(2024, 3, 3), &events);
        assert_eq!(applicable.len(), 1);
        assert!(!applicable[0].is_calculated());

        let only_derived = applicable_events(date(2024, 3, 1), &events);
        assert_eq!(only_derived.len(), 1);
        assert!(only_derived[0].is_calculated());
    }

    #[test]
    fn latest_pregnancy_record_sets_the_trimester() {
        let mut first = EventData::new(EventTypeId::Pregnancy, date(2024, 1, 1));
        first.ending = Some(date(2024, 4, 10));
        first.trimester = Some(Trimester::First);
        let mut second = EventData::new(EventTypeId::Pregnancy, date(2024, 4, 1));
        second.ending = Some(date(2024, 7, 1));
        second.trimester = Some(Trimester::Second);
        let events = vec![CalendarEvent::concrete(EventId(2), second), CalendarEvent::concrete(EventId(1), first)];

        let result = classify(date(2024, 4, 5), &events);
        assert_eq!(result.dominant, Some(ClassTag::Pregnancy(Some(Trimester::Second))));
        assert_eq!(result.indicators.len(), 1);
    }

    #[test]
    fn range_classification_covers_every_day() {
        let range = DateRange::new(date(2024, 3, 1), date(2024, 3, 10)).unwrap();
        let events = vec![concrete(1, EventTypeId::Menses, date(2024, 3, 1), Some(date(2024, 3, 7)))];
        let days = classify_range(&range, &events);
        assert_eq!(days.len(), 10);
        assert_eq!(days[&date(2024, 3, 3)].dominant, Some(ClassTag::Menses));
        assert!(days[&date(2024, 3, 10)].dominant.is_none());
    }

    fn arb_type() -> impl Strategy<Value = EventTypeId> {
        prop::sample::select(EventTypeId::ALL.to_vec())
    }

    fn arb_event() -> impl Strategy<Value = CalendarEvent> {
        (arb_type(), 0u32..40, prop::option::of(0u32..10), any::<bool>(), 1i64..1000).prop_map(
            |(type_id, offset, span, calculated, id)| {
                let begin = date(2024, 3, 1) + chrono::Days::new(u64::from(offset));
                let end = span.map(|span| begin + chrono::Days::new(u64::from(span)));
                if calculated {
                    derived(type_id, begin, end)
                } else {
                    concrete(id, type_id, begin, end)
                }
            },
        )
    }

    proptest! {
        #[test]
        fn classification_is_deterministic(
            events in prop::collection::vec(arb_event(), 0..12),
            offset in 0u32..50,
        ) {
            let day = date(2024, 3, 1) + chrono::Days::new(u64::from(offset));
            prop_assert_eq!(classify(day, &events), classify(day, &events));
        }

        #[test]
        fn applicable_menses_always_dominates(
            mut events in prop::collection::vec(arb_event(), 0..12),
            offset in 0u32..20,
        ) {
            let day = date(2024, 3, 1) + chrono::Days::new(u64::from(offset));
            events.push(concrete(9999, EventTypeId::Menses, day, None));
            events.push(derived(EventTypeId::Ovulation, day, None));
            prop_assert_eq!(classify(day, &events).dominant, Some(ClassTag::Menses));
        }

        #[test]
        fn dominant_is_one_of_the_indicators(
            events in prop::collection::vec(arb_event(), 0..12),
            offset in 0u32..50,
        ) {
            let day = date(2024, 3, 1) + chrono::Days::new(u64::from(offset));
            let result = classify(day, &events);
            if let Some(tag) = result.dominant {
                prop_assert!(result.indicators.contains(&tag));
                prop_assert!(result.indicators.iter().all(|other| other.priority() <= tag.priority()));
            }
        }
    }
}
