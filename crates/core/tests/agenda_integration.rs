//! Agenda navigation and event dialog workflow against an in-memory store.

mod support;

use std::sync::Arc;

use chrono::NaiveDateTime;
use cyclarc_core::calendar::CalendarView;
use cyclarc_core::{AgendaService, FixedClock};
use cyclarc_domain::{
    ColorId, CyclarcError, Granularity, ScheduleColor, ScheduleEvent, ScheduleEventId,
};
use support::date;
use support::notifier::RecordingNotifier;
use support::schedule::InMemoryScheduleStore;

fn at(d: u32, h: u32, m: u32) -> NaiveDateTime {
    date(2024, 6, d).and_hms_opt(h, m, 0).unwrap()
}

fn dentist() -> ScheduleEvent {
    ScheduleEvent {
        id: ScheduleEventId(7),
        heading: "Dentist".into(),
        message: None,
        event_beginning: at(12, 9, 30),
        event_ending: Some(at(12, 10, 0)),
        reminder: None,
        color: None,
    }
}

fn service(store: &InMemoryScheduleStore, notifier: &RecordingNotifier) -> AgendaService {
    AgendaService::new(
        Arc::new(store.clone()),
        Arc::new(notifier.clone()),
        Arc::new(FixedClock(date(2024, 6, 15))),
    )
}

#[tokio::test]
async fn week_move_uses_monday_start() {
    let store = InMemoryScheduleStore::new().with_event(dentist());
    let notifier = RecordingNotifier::new();
    let agenda = service(&store, &notifier);

    agenda.set_granularity(Granularity::Week).await;
    let snapshot = agenda.snapshot().unwrap();
    assert_eq!(snapshot.range.start(), date(2024, 6, 10));
    assert_eq!(snapshot.range.end(), date(2024, 6, 16));
    assert_eq!(snapshot.events.len(), 1);

    let CalendarView::Week(grid) = agenda.view() else { panic!("expected week view") };
    let wednesday = &grid.columns[2];
    assert_eq!(wednesday.date, date(2024, 6, 12));
    assert_eq!(wednesday.slot(9).unwrap().schedule.len(), 1);

    agenda.next().await;
    assert!(agenda.events().is_empty());
}

#[tokio::test]
async fn navigation_keeps_the_dialog_open() {
    let store = InMemoryScheduleStore::new();
    let notifier = RecordingNotifier::new();
    let agenda = service(&store, &notifier);
    agenda.reload().await;

    agenda.open_create(date(2024, 6, 20));
    agenda.update_draft(|draft| draft.heading = "Yoga".into()).unwrap();
    agenda.next().await;
    agenda.set_granularity(Granularity::Day).await;
    agenda.today().await;

    let dialog = agenda.dialog();
    let open = dialog.event().unwrap();
    assert_eq!(open.draft.heading, "Yoga");
    assert_eq!(agenda.cursor().pivot(), date(2024, 6, 15));
}

#[tokio::test]
async fn created_event_appears_after_reload() {
    let store = InMemoryScheduleStore::new();
    let notifier = RecordingNotifier::new();
    let agenda = service(&store, &notifier);
    agenda.reload().await;

    agenda.open_create(date(2024, 6, 20));
    agenda
        .update_draft(|draft| {
            draft.heading = "  Blood test ".into();
            draft.event_beginning = Some(at(20, 8, 15));
        })
        .unwrap();
    agenda.save().await.unwrap();

    assert!(!agenda.dialog().is_open());
    let events = agenda.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].heading, "Blood test");
    assert_eq!(notifier.successes().len(), 1);
}

#[tokio::test]
async fn invalid_draft_is_not_submitted() {
    let store = InMemoryScheduleStore::new();
    let notifier = RecordingNotifier::new();
    let agenda = service(&store, &notifier);

    agenda.open_create(date(2024, 6, 20));
    let err = agenda.save().await.unwrap_err();

    assert!(err.is_field_level());
    assert_eq!(store.write_calls(), 0);
    assert!(notifier.all().is_empty());
    assert_eq!(agenda.dialog().event().unwrap().field_error.as_ref(), Some(&err));
}

#[tokio::test]
async fn edit_and_failed_save_keep_the_draft() {
    let store = InMemoryScheduleStore::new().with_event(dentist());
    let notifier = RecordingNotifier::new();
    let agenda = service(&store, &notifier);
    agenda.reload().await;

    agenda.open_edit(ScheduleEventId(7)).unwrap();
    agenda.update_draft(|draft| draft.message = Some("bring x-rays".into())).unwrap();
    store.set_fail_writes(true);
    let err = agenda.save().await.unwrap_err();
    assert!(matches!(err, CyclarcError::Mutation(_)));
    assert_eq!(
        agenda.dialog().event().unwrap().draft.message.as_deref(),
        Some("bring x-rays")
    );

    store.set_fail_writes(false);
    agenda.save().await.unwrap();
    assert_eq!(store.events()[0].message.as_deref(), Some("bring x-rays"));
    assert_eq!(agenda.events()[0].message.as_deref(), Some("bring x-rays"));
}

#[tokio::test]
async fn unknown_colour_is_rejected_once_palette_is_known() {
    let palette = vec![
        ScheduleColor { id: ColorId(1), name: "teal".into(), hex: Some("#008080".into()) },
        ScheduleColor { id: ColorId(2), name: "coral".into(), hex: None },
    ];
    let store = InMemoryScheduleStore::new().with_colors(palette);
    let notifier = RecordingNotifier::new();
    let agenda = service(&store, &notifier);

    assert_eq!(agenda.colors().await.unwrap().len(), 2);
    assert_eq!(agenda.colors().await.unwrap().len(), 2);
    assert_eq!(store.color_calls(), 1);

    agenda.open_create(date(2024, 6, 20));
    agenda
        .update_draft(|draft| {
            draft.heading = "Physio".into();
            draft.color = Some(ColorId(5));
        })
        .unwrap();
    let err = agenda.save().await.unwrap_err();
    assert_eq!(err, CyclarcError::validation("color", "unknown colour 5"));
}

#[tokio::test]
async fn delete_needs_confirmation() {
    let store = InMemoryScheduleStore::new().with_event(dentist());
    let notifier = RecordingNotifier::new();
    let agenda = service(&store, &notifier);
    agenda.reload().await;

    agenda.open_edit(ScheduleEventId(7)).unwrap();
    assert!(agenda.confirm_delete().await.is_err());
    assert_eq!(store.write_calls(), 0);

    agenda.request_delete().unwrap();
    agenda.confirm_delete().await.unwrap();
    assert!(store.events().is_empty());
    assert!(agenda.events().is_empty());
    assert!(!agenda.dialog().is_open());
}
