//! Cycle tracker controller
//!
//! Owns the time cursor, the range loader and the dialog state. Every
//! successful write is followed by a full reload of the active range; the
//! open dialog is then recomputed from the fresh snapshot.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDate;
use cyclarc_domain::{
    CalendarEvent, CyclarcError, DateRange, DetailType, DetailTypeId, EventId, EventPatch, EventTypeId,
    Granularity, Intensity, NewCalendarEvent, PeriodStatus, Result, ViewConfig,
};
use parking_lot::Mutex;
use tracing::{debug, info, instrument, warn};

use super::dialog::{ActiveInput, CycleDialog};
use super::guard;
use super::ports::CycleEventStore;
use crate::calendar::{
    build_view, classify, CalendarView, Classification, Clock, HourWindow, LoadOutcome,
    LoadStatus, RangeLoader, TimeCursor,
};
use crate::notification_ports::{Notification, NotificationSink};

/// Everything loaded for the active range.
#[derive(Debug, Clone, PartialEq)]
pub struct CycleSnapshot {
    /// Range the events were fetched for.
    pub range: DateRange,
    /// Cycle events overlapping `range`, plus an open period starting earlier.
    pub events: Vec<CalendarEvent>,
    /// Open period state at load time.
    pub period: PeriodStatus,
}

/// Cycle tracker service
pub struct CycleTracker {
    store: Arc<dyn CycleEventStore>,
    notifier: Arc<dyn NotificationSink>,
    clock: Arc<dyn Clock>,
    window: HourWindow,
    cursor: Mutex<TimeCursor>,
    dialog: Mutex<CycleDialog>,
    catalog: Mutex<HashMap<EventTypeId, Vec<DetailType>>>,
    loader: RangeLoader<CycleSnapshot>,
}

impl CycleTracker {
    /// Create a tracker showing the current month.
    pub fn new(
        store: Arc<dyn CycleEventStore>,
        notifier: Arc<dyn NotificationSink>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let cursor = TimeCursor::new(clock.today(), Granularity::Month);
        Self {
            store,
            notifier,
            clock,
            window: HourWindow::default(),
            cursor: Mutex::new(cursor),
            dialog: Mutex::new(CycleDialog::Closed),
            catalog: Mutex::new(HashMap::new()),
            loader: RangeLoader::new(),
        }
    }

    /// Apply the hour window and initial granularity from configuration.
    pub fn with_view_config(mut self, config: &ViewConfig) -> Self {
        self.window = HourWindow::from(config);
        self.cursor.get_mut().set_granularity(config.default_granularity);
        self
    }

    /// Current pivot and granularity.
    pub fn cursor(&self) -> TimeCursor {
        *self.cursor.lock()
    }

    /// Copy of the dialog state.
    pub fn dialog(&self) -> CycleDialog {
        self.dialog.lock().clone()
    }

    /// Last applied snapshot, if any load succeeded.
    pub fn snapshot(&self) -> Option<Arc<CycleSnapshot>> {
        self.loader.snapshot()
    }

    /// Events of the last applied load.
    pub fn events(&self) -> Vec<CalendarEvent> {
        self.snapshot().map(|snapshot| snapshot.events.clone()).unwrap_or_default()
    }

    /// Status of the most recent load.
    pub fn load_status(&self) -> LoadStatus {
        self.loader.status()
    }

    /// When true the grid is replaced by a profile-completion prompt.
    pub fn requires_profile_update(&self) -> bool {
        self.loader.requires_profile_update()
    }

    /// Re-enable loading once the user completed the profile.
    pub fn reset_prerequisite(&self) {
        self.loader.reset_prerequisite();
    }

    /// Classification of `date` over the current snapshot.
    pub fn classify(&self, date: NaiveDate) -> Classification {
        let snapshot = self.snapshot();
        classify(date, snapshot.as_ref().map_or(&[][..], |snapshot| snapshot.events.as_slice()))
    }

    /// Grid for the cursor position over the last applied snapshot.
    pub fn view(&self) -> CalendarView {
        let cursor = self.cursor();
        let snapshot = self.snapshot();
        let events = snapshot.as_ref().map_or(&[][..], |snapshot| snapshot.events.as_slice());
        build_view(cursor.pivot(), cursor.granularity(), events, &[], self.window)
    }

    /// Whether the start-period action is available for `date`.
    pub fn can_start_period(&self, date: NaiveDate) -> bool {
        self.snapshot().map_or(true, |snapshot| {
            guard::ensure_can_start_period(date, &snapshot.events, &snapshot.period).is_ok()
        })
    }

    /// Whether an open period can be closed.
    pub fn can_end_period(&self) -> bool {
        self.snapshot().is_some_and(|snapshot| guard::can_end_period(&snapshot.period))
    }

    // Navigation

    /// Load the range under the cursor.
    #[instrument(skip(self))]
    pub async fn reload(&self) -> LoadOutcome {
        let range = self.cursor.lock().range();
        let store = Arc::clone(&self.store);
        let outcome = self
            .loader
            .load(range, |range| async move {
                let events = store.list_events(&range).await?;
                let period = store.period_status().await?;
                Ok(CycleSnapshot { range, events, period })
            })
            .await;

        match &outcome {
            LoadOutcome::Applied => {
                let events = self.events();
                self.dialog.lock().refresh(&events);
            }
            LoadOutcome::Failed(err) | LoadOutcome::PrerequisiteMissing(err) => {
                self.notifier.notify(Notification::error(err));
            }
            LoadOutcome::Stale | LoadOutcome::Suppressed => {}
        }
        outcome
    }

    /// Show the previous window.
    pub async fn previous(&self) -> LoadOutcome {
        self.navigate(TimeCursor::previous).await
    }

    /// Show the next window.
    pub async fn next(&self) -> LoadOutcome {
        self.navigate(TimeCursor::next).await
    }

    /// Show the window containing today.
    pub async fn today(&self) -> LoadOutcome {
        let today = self.clock.today();
        self.navigate(move |cursor| cursor.go_to(today)).await
    }

    /// Show the window containing `pivot`.
    pub async fn go_to(&self, pivot: NaiveDate) -> LoadOutcome {
        self.navigate(move |cursor| cursor.go_to(pivot)).await
    }

    /// Change granularity around the current pivot.
    pub async fn set_granularity(&self, granularity: Granularity) -> LoadOutcome {
        self.navigate(move |cursor| cursor.set_granularity(granularity)).await
    }

    /// Switch granularity and pivot (today when `None`) with a single load.
    pub async fn show(&self, granularity: Granularity, pivot: Option<NaiveDate>) -> LoadOutcome {
        let pivot = pivot.unwrap_or_else(|| self.clock.today());
        self.navigate(move |cursor| {
            cursor.set_granularity(granularity);
            cursor.go_to(pivot);
        })
        .await
    }

    async fn navigate(&self, step: impl FnOnce(&mut TimeCursor)) -> LoadOutcome {
        {
            let mut cursor = self.cursor.lock();
            step(&mut *cursor);
        }
        self.loader.invalidate();
        self.reload().await
    }

    // Day dialog

    /// Open the day dialog for `date`.
    pub fn select_day(&self, date: NaiveDate) {
        let events = self.events();
        self.dialog.lock().open_day(date, &events);
    }

    /// Close any open dialog.
    pub fn close_dialog(&self) {
        self.dialog.lock().close();
    }

    /// Show the weight or temperature input.
    pub fn open_input(&self, input: ActiveInput) -> Result<()> {
        self.dialog.lock().open_input(input)
    }

    /// Replace the input text.
    pub fn set_input(&self, text: &str) -> Result<()> {
        self.dialog.lock().set_input(text)
    }

    /// Hide the input without saving.
    pub fn cancel_input(&self) -> Result<()> {
        self.dialog.lock().cancel_input()
    }

    /// Save the weight or temperature of the open day.
    ///
    /// Updates the day's record of that type when one exists, creates one
    /// otherwise.
    #[instrument(skip(self))]
    pub async fn save_input(&self) -> Result<()> {
        let (date, type_id, value, existing) = {
            let mut dialog = self.dialog.lock();
            let day = dialog.day_mut()?;
            let (type_id, value) = match day.parsed_input() {
                Ok(parsed) => parsed,
                Err(err) => {
                    day.field_error = Some(err.clone());
                    return Err(err);
                }
            };
            let existing = day.concrete_of(type_id).and_then(|event| event.id);
            (day.date, type_id, value, existing)
        };

        let result = match existing {
            Some(id) => {
                let patch = EventPatch { value: Some(value), ..EventPatch::default() };
                self.store.update_event(id, &patch).await
            }
            None => {
                let draft = NewCalendarEvent { value: Some(value), ..NewCalendarEvent::on(type_id, date) };
                self.store.create_event(&draft).await
            }
        };

        self.finish_write(result.map(drop), &format!("{type_id} saved for {date}"), |dialog| {
            match dialog {
                CycleDialog::Day(day) if day.date == date => day.clear_input(),
                other => debug!(open = ?other.date(), "Day dialog changed while saving, input left as is"),
            }
        })
        .await
    }

    // Details dialog

    /// Detail catalogue for `event_type`, fetched once per tracker.
    pub async fn detail_catalog(&self, event_type: EventTypeId) -> Result<Vec<DetailType>> {
        let cached = self.catalog.lock().get(&event_type).cloned();
        if let Some(cached) = cached {
            return Ok(cached);
        }
        let fetched = self.store.detail_types(event_type).await.map_err(CyclarcError::into_load)?;
        self.catalog.lock().insert(event_type, fetched.clone());
        Ok(fetched)
    }

    /// Open the detail editor for `event_type` on the selected day.
    #[instrument(skip(self))]
    pub async fn open_details(&self, event_type: EventTypeId) -> Result<()> {
        if self.dialog.lock().day().is_none() {
            return Err(CyclarcError::InvalidInput("no day dialog is open".into()));
        }
        let catalog = match self.detail_catalog(event_type).await {
            Ok(catalog) => catalog,
            Err(err) => {
                warn!(error = %err, "Failed to load detail catalogue");
                self.notifier.notify(Notification::error(&err));
                return Err(err);
            }
        };
        self.dialog.lock().open_details(event_type, catalog)
    }

    /// Apply an intensity click; `level` is validated first.
    pub fn select_intensity(&self, detail: DetailTypeId, level: u8) -> Result<()> {
        let level = Intensity::new(level)?;
        self.dialog.lock().details_mut()?.selection.select_intensity(detail, level)
    }

    /// Toggle a presence-only detail.
    pub fn toggle_presence(&self, detail: DetailTypeId) -> Result<()> {
        self.dialog.lock().details_mut()?.selection.toggle_presence(detail)
    }

    /// Back to the day dialog without saving.
    pub fn close_details(&self) -> Result<()> {
        let events = self.events();
        self.dialog.lock().close_details(&events)
    }

    /// Submit the complete detail set of the open details dialog.
    ///
    /// A calculated record is overridden by a new concrete one.
    #[instrument(skip(self))]
    pub async fn save_details(&self) -> Result<()> {
        let (date, event_type, details, existing) = {
            let mut dialog = self.dialog.lock();
            let open = dialog.details_mut()?;
            (open.date, open.event_type, open.selection.to_details(), open.existing.clone())
        };

        let result = match existing {
            Some(CalendarEvent::Concrete(event)) => {
                let id = event.require_id()?;
                let patch = EventPatch { details: Some(details), ..EventPatch::default() };
                self.store.update_event(id, &patch).await
            }
            Some(CalendarEvent::Derived(event)) => {
                let draft = NewCalendarEvent { details, ..event.to_override() };
                self.store.create_event(&draft).await
            }
            None if details.is_empty() => return self.close_details(),
            None => {
                let draft = NewCalendarEvent { details, ..NewCalendarEvent::on(event_type, date) };
                self.store.create_event(&draft).await
            }
        };

        let events = self.events();
        self.finish_write(result.map(drop), &format!("{event_type} saved for {date}"), |dialog| {
            match dialog.details().map(|details| details.date) {
                Some(open) => dialog.open_day(open, &events),
                None => debug!(open = ?dialog.date(), "Details dialog closed while saving"),
            }
        })
        .await
    }

    // Deletion

    /// Ask to delete a saved event of the open dialog.
    pub fn request_delete(&self, id: EventId) -> Result<()> {
        self.dialog.lock().request_delete(id)
    }

    /// Drop a pending delete.
    pub fn cancel_delete(&self) {
        self.dialog.lock().cancel_delete();
    }

    /// Issue the delete the user confirmed.
    #[instrument(skip(self))]
    pub async fn confirm_delete(&self) -> Result<()> {
        let id = self.dialog.lock().confirm_delete()?;
        let result = self.store.delete_event(id).await;
        let events = self.events();
        self.finish_write(result, &format!("Event {id} deleted"), |dialog| {
            if let Some(open) = dialog.details().map(|details| details.date) {
                dialog.open_day(open, &events);
            }
        })
        .await
    }

    // Period lifecycle

    /// Start a period on `date`, rejected when it would overlap a recorded one.
    #[instrument(skip(self))]
    pub async fn start_period(&self, date: NaiveDate) -> Result<()> {
        let (events, status) = self.guard_inputs().await?;
        if let Err(err) = guard::ensure_can_start_period(date, &events, &status) {
            self.report(&err);
            return Err(err);
        }
        let result = self.store.start_period(date).await;
        self.finish_write(result, &format!("Period started on {date}"), |_| {}).await
    }

    /// Close the open period on `date`.
    #[instrument(skip(self))]
    pub async fn end_period(&self, date: NaiveDate) -> Result<()> {
        let (events, status) = self.guard_inputs().await?;
        if let Err(err) = guard::ensure_can_end_period(date, &events, &status) {
            self.report(&err);
            return Err(err);
        }
        let result = self.store.end_period(date).await;
        self.finish_write(result, &format!("Period ended on {date}"), |_| {}).await
    }

    /// Loaded events and period flag, asking the store when nothing is loaded.
    async fn guard_inputs(&self) -> Result<(Vec<CalendarEvent>, PeriodStatus)> {
        if let Some(snapshot) = self.snapshot() {
            return Ok((snapshot.events.clone(), snapshot.period));
        }
        match self.store.period_status().await {
            Ok(status) => Ok((Vec::new(), status)),
            Err(err) => {
                let err = err.into_load();
                self.report(&err);
                Err(err)
            }
        }
    }

    async fn finish_write(
        &self,
        result: Result<()>,
        success: &str,
        on_success: impl FnOnce(&mut CycleDialog),
    ) -> Result<()> {
        match result {
            Ok(()) => {
                info!(summary = success, "Cycle write succeeded");
                on_success(&mut *self.dialog.lock());
                self.notifier.notify(Notification::success(success));
                self.reload().await;
                Ok(())
            }
            Err(err) => {
                let err = err.into_mutation();
                warn!(error = %err, "Cycle write failed, dialog kept open");
                self.report(&err);
                Err(err)
            }
        }
    }

    /// Field errors go to the open dialog, everything else to the sink.
    fn report(&self, err: &CyclarcError) {
        if err.is_field_level() {
            let mut dialog = self.dialog.lock();
            if dialog.day().is_some() {
                dialog.set_field_error(err.clone());
                return;
            }
        }
        self.notifier.notify(Notification::error(err));
    }
}
