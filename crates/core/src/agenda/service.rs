//! Personal agenda controller

use std::sync::Arc;

use chrono::NaiveDate;
use cyclarc_domain::{
    CyclarcError, DateRange, Granularity, Result, ScheduleColor, ScheduleEvent, ScheduleEventDraft,
    ScheduleEventId, ViewConfig,
};
use parking_lot::Mutex;
use tracing::{info, instrument, warn};

use super::dialog::{prepare_draft, AgendaDialog, EventDialogMode};
use super::ports::ScheduleEventStore;
use crate::calendar::{
    build_view, CalendarView, Clock, HourWindow, LoadOutcome, LoadStatus, RangeLoader, TimeCursor,
};
use crate::notification_ports::{Notification, NotificationSink};

/// Agenda events loaded for the active range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgendaSnapshot {
    /// Range the events were fetched for.
    pub range: DateRange,
    /// Events starting inside `range`.
    pub events: Vec<ScheduleEvent>,
}

/// Agenda service
pub struct AgendaService {
    store: Arc<dyn ScheduleEventStore>,
    notifier: Arc<dyn NotificationSink>,
    clock: Arc<dyn Clock>,
    window: HourWindow,
    cursor: Mutex<TimeCursor>,
    dialog: Mutex<AgendaDialog>,
    palette: Mutex<Option<Vec<ScheduleColor>>>,
    loader: RangeLoader<AgendaSnapshot>,
}

impl AgendaService {
    /// Create a service showing the current month.
    pub fn new(
        store: Arc<dyn ScheduleEventStore>,
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
            dialog: Mutex::new(AgendaDialog::Closed),
            palette: Mutex::new(None),
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
    pub fn dialog(&self) -> AgendaDialog {
        self.dialog.lock().clone()
    }

    /// Last applied snapshot.
    pub fn snapshot(&self) -> Option<Arc<AgendaSnapshot>> {
        self.loader.snapshot()
    }

    /// Events of the last applied load.
    pub fn events(&self) -> Vec<ScheduleEvent> {
        self.snapshot().map(|snapshot| snapshot.events.clone()).unwrap_or_default()
    }

    /// Status of the most recent load.
    pub fn load_status(&self) -> LoadStatus {
        self.loader.status()
    }

    /// Grid for the cursor position over the last applied snapshot.
    pub fn view(&self) -> CalendarView {
        let cursor = self.cursor();
        let events = self.events();
        build_view(cursor.pivot(), cursor.granularity(), &[], &events, self.window)
    }

    /// Fetch the active range again.
    #[instrument(skip(self))]
    pub async fn reload(&self) -> LoadOutcome {
        let range = self.cursor.lock().range();
        let store = Arc::clone(&self.store);
        let outcome = self
            .loader
            .load(range, |range| async move {
                let events = store.list_events(&range).await?;
                Ok(AgendaSnapshot { range, events })
            })
            .await;
        if let Some(err) = outcome.error() {
            self.notifier.notify(Notification::error(err));
        }
        outcome
    }

    // Navigation; the dialog stays as it is.

    /// Previous window.
    pub async fn previous(&self) -> LoadOutcome {
        self.navigate(TimeCursor::previous).await
    }

    /// Next window.
    pub async fn next(&self) -> LoadOutcome {
        self.navigate(TimeCursor::next).await
    }

    /// Window containing today.
    pub async fn today(&self) -> LoadOutcome {
        let today = self.clock.today();
        self.navigate(move |cursor| cursor.go_to(today)).await
    }

    /// Window containing `pivot`.
    pub async fn go_to(&self, pivot: NaiveDate) -> LoadOutcome {
        self.navigate(move |cursor| cursor.go_to(pivot)).await
    }

    /// Same pivot, other granularity.
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

    // Palette

    /// Colour palette, fetched on first use.
    pub async fn colors(&self) -> Result<Vec<ScheduleColor>> {
        let cached = self.palette.lock().clone();
        if let Some(palette) = cached {
            return Ok(palette);
        }
        match self.store.colors().await {
            Ok(palette) => {
                *self.palette.lock() = Some(palette.clone());
                Ok(palette)
            }
            Err(err) => {
                let err = err.into_load();
                warn!(error = %err, "Failed to load colour palette");
                self.notifier.notify(Notification::error(&err));
                Err(err)
            }
        }
    }

    // Event dialog

    /// Open the create form on `date` at the first hour row.
    pub fn open_create(&self, date: NaiveDate) {
        self.dialog.lock().open_create(date, self.window.first());
    }

    /// Open the edit form for a loaded event.
    pub fn open_edit(&self, id: ScheduleEventId) -> Result<()> {
        let event = self
            .events()
            .into_iter()
            .find(|event| event.id == id)
            .ok_or_else(|| CyclarcError::NotFound(format!("schedule event {id} is not loaded")))?;
        self.dialog.lock().open_edit(event);
        Ok(())
    }

    /// Edit the open form's draft.
    pub fn update_draft(&self, edit: impl FnOnce(&mut ScheduleEventDraft)) -> Result<()> {
        self.dialog.lock().update_draft(edit)
    }

    /// Close the form without saving.
    pub fn close_dialog(&self) {
        self.dialog.lock().close();
    }

    /// Validate and submit the open dialog's draft, then reload.
    #[instrument(skip(self))]
    pub async fn save(&self) -> Result<()> {
        let palette = self.palette.lock().clone();
        let (target, body) = {
            let mut dialog = self.dialog.lock();
            let open = dialog.event_mut()?;
            let body = match prepare_draft(&open.draft, palette.as_deref()) {
                Ok(body) => body,
                Err(err) => {
                    open.field_error = Some(err.clone());
                    return Err(err);
                }
            };
            let target = match &open.mode {
                EventDialogMode::Edit { event } => Some(event.id),
                EventDialogMode::Create { .. } => None,
            };
            (target, body)
        };

        let result = match target {
            Some(id) => self.store.update_event(id, &body).await,
            None => self.store.create_event(&body).await,
        };
        self.finish_write(result.map(drop), &format!("'{}' saved", body.heading)).await
    }

    /// Ask for confirmation before deleting the edited event.
    pub fn request_delete(&self) -> Result<()> {
        self.dialog.lock().request_delete()
    }

    /// Drop a pending delete.
    pub fn cancel_delete(&self) {
        self.dialog.lock().cancel_delete();
    }

    /// Delete the edited event, then reload.
    #[instrument(skip(self))]
    pub async fn confirm_delete(&self) -> Result<()> {
        let id = self.dialog.lock().confirm_delete()?;
        let result = self.store.delete_event(id).await;
        self.finish_write(result, &format!("Event {id} deleted")).await
    }

    /// Successful writes close the dialog and reload; failures keep the draft.
    async fn finish_write(&self, result: Result<()>, success: &str) -> Result<()> {
        match result {
            Ok(()) => {
                info!(summary = success, "Agenda write succeeded");
                self.dialog.lock().close();
                self.notifier.notify(Notification::success(success));
                self.reload().await;
                Ok(())
            }
            Err(err) => {
                let err = err.into_mutation();
                warn!(error = %err, "Agenda write failed, dialog kept open");
                if err.is_field_level() {
                    self.dialog.lock().set_field_error(err.clone());
                } else {
                    self.notifier.notify(Notification::error(&err));
                }
                Err(err)
            }
        }
    }
}
