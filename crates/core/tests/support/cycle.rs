use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::NaiveDate;
use cyclarc_core::CycleEventStore;
use cyclarc_domain::{
    CalendarEvent, ConcreteEvent, CyclarcError, DateRange, DetailType, EventData, EventId,
    EventPatch, EventTypeId, NewCalendarEvent, PeriodStatus, Result as DomainResult,
};
use tokio::sync::oneshot;

#[derive(Default)]
struct State {
    events: Vec<CalendarEvent>,
    next_id: i64,
    catalog: HashMap<EventTypeId, Vec<DetailType>>,
    permissive: bool,
    requires_profile_update: bool,
    fail_reads: bool,
    fail_writes: bool,
    list_gate: Option<oneshot::Receiver<()>>,
    list_calls: usize,
    detail_calls: usize,
}

/// In-memory cycle event store.
#[derive(Default, Clone)]
pub struct InMemoryCycleStore {
    state: Arc<Mutex<State>>,
}

impl InMemoryCycleStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store that accepts any start/end request.
    pub fn permissive() -> Self {
        let store = Self::default();
        store.state.lock().unwrap().permissive = true;
        store
    }

    /// Seed an event; concrete events without id get one.
    pub fn with_event(self, event: CalendarEvent) -> Self {
        {
            let mut state = self.state.lock().unwrap();
            let event = match event {
                CalendarEvent::Concrete(ConcreteEvent { id: None, data }) => {
                    state.next_id += 1;
                    CalendarEvent::concrete(EventId(state.next_id), data)
                }
                other => other,
            };
            if let Some(EventId(id)) = event.id() {
                state.next_id = state.next_id.max(id);
            }
            state.events.push(event);
        }
        self
    }

    pub fn with_catalog(self, event_type: EventTypeId, catalog: Vec<DetailType>) -> Self {
        self.state.lock().unwrap().catalog.insert(event_type, catalog);
        self
    }

    pub fn set_requires_profile_update(&self, value: bool) {
        self.state.lock().unwrap().requires_profile_update = value;
    }

    pub fn set_fail_reads(&self, value: bool) {
        self.state.lock().unwrap().fail_reads = value;
    }

    pub fn set_fail_writes(&self, value: bool) {
        self.state.lock().unwrap().fail_writes = value;
    }

    /// Make the next `list_events` call wait until the returned sender fires.
    pub fn hold_next_list(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.state.lock().unwrap().list_gate = Some(rx);
        tx
    }

    pub fn events(&self) -> Vec<CalendarEvent> {
        self.state.lock().unwrap().events.clone()
    }

    pub fn events_of(&self, type_id: EventTypeId) -> Vec<CalendarEvent> {
        self.events().into_iter().filter(|event| event.type_id() == type_id).collect()
    }

    pub fn open_periods(&self) -> usize {
        self.events()
            .iter()
            .filter_map(CalendarEvent::as_concrete)
            .filter(|event| event.data.type_id == EventTypeId::Menses && event.data.is_open())
            .count()
    }

    pub fn list_calls(&self) -> usize {
        self.state.lock().unwrap().list_calls
    }

    pub fn detail_calls(&self) -> usize {
        self.state.lock().unwrap().detail_calls
    }

    fn open_period_id(state: &State) -> Option<EventId> {
        state
            .events
            .iter()
            .filter_map(CalendarEvent::as_concrete)
            .find(|event| event.data.type_id == EventTypeId::Menses && event.data.is_open())
            .and_then(|event| event.id)
    }

    fn concrete_mut(state: &mut State, id: EventId) -> DomainResult<&mut ConcreteEvent> {
        state
            .events
            .iter_mut()
            .find_map(|event| match event {
                CalendarEvent::Concrete(concrete) if concrete.id == Some(id) => Some(concrete),
                _ => None,
            })
            .ok_or_else(|| CyclarcError::NotFound(format!("event {id}")))
    }

    fn check_write(state: &State) -> DomainResult<()> {
        if state.fail_writes {
            return Err(CyclarcError::Network("connection reset".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl CycleEventStore for InMemoryCycleStore {
    async fn list_events(&self, range: &DateRange) -> DomainResult<Vec<CalendarEvent>> {
        let gate = {
            let mut state = self.state.lock().unwrap();
            state.list_calls += 1;
            state.list_gate.take()
        };
        if let Some(gate) = gate {
            let _ = gate.await;
        }

        let state = self.state.lock().unwrap();
        if state.requires_profile_update {
            return Err(CyclarcError::Prerequisite("durationPeriod and durationMenstruation are missing".into()));
        }
        if state.fail_reads {
            return Err(CyclarcError::Network("timed out".into()));
        }
        Ok(state
            .events
            .iter()
            .filter(|event| {
                let data = event.data();
                // Only an open period runs on past its first day.
                let last = if data.type_id == EventTypeId::Menses && data.is_open() {
                    range.end()
                } else {
                    data.last_day()
                };
                data.beginning <= range.end() && last >= range.start()
            })
            .cloned()
            .collect())
    }

    async fn create_event(&self, event: &NewCalendarEvent) -> DomainResult<CalendarEvent> {
        let mut state = self.state.lock().unwrap();
        Self::check_write(&state)?;
        state.next_id += 1;
        let data = EventData {
            type_id: event.type_id,
            beginning: event.beginning,
            ending: event.ending,
            value: event.value,
            details: event.details.clone(),
            trimester: None,
        };
        let created = CalendarEvent::concrete(EventId(state.next_id), data);
        state.events.push(created.clone());
        Ok(created)
    }

    async fn update_event(&self, id: EventId, patch: &EventPatch) -> DomainResult<CalendarEvent> {
        let mut state = self.state.lock().unwrap();
        Self::check_write(&state)?;
        let event = Self::concrete_mut(&mut state, id)?;
        if let Some(ending) = patch.ending {
            event.data.ending = Some(ending);
        }
        if let Some(value) = patch.value {
            event.data.value = Some(value);
        }
        if let Some(details) = &patch.details {
            event.data.details = details.clone();
        }
        Ok(CalendarEvent::Concrete(event.clone()))
    }

    async fn delete_event(&self, id: EventId) -> DomainResult<()> {
        let mut state = self.state.lock().unwrap();
        Self::check_write(&state)?;
        let before = state.events.len();
        state.events.retain(|event| event.as_concrete().map_or(true, |concrete| concrete.id != Some(id)));
        if state.events.len() == before {
            return Err(CyclarcError::NotFound(format!("event {id}")));
        }
        Ok(())
    }

    async fn detail_types(&self, event_type: EventTypeId) -> DomainResult<Vec<DetailType>> {
        let mut state = self.state.lock().unwrap();
        state.detail_calls += 1;
        Ok(state.catalog.get(&event_type).cloned().unwrap_or_default())
    }

    async fn period_status(&self) -> DomainResult<PeriodStatus> {
        let state = self.state.lock().unwrap();
        let open_period_id = Self::open_period_id(&state);
        Ok(PeriodStatus { has_open_period: open_period_id.is_some(), open_period_id })
    }

    async fn start_period(&self, date: NaiveDate) -> DomainResult<()> {
        let mut state = self.state.lock().unwrap();
        Self::check_write(&state)?;
        if !state.permissive && Self::open_period_id(&state).is_some() {
            return Err(CyclarcError::Conflict("a period is already open".into()));
        }
        state.next_id += 1;
        let id = EventId(state.next_id);
        state.events.push(CalendarEvent::concrete(id, EventData::new(EventTypeId::Menses, date)));
        Ok(())
    }

    async fn end_period(&self, date: NaiveDate) -> DomainResult<()> {
        let mut state = self.state.lock().unwrap();
        Self::check_write(&state)?;
        match Self::open_period_id(&state) {
            Some(id) => {
                Self::concrete_mut(&mut state, id)?.data.ending = Some(date);
                Ok(())
            }
            None if state.permissive => Ok(()),
            None => Err(CyclarcError::Conflict("no open period".into())),
        }
    }
}
