use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use cyclarc_core::ScheduleEventStore;
use cyclarc_domain::{
    CyclarcError, DateRange, Result as DomainResult, ScheduleColor, ScheduleEvent,
    ScheduleEventDraft, ScheduleEventId,
};

#[derive(Default)]
struct State {
    events: Vec<ScheduleEvent>,
    colors: Vec<ScheduleColor>,
    next_id: i64,
    fail_writes: bool,
    color_calls: usize,
    write_calls: usize,
}

/// In-memory schedule event store.
#[derive(Default, Clone)]
pub struct InMemoryScheduleStore {
    state: Arc<Mutex<State>>,
}

impl InMemoryScheduleStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_event(self, event: ScheduleEvent) -> Self {
        {
            let mut state = self.state.lock().unwrap();
            state.next_id = state.next_id.max(event.id.0);
            state.events.push(event);
        }
        self
    }

    pub fn with_colors(self, colors: Vec<ScheduleColor>) -> Self {
        self.state.lock().unwrap().colors = colors;
        self
    }

    pub fn set_fail_writes(&self, value: bool) {
        self.state.lock().unwrap().fail_writes = value;
    }

    pub fn events(&self) -> Vec<ScheduleEvent> {
        self.state.lock().unwrap().events.clone()
    }

    pub fn color_calls(&self) -> usize {
        self.state.lock().unwrap().color_calls
    }

    pub fn write_calls(&self) -> usize {
        self.state.lock().unwrap().write_calls
    }

    fn materialize(id: ScheduleEventId, draft: &ScheduleEventDraft) -> DomainResult<ScheduleEvent> {
        let event_beginning = draft
            .event_beginning
            .ok_or_else(|| CyclarcError::validation("eventBeginning", "required"))?;
        Ok(ScheduleEvent {
            id,
            heading: draft.heading.clone(),
            message: draft.message.clone(),
            event_beginning,
            event_ending: draft.event_ending,
            reminder: draft.reminder,
            color: draft.color,
        })
    }
}

#[async_trait]
impl ScheduleEventStore for InMemoryScheduleStore {
    async fn list_events(&self, range: &DateRange) -> DomainResult<Vec<ScheduleEvent>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .events
            .iter()
            .filter(|event| range.contains(event.event_beginning.date()))
            .cloned()
            .collect())
    }

    async fn create_event(&self, draft: &ScheduleEventDraft) -> DomainResult<ScheduleEvent> {
        let mut state = self.state.lock().unwrap();
        state.write_calls += 1;
        if state.fail_writes {
            return Err(CyclarcError::Network("connection reset".into()));
        }
        state.next_id += 1;
        let event = Self::materialize(ScheduleEventId(state.next_id), draft)?;
        state.events.push(event.clone());
        Ok(event)
    }

    async fn update_event(
        &self,
        id: ScheduleEventId,
        draft: &ScheduleEventDraft,
    ) -> DomainResult<ScheduleEvent> {
        let mut state = self.state.lock().unwrap();
        state.write_calls += 1;
        if state.fail_writes {
            return Err(CyclarcError::Network("connection reset".into()));
        }
        let updated = Self::materialize(id, draft)?;
        let slot = state
            .events
            .iter_mut()
            .find(|event| event.id == id)
            .ok_or_else(|| CyclarcError::NotFound(format!("schedule event {id}")))?;
        *slot = updated.clone();
        Ok(updated)
    }

    async fn delete_event(&self, id: ScheduleEventId) -> DomainResult<()> {
        let mut state = self.state.lock().unwrap();
        state.write_calls += 1;
        if state.fail_writes {
            return Err(CyclarcError::Network("connection reset".into()));
        }
        state.events.retain(|event| event.id != id);
        Ok(())
    }

    async fn colors(&self) -> DomainResult<Vec<ScheduleColor>> {
        let mut state = self.state.lock().unwrap();
        state.color_calls += 1;
        Ok(state.colors.clone())
    }
}
