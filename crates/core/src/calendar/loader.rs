//! Cancellable range loads
//!
//! The loader owns the snapshot of the active range and replaces it
//! wholesale. Every load is stamped with a generation; navigation bumps the
//! generation so a slow response for an old range is dropped on arrival
//! (last request wins). There is no network cancellation.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use cyclarc_domain::{CyclarcError, DateRange, Result};
use parking_lot::RwLock;
use tracing::{debug, warn};

/// Stamp handed out by [`RangeLoader::begin`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    generation: u64,
    range: DateRange,
}

impl LoadTicket {
    /// Generation the load was issued under.
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Range being fetched.
    pub const fn range(&self) -> DateRange {
        self.range
    }
}

/// State of the most recent load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStatus {
    /// Nothing requested yet.
    Idle,
    /// A load is in flight.
    Loading,
    /// The snapshot matches the last request.
    Ready,
    /// The last load failed; the previous snapshot is still shown.
    Failed(CyclarcError),
    /// The profile lacks data the server needs; the grid is replaced by a prompt.
    ProfileIncomplete,
}

/// What happened to a completed load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The result became the snapshot.
    Applied,
    /// A newer load was issued in the meantime; the result was discarded.
    Stale,
    /// The fetch failed; the previous snapshot is kept.
    Failed(CyclarcError),
    /// The server asked for profile data first.
    PrerequisiteMissing(CyclarcError),
    /// Not issued because the profile prerequisite is still unmet.
    Suppressed,
}

impl LoadOutcome {
    /// Whether the result became the snapshot.
    pub const fn is_applied(&self) -> bool {
        matches!(self, Self::Applied)
    }

    /// Error to surface to the user, if any.
    pub const fn error(&self) -> Option<&CyclarcError> {
        match self {
            Self::Failed(err) | Self::PrerequisiteMissing(err) => Some(err),
            _ => None,
        }
    }
}

#[derive(Debug)]
struct LoaderState<P> {
    snapshot: Option<Arc<P>>,
    loaded_range: Option<DateRange>,
    status: LoadStatus,
    requires_profile_update: bool,
}

/// Generation-guarded owner of the visible snapshot `P`.
#[derive(Debug)]
pub struct RangeLoader<P> {
    generation: AtomicU64,
    state: RwLock<LoaderState<P>>,
}

impl<P> Default for RangeLoader<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> RangeLoader<P> {
    /// An empty loader at generation 0.
    pub fn new() -> Self {
        Self {
            generation: AtomicU64::new(0),
            state: RwLock::new(LoaderState {
                snapshot: None,
                loaded_range: None,
                status: LoadStatus::Idle,
                requires_profile_update: false,
            }),
        }
    }

    /// Start a load for `range`, making every earlier ticket stale.
    pub fn begin(&self, range: DateRange) -> LoadTicket {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.state.write().status = LoadStatus::Loading;
        LoadTicket { generation, range }
    }

    /// Drop any in-flight load without starting a new one.
    pub fn invalidate(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }

    /// Generation of the most recent ticket.
    pub fn current_generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Apply the result of the load stamped with `ticket`.
    pub fn complete(&self, ticket: LoadTicket, result: Result<P>) -> LoadOutcome {
        let mut state = self.state.write();
        let current = self.generation.load(Ordering::SeqCst);
        if ticket.generation != current {
            debug!(
                generation = ticket.generation,
                current,
                start = %ticket.range.start(),
                end = %ticket.range.end(),
                "Discarding stale range load"
            );
            return LoadOutcome::Stale;
        }

        match result {
            Ok(payload) => {
                state.snapshot = Some(Arc::new(payload));
                state.loaded_range = Some(ticket.range);
                state.status = LoadStatus::Ready;
                LoadOutcome::Applied
            }
            Err(err @ CyclarcError::Prerequisite(_)) => {
                warn!(error = %err, "Range load blocked by incomplete profile");
                state.requires_profile_update = true;
                state.status = LoadStatus::ProfileIncomplete;
                LoadOutcome::PrerequisiteMissing(err)
            }
            Err(err) => {
                let err = err.into_load();
                warn!(
                    error = %err,
                    start = %ticket.range.start(),
                    end = %ticket.range.end(),
                    "Range load failed, keeping previous snapshot"
                );
                state.status = LoadStatus::Failed(err.clone());
                LoadOutcome::Failed(err)
            }
        }
    }

    /// Issue `fetch` for `range` and apply its result if still current.
    ///
    /// Nothing is fetched while the profile prerequisite is unmet.
    pub async fn load<F, Fut>(&self, range: DateRange, fetch: F) -> LoadOutcome
    where
        F: FnOnce(DateRange) -> Fut,
        Fut: Future<Output = Result<P>>,
    {
        if self.requires_profile_update() {
            debug!("Skipping range load until the profile is completed");
            return LoadOutcome::Suppressed;
        }
        let ticket = self.begin(range);
        let result = fetch(range).await;
        self.complete(ticket, result)
    }

    /// Last applied snapshot.
    pub fn snapshot(&self) -> Option<Arc<P>> {
        self.state.read().snapshot.clone()
    }

    /// Range of the last applied snapshot.
    pub fn loaded_range(&self) -> Option<DateRange> {
        self.state.read().loaded_range
    }

    /// Current load status.
    pub fn status(&self) -> LoadStatus {
        self.state.read().status.clone()
    }

    /// Whether loads are held back until the profile is completed.
    pub fn requires_profile_update(&self) -> bool {
        self.state.read().requires_profile_update
    }

    /// Allow loads again after the user completed the profile.
    pub fn reset_prerequisite(&self) {
        let mut state = self.state.write();
        state.requires_profile_update = false;
        if state.status == LoadStatus::ProfileIncomplete {
            state.status = LoadStatus::Idle;
        }
    }
}
