//! Application context - dependency injection container

use std::sync::Arc;

use cyclarc_core::{AgendaService, Clock, CycleTracker, NotificationSink, SystemClock};
use cyclarc_domain::{Config, CyclarcError, Result};
use cyclarc_infra::{
    CalendarGateway, EventStoreClient, EventStoreClientConfig, QueuedNotificationSink,
    ScheduleGateway, StaticSession,
};
use tracing::info;

/// Number of notifications kept until the host shows them.
const NOTIFICATION_BACKLOG: usize = 64;

/// Application context - holds all services and dependencies
pub struct AppContext {
    /// Validated configuration.
    pub config: Config,
    /// Credentials handed to the event store client.
    pub session: Arc<StaticSession>,
    /// Notifications waiting to be shown.
    pub notifications: Arc<QueuedNotificationSink>,
    /// Cycle tracker controller.
    pub cycle: Arc<CycleTracker>,
    /// Agenda controller.
    pub agenda: Arc<AgendaService>,
}

impl AppContext {
    /// Wire the controllers against the configured event store.
    ///
    /// `token` is the bearer credential of the signed-in user; without one
    /// every request fails with an authentication error.
    pub fn new(config: Config, token: Option<String>) -> Result<Self> {
        Self::with_clock(config, token, Arc::new(SystemClock))
    }

    /// Same as [`AppContext::new`] with an explicit clock.
    pub fn with_clock(config: Config, token: Option<String>, clock: Arc<dyn Clock>) -> Result<Self> {
        config.validate()?;

        let session = Arc::new(token.map_or_else(StaticSession::anonymous, StaticSession::new));
        let client = EventStoreClient::new(EventStoreClientConfig::from(&config.event_store), session.clone())
            .map_err(CyclarcError::from)?;
        let client = Arc::new(client);

        let notifications = Arc::new(QueuedNotificationSink::new(NOTIFICATION_BACKLOG));
        let notifier: Arc<dyn NotificationSink> = notifications.clone();

        let cycle = CycleTracker::new(
            Arc::new(CalendarGateway::new(client.clone())),
            notifier.clone(),
            clock.clone(),
        )
        .with_view_config(&config.view);
        let agenda = AgendaService::new(Arc::new(ScheduleGateway::new(client)), notifier, clock)
            .with_view_config(&config.view);

        info!(
            base_url = %config.event_store.base_url,
            signed_in = session.is_signed_in(),
            "application context ready"
        );

        Ok(Self {
            config,
            session,
            notifications,
            cycle: Arc::new(cycle),
            agenda: Arc::new(agenda),
        })
    }
}
