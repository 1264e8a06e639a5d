//! Configuration structures
//!
//! Loading lives in `cyclarc-infra`; these are the plain shapes shared by
//! every layer. Every section has defaults so partial files are accepted.

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_DAY_END_HOUR, DEFAULT_DAY_START_HOUR, DEFAULT_EVENT_STORE_URL, DEFAULT_LOG_LEVEL,
    DEFAULT_USER_AGENT,
};
use crate::errors::{CyclarcError, Result};
use crate::types::Granularity;

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Where cycle and schedule events are stored.
    #[serde(default)]
    pub event_store: EventStoreConfig,
    /// Grid bounds and the startup view.
    #[serde(default)]
    pub view: ViewConfig,
    /// Tracing output.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Reject values no component could work with.
    pub fn validate(&self) -> Result<()> {
        let url = self.event_store.base_url.trim();
        if url.is_empty() {
            return Err(CyclarcError::Config("event_store.base_url is empty".into()));
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(CyclarcError::Config(format!(
                "event_store.base_url must be an http(s) URL, got {url}"
            )));
        }
        if self.event_store.timeout_secs == Some(0) {
            return Err(CyclarcError::Config("event_store.timeout_secs must be positive".into()));
        }
        if self.view.day_start_hour >= self.view.day_end_hour || self.view.day_end_hour > 23 {
            return Err(CyclarcError::Config(format!(
                "view hours must satisfy start < end <= 23, got {}..{}",
                self.view.day_start_hour, self.view.day_end_hour
            )));
        }
        Ok(())
    }
}

/// Event store connection settings. Credentials are not configuration; they
/// are handed to the client through a session object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventStoreConfig {
    /// Base URL of the REST API, without trailing slash.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// `User-Agent` header value.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Optional request timeout. The engine itself enforces none.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl Default for EventStoreConfig {
    fn default() -> Self {
        Self { base_url: default_base_url(), user_agent: default_user_agent(), timeout_secs: None }
    }
}

/// Grid settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewConfig {
    /// First hour row shown in week and day grids.
    #[serde(default = "default_day_start_hour")]
    pub day_start_hour: u32,
    /// Last hour row, at most 23.
    #[serde(default = "default_day_end_hour")]
    pub day_end_hour: u32,
    /// View used when the command line names none.
    #[serde(default)]
    pub default_granularity: Granularity,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            day_start_hour: DEFAULT_DAY_START_HOUR,
            day_end_hour: DEFAULT_DAY_END_HOUR,
            default_granularity: Granularity::Month,
        }
    }
}

/// Tracing settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive, overridden by `RUST_LOG`.
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: default_log_level(), json: false }
    }
}

fn default_base_url() -> String {
    DEFAULT_EVENT_STORE_URL.to_string()
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

const fn default_day_start_hour() -> u32 {
    DEFAULT_DAY_START_HOUR
}

const fn default_day_end_hour() -> u32 {
    DEFAULT_DAY_END_HOUR
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}
