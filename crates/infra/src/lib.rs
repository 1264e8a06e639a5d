//! # Cyclarc Infrastructure
//!
//! Infrastructure implementations of core domain ports.
//!
//! This crate contains:
//! - The event store REST gateway (cycle and agenda stores)
//! - HTTP client and session credentials
//! - Configuration loading
//! - Notification sinks
//!
//! ## Architecture
//! - Implements traits defined in `cyclarc-core`
//! - Contains all "impure" code (network, file system, environment)

pub mod api;
pub mod config;
pub mod errors;
pub mod http;
pub mod notify;

// Re-export commonly used items
pub use api::{
    AccessTokenProvider, ApiError, CalendarGateway, EventStoreClient, EventStoreClientConfig,
    ScheduleGateway, StaticSession,
};
pub use errors::InfraError;
pub use http::HttpClient;
pub use notify::{QueuedNotificationSink, TracingNotificationSink};
