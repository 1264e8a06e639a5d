//! Event store gateway
//!
//! REST adapters for the cycle and agenda store ports.
//!
//! # Architecture
//!
//! - `client`: authenticated JSON requests over [`crate::http::HttpClient`]
//! - `auth`: bearer token supplied by the host's session
//! - `calendar` / `schedule`: port implementations
//! - No automatic retries and no timeout unless configured

pub mod auth;
pub mod calendar;
pub mod client;
pub mod errors;
pub mod schedule;

pub use auth::{AccessTokenProvider, StaticSession};
pub use calendar::CalendarGateway;
pub use client::{EventStoreClient, EventStoreClientConfig};
pub use errors::{ApiError, ApiErrorCategory};
pub use schedule::ScheduleGateway;
