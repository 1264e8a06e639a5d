//! # Cyclarc Domain
//!
//! Business domain types and models for the Cyclarc calendar engine.
//!
//! This crate contains:
//! - Cycle and agenda event types (CalendarEvent, ScheduleEvent, ...)
//! - Domain error types and Result definitions
//! - Configuration structures
//! - Domain constants
//!
//! ## Architecture
//! - No dependencies on other Cyclarc crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;
pub mod utils;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
