//! # Cyclarc App
//!
//! Composition root and command-line front end.
//!
//! This crate contains:
//! - Application context (dependency injection)
//! - Commands driving the calendar controllers
//! - Plain-text rendering of calendar views
//! - Tracing initialisation
//!
//! ## Architecture
//! - Depends on `domain`, `core`, and `infra`
//! - Wires up the hexagonal architecture

pub mod commands;
pub mod context;
pub mod render;
pub mod utils;

// Re-export for convenience
pub use commands::*;
pub use context::*;
