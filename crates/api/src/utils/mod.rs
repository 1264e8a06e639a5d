//! Application utilities

pub mod logging;
