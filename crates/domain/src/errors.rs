//! Error types used throughout the calendar engine
//!
//! The first five variants are the user-facing taxonomy of the calendar
//! (validation, conflict, prerequisite, load, mutation). The remaining ones
//! describe infrastructure failures before the core maps them onto that
//! taxonomy. No variant is fatal: every one is recoverable by a user action.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for Cyclarc
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum CyclarcError {
    /// A required field is missing or malformed; no request was issued.
    #[error("Invalid {field}: {message}")]
    Validation {
        /// Name of the offending field.
        field: String,
        /// What is wrong with it.
        message: String,
    },

    /// A domain invariant would be (or was) violated.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// The user profile lacks data the server needs to derive cycle events.
    #[error("Profile update required: {0}")]
    Prerequisite(String),

    /// A read of the active range failed; previous state is kept.
    #[error("Load failed: {0}")]
    Load(String),

    /// A create, update or delete request failed; dialog input is kept.
    #[error("Save failed: {0}")]
    Mutation(String),

    /// Configuration could not be loaded or is invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The event store could not be reached.
    #[error("Network error: {0}")]
    Network(String),

    /// Missing or rejected credentials.
    #[error("Authentication error: {0}")]
    Auth(String),

    /// The event store has no such record.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Input rejected before any request was sent.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Anything else, including undecodable responses.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CyclarcError {
    /// Build a field-level validation error.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation { field: field.into(), message: message.into() }
    }

    /// Stable label suitable for structured logging.
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "validation",
            Self::Conflict(_) => "conflict",
            Self::Prerequisite(_) => "prerequisite",
            Self::Load(_) => "load",
            Self::Mutation(_) => "mutation",
            Self::Config(_) => "config",
            Self::Network(_) => "network",
            Self::Auth(_) => "auth",
            Self::NotFound(_) => "not_found",
            Self::InvalidInput(_) => "invalid_input",
            Self::Internal(_) => "internal",
        }
    }

    /// Validation errors are shown next to the field instead of as a toast.
    pub const fn is_field_level(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }

    /// Re-label a read failure as [`CyclarcError::Load`].
    ///
    /// Errors that already carry a calendar meaning are left untouched.
    #[must_use]
    pub fn into_load(self) -> Self {
        match self {
            Self::Validation { .. }
            | Self::Conflict(_)
            | Self::Prerequisite(_)
            | Self::Load(_)
            | Self::Mutation(_) => self,
            other => Self::Load(other.to_string()),
        }
    }

    /// Re-label a write failure as [`CyclarcError::Mutation`].
    #[must_use]
    pub fn into_mutation(self) -> Self {
        match self {
            Self::Validation { .. }
            | Self::Conflict(_)
            | Self::Prerequisite(_)
            | Self::Load(_)
            | Self::Mutation(_) => self,
            other => Self::Mutation(other.to_string()),
        }
    }
}

/// Result type alias for Cyclarc operations
pub type Result<T> = std::result::Result<T, CyclarcError>;
