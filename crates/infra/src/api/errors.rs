//! Event store error types
//!
//! Classifies HTTP failures of the event store before they are mapped onto
//! the calendar error taxonomy.

use cyclarc_domain::CyclarcError;
use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

/// Categories of event store errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiErrorCategory {
    /// Missing or rejected credentials (401, 403)
    Authentication,
    /// Invariant rejected by the server (409)
    Conflict,
    /// Profile data needed for derived events is missing
    Prerequisite,
    /// Server errors (5xx)
    Server,
    /// Other client errors (4xx)
    Client,
    /// Network/connection errors
    Network,
    /// Response could not be read
    Decode,
    /// Local configuration errors
    Config,
}

/// Event store operation errors
#[derive(Debug, Error)]
pub enum ApiError {
    /// 401 or 403, or no token in the session.
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// 409.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// The server needs profile data before it can derive cycle events.
    #[error("Profile incomplete: {0}")]
    ProfileIncomplete(String),

    /// 5xx.
    #[error("Server error: {0}")]
    Server(String),

    /// Any other unsuccessful status.
    #[error("Client error: {0}")]
    Client(String),

    /// The request never got an answer.
    #[error("Network error: {0}")]
    Network(String),

    /// The body did not match the expected shape.
    #[error("Invalid response: {0}")]
    Decode(String),

    /// Invalid client settings.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Error body fields the event store may send.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody {
    #[serde(default)]
    requires_profile_update: bool,
    #[serde(default)]
    message: Option<String>,
}

impl ApiError {
    /// Get the error category for this error
    pub const fn category(&self) -> ApiErrorCategory {
        match self {
            Self::Auth(_) => ApiErrorCategory::Authentication,
            Self::Conflict(_) => ApiErrorCategory::Conflict,
            Self::ProfileIncomplete(_) => ApiErrorCategory::Prerequisite,
            Self::Server(_) => ApiErrorCategory::Server,
            Self::Client(_) => ApiErrorCategory::Client,
            Self::Network(_) => ApiErrorCategory::Network,
            Self::Decode(_) => ApiErrorCategory::Decode,
            Self::Config(_) => ApiErrorCategory::Config,
        }
    }

    /// Classify a non-success response.
    ///
    /// A body carrying `requiresProfileUpdate: true` wins over the status code.
    pub fn from_response(status: StatusCode, url: &str, body: &str) -> Self {
        let parsed: ErrorBody = serde_json::from_str(body).unwrap_or_default();
        let detail = parsed
            .message
            .filter(|message| !message.trim().is_empty())
            .unwrap_or_else(|| if body.trim().is_empty() { status.to_string() } else { body.to_string() });

        if parsed.requires_profile_update {
            return Self::ProfileIncomplete(detail);
        }

        let message = format!("{} {}: {}", status.as_u16(), url, detail);
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Self::Auth(message),
            StatusCode::CONFLICT => Self::Conflict(detail),
            s if s.is_server_error() => Self::Server(message),
            _ => Self::Client(message),
        }
    }
}

impl From<ApiError> for CyclarcError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Auth(msg) => Self::Auth(msg),
            ApiError::Conflict(msg) => Self::Conflict(msg),
            ApiError::ProfileIncomplete(msg) => Self::Prerequisite(msg),
            ApiError::Server(msg) | ApiError::Network(msg) => Self::Network(msg),
            ApiError::Client(msg) => Self::InvalidInput(msg),
            ApiError::Decode(msg) => Self::Internal(msg),
            ApiError::Config(msg) => Self::Config(msg),
        }
    }
}

impl From<CyclarcError> for ApiError {
    fn from(err: CyclarcError) -> Self {
        match err {
            CyclarcError::Network(msg) => Self::Network(msg),
            CyclarcError::Auth(msg) => Self::Auth(msg),
            CyclarcError::Config(msg) => Self::Config(msg),
            CyclarcError::Conflict(msg) => Self::Conflict(msg),
            CyclarcError::Prerequisite(msg) => Self::ProfileIncomplete(msg),
            other => Self::Client(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_categories() {
        let url = "/calendar/events";
        assert_eq!(
            ApiError::from_response(StatusCode::UNAUTHORIZED, url, "").category(),
            ApiErrorCategory::Authentication
        );
        assert_eq!(
            ApiError::from_response(StatusCode::CONFLICT, url, "").category(),
            ApiErrorCategory::Conflict
        );
        assert_eq!(
            ApiError::from_response(StatusCode::BAD_GATEWAY, url, "").category(),
            ApiErrorCategory::Server
        );
        assert_eq!(
            ApiError::from_response(StatusCode::UNPROCESSABLE_ENTITY, url, "").category(),
            ApiErrorCategory::Client
        );
    }

    #[test]
    fn test_profile_flag_wins_over_status() {
        let body = r#"{"requiresProfileUpdate": true, "message": "durationPeriod missing"}"#;
        let err = ApiError::from_response(StatusCode::BAD_REQUEST, "/calendar/events", body);
        assert!(matches!(&err, ApiError::ProfileIncomplete(msg) if msg == "durationPeriod missing"));
        assert_eq!(
            CyclarcError::from(err),
            CyclarcError::Prerequisite("durationPeriod missing".into())
        );
    }

    #[test]
    fn test_conflict_keeps_server_message() {
        let body = r#"{"message": "a period is already open"}"#;
        let err = ApiError::from_response(StatusCode::CONFLICT, "/calendar/start-period", body);
        assert_eq!(CyclarcError::from(err), CyclarcError::Conflict("a period is already open".into()));
    }

    #[test]
    fn test_plain_text_body_is_kept() {
        let err = ApiError::from_response(StatusCode::INTERNAL_SERVER_ERROR, "/x", "boom");
        assert_eq!(err.to_string(), "Server error: 500 /x: boom");
    }
}
