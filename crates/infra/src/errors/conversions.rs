//! Conversions from external infrastructure errors into domain errors.

use cyclarc_domain::CyclarcError;
use reqwest::Error as HttpError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub CyclarcError);

impl From<InfraError> for CyclarcError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<CyclarcError> for InfraError {
    fn from(value: CyclarcError) -> Self {
        Self(value)
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoCyclarcError {
    fn into_cyclarc(self) -> CyclarcError;
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → CyclarcError */
/* -------------------------------------------------------------------------- */

impl IntoCyclarcError for HttpError {
    fn into_cyclarc(self) -> CyclarcError {
        if self.is_timeout() {
            return CyclarcError::Network(format!("http request timed out: {self}"));
        }
        if self.is_connect() {
            return CyclarcError::Network(format!("http connection failed: {self}"));
        }
        if self.is_builder() {
            return CyclarcError::Config(format!("invalid http request: {self}"));
        }
        if self.is_decode() {
            return CyclarcError::Internal(format!("failed to decode http response: {self}"));
        }
        if let Some(status) = self.status() {
            return match status.as_u16() {
                401 | 403 => CyclarcError::Auth(format!("http status {status}: {self}")),
                404 => CyclarcError::NotFound(format!("http status {status}: {self}")),
                409 => CyclarcError::Conflict(format!("http status {status}: {self}")),
                _ => CyclarcError::Network(format!("http status {status}: {self}")),
            };
        }
        CyclarcError::Network(format!("http error: {self}"))
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        Self(value.into_cyclarc())
    }
}
