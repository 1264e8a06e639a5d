//! Event store credentials
//!
//! The engine never obtains credentials itself; whatever hosts it hands over
//! a session object that yields the current bearer token.

use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::debug;

use super::errors::ApiError;

/// Trait for providing access tokens
///
/// This trait allows dependency injection and testing with mock providers.
#[async_trait]
pub trait AccessTokenProvider: Send + Sync {
    /// Get the bearer token for the current user.
    async fn access_token(&self) -> Result<String, ApiError>;
}

/// Session holding a token supplied by the host.
#[derive(Debug, Default)]
pub struct StaticSession {
    token: RwLock<Option<String>>,
}

impl StaticSession {
    /// Session signed in with `token`.
    pub fn new(token: impl Into<String>) -> Self {
        Self { token: RwLock::new(Some(token.into())) }
    }

    /// Session without a user; every request fails with an auth error.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Replace the token, e.g. after the host refreshed it.
    pub fn set_token(&self, token: impl Into<String>) {
        *self.token.write() = Some(token.into());
        debug!("Session token replaced");
    }

    /// Forget the token.
    pub fn sign_out(&self) {
        *self.token.write() = None;
    }

    /// Whether a token is held.
    pub fn is_signed_in(&self) -> bool {
        self.token.read().is_some()
    }
}

#[async_trait]
impl AccessTokenProvider for StaticSession {
    async fn access_token(&self) -> Result<String, ApiError> {
        self.token
            .read()
            .clone()
            .filter(|token| !token.trim().is_empty())
            .ok_or_else(|| ApiError::Auth("no signed-in session".into()))
    }
}
