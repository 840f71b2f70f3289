//! Explicit session capability for platform clients.
//!
//! Replaces ambient "is authenticated" flags: a client is constructed with
//! a [`PlatformSession`] and every call that needs credentials asks the
//! session, so the matching engine itself never consults global state.
//! Obtaining the credentials (OAuth dance, cookie extraction) is an
//! external collaborator's job.

use crate::model::Platform;
use crate::platform::PlatformError;

/// Authentication capability for one platform.
#[derive(Debug, Clone)]
pub struct PlatformSession {
    platform: Platform,
    token: Option<String>,
}

impl PlatformSession {
    /// A session holding a bearer token (or equivalent credential).
    pub fn authenticated(platform: Platform, token: impl Into<String>) -> Self {
        Self {
            platform,
            token: Some(token.into()),
        }
    }

    /// A session without credentials. Calls requiring authentication will
    /// fail with [`PlatformError::NotAuthenticated`].
    pub fn anonymous(platform: Platform) -> Self {
        Self {
            platform,
            token: None,
        }
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// The bearer token, or the authentication error callers surface.
    pub fn bearer_token(&self) -> Result<&str, PlatformError> {
        self.token
            .as_deref()
            .ok_or(PlatformError::NotAuthenticated(self.platform))
    }

    /// Fail fast when the session carries no credentials.
    pub fn require_auth(&self) -> Result<(), PlatformError> {
        self.bearer_token().map(|_| ())
    }
}
