//! Application-wide error types.
//!
//! This module provides a unified error hierarchy for the application.
//! Library modules use specific error types via `thiserror`
//! ([`PlatformError`], [`SyncError`], [`ConfigError`]), while CLI/main use
//! `anyhow` for convenient propagation; this top-level [`Error`] is the
//! bridge between the two.

use crate::config::ConfigError;
use crate::platform::PlatformError;
use crate::sync::SyncError;

/// Application-wide result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level application error.
///
/// Aggregates errors from all subsystems for unified handling.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// File I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Platform client error
    #[error("Platform error: {0}")]
    Platform(#[from] PlatformError),

    /// Sync engine error
    #[error("Sync error: {0}")]
    Sync(#[from] SyncError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// JSON serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid user input
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Generic error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Create an invalid-argument error.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    /// Add context to an error.
    pub fn context(self, ctx: impl Into<String>) -> Self {
        Self::WithContext {
            context: ctx.into(),
            source: Box::new(self),
        }
    }
}

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn with_context(self, ctx: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn with_context(self, ctx: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.context(ctx))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, SyncError> {
    fn with_context(self, ctx: impl Into<String>) -> Result<T> {
        self.map_err(|e| Error::Sync(e).context(ctx))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, PlatformError> {
    fn with_context(self, ctx: impl Into<String>) -> Result<T> {
        self.map_err(|e| Error::Platform(e).context(ctx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Platform;

    #[test]
    fn test_error_display() {
        let err = Error::invalid_argument("unknown direction");
        assert!(err.to_string().contains("unknown direction"));
    }

    #[test]
    fn test_error_with_context() {
        let err = Error::invalid_argument("bad flag").context("while parsing arguments");
        let msg = err.to_string();
        assert!(msg.contains("while parsing arguments"));
    }

    #[test]
    fn test_platform_error_converts() {
        let err: Error = PlatformError::QuotaExceeded(Platform::Spotify).into();
        assert!(err.to_string().contains("rate limit"));
    }

    #[test]
    fn test_result_ext() {
        let result: std::result::Result<(), SyncError> = Err(SyncError::NoTargetPlaylist);
        let with_ctx = result.with_context("executing sync");
        assert!(with_ctx.unwrap_err().to_string().contains("executing sync"));
    }
}
