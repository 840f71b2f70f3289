//! Platform integration layer.
//!
//! # Architecture
//!
//! This module follows a clean separation between:
//! - **Domain models** ([`crate::model`]) - internal types the engine runs on
//! - **API DTOs** (`spotify/dto.rs`, `ytmusic/dto.rs`) - exact API response shapes
//! - **Adapters** - convert DTOs to domain models (the only place raw
//!   platform shapes are touched)
//! - **Clients** - HTTP clients for the platform APIs
//! - **Traits** (`traits.rs`) - the [`PlaylistApi`] seam the sync engine
//!   depends on, enabling mock implementations in tests
//!
//! Authentication state travels as an explicit [`PlatformSession`]
//! capability; the engine never reads ambient global state.

pub mod session;
pub mod spotify;
pub mod traits;
pub mod ytmusic;

pub use session::PlatformSession;
pub use spotify::SpotifyClient;
pub use traits::{CreatedPlaylist, PlaylistApi};
pub use ytmusic::YtMusicClient;

use crate::model::Platform;

/// Errors raised by platform clients.
#[derive(Debug, Clone, thiserror::Error)]
pub enum PlatformError {
    #[error("{0} session is not authenticated")]
    NotAuthenticated(Platform),

    #[error("{0} rate limit exceeded - defer and retry later")]
    QuotaExceeded(Platform),

    #[error("network error: {0}")]
    Network(String),

    #[error("API request failed: {0}")]
    Api(String),

    #[error("failed to parse response: {0}")]
    Parse(String),

    #[error("invalid track data: {0}")]
    InvalidTrack(String),
}

impl PlatformError {
    /// Fatal errors abort an entire preview/execute call; everything else
    /// is captured per-track and reported as data.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            PlatformError::NotAuthenticated(_) | PlatformError::QuotaExceeded(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fatal_classification() {
        assert!(PlatformError::NotAuthenticated(Platform::Spotify).is_fatal());
        assert!(PlatformError::QuotaExceeded(Platform::YoutubeMusic).is_fatal());
        assert!(!PlatformError::Network("timeout".into()).is_fatal());
        assert!(!PlatformError::Api("500".into()).is_fatal());
    }

    #[test]
    fn test_error_display_names_platform() {
        let err = PlatformError::NotAuthenticated(Platform::Spotify);
        assert!(err.to_string().contains("Spotify"));
    }
}
