//! Trait definitions for platform playlist clients.
//!
//! These traits enable dependency injection and mocking for tests.
//! Production code uses the real client implementations, while tests
//! substitute scripted mock implementations.
//!
//! # Example
//!
//! ```ignore
//! use tunesync::platform::traits::PlaylistApi;
//!
//! async fn process<T: PlaylistApi>(client: &T, playlist: &str) {
//!     let tracks = client.list_tracks(playlist).await?;
//! }
//! ```

use async_trait::async_trait;
use std::sync::Arc;

use crate::model::{MatchCandidate, Platform, Track};
use crate::platform::PlatformError;

/// A playlist created on the destination platform.
#[derive(Debug, Clone)]
pub struct CreatedPlaylist {
    pub id: String,
    pub name: String,
}

/// Minimal contract the sync engine requires from a platform client.
///
/// `search_candidates` results are NOT guaranteed best-first; the engine
/// re-ranks. `add_tracks` must raise on batch failure and accepts at most
/// [`PlaylistApi::batch_limit`] references per call.
#[async_trait]
pub trait PlaylistApi: Send + Sync {
    /// Which platform this client talks to.
    fn platform(&self) -> Platform;

    /// The platform's documented per-call item limit for track additions.
    fn batch_limit(&self) -> usize;

    /// All tracks of a playlist, in playlist order.
    async fn list_tracks(&self, playlist_id: &str) -> Result<Vec<Track>, PlatformError>;

    /// Candidate tracks for a title/artist pair, with a client-assigned
    /// confidence tier per candidate.
    async fn search_candidates(
        &self,
        title: &str,
        artist: &str,
    ) -> Result<Vec<MatchCandidate>, PlatformError>;

    /// Create a new (private) playlist.
    async fn create_playlist(
        &self,
        name: &str,
        description: &str,
    ) -> Result<CreatedPlaylist, PlatformError>;

    /// Add tracks by native reference. At most `batch_limit()` per call.
    async fn add_tracks(&self, playlist_id: &str, track_uris: &[String])
    -> Result<(), PlatformError>;
}

// Shared clients: the bidirectional orchestrator drives one client from
// two directional engines at once.
#[async_trait]
impl<T: PlaylistApi> PlaylistApi for Arc<T> {
    fn platform(&self) -> Platform {
        (**self).platform()
    }

    fn batch_limit(&self) -> usize {
        (**self).batch_limit()
    }

    async fn list_tracks(&self, playlist_id: &str) -> Result<Vec<Track>, PlatformError> {
        (**self).list_tracks(playlist_id).await
    }

    async fn search_candidates(
        &self,
        title: &str,
        artist: &str,
    ) -> Result<Vec<MatchCandidate>, PlatformError> {
        (**self).search_candidates(title, artist).await
    }

    async fn create_playlist(
        &self,
        name: &str,
        description: &str,
    ) -> Result<CreatedPlaylist, PlatformError> {
        (**self).create_playlist(name, description).await
    }

    async fn add_tracks(
        &self,
        playlist_id: &str,
        track_uris: &[String],
    ) -> Result<(), PlatformError> {
        (**self).add_tracks(playlist_id, track_uris).await
    }
}

/// Scripted mock client for testing the sync engine.
#[cfg(test)]
pub mod mocks {
    use super::*;
    use parking_lot::Mutex;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicU32, Ordering};

    use crate::model::Platform;

    /// Mock platform client with scripted playlists and search results.
    ///
    /// Records every search and add call so tests can assert on call
    /// counts, batching, and short-circuit behavior.
    pub struct MockPlatform {
        platform: Platform,
        batch_limit: usize,
        playlists: Mutex<HashMap<String, Vec<Track>>>,
        search_results: HashMap<String, Vec<MatchCandidate>>,
        search_error: Option<PlatformError>,
        add_error: Option<PlatformError>,
        /// URIs whose containing batch fails on submission.
        poison_uris: Vec<String>,
        /// Number of create_playlist calls that fail before one succeeds.
        create_failures: AtomicU32,
        pub search_calls: Mutex<Vec<String>>,
        pub add_calls: Mutex<Vec<(String, Vec<String>)>>,
        pub create_calls: AtomicU32,
    }

    impl MockPlatform {
        pub fn new(platform: Platform) -> Self {
            Self {
                platform,
                batch_limit: 100,
                playlists: Mutex::new(HashMap::new()),
                search_results: HashMap::new(),
                search_error: None,
                add_error: None,
                poison_uris: Vec::new(),
                create_failures: AtomicU32::new(0),
                search_calls: Mutex::new(Vec::new()),
                add_calls: Mutex::new(Vec::new()),
                create_calls: AtomicU32::new(0),
            }
        }

        pub fn with_batch_limit(mut self, limit: usize) -> Self {
            self.batch_limit = limit;
            self
        }

        pub fn with_playlist(self, playlist_id: &str, tracks: Vec<Track>) -> Self {
            self.playlists.lock().insert(playlist_id.to_string(), tracks);
            self
        }

        /// Script search results for a source title (case-insensitive).
        pub fn with_search(mut self, title: &str, candidates: Vec<MatchCandidate>) -> Self {
            self.search_results.insert(title.to_lowercase(), candidates);
            self
        }

        pub fn with_search_error(mut self, error: PlatformError) -> Self {
            self.search_error = Some(error);
            self
        }

        pub fn with_add_error(mut self, error: PlatformError) -> Self {
            self.add_error = Some(error);
            self
        }

        /// Fail any batch containing this URI.
        pub fn with_poison_uri(mut self, uri: &str) -> Self {
            self.poison_uris.push(uri.to_string());
            self
        }

        /// Make the first `n` create_playlist calls fail.
        pub fn with_create_failures(self, n: u32) -> Self {
            self.create_failures.store(n, Ordering::SeqCst);
            self
        }

        pub fn search_call_count(&self) -> usize {
            self.search_calls.lock().len()
        }

        pub fn playlist_tracks(&self, playlist_id: &str) -> Vec<Track> {
            self.playlists
                .lock()
                .get(playlist_id)
                .cloned()
                .unwrap_or_default()
        }
    }

    #[async_trait]
    impl PlaylistApi for MockPlatform {
        fn platform(&self) -> Platform {
            self.platform
        }

        fn batch_limit(&self) -> usize {
            self.batch_limit
        }

        async fn list_tracks(&self, playlist_id: &str) -> Result<Vec<Track>, PlatformError> {
            Ok(self.playlist_tracks(playlist_id))
        }

        async fn search_candidates(
            &self,
            title: &str,
            _artist: &str,
        ) -> Result<Vec<MatchCandidate>, PlatformError> {
            self.search_calls.lock().push(title.to_string());
            if let Some(ref err) = self.search_error {
                return Err(err.clone());
            }
            Ok(self
                .search_results
                .get(&title.to_lowercase())
                .cloned()
                .unwrap_or_default())
        }

        async fn create_playlist(
            &self,
            name: &str,
            _description: &str,
        ) -> Result<CreatedPlaylist, PlatformError> {
            self.create_calls.fetch_add(1, Ordering::SeqCst);
            let remaining = self.create_failures.load(Ordering::SeqCst);
            if remaining > 0 {
                self.create_failures.store(remaining - 1, Ordering::SeqCst);
                return Err(PlatformError::Api("playlist creation failed".into()));
            }
            let id = format!("created-{}", name.to_lowercase().replace(' ', "-"));
            self.playlists.lock().entry(id.clone()).or_default();
            Ok(CreatedPlaylist {
                id,
                name: name.to_string(),
            })
        }

        async fn add_tracks(
            &self,
            playlist_id: &str,
            track_uris: &[String],
        ) -> Result<(), PlatformError> {
            self.add_calls
                .lock()
                .push((playlist_id.to_string(), track_uris.to_vec()));
            if track_uris.len() > self.batch_limit {
                return Err(PlatformError::Api(format!(
                    "batch of {} exceeds limit {}",
                    track_uris.len(),
                    self.batch_limit
                )));
            }
            if let Some(ref err) = self.add_error {
                return Err(err.clone());
            }
            if track_uris.iter().any(|u| self.poison_uris.contains(u)) {
                return Err(PlatformError::Api("batch rejected".into()));
            }
            let mut playlists = self.playlists.lock();
            let tracks = playlists.entry(playlist_id.to_string()).or_default();
            for uri in track_uris {
                tracks.push(Track {
                    id: uri.clone(),
                    title: uri.clone(),
                    artist: String::new(),
                    artists: vec![],
                    album: String::new(),
                    raw_title: None,
                    channel_attribution: None,
                    platform: self.platform,
                    uri: uri.clone(),
                });
            }
            Ok(())
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use crate::model::Confidence;
        use crate::test_utils::{candidate, dest_track};

        #[tokio::test]
        async fn test_mock_returns_scripted_search_results() {
            let mock = MockPlatform::new(Platform::Spotify).with_search(
                "Innuendo",
                vec![candidate("Innuendo", "Queen", Confidence::Perfect)],
            );
            let results = mock.search_candidates("Innuendo", "Queen").await.unwrap();
            assert_eq!(results.len(), 1);
            assert_eq!(mock.search_call_count(), 1);
        }

        #[tokio::test]
        async fn test_mock_add_registers_membership() {
            let mock = MockPlatform::new(Platform::Spotify).with_playlist("p1", vec![]);
            mock.add_tracks("p1", &["uri-a".into(), "uri-b".into()])
                .await
                .unwrap();
            assert_eq!(mock.playlist_tracks("p1").len(), 2);
        }

        #[tokio::test]
        async fn test_mock_create_failures_then_success() {
            let mock = MockPlatform::new(Platform::Spotify).with_create_failures(2);
            assert!(mock.create_playlist("New", "").await.is_err());
            assert!(mock.create_playlist("New", "").await.is_err());
            assert!(mock.create_playlist("New", "").await.is_ok());
            assert_eq!(mock.create_calls.load(Ordering::SeqCst), 3);
        }

        #[tokio::test]
        async fn test_mock_oversized_batch_rejected() {
            let mock = MockPlatform::new(Platform::Spotify).with_batch_limit(2);
            let uris: Vec<String> = (0..3).map(|i| format!("uri-{i}")).collect();
            assert!(mock.add_tracks("p1", &uris).await.is_err());
        }

        #[tokio::test]
        async fn test_mock_list_tracks_scripted() {
            let mock = MockPlatform::new(Platform::Spotify)
                .with_playlist("p1", vec![dest_track("Innuendo", "Queen")]);
            let tracks = mock.list_tracks("p1").await.unwrap();
            assert_eq!(tracks.len(), 1);
        }
    }
}
