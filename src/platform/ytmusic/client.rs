//! YouTube Music companion-service HTTP client.
//!
//! YouTube Music has no public API; a small local sidecar service wraps
//! the unofficial one and exposes plain HTTP endpoints. This client talks
//! to that service. Cookie-based authentication lives entirely inside the
//! sidecar - reachability of the service is what "authenticated" means on
//! this side.

use async_trait::async_trait;

use super::{adapter, dto};
use crate::matching::classify;
use crate::model::{MatchCandidate, Platform, Track};
use crate::platform::session::PlatformSession;
use crate::platform::traits::{CreatedPlaylist, PlaylistApi};
use crate::platform::PlatformError;

/// Default companion-service endpoint.
pub const DEFAULT_SERVICE_URL: &str = "http://localhost:5001";

/// The service adds tracks in chunks of at most this many ids.
const BATCH_LIMIT: usize = 50;

/// Client for the YouTube Music companion service.
#[derive(Clone)]
pub struct YtMusicClient {
    session: PlatformSession,
    http_client: reqwest::Client,
    base_url: String,
}

impl YtMusicClient {
    /// Create a new client against the given service URL.
    pub fn new(session: PlatformSession, base_url: impl Into<String>) -> Self {
        let http_client = reqwest::Client::builder()
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            session,
            http_client,
            base_url: base_url.into(),
        }
    }

    /// Probe the service: lists library playlists, discarding the result.
    ///
    /// Used by the service health check and as a cheap auth validation.
    pub async fn probe(&self) -> Result<(), PlatformError> {
        let _playlists: Vec<dto::PlaylistItem> = self
            .get_json(&format!("{}/playlists", self.base_url))
            .await?;
        Ok(())
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
    ) -> Result<T, PlatformError> {
        self.session.require_auth()?;
        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(connect_error)?;
        self.parse_response(response).await
    }

    async fn post_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        body: &serde_json::Value,
    ) -> Result<T, PlatformError> {
        self.session.require_auth()?;
        let response = self
            .http_client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(connect_error)?;
        self.parse_response(response).await
    }

    async fn parse_response<T: serde::de::DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, PlatformError> {
        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(PlatformError::NotAuthenticated(Platform::YoutubeMusic));
        }
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(PlatformError::QuotaExceeded(Platform::YoutubeMusic));
        }
        if !status.is_success() {
            return Err(PlatformError::Api(format!(
                "companion service returned HTTP {}",
                status
            )));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| PlatformError::Parse(e.to_string()))
    }
}

/// Connection errors get a hint about the sidecar, everything else passes
/// through as a generic network failure.
fn connect_error(e: reqwest::Error) -> PlatformError {
    if e.is_connect() {
        PlatformError::Network(format!(
            "companion service unreachable ({e}); is it running?"
        ))
    } else {
        PlatformError::Network(e.to_string())
    }
}

#[async_trait]
impl PlaylistApi for YtMusicClient {
    fn platform(&self) -> Platform {
        Platform::YoutubeMusic
    }

    fn batch_limit(&self) -> usize {
        BATCH_LIMIT
    }

    async fn list_tracks(&self, playlist_id: &str) -> Result<Vec<Track>, PlatformError> {
        let url = format!("{}/playlist/{}/tracks", self.base_url, playlist_id);
        let songs: Vec<dto::SongItem> = self.get_json(&url).await?;
        let tracks = adapter::to_tracks(songs);
        tracing::debug!(playlist = playlist_id, count = tracks.len(), "listed tracks");
        Ok(tracks)
    }

    async fn search_candidates(
        &self,
        title: &str,
        artist: &str,
    ) -> Result<Vec<MatchCandidate>, PlatformError> {
        let query = format!("{title} {artist}");
        let url = format!(
            "{}/search?q={}",
            self.base_url,
            urlencoding::encode(query.trim())
        );
        let songs: Vec<dto::SongItem> = self.get_json(&url).await?;

        let mut tracks = adapter::to_tracks(songs);
        adapter::sort_by_artist_priority(&mut tracks, artist);

        Ok(tracks
            .into_iter()
            .map(|track| {
                let confidence = classify(title, artist, &track);
                MatchCandidate::new(track, confidence)
            })
            .collect())
    }

    async fn create_playlist(
        &self,
        name: &str,
        description: &str,
    ) -> Result<CreatedPlaylist, PlatformError> {
        let url = format!("{}/playlist/create", self.base_url);
        let body = serde_json::json!({
            "title": name,
            "description": description,
        });
        let created: dto::CreatePlaylistResponse = self.post_json(&url, &body).await?;
        tracing::info!(id = %created.id, name, "created playlist");
        Ok(CreatedPlaylist {
            name: created.title.unwrap_or_else(|| name.to_string()),
            id: created.id,
        })
    }

    async fn add_tracks(
        &self,
        playlist_id: &str,
        track_uris: &[String],
    ) -> Result<(), PlatformError> {
        if track_uris.len() > BATCH_LIMIT {
            return Err(PlatformError::Api(format!(
                "batch of {} exceeds the {}-item limit",
                track_uris.len(),
                BATCH_LIMIT
            )));
        }
        let url = format!("{}/playlist/{}/add", self.base_url, playlist_id);
        let body = serde_json::json!({ "track_ids": track_uris });
        let result: dto::AddTracksResponse = self.post_json(&url, &body).await?;

        if result.indicates_success() {
            Ok(())
        } else {
            Err(PlatformError::Api(
                result
                    .error
                    .unwrap_or_else(|| "companion service reported add failure".into()),
            ))
        }
    }
}
