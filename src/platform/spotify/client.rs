//! Spotify Web API HTTP client.
//!
//! Handles communication with the Spotify Web API.
//! See: https://developer.spotify.com/documentation/web-api
//!
//! The API paginates playlist listings at 100 items and caps track
//! additions at 100 URIs per call. Search quality varies wildly with query
//! phrasing, so lookups issue a ladder of queries from most to least
//! specific and stop as soon as a perfect-confidence match appears.

use async_trait::async_trait;

use super::{adapter, dto};
use crate::matching::{canonical, classify};
use crate::model::{Confidence, MatchCandidate, Platform, Track};
use crate::platform::session::PlatformSession;
use crate::platform::traits::{CreatedPlaylist, PlaylistApi};
use crate::platform::PlatformError;

/// Page size for playlist listings and the add-tracks batch cap.
const PAGE_SIZE: usize = 100;

/// Maximum results requested per search query.
const SEARCH_LIMIT: usize = 10;

/// Spotify Web API client.
#[derive(Clone)]
pub struct SpotifyClient {
    session: PlatformSession,
    http_client: reqwest::Client,
    base_url: String,
}

impl SpotifyClient {
    /// Create a new client for the given session.
    pub fn new(session: PlatformSession) -> Self {
        let http_client = reqwest::Client::builder()
            .gzip(true)
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
            base_url: "https://api.spotify.com/v1".to_string(),
        }
    }

    /// Create a client for testing with custom base URL.
    #[cfg(test)]
    pub fn with_base_url(session: PlatformSession, base_url: impl Into<String>) -> Self {
        Self {
            session,
            http_client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    /// The authenticated user's id (also doubles as a connectivity probe).
    pub async fn current_user_id(&self) -> Result<String, PlatformError> {
        let user: dto::UserObject = self.get_json(&format!("{}/me", self.base_url)).await?;
        Ok(user.id)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
    ) -> Result<T, PlatformError> {
        let token = self.session.bearer_token()?;
        let response = self
            .http_client
            .get(url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| PlatformError::Network(e.to_string()))?;
        self.parse_response(response).await
    }

    async fn post_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        body: &serde_json::Value,
    ) -> Result<T, PlatformError> {
        let token = self.session.bearer_token()?;
        let response = self
            .http_client
            .post(url)
            .bearer_auth(token)
            .json(body)
            .send()
            .await
            .map_err(|e| PlatformError::Network(e.to_string()))?;
        self.parse_response(response).await
    }

    async fn parse_response<T: serde::de::DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, PlatformError> {
        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(PlatformError::NotAuthenticated(Platform::Spotify));
        }
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(PlatformError::QuotaExceeded(Platform::Spotify));
        }
        if !status.is_success() {
            if let Ok(body) = response.json::<dto::ApiErrorBody>().await {
                return Err(PlatformError::Api(body.error.message));
            }
            return Err(PlatformError::Network(format!(
                "HTTP {}: {}",
                status,
                status.canonical_reason().unwrap_or("Unknown")
            )));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| PlatformError::Parse(e.to_string()))
    }

    /// Build the query ladder for a title/artist pair, most specific first.
    ///
    /// When the source title does NOT name a special version, exclusion
    /// terms steer the search away from live/instrumental/remix/acoustic
    /// renditions that would be vetoed anyway.
    fn build_search_queries(title: &str, artist: &str) -> Vec<String> {
        let clean_title = canonical(title);
        let clean_artist = canonical(artist);
        let title_lower = title.to_lowercase();

        let mut exclude_terms: Vec<&str> = Vec::new();
        if !title_lower.contains("live") {
            exclude_terms.push("live");
        }
        if !title_lower.contains("instrumental") {
            exclude_terms.push("instrumental");
        }
        if !title_lower.contains("remix") && !title_lower.contains("mix") {
            exclude_terms.push("remix");
            exclude_terms.push("mix");
        }
        if !title_lower.contains("acoustic") {
            exclude_terms.push("acoustic");
        }

        let mut queries = vec![
            format!("track:\"{clean_title}\" artist:\"{clean_artist}\""),
            format!("track:{clean_title} artist:{clean_artist}"),
            format!("\"{clean_title}\" \"{clean_artist}\""),
            format!("{clean_title} {clean_artist}"),
        ];

        if !exclude_terms.is_empty() && clean_title.chars().count() > 5 {
            let minus_terms = exclude_terms
                .iter()
                .map(|t| format!("-{t}"))
                .collect::<Vec<_>>()
                .join(" ");
            queries.insert(
                0,
                format!("track:\"{clean_title}\" artist:\"{clean_artist}\" {minus_terms}"),
            );
        }

        queries
    }

    async fn run_search_query(&self, query: &str) -> Result<Vec<dto::TrackObject>, PlatformError> {
        let url = format!(
            "{}/search?q={}&type=track&limit={}",
            self.base_url,
            urlencoding::encode(query),
            SEARCH_LIMIT
        );
        let response: dto::SearchResponse = self.get_json(&url).await?;
        Ok(response.tracks.map(|page| page.items).unwrap_or_default())
    }
}

#[async_trait]
impl PlaylistApi for SpotifyClient {
    fn platform(&self) -> Platform {
        Platform::Spotify
    }

    fn batch_limit(&self) -> usize {
        PAGE_SIZE
    }

    async fn list_tracks(&self, playlist_id: &str) -> Result<Vec<Track>, PlatformError> {
        let mut tracks = Vec::new();
        let mut offset = 0usize;

        loop {
            let url = format!(
                "{}/playlists/{}/tracks?offset={}&limit={}",
                self.base_url, playlist_id, offset, PAGE_SIZE
            );
            let page: dto::Paging<dto::PlaylistTrackItem> = self.get_json(&url).await?;
            let has_next = page.next.is_some();
            let fetched = page.items.len();
            tracks.extend(adapter::to_tracks(page));

            if !has_next || fetched == 0 {
                break;
            }
            offset += fetched;
        }

        tracing::debug!(playlist = playlist_id, count = tracks.len(), "listed tracks");
        Ok(tracks)
    }

    async fn search_candidates(
        &self,
        title: &str,
        artist: &str,
    ) -> Result<Vec<MatchCandidate>, PlatformError> {
        self.session.require_auth()?;

        // Unknown artists and trivial titles produce junk matches.
        let clean_artist = canonical(artist);
        if clean_artist == "unknown artist" || canonical(title).chars().count() < 2 {
            return Ok(Vec::new());
        }

        let mut candidates: Vec<MatchCandidate> = Vec::new();
        for query in Self::build_search_queries(title, artist) {
            let items = match self.run_search_query(&query).await {
                Ok(items) => items,
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => {
                    tracing::warn!(query, error = %e, "search query failed");
                    continue;
                }
            };

            let mut found_perfect = false;
            for item in items {
                let Some(track) = adapter::to_track(item) else {
                    continue;
                };
                let confidence = classify(title, artist, &track);
                found_perfect |= confidence == Confidence::Perfect;
                candidates.push(MatchCandidate::new(track, confidence));
            }

            // Good matches found; don't burn quota on looser queries.
            if found_perfect {
                break;
            }
        }

        // De-duplicate by track id, keeping first occurrence.
        let mut seen = std::collections::HashSet::new();
        candidates.retain(|c| seen.insert(c.track.id.clone()));

        // Confidence-ordered, stable within a tier.
        candidates.sort_by_key(|c| std::cmp::Reverse(c.confidence));
        Ok(candidates)
    }

    async fn create_playlist(
        &self,
        name: &str,
        description: &str,
    ) -> Result<CreatedPlaylist, PlatformError> {
        let user_id = self.current_user_id().await?;
        let url = format!("{}/users/{}/playlists", self.base_url, user_id);
        let body = serde_json::json!({
            "name": name,
            "description": description,
            "public": false,
        });
        let playlist: dto::PlaylistObject = self.post_json(&url, &body).await?;
        tracing::info!(id = %playlist.id, name, "created playlist");
        Ok(CreatedPlaylist {
            id: playlist.id,
            name: playlist.name,
        })
    }

    async fn add_tracks(
        &self,
        playlist_id: &str,
        track_uris: &[String],
    ) -> Result<(), PlatformError> {
        if track_uris.len() > PAGE_SIZE {
            return Err(PlatformError::Api(format!(
                "batch of {} exceeds the {}-item limit",
                track_uris.len(),
                PAGE_SIZE
            )));
        }
        let url = format!("{}/playlists/{}/tracks", self.base_url, playlist_id);
        let body = serde_json::json!({ "uris": track_uris });
        let _snapshot: dto::SnapshotResponse = self.post_json(&url, &body).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_session() -> PlatformSession {
        PlatformSession::authenticated(Platform::Spotify, "test-token")
    }

    #[test]
    fn test_client_creation() {
        let client = SpotifyClient::new(test_session());
        assert_eq!(client.base_url, "https://api.spotify.com/v1");
        assert_eq!(client.batch_limit(), 100);
    }

    #[test]
    fn test_client_with_custom_url() {
        let client = SpotifyClient::with_base_url(test_session(), "http://localhost:8080");
        assert_eq!(client.base_url, "http://localhost:8080");
    }

    #[test]
    fn test_query_ladder_most_specific_first() {
        let queries = SpotifyClient::build_search_queries("Bohemian Rhapsody", "Queen");
        // Long studio title: the exclusion query leads.
        assert!(queries[0].contains("-live"));
        assert!(queries[0].contains("-remix"));
        assert!(queries[1].starts_with("track:\""));
        assert_eq!(queries.len(), 5);
    }

    #[test]
    fn test_query_ladder_keeps_requested_special_version() {
        let queries = SpotifyClient::build_search_queries("One Vision (Live)", "Queen");
        assert!(queries.iter().all(|q| !q.contains("-live")));
    }

    #[test]
    fn test_short_titles_skip_exclusion_query() {
        let queries = SpotifyClient::build_search_queries("Go", "Artist");
        assert_eq!(queries.len(), 4);
    }

    #[tokio::test]
    async fn test_unauthenticated_search_fails() {
        let client = SpotifyClient::new(PlatformSession::anonymous(Platform::Spotify));
        let result = client.search_candidates("Innuendo", "Queen").await;
        assert!(matches!(
            result,
            Err(PlatformError::NotAuthenticated(Platform::Spotify))
        ));
    }

    #[tokio::test]
    async fn test_unknown_artist_short_circuits_to_empty() {
        let client = SpotifyClient::new(test_session());
        // No HTTP call happens: junk inputs return empty before networking.
        let result = client
            .search_candidates("Innuendo", "Unknown Artist")
            .await
            .unwrap();
        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn test_oversized_batch_rejected_locally() {
        let client = SpotifyClient::new(test_session());
        let uris: Vec<String> = (0..101).map(|i| format!("spotify:track:{i}")).collect();
        let result = client.add_tracks("playlist", &uris).await;
        assert!(matches!(result, Err(PlatformError::Api(_))));
    }
}
