//! Spotify Web API Data Transfer Objects.
//!
//! These types match EXACTLY what the Spotify Web API returns.
//! DO NOT add fields that aren't in the API response.
//! DO NOT use these types outside the spotify module - convert to domain
//! types via the adapter.
//!
//! API Reference: https://developer.spotify.com/documentation/web-api

use serde::{Deserialize, Serialize};

/// Generic paging envelope used by playlist tracks and search results.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Paging<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
    pub total: Option<u32>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
    /// URL of the next page, if any.
    pub next: Option<String>,
}

/// One entry of a playlist's track listing.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlaylistTrackItem {
    /// Null for removed tracks and non-track items (episodes).
    pub track: Option<TrackObject>,
}

/// A track object.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TrackObject {
    /// Null for local files.
    pub id: Option<String>,
    pub name: String,
    pub uri: Option<String>,
    #[serde(default)]
    pub artists: Vec<ArtistObject>,
    pub album: Option<AlbumObject>,
    pub duration_ms: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ArtistObject {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AlbumObject {
    pub name: String,
}

/// Response of `GET /search?type=track`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchResponse {
    pub tracks: Option<Paging<TrackObject>>,
}

/// Response of playlist creation / lookup.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlaylistObject {
    pub id: String,
    pub name: String,
}

/// Response of `GET /me`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UserObject {
    pub id: String,
}

/// Response of `POST /playlists/{id}/tracks`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SnapshotResponse {
    pub snapshot_id: String,
}

/// Error envelope returned by the API.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiErrorBody {
    pub error: ApiErrorDetail,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiErrorDetail {
    pub status: u16,
    pub message: String,
}

// ============================================================================
// CONTRACT TESTS
// These verify our DTOs match what the real API returns.
// If these fail, the API has changed and we need to update our DTOs.
// ============================================================================
