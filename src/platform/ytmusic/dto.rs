//! YouTube Music companion-service Data Transfer Objects.
//!
//! The companion service (a small local HTTP sidecar wrapping the
//! unofficial YouTube Music API) is loose about field names: track ids
//! arrive as `videoId` or `id`, artists as an `artists` array of objects
//! or a bare `artist` string, albums as an object or a string. These DTOs
//! accept every observed shape; the adapter is the only place the
//! variations are resolved.

use serde::{Deserialize, Serialize};

/// A song entry from playlist listings and search results.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SongItem {
    #[serde(default, rename = "videoId")]
    pub video_id: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
    pub title: String,
    #[serde(default)]
    pub artists: Vec<NamedRef>,
    #[serde(default)]
    pub artist: Option<StringOrNamed>,
    #[serde(default)]
    pub album: Option<StringOrNamed>,
    /// Uploader channel ("Queen - Topic" for auto-generated artist channels).
    #[serde(default)]
    pub channel: Option<String>,
    #[serde(default)]
    pub duration: Option<String>,
}

/// An object carrying a `name` field.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NamedRef {
    pub name: String,
}

/// A value the service serializes either as a bare string or as `{name}`.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum StringOrNamed {
    Name(String),
    Ref(NamedRef),
}

impl StringOrNamed {
    pub fn into_name(self) -> String {
        match self {
            StringOrNamed::Name(s) => s,
            StringOrNamed::Ref(r) => r.name,
        }
    }
}

/// Response of `POST /playlist/create`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CreatePlaylistResponse {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
}

/// Response of `POST /playlist/{id}/add`.
///
/// The service reports success in several redundant ways; the client
/// accepts any of them.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AddTracksResponse {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub tracks_before: Option<u32>,
    #[serde(default)]
    pub tracks_after: Option<u32>,
    #[serde(default)]
    pub error: Option<String>,
}

impl AddTracksResponse {
    pub fn indicates_success(&self) -> bool {
        if self.success == Some(true) {
            return true;
        }
        if let (Some(before), Some(after)) = (self.tracks_before, self.tracks_after)
            && after > before
        {
            return true;
        }
        self.success.is_none() && self.error.is_none()
    }
}

/// A playlist entry from `GET /playlists`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlaylistItem {
    #[serde(default, rename = "playlistId")]
    pub playlist_id: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

// ============================================================================
// CONTRACT TESTS
// These verify our DTOs match the shapes the companion service emits.
// ============================================================================

#[cfg(test)]
mod contract_tests {
    use super::*;

    #[test]
    fn test_parse_song_with_artist_array() {
        let json = r#"{
            "videoId": "dQw4w9WgXcQ",
            "title": "Never Gonna Give You Up",
            "artists": [{"name": "Rick Astley"}],
            "album": {"name": "Whenever You Need Somebody"},
            "duration": "3:33"
        }"#;

        let song: SongItem = serde_json::from_str(json).expect("Should parse song");
        assert_eq!(song.video_id.as_deref(), Some("dQw4w9WgXcQ"));
        assert_eq!(song.artists[0].name, "Rick Astley");
    }

    #[test]
    fn test_parse_song_with_bare_artist_string() {
        let json = r#"{
            "id": "abc123",
            "title": "Some Upload",
            "artist": "Some Channel",
            "album": "Unknown Album"
        }"#;

        let song: SongItem = serde_json::from_str(json).expect("Should parse loose song");
        assert!(song.video_id.is_none());
        assert_eq!(song.id.as_deref(), Some("abc123"));
        match song.artist.unwrap() {
            StringOrNamed::Name(name) => assert_eq!(name, "Some Channel"),
            StringOrNamed::Ref(_) => panic!("expected bare string"),
        }
    }

    #[test]
    fn test_parse_minimal_song() {
        let json = r#"{"title": "Just a Title"}"#;
        let song: SongItem = serde_json::from_str(json).expect("Should parse minimal song");
        assert!(song.artists.is_empty());
        assert!(song.album.is_none());
    }

    #[test]
    fn test_add_response_success_variants() {
        let explicit: AddTracksResponse =
            serde_json::from_str(r#"{"success": true}"#).unwrap();
        assert!(explicit.indicates_success());

        let counted: AddTracksResponse =
            serde_json::from_str(r#"{"tracks_before": 10, "tracks_after": 12}"#).unwrap();
        assert!(counted.indicates_success());

        let errored: AddTracksResponse =
            serde_json::from_str(r#"{"success": false, "error": "quota"}"#).unwrap();
        assert!(!errored.indicates_success());

        let silent: AddTracksResponse = serde_json::from_str(r#"{}"#).unwrap();
        assert!(silent.indicates_success());
    }

    #[test]
    fn test_parse_playlist_item_variants() {
        let a: PlaylistItem =
            serde_json::from_str(r#"{"playlistId": "PL1", "title": "Mix"}"#).unwrap();
        assert_eq!(a.playlist_id.as_deref(), Some("PL1"));

        let b: PlaylistItem = serde_json::from_str(r#"{"id": "PL2", "name": "Other"}"#).unwrap();
        assert_eq!(b.id.as_deref(), Some("PL2"));
    }
}
