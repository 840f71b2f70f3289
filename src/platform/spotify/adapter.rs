//! Adapter layer: convert Spotify DTOs to domain models.
//!
//! This is the ONLY place Spotify response shapes are interpreted. Tracks
//! with missing native references (local files, removed items) are dropped
//! here so downstream code never sees them.

use super::dto;
use crate::matching::normalize;
use crate::model::{Platform, RawTrack, Track};

/// Convert a track object into a canonical [`Track`].
///
/// Returns `None` for entries that cannot be referenced for mutation
/// (missing id or uri) - mirroring the validation the sync executor would
/// otherwise have to repeat.
pub fn to_track(track: dto::TrackObject) -> Option<Track> {
    let id = track.id?;
    let uri = track.uri?;
    if track.name.is_empty() {
        return None;
    }

    let raw = RawTrack {
        id,
        title: track.name,
        artists: track.artists.into_iter().map(|a| a.name).collect(),
        album: track.album.map(|a| a.name),
        channel: None,
        uri: Some(uri),
    };
    Some(normalize::normalize(raw, Platform::Spotify))
}

/// Convert a playlist page into tracks, dropping null/invalid entries.
pub fn to_tracks(page: dto::Paging<dto::PlaylistTrackItem>) -> Vec<Track> {
    page.items
        .into_iter()
        .filter_map(|item| item.track)
        .filter_map(to_track)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track_object(name: &str, artist: &str) -> dto::TrackObject {
        dto::TrackObject {
            id: Some("id1".into()),
            name: name.into(),
            uri: Some("spotify:track:id1".into()),
            artists: vec![dto::ArtistObject {
                name: artist.into(),
            }],
            album: Some(dto::AlbumObject {
                name: "Album".into(),
            }),
            duration_ms: Some(200_000),
        }
    }

    #[test]
    fn test_to_track_maps_fields() {
        let track = to_track(track_object("Innuendo", "Queen")).unwrap();
        assert_eq!(track.title, "Innuendo");
        assert_eq!(track.artist, "Queen");
        assert_eq!(track.platform, Platform::Spotify);
        assert_eq!(track.uri, "spotify:track:id1");
    }

    #[test]
    fn test_multi_artist_display_is_joined() {
        let mut obj = track_object("Under Pressure", "Queen");
        obj.artists.push(dto::ArtistObject {
            name: "David Bowie".into(),
        });
        let track = to_track(obj).unwrap();
        assert_eq!(track.artist, "Queen, David Bowie");
        assert_eq!(track.artists.len(), 2);
    }

    #[test]
    fn test_local_file_dropped() {
        let mut obj = track_object("Home Recording", "Me");
        obj.id = None;
        assert!(to_track(obj).is_none());
    }

    #[test]
    fn test_missing_uri_dropped() {
        let mut obj = track_object("Something", "Someone");
        obj.uri = None;
        assert!(to_track(obj).is_none());
    }
}
