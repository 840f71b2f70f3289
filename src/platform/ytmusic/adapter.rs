//! Adapter layer: convert companion-service DTOs to domain models.
//!
//! Resolves the service's loose field shapes (videoId/id, artists/artist,
//! object/string albums) into [`RawTrack`]s and hands them to the
//! normalizer, which does the actual free-text title/artist extraction and
//! Topic-channel resolution.

use super::dto;
use crate::matching::{canonical, normalize};
use crate::model::{Platform, Track};

/// Convert a song entry into a canonical [`Track`].
///
/// Entries without any usable id are dropped.
pub fn to_track(song: dto::SongItem) -> Option<Track> {
    let id = song.video_id.or(song.id).filter(|s| !s.is_empty())?;

    let mut artists: Vec<String> = song.artists.into_iter().map(|a| a.name).collect();
    if artists.is_empty()
        && let Some(artist) = song.artist
    {
        let name = artist.into_name();
        if !name.trim().is_empty() {
            artists.push(name);
        }
    }

    let raw = crate::model::RawTrack {
        uri: Some(id.clone()),
        id,
        title: song.title,
        artists,
        album: song.album.map(|a| a.into_name()),
        channel: song.channel,
    };
    Some(normalize::normalize(raw, Platform::YoutubeMusic))
}

/// Convert a list of song entries, dropping invalid ones.
pub fn to_tracks(songs: Vec<dto::SongItem>) -> Vec<Track> {
    songs.into_iter().filter_map(to_track).collect()
}

/// Order search results by artist relevance for the requested artist:
/// exact canonical matches first, containment matches next, everything
/// else after, preserving the service's order within each band.
pub fn sort_by_artist_priority(tracks: &mut [Track], artist: &str) {
    let wanted = canonical(artist);

    let rank = |track: &Track| -> u8 {
        let candidate = canonical(&track.artist);
        if !wanted.is_empty() && candidate == wanted {
            0
        } else if !wanted.is_empty()
            && !candidate.is_empty()
            && (candidate.contains(&wanted) || wanted.contains(&candidate))
        {
            1
        } else {
            2
        }
    };

    tracks.sort_by_key(rank);
}
