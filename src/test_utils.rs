//! Test fixtures shared across tunesync tests.
//!
//! Provides mock-track factories so individual tests don't repeat the full
//! [`Track`] construction boilerplate. Customize with struct update syntax:
//!
//! ```ignore
//! let track = Track { album: "Custom".into(), ..dest_track("Title", "Artist") };
//! ```

use crate::model::{Confidence, MatchCandidate, Platform, Track};

/// A source-side (YouTube Music) track with sensible defaults.
pub fn source_track(title: &str, artist: &str) -> Track {
    Track {
        id: format!("yt-{}", slug(title)),
        title: title.to_string(),
        artist: artist.to_string(),
        artists: vec![artist.to_string()],
        album: "Test Album".to_string(),
        raw_title: None,
        channel_attribution: None,
        platform: Platform::YoutubeMusic,
        uri: format!("yt-{}", slug(title)),
    }
}

/// A destination-side (Spotify) track with sensible defaults.
pub fn dest_track(title: &str, artist: &str) -> Track {
    let id = format!("sp-{}", slug(title));
    Track {
        uri: format!("spotify:track:{}", id),
        id,
        title: title.to_string(),
        artist: artist.to_string(),
        artists: vec![artist.to_string()],
        album: "Test Album".to_string(),
        raw_title: None,
        channel_attribution: None,
        platform: Platform::Spotify,
    }
}

/// A destination-side candidate at the given confidence tier.
pub fn candidate(title: &str, artist: &str, confidence: Confidence) -> MatchCandidate {
    MatchCandidate::new(dest_track(title, artist), confidence)
}

fn slug(s: &str) -> String {
    s.to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '-' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factories_produce_distinct_platforms() {
        assert_eq!(source_track("A", "B").platform, Platform::YoutubeMusic);
        assert_eq!(dest_track("A", "B").platform, Platform::Spotify);
    }

    #[test]
    fn test_dest_track_uri_is_spotify_shaped() {
        assert!(dest_track("A", "B").uri.starts_with("spotify:track:"));
    }
}
