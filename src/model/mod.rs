//! Core data models for playlist reconciliation.
//!
//! Defines the canonical entities the engine operates on: [`Track`],
//! [`MatchCandidate`], and the [`Confidence`] tiers. Raw per-platform
//! payloads are converted into [`Track`] exclusively by the normalizer
//! ([`crate::matching::normalize`]); no downstream component branches on
//! platform-specific shapes.
//!
//! These are request-scoped value objects: constructed fresh per
//! preview/execute call and discarded after the caller consumes them.

use serde::{Deserialize, Serialize};

/// A music platform participating in a sync.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Platform {
    Spotify,
    YoutubeMusic,
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Platform::Spotify => write!(f, "Spotify"),
            Platform::YoutubeMusic => write!(f, "YouTube Music"),
        }
    }
}

/// Confidence tier for a candidate track matched against a source track.
///
/// Ordered: `Poor < Partial < Good < Perfect`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    Poor,
    Partial,
    Good,
    Perfect,
}

/// A canonical track record.
///
/// Produced by the normalizer from raw platform payloads and immutable
/// thereafter. `uri` is the platform-native reference used for mutation
/// calls (a `spotify:track:` URI, a YouTube video id).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    /// Platform-native identifier.
    pub id: String,
    /// Track title.
    pub title: String,
    /// Display artist; several names joined with ", " for collaborations.
    pub artist: String,
    /// Individual artist credits when the platform provides them.
    #[serde(default)]
    pub artists: Vec<String>,
    /// Album title ("Unknown Album" when the platform omits it).
    pub album: String,
    /// Original free-text title before artist/title extraction (provenance).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_title: Option<String>,
    /// Uploader/channel the record was attributed to (provenance).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel_attribution: Option<String>,
    /// Which platform this track lives on.
    pub platform: Platform,
    /// Native reference for mutation calls.
    pub uri: String,
}

impl Track {
    /// Individual artist credits, falling back to the display artist when
    /// the platform only supplied a single joined string.
    pub fn credits(&self) -> Vec<&str> {
        if self.artists.is_empty() {
            vec![self.artist.as_str()]
        } else {
            self.artists.iter().map(String::as_str).collect()
        }
    }
}

/// A raw per-platform track payload, before normalization.
///
/// Adapters map provider DTOs into this shape; the normalizer turns it
/// into a [`Track`]. The `title` may be a single free-text field embedding
/// the artist ("Artist - Title (Official Video)").
#[derive(Debug, Clone, Default)]
pub struct RawTrack {
    pub id: String,
    pub title: String,
    /// Artist credits, possibly empty for free-text-only platforms.
    pub artists: Vec<String>,
    pub album: Option<String>,
    /// Uploader/channel attribution ("Queen - Topic").
    pub channel: Option<String>,
    /// Native reference; defaults to `id` when absent.
    pub uri: Option<String>,
}

/// A destination-side track paired with a confidence tier.
///
/// Produced transiently during candidate classification; never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchCandidate {
    pub track: Track,
    pub confidence: Confidence,
    /// Weighted similarity score, filled in by the best-match selector.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f32>,
}

impl MatchCandidate {
    pub fn new(track: Track, confidence: Confidence) -> Self {
        Self {
            track,
            confidence,
            score: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confidence_ordering() {
        assert!(Confidence::Perfect > Confidence::Good);
        assert!(Confidence::Good > Confidence::Partial);
        assert!(Confidence::Partial > Confidence::Poor);
    }

    #[test]
    fn test_credits_fall_back_to_display_artist() {
        let track = Track {
            id: "t1".into(),
            title: "Song".into(),
            artist: "Queen".into(),
            artists: vec![],
            album: "Album".into(),
            raw_title: None,
            channel_attribution: None,
            platform: Platform::YoutubeMusic,
            uri: "t1".into(),
        };
        assert_eq!(track.credits(), vec!["Queen"]);
    }

    #[test]
    fn test_credits_prefer_individual_names() {
        let track = Track {
            id: "t2".into(),
            title: "Under Pressure".into(),
            artist: "Queen, David Bowie".into(),
            artists: vec!["Queen".into(), "David Bowie".into()],
            album: "Hot Space".into(),
            raw_title: None,
            channel_attribution: None,
            platform: Platform::Spotify,
            uri: "spotify:track:t2".into(),
        };
        assert_eq!(track.credits(), vec!["Queen", "David Bowie"]);
    }

    #[test]
    fn test_confidence_serializes_lowercase() {
        let json = serde_json::to_string(&Confidence::Perfect).unwrap();
        assert_eq!(json, "\"perfect\"");
    }
}
