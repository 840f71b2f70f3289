//! Track normalization: canonicalizes raw per-platform records.
//!
//! Video-style platforms deliver tracks as a single free-text title
//! ("Rick Astley - Never Gonna Give You Up (Official Video)") uploaded by a
//! channel that may or may not be the artist. This module extracts a clean
//! title/artist pair from that noise and produces the canonical [`Track`]
//! every other component operates on.
//!
//! Canonical form for comparisons: lowercase, all non-word/non-space
//! characters stripped, whitespace collapsed, trimmed. Equality and
//! containment are never tested on raw strings.

use crate::model::{Platform, RawTrack, Track};

/// Fallback artist when extraction finds nothing usable.
pub const UNKNOWN_ARTIST: &str = "Unknown Artist";

/// Fallback album when the platform omits one.
pub const UNKNOWN_ALBUM: &str = "Unknown Album";

/// Descriptive suffixes stripped from titles (matched case-insensitively
/// inside trailing parenthesized/bracketed groups or as bare suffixes).
const DESCRIPTIVE_SUFFIXES: &[&str] = &[
    "official video",
    "official music video",
    "official audio",
    "music video",
    "lyric video",
    "lyrics",
    "audio",
    "visualizer",
    "hd",
    "4k",
];

/// Substrings suggesting a string is a song title rather than an artist name.
const SONG_TITLE_HINTS: &[&str] = &[
    "official video",
    "official audio",
    "music video",
    "lyric",
    "remix",
    "feat.",
    "ft.",
    "cover",
    "acoustic",
    "live",
];

/// Reduce a string to its canonical comparison form.
///
/// Lowercase, keep only word characters and spaces, collapse runs of
/// whitespace, trim.
pub fn canonical(s: &str) -> String {
    let lowered = s.to_lowercase();
    let filtered: String = lowered
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || c.is_whitespace())
        .collect();
    filtered.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Canonical form for title comparisons: additionally drops "feat."/"ft."
/// tokens and "and" connectives between artist names.
pub fn normalize_title(s: &str) -> String {
    let canon = canonical(s);
    let without_feat = canon
        .split_whitespace()
        .filter(|w| *w != "feat" && *w != "ft")
        .collect::<Vec<_>>()
        .join(" ");
    without_feat
        .replace(" and ", "")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Case-insensitive ASCII suffix strip. Returns the head on match.
fn strip_suffix_ci<'a>(s: &'a str, suffix: &str) -> Option<&'a str> {
    let n = s.len().checked_sub(suffix.len())?;
    if !s.is_char_boundary(n) {
        return None;
    }
    let (head, tail) = s.split_at(n);
    tail.eq_ignore_ascii_case(suffix).then_some(head)
}

/// Strip attribution noise from an artist name: a trailing "- Topic"
/// channel suffix, "VEVO", or "Official".
pub fn clean_artist(name: &str) -> String {
    let mut s = name.trim();
    if let Some(head) = strip_suffix_ci(s, "topic") {
        let head = head.trim_end();
        if let Some(before_dash) = head.strip_suffix('-') {
            s = before_dash.trim_end();
        }
    }
    for suffix in ["vevo", "official"] {
        if let Some(head) = strip_suffix_ci(s, suffix) {
            s = head.trim_end();
        }
    }
    s.to_string()
}

/// True when the channel attribution is an auto-generated artist channel
/// ("Queen - Topic"). These are authoritative for the artist name.
pub fn is_topic_channel(channel: &str) -> bool {
    strip_suffix_ci(channel.trim_end(), "topic").is_some()
}

fn contains_hint(s: &str) -> bool {
    let lower = s.to_lowercase();
    SONG_TITLE_HINTS.iter().any(|hint| lower.contains(hint))
}

/// Heuristic: does this string look like a song title rather than an
/// artist name? Keyed on descriptive substrings that never appear in
/// artist names.
pub fn looks_like_song_title(s: &str) -> bool {
    contains_hint(s)
}

/// Strip trailing descriptive groups like "(Official Video)" or "[HD]"
/// and bare descriptive suffixes from a title.
pub fn strip_descriptive_suffixes(title: &str) -> String {
    let mut s = title.trim().to_string();
    loop {
        let before = s.len();

        // Trailing parenthesized/bracketed group whose content is descriptive.
        for (open, close) in [('(', ')'), ('[', ']')] {
            if s.ends_with(close)
                && let Some(start) = s.rfind(open)
            {
                let inner = s[start + 1..s.len() - 1].trim().to_lowercase();
                if DESCRIPTIVE_SUFFIXES
                    .iter()
                    .any(|m| inner == *m || inner.contains(m))
                {
                    s.truncate(start);
                    s = s.trim_end().to_string();
                }
            }
        }

        // Bare trailing suffix, optionally preceded by a dash.
        for marker in DESCRIPTIVE_SUFFIXES.iter().copied() {
            if let Some(head) = strip_suffix_ci(&s, marker) {
                let head = head.trim_end();
                // Only strip when something precedes it; a title that IS the
                // marker ("Audio") stays intact.
                if !head.is_empty() {
                    let head = head.strip_suffix('-').unwrap_or(head).trim_end();
                    s = head.to_string();
                }
            }
        }

        if s.len() == before {
            break;
        }
    }
    s
}

/// Extract an (artist, title) pair from a single free-text field.
///
/// Tries ordered separator patterns; for the ambiguous `-` separator a
/// heuristic decides which side is the artist, retrying the split in
/// reverse when the first orientation looks wrong. Returns `None` when no
/// pattern applies.
fn split_title_field(text: &str) -> Option<(String, String)> {
    // "Artist - Title", possibly reversed when the left side reads like a
    // song title and the right side does not.
    if let Some((left, right)) = text.split_once(" - ") {
        let (left, right) = (left.trim(), right.trim());
        if !left.is_empty() && !right.is_empty() {
            if looks_like_song_title(left) && !looks_like_song_title(right) {
                return Some((right.to_string(), left.to_string()));
            }
            return Some((left.to_string(), right.to_string()));
        }
    }

    // "Artist: Title"
    if let Some((left, right)) = text.split_once(": ") {
        let (left, right) = (left.trim(), right.trim());
        if !left.is_empty() && !right.is_empty() {
            return Some((left.to_string(), right.to_string()));
        }
    }

    // "Title by Artist"
    if let Some((left, right)) = text.split_once(" by ") {
        let (left, right) = (left.trim(), right.trim());
        if !left.is_empty() && !right.is_empty() {
            return Some((right.to_string(), left.to_string()));
        }
    }

    // "Artist | Title"
    if let Some((left, right)) = text.split_once(" | ") {
        let (left, right) = (left.trim(), right.trim());
        if !left.is_empty() && !right.is_empty() {
            return Some((left.to_string(), right.to_string()));
        }
    }

    None
}

/// Parse a free-text title field into (title, artist).
///
/// Falls back to the whole (suffix-stripped) string as the title with
/// [`UNKNOWN_ARTIST`] when no separator pattern matches.
pub fn parse_title_field(text: &str) -> (String, String) {
    match split_title_field(text) {
        Some((artist, title)) => (strip_descriptive_suffixes(&title), artist),
        None => (strip_descriptive_suffixes(text), UNKNOWN_ARTIST.to_string()),
    }
}

/// Normalize a raw platform payload into the canonical [`Track`] shape.
///
/// Resolution order for the artist:
/// 1. explicit artist credits from the platform payload;
/// 2. extraction from the free-text title field;
/// 3. a "- Topic" channel attribution overrides both — it is the single
///    most reliable signal the source platform provides.
pub fn normalize(raw: RawTrack, platform: Platform) -> Track {
    let raw_title = raw.title.clone();

    let (title, mut artists) = if raw.artists.iter().any(|a| !a.trim().is_empty()) {
        let credits: Vec<String> = raw
            .artists
            .iter()
            .map(|a| a.trim().to_string())
            .filter(|a| !a.is_empty())
            .collect();
        (strip_descriptive_suffixes(&raw.title), credits)
    } else {
        let (title, artist) = parse_title_field(&raw.title);
        (title, vec![artist])
    };

    if let Some(channel) = raw.channel.as_deref()
        && is_topic_channel(channel)
    {
        artists = vec![clean_artist(channel)];
    }

    let artist = artists.join(", ");
    let title_changed = title != raw_title;

    Track {
        uri: raw.uri.unwrap_or_else(|| raw.id.clone()),
        id: raw.id,
        title,
        artist,
        artists,
        album: raw
            .album
            .filter(|a| !a.trim().is_empty())
            .unwrap_or_else(|| UNKNOWN_ALBUM.to_string()),
        raw_title: title_changed.then_some(raw_title),
        channel_attribution: raw.channel,
        platform,
    }
}
