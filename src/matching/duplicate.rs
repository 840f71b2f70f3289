//! Duplicate detection against the destination collection.
//!
//! Runs before any external search call: a source track already present in
//! the destination playlist needs no candidate search at all. Checks run
//! per destination track, cheapest first — exact canonical equality, then
//! length-guarded containment, then the full classifier.

use std::collections::HashSet;

use crate::matching::confidence::classify;
use crate::matching::normalize::canonical;
use crate::model::{Confidence, Track};

/// Find a destination track that already represents the source track.
///
/// Iterates the destination list in its natural order; the first hit wins.
pub fn find_existing<'a>(source: &Track, destination: &'a [Track]) -> Option<&'a Track> {
    let source_title = canonical(&source.title);
    let source_artist = canonical(&source.artist);

    for dest in destination {
        let dest_title = canonical(&dest.title);

        // Exact canonical title + artist.
        let title_eq = !source_title.is_empty() && source_title == dest_title;
        let artist_eq = dest
            .credits()
            .iter()
            .any(|a| !source_artist.is_empty() && canonical(a) == source_artist);
        if title_eq && artist_eq {
            tracing::debug!(source = %source.title, existing = %dest.title, "exact duplicate");
            return Some(dest);
        }

        // Strong containment on both fields, with minimum-length guards so
        // trivial fragments don't collide.
        let title_partial = !source_title.is_empty()
            && !dest_title.is_empty()
            && (source_title.contains(&dest_title) || dest_title.contains(&source_title));
        let artist_partial = dest.credits().iter().any(|a| {
            let c = canonical(a);
            !c.is_empty()
                && !source_artist.is_empty()
                && (c.contains(&source_artist) || source_artist.contains(&c))
        });
        if title_partial
            && artist_partial
            && source_title.chars().count() > 3
            && dest_title.chars().count() > 3
            && source_artist.chars().count() > 3
        {
            tracing::debug!(source = %source.title, existing = %dest.title, "containment duplicate");
            return Some(dest);
        }

        // Close variation: let the classifier have the final word.
        if classify(&source.title, &source.artist, dest) >= Confidence::Good {
            tracing::debug!(source = %source.title, existing = %dest.title, "classifier duplicate");
            return Some(dest);
        }
    }

    None
}

/// Scan a single playlist for internal duplicates.
///
/// Key is canonical title + artist credits; the first occurrence is kept
/// and the URIs of later occurrences are returned.
pub fn find_playlist_duplicates(tracks: &[Track]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut duplicates = Vec::new();

    for track in tracks {
        let mut key = canonical(&track.title);
        for credit in track.credits() {
            key.push('-');
            key.push_str(&canonical(credit));
        }
        if !seen.insert(key) {
            duplicates.push(track.uri.clone());
        }
    }

    duplicates
}
