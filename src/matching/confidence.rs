//! Confidence classification of a candidate track against a source track.
//!
//! The classifier is deliberately string-based: the platforms disagree on
//! punctuation, featuring credits, and artist attribution, so all
//! comparisons run on canonical forms. A special-version keyword acts as a
//! hard veto — a "(Live)" or remix candidate never matches a studio
//! source, no matter how similar the titles are.

use crate::matching::normalize::{canonical, clean_artist, normalize_title};
use crate::model::{Confidence, Track};

/// Keywords marking a special version of a recording. A candidate title
/// containing one of these that the source title lacks is vetoed outright.
pub const SPECIAL_VERSION_KEYWORDS: &[&str] = &[
    "live",
    "instrumental",
    "remix",
    "acoustic",
    "cover",
    "edit",
    "version",
    "mix",
    "radio edit",
    "remastered",
];

/// Word-boundary containment check for short keywords like "mix" that
/// would otherwise fire inside "remix".
fn contains_word(haystack: &str, needle: &str) -> bool {
    let chars: Vec<char> = haystack.chars().collect();
    let needle_chars: Vec<char> = needle.chars().collect();
    let n = needle_chars.len();
    if n == 0 || chars.len() < n {
        return false;
    }
    let is_word = |c: char| c.is_alphanumeric() || c == '_';
    for start in 0..=chars.len() - n {
        if chars[start..start + n] != needle_chars[..] {
            continue;
        }
        let before_ok = start == 0 || !is_word(chars[start - 1]);
        let after_ok = start + n == chars.len() || !is_word(chars[start + n]);
        if before_ok && after_ok {
            return true;
        }
    }
    false
}

/// Per-title flags for each special-version keyword.
///
/// `strict` applies the candidate-side nuances: "edit" must not come from
/// "edited", and a bare "mix" must not come from "remix".
fn version_flag(title: &str, keyword: &str, strict: bool) -> bool {
    match keyword {
        "edit" => {
            if strict {
                title.contains("edit") && !title.contains("edited")
            } else {
                title.contains("edit")
            }
        }
        "mix" => {
            if strict {
                contains_word(title, "mix") && !title.contains("remix")
            } else {
                contains_word(title, "mix")
            }
        }
        "radio edit" => title.contains("radio edit") || title.contains("radio version"),
        "remastered" => title.contains("remaster"),
        _ => title.contains(keyword),
    }
}

/// Returns the first special-version keyword present in the candidate
/// title but absent from the source title, if any.
pub fn special_version_conflict(source_title: &str, candidate_title: &str) -> Option<&'static str> {
    let source = source_title.to_lowercase();
    let candidate = candidate_title.to_lowercase();
    SPECIAL_VERSION_KEYWORDS
        .iter()
        .copied()
        .find(|kw| version_flag(&candidate, kw, true) && !version_flag(&source, kw, false))
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

fn len_diff(a: &str, b: &str) -> usize {
    char_len(a).abs_diff(char_len(b))
}

fn contains_either(a: &str, b: &str) -> bool {
    !a.is_empty() && !b.is_empty() && (a.contains(b) || b.contains(a))
}

/// Classify a candidate against a source title/artist pair.
///
/// Tier rules, in order:
/// 1. special-version veto → `Poor`;
/// 2. exact title + exact artist → `Perfect`;
/// 3. strong containment (length-guarded) counts as exact, so
///    strong+strong and exact+strong also yield `Perfect`;
/// 4. exact-one-field + weak-partial-other, or weak+weak → `Good`;
/// 5. any single field matching → `Partial`;
/// 6. nothing matches → `Poor`.
pub fn classify(source_title: &str, source_artist: &str, candidate: &Track) -> Confidence {
    if let Some(keyword) = special_version_conflict(source_title, &candidate.title) {
        tracing::debug!(
            candidate = %candidate.title,
            source = %source_title,
            keyword,
            "rejecting special-version candidate"
        );
        return Confidence::Poor;
    }

    let source_norm = normalize_title(source_title);
    let candidate_norm = normalize_title(&candidate.title);
    let title_exact = !source_norm.is_empty() && source_norm == candidate_norm;
    let title_partial = contains_either(&source_norm, &candidate_norm);
    let strong_title = title_exact
        || (title_partial
            && char_len(&source_norm) > 3
            && char_len(&candidate_norm) > 3
            && len_diff(&source_norm, &candidate_norm) <= 3);

    let source_credit = canonical(&clean_artist(source_artist));
    let credits: Vec<String> = candidate
        .credits()
        .iter()
        .map(|a| canonical(&clean_artist(a)))
        .collect();

    let artist_exact = !source_credit.is_empty() && credits.iter().any(|c| *c == source_credit);
    let artist_partial = credits.iter().any(|c| contains_either(c, &source_credit));
    let strong_artist = artist_exact
        || credits.iter().any(|c| {
            contains_either(c, &source_credit)
                && char_len(c) > 2
                && char_len(&source_credit) > 2
                && len_diff(c, &source_credit) <= 5
        });

    if title_exact && artist_exact {
        return Confidence::Perfect;
    }
    if strong_title && strong_artist {
        return Confidence::Perfect;
    }
    if (title_exact && strong_artist) || (artist_exact && strong_title) {
        return Confidence::Perfect;
    }
    if (title_exact && artist_partial) || (artist_exact && title_partial) {
        return Confidence::Good;
    }
    if title_partial && artist_partial {
        return Confidence::Good;
    }
    if title_exact || artist_exact || title_partial || artist_partial {
        return Confidence::Partial;
    }
    Confidence::Poor
}
