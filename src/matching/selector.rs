//! Deterministic best-match selection among classified candidates.
//!
//! When several candidates share a tier, a weighted similarity score picks
//! the winner: title is worth 60 points, artist 40, plus a small bonus for
//! the already-assigned confidence tier. Ties resolve to the earliest
//! candidate in list order, so selection is reproducible run to run.

use crate::matching::normalize::{canonical, clean_artist};
use crate::model::{Confidence, MatchCandidate, Track};

/// Weighted similarity score between a source track and a candidate.
///
/// Title component: 60 exact / 40 containment / up to 30 proportional to
/// shared significant words. Artist component: 40 exact-or-containment
/// after attribution-suffix stripping / 20 partial word overlap. Tier
/// bonus: +10 perfect, +5 good.
pub fn detailed_score(source: &Track, candidate: &MatchCandidate) -> f32 {
    let mut score = 0.0f32;

    let source_title = canonical(&source.title);
    let candidate_title = canonical(&candidate.track.title);

    if !source_title.is_empty() && source_title == candidate_title {
        score += 60.0;
    } else if !source_title.is_empty()
        && !candidate_title.is_empty()
        && (candidate_title.contains(&source_title) || source_title.contains(&candidate_title))
    {
        score += 40.0;
    } else {
        let source_words: Vec<&str> = source_title.split_whitespace().collect();
        let candidate_words: Vec<&str> = candidate_title.split_whitespace().collect();
        let common = source_words
            .iter()
            .filter(|w| {
                w.chars().count() > 2
                    && candidate_words
                        .iter()
                        .any(|cw| cw.contains(**w) || w.contains(cw))
            })
            .count();
        if !source_words.is_empty() {
            score += (common as f32 / source_words.len() as f32 * 30.0).min(30.0);
        }
    }

    let source_artist = canonical(&clean_artist(&source.artist));
    let credits: Vec<String> = candidate
        .track
        .credits()
        .iter()
        .map(|a| canonical(&clean_artist(a)))
        .collect();

    let artist_match = !source_artist.is_empty()
        && credits.iter().any(|c| {
            *c == source_artist
                || (!c.is_empty() && (c.contains(&source_artist) || source_artist.contains(c)))
        });

    if artist_match {
        score += 40.0;
    } else {
        let artist_words: Vec<&str> = source_artist.split_whitespace().collect();
        let partial = credits.iter().any(|c| {
            artist_words
                .iter()
                .any(|w| w.chars().count() > 2 && c.contains(*w))
        });
        if partial {
            score += 20.0;
        }
    }

    match candidate.confidence {
        Confidence::Perfect => score += 10.0,
        Confidence::Good => score += 5.0,
        _ => {}
    }

    score
}

/// Pick the highest-scoring candidate.
///
/// Deterministic: equal scores resolve to the candidate appearing first in
/// the input list. Returns the winner with its score filled in.
pub fn select_best(candidates: &[MatchCandidate], source: &Track) -> Option<MatchCandidate> {
    if candidates.len() == 1 {
        let mut only = candidates[0].clone();
        only.score = Some(detailed_score(source, &only));
        return Some(only);
    }

    let mut best: Option<(f32, &MatchCandidate)> = None;
    for candidate in candidates {
        let score = detailed_score(source, candidate);
        match best {
            // Strictly-greater keeps the earliest candidate on ties.
            Some((best_score, _)) if score <= best_score => {}
            _ => best = Some((score, candidate)),
        }
    }

    best.map(|(score, candidate)| {
        let mut winner = candidate.clone();
        winner.score = Some(score);
        winner
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{candidate, source_track};

    #[test]
    fn test_exact_title_and_artist_scores_highest() {
        let source = source_track("Bohemian Rhapsody", "Queen");
        let exact = candidate("Bohemian Rhapsody", "Queen", Confidence::Perfect);
        let partial = candidate("Bohemian Rhapsody Medley", "Queen", Confidence::Good);
        assert!(detailed_score(&source, &exact) > detailed_score(&source, &partial));
    }

    #[test]
    fn test_tier_bonus_breaks_similarity_ties() {
        let source = source_track("One Vision", "Queen");
        let good = candidate("One Vision", "Queen", Confidence::Good);
        let perfect = candidate("One Vision", "Queen", Confidence::Perfect);
        assert_eq!(
            detailed_score(&source, &perfect) - detailed_score(&source, &good),
            5.0
        );
    }

    #[test]
    fn test_select_best_is_deterministic() {
        let source = source_track("Radio Ga Ga", "Queen");
        let candidates = vec![
            candidate("Radio Ga Ga", "Queen", Confidence::Perfect),
            candidate("Radio Ga Ga", "Queen Tribute", Confidence::Perfect),
            candidate("Radio Ga Ga Extended", "Queen", Confidence::Good),
        ];
        let first = select_best(&candidates, &source).unwrap();
        let second = select_best(&candidates, &source).unwrap();
        assert_eq!(first.track, second.track);
        assert_eq!(first.track.title, "Radio Ga Ga");
        assert_eq!(first.track.artist, "Queen");
    }

    #[test]
    fn test_ties_resolve_to_first_in_list_order() {
        let source = source_track("Innuendo", "Queen");
        let a = candidate("Innuendo", "Queen", Confidence::Perfect);
        let mut b = candidate("Innuendo", "Queen", Confidence::Perfect);
        b.track.id = "other-id".into();
        let winner = select_best(&[a.clone(), b], &source).unwrap();
        assert_eq!(winner.track.id, a.track.id);
    }

    #[test]
    fn test_empty_candidate_list_yields_none() {
        let source = source_track("Innuendo", "Queen");
        assert!(select_best(&[], &source).is_none());
    }

    #[test]
    fn test_winner_carries_its_score() {
        let source = source_track("Innuendo", "Queen");
        let winner = select_best(
            &[candidate("Innuendo", "Queen", Confidence::Perfect)],
            &source,
        )
        .unwrap();
        assert_eq!(winner.score, Some(110.0));
    }

    #[test]
    fn test_shared_word_scoring_for_unrelated_titles() {
        let source = source_track("The Show Must Go On", "Queen");
        let some_overlap = candidate("Show Me How", "Queen", Confidence::Partial);
        let no_overlap = candidate("Zz", "Queen", Confidence::Partial);
        assert!(
            detailed_score(&source, &some_overlap) > detailed_score(&source, &no_overlap),
            "shared significant words should contribute"
        );
    }
}
