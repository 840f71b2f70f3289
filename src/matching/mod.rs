//! Track matching engine.
//!
//! Turns noisy, inconsistently-formatted track metadata into deterministic,
//! explainable match decisions:
//! - **Normalization** (`normalize`) - canonical [`crate::model::Track`]s
//!   out of raw platform payloads, free-text title/artist extraction.
//! - **Classification** (`confidence`) - a candidate scored against a
//!   source track into {perfect, good, partial, poor}.
//! - **Selection** (`selector`) - deterministic ranking of same-tier
//!   candidates via a weighted similarity score.
//! - **Duplicate detection** (`duplicate`) - short-circuits search when
//!   the destination already holds the track.

pub mod confidence;
pub mod duplicate;
pub mod normalize;
pub mod selector;

pub use confidence::{SPECIAL_VERSION_KEYWORDS, classify};
pub use duplicate::{find_existing, find_playlist_duplicates};
pub use normalize::{canonical, clean_artist, normalize};
pub use selector::{detailed_score, select_best};
