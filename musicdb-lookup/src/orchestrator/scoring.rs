//! Match scoring and confidence estimation.
//!
//! Each candidate earns three independent, all-or-nothing components:
//!
//! ```text
//! title      60  normalised titles are substrings of each other
//! artist     25  normalised artists are substrings of each other (query has an artist)
//!            10  flat, when the query has no artist
//! work code  30  candidate carries a normalisable code
//! ```
//!
//! The maximum is therefore 115.

use crate::normalize::normalize_text;
use crate::types::{NormalizedCandidate, Query, ScoredCandidate, SourceId};

pub const TITLE_POINTS: u32 = 60;
pub const ARTIST_POINTS: u32 = 25;
pub const NO_ARTIST_POINTS: u32 = 10;
pub const WORK_CODE_POINTS: u32 = 30;
pub const MAX_SCORE: u32 = TITLE_POINTS + ARTIST_POINTS + WORK_CODE_POINTS;

/// Winning scores above this earn [`HIGH_SCORE_BONUS`].
pub const HIGH_SCORE_THRESHOLD: u32 = 70;
pub const HIGH_SCORE_BONUS: u8 = 5;
/// Base confidence for an authoritative source that yielded a code.
pub const AUTHORITATIVE_CONFIDENCE: u8 = 95;
pub const DEFAULT_CONFIDENCE: u8 = 80;

/// Normalised query text, computed once per lookup.
struct QueryKey {
    title: String,
    artist: Option<String>,
}

impl QueryKey {
    fn new(query: &Query) -> Self {
        Self {
            title: normalize_text(query.title()),
            artist: query.artist().map(normalize_text).filter(|a| !a.is_empty()),
        }
    }

    fn score(&self, candidate: &NormalizedCandidate) -> u32 {
        let raw = &candidate.candidate;

        let title = if mutual_substring(&self.title, &normalize_text(&raw.title)) {
            TITLE_POINTS
        } else {
            0
        };

        let artist = match &self.artist {
            Some(wanted) => {
                let found = normalize_text(raw.artist.as_deref().unwrap_or_default());
                if mutual_substring(wanted, &found) {
                    ARTIST_POINTS
                } else {
                    0
                }
            }
            None => NO_ARTIST_POINTS,
        };

        let code = if candidate.work_code.is_some() {
            WORK_CODE_POINTS
        } else {
            0
        };

        title + artist + code
    }
}

fn mutual_substring(a: &str, b: &str) -> bool {
    a.contains(b) || b.contains(a)
}

/// Score a single candidate against `query`.
pub fn score_candidate(query: &Query, candidate: &NormalizedCandidate) -> u32 {
    QueryKey::new(query).score(candidate)
}

/// Score every candidate, preserving input order.
pub fn score_candidates(query: &Query, candidates: Vec<NormalizedCandidate>) -> Vec<ScoredCandidate> {
    let key = QueryKey::new(query);
    candidates
        .into_iter()
        .map(|candidate| ScoredCandidate {
            score: key.score(&candidate),
            candidate,
        })
        .collect()
}

/// Estimate how far the winning candidate's data can be trusted.
///
/// ```text
/// base  = 95 if source is authoritative and a code was recovered, else 80
/// bonus = 5 if score > 70, else 0
/// confidence = min(base + bonus, 100)
/// ```
pub fn confidence(source: SourceId, has_work_code: bool, score: u32) -> u8 {
    let base = if source.is_authoritative() && has_work_code {
        AUTHORITATIVE_CONFIDENCE
    } else {
        DEFAULT_CONFIDENCE
    };
    let bonus = if score > HIGH_SCORE_THRESHOLD {
        HIGH_SCORE_BONUS
    } else {
        0
    };
    base.saturating_add(bonus).min(100)
}
