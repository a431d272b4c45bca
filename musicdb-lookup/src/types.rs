//! Core types: queries, candidates, canonical work codes, and lookup results.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::LookupError;

/// External catalogs that musicdb-lookup can query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SourceId {
    /// JASRAC's J-WID works database. Carries authoritative work codes.
    #[serde(rename = "J-WID")]
    Jwid,
    /// NexTone's public repertoire search.
    #[serde(rename = "NexTone")]
    NexTone,
}

impl SourceId {
    /// Returns the identifier written into provenance records.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Jwid => "J-WID",
            Self::NexTone => "NexTone",
        }
    }

    /// Whether work codes from this source can be trusted as canonical.
    pub fn is_authoritative(&self) -> bool {
        matches!(self, Self::Jwid)
    }

    /// Returns all sources in default priority order.
    pub fn all() -> &'static [SourceId] {
        &[Self::Jwid, Self::NexTone]
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A song to resolve: a free-text title and an optional artist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    title: String,
    artist: Option<String>,
}

impl Query {
    /// Build a query, trimming both fields. A blank artist counts as absent.
    pub fn new(title: &str, artist: Option<&str>) -> Self {
        let artist = artist
            .map(str::trim)
            .filter(|a| !a.is_empty())
            .map(str::to_owned);
        Self {
            title: title.trim().to_owned(),
            artist,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn artist(&self) -> Option<&str> {
        self.artist.as_deref()
    }
}

/// A catalog work code in canonical `ddd-dddd-d` form.
///
/// Only constructible from text that already has the canonical shape; use
/// [`crate::normalize::normalize_work_code`] to derive one from raw catalog text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct WorkCode(String);

impl WorkCode {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn is_canonical(s: &str) -> bool {
        let bytes = s.as_bytes();
        bytes.len() == 10
            && bytes
                .iter()
                .enumerate()
                .all(|(i, b)| if i == 3 || i == 8 { *b == b'-' } else { b.is_ascii_digit() })
    }
}

impl FromStr for WorkCode {
    type Err = LookupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if Self::is_canonical(s) {
            Ok(Self(s.to_owned()))
        } else {
            Err(LookupError::Parse(format!("not a canonical work code: {s:?}")))
        }
    }
}

impl TryFrom<String> for WorkCode {
    type Error = LookupError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if Self::is_canonical(&value) {
            Ok(Self(value))
        } else {
            Err(LookupError::Parse(format!("not a canonical work code: {value:?}")))
        }
    }
}

impl From<WorkCode> for String {
    fn from(code: WorkCode) -> Self {
        code.0
    }
}

impl fmt::Display for WorkCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One source's proposed match for a query, as extracted from its HTML.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawCandidate {
    pub title: String,
    pub artist: Option<String>,
    /// Work code text as printed by the source. Absent when the hit had no
    /// code or its code did not reduce to eight digits.
    pub work_code_raw: Option<String>,
    /// Detail page for the hit, or the search page when no link was present.
    pub url: String,
    pub source: SourceId,
    pub bpm: Option<String>,
    pub key: Option<String>,
}

/// A raw candidate with its work code canonicalised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedCandidate {
    pub candidate: RawCandidate,
    pub work_code: Option<WorkCode>,
}

impl NormalizedCandidate {
    pub fn from_raw(candidate: RawCandidate) -> Self {
        let work_code = candidate
            .work_code_raw
            .as_deref()
            .and_then(crate::normalize::normalize_work_code);
        Self {
            candidate,
            work_code,
        }
    }
}

/// A normalised candidate with its match score against the query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoredCandidate {
    pub candidate: NormalizedCandidate,
    pub score: u32,
}

/// Where a lookup result came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provenance {
    pub source: SourceId,
    pub url: String,
    /// Serialized as RFC 3339 with millisecond precision (`2026-01-02T03:04:05.000Z`).
    #[serde(with = "millis_rfc3339")]
    pub fetched_at: DateTime<Utc>,
}

mod millis_rfc3339 {
    use super::*;

    pub fn serialize<S: Serializer>(at: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&at.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        DateTime::<Utc>::deserialize(deserializer)
    }
}

/// The selected best match for a query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupResult {
    pub work_code: Option<WorkCode>,
    pub bpm: Option<String>,
    pub key: Option<String>,
    /// Trust estimate in `0..=100`.
    pub confidence: u8,
    pub provenance: Provenance,
}
