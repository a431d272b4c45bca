//! Core lookup orchestrator: concurrent multi-source fan-out and selection.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, SubsecRound, Utc};

use crate::config::LookupConfig;
use crate::error::LookupError;
use crate::http::HttpFetcher;
use crate::scheduler::RateLimitedScheduler;
use crate::source::SourceAdapter;
use crate::sources::{JwidAdapter, NexToneAdapter};
use crate::types::{
    LookupResult, NormalizedCandidate, Provenance, Query, RawCandidate, ScoredCandidate, SourceId,
};

use super::scoring::{confidence, score_candidates};

/// Resolves queries against every registered source.
///
/// Build it once at startup: each adapter owns its source's scheduler, so
/// rate-limit state lives exactly as long as the orchestrator and is shared
/// by all lookups made through it.
pub struct LookupOrchestrator {
    adapters: Vec<Arc<dyn SourceAdapter>>,
}

impl LookupOrchestrator {
    /// Orchestrate over an explicit adapter list.
    ///
    /// Registration order is priority order: on equal scores the candidate
    /// from the earlier adapter wins.
    pub fn new(adapters: Vec<Arc<dyn SourceAdapter>>) -> Self {
        Self { adapters }
    }

    /// Build the default J-WID + NexTone pipeline.
    ///
    /// Creates one shared [`HttpFetcher`] and one [`RateLimitedScheduler`] per
    /// source, and injects them into the adapters.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError::Config`] if the configuration is invalid.
    pub fn from_config(config: &LookupConfig) -> Result<Self, LookupError> {
        config.validate()?;
        let fetcher = Arc::new(HttpFetcher::new(config)?);
        let adapters = SourceId::all()
            .iter()
            .map(|&source| build_adapter(source, config, Arc::clone(&fetcher)))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(adapters))
    }

    /// Registered sources, in priority order.
    pub fn sources(&self) -> Vec<SourceId> {
        self.adapters.iter().map(|a| a.source()).collect()
    }

    /// Resolve `query` to the best external match.
    ///
    /// # Pipeline
    ///
    /// 1. Spawn one task per adapter
    /// 2. Join all; failed or panicked tasks contribute no candidates
    /// 3. Concatenate candidates in registration order
    /// 4. Normalise work codes and score every candidate
    /// 5. Keep the first candidate with the strictly highest score
    /// 6. Attach confidence and provenance
    ///
    /// Returns `None` when no source produced a candidate. Never fails.
    pub async fn lookup(&self, query: &Query) -> Option<LookupResult> {
        tracing::trace!(title = query.title(), artist = query.artist(), "external lookup");

        let candidates = self.gather(query).await;
        if candidates.is_empty() {
            tracing::debug!("no external candidates");
            return None;
        }

        let normalized = candidates.into_iter().map(NormalizedCandidate::from_raw).collect();
        let winner = select_best(score_candidates(query, normalized))?;

        tracing::debug!(
            source = %winner.candidate.candidate.source,
            score = winner.score,
            has_code = winner.candidate.work_code.is_some(),
            "selected best candidate"
        );

        Some(build_result(winner, Utc::now().trunc_subsecs(3)))
    }

    async fn gather(&self, query: &Query) -> Vec<RawCandidate> {
        let tasks = self.adapters.iter().map(|adapter| {
            let adapter = Arc::clone(adapter);
            let query = query.clone();
            tokio::spawn(async move { adapter.search(&query).await })
        });

        let outcomes = futures::future::join_all(tasks).await;

        let mut candidates = Vec::new();
        for (adapter, outcome) in self.adapters.iter().zip(outcomes) {
            let source = adapter.source();
            match outcome {
                Ok(Ok(hits)) => {
                    tracing::debug!(%source, count = hits.len(), "source returned candidates");
                    candidates.extend(hits);
                }
                Ok(Err(err)) => {
                    tracing::warn!(%source, error = %err, "source lookup failed");
                }
                Err(err) => {
                    tracing::warn!(%source, error = %err, "source task aborted");
                }
            }
        }
        candidates
    }
}

impl fmt::Debug for LookupOrchestrator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LookupOrchestrator")
            .field("sources", &self.sources())
            .finish()
    }
}

fn build_adapter(
    source: SourceId,
    config: &LookupConfig,
    fetcher: Arc<HttpFetcher>,
) -> Result<Arc<dyn SourceAdapter>, LookupError> {
    let section = config.source(source);
    let base_url = section.base_url(source)?;
    let scheduler = Arc::new(RateLimitedScheduler::new(source, section.rate_limit));
    let adapter: Arc<dyn SourceAdapter> = match source {
        SourceId::Jwid => Arc::new(JwidAdapter::new(base_url, fetcher, scheduler)),
        SourceId::NexTone => Arc::new(NexToneAdapter::new(base_url, fetcher, scheduler)),
    };
    Ok(adapter)
}

/// First candidate with the strictly highest score.
pub(crate) fn select_best(candidates: Vec<ScoredCandidate>) -> Option<ScoredCandidate> {
    candidates
        .into_iter()
        .reduce(|best, next| if next.score > best.score { next } else { best })
}

pub(crate) fn build_result(winner: ScoredCandidate, fetched_at: DateTime<Utc>) -> LookupResult {
    let ScoredCandidate { candidate, score } = winner;
    let NormalizedCandidate {
        candidate: raw,
        work_code,
    } = candidate;

    LookupResult {
        confidence: confidence(raw.source, work_code.is_some(), score),
        work_code,
        bpm: raw.bpm,
        key: raw.key,
        provenance: Provenance {
            source: raw.source,
            url: raw.url,
            fetched_at,
        },
    }
}
