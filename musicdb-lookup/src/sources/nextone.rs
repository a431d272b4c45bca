//! NexTone repertoire search.
//!
//! Results are rendered as a list of `.result-item` blocks. Codes printed here
//! are used when present, but NexTone is not treated as authoritative.

use std::sync::Arc;

use async_trait::async_trait;
use scraper::Html;
use url::Url;

use super::{detail_url, first_text, selector};
use crate::error::LookupError;
use crate::http::HttpFetcher;
use crate::normalize::normalize_work_code;
use crate::scheduler::RateLimitedScheduler;
use crate::source::SourceAdapter;
use crate::types::{Query, RawCandidate, SourceId};

/// NexTone search page scraper.
#[derive(Debug)]
pub struct NexToneAdapter {
    base_url: Url,
    fetcher: Arc<HttpFetcher>,
    scheduler: Arc<RateLimitedScheduler>,
}

impl NexToneAdapter {
    pub fn new(base_url: Url, fetcher: Arc<HttpFetcher>, scheduler: Arc<RateLimitedScheduler>) -> Self {
        Self {
            base_url,
            fetcher,
            scheduler,
        }
    }

    /// `<base>?keyword=<title>[&artist=<artist>]`
    pub fn request_url(&self, query: &Query) -> Url {
        let mut url = self.base_url.clone();
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("keyword", query.title());
            if let Some(artist) = query.artist() {
                pairs.append_pair("artist", artist);
            }
        }
        url
    }
}

#[async_trait]
impl SourceAdapter for NexToneAdapter {
    async fn search(&self, query: &Query) -> Result<Vec<RawCandidate>, LookupError> {
        let url = self.request_url(query);
        tracing::trace!(%url, "NexTone search");

        let html = self
            .scheduler
            .schedule(|| self.fetcher.fetch_html(url.as_str()))
            .await?;

        parse_nextone_html(&html, &url)
    }

    fn source(&self) -> SourceId {
        SourceId::NexTone
    }
}

/// Parse a NexTone result page into raw candidates.
pub(crate) fn parse_nextone_html(html: &str, page_url: &Url) -> Result<Vec<RawCandidate>, LookupError> {
    let document = Html::parse_document(html);

    let item_sel = selector(".result-item")?;
    let title_sel = selector(".title")?;
    let artist_sel = selector(".artist")?;
    let code_sel = selector(".code")?;
    let bpm_sel = selector(".bpm")?;
    let key_sel = selector(".key")?;
    let link_sel = selector("a")?;

    let hits: Vec<RawCandidate> = document
        .select(&item_sel)
        .filter_map(|item| {
            let title = first_text(item, &title_sel)?;
            Some(RawCandidate {
                title,
                artist: first_text(item, &artist_sel),
                work_code_raw: first_text(item, &code_sel)
                    .filter(|raw| normalize_work_code(raw).is_some()),
                url: detail_url(item, &link_sel, page_url),
                source: SourceId::NexTone,
                bpm: first_text(item, &bpm_sel),
                key: first_text(item, &key_sel),
            })
        })
        .collect();

    tracing::debug!(count = hits.len(), "NexTone hits parsed");
    Ok(hits)
}
