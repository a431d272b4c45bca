//! J-WID, JASRAC's public works database.
//!
//! The only catalog whose work codes are treated as authoritative. Results are
//! rendered as table rows, one work per row.

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

/// J-WID search page scraper.
#[derive(Debug)]
pub struct JwidAdapter {
    base_url: Url,
    fetcher: Arc<HttpFetcher>,
    scheduler: Arc<RateLimitedScheduler>,
}

impl JwidAdapter {
    pub fn new(base_url: Url, fetcher: Arc<HttpFetcher>, scheduler: Arc<RateLimitedScheduler>) -> Self {
        Self {
            base_url,
            fetcher,
            scheduler,
        }
    }

    /// `<base>?title=<title>[&artist=<artist>]`
    pub fn request_url(&self, query: &Query) -> Url {
        let mut url = self.base_url.clone();
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("title", query.title());
            if let Some(artist) = query.artist() {
                pairs.append_pair("artist", artist);
            }
        }
        url
    }
}

#[async_trait]
impl SourceAdapter for JwidAdapter {
    async fn search(&self, query: &Query) -> Result<Vec<RawCandidate>, LookupError> {
        let url = self.request_url(query);
        tracing::trace!(%url, "J-WID search");

        let html = self
            .scheduler
            .schedule(|| self.fetcher.fetch_html(url.as_str()))
            .await?;

        parse_jwid_html(&html, &url)
    }

    fn source(&self) -> SourceId {
        SourceId::Jwid
    }
}

/// Parse a J-WID result page into raw candidates.
///
/// Rows without a title are skipped. Work codes that do not reduce to eight
/// digits are dropped while keeping the row.
pub(crate) fn parse_jwid_html(html: &str, page_url: &Url) -> Result<Vec<RawCandidate>, LookupError> {
    let document = Html::parse_document(html);

    let row_sel = selector("table.search-results tr.result")?;
    let title_sel = selector(".title")?;
    let artist_sel = selector(".artist")?;
    let code_sel = selector(".workcode")?;
    let bpm_sel = selector(".bpm")?;
    let key_sel = selector(".key")?;
    let link_sel = selector("a.detail")?;

    let mut hits = Vec::new();

    for row in document.select(&row_sel) {
        let Some(title) = first_text(row, &title_sel) else {
            tracing::trace!("skipping J-WID row without title");
            continue;
        };

        let work_code_raw = first_text(row, &code_sel).filter(|raw| normalize_work_code(raw).is_some());

        hits.push(RawCandidate {
            title,
            artist: first_text(row, &artist_sel),
            work_code_raw,
            url: detail_url(row, &link_sel, page_url),
            source: SourceId::Jwid,
            bpm: first_text(row, &bpm_sel),
            key: first_text(row, &key_sel),
        });
    }

    tracing::debug!(count = hits.len(), "J-WID hits parsed");
    Ok(hits)
}
