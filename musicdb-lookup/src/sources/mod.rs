//! Catalog source implementations.
//!
//! Each module provides a struct implementing [`crate::source::SourceAdapter`]
//! that scrapes one catalog's HTML search results.

pub mod jwid;
pub mod nextone;

pub use jwid::JwidAdapter;
pub use nextone::NexToneAdapter;

use scraper::{ElementRef, Selector};
use url::Url;

use crate::error::LookupError;

pub(crate) fn selector(css: &str) -> Result<Selector, LookupError> {
    Selector::parse(css).map_err(|e| LookupError::Parse(format!("invalid selector {css:?}: {e:?}")))
}

/// Trimmed text of the first descendant matching `sel`, if non-empty.
pub(crate) fn first_text(element: ElementRef<'_>, sel: &Selector) -> Option<String> {
    element
        .select(sel)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_owned())
        .filter(|text| !text.is_empty())
}

/// Absolute URL of the first link matching `sel`, or the page itself.
pub(crate) fn detail_url(element: ElementRef<'_>, sel: &Selector, page_url: &Url) -> String {
    element
        .select(sel)
        .next()
        .and_then(|a| a.value().attr("href"))
        .map(str::trim)
        .filter(|href| !href.is_empty())
        .and_then(|href| page_url.join(href).ok())
        .unwrap_or_else(|| page_url.clone())
        .to_string()
}
