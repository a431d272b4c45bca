//! Error types for the musicdb-lookup crate.
//!
//! None of these ever escape [`crate::LookupOrchestrator::lookup`]: a failing
//! source is absorbed there and simply contributes no candidates. They are
//! surfaced by the lower layers (fetcher, adapters, config) so callers that
//! drive those layers directly can tell what went wrong.

/// Errors that can occur while querying an external catalog.
#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    /// A catalog could not be reached, timed out, or answered with a
    /// non-success status.
    #[error("source unavailable: {0}")]
    SourceUnavailable(String),

    /// A catalog response could not be parsed at all.
    #[error("parse error: {0}")]
    Parse(String),

    /// Invalid lookup configuration.
    #[error("config error: {0}")]
    Config(String),
}

/// Convenience type alias for musicdb-lookup results.
pub type Result<T> = std::result::Result<T, LookupError>;
