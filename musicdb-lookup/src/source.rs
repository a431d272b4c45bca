//! Trait definition for pluggable catalog sources.
//!
//! Each catalog (J-WID, NexTone) implements [`SourceAdapter`] to turn a
//! [`Query`] into raw candidates. The orchestrator only ever sees this trait,
//! so adding a catalog means adding an implementation and registering it.

use async_trait::async_trait;

use crate::error::LookupError;
use crate::types::{Query, RawCandidate, SourceId};

/// A pluggable catalog backend.
///
/// Implementors handle their own:
///
/// - request URL construction from the query
/// - dispatch through the source's rate-limited scheduler
/// - HTML extraction of hit records
///
/// A document with no recognisable hits is an empty `Ok`, not an error.
/// All implementations must be `Send + Sync` for concurrent fan-out.
#[async_trait]
pub trait SourceAdapter: Send + Sync {
    /// Search the catalog for candidates matching `query`.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError::SourceUnavailable`] if the catalog cannot be
    /// reached, or [`LookupError::Parse`] if extraction itself breaks.
    async fn search(&self, query: &Query) -> Result<Vec<RawCandidate>, LookupError>;

    /// Which catalog this adapter queries.
    fn source(&self) -> SourceId;
}
