//! Lookup orchestrator: concurrent fan-out, scoring, best-match selection.
//!
//! This module queries every registered source concurrently, absorbs
//! per-source failures, scores the merged candidates against the query, and
//! turns the single best candidate into a [`crate::LookupResult`].

pub mod lookup;
pub mod scoring;

pub use lookup::LookupOrchestrator;
