//! # musicdb-lookup
//!
//! External metadata lookup for songs known only by title and artist.
//!
//! When a track is not yet in the local database, this crate asks the public
//! rights-management catalogs (J-WID and NexTone) for it, picks the most
//! plausible hit, and reports its canonical work code, tempo, key, a
//! confidence estimate, and where the data came from.
//!
//! ## Design
//!
//! - Scrapes each catalog's HTML search page using CSS selectors
//! - Queries all catalogs concurrently; one failing catalog never blocks the others
//! - Throttles each catalog independently (reservoir + minimum spacing)
//! - Scores candidates with fixed, all-or-nothing title/artist/code weights
//! - Returns one best guess or `None`, never an error
//!
//! ## Usage
//!
//! Build the orchestrator once and reuse it: it owns the per-catalog rate
//! limiters, which must outlive individual lookups.
//!
//! ```no_run
//! # async fn example() -> musicdb_lookup::Result<()> {
//! use musicdb_lookup::{LookupConfig, LookupOrchestrator, Query};
//!
//! let orchestrator = LookupOrchestrator::from_config(&LookupConfig::default())?;
//! if let Some(found) = orchestrator.lookup(&Query::new("Sample Song", Some("Artist X"))).await {
//!     println!("{:?} (confidence {})", found.work_code, found.confidence);
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod http;
pub mod normalize;
pub mod orchestrator;
pub mod scheduler;
pub mod source;
pub mod sources;
pub mod types;

pub use config::{LookupConfig, RateLimitPolicy, SourceConfig};
pub use error::{LookupError, Result};
pub use orchestrator::LookupOrchestrator;
pub use scheduler::RateLimitedScheduler;
pub use source::SourceAdapter;
pub use types::{LookupResult, Provenance, Query, RawCandidate, SourceId, WorkCode};
