//! musicdb host: configuration, logging setup and the lookup harness.
//!
//! The lookup pipeline itself lives in the `musicdb-lookup` crate. This crate
//! owns the surrounding concerns: where the config file is, how tracing is
//! initialised, and how a one-shot lookup is driven from the command line.

pub mod config;
pub mod error;

pub use config::{LogConfig, MusicDbConfig};
pub use error::{MusicDbError, Result};

use musicdb_lookup::{LookupOrchestrator, LookupResult, Query};

/// Positional arguments of the `musicdb-lookup` binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupArgs {
    pub title: String,
    pub artist: Option<String>,
}

impl LookupArgs {
    /// Parse `<title> [artist]` from arguments that exclude the program name.
    ///
    /// # Errors
    ///
    /// Returns [`MusicDbError::Usage`] when the title is missing or blank, or
    /// when extra arguments are present.
    pub fn parse<I>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = String>,
    {
        let mut args = args.into_iter();
        let title = args
            .next()
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| MusicDbError::Usage("musicdb-lookup <title> [artist]".into()))?;
        let artist = args.next();
        if let Some(extra) = args.next() {
            return Err(MusicDbError::Usage(format!("unexpected argument: {extra}")));
        }
        Ok(Self { title, artist })
    }

    pub fn query(&self) -> Query {
        Query::new(&self.title, self.artist.as_deref())
    }
}

/// Install a stderr `fmt` subscriber. `RUST_LOG` wins over the configured filter.
pub fn init_tracing(log: &LogConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(&log.filter))
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    // A second init (e.g. from tests) is ignored.
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .try_init();
}

/// Build the process-wide orchestrator. Call once and reuse it for every
/// lookup so rate-limit state carries across calls.
///
/// # Errors
///
/// Returns [`MusicDbError::Lookup`] when the lookup configuration is invalid.
pub fn build_orchestrator(config: &MusicDbConfig) -> Result<LookupOrchestrator> {
    Ok(LookupOrchestrator::from_config(&config.lookup)?)
}

/// Run a single lookup through a shared orchestrator. `None` means no match.
pub async fn run_lookup(orchestrator: &LookupOrchestrator, args: &LookupArgs) -> Option<LookupResult> {
    let query = args.query();
    tracing::trace!(title = query.title(), artist = ?query.artist(), "looking up song");
    orchestrator.lookup(&query).await
}
