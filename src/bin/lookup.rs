//! One-shot lookup harness.
//!
//! Usage: `musicdb-lookup <title> [artist]`
//!
//! Prints the selected [`musicdb_lookup::LookupResult`] as JSON on stdout, or
//! `null` when no catalog produced a candidate. Diagnostics go to stderr.

use musicdb::{LookupArgs, MusicDbConfig, build_orchestrator, init_tracing, run_lookup};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = LookupArgs::parse(std::env::args().skip(1))?;

    let path = MusicDbConfig::resolve_path();
    let config = MusicDbConfig::load_or_default(&path)
        .map_err(|e| anyhow::anyhow!("failed to load {}: {e}", path.display()))?;
    init_tracing(&config.log);

    let orchestrator = build_orchestrator(&config).map_err(|e| {
        tracing::error!(error = %e, "invalid lookup configuration");
        anyhow::anyhow!("musicdb-lookup failed: {e}")
    })?;

    let result = run_lookup(&orchestrator, &args).await;

    match &result {
        Some(found) => tracing::info!(
            source = %found.provenance.source,
            confidence = found.confidence,
            "match found"
        ),
        None => tracing::info!("no match"),
    }
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
