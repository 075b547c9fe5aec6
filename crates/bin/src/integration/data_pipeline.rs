//! Session fetching for the command line.
//!
//! Builds the OpenF1 client over the on-disk response cache and wraps the
//! slow network steps in spinners.

use super::cache_manager;
use indicatif::{ProgressBar, ProgressStyle};
use podium::{ArtifactLayout, GrandPrix, QualifyingSnapshot};
use podium_data::{DataError, DriverMapping, LapRecord, OpenF1Client, QualifyingEntry};
use std::future::Future;
use std::path::Path;
use std::time::Duration;
use tracing::{info, warn};

/// Configuration for data fetching.
#[derive(Debug, Clone, Copy)]
pub(crate) struct FetchConfig {
    /// Whether to use the cache.
    pub use_cache: bool,
    /// Whether to force refresh (ignore cached responses).
    pub force_refresh: bool,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            use_cache: true,
            force_refresh: false,
        }
    }
}

/// Build a client, attaching the response cache when enabled.
///
/// A cache that cannot be opened is skipped with a warning.
pub(crate) fn build_client(config: FetchConfig) -> Result<OpenF1Client, DataError> {
    let client = OpenF1Client::new()?.force_refresh(config.force_refresh);
    if !config.use_cache {
        return Ok(client);
    }

    match cache_manager::open_cache() {
        Ok(cache) => Ok(client.with_cache(cache)),
        Err(e) => {
            warn!(error = %e, "response cache unavailable, fetching without it");
            Ok(client)
        }
    }
}

/// Run `step` behind a spinner, finishing with ✓ or ✗.
pub(crate) async fn with_spinner<T, E, F>(message: String, step: F) -> Result<T, E>
where
    F: Future<Output = Result<T, E>>,
{
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        pb.set_style(style);
    }
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message(message.clone());

    let result = step.await;
    match &result {
        Ok(_) => pb.finish_with_message(format!("{message} ✓")),
        Err(_) => pb.finish_with_message(format!("{message} ✗")),
    }
    result
}

/// Load (or fetch and save) the target qualifying snapshot.
pub(crate) async fn load_qualifying(
    client: &OpenF1Client,
    gp: GrandPrix,
    layout: &ArtifactLayout,
) -> podium::Result<QualifyingSnapshot> {
    let path = layout.qualifying_csv(gp);
    with_spinner(
        format!("Loading {} {} qualifying data...", gp.season(), gp.name()),
        podium::snapshot_qualifying(client, gp, &path),
    )
    .await
}

/// Fetch both pipeline inputs for an event.
pub(crate) async fn fetch_inputs(
    client: &OpenF1Client,
    gp: GrandPrix,
    layout: &ArtifactLayout,
) -> podium::Result<(Vec<QualifyingEntry>, Vec<LapRecord>)> {
    let snapshot = load_qualifying(client, gp, layout).await?;
    let laps = with_spinner(
        format!(
            "Loading {} {} race data...",
            gp.reference_season(),
            gp.name()
        ),
        podium::fetch_reference_laps(client, gp),
    )
    .await?;
    Ok((snapshot.into_entries(), laps))
}

/// Driver mapping from `path`, or the built-in grid when the file is absent.
pub(crate) fn load_mapping(path: &Path) -> Result<DriverMapping, DataError> {
    if path.exists() {
        let mapping = DriverMapping::from_json_file(path)?;
        info!(path = %path.display(), drivers = mapping.len(), "loaded driver mapping");
        Ok(mapping)
    } else {
        warn!(path = %path.display(), "driver mapping not found, using built-in grid");
        Ok(DriverMapping::default_grid())
    }
}

/// Print cache location and statistics.
pub(crate) fn print_cache_info() {
    let path = cache_manager::get_cache_path();
    println!("  Cache location: {}", path.display());
    if !path.exists() {
        println!("  Cached data: none");
        return;
    }
    match cache_manager::open_cache().and_then(|cache| cache.get_stats()) {
        Ok(stats) => println!(
            "  Cached data: {} responses across {} endpoints ({} bytes)",
            stats.entries, stats.endpoints, stats.total_bytes
        ),
        Err(e) => warn!(error = %e, "failed to read cache statistics"),
    }
}
