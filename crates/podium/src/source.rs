//! Session inputs for a pipeline run.

use crate::calendar::GrandPrix;
use crate::pipeline::{PipelineError, Result};
use podium_data::{
    DataError, LapRecord, OpenF1Client, QualifyingEntry, SessionKind, read_qualifying_csv,
    write_qualifying_csv,
};
use std::fs;
use std::path::Path;
use tracing::info;

/// Reported when the target qualifying session has no results yet.
pub const NO_QUALIFYING_DATA: &str =
    "no qualifying data available (session likely hasn't happened yet)";

/// Where the qualifying snapshot came from.
#[derive(Debug, Clone, PartialEq)]
pub enum QualifyingSnapshot {
    /// Read from an existing, non-empty CSV
    Existing(Vec<QualifyingEntry>),
    /// Fetched from the provider and written to the CSV
    Fetched(Vec<QualifyingEntry>),
}

impl QualifyingSnapshot {
    /// Snapshot rows.
    pub fn entries(&self) -> &[QualifyingEntry] {
        match self {
            Self::Existing(entries) | Self::Fetched(entries) => entries,
        }
    }

    /// Consume the snapshot, returning its rows.
    pub fn into_entries(self) -> Vec<QualifyingEntry> {
        match self {
            Self::Existing(entries) | Self::Fetched(entries) => entries,
        }
    }

    /// Whether the provider was queried.
    pub const fn was_fetched(&self) -> bool {
        matches!(self, Self::Fetched(_))
    }
}

fn is_missing_or_empty(path: &Path) -> bool {
    fs::metadata(path).map_or(true, |m| m.len() == 0)
}

/// Load the target qualifying snapshot, fetching it first when the CSV is
/// missing or empty.
///
/// # Errors
/// `SourceUnavailable` when the provider has no qualifying results yet (no
/// file is written), `MalformedInput` when an existing CSV lacks the
/// `DriverCode` column.
pub async fn snapshot_qualifying(
    client: &OpenF1Client,
    gp: GrandPrix,
    path: &Path,
) -> Result<QualifyingSnapshot> {
    if !is_missing_or_empty(path) {
        let entries = read_qualifying_csv(path)?;
        info!(event = %gp, path = %path.display(), drivers = entries.len(), "loaded qualifying snapshot");
        return Ok(QualifyingSnapshot::Existing(entries));
    }

    let unavailable = |err: DataError| -> PipelineError {
        if err.is_missing_data() {
            PipelineError::SourceUnavailable {
                event: gp.to_string(),
                reason: NO_QUALIFYING_DATA.to_string(),
            }
        } else {
            err.into()
        }
    };

    info!(event = %gp, "fetching qualifying session");
    let session = client
        .find_session(gp.season(), gp.country(), SessionKind::Qualifying)
        .await
        .map_err(unavailable)?;
    let attempts = client
        .fetch_qualifying(session.session_key)
        .await
        .map_err(unavailable)?;

    let entries: Vec<QualifyingEntry> = attempts.iter().map(QualifyingEntry::from).collect();
    write_qualifying_csv(path, &entries)?;
    info!(event = %gp, path = %path.display(), drivers = entries.len(), "saved qualifying snapshot");
    Ok(QualifyingSnapshot::Fetched(entries))
}

/// Fetch the laps of the reference-season race at the same venue.
///
/// # Errors
/// `SourceUnavailable` when the race or its laps cannot be found.
pub async fn fetch_reference_laps(client: &OpenF1Client, gp: GrandPrix) -> Result<Vec<LapRecord>> {
    info!(event = %gp, season = gp.reference_season(), "fetching reference race");
    let session = client
        .find_session(gp.reference_season(), gp.country(), SessionKind::Race)
        .await?;
    Ok(client.fetch_laps(session.session_key).await?)
}
