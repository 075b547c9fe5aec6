//! Export of prediction reports.
//!
//! `Exporter` renders a report as CSV or JSON. `ResultWriter` persists the
//! two pipeline artifacts (predictions CSV and MAE text) for one event. Both
//! files are staged next to their targets and renamed into place only after
//! every write succeeded, so an aborted run leaves earlier artifacts as they
//! were.

use crate::report::PredictionReport;
use serde::Serialize;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

/// Errors that can occur during export operations.
#[derive(Debug, Error)]
pub enum ExportError {
    /// CSV serialization error.
    #[error("CSV serialization error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization error.
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid format error.
    #[error("Invalid format: {0}")]
    InvalidFormat(String),
}

/// Export format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Comma-separated values format.
    Csv,

    /// Compact JSON format.
    Json,

    /// Pretty-printed JSON format.
    PrettyJson,
}

impl ExportFormat {
    /// Get the file extension for this format.
    pub const fn extension(&self) -> &str {
        match self {
            Self::Csv => "csv",
            Self::Json | Self::PrettyJson => "json",
        }
    }
}

/// Trait for types that can be exported to various formats.
pub trait Exporter {
    /// Export data to a string in the specified format.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError>;

    /// Export data to a file in the specified format.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or file writing fails.
    fn export_to_file(&self, path: &Path, format: ExportFormat) -> Result<(), ExportError> {
        let content = self.export_to_string(format)?;
        let mut file = File::create(path)?;
        file.write_all(content.as_bytes())?;
        Ok(())
    }
}

fn csv_string<T: Serialize>(records: &[T]) -> Result<String, ExportError> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    for record in records {
        wtr.serialize(record)?;
    }
    let bytes = wtr.into_inner().map_err(|e| e.into_error())?;
    String::from_utf8(bytes).map_err(|e| ExportError::InvalidFormat(e.to_string()))
}

impl Exporter for PredictionReport {
    /// CSV carries only the ranked rows; JSON carries the whole report.
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        match format {
            ExportFormat::Csv => csv_string(self.rows()),
            ExportFormat::Json => Ok(serde_json::to_string(self)?),
            ExportFormat::PrettyJson => Ok(serde_json::to_string_pretty(self)?),
        }
    }
}

/// MAE as written to the text artifact: rounded to three decimals,
/// always with at least one decimal place (`1.0`, `0.5`, `0.123`).
pub fn format_mae(mae: f64) -> String {
    let rounded = (mae * 1000.0).round() / 1000.0;
    let text = rounded.to_string();
    if rounded.is_finite() && !text.contains('.') {
        format!("{text}.0")
    } else {
        text
    }
}

/// Persists the predictions CSV and MAE text artifacts for one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultWriter {
    predictions_path: PathBuf,
    mae_path: PathBuf,
}

impl ResultWriter {
    /// Create a writer targeting the two artifact paths.
    pub fn new(predictions_path: impl Into<PathBuf>, mae_path: impl Into<PathBuf>) -> Self {
        Self {
            predictions_path: predictions_path.into(),
            mae_path: mae_path.into(),
        }
    }

    /// Predictions CSV path.
    pub fn predictions_path(&self) -> &Path {
        &self.predictions_path
    }

    /// MAE text path.
    pub fn mae_path(&self) -> &Path {
        &self.mae_path
    }

    /// Write both artifacts, replacing any previous ones.
    ///
    /// # Errors
    /// Returns an error if a directory cannot be created or a file cannot be
    /// written. Staged files are removed on failure.
    pub fn write(&self, report: &PredictionReport) -> Result<(), ExportError> {
        for path in [&self.predictions_path, &self.mae_path] {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
        }

        let predictions = report.export_to_string(ExportFormat::Csv)?;
        let mae = format_mae(report.mae);

        let staged_predictions = stage(&self.predictions_path, &predictions)?;
        let staged_mae = match stage(&self.mae_path, &mae) {
            Ok(path) => path,
            Err(e) => {
                discard(&staged_predictions);
                return Err(e);
            }
        };

        if let Err(e) = fs::rename(&staged_predictions, &self.predictions_path) {
            discard(&staged_predictions);
            discard(&staged_mae);
            return Err(e.into());
        }
        if let Err(e) = fs::rename(&staged_mae, &self.mae_path) {
            discard(&staged_mae);
            return Err(e.into());
        }

        debug!(
            predictions = %self.predictions_path.display(),
            mae = %self.mae_path.display(),
            rows = report.len(),
            "wrote prediction artifacts"
        );
        Ok(())
    }
}

fn staging_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

fn stage(path: &Path, content: &str) -> Result<PathBuf, ExportError> {
    let tmp = staging_path(path);
    let mut file = File::create(&tmp)?;
    if let Err(e) = file.write_all(content.as_bytes()).and_then(|()| file.sync_all()) {
        discard(&tmp);
        return Err(e.into());
    }
    Ok(tmp)
}

fn discard(path: &Path) {
    if let Err(e) = fs::remove_file(path) {
        warn!(path = %path.display(), error = %e, "failed to remove staged artifact");
    }
}
