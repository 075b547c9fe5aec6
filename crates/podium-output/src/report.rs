//! Ranked prediction report for one event.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use thiserror::Error;

/// Errors that can occur during report generation.
#[derive(Debug, Error)]
pub enum ReportError {
    /// A required builder field was not set.
    #[error("Missing report field: {0}")]
    MissingField(&'static str),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// One driver's row of the predictions artifact.
///
/// Field order is the column order of the persisted CSV.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRow {
    /// Provider driver code, empty when the artifact has no code column
    #[serde(rename = "DriverCode", default)]
    pub driver_code: String,

    /// Official qualifying position
    #[serde(rename = "Position", default, deserialize_with = "lenient_position")]
    pub position: Option<u32>,

    /// Canonical driver name
    #[serde(rename = "Driver")]
    pub driver: String,

    /// Qualifying time in seconds
    #[serde(rename = "QualifyingTime (s)", default)]
    pub qualifying_time: Option<f64>,

    /// Mean sector 1 time from the reference event
    #[serde(rename = "Sector1Time (s)", default)]
    pub sector1: Option<f64>,

    /// Mean sector 2 time from the reference event
    #[serde(rename = "Sector2Time (s)", default)]
    pub sector2: Option<f64>,

    /// Mean sector 3 time from the reference event
    #[serde(rename = "Sector3Time (s)", default)]
    pub sector3: Option<f64>,

    /// Predicted race lap time in seconds
    #[serde(rename = "PredictedRaceTime (s)")]
    pub predicted_race_time: f64,
}

fn lenient_position<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<f64>::deserialize(deserializer)?;
    Ok(value
        .filter(|p| p.is_finite() && *p >= 0.0)
        .map(|p| p.round() as u32))
}

/// Predictions for one event, ranked by predicted race time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionReport {
    /// Event display name.
    pub event: String,

    /// Report generation timestamp.
    pub generated_at: DateTime<Utc>,

    /// Held-out mean absolute error in seconds.
    pub mae: f64,

    rows: Vec<PredictionRow>,
}

impl PredictionReport {
    /// Create a report, ranking `rows` ascending by predicted race time.
    ///
    /// The sort is stable: drivers with equal predictions keep their input
    /// order.
    pub fn new(event: String, mut rows: Vec<PredictionRow>, mae: f64) -> Self {
        rows.sort_by(|a, b| a.predicted_race_time.total_cmp(&b.predicted_race_time));
        Self {
            event,
            generated_at: Utc::now(),
            mae,
            rows,
        }
    }

    /// Ranked rows, fastest first.
    pub fn rows(&self) -> &[PredictionRow] {
        &self.rows
    }

    /// Number of drivers.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the report has no drivers.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The predicted top three (fewer if the field is smaller).
    pub fn podium(&self) -> &[PredictionRow] {
        &self.rows[..self.rows.len().min(3)]
    }

    /// Convert report to JSON string.
    pub fn to_json(&self) -> Result<String, ReportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Console summary: ranked drivers with predicted times and the MAE.
    pub fn to_ascii_table(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!("\nPredicted Race Order: {}\n", self.event));
        output.push_str(&"=".repeat(60));
        output.push('\n');
        output.push_str(&format!(
            "{:>4}  {:<28} {:>22}\n",
            "Pos", "Driver", "PredictedRaceTime (s)"
        ));
        output.push_str(&"-".repeat(60));
        output.push('\n');

        for (i, row) in self.rows.iter().enumerate() {
            output.push_str(&format!(
                "{:>4}  {:<28} {:>22.3}\n",
                i + 1,
                row.driver,
                row.predicted_race_time
            ));
        }

        output.push_str(&"-".repeat(60));
        output.push('\n');
        output.push_str(&format!("MAE: {:.2} seconds\n", self.mae));
        output
    }
}

impl fmt::Display for PredictionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_ascii_table())
    }
}

/// Builder for creating prediction reports.
#[derive(Debug, Default)]
pub struct PredictionReportBuilder {
    event: Option<String>,
    rows: Vec<PredictionRow>,
    mae: Option<f64>,
}

impl PredictionReportBuilder {
    /// Create a new report builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the event name.
    pub fn event(mut self, event: impl Into<String>) -> Self {
        self.event = Some(event.into());
        self
    }

    /// Append a driver row.
    pub fn row(mut self, row: PredictionRow) -> Self {
        self.rows.push(row);
        self
    }

    /// Append several driver rows.
    pub fn rows(mut self, rows: impl IntoIterator<Item = PredictionRow>) -> Self {
        self.rows.extend(rows);
        self
    }

    /// Set the held-out error.
    pub const fn mae(mut self, mae: f64) -> Self {
        self.mae = Some(mae);
        self
    }

    /// Build the report.
    ///
    /// # Errors
    /// Returns `ReportError::MissingField` if the event or MAE is unset.
    pub fn build(self) -> Result<PredictionReport, ReportError> {
        let event = self.event.ok_or(ReportError::MissingField("event"))?;
        let mae = self.mae.ok_or(ReportError::MissingField("mae"))?;
        Ok(PredictionReport::new(event, self.rows, mae))
    }
}
