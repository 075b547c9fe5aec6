//! Prediction pipeline for one event.
//!
//! Qualifying snapshot + reference laps → sector profiles → merged feature
//! table → fitted model → ranked report → artifacts. Everything after the
//! inputs are in memory is synchronous and deterministic for a fixed seed.
//! Artifacts are written only once a full report exists.

use podium_data::{DataError, DriverMapping, LapRecord, QualifyingEntry};
use podium_features::{
    FeatureError, FeatureRow, FeatureTable, SectorAggregator, merge_features,
    records_from_entries,
};
use podium_model::{ModelError, PredictorConfig, RacePredictor};
use podium_output::{
    ExportError, PredictionReport, PredictionReportBuilder, PredictionRow, ReportError,
    ResultWriter,
};
use thiserror::Error;
use tracing::{info, warn};

/// Result type for pipeline runs.
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Errors that abort one event's run.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Session data could not be fetched or is not published yet
    #[error("Data not yet available for {event}: {reason}")]
    SourceUnavailable {
        /// Event or request that had no data
        event: String,
        /// Underlying reason
        reason: String,
    },

    /// An input artifact lacks a required column
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    /// Too few complete rows to fit the model
    #[error("Insufficient training data: {actual} usable rows, {required} required")]
    InsufficientTrainingData {
        /// Rows required
        required: usize,
        /// Rows available
        actual: usize,
    },

    /// Other data access error
    #[error(transparent)]
    Data(DataError),

    /// Feature construction error
    #[error(transparent)]
    Feature(#[from] FeatureError),

    /// Model error
    #[error(transparent)]
    Model(ModelError),

    /// Report assembly error
    #[error(transparent)]
    Report(#[from] ReportError),

    /// Artifact export error
    #[error(transparent)]
    Export(#[from] ExportError),
}

impl PipelineError {
    /// True for conditions that skip the event rather than signal a fault:
    /// missing source data and too few training rows.
    pub const fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::SourceUnavailable { .. } | Self::InsufficientTrainingData { .. }
        )
    }
}

impl From<DataError> for PipelineError {
    fn from(err: DataError) -> Self {
        match err {
            DataError::MissingData { query, reason } => Self::SourceUnavailable {
                event: query,
                reason,
            },
            DataError::MissingColumn { column, artifact } => {
                Self::MalformedInput(format!("missing '{column}' in {artifact}"))
            }
            DataError::Network(e) => Self::SourceUnavailable {
                event: e
                    .url()
                    .map_or_else(|| "session request".to_string(), |u| u.to_string()),
                reason: e.to_string(),
            },
            DataError::Api(reason) => Self::SourceUnavailable {
                event: "session request".to_string(),
                reason,
            },
            other => Self::Data(other),
        }
    }
}

impl From<ModelError> for PipelineError {
    fn from(err: ModelError) -> Self {
        match err {
            ModelError::InsufficientData { required, actual } => {
                Self::InsufficientTrainingData { required, actual }
            }
            other => Self::Model(other),
        }
    }
}

/// Outcome of a successful run.
#[derive(Debug, Clone)]
pub struct PipelineRun {
    /// Ranked predictions
    pub report: PredictionReport,
    /// Merged table with predictions attached, in qualifying order
    pub table: FeatureTable,
    /// Rows used to fit the model
    pub train_rows: usize,
    /// Rows used to score the model
    pub test_rows: usize,
}

/// Runs the prediction core for one event.
#[derive(Debug, Clone)]
pub struct PredictionPipeline {
    config: PredictorConfig,
    mapping: DriverMapping,
}

impl PredictionPipeline {
    /// Create a pipeline.
    ///
    /// # Errors
    /// Returns an error if the predictor configuration is invalid.
    pub fn new(config: PredictorConfig, mapping: DriverMapping) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, mapping })
    }

    /// Predictor configuration
    pub const fn config(&self) -> &PredictorConfig {
        &self.config
    }

    /// Driver name lookup
    pub const fn mapping(&self) -> &DriverMapping {
        &self.mapping
    }

    /// Predict race times for every qualifying driver.
    ///
    /// # Arguments
    /// * `event` - Display name stored in the report
    /// * `qualifying` - Target-event qualifying snapshot
    /// * `reference_laps` - Laps of the reference race
    ///
    /// # Errors
    /// `SourceUnavailable` when either input is empty,
    /// `InsufficientTrainingData` when fewer than `min_training_rows`
    /// complete rows remain after merging.
    pub fn predict(
        &self,
        event: &str,
        qualifying: &[QualifyingEntry],
        reference_laps: &[LapRecord],
    ) -> Result<PipelineRun> {
        if qualifying.is_empty() {
            return Err(PipelineError::SourceUnavailable {
                event: event.to_string(),
                reason: "no qualifying data".to_string(),
            });
        }
        if reference_laps.is_empty() {
            return Err(PipelineError::SourceUnavailable {
                event: event.to_string(),
                reason: "no reference laps".to_string(),
            });
        }

        let profiles = SectorAggregator::new().aggregate(reference_laps)?;
        let records = records_from_entries(qualifying, &self.mapping);
        let mut table = merge_features(&records, &profiles, &self.mapping);

        let training = table.training_set()?;
        info!(
            event,
            drivers = table.len(),
            trainable = training.len(),
            "training on drivers after dropping incomplete rows"
        );

        let trained = RacePredictor::new(self.config)?.train(&training.features, &training.labels)?;
        let predictions = trained.predict(&table.feature_matrix()?)?.to_vec();
        table.set_predictions(&predictions);

        let rows = table
            .rows()
            .iter()
            .zip(&predictions)
            .map(|(row, &predicted)| prediction_row(row, predicted));

        let report = PredictionReportBuilder::new()
            .event(event)
            .rows(rows)
            .mae(trained.mae())
            .build()?;

        Ok(PipelineRun {
            report,
            table,
            train_rows: trained.train_rows(),
            test_rows: trained.test_rows(),
        })
    }

    /// Predict and persist the artifacts through `writer`.
    ///
    /// Nothing is written when prediction fails.
    pub fn run(
        &self,
        event: &str,
        qualifying: &[QualifyingEntry],
        reference_laps: &[LapRecord],
        writer: &ResultWriter,
    ) -> Result<PipelineRun> {
        let run = match self.predict(event, qualifying, reference_laps) {
            Ok(run) => run,
            Err(e) => {
                warn!(event, error = %e, "prediction aborted, artifacts left untouched");
                return Err(e);
            }
        };
        writer.write(&run.report)?;
        info!(
            event,
            predictions = %writer.predictions_path().display(),
            mae = run.report.mae,
            "saved predictions"
        );
        Ok(run)
    }
}

fn prediction_row(row: &FeatureRow, predicted: f64) -> PredictionRow {
    PredictionRow {
        driver_code: row.driver_code.clone(),
        position: row.position,
        driver: row.driver.clone(),
        qualifying_time: row.qualifying_time,
        sector1: row.sector1,
        sector2: row.sector2,
        sector3: row.sector3,
        predicted_race_time: predicted,
    }
}
