//! Race-Time Predictor
//!
//! Fits a regressor on the training portion of the complete rows and
//! evaluates it on the held-out portion. The fitted model is then used to
//! predict every driver of the event.

use crate::error::{ModelError, Result};
use crate::gbm::{GradientBoostingConfig, GradientBoostingRegressor};
use crate::metrics::mean_absolute_error;
use crate::regressor::{FittedRegressor, Regressor};
use crate::split::{SplitConfig, train_test_split};
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Predictor configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictorConfig {
    /// Train/held-out split
    pub split: SplitConfig,
    /// Minimum complete rows required before fitting (default: 5)
    pub min_training_rows: usize,
    /// Gradient boosting hyperparameters
    pub boosting: GradientBoostingConfig,
}

impl Default for PredictorConfig {
    fn default() -> Self {
        Self {
            split: SplitConfig::default(),
            min_training_rows: 5,
            boosting: GradientBoostingConfig::default(),
        }
    }
}

impl PredictorConfig {
    /// Check the configuration is usable.
    pub fn validate(&self) -> Result<()> {
        self.split.validate()?;
        if self.min_training_rows < 2 {
            return Err(ModelError::InvalidParameter(format!(
                "min_training_rows must be at least 2, got {}",
                self.min_training_rows
            )));
        }
        Ok(())
    }
}

/// Predictor wrapping a swappable regressor
#[derive(Debug, Clone)]
pub struct RacePredictor<R = GradientBoostingRegressor> {
    config: PredictorConfig,
    regressor: R,
}

impl RacePredictor<GradientBoostingRegressor> {
    /// Create a gradient boosting predictor from the configuration
    pub fn new(config: PredictorConfig) -> Result<Self> {
        let regressor = GradientBoostingRegressor::new(config.boosting)?;
        Self::with_regressor(config, regressor)
    }

    /// Create with default configuration.
    ///
    /// # Errors
    /// Returns an error if the default configuration is invalid (should not happen).
    pub fn try_default() -> Result<Self> {
        Self::new(PredictorConfig::default())
    }
}

impl<R: Regressor> RacePredictor<R> {
    /// Create a predictor around any regressor
    pub fn with_regressor(config: PredictorConfig, regressor: R) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, regressor })
    }

    /// Predictor configuration
    pub const fn config(&self) -> &PredictorConfig {
        &self.config
    }

    /// Fit on the training split of `(x, y)` and score the held-out split.
    ///
    /// # Arguments
    /// * `x` - Complete feature rows
    /// * `y` - Labels aligned with `x`
    ///
    /// # Errors
    /// Returns `ModelError::InsufficientData` if there are fewer than
    /// `min_training_rows` rows.
    pub fn train(&self, x: &Array2<f64>, y: &Array1<f64>) -> Result<TrainedPredictor<R::Model>> {
        if x.nrows() != y.len() {
            return Err(ModelError::DimensionMismatch {
                expected: x.nrows(),
                actual: y.len(),
            });
        }

        let n = y.len();
        if n < self.config.min_training_rows {
            return Err(ModelError::InsufficientData {
                required: self.config.min_training_rows,
                actual: n,
            });
        }

        let split = train_test_split(n, &self.config.split)?;
        let (x_train, y_train) = split.train_data(x, y);
        let (x_test, y_test) = split.test_data(x, y);

        let model = self.regressor.fit(&x_train, &y_train)?;
        let mae = mean_absolute_error(&y_test, &model.predict(&x_test)?)?;

        info!(
            train_rows = split.train.len(),
            test_rows = split.test.len(),
            mae, "trained race-time model"
        );

        Ok(TrainedPredictor {
            model,
            mae,
            train_rows: split.train.len(),
            test_rows: split.test.len(),
        })
    }
}

/// Fitted model with its held-out error
#[derive(Debug, Clone)]
pub struct TrainedPredictor<M> {
    model: M,
    mae: f64,
    train_rows: usize,
    test_rows: usize,
}

impl<M: FittedRegressor> TrainedPredictor<M> {
    /// Held-out mean absolute error (seconds)
    pub const fn mae(&self) -> f64 {
        self.mae
    }

    /// Rows used for fitting
    pub const fn train_rows(&self) -> usize {
        self.train_rows
    }

    /// Rows used for evaluation
    pub const fn test_rows(&self) -> usize {
        self.test_rows
    }

    /// The fitted model
    pub const fn model(&self) -> &M {
        &self.model
    }

    /// Predict race times for every row of `x`
    pub fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        self.model.predict(x)
    }
}
