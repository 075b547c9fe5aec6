//! Regressor Traits
//!
//! A [`Regressor`] is an unfitted estimator holding hyperparameters; fitting
//! produces a [`FittedRegressor`] that maps feature rows to predictions.

use crate::error::{ModelError, Result};
use ndarray::{Array1, Array2, ArrayView1};

/// Estimator that can be fitted to a feature matrix and target vector.
pub trait Regressor {
    /// Fitted model type
    type Model: FittedRegressor;

    /// Fit the estimator
    ///
    /// # Arguments
    /// * `x` - Feature matrix, one row per observation
    /// * `y` - Targets aligned with the rows of `x`
    fn fit(&self, x: &Array2<f64>, y: &Array1<f64>) -> Result<Self::Model>;
}

/// Fitted model that predicts targets from feature rows.
pub trait FittedRegressor {
    /// Number of features the model was fitted on.
    fn n_features(&self) -> usize;

    /// Predict a single row.
    fn predict_row(&self, row: ArrayView1<'_, f64>) -> f64;

    /// Predict every row of a feature matrix.
    fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        check_features(self.n_features(), x)?;
        Ok(x.rows().into_iter().map(|row| self.predict_row(row)).collect())
    }
}

/// Validate that `x` and `y` describe the same number of observations.
pub(crate) fn check_fit_input(x: &Array2<f64>, y: &Array1<f64>) -> Result<()> {
    if x.nrows() != y.len() {
        return Err(ModelError::DimensionMismatch {
            expected: x.nrows(),
            actual: y.len(),
        });
    }
    if x.nrows() == 0 {
        return Err(ModelError::InsufficientData {
            required: 1,
            actual: 0,
        });
    }
    if x.iter().chain(y.iter()).any(|v| !v.is_finite()) {
        return Err(ModelError::InvalidParameter(
            "training data contains non-finite values".to_string(),
        ));
    }
    Ok(())
}

pub(crate) fn check_features(expected: usize, x: &Array2<f64>) -> Result<()> {
    if x.ncols() != expected {
        return Err(ModelError::DimensionMismatch {
            expected,
            actual: x.ncols(),
        });
    }
    Ok(())
}

/// Baseline that always predicts the training mean.
#[derive(Debug, Clone, Copy, Default)]
pub struct MeanRegressor;

/// Fitted mean baseline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeanModel {
    mean: f64,
    n_features: usize,
}

impl MeanModel {
    /// The constant prediction.
    pub const fn mean(&self) -> f64 {
        self.mean
    }
}

impl Regressor for MeanRegressor {
    type Model = MeanModel;

    fn fit(&self, x: &Array2<f64>, y: &Array1<f64>) -> Result<MeanModel> {
        check_fit_input(x, y)?;
        Ok(MeanModel {
            mean: y.sum() / y.len() as f64,
            n_features: x.ncols(),
        })
    }
}

impl FittedRegressor for MeanModel {
    fn n_features(&self) -> usize {
        self.n_features
    }

    fn predict_row(&self, _row: ArrayView1<'_, f64>) -> f64 {
        self.mean
    }
}
