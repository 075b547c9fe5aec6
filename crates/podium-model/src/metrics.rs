//! Regression metrics.

use crate::error::{ModelError, Result};
use ndarray::Array1;

/// Mean absolute error between targets and predictions.
///
/// # Errors
/// Returns an error if the lengths differ or the inputs are empty.
pub fn mean_absolute_error(y_true: &Array1<f64>, y_pred: &Array1<f64>) -> Result<f64> {
    if y_true.len() != y_pred.len() {
        return Err(ModelError::DimensionMismatch {
            expected: y_true.len(),
            actual: y_pred.len(),
        });
    }
    if y_true.is_empty() {
        return Err(ModelError::InsufficientData {
            required: 1,
            actual: 0,
        });
    }

    let total: f64 = y_true
        .iter()
        .zip(y_pred.iter())
        .map(|(t, p)| (t - p).abs())
        .sum();
    Ok(total / y_true.len() as f64)
}
