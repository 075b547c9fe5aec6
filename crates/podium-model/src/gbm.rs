//! Gradient Boosting Regressor
//!
//! Additive ensemble of regression trees fitted stage-wise under squared-error
//! loss. Starting from the mean target, each stage fits a tree to the current
//! residuals and adds it scaled by the learning rate:
//!
//! F_m(x) = F_{m-1}(x) + ν · h_m(x)
//!
//! With squared error the negative gradient is the residual `y − F_{m-1}(x)`
//! and the optimal leaf value is the mean residual in the leaf, which is what
//! the tree already stores.

use crate::error::{ModelError, Result};
use crate::regressor::{FittedRegressor, Regressor, check_fit_input};
use crate::tree::{RegressionTree, TreeConfig};
use ndarray::{Array1, Array2, ArrayView1};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Gradient boosting configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GradientBoostingConfig {
    /// Number of boosting stages (default: 200)
    pub n_estimators: usize,
    /// Shrinkage applied to each tree (default: 0.1)
    pub learning_rate: f64,
    /// Maximum depth of each tree (default: 3)
    pub max_depth: usize,
    /// Minimum samples to split a node (default: 2)
    pub min_samples_split: usize,
    /// Minimum samples per leaf (default: 1)
    pub min_samples_leaf: usize,
}

impl Default for GradientBoostingConfig {
    fn default() -> Self {
        Self {
            n_estimators: 200,
            learning_rate: 0.1,
            max_depth: 3,
            min_samples_split: 2,
            min_samples_leaf: 1,
        }
    }
}

impl GradientBoostingConfig {
    /// Limits for the individual trees.
    pub const fn tree_config(&self) -> TreeConfig {
        TreeConfig {
            max_depth: self.max_depth,
            min_samples_split: self.min_samples_split,
            min_samples_leaf: self.min_samples_leaf,
        }
    }
}

/// Gradient boosting estimator
#[derive(Debug, Clone)]
pub struct GradientBoostingRegressor {
    config: GradientBoostingConfig,
}

impl GradientBoostingRegressor {
    /// Create a new estimator with the given configuration
    pub fn new(config: GradientBoostingConfig) -> Result<Self> {
        if config.n_estimators == 0 {
            return Err(ModelError::InvalidParameter(
                "n_estimators must be at least 1".to_string(),
            ));
        }
        if !(config.learning_rate > 0.0 && config.learning_rate.is_finite()) {
            return Err(ModelError::InvalidParameter(format!(
                "learning_rate must be positive, got {}",
                config.learning_rate
            )));
        }
        config.tree_config().validate()?;
        Ok(Self { config })
    }

    /// Create with default configuration.
    ///
    /// # Errors
    /// Returns an error if the default configuration is invalid (should not happen).
    pub fn try_default() -> Result<Self> {
        Self::new(GradientBoostingConfig::default())
    }

    /// Estimator configuration
    pub const fn config(&self) -> &GradientBoostingConfig {
        &self.config
    }
}

impl Regressor for GradientBoostingRegressor {
    type Model = GradientBoostingModel;

    fn fit(&self, x: &Array2<f64>, y: &Array1<f64>) -> Result<GradientBoostingModel> {
        check_fit_input(x, y)?;

        let init = y.sum() / y.len() as f64;
        let learning_rate = self.config.learning_rate;
        let tree_config = self.config.tree_config();

        let mut current = Array1::from_elem(y.len(), init);
        let mut trees = Vec::with_capacity(self.config.n_estimators);

        for _ in 0..self.config.n_estimators {
            let residuals = y - &current;
            let tree = RegressionTree::grow(x, &residuals, &tree_config);

            for (i, row) in x.rows().into_iter().enumerate() {
                current[i] += learning_rate * tree.predict_row(row);
            }
            trees.push(tree);
        }

        let train_mse = (y - &current).mapv(|r| r * r).mean().unwrap_or(0.0);
        debug!(
            rows = y.len(),
            stages = trees.len(),
            train_mse, "fitted gradient boosting"
        );

        Ok(GradientBoostingModel {
            init,
            learning_rate,
            trees,
            n_features: x.ncols(),
        })
    }
}

/// Fitted gradient boosting ensemble
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradientBoostingModel {
    init: f64,
    learning_rate: f64,
    trees: Vec<RegressionTree>,
    n_features: usize,
}

impl GradientBoostingModel {
    /// Initial (constant) prediction.
    pub const fn init(&self) -> f64 {
        self.init
    }

    /// Number of fitted stages.
    pub fn n_stages(&self) -> usize {
        self.trees.len()
    }
}

impl FittedRegressor for GradientBoostingModel {
    fn n_features(&self) -> usize {
        self.n_features
    }

    fn predict_row(&self, row: ArrayView1<'_, f64>) -> f64 {
        self.trees.iter().fold(self.init, |acc, tree| {
            acc + self.learning_rate * tree.predict_row(row)
        })
    }
}
