#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/podium/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod error;
pub mod gbm;
pub mod metrics;
pub mod predictor;
pub mod regressor;
pub mod split;
pub mod tree;

// Re-export main types
pub use error::{ModelError, Result};
pub use gbm::{GradientBoostingConfig, GradientBoostingModel, GradientBoostingRegressor};
pub use metrics::mean_absolute_error;
pub use predictor::{PredictorConfig, RacePredictor, TrainedPredictor};
pub use regressor::{FittedRegressor, MeanModel, MeanRegressor, Regressor};
pub use split::{SplitConfig, TrainTestSplit, train_test_split};
pub use tree::{RegressionTree, RegressionTreeRegressor, TreeConfig};
