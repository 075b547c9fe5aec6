//! Train/held-out splitting.
//!
//! Rows are shuffled with a seeded generator; the first `ceil(n · fraction)`
//! shuffled rows are held out and the rest are used for training. The same
//! seed and row count always produce the same split.

use crate::error::{ModelError, Result};
use ndarray::{Array1, Array2, Axis};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

/// Split configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SplitConfig {
    /// Fraction of rows held out for evaluation (default: 0.2)
    pub test_fraction: f64,
    /// Shuffle seed (default: 42)
    pub seed: u64,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            test_fraction: 0.2,
            seed: 42,
        }
    }
}

impl SplitConfig {
    /// Check the fraction lies strictly between 0 and 1.
    pub fn validate(&self) -> Result<()> {
        if !(self.test_fraction > 0.0 && self.test_fraction < 1.0) {
            return Err(ModelError::InvalidParameter(format!(
                "test_fraction must be between 0 and 1, got {}",
                self.test_fraction
            )));
        }
        Ok(())
    }

    /// Number of held-out rows for `n` rows.
    pub fn n_test(&self, n: usize) -> usize {
        (self.test_fraction * n as f64).ceil() as usize
    }
}

/// Row indices of a split.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainTestSplit {
    /// Training row indices
    pub train: Vec<usize>,
    /// Held-out row indices
    pub test: Vec<usize>,
}

impl TrainTestSplit {
    /// Training rows of `x` and `y`.
    pub fn train_data(&self, x: &Array2<f64>, y: &Array1<f64>) -> (Array2<f64>, Array1<f64>) {
        (x.select(Axis(0), &self.train), y.select(Axis(0), &self.train))
    }

    /// Held-out rows of `x` and `y`.
    pub fn test_data(&self, x: &Array2<f64>, y: &Array1<f64>) -> (Array2<f64>, Array1<f64>) {
        (x.select(Axis(0), &self.test), y.select(Axis(0), &self.test))
    }
}

/// Split `n` rows into training and held-out indices.
///
/// # Errors
/// Returns `ModelError::InsufficientData` if either side would be empty.
pub fn train_test_split(n: usize, config: &SplitConfig) -> Result<TrainTestSplit> {
    config.validate()?;

    let n_test = config.n_test(n);
    if n_test == 0 || n_test >= n {
        return Err(ModelError::InsufficientData {
            required: 2,
            actual: n,
        });
    }

    let mut permutation: Vec<usize> = (0..n).collect();
    let mut rng = StdRng::seed_from_u64(config.seed);
    permutation.shuffle(&mut rng);

    let train = permutation.split_off(n_test);
    Ok(TrainTestSplit {
        train,
        test: permutation,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::collections::BTreeSet;

    #[rstest]
    #[case(2, 1)]
    #[case(5, 1)]
    #[case(6, 2)]
    #[case(20, 4)]
    #[case(21, 5)]
    fn test_split_sizes(#[case] n: usize, #[case] n_test: usize) {
        let split = train_test_split(n, &SplitConfig::default()).unwrap();
        assert_eq!(split.test.len(), n_test);
        assert_eq!(split.train.len(), n - n_test);

        let all: BTreeSet<usize> = split.train.iter().chain(&split.test).copied().collect();
        assert_eq!(all, (0..n).collect());
    }

    #[test]
    fn test_same_seed_same_split() {
        let config = SplitConfig::default();
        assert_eq!(
            train_test_split(20, &config).unwrap(),
            train_test_split(20, &config).unwrap()
        );
    }

    #[rstest]
    #[case(0)]
    #[case(1)]
    fn test_too_few_rows(#[case] n: usize) {
        assert!(matches!(
            train_test_split(n, &SplitConfig::default()),
            Err(ModelError::InsufficientData { .. })
        ));
    }

    #[test]
    fn test_invalid_fraction() {
        let config = SplitConfig {
            test_fraction: 1.0,
            ..Default::default()
        };
        assert!(matches!(
            train_test_split(10, &config),
            Err(ModelError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_select_rows() {
        let x = ndarray::array![[0.0], [1.0], [2.0]];
        let y = ndarray::array![10.0, 11.0, 12.0];
        let split = TrainTestSplit {
            train: vec![2, 0],
            test: vec![1],
        };
        let (xt, yt) = split.train_data(&x, &y);
        assert_eq!(xt.column(0).to_vec(), vec![2.0, 0.0]);
        assert_eq!(yt.to_vec(), vec![12.0, 10.0]);
        let (xh, yh) = split.test_data(&x, &y);
        assert_eq!(xh.column(0).to_vec(), vec![1.0]);
        assert_eq!(yh.to_vec(), vec![11.0]);
    }
}
