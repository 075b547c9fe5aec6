//! CART Regression Tree
//!
//! Binary tree grown greedily by squared-error reduction. At each node every
//! feature is scanned in column order and every threshold between two
//! adjacent distinct values is tried; the first split with the strictly
//! largest reduction wins, so fitting is deterministic.
//!
//! For a node with `n` samples split into `n_l` and `n_r`, the reduction is
//! `S_l²/n_l + S_r²/n_r − S²/n` where `S` is the sum of targets.

use crate::error::{ModelError, Result};
use crate::regressor::{FittedRegressor, Regressor, check_fit_input};
use ndarray::{Array1, Array2, ArrayView1};
use serde::{Deserialize, Serialize};

/// Regression tree growth limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeConfig {
    /// Maximum depth (default: 3)
    pub max_depth: usize,
    /// Minimum samples required to split a node (default: 2)
    pub min_samples_split: usize,
    /// Minimum samples in each child (default: 1)
    pub min_samples_leaf: usize,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            max_depth: 3,
            min_samples_split: 2,
            min_samples_leaf: 1,
        }
    }
}

impl TreeConfig {
    /// Check the limits are usable.
    pub fn validate(&self) -> Result<()> {
        if self.max_depth == 0 {
            return Err(ModelError::InvalidParameter(
                "max_depth must be at least 1".to_string(),
            ));
        }
        if self.min_samples_split < 2 {
            return Err(ModelError::InvalidParameter(format!(
                "min_samples_split must be at least 2, got {}",
                self.min_samples_split
            )));
        }
        if self.min_samples_leaf == 0 {
            return Err(ModelError::InvalidParameter(
                "min_samples_leaf must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
enum Node {
    Leaf {
        value: f64,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
}

/// Fitted regression tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionTree {
    nodes: Vec<Node>,
    n_features: usize,
}

struct BestSplit {
    feature: usize,
    threshold: f64,
    gain: f64,
}

impl RegressionTree {
    /// Grow a tree on the given rows of `x`.
    pub(crate) fn grow(x: &Array2<f64>, y: &Array1<f64>, config: &TreeConfig) -> Self {
        let mut tree = Self {
            nodes: Vec::new(),
            n_features: x.ncols(),
        };
        let indices: Vec<usize> = (0..x.nrows()).collect();
        tree.build(x, y, indices, 0, config);
        tree
    }

    /// Number of nodes (splits and leaves).
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of leaves.
    pub fn leaf_count(&self) -> usize {
        self.nodes
            .iter()
            .filter(|n| matches!(n, Node::Leaf { .. }))
            .count()
    }

    /// Depth of the deepest leaf (a single leaf has depth 0).
    pub fn depth(&self) -> usize {
        fn walk(nodes: &[Node], at: usize) -> usize {
            match nodes[at] {
                Node::Leaf { .. } => 0,
                Node::Split { left, right, .. } => 1 + walk(nodes, left).max(walk(nodes, right)),
            }
        }
        if self.nodes.is_empty() {
            0
        } else {
            walk(&self.nodes, 0)
        }
    }

    fn build(
        &mut self,
        x: &Array2<f64>,
        y: &Array1<f64>,
        indices: Vec<usize>,
        depth: usize,
        config: &TreeConfig,
    ) -> usize {
        let id = self.nodes.len();
        let mean = indices.iter().map(|&i| y[i]).sum::<f64>() / indices.len() as f64;
        self.nodes.push(Node::Leaf { value: mean });

        if depth >= config.max_depth || indices.len() < config.min_samples_split {
            return id;
        }

        let Some(best) = best_split(x, y, &indices, config.min_samples_leaf) else {
            return id;
        };

        let (left_idx, right_idx): (Vec<usize>, Vec<usize>) = indices
            .iter()
            .partition(|&&i| x[[i, best.feature]] <= best.threshold);

        let left = self.build(x, y, left_idx, depth + 1, config);
        let right = self.build(x, y, right_idx, depth + 1, config);
        self.nodes[id] = Node::Split {
            feature: best.feature,
            threshold: best.threshold,
            left,
            right,
        };
        id
    }
}

fn best_split(
    x: &Array2<f64>,
    y: &Array1<f64>,
    indices: &[usize],
    min_leaf: usize,
) -> Option<BestSplit> {
    let n = indices.len();
    let total: f64 = indices.iter().map(|&i| y[i]).sum();
    let sse: f64 = {
        let mean = total / n as f64;
        indices.iter().map(|&i| (y[i] - mean).powi(2)).sum()
    };
    // Constant targets: nothing to gain.
    if sse <= f64::EPSILON {
        return None;
    }
    let parent = total * total / n as f64;

    let mut best: Option<BestSplit> = None;
    let mut order = indices.to_vec();

    for feature in 0..x.ncols() {
        order.sort_by(|&a, &b| x[[a, feature]].total_cmp(&x[[b, feature]]));

        let mut left_sum = 0.0;
        for pos in 1..n {
            left_sum += y[order[pos - 1]];

            let lo = x[[order[pos - 1], feature]];
            let hi = x[[order[pos], feature]];
            if lo >= hi || pos < min_leaf || n - pos < min_leaf {
                continue;
            }

            let right_sum = total - left_sum;
            let gain = left_sum * left_sum / pos as f64
                + right_sum * right_sum / (n - pos) as f64
                - parent;

            if gain > 0.0 && best.as_ref().is_none_or(|b| gain > b.gain) {
                let mut threshold = lo + (hi - lo) / 2.0;
                if threshold >= hi {
                    threshold = lo;
                }
                best = Some(BestSplit {
                    feature,
                    threshold,
                    gain,
                });
            }
        }
    }

    best
}

impl FittedRegressor for RegressionTree {
    fn n_features(&self) -> usize {
        self.n_features
    }

    fn predict_row(&self, row: ArrayView1<'_, f64>) -> f64 {
        let mut at = 0;
        loop {
            match self.nodes.get(at) {
                Some(Node::Leaf { value }) => return *value,
                Some(Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                }) => {
                    at = if row[*feature] <= *threshold {
                        *left
                    } else {
                        *right
                    };
                }
                None => return 0.0,
            }
        }
    }
}

/// Unfitted tree estimator.
#[derive(Debug, Clone, Copy, Default)]
pub struct RegressionTreeRegressor {
    config: TreeConfig,
}

impl RegressionTreeRegressor {
    /// Create a tree estimator with validated limits.
    pub fn new(config: TreeConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }
}

impl Regressor for RegressionTreeRegressor {
    type Model = RegressionTree;

    fn fit(&self, x: &Array2<f64>, y: &Array1<f64>) -> Result<RegressionTree> {
        check_fit_input(x, y)?;
        Ok(RegressionTree::grow(x, y, &self.config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    #[test]
    fn test_single_split_on_step() {
        let x = array![[1.0], [2.0], [3.0], [10.0], [11.0], [12.0]];
        let y = array![5.0, 5.0, 5.0, 20.0, 20.0, 20.0];
        let tree = RegressionTreeRegressor::default().fit(&x, &y).unwrap();

        assert_eq!(tree.depth(), 1);
        assert_eq!(tree.leaf_count(), 2);
        assert_relative_eq!(tree.predict_row(array![2.5].view()), 5.0);
        assert_relative_eq!(tree.predict_row(array![6.5].view()), 5.0);
        assert_relative_eq!(tree.predict_row(array![6.6].view()), 20.0);
    }

    #[test]
    fn test_picks_informative_feature() {
        // Feature 0 is noise, feature 1 separates the targets.
        let x = array![[3.0, 0.0], [1.0, 0.0], [2.0, 1.0], [0.0, 1.0]];
        let y = array![1.0, 1.0, 9.0, 9.0];
        let tree = RegressionTreeRegressor::default().fit(&x, &y).unwrap();

        let preds = tree.predict(&x).unwrap();
        assert_eq!(preds.to_vec(), vec![1.0, 1.0, 9.0, 9.0]);
    }

    #[test]
    fn test_equal_gain_prefers_first_feature() {
        let x = array![[1.0, 10.0], [2.0, 20.0]];
        let y = array![0.0, 1.0];
        let tree = RegressionTreeRegressor::default().fit(&x, &y).unwrap();

        // Split is on feature 0 at 1.5: feature 1 is ignored.
        assert_eq!(tree.predict_row(array![1.0, 100.0].view()), 0.0);
        assert_eq!(tree.predict_row(array![2.0, 0.0].view()), 1.0);
    }

    #[test]
    fn test_constant_target_is_single_leaf() {
        let x = array![[1.0], [2.0], [3.0]];
        let y = array![4.0, 4.0, 4.0];
        let tree = RegressionTreeRegressor::default().fit(&x, &y).unwrap();
        assert_eq!(tree.node_count(), 1);
        assert_eq!(tree.depth(), 0);
    }

    #[test]
    fn test_depth_limit_and_min_leaf() {
        let x = Array2::from_shape_fn((16, 1), |(i, _)| i as f64);
        let y = Array1::from_shape_fn(16, |i| (i * i) as f64);

        let config = TreeConfig {
            max_depth: 2,
            ..Default::default()
        };
        let tree = RegressionTreeRegressor::new(config)
            .unwrap()
            .fit(&x, &y)
            .unwrap();
        assert!(tree.depth() <= 2);
        assert!(tree.leaf_count() <= 4);

        let config = TreeConfig {
            max_depth: 10,
            min_samples_leaf: 8,
            ..Default::default()
        };
        let tree = RegressionTreeRegressor::new(config)
            .unwrap()
            .fit(&x, &y)
            .unwrap();
        assert_eq!(tree.leaf_count(), 2);
    }

    #[test]
    fn test_invalid_config() {
        let config = TreeConfig {
            min_samples_split: 1,
            ..Default::default()
        };
        assert!(matches!(
            RegressionTreeRegressor::new(config),
            Err(ModelError::InvalidParameter(_))
        ));
    }
}
