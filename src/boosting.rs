//! Gradient boosting over depth-1 regression trees.
//!
//! Each round fits a stump to the current residuals via exhaustive split
//! search, so fits are deterministic: identical inputs give bit-identical
//! models and predictions.

use ndarray::{Array1, Array2, ArrayView1};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("training data is empty")]
    EmptyTrainingSet,

    #[error("feature/target length mismatch: {features} rows vs {targets} targets")]
    LengthMismatch { features: usize, targets: usize },

    #[error("model has not been fitted")]
    NotFitted,
}

/// Boosting hyperparameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoostParams {
    /// Number of boosting rounds (trees)
    pub n_trees: usize,
    /// Shrinkage applied to each tree's contribution
    pub learning_rate: f64,
    /// Minimum samples required on each side of a split
    pub min_samples_leaf: usize,
}

impl Default for BoostParams {
    fn default() -> Self {
        Self {
            n_trees: 100,
            learning_rate: 0.1,
            min_samples_leaf: 1,
        }
    }
}

/// A single regression stump: one feature, one threshold, two leaf values.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct Stump {
    feature: usize,
    threshold: f64,
    left: f64,
    right: f64,
}

impl Stump {
    fn output(&self, row: ArrayView1<'_, f64>) -> f64 {
        if row[self.feature] <= self.threshold {
            self.left
        } else {
            self.right
        }
    }
}

/// Gradient-boosted regressor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoostedRegressor {
    params: BoostParams,
    base: Option<f64>,
    trees: Vec<Stump>,
}

impl BoostedRegressor {
    pub fn new() -> Self {
        Self::with_params(BoostParams::default())
    }

    pub fn with_params(params: BoostParams) -> Self {
        Self {
            params,
            base: None,
            trees: Vec::new(),
        }
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    /// Train on a feature matrix and target vector.
    ///
    /// Starts from the target mean and fits stumps to residuals, stopping
    /// early once the residuals are exhausted (a constant target converges
    /// immediately after the base value).
    pub fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<(), ModelError> {
        if x.nrows() != y.len() {
            return Err(ModelError::LengthMismatch {
                features: x.nrows(),
                targets: y.len(),
            });
        }

        let base = y.mean().ok_or(ModelError::EmptyTrainingSet)?;
        self.base = Some(base);
        self.trees.clear();

        let mut predictions = vec![base; y.len()];

        for _ in 0..self.params.n_trees {
            let residuals: Vec<f64> = y
                .iter()
                .zip(predictions.iter())
                .map(|(target, pred)| target - pred)
                .collect();

            if residuals.iter().all(|r| r.abs() < 1e-12) {
                break;
            }

            let Some(stump) = best_stump(x, &residuals, self.params.min_samples_leaf) else {
                break;
            };

            for (i, row) in x.rows().into_iter().enumerate() {
                predictions[i] += self.params.learning_rate * stump.output(row);
            }

            self.trees.push(stump);
        }

        Ok(())
    }

    pub fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>, ModelError> {
        let base = self.base.ok_or(ModelError::NotFitted)?;

        let predictions = x
            .rows()
            .into_iter()
            .map(|row| {
                self.trees
                    .iter()
                    .fold(base, |acc, tree| acc + self.params.learning_rate * tree.output(row))
            })
            .collect();

        Ok(predictions)
    }
}

impl Default for BoostedRegressor {
    fn default() -> Self {
        Self::new()
    }
}

/// Exhaustive least-squares split search across every feature and every
/// distinct threshold. Returns None when no split leaves `min_leaf` samples
/// on both sides.
fn best_stump(x: &Array2<f64>, residuals: &[f64], min_leaf: usize) -> Option<Stump> {
    let n = x.nrows();
    let total_sum: f64 = residuals.iter().sum();
    let total_sq: f64 = residuals.iter().map(|r| r * r).sum();

    let mut best: Option<(f64, Stump)> = None;

    for (feature, col) in x.columns().into_iter().enumerate() {
        let mut order: Vec<usize> = (0..n).collect();
        order.sort_by(|&a, &b| col[a].partial_cmp(&col[b]).unwrap_or(Ordering::Equal));

        let mut left_sum = 0.0;
        let mut left_sq = 0.0;

        for split in 1..n {
            let idx = order[split - 1];
            left_sum += residuals[idx];
            left_sq += residuals[idx] * residuals[idx];

            // No threshold separates identical values.
            if col[order[split - 1]] == col[order[split]] {
                continue;
            }

            let n_left = split;
            let n_right = n - split;
            if n_left < min_leaf || n_right < min_leaf {
                continue;
            }

            let right_sum = total_sum - left_sum;
            let right_sq = total_sq - left_sq;
            let sse = (left_sq - left_sum * left_sum / n_left as f64)
                + (right_sq - right_sum * right_sum / n_right as f64);

            if best.as_ref().map_or(true, |(score, _)| sse < *score) {
                best = Some((
                    sse,
                    Stump {
                        feature,
                        threshold: (col[order[split - 1]] + col[order[split]]) / 2.0,
                        left: left_sum / n_left as f64,
                        right: right_sum / n_right as f64,
                    },
                ));
            }
        }
    }

    best.map(|(_, stump)| stump)
}
