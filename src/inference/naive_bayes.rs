//! Naive Bayes scoring kernel.
//!
//! Joint probabilities are accumulated in log space per response level and
//! normalized without ever leaving it:
//!
//! ```text
//! p(r | x) = 1 / Σ_j exp(log p(x, j) - log p(x, r))
//! ```
//!
//! which cannot overflow however small the joint probabilities get.

use std::f64::consts::PI;

use super::Scorer;
use crate::model::{NaiveBayesModel, NaiveBayesParams, PredictorTable};

/// Normal density at `x`.
#[inline]
pub fn gaussian_density(x: f64, mean: f64, sdev: f64) -> f64 {
    let z = x - mean;
    (-(z * z) / (2.0 * sdev * sdev)).exp() / (sdev * (2.0 * PI).sqrt())
}

/// Replace vanishing (or undefined) probabilities by the floor.
#[inline]
fn floor_prob(p: f64, params: &NaiveBayesParams) -> f64 {
    if p.is_nan() || p <= params.eps_prob {
        params.min_prob
    } else {
        p
    }
}

impl Scorer for NaiveBayesModel {
    fn n_features(&self) -> usize {
        self.output().tables.len()
    }

    fn n_outputs(&self) -> usize {
        self.output().n_levels() + 1
    }

    /// One log-joint accumulator per response level.
    fn scratch_len(&self) -> usize {
        self.output().n_levels()
    }

    fn score0(&self, row: &[f64], scratch: &mut [f64], preds: &mut [f64]) {
        let out = self.output();
        let params = self.params();
        let log_joint = &mut scratch[..out.n_levels()];

        for (r, acc) in log_joint.iter_mut().enumerate() {
            *acc = out.apriori[r].ln();

            for (table, &x) in out.tables.iter().zip(row) {
                if x.is_nan() {
                    continue;
                }
                let prob = match table {
                    PredictorTable::Categorical { probs, cardinality } => {
                        if x >= 0.0 && (x as usize) < probs.ncols() {
                            probs[[r, x as usize]]
                        } else {
                            params.laplace / (out.rescnt[r] + params.laplace * *cardinality as f64)
                        }
                    }
                    PredictorTable::Numeric { mean, sdev } => {
                        let mean = if mean[r].is_nan() { 0.0 } else { mean[r] };
                        let sdev = match sdev[r] {
                            s if s.is_nan() => 1.0,
                            s if s <= params.eps_sdev => params.min_sdev,
                            s => s,
                        };
                        gaussian_density(x, mean, sdev)
                    }
                };
                *acc += floor_prob(prob, params).ln();
            }
        }

        let (class, probs) = preds.split_at_mut(1);
        for (i, p) in probs.iter_mut().enumerate() {
            let sum: f64 = log_joint.iter().map(|&j| (j - log_joint[i]).exp()).sum();
            *p = 1.0 / sum;
        }
        class[0] = self.rule().predict(probs) as f64;
    }

    fn output_names(&self) -> Vec<String> {
        std::iter::once("predict".to_string()).chain(self.levels()).collect()
    }
}
