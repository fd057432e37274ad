//! Multi-class classification metrics.

use super::model_metrics::{mean_or_nan, ConfusionMatrix, MetricsIdentity, ModelMetrics, MultinomialMetrics};
use super::{MetricBuilder, LOGLOSS_EPS};
use crate::error::{ConfigError, UnsupportedMetricError};

/// Largest `k` tracked for top-k hit ratios.
pub const MAX_HIT_RATIOS: usize = 10;

/// Accumulates MSE, log loss, the confusion matrix and top-k hit counts of a
/// multi-class classifier.
///
/// Predictions are `[class, p0, .., p(n-1)]`; the actual is the response
/// code. Rows with a missing response are skipped.
#[derive(Debug, Clone, PartialEq)]
pub struct MultinomialBuilder {
    domain: Vec<String>,
    nobs: u64,
    sumsqe: f64,
    logloss: f64,
    confusion: ConfusionMatrix,
    /// `hits[i]` counts rows whose actual class ranked exactly `i`.
    hits: Vec<u64>,
}

impl MultinomialBuilder {
    pub fn new(domain: Vec<String>) -> Self {
        let n = domain.len();
        Self {
            domain,
            nobs: 0,
            sumsqe: 0.0,
            logloss: 0.0,
            confusion: ConfusionMatrix::zeros(n),
            hits: vec![0; n.min(MAX_HIT_RATIOS)],
        }
    }

    #[inline]
    fn n_classes(&self) -> usize {
        self.domain.len()
    }
}

/// Rank of class `y` among `probs`, ties going to the lower index.
#[inline]
fn rank_of(probs: &[f64], y: usize) -> usize {
    let py = probs[y];
    probs
        .iter()
        .enumerate()
        .filter(|&(i, &p)| p > py || (p == py && i < y))
        .count()
}

impl MetricBuilder for MultinomialBuilder {
    fn name(&self) -> &'static str {
        "multinomial"
    }

    fn nobs(&self) -> u64 {
        self.nobs
    }

    fn fresh(&self) -> Self {
        Self::new(self.domain.clone())
    }

    fn per_row(&mut self, preds: &[f64], actual: &[f64]) -> Result<(), UnsupportedMetricError> {
        let y = actual[0];
        if y.is_nan() || y < 0.0 || y as usize >= self.n_classes() {
            return Ok(());
        }
        let y = y as usize;
        let probs = &preds[1..];
        let p = probs[y];

        let err = 1.0 - p;
        self.sumsqe += err * err;
        self.logloss -= p.max(LOGLOSS_EPS).ln();
        self.confusion.add(y, preds[0] as usize);
        if let Some(h) = self.hits.get_mut(rank_of(probs, y)) {
            *h += 1;
        }
        self.nobs += 1;
        Ok(())
    }

    fn merge(&mut self, other: Self) -> Result<(), ConfigError> {
        if other.n_classes() != self.n_classes() {
            return Err(ConfigError::LengthMismatch {
                what: "response levels",
                expected: self.n_classes(),
                actual: other.n_classes(),
            });
        }
        self.nobs += other.nobs;
        self.sumsqe += other.sumsqe;
        self.logloss += other.logloss;
        self.confusion.merge(&other.confusion);
        for (a, b) in self.hits.iter_mut().zip(&other.hits) {
            *a += b;
        }
        Ok(())
    }

    fn finalize(self, identity: MetricsIdentity) -> ModelMetrics {
        let mse = mean_or_nan(self.sumsqe, self.nobs);
        let mut cumulative = 0;
        let hit_ratios = self
            .hits
            .iter()
            .map(|&h| {
                cumulative += h;
                mean_or_nan(cumulative as f64, self.nobs)
            })
            .collect();

        ModelMetrics::Multinomial(MultinomialMetrics {
            identity,
            nobs: self.nobs,
            mse,
            rmse: mse.sqrt(),
            logloss: mean_or_nan(self.logloss, self.nobs),
            accuracy: self.confusion.accuracy(),
            confusion: self.confusion.with_domain(self.domain),
            hit_ratios,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn rank_breaks_ties_by_index() {
        assert_eq!(rank_of(&[0.2, 0.5, 0.3], 1), 0);
        assert_eq!(rank_of(&[0.2, 0.5, 0.3], 0), 2);
        assert_eq!(rank_of(&[0.4, 0.4, 0.2], 0), 0);
        assert_eq!(rank_of(&[0.4, 0.4, 0.2], 1), 1);
    }

    #[test]
    fn hit_ratios_are_cumulative() {
        let mut b = MultinomialBuilder::new(vec!["a".into(), "b".into(), "c".into()]);
        b.per_row(&[0.0, 0.7, 0.2, 0.1], &[0.0]).unwrap(); // rank 0
        b.per_row(&[0.0, 0.5, 0.3, 0.2], &[1.0]).unwrap(); // rank 1
        b.per_row(&[1.0, 0.3, 0.6, 0.1], &[2.0]).unwrap(); // rank 2
        b.per_row(&[1.0, 0.3, 0.6, 0.1], &[f64::NAN]).unwrap();

        let ModelMetrics::Multinomial(m) = b.finalize(MetricsIdentity::new("nb", "f")) else {
            panic!("expected multinomial metrics");
        };
        assert_eq!(m.nobs, 3);
        assert_eq!(m.hit_ratios.len(), 3);
        assert_abs_diff_eq!(m.hit_ratios[0], 1.0 / 3.0, epsilon = 1e-12);
        assert_abs_diff_eq!(m.hit_ratios[1], 2.0 / 3.0, epsilon = 1e-12);
        assert_abs_diff_eq!(m.hit_ratios[2], 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(m.accuracy, 1.0 / 3.0, epsilon = 1e-12);
        assert_eq!(m.confusion.counts[2][1], 1);
    }

    #[test]
    fn merge_rejects_different_shapes() {
        let mut a = MultinomialBuilder::new(vec!["a".into(), "b".into(), "c".into()]);
        let b = MultinomialBuilder::new(vec!["a".into(), "b".into(), "c".into(), "d".into()]);
        assert!(a.merge(b).is_err());
    }
}
